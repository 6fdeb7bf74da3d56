use crate::traits::Commas;
use anyhow::Result;
use html_escape::{encode_double_quoted_attribute, encode_text};
use mime_guess::from_path;
use natord::compare_ignore_case;
use std::{
    fs::read_dir,
    iter::{Skip, Take},
    path::Path,
    slice::Iter,
};

pub const ENTRIES_PER_PAGE: usize = 100;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
}

impl Entry {
    /// Reads a directory, ordered naturally and case-insensitively by name.
    pub fn read_all(dir: &Path) -> Result<Vec<Self>> {
        let mut entries = vec![];

        for entry in read_dir(dir)? {
            let Ok(entry) = entry else { continue };

            entries.push(Self {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: entry.path().is_dir(),
            });
        }

        entries.sort_by(|a, b| compare_ignore_case(&a.name, &b.name));

        Ok(entries)
    }

    fn href(&self) -> String {
        let mut href = urlencoding::encode(&self.name).into_owned();

        if self.is_dir {
            href.push('/');
        }

        href
    }

    fn label(&self) -> String {
        if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }
}

pub struct Listing<'a> {
    title: &'a str,
    entries: Take<Skip<Iter<'a, Entry>>>,
    total_entries: usize,
    page: usize,
    total_pages: usize,
}

impl<'a> Listing<'a> {
    pub fn new(title: &'a str, entries: &'a [Entry], page: usize) -> Self {
        let total_entries = entries.len();
        let total_pages = total_entries.div_ceil(ENTRIES_PER_PAGE).max(1);
        let page = page.clamp(1, total_pages);
        let entries = entries
            .iter()
            .skip((page - 1) * ENTRIES_PER_PAGE)
            .take(ENTRIES_PER_PAGE);

        Self {
            title,
            entries,
            total_entries,
            page,
            total_pages,
        }
    }

    pub fn render(self) -> String {
        let title = encode_text(&format!("Directory listing for {}", self.title)).into_owned();
        let info_element = format!("<div>{} entries</div>", self.total_entries.commas());

        let mut entry_elements = String::new();

        if self.title != "/" {
            entry_elements += r#"<li><a href="../">../</a></li>"#;
        }

        for entry in self.entries {
            let href = entry.href();
            let mut elements = format!(
                r#"<a href="{}">{}</a>"#,
                encode_double_quoted_attribute(&href),
                encode_text(&entry.label()),
            );

            if !entry.is_dir {
                let mime_type = from_path(&entry.name).first_or_octet_stream();

                if let tag @ ("audio" | "video") = mime_type.type_().as_str() {
                    elements += &format!(
                        r#" <{tag} src="{}" preload="none" controls></{tag}>"#,
                        encode_double_quoted_attribute(&href),
                    );
                }
            }

            entry_elements += &format!("<li>{elements}</li>");
        }

        let mut paginator_elements = String::new();

        if self.total_pages > 1 {
            for i in 1..=self.total_pages {
                if i == self.page {
                    paginator_elements += &format!(r#"<a class="current">{i}</a>"#);
                } else {
                    paginator_elements += &format!(r#"<a href="?page={i}">{i}</a>"#);
                }
            }
        }

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta charset="utf-8" />
        <title>{title}</title>
        <meta name="viewport" content="width=device-width, initial-scale=1.0" />
        <style>
            body {{
                font-family: Segoe UI, Arial, Helvetica, sans-serif;
                margin: 20px;
            }}

            .paginator {{
                display: flex;
                flex-wrap: wrap;
                gap: 10px;

                a {{
                    padding: 5px;
                    text-decoration: none;
                    background-color: #ccc;
                    color: #000;
                }}

                a.current {{
                    background-color: #3170bd;
                    color: #fff;
                }}
            }}

            li {{
                margin: 5px 0;
            }}

            audio, video {{
                height: 24px;
                vertical-align: middle;
            }}
        </style>
    </head>
    <body>
        <h1>{title}</h1>
        {info_element}
        <div class="paginator">{paginator_elements}</div>
        <hr />
        <ul>{entry_elements}</ul>
        <hr />
        <div class="paginator">{paginator_elements}</div>
    </body>
</html>
"#
        )
    }
}
