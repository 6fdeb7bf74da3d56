use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// Not decodable as a UTF-8 path.
    Malformed,
    /// Would resolve outside the served root.
    OutsideRoot,
}

/// Decoded path part of a request URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestPath {
    segments: Vec<String>,
    trailing_slash: bool,
    query: Option<String>,
}

impl RequestPath {
    pub fn parse(url: &str) -> Result<Self, Rejection> {
        let url = url.split('#').next().unwrap_or_default();
        let (raw_path, query) = match url.split_once('?') {
            Some((raw_path, query)) => (raw_path, Some(query.to_owned())),
            None => (url, None),
        };

        let mut segments = vec![];

        for raw_segment in raw_path.split('/') {
            let segment = urlencoding::decode(raw_segment).map_err(|_| Rejection::Malformed)?;

            match &*segment {
                "" | "." => continue,
                ".." => return Err(Rejection::OutsideRoot),
                segment if segment.contains(['/', '\\']) => return Err(Rejection::OutsideRoot),
                segment if segment.contains('\0') => return Err(Rejection::Malformed),
                segment => segments.push(segment.to_owned()),
            }
        }

        Ok(Self {
            segments,
            trailing_slash: raw_path.ends_with('/'),
            query,
        })
    }

    pub fn has_trailing_slash(&self) -> bool {
        self.trailing_slash
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Value of a `key=value` query parameter.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .as_deref()?
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value)
    }

    pub fn resolve(&self, root: &Path) -> PathBuf {
        self.segments
            .iter()
            .fold(root.to_path_buf(), |path, segment| path.join(segment))
    }

    /// Decoded path, always starting with `/`.
    pub fn display(&self) -> String {
        let mut display = format!("/{}", self.segments.join("/"));

        if self.trailing_slash && !self.segments.is_empty() {
            display.push('/');
        }

        display
    }

    /// Percent-encoded path with a trailing slash, used for directory links.
    pub fn directory_href(&self) -> String {
        let mut href = String::from("/");

        for segment in &self.segments {
            href += &urlencoding::encode(segment);
            href.push('/');
        }

        href
    }
}
