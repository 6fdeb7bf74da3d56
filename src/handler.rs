use crate::{
    file::{ServedFile, header},
    listing::{Entry, Listing},
    path::{Rejection, RequestPath},
    range::{ByteRange, RangeRequest},
};
use anyhow::Result;
use log::warn;
use std::{
    io::{Cursor, ErrorKind},
    path::{Path, PathBuf},
};
use tiny_http::{Method, Response, ResponseBox};

const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

/// Request headers that change how a file is answered.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestHeaders<'a> {
    pub range: Option<&'a str>,
    pub if_modified_since: Option<&'a str>,
}

/// Outcome of a request before it is turned into a response.
#[derive(Debug)]
pub enum Reply {
    File(ServedFile),
    Partial(ServedFile, ByteRange),
    NotModified(ServedFile),
    Listing(String),
    Redirect(String),
    RangeNotSatisfiable(u64),
    Error(u16, &'static str),
}

impl Reply {
    pub fn status(&self) -> u16 {
        match self {
            Self::File(_) | Self::Listing(_) => 200,
            Self::Partial(..) => 206,
            Self::Redirect(_) => 301,
            Self::NotModified(_) => 304,
            Self::RangeNotSatisfiable(_) => 416,
            Self::Error(status, _) => *status,
        }
    }

    /// Body length for the access log, `None` for generated pages and errors.
    pub fn body_size(&self) -> Option<u64> {
        match self {
            Self::File(file) => Some(file.size),
            Self::Partial(_, range) => Some(range.len()),
            _ => None,
        }
    }

    pub fn into_response(self) -> Result<ResponseBox> {
        let response = match self {
            Self::File(file) => file.into_response()?,
            Self::Partial(file, range) => file.into_partial_response(range)?,
            Self::Listing(html) => {
                Response::from_string(html)
                    .with_header(header("content-type", "text/html; charset=utf-8")?)
                    .boxed()
            }
            Self::NotModified(file) => {
                let mut response = Response::empty(304);

                if let Some(last_modified) = file.last_modified_header()? {
                    response.add_header(last_modified);
                }

                response.boxed()
            }
            Self::Redirect(location) => Response::empty(301)
                .with_header(header("location", &location)?)
                .boxed(),
            Self::RangeNotSatisfiable(size) => Response::empty(416)
                .with_header(header("content-range", &format!("bytes */{size}"))?)
                .boxed(),
            Self::Error(status, message) => Response::new(
                status.into(),
                vec![header("content-type", "text/plain; charset=utf-8")?],
                Cursor::new(message.as_bytes().to_vec()),
                Some(message.len()),
                None,
            )
            .boxed(),
        };

        Ok(response)
    }
}

/// Static file semantics scoped to one root directory.
pub struct RequestHandler {
    root: PathBuf,
}

impl RequestHandler {
    /// `root` must already be canonical.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn reply(&self, method: &Method, url: &str, headers: RequestHeaders<'_>) -> Reply {
        if !matches!(method, Method::Get | Method::Head) {
            return Reply::Error(501, "Unsupported method");
        }

        let request_path = match RequestPath::parse(url) {
            Ok(request_path) => request_path,
            Err(Rejection::Malformed) => return Reply::Error(400, "Bad request path"),
            Err(Rejection::OutsideRoot) => return Reply::Error(403, "Forbidden"),
        };

        let path = match request_path.resolve(&self.root).canonicalize() {
            Ok(path) => path,
            Err(_) => return Reply::Error(404, "File not found"),
        };

        if !path.starts_with(&self.root) {
            warn!("Refusing {} outside of {}", path.display(), self.root.display());
            return Reply::Error(403, "Forbidden");
        }

        if path.is_dir() {
            return Self::reply_directory(&request_path, &path, headers);
        }

        if request_path.has_trailing_slash() {
            return Reply::Error(404, "File not found");
        }

        Self::reply_file(path, headers)
    }

    fn reply_directory(
        request_path: &RequestPath,
        dir: &Path,
        headers: RequestHeaders<'_>,
    ) -> Reply {
        if !request_path.has_trailing_slash() {
            let mut location = request_path.directory_href();

            if let Some(query) = request_path.query() {
                location = format!("{location}?{query}");
            }

            return Reply::Redirect(location);
        }

        for index in INDEX_FILES {
            let index_path = dir.join(index);

            if index_path.is_file() {
                return Self::reply_file(index_path, headers);
            }
        }

        let Ok(entries) = Entry::read_all(dir) else {
            return Reply::Error(404, "No permission to list directory");
        };

        let page = request_path
            .query_param("page")
            .and_then(|page| page.parse::<usize>().ok())
            .unwrap_or(1);
        let title = request_path.display();

        Reply::Listing(Listing::new(&title, &entries, page).render())
    }

    fn reply_file(path: PathBuf, headers: RequestHeaders<'_>) -> Reply {
        let file = match ServedFile::open(path) {
            Ok(file) => file,
            Err(error) => {
                let permission_denied = error
                    .downcast_ref::<std::io::Error>()
                    .is_some_and(|error| error.kind() == ErrorKind::PermissionDenied);

                return if permission_denied {
                    Reply::Error(403, "Forbidden")
                } else {
                    Reply::Error(404, "File not found")
                };
            }
        };

        if headers
            .if_modified_since
            .is_some_and(|since| file.is_unmodified_since(since))
        {
            return Reply::NotModified(file);
        }

        match headers.range.map(|range| RangeRequest::parse(range, file.size)) {
            Some(RangeRequest::Partial(range)) => Reply::Partial(file, range),
            Some(RangeRequest::Unsatisfiable) => Reply::RangeNotSatisfiable(file.size),
            Some(RangeRequest::Full) | None => Reply::File(file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn none() -> RequestHeaders<'static> {
        RequestHeaders::default()
    }

    fn range(value: &str) -> RequestHeaders<'_> {
        RequestHeaders {
            range: Some(value),
            ..RequestHeaders::default()
        }
    }

    fn since(value: &str) -> RequestHeaders<'_> {
        RequestHeaders {
            if_modified_since: Some(value),
            ..RequestHeaders::default()
        }
    }

    fn handler() -> (TempDir, RequestHandler) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("ARTIST_0/ALBUM_0")).unwrap();
        fs::write(dir.path().join("song.mp3"), vec![7u8; 64]).unwrap();
        fs::write(dir.path().join("ARTIST_0/ALBUM_0/TRACK_0.mp3"), b"track").unwrap();

        let root = dir.path().canonicalize().unwrap();

        (dir, RequestHandler::new(root))
    }

    #[test]
    fn serves_files_with_inferred_type() {
        let (_dir, handler) = handler();

        let Reply::File(file) = handler.reply(&Method::Get, "/song.mp3", none()) else {
            panic!("expected a file");
        };

        assert_eq!(file.size, 64);
        assert_eq!(file.mime.essence_str(), "audio/mpeg");
    }

    #[test]
    fn missing_paths_are_not_found() {
        let (_dir, handler) = handler();

        assert_eq!(handler.reply(&Method::Get, "/nope.mp3", none()).status(), 404);
        assert_eq!(handler.reply(&Method::Get, "/ARTIST_9/", none()).status(), 404);
    }

    #[test]
    fn files_with_trailing_slash_are_not_found() {
        let (_dir, handler) = handler();

        assert_eq!(handler.reply(&Method::Get, "/song.mp3/", none()).status(), 404);
        assert_eq!(
            handler
                .reply(&Method::Get, "/ARTIST_0/ALBUM_0/TRACK_0.mp3/", none())
                .status(),
            404
        );
    }

    #[test]
    fn escapes_are_forbidden() {
        let (_dir, handler) = handler();

        assert_eq!(handler.reply(&Method::Get, "/../etc/passwd", none()).status(), 403);
        assert_eq!(handler.reply(&Method::Get, "/ARTIST_0/%2e%2e/%2e%2e/", none()).status(), 403);
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_out_of_root_are_forbidden() {
        let (dir, handler) = handler();
        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join("secret.mp3"), b"secret").unwrap();
        std::os::unix::fs::symlink(outside.path().join("secret.mp3"), dir.path().join("link.mp3"))
            .unwrap();

        assert_eq!(handler.reply(&Method::Get, "/link.mp3", none()).status(), 403);
    }

    #[test]
    fn directories_redirect_to_trailing_slash() {
        let (_dir, handler) = handler();

        let reply = handler.reply(&Method::Get, "/ARTIST_0?page=2", none());

        let Reply::Redirect(location) = reply else {
            panic!("expected a redirect");
        };

        assert_eq!(location, "/ARTIST_0/?page=2");
    }

    #[test]
    fn directories_are_listed() {
        let (_dir, handler) = handler();

        let Reply::Listing(html) = handler.reply(&Method::Get, "/ARTIST_0/ALBUM_0/", none()) else {
            panic!("expected a listing");
        };

        assert!(html.contains("Directory listing for /ARTIST_0/ALBUM_0/"));
        assert!(html.contains(r#"<a href="TRACK_0.mp3">TRACK_0.mp3</a>"#));
    }

    #[test]
    fn index_files_replace_listings() {
        let (dir, handler) = handler();
        fs::write(dir.path().join("ARTIST_0/index.html"), b"<p>hi</p>").unwrap();

        let Reply::File(file) = handler.reply(&Method::Get, "/ARTIST_0/", none()) else {
            panic!("expected the index file");
        };

        assert_eq!(file.mime.essence_str(), "text/html");
    }

    #[test]
    fn ranges_select_partial_content() {
        let (_dir, handler) = handler();

        let reply = handler.reply(&Method::Get, "/song.mp3", range("bytes=10-19"));

        let Reply::Partial(_, selected) = reply else {
            panic!("expected partial content");
        };
        assert_eq!(selected, ByteRange { start: 10, end: 19 });

        assert_eq!(
            handler.reply(&Method::Get, "/song.mp3", range("bytes=64-")).status(),
            416
        );
        assert_eq!(
            handler.reply(&Method::Get, "/song.mp3", range("bytes=1-2,4-5")).status(),
            200
        );
    }

    #[test]
    fn head_is_allowed_and_post_is_not() {
        let (_dir, handler) = handler();

        assert_eq!(handler.reply(&Method::Head, "/song.mp3", none()).status(), 200);
        assert_eq!(handler.reply(&Method::Post, "/song.mp3", none()).status(), 501);
    }

    #[test]
    fn unchanged_files_are_not_resent() {
        let (_dir, handler) = handler();

        let Reply::File(file) = handler.reply(&Method::Get, "/song.mp3", none()) else {
            panic!("expected a file");
        };
        let modified = file.modified.unwrap();
        let current = crate::http_date::format(modified).unwrap();
        let stale = crate::http_date::format(modified - 60).unwrap();

        assert_eq!(handler.reply(&Method::Get, "/song.mp3", since(&current)).status(), 304);
        assert_eq!(handler.reply(&Method::Get, "/song.mp3", since(&stale)).status(), 200);
        assert_eq!(handler.reply(&Method::Get, "/song.mp3", since("garbage")).status(), 200);
    }

    #[test]
    fn access_sizes_only_for_file_bodies() {
        let (_dir, handler) = handler();

        assert_eq!(handler.reply(&Method::Get, "/song.mp3", none()).body_size(), Some(64));
        assert_eq!(
            handler
                .reply(&Method::Get, "/song.mp3", range("bytes=0-9"))
                .body_size(),
            Some(10)
        );
        assert_eq!(handler.reply(&Method::Get, "/ARTIST_0/", none()).body_size(), None);
        assert_eq!(handler.reply(&Method::Get, "/nope.mp3", none()).body_size(), None);
    }
}
