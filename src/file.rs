use crate::{http_date, range::ByteRange};
use anyhow::{Error, Result};
use mime_guess::{Mime, from_path};
use std::{
    fs::File as FsFile,
    io::{Read, Seek, SeekFrom},
    path::PathBuf,
};
use time::OffsetDateTime;
use tiny_http::{Header, Response, ResponseBox, StatusCode};

/// An opened file about to be sent to a client.
#[derive(Debug)]
pub struct ServedFile {
    pub path: PathBuf,
    pub mime: Mime,
    pub size: u64,
    /// Modification time in whole unix seconds.
    pub modified: Option<i64>,
    file: FsFile,
}

impl ServedFile {
    pub fn open(path: PathBuf) -> Result<Self> {
        let file = FsFile::open(&path)?;
        let metadata = file.metadata()?;
        let modified = metadata
            .modified()
            .ok()
            .map(|modified| OffsetDateTime::from(modified).unix_timestamp());
        let mime = from_path(&path).first_or_octet_stream();

        Ok(Self {
            path,
            mime,
            size: metadata.len(),
            modified,
            file,
        })
    }

    /// Whether a client copy validated by `If-Modified-Since` is still current.
    pub fn is_unmodified_since(&self, if_modified_since: &str) -> bool {
        match (self.modified, http_date::parse(if_modified_since)) {
            (Some(modified), Some(since)) => modified <= since,
            _ => false,
        }
    }

    pub fn last_modified_header(&self) -> Result<Option<Header>> {
        self.modified
            .and_then(http_date::format)
            .map(|date| header("last-modified", &date))
            .transpose()
    }

    fn headers(&self) -> Result<Vec<Header>> {
        let mut headers = vec![
            header("content-type", self.mime.essence_str())?,
            header("accept-ranges", "bytes")?,
        ];
        headers.extend(self.last_modified_header()?);

        Ok(headers)
    }

    pub fn into_response(self) -> Result<ResponseBox> {
        let headers = self.headers()?;
        let mut response = Response::from_file(self.file);

        for header in headers {
            response.add_header(header);
        }

        Ok(response.boxed())
    }

    pub fn into_partial_response(mut self, range: ByteRange) -> Result<ResponseBox> {
        let mut headers = self.headers()?;
        headers.push(header("content-range", &range.content_range(self.size))?);

        self.file.seek(SeekFrom::Start(range.start))?;

        let length = range.len();
        let response = Response::new(
            StatusCode(206),
            headers,
            self.file.take(length),
            usize::try_from(length).ok(),
            None,
        );

        Ok(response.boxed())
    }
}

pub fn header(field: &str, value: &str) -> Result<Header> {
    Header::from_bytes(field, value).map_err(|_| Error::msg("Could not create header"))
}
