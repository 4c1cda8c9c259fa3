#[cfg(test)]
use mockall::automock;

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    fs,
    path::Path,
};

use error_stack::{IntoReport, Report, Result, ResultExt};
use log::info;
use reqwest::header;
use self_update::Download;

const USER_AGENT: &str = "rust-reqwest/portapps";

#[derive(Debug, PartialEq)]
pub enum DownloadError {
    HeaderValue,
    FileCreate(String),
    Transfer(String),
}

impl Display for DownloadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DownloadError::HeaderValue => write!(f, "Invalid request header"),
            DownloadError::FileCreate(path) => write!(f, "Cannot create {}", path),
            DownloadError::Transfer(url) => write!(f, "Download of {} failed", url),
        }
    }
}

impl Error for DownloadError {}

pub type DownloadResult<T> = Result<T, DownloadError>;

#[cfg_attr(test, automock)]
pub trait Downloader {
    fn download(&self, url: &str, destination: &Path) -> DownloadResult<()>;
}

/// Downloads over HTTP(S) with a progress bar.
pub struct HttpDownloader {
    pub show_progress: bool,
}

impl Default for HttpDownloader {
    fn default() -> Self {
        HttpDownloader { show_progress: true }
    }
}

impl Downloader for HttpDownloader {
    fn download(&self, url: &str, destination: &Path) -> DownloadResult<()> {
        let mut download = Download::from_url(url);
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            USER_AGENT
                .parse::<header::HeaderValue>()
                .report()
                .change_context(DownloadError::HeaderValue)?,
        );
        headers.insert(
            header::ACCEPT,
            "application/octet-stream"
                .parse::<header::HeaderValue>()
                .report()
                .change_context(DownloadError::HeaderValue)?,
        );
        download.set_headers(headers);
        download.show_progress(self.show_progress);

        info!("Downloading {} to {}", url, destination.display());
        let mut file = fs::File::create(destination)
            .report()
            .change_context_lazy(|| DownloadError::FileCreate(destination.display().to_string()))?;

        download.download_to(&mut file).map_err(|err| {
            Report::new(DownloadError::Transfer(url.to_string())).attach_printable(err.to_string())
        })?;
        Ok(())
    }
}
