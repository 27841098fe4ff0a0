use async_trait::async_trait;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to {url} failed: {source}")]
    Request { url: String, #[source] source: reqwest::Error },
    #[error("{url} answered {status}")]
    Status { url: String, status: reqwest::StatusCode },
    #[error("cannot read {}: {source}", path.display())]
    Io { path: PathBuf, #[source] source: std::io::Error },
}

/// Where the CSV export comes from.
#[async_trait]
pub trait SourceText: Send + Sync {
    async fn fetch(&self) -> Result<String, SourceError>;
    fn describe(&self) -> String;
}

pub struct HttpSource {
    http: Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, SourceError> {
        let url = url.into();
        let mut builder = Client::builder();
        if let Some(t) = timeout { builder = builder.timeout(t); }
        let http = builder.build().map_err(|source| SourceError::Request { url: url.clone(), source })?;
        Ok(Self { http, url })
    }
}

#[async_trait]
impl SourceText for HttpSource {
    async fn fetch(&self) -> Result<String, SourceError> {
        let request_err = |source| SourceError::Request { url: self.url.clone(), source };
        let resp = self.http.get(&self.url).send().await.map_err(request_err)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status { url: self.url.clone(), status });
        }
        resp.text().await.map_err(request_err)
    }

    fn describe(&self) -> String { self.url.clone() }
}

pub struct FileSource { path: PathBuf }

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    /// `<dir>/<name>.csv`
    pub fn module(dir: impl AsRef<Path>, name: &str) -> Self {
        Self::new(dir.as_ref().join(format!("{name}.csv")))
    }

    pub fn path(&self) -> &Path { &self.path }
}

#[async_trait]
impl SourceText for FileSource {
    async fn fetch(&self) -> Result<String, SourceError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Io { path: self.path.clone(), source })
    }

    fn describe(&self) -> String { self.path.display().to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_path_layout() {
        let src = FileSource::module("modules", "hero-banner");
        assert_eq!(src.path(), Path::new("modules/hero-banner.csv"));
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileSource::module(dir.path(), "nope").fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
        assert!(err.to_string().contains("nope.csv"));
    }

    #[tokio::test]
    async fn reads_file_text() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("m.csv"), "site,id\n").unwrap();
        let text = FileSource::module(dir.path(), "m").fetch().await.unwrap();
        assert_eq!(text, "site,id\n");
    }

    #[tokio::test]
    async fn http_non_2xx_is_status_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server.mock("GET", "/").with_status(503).create_async().await;
        let src = HttpSource::new(server.url(), None).unwrap();
        match src.fetch().await {
            Err(SourceError::Status { status, .. }) => assert_eq!(status.as_u16(), 503),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn http_body_is_returned() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/")
            .with_status(200)
            .with_body("site,id,x,y,config\n")
            .create_async()
            .await;
        let src = HttpSource::new(server.url(), Some(Duration::from_secs(5))).unwrap();
        assert_eq!(src.fetch().await.unwrap(), "site,id,x,y,config\n");
        assert_eq!(src.describe(), server.url());
    }
}
