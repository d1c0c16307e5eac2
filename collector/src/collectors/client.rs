use crate::error::ScrapeError;
use reqwest::{
    Client as HttpClient,
    Request,
    StatusCode,
};
use std::time::Duration;

/// What came back from the document server for a single GET.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    /// A failed body read is kept so the caller can still report the status.
    pub body: Result<Vec<u8>, reqwest::Error>,
}

/// Thin wrapper around `reqwest` issuing exactly one attempt per call.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: HttpClient,
}

impl UpstreamClient {
    pub fn new(timeout: Duration, insecure: bool) -> reqwest::Result<Self> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .no_proxy()
            .danger_accept_invalid_certs(insecure)
            .build()?;
        Ok(Self { http })
    }

    pub fn request(&self, uri: &str) -> Result<Request, ScrapeError> {
        self.http
            .get(uri)
            .build()
            .map_err(ScrapeError::RequestConstruction)
    }

    pub async fn execute(&self, request: Request) -> Result<UpstreamResponse, ScrapeError> {
        let response = self
            .http
            .execute(request)
            .await
            .map_err(ScrapeError::Transport)?;
        let status = response.status();
        let body = response.bytes().await.map(|bytes| bytes.to_vec());
        Ok(UpstreamResponse { status, body })
    }
}
