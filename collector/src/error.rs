use reqwest::StatusCode;

/// Why a scrape cycle was aborted.
#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    #[error("error building scraping request: {0}")]
    RequestConstruction(#[source] reqwest::Error),
    #[error("error scraping onlyoffice: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("error reading response body: {0}")]
    Body(#[source] reqwest::Error),
    #[error("not a valid json: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("failed to build metric: {0}")]
    Metric(#[from] prometheus::Error),
}

impl ScrapeError {
    /// Short stable identifier used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            ScrapeError::RequestConstruction(_) => "request",
            ScrapeError::Transport(_) => "transport",
            ScrapeError::Status { .. } => "status",
            ScrapeError::Body(_) => "body",
            ScrapeError::Decode(_) => "decode",
            ScrapeError::Metric(_) => "metric",
        }
    }

    /// The message followed by every underlying cause that it does not
    /// already spell out, e.g. the refused connection behind a transport error.
    pub fn report(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            let cause_message = cause.to_string();
            if !message.contains(&cause_message) {
                message.push_str(": ");
                message.push_str(&cause_message);
            }
            source = cause.source();
        }
        message
    }
}
