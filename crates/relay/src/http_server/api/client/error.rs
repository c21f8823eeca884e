use reqwest::StatusCode;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("relay URL cannot carry a path: {0}")]
    BaseUrl(Url),
    #[error("HTTP status {0}: {1}")]
    HttpStatus(StatusCode, String),
}

impl ApiError {
    /// The relay answered 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::HttpStatus(status, _) if *status == StatusCode::NOT_FOUND)
    }
}
