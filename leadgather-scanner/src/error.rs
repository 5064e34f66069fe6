use thiserror::Error;

/// Run-level failures. Any of these ends the run before extraction starts.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTTP {status} returned by {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Timed out after {0} seconds")]
    Timeout(u64),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Empty document returned by {0}")]
    EmptyDocument(String),

    #[error("Invalid selector '{0}'")]
    Selector(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;

/// Failure while resolving the fields of a single listing. The listing is skipped,
/// the rest of the page is still processed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("malformed link '{href}': {reason}")]
    MalformedLink { href: String, reason: String },
}
