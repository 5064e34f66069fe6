use leadgather_scanner::ScanError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid URL '{0}'")]
    InvalidUrl(String),

    #[error("Invalid header '{0}', expected 'Name: value'")]
    InvalidHeader(String),

    #[error("Unknown export format '{0}', expected json, csv or both")]
    UnknownFormat(String),

    #[error("Could not parse cURL command: {0}")]
    Curl(String),

    #[error("Browser rendering requested but leadgather was built without the 'browser' feature")]
    BrowserUnavailable,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
