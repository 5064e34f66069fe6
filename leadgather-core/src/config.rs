// Run configuration assembled by the CLI

use crate::error::ConfigError;
use crate::export::ExportFormat;
use leadgather_scanner::FetchConfig;
use std::path::{Path, PathBuf};
use url::Url;

pub const DEFAULT_TARGET_URL: &str = "https://www.bizbuysell.com/california-businesses-for-sale/";
pub const DEFAULT_JSON_FILE: &str = "listings.json";
pub const DEFAULT_CSV_FILE: &str = "listings.csv";
pub const DEFAULT_FALLBACK_FILE: &str = "page_source.html";

/// Which page source renders the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Plain HTTP GET
    Http,
    /// Chromium, headless unless `visible`
    Browser { visible: bool },
}

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub target_url: Url,
    /// Origin prepended to relative listing links.
    pub base_origin: String,
    pub fetch: FetchConfig,
    pub source: SourceKind,
    pub format: ExportFormat,
    pub output_dir: PathBuf,
    pub json_file: String,
    pub csv_file: String,
    pub fallback_file: String,
}

impl ScrapeConfig {
    pub fn new(target_url: Url) -> Self {
        let base_origin = origin_of(&target_url);
        Self {
            target_url,
            base_origin,
            fetch: FetchConfig::default(),
            source: SourceKind::Http,
            format: ExportFormat::Both,
            output_dir: PathBuf::from("."),
            json_file: DEFAULT_JSON_FILE.to_string(),
            csv_file: DEFAULT_CSV_FILE.to_string(),
            fallback_file: DEFAULT_FALLBACK_FILE.to_string(),
        }
    }

    pub fn with_base_origin(mut self, origin: &str) -> Result<Self, ConfigError> {
        let parsed = parse_target_url(origin)?;
        self.base_origin = origin_of(&parsed);
        Ok(self)
    }

    pub fn with_fetch(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }

    pub fn with_source(mut self, source: SourceKind) -> Self {
        self.source = source;
        self
    }

    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn json_path(&self) -> PathBuf {
        self.output_dir.join(&self.json_file)
    }

    pub fn csv_path(&self) -> PathBuf {
        self.output_dir.join(&self.csv_file)
    }

    pub fn fallback_path(&self) -> PathBuf {
        self.output_dir.join(&self.fallback_file)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

/// `scheme://host[:port]` of a URL.
pub fn origin_of(url: &Url) -> String {
    url.origin().ascii_serialization()
}

/// Parse a URL, assuming https:// when no scheme is given.
pub fn parse_target_url(input: &str) -> Result<Url, ConfigError> {
    let input = input.trim();
    if let Ok(url) = Url::parse(input)
        && url.has_host()
    {
        return Ok(url);
    }

    Url::parse(&format!("https://{}", input))
        .ok()
        .filter(|url| url.has_host())
        .ok_or_else(|| ConfigError::InvalidUrl(input.to_string()))
}

/// Split a `Name: value` header argument.
pub fn parse_header_arg(raw: &str) -> Result<(String, String), ConfigError> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| ConfigError::InvalidHeader(raw.to_string()))?;
    let name = name.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(ConfigError::InvalidHeader(raw.to_string()));
    }
    Ok((name.to_string(), value.trim().to_string()))
}
