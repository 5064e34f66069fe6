use crate::config::{ScrapeConfig, SourceKind};
use crate::error::{ConfigError, ScrapeError};
use crate::export::{export_records, write_raw_fallback};
use indicatif::{ProgressBar, ProgressStyle};
use leadgather_scanner::{Extraction, HttpPageSource, ListingExtractor, PageDocument, PageSource};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// What a finished run produced.
#[derive(Debug)]
pub struct ScrapeOutcome {
    pub extraction: Extraction,
    /// Export files written, empty when nothing was extracted.
    pub written: Vec<PathBuf>,
    /// Where the raw page went when nothing was extracted.
    pub fallback_path: Option<PathBuf>,
    /// Name of the page source that fetched the page.
    pub source: String,
}

impl ScrapeOutcome {
    /// True when a plain HTTP fetch came back without listings, which usually
    /// means the listings are rendered client-side.
    pub fn suggests_browser(&self) -> bool {
        self.extraction.fallback.is_some() && self.source == "http"
    }
}

/// Build the page source the configuration asks for.
pub fn build_page_source(config: &ScrapeConfig) -> Result<Box<dyn PageSource>, ScrapeError> {
    match config.source {
        SourceKind::Http => Ok(Box::new(HttpPageSource::new(&config.fetch)?)),
        #[cfg(feature = "browser")]
        SourceKind::Browser { visible } => Ok(Box::new(
            leadgather_scanner::BrowserPageSource::new(config.fetch.clone()).with_visible(visible),
        )),
        #[cfg(not(feature = "browser"))]
        SourceKind::Browser { .. } => Err(ConfigError::BrowserUnavailable.into()),
    }
}

/// Fetch the target, extract listings and write the results.
///
/// A fetch or parse failure is returned before anything is written. An empty
/// extraction is not an error: the raw page is saved instead of the exports.
pub async fn execute_scrape(
    config: &ScrapeConfig,
    source: &dyn PageSource,
    show_progress: bool,
) -> Result<ScrapeOutcome, ScrapeError> {
    let extractor = ListingExtractor::new(&config.base_origin)?;

    let spinner = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Fetching {} via {}...", config.target_url, source.name()));
        Some(pb)
    } else {
        None
    };

    let fetched = source.fetch(&config.target_url).await;
    if let Some(ref pb) = spinner {
        pb.finish_and_clear();
    }

    let page = PageDocument::parse(fetched?)?;
    let extraction = extractor.extract(&page);

    fs::create_dir_all(config.output_dir()).map_err(ConfigError::Io)?;

    let mut outcome = ScrapeOutcome {
        extraction,
        written: Vec::new(),
        fallback_path: None,
        source: source.name().to_string(),
    };

    if let Some(ref fallback) = outcome.extraction.fallback {
        let path = config.fallback_path();
        write_raw_fallback(fallback, &path)?;
        outcome.fallback_path = Some(path);
    } else {
        outcome.written = export_records(
            &outcome.extraction.records,
            config.format,
            &config.json_path(),
            &config.csv_path(),
        )?;
    }

    info!(
        "Scrape of {} finished: {} record(s), {} skipped",
        config.target_url,
        outcome.extraction.records.len(),
        outcome.extraction.skipped.len()
    );

    Ok(outcome)
}
