pub mod cascade;
pub mod error;
pub mod extractor;
pub mod fetch;
pub mod locator;
pub mod page;
pub mod record;
pub mod resolver;

#[cfg(feature = "browser")]
pub mod browser;

#[cfg(feature = "browser")]
pub use browser::BrowserPageSource;
pub use error::{ExtractError, ScanError};
pub use extractor::{Extraction, ListingExtractor};
pub use fetch::{FetchConfig, HttpPageSource, PageSource};
pub use page::{FetchedPage, PageDocument};
pub use record::{ListingRecord, RawPageFallback, SkippedListing};
