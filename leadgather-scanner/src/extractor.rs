use crate::error::Result;
use crate::locator::BlockLocator;
use crate::page::PageDocument;
use crate::record::{ListingRecord, RawPageFallback, SkippedListing};
use crate::resolver::FieldResolver;
use tracing::{info, warn};

/// Outcome of extracting one page.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub records: Vec<ListingRecord>,
    pub skipped: Vec<SkippedListing>,
    /// Description of the block strategy that matched, if any did.
    pub strategy: Option<String>,
    /// Present only when `records` is empty.
    pub fallback: Option<RawPageFallback>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of blocks the locator handed to the resolver.
    pub fn blocks_found(&self) -> usize {
        self.records.len() + self.skipped.len()
    }
}

pub struct ListingExtractor {
    locator: BlockLocator,
    resolver: FieldResolver,
}

impl ListingExtractor {
    pub fn new(base_origin: &str) -> Result<Self> {
        Ok(Self::with_parts(BlockLocator::new(), FieldResolver::new(base_origin)?))
    }

    pub fn with_parts(locator: BlockLocator, resolver: FieldResolver) -> Self {
        Self { locator, resolver }
    }

    pub fn extract(&self, page: &PageDocument) -> Extraction {
        let mut extraction = Extraction::default();

        if let Some((strategy, blocks)) = self.locator.locate(page) {
            extraction.strategy = Some(strategy.describe());

            for (position, block) in blocks.into_iter().enumerate() {
                let index = position + 1;
                match self.resolver.resolve(block, index) {
                    Ok(record) => extraction.records.push(record),
                    Err(reason) => {
                        warn!("Skipping listing {}: {}", index, reason);
                        extraction.skipped.push(SkippedListing { index, reason });
                    }
                }
            }
        }

        if extraction.is_empty() {
            info!("No listings extracted from {}; keeping raw page", page.url());
            extraction.fallback = Some(RawPageFallback {
                markup: page.markup().to_string(),
                title: page.title(),
            });
        } else {
            info!(
                "Extracted {} listing(s), skipped {}",
                extraction.records.len(),
                extraction.skipped.len()
            );
        }

        extraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractError;
    use crate::page::FetchedPage;
    use url::Url;

    fn page(body: &str) -> PageDocument {
        let markup = format!(
            "<html><head><title> Businesses For Sale </title></head><body>{}</body></html>",
            body
        );
        PageDocument::parse(FetchedPage::new(
            Url::parse("https://www.example.com/ca/").unwrap(),
            markup,
        ))
        .unwrap()
    }

    fn extractor() -> ListingExtractor {
        ListingExtractor::new("https://www.example.com").unwrap()
    }

    #[test]
    fn test_single_card_scenario() {
        let doc = page(
            r#"<div class="listing-card">
                 <h2>Acme Bakery — $250,000</h2>
                 <p>Sales: $500,000 annually</p>
               </div>"#,
        );
        let extraction = extractor().extract(&doc);

        assert_eq!(extraction.records.len(), 1);
        let record = &extraction.records[0];
        assert_eq!(record.index, 1);
        assert_eq!(record.title, "Acme Bakery — $250,000");
        assert_eq!(record.revenue, "Sales: $500,000 annually");
        assert_eq!(record.description, "Sales: $500,000 annually");
        assert!(extraction.fallback.is_none());
        assert_eq!(extraction.strategy.as_deref(), Some("div.listing-card"));
    }

    #[test]
    fn test_record_count_matches_first_strategy_only() {
        let doc = page(
            r#"<div class="listing-card"><h2>One</h2></div>
               <div class="listing-card"><h2>Two</h2></div>
               <article><h2>Not a card</h2></article>
               <div data-listing-id="7"><h2>Also not</h2></div>"#,
        );
        let extraction = extractor().extract(&doc);

        let titles: Vec<&str> = extraction.records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Two"]);
        assert_eq!(extraction.blocks_found(), 2);
    }

    #[test]
    fn test_indices_are_sequential_from_one() {
        let cards: String = (0..5)
            .map(|i| format!(r#"<article><h3>Listing {}</h3></article>"#, i))
            .collect();
        let extraction = extractor().extract(&page(&cards));

        let indices: Vec<usize> = extraction.records.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_malformed_listing_is_skipped_but_sibling_survives() {
        let doc = page(
            r#"<div class="listing"><h2><a href="https://[oops/x">Broken</a></h2></div>
               <div class="listing"><h2><a href="/listing/2">Good Shop</a></h2>
                 <span class="price">$10</span></div>"#,
        );
        let extraction = extractor().extract(&doc);

        assert_eq!(extraction.records.len(), 1);
        let record = &extraction.records[0];
        assert_eq!(record.index, 2);
        assert_eq!(record.title, "Good Shop");
        assert_eq!(record.link, "https://www.example.com/listing/2");
        assert_eq!(record.price, "$10");

        assert_eq!(extraction.skipped.len(), 1);
        assert_eq!(extraction.skipped[0].index, 1);
        assert!(matches!(
            extraction.skipped[0].reason,
            ExtractError::MalformedLink { .. }
        ));
        assert!(extraction.fallback.is_none());
    }

    #[test]
    fn test_no_blocks_produces_fallback() {
        let doc = page(r#"<div id="app"></div><script>window.boot()</script>"#);
        let extraction = extractor().extract(&doc);

        assert!(extraction.is_empty());
        assert!(extraction.strategy.is_none());
        let fallback = extraction.fallback.expect("fallback expected");
        assert_eq!(fallback.markup, doc.markup());
        assert!(!fallback.markup.is_empty());
        assert_eq!(fallback.title.as_deref(), Some("Businesses For Sale"));
    }

    #[test]
    fn test_all_blocks_failing_also_produces_fallback() {
        let doc = page(r#"<article><h2><a href="http://[bad">X</a></h2></article>"#);
        let extraction = extractor().extract(&doc);

        assert!(extraction.records.is_empty());
        assert_eq!(extraction.skipped.len(), 1);
        assert!(extraction.fallback.is_some());
    }
}
