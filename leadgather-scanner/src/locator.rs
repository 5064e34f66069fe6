use crate::cascade::Cascade;
use crate::page::PageDocument;
use scraper::ElementRef;
use tracing::{debug, info};

/// Common listing-container shapes, most specific first.
pub const CONTAINER_SHAPES: &[(&str, &str)] = &[
    ("div", "listing-card"),
    ("div", "listing"),
    ("div", "search-result"),
    ("div", "result"),
    ("article", "listing"),
    ("li", "listing-item"),
    ("div", "card"),
];

/// Attribute that marks a node as carrying a listing identifier.
pub const LISTING_ID_ATTR: &str = "data-listing-id";

/// Substrings searched for in the whole class attribute by the last strategy.
pub const CLASS_HINTS: &[&str] = &["listing", "result"];

/// One way of finding the repeated listing blocks on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockStrategy {
    /// Elements of `tag` whose class list contains `class` as a token.
    TagClass {
        tag: &'static str,
        class: &'static str,
    },
    /// Elements carrying the attribute, whatever their tag.
    Attribute(&'static str),
    /// Every element of the tag.
    Tag(&'static str),
    /// Elements whose lower-cased class attribute contains any of the hints.
    ClassSubstring(&'static [&'static str]),
}

impl BlockStrategy {
    pub fn describe(&self) -> String {
        match self {
            BlockStrategy::TagClass { tag, class } => format!("{}.{}", tag, class),
            BlockStrategy::Attribute(attr) => format!("[{}]", attr),
            BlockStrategy::Tag(tag) => tag.to_string(),
            BlockStrategy::ClassSubstring(hints) => format!("[class*={}]", hints.join("|")),
        }
    }

    fn matches(&self, element: &ElementRef<'_>) -> bool {
        let value = element.value();
        match self {
            BlockStrategy::TagClass { tag, class } => {
                value.name() == *tag && value.classes().any(|c| c == *class)
            }
            BlockStrategy::Attribute(attr) => value.attr(attr).is_some(),
            BlockStrategy::Tag(tag) => value.name() == *tag,
            BlockStrategy::ClassSubstring(hints) => value
                .attr("class")
                .map(|class| {
                    let class = class.to_lowercase();
                    hints.iter().any(|hint| class.contains(hint))
                })
                .unwrap_or(false),
        }
    }

    /// All matching elements of the document, in document order.
    pub fn collect<'a>(&self, page: &'a PageDocument) -> Vec<ElementRef<'a>> {
        page.html()
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|element| self.matches(element))
            .collect()
    }
}

/// Finds listing blocks by decreasing specificity. The first strategy with at
/// least one match supplies every block; results are never mixed.
pub struct BlockLocator {
    cascade: Cascade<BlockStrategy>,
}

impl BlockLocator {
    pub fn new() -> Self {
        let mut strategies: Vec<BlockStrategy> = CONTAINER_SHAPES
            .iter()
            .map(|&(tag, class)| BlockStrategy::TagClass { tag, class })
            .collect();
        strategies.push(BlockStrategy::Attribute(LISTING_ID_ATTR));
        strategies.push(BlockStrategy::Tag("article"));
        strategies.push(BlockStrategy::ClassSubstring(CLASS_HINTS));

        Self::with_strategies(strategies)
    }

    pub fn with_strategies(strategies: Vec<BlockStrategy>) -> Self {
        Self {
            cascade: Cascade::new("block locator", strategies),
        }
    }

    pub fn strategies(&self) -> &[BlockStrategy] {
        self.cascade.rules()
    }

    /// Returns the winning strategy and its blocks, or `None` when nothing matched.
    pub fn locate<'a>(
        &self,
        page: &'a PageDocument,
    ) -> Option<(&BlockStrategy, Vec<ElementRef<'a>>)> {
        let hit = self.cascade.first(|strategy| {
            let blocks = strategy.collect(page);
            debug!("{} -> {} candidate(s)", strategy.describe(), blocks.len());
            (!blocks.is_empty()).then_some(blocks)
        });

        match &hit {
            Some((strategy, blocks)) => {
                info!("Located {} listing block(s) via {}", blocks.len(), strategy.describe())
            }
            None => info!(
                "No listing blocks located on {} after {} strategies",
                page.url(),
                self.strategies().len()
            ),
        }

        hit
    }
}

impl Default for BlockLocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::FetchedPage;
    use url::Url;

    fn doc(body: &str) -> PageDocument {
        let markup = format!("<html><head><title>t</title></head><body>{}</body></html>", body);
        PageDocument::parse(FetchedPage::new(
            Url::parse("https://www.example.com/").unwrap(),
            markup,
        ))
        .unwrap()
    }

    fn located(body: &str) -> Option<(String, usize)> {
        let page = doc(body);
        BlockLocator::new()
            .locate(&page)
            .map(|(strategy, blocks)| (strategy.describe(), blocks.len()))
    }

    #[test]
    fn test_card_shape_wins_over_looser_strategies() {
        let found = located(
            r#"<div class="listing-card featured">A</div>
               <div class="listing-card">B</div>
               <article>C</article>
               <div data-listing-id="9">D</div>"#,
        );
        assert_eq!(found, Some(("div.listing-card".to_string(), 2)));
    }

    #[test]
    fn test_class_match_is_per_token() {
        // "listing-cards" is not the token "listing-card", but does hint "listing"
        let found = located(r#"<div class="listing-cards">A</div>"#);
        assert_eq!(found, Some(("[class*=listing|result]".to_string(), 1)));
    }

    #[test]
    fn test_tag_must_match_for_shape() {
        let found = located(r#"<span class="listing-card">A</span><span class="listing-card">B</span>"#);
        // span shapes are not in the list; falls through to the class substring strategy
        assert_eq!(found, Some(("[class*=listing|result]".to_string(), 2)));
    }

    #[test]
    fn test_attribute_strategy() {
        let found = located(
            r#"<section data-listing-id="1">A</section>
               <li data-listing-id="2">B</li>
               <article>C</article>"#,
        );
        assert_eq!(found, Some(("[data-listing-id]".to_string(), 2)));
    }

    #[test]
    fn test_article_strategy() {
        let found = located(r#"<article>A</article><article>B</article><article>C</article>"#);
        assert_eq!(found, Some(("article".to_string(), 3)));
    }

    #[test]
    fn test_class_substring_is_case_insensitive() {
        let found = located(r#"<div class="SearchResultRow">A</div><div class="BizListingTile">B</div>"#);
        assert_eq!(found, Some(("[class*=listing|result]".to_string(), 2)));
    }

    #[test]
    fn test_nothing_found() {
        assert_eq!(located(r#"<div class="hero">Welcome</div><p>No results</p>"#), None);
    }

    #[test]
    fn test_document_order_preserved() {
        let page = doc(
            r#"<div class="result">first</div>
               <div><div class="result">second</div></div>
               <div class="result">third</div>"#,
        );
        let locator = BlockLocator::new();
        let (_, blocks) = locator.locate(&page).unwrap();
        let texts: Vec<String> = blocks.iter().map(|b| b.text().collect()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_default_strategy_order() {
        let locator = BlockLocator::default();
        let strategies = locator.strategies();
        assert_eq!(strategies.len(), CONTAINER_SHAPES.len() + 3);
        assert_eq!(
            strategies[0],
            BlockStrategy::TagClass {
                tag: "div",
                class: "listing-card"
            }
        );
        assert_eq!(strategies.last(), Some(&BlockStrategy::ClassSubstring(CLASS_HINTS)));
    }
}
