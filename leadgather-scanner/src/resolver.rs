use crate::cascade::Cascade;
use crate::error::{ExtractError, Result, ScanError};
use crate::record::ListingRecord;
use scraper::{ElementRef, Selector};
use tracing::trace;
use url::Url;

const TITLE_SELECTORS: &[&str] = &["h2", "h3", "h4", ".listing-title", ".title"];
const PRICE_SELECTORS: &[&str] = &[".price", ".listing-price", ".asking-price"];
const LOCATION_SELECTORS: &[&str] = &[".location", ".listing-location"];
const DESCRIPTION_SELECTORS: &[&str] = &[".description", ".listing-description", ".summary", "p"];

const REVENUE_MARKERS: &[&str] = &["revenue", "sales"];
const CASH_FLOW_MARKERS: &[&str] = &["cash flow"];

/// How a single field finds its node inside a listing block.
pub enum Locator {
    /// First descendant matching a CSS selector.
    Css(Selector),
    /// First descendant whose lower-cased class attribute contains the word.
    ClassContains(&'static str),
}

impl Locator {
    fn css(selector: &str) -> Result<Self> {
        Selector::parse(selector)
            .map(Locator::Css)
            .map_err(|_| ScanError::Selector(selector.to_string()))
    }

    pub fn find<'a>(&self, node: ElementRef<'a>) -> Option<ElementRef<'a>> {
        match self {
            Locator::Css(selector) => node.select(selector).next(),
            Locator::ClassContains(word) => node
                .descendants()
                .skip(1)
                .filter_map(ElementRef::wrap)
                .find(|element| {
                    element
                        .value()
                        .attr("class")
                        .is_some_and(|class| class.to_lowercase().contains(word))
                }),
        }
    }
}

fn field_cascade(
    label: &'static str,
    selectors: &[&str],
    class_word: Option<&'static str>,
) -> Result<Cascade<Locator>> {
    let mut locators = selectors
        .iter()
        .map(|selector| Locator::css(selector))
        .collect::<Result<Vec<_>>>()?;
    if let Some(word) = class_word {
        locators.push(Locator::ClassContains(word));
    }
    Ok(Cascade::new(label, locators))
}

/// Resolves the semantic fields of one listing block.
pub struct FieldResolver {
    base_origin: Url,
    title: Cascade<Locator>,
    price: Cascade<Locator>,
    location: Cascade<Locator>,
    description: Cascade<Locator>,
    anchor: Selector,
}

impl FieldResolver {
    /// `base_origin` is what relative listing links get prefixed with,
    /// e.g. `https://www.example.com`.
    pub fn new(base_origin: &str) -> Result<Self> {
        let base_origin = Url::parse(base_origin)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", base_origin, e)))?;

        Ok(Self {
            base_origin,
            title: field_cascade("title", TITLE_SELECTORS, Some("title"))?,
            price: field_cascade("price", PRICE_SELECTORS, Some("price"))?,
            location: field_cascade("location", LOCATION_SELECTORS, Some("location"))?,
            description: field_cascade("description", DESCRIPTION_SELECTORS, None)?,
            anchor: Selector::parse("a[href]")
                .map_err(|_| ScanError::Selector("a[href]".to_string()))?,
        })
    }

    /// Base origin without a trailing slash.
    pub fn base_origin(&self) -> String {
        self.base_origin.origin().ascii_serialization()
    }

    pub fn resolve(&self, node: ElementRef<'_>, index: usize) -> std::result::Result<ListingRecord, ExtractError> {
        let mut record = ListingRecord::empty(index);

        if let Some(title) = first_element(&self.title, node) {
            record.title = trimmed_text(title);
            if let Some(href) = self.title_href(title) {
                record.link = self.resolve_link(href)?;
            }
        }

        record.price = first_text(&self.price, node);
        record.location = first_text(&self.location, node);
        record.description = first_text(&self.description, node);
        record.revenue = marked_text(node, REVENUE_MARKERS);
        record.cash_flow = marked_text(node, CASH_FLOW_MARKERS);

        trace!("Resolved listing {}: {:?}", index, record.title);
        Ok(record)
    }

    /// The title node's own href if it is a link, otherwise the first link inside it.
    fn title_href<'a>(&self, title: ElementRef<'a>) -> Option<&'a str> {
        if title.value().name() == "a"
            && let Some(href) = title.value().attr("href")
        {
            return Some(href);
        }
        title
            .select(&self.anchor)
            .next()
            .and_then(|anchor| anchor.value().attr("href"))
    }

    /// Turn an href into an absolute URL string.
    ///
    /// Hrefs that already carry a scheme are returned as written once they are
    /// known to parse. Protocol-relative hrefs borrow the base scheme; anything
    /// else is appended to the base origin.
    pub fn resolve_link(&self, href: &str) -> std::result::Result<String, ExtractError> {
        let href = href.trim();
        if href.is_empty() {
            return Ok(String::new());
        }

        let malformed = |e: url::ParseError| ExtractError::MalformedLink {
            href: href.to_string(),
            reason: e.to_string(),
        };

        if has_scheme(href) {
            Url::parse(href).map_err(malformed)?;
            return Ok(href.to_string());
        }

        let resolved = if href.starts_with("//") {
            format!("{}:{}", self.base_origin.scheme(), href)
        } else if href.starts_with('/') {
            format!("{}{}", self.base_origin(), href)
        } else {
            format!("{}/{}", self.base_origin(), href)
        };

        Url::parse(&resolved).map_err(malformed)?;
        Ok(resolved)
    }
}

/// `scheme:` prefix per RFC 3986: a letter followed by letters, digits, `+`, `-` or `.`.
fn has_scheme(href: &str) -> bool {
    let Some((scheme, _)) = href.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn first_element<'a>(cascade: &Cascade<Locator>, node: ElementRef<'a>) -> Option<ElementRef<'a>> {
    cascade
        .first(|locator| locator.find(node))
        .map(|(_, element)| element)
}

fn first_text(cascade: &Cascade<Locator>, node: ElementRef<'_>) -> String {
    first_element(cascade, node)
        .map(trimmed_text)
        .unwrap_or_default()
}

fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Text of the first descendant text node mentioning one of the markers.
///
/// The whole-block check runs first so blocks without any marker skip the
/// per-node scan. Matching is by substring only, so an unrelated sentence that
/// happens to say "sales" is picked up as revenue.
fn marked_text(node: ElementRef<'_>, markers: &[&str]) -> String {
    let full_text = node.text().collect::<String>().to_lowercase();
    if !markers.iter().any(|marker| full_text.contains(marker)) {
        return String::new();
    }

    node.descendants()
        .filter_map(|child| child.value().as_text())
        .find(|text| {
            let lowered = text.to_lowercase();
            markers.iter().any(|marker| lowered.contains(marker))
        })
        .map(|text| text.trim().to_string())
        .unwrap_or_default()
}
