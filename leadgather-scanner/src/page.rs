use crate::error::{Result, ScanError};
use scraper::{Html, Selector};
use url::Url;

/// Raw markup as handed back by a page source.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: Url,
    pub markup: String,
}

impl FetchedPage {
    pub fn new(url: Url, markup: impl Into<String>) -> Self {
        Self {
            url,
            markup: markup.into(),
        }
    }
}

/// A parsed page. Listing nodes borrow from this and cannot outlive it.
pub struct PageDocument {
    url: Url,
    markup: String,
    html: Html,
}

impl PageDocument {
    /// Parse fetched markup. Whitespace-only bodies are rejected since there is
    /// nothing to extract and nothing worth preserving.
    pub fn parse(page: FetchedPage) -> Result<Self> {
        if page.markup.trim().is_empty() {
            return Err(ScanError::EmptyDocument(page.url.to_string()));
        }

        let html = Html::parse_document(&page.markup);
        Ok(Self {
            url: page.url,
            markup: page.markup,
            html,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The markup exactly as it was fetched.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Trimmed `<title>` text, if the page has a non-empty one.
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.html
            .select(&selector)
            .next()
            .map(|title| title.text().collect::<String>().trim().to_string())
            .filter(|title| !title.is_empty())
    }
}
