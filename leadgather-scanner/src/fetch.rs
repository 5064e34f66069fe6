use crate::error::{Result, ScanError};
use crate::page::FetchedPage;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Everything a page source needs to know about how to talk to the site.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    /// Extra request headers, applied in order after the defaults.
    pub headers: Vec<(String, String)>,
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: Vec::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl FetchConfig {
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Browser-like defaults followed by the configured headers. A configured
    /// header replaces a default of the same name.
    pub fn header_map(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let defaults = [
            (
                "accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
            ("accept-language", "en-US,en;q=0.9"),
            ("upgrade-insecure-requests", "1"),
        ];
        for (name, value) in defaults {
            headers.insert(name, HeaderValue::from_static(value));
        }

        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.trim().as_bytes())
                .map_err(|e| ScanError::InvalidHeader(format!("{}: {}", name, e)))?;
            let header_value = HeaderValue::from_str(value.trim())
                .map_err(|e| ScanError::InvalidHeader(format!("{}: {}", name, e)))?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }
}

/// Something that can turn a URL into page markup.
///
/// Implementations differ only in how the markup is obtained; the markup they
/// return is expected to be final, with any client-side rendering already done.
#[async_trait]
pub trait PageSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch(&self, url: &Url) -> Result<FetchedPage>;
}

/// Plain HTTP GET. Cheap, but sees only server-rendered markup.
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(config.header_map()?)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs((config.timeout_secs / 2).max(1)))
            .cookie_store(true)
            .gzip(true)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, url: &Url) -> Result<FetchedPage> {
        info!("Fetching {}", url);

        let start = Instant::now();
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let final_url = response.url().clone();
        debug!("{} answered {} in {:?}", final_url, status, start.elapsed());

        if !status.is_success() {
            warn!("{} returned HTTP {}", url, status.as_u16());
            return Err(ScanError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let markup = response.text().await?;
        info!("Received {} bytes from {}", markup.len(), final_url);

        Ok(FetchedPage::new(final_url, markup))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path},
    };

    #[test]
    fn test_configured_header_overrides_default() {
        let config = FetchConfig::default().with_header("Accept-Language", "de-DE");
        let headers = config.header_map().unwrap();
        assert_eq!(headers.get("accept-language").unwrap(), "de-DE");
        assert!(headers.contains_key("accept"));
    }

    #[test]
    fn test_invalid_header_name_rejected() {
        let config = FetchConfig::default().with_header("bad header", "x");
        assert!(matches!(
            config.header_map(),
            Err(ScanError::InvalidHeader(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_returns_markup_and_sends_headers() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/businesses"))
            .and(header("referer", "https://www.example.com/"))
            .and(header("user-agent", "leadgather-test"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_bytes(b"<html><body><article>x</article></body></html>"),
            )
            .mount(&mock_server)
            .await;

        let config = FetchConfig::default()
            .with_user_agent("leadgather-test")
            .with_header("Referer", "https://www.example.com/");
        let source = HttpPageSource::new(&config).unwrap();
        let url = Url::parse(&format!("{}/businesses", mock_server.uri())).unwrap();

        let page = source.fetch(&url).await.unwrap();
        assert!(page.markup.contains("<article>x</article>"));
        assert_eq!(page.url.path(), "/businesses");
        assert_eq!(source.name(), "http");
    }

    #[tokio::test]
    async fn test_fetch_error_status_is_run_level_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/blocked"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Access Denied"))
            .mount(&mock_server)
            .await;

        let source = HttpPageSource::new(&FetchConfig::default()).unwrap();
        let url = Url::parse(&format!("{}/blocked", mock_server.uri())).unwrap();

        match source.fetch(&url).await {
            Err(ScanError::HttpStatus { status, .. }) => assert_eq!(status, 403),
            other => panic!("expected HttpStatus error, got {:?}", other.map(|p| p.url)),
        }
    }

    #[tokio::test]
    async fn test_fetch_follows_redirects() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(
                ResponseTemplate::new(301)
                    .insert_header("location", format!("{}/new", mock_server.uri()).as_str()),
            )
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>moved</html>"))
            .mount(&mock_server)
            .await;

        let source = HttpPageSource::new(&FetchConfig::default()).unwrap();
        let url = Url::parse(&format!("{}/old", mock_server.uri())).unwrap();

        let page = source.fetch(&url).await.unwrap();
        assert_eq!(page.url.path(), "/new");
        assert!(page.markup.contains("moved"));
    }
}
