//! Chromium-backed page source for listings that only appear after client-side
//! rendering. Compiled with the `browser` feature.

use crate::error::{Result, ScanError};
use crate::fetch::{FetchConfig, PageSource};
use crate::page::FetchedPage;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{Headers, SetExtraHttpHeadersParams};
use futures::StreamExt;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Time given to scripts after navigation completes before the DOM is read.
const SETTLE_DELAY: Duration = Duration::from_secs(3);

pub struct BrowserPageSource {
    config: FetchConfig,
    visible: bool,
}

impl BrowserPageSource {
    pub fn new(config: FetchConfig) -> Self {
        Self {
            config,
            visible: false,
        }
    }

    /// Show the browser window instead of running headless.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    fn browser_config(&self) -> Result<BrowserConfig> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg(format!("--user-agent={}", self.config.user_agent));
        if self.visible {
            builder = builder.with_head();
        }
        builder.build().map_err(ScanError::Browser)
    }

    async fn render(&self, browser: &Browser, url: &Url) -> Result<FetchedPage> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScanError::Browser(e.to_string()))?;

        if !self.config.headers.is_empty() {
            let headers: serde_json::Map<String, serde_json::Value> = self
                .config
                .headers
                .iter()
                .map(|(name, value)| (name.clone(), serde_json::Value::String(value.clone())))
                .collect();
            page.execute(SetExtraHttpHeadersParams::new(Headers::new(
                serde_json::Value::Object(headers),
            )))
            .await
            .map_err(|e| ScanError::Browser(e.to_string()))?;
        }

        page.goto(url.as_str())
            .await
            .map_err(|e| ScanError::Browser(e.to_string()))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| ScanError::Browser(e.to_string()))?;

        debug!("Waiting {:?} for scripts to settle", SETTLE_DELAY);
        tokio::time::sleep(SETTLE_DELAY).await;

        let markup = page
            .content()
            .await
            .map_err(|e| ScanError::Browser(e.to_string()))?;
        let final_url = page
            .url()
            .await
            .ok()
            .flatten()
            .and_then(|u| Url::parse(&u).ok())
            .unwrap_or_else(|| url.clone());

        if let Err(e) = page.close().await {
            warn!("Failed to close page: {}", e);
        }

        Ok(FetchedPage::new(final_url, markup))
    }
}

#[async_trait]
impl PageSource for BrowserPageSource {
    fn name(&self) -> &str {
        "browser"
    }

    async fn fetch(&self, url: &Url) -> Result<FetchedPage> {
        info!(
            "Rendering {} in {} Chromium",
            url,
            if self.visible { "visible" } else { "headless" }
        );

        let (mut browser, mut handler) = Browser::launch(self.browser_config()?)
            .await
            .map_err(|e| ScanError::Browser(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let budget = Duration::from_secs(self.config.timeout_secs);
        let rendered = match tokio::time::timeout(budget, self.render(&browser, url)).await {
            Ok(result) => result,
            Err(_) => Err(ScanError::Timeout(self.config.timeout_secs)),
        };

        if let Err(e) = browser.close().await {
            warn!("Failed to close browser: {}", e);
        }
        let _ = browser.wait().await;
        handler_task.abort();

        let page = rendered?;
        info!("Rendered {} bytes from {}", page.markup.len(), page.url);
        Ok(page)
    }
}
