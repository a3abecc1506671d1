//! The browser seam. The orchestrator and extractors drive pages through
//! these traits; production wires in chromiumoxide via `chrome-client`,
//! tests substitute scripted fakes.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

use trendwatch_common::Config;

#[async_trait]
pub trait Page: Send + Sync {
    async fn goto(&self, url: &str) -> Result<()>;

    /// Evaluate a JS expression, returning its JSON value. Extraction
    /// scripts must default missing DOM data inside the script; only
    /// protocol-level failures come back as `Err`.
    async fn eval_json(&self, script: &str) -> Result<serde_json::Value>;

    /// Wait for a selector; `false` means it never appeared, which callers
    /// tolerate by proceeding with whatever the page has.
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> bool;

    async fn screenshot(&self, path: &Path) -> Result<()>;

    async fn close(self: Box<Self>) -> Result<()>;
}

#[async_trait]
pub trait Browser: Send + Sync {
    async fn new_page(&self) -> Result<Box<dyn Page>>;
    async fn close(&self) -> Result<()>;
}

// --- chromiumoxide-backed implementation ---

pub struct ChromeBrowser {
    session: chrome_client::ChromeSession,
}

impl ChromeBrowser {
    pub async fn launch(config: &Config) -> Result<Self> {
        let opts = chrome_client::LaunchOptions {
            headless: config.headless,
            user_agent: config.user_agent.clone(),
            ..Default::default()
        };
        let session = chrome_client::ChromeSession::launch(&opts)
            .await
            .context("Failed to launch headless Chromium")?;
        Ok(Self { session })
    }
}

#[async_trait]
impl Browser for ChromeBrowser {
    async fn new_page(&self) -> Result<Box<dyn Page>> {
        let tab = self.session.new_tab().await?;
        Ok(Box::new(ChromeTabPage { tab }))
    }

    async fn close(&self) -> Result<()> {
        Ok(self.session.close().await?)
    }
}

struct ChromeTabPage {
    tab: chrome_client::ChromeTab,
}

#[async_trait]
impl Page for ChromeTabPage {
    async fn goto(&self, url: &str) -> Result<()> {
        Ok(self.tab.goto(url).await?)
    }

    async fn eval_json(&self, script: &str) -> Result<serde_json::Value> {
        Ok(self.tab.evaluate(script).await?)
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> bool {
        self.tab.wait_for_selector(selector, timeout).await
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        Ok(self.tab.screenshot(path).await?)
    }

    async fn close(self: Box<Self>) -> Result<()> {
        Ok(self.tab.close().await?)
    }
}
