//! Thin wrapper around chromiumoxide: one headless Chromium session per
//! sweep or on-demand request, tabs with navigate/evaluate/screenshot.

pub mod error;

pub use error::{ChromeError, Result};

use std::path::Path;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig, HeadlessMode};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

/// Options for launching the Chromium session.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub headless: bool,
    pub user_agent: String,
    pub window: (u32, u32),
    /// Settle delay applied after each navigation.
    pub settle: Duration,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            headless: true,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
            window: (1280, 800),
            settle: Duration::from_millis(1000),
        }
    }
}

/// A running Chromium instance plus its CDP event handler task.
pub struct ChromeSession {
    browser: Mutex<Option<Browser>>,
    handler: JoinHandle<()>,
    settle: Duration,
}

impl ChromeSession {
    /// Launch headless Chromium. This is the only fatal failure class in
    /// the scraper; everything past launch degrades per unit of work.
    pub async fn launch(opts: &LaunchOptions) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-setuid-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg("--disable-blink-features=AutomationControlled")
            .arg(format!("--user-agent={}", opts.user_agent))
            .window_size(opts.window.0, opts.window.1)
            .request_timeout(Duration::from_secs(30));

        builder = builder.headless_mode(if opts.headless {
            HeadlessMode::True
        } else {
            HeadlessMode::False
        });

        if let Ok(bin) = std::env::var("CHROME_BIN") {
            builder = builder.chrome_executable(bin);
        }

        let config = builder.build().map_err(ChromeError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ChromeError::Launch(e.to_string()))?;

        let handle = tokio::spawn(async move { while handler.next().await.is_some() {} });

        Ok(Self {
            browser: Mutex::new(Some(browser)),
            handler: handle,
            settle: opts.settle,
        })
    }

    pub async fn new_tab(&self) -> Result<ChromeTab> {
        let guard = self.browser.lock().await;
        let browser = guard
            .as_ref()
            .ok_or_else(|| ChromeError::Page("Browser already closed".to_string()))?;
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ChromeError::Page(e.to_string()))?;
        Ok(ChromeTab {
            page,
            settle: self.settle,
        })
    }

    /// Close the browser process. Idempotent; later calls are no-ops.
    pub async fn close(&self) -> Result<()> {
        let mut guard = self.browser.lock().await;
        if let Some(mut browser) = guard.take() {
            browser
                .close()
                .await
                .map_err(|e| ChromeError::Page(e.to_string()))?;
            let _ = browser.wait().await;
            self.handler.abort();
        }
        Ok(())
    }
}

/// A single tab inside the session.
pub struct ChromeTab {
    page: Page,
    settle: Duration,
}

impl ChromeTab {
    pub async fn goto(&self, url: &str) -> Result<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| ChromeError::Navigation(format!("{url}: {e}")))?;
        let _ = self.page.wait_for_navigation().await;
        tokio::time::sleep(self.settle).await;
        Ok(())
    }

    /// Evaluate a JS expression and return its JSON value. Expressions that
    /// yield `undefined` come back as `Value::Null`.
    pub async fn evaluate(&self, script: &str) -> Result<serde_json::Value> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| ChromeError::Evaluation(e.to_string()))?;
        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    /// Poll for a CSS selector until it appears or the timeout elapses.
    /// Returns false on timeout; callers treat a missing selector as
    /// degraded data, not an error.
    pub async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.page.find_element(selector).await.is_ok() {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                debug!(selector, "Timed out waiting for selector");
                return false;
            }
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
    }

    /// Capture a full-page PNG screenshot to `path`.
    pub async fn screenshot(&self, path: &Path) -> Result<()> {
        self.page
            .save_screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .full_page(true)
                    .build(),
                path,
            )
            .await
            .map(|_| ())
            .map_err(|e| ChromeError::Screenshot(format!("{}: {e}", path.display())))
    }

    pub async fn close(self) -> Result<()> {
        self.page
            .close()
            .await
            .map_err(|e| ChromeError::Page(e.to_string()))
    }
}
