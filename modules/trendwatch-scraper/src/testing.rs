//! Scripted fakes for the browser seam, shared by the extractor and sweep
//! tests. Eval responses are keyed by a distinctive substring of the
//! extraction script; navigation failures are keyed by URL substring.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::browser::{Browser, Page};

/// Shared observation log for one fake browser run.
#[derive(Default)]
pub struct FakeLog {
    pub visited: Mutex<Vec<String>>,
    pub screenshots: Mutex<Vec<PathBuf>>,
    pub pages_opened: AtomicUsize,
    pub pages_closed: AtomicUsize,
    pub browser_closed: AtomicUsize,
}

impl FakeLog {
    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }

    pub fn screenshots(&self) -> Vec<PathBuf> {
        self.screenshots.lock().unwrap().clone()
    }
}

pub struct FakeBrowser {
    pub log: Arc<FakeLog>,
    responses: Vec<(String, serde_json::Value)>,
    fail_urls: Vec<String>,
    fail_pages: bool,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self {
            log: Arc::new(FakeLog::default()),
            responses: Vec::new(),
            fail_urls: Vec::new(),
            fail_pages: false,
        }
    }

    /// Return `value` from any eval whose script contains `needle`.
    pub fn respond(mut self, needle: &str, value: serde_json::Value) -> Self {
        self.responses.push((needle.to_string(), value));
        self
    }

    /// Fail navigation for any URL containing `url_part`.
    pub fn fail_on(mut self, url_part: &str) -> Self {
        self.fail_urls.push(url_part.to_string());
        self
    }

    /// Fail every `new_page` call.
    pub fn fail_pages(mut self) -> Self {
        self.fail_pages = true;
        self
    }

    pub fn page(&self) -> FakePage {
        FakePage {
            log: self.log.clone(),
            responses: self.responses.clone(),
            fail_urls: self.fail_urls.clone(),
        }
    }
}

#[async_trait]
impl Browser for FakeBrowser {
    async fn new_page(&self) -> Result<Box<dyn Page>> {
        if self.fail_pages {
            return Err(anyhow!("browser has no pages left"));
        }
        self.log.pages_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(self.page()))
    }

    async fn close(&self) -> Result<()> {
        self.log.browser_closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct FakePage {
    log: Arc<FakeLog>,
    responses: Vec<(String, serde_json::Value)>,
    fail_urls: Vec<String>,
}

#[async_trait]
impl Page for FakePage {
    async fn goto(&self, url: &str) -> Result<()> {
        if self.fail_urls.iter().any(|part| url.contains(part)) {
            return Err(anyhow!("net::ERR_TIMED_OUT loading {url}"));
        }
        self.log.visited.lock().unwrap().push(url.to_string());
        Ok(())
    }

    async fn eval_json(&self, script: &str) -> Result<serde_json::Value> {
        for (needle, value) in &self.responses {
            if script.contains(needle.as_str()) {
                return Ok(value.clone());
            }
        }
        Ok(serde_json::Value::Null)
    }

    async fn wait_for_selector(&self, _selector: &str, _timeout: Duration) -> bool {
        // Fakes answer evals directly; the anchor wait is irrelevant.
        false
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        self.log.screenshots.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.log.pages_closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
