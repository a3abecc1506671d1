//! The sweep orchestrator: one sweep = one full pass over all configured
//! creators and hashtags, strictly sequential. Per-unit failures are
//! logged and counted; they never abort the rest of the sweep.

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use tracing::{error, info, warn};

use trendwatch_common::types::{Creator, ExtractionResult, Platform, Snapshot};
use trendwatch_common::{Config, Registry};

use crate::browser::{Browser, ChromeBrowser, Page};
use crate::extract;
use crate::pacing::{pause, Pacing};
use crate::storage::Store;

const MAX_HASHTAGS: usize = 3;

#[derive(Debug, Default)]
pub struct SweepStats {
    pub creators_processed: u32,
    pub scrapes_attempted: u32,
    pub scrapes_succeeded: u32,
    pub scrapes_failed: u32,
    pub snapshots_written: u32,
    pub hashtags_captured: u32,
    pub hashtags_failed: u32,
}

impl fmt::Display for SweepStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n=== Sweep Complete ===")?;
        writeln!(f, "Creators processed: {}", self.creators_processed)?;
        writeln!(f, "Scrapes attempted:  {}", self.scrapes_attempted)?;
        writeln!(f, "Scrapes succeeded:  {}", self.scrapes_succeeded)?;
        writeln!(f, "Scrapes failed:     {}", self.scrapes_failed)?;
        writeln!(f, "Snapshots written:  {}", self.snapshots_written)?;
        write!(
            f,
            "Hashtags captured:  {} ({} failed)",
            self.hashtags_captured, self.hashtags_failed
        )
    }
}

pub struct Sweeper<'a> {
    registry: &'a Registry,
    store: &'a Store,
    pacing: Pacing,
}

impl<'a> Sweeper<'a> {
    pub fn new(registry: &'a Registry, store: &'a Store, pacing: Pacing) -> Self {
        Self {
            registry,
            store,
            pacing,
        }
    }

    /// Run one sweep against an already-launched browser. Only page
    /// creation failures bubble up; everything below degrades per unit.
    pub async fn run(&self, browser: &dyn Browser) -> Result<SweepStats> {
        let mut stats = SweepStats::default();

        for creator in &self.registry.targets {
            // No configured platforms: nothing to visit, nothing to write.
            if creator.platforms.is_empty() {
                continue;
            }

            info!(creator = creator.name.as_str(), "Processing creator");
            let page = browser
                .new_page()
                .await
                .with_context(|| format!("Failed to open page for {}", creator.name))?;

            for (platform, profile) in &creator.platforms {
                stats.scrapes_attempted += 1;
                let result = self
                    .scrape_one(&*page, creator, *platform, &profile.profile_url)
                    .await;
                if result.success {
                    stats.scrapes_succeeded += 1;
                    stats.snapshots_written += 1;
                } else {
                    stats.scrapes_failed += 1;
                }
                pause(&self.pacing.platform_gap).await;
            }

            if let Err(e) = page.close().await {
                warn!(creator = creator.name.as_str(), error = %e, "Failed to close page");
            }
            stats.creators_processed += 1;
        }

        self.hashtag_pass(browser, &mut stats).await?;

        Ok(stats)
    }

    /// One unit of work: extract, persist, degrade on failure.
    async fn scrape_one(
        &self,
        page: &dyn Page,
        creator: &Creator,
        platform: Platform,
        profile_url: &str,
    ) -> ExtractionResult {
        let extracted = extract::extract(
            platform,
            page,
            creator,
            profile_url,
            self.store,
            &self.pacing,
        )
        .await;

        let data = match extracted {
            Ok(data) => data,
            Err(e) => {
                warn!(
                    creator = creator.name.as_str(),
                    platform = %platform,
                    error = %e,
                    "Extraction failed"
                );
                return ExtractionResult::failed(e.to_string());
            }
        };

        let snapshot = Snapshot {
            date: Utc::now(),
            data,
        };
        match self.store.write_snapshot(creator, &snapshot) {
            Ok(path) => {
                info!(path = %path.display(), "Snapshot written");
                ExtractionResult::ok(snapshot.data)
            }
            Err(e) => {
                warn!(
                    creator = creator.name.as_str(),
                    platform = %platform,
                    error = %e,
                    "Failed to persist snapshot"
                );
                ExtractionResult::failed(e.to_string())
            }
        }
    }

    /// Screenshot the search results for the first few watched hashtags,
    /// all through one shared page.
    async fn hashtag_pass(&self, browser: &dyn Browser, stats: &mut SweepStats) -> Result<()> {
        let tags = &self.registry.hashtags_to_monitor;
        if tags.is_empty() {
            return Ok(());
        }

        info!("Scraping hashtags...");
        let page = browser
            .new_page()
            .await
            .context("Failed to open hashtag page")?;
        let date = Utc::now().date_naive();

        for tag in tags.iter().take(MAX_HASHTAGS) {
            match self.capture_hashtag(&*page, tag, date).await {
                Ok(path) => {
                    info!(tag = tag.as_str(), path = %path.display(), "Hashtag search captured");
                    stats.hashtags_captured += 1;
                }
                Err(e) => {
                    warn!(tag = tag.as_str(), error = %e, "Hashtag capture failed");
                    stats.hashtags_failed += 1;
                }
            }
            pause(&self.pacing.hashtag_gap).await;
        }

        if let Err(e) = page.close().await {
            warn!(error = %e, "Failed to close hashtag page");
        }
        Ok(())
    }

    async fn capture_hashtag(
        &self,
        page: &dyn Page,
        tag: &str,
        date: NaiveDate,
    ) -> Result<PathBuf> {
        let search = url::Url::parse_with_params(
            "https://twitter.com/search",
            &[("q", tag), ("src", "typed_query"), ("f", "top")],
        )?;
        page.goto(search.as_str()).await?;

        let shot = self.store.hashtag_shot_path(tag, date);
        self.store.prepare(&shot)?;
        page.screenshot(&shot).await?;
        Ok(shot)
    }
}

/// Launch a browser, run one full sweep, and always close the browser.
/// Only a launch failure is fatal.
pub async fn run_sweep(registry: &Registry, store: &Store, config: &Config) -> Result<SweepStats> {
    info!("Starting sweep...");
    let browser = ChromeBrowser::launch(config).await?;
    sweep_and_close(&browser, registry, store, Pacing::default()).await
}

/// Run the sweep against `browser` and close it on both success and
/// failure paths.
pub async fn sweep_and_close(
    browser: &dyn Browser,
    registry: &Registry,
    store: &Store,
    pacing: Pacing,
) -> Result<SweepStats> {
    let result = Sweeper::new(registry, store, pacing).run(browser).await;

    if let Err(e) = browser.close().await {
        warn!(error = %e, "Failed to close browser");
    }

    match &result {
        Ok(stats) => info!("Sweep complete. {stats}"),
        Err(e) => error!(error = %e, "Sweep failed"),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBrowser;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::sync::atomic::Ordering;
    use trendwatch_common::types::PlatformProfile;

    fn creator(name: &str, platform: Platform, profile_url: &str) -> Creator {
        let mut platforms = BTreeMap::new();
        platforms.insert(
            platform,
            PlatformProfile {
                profile_url: profile_url.to_string(),
            },
        );
        Creator {
            name: name.to_string(),
            platforms,
        }
    }

    fn registry(targets: Vec<Creator>, hashtags: Vec<&str>) -> Registry {
        Registry {
            targets,
            hashtags_to_monitor: hashtags.into_iter().map(String::from).collect(),
        }
    }

    #[tokio::test]
    async fn creator_without_platforms_gets_no_pages_and_no_files() {
        let idle = Creator {
            name: "Idle Creator".to_string(),
            platforms: BTreeMap::new(),
        };
        let registry = registry(vec![idle], Vec::new());
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::new(tmp.path());
        let browser = FakeBrowser::new();

        let stats = Sweeper::new(&registry, &store, Pacing::none())
            .run(&browser)
            .await
            .unwrap();

        assert_eq!(stats.creators_processed, 0);
        assert_eq!(browser.log.pages_opened.load(Ordering::SeqCst), 0);
        assert!(browser.log.visited().is_empty());
        assert!(!tmp.path().join("Idle_Creator").exists());
    }

    #[tokio::test]
    async fn sweep_writes_dated_twitter_snapshot() {
        let registry = registry(
            vec![creator(
                "Alice",
                Platform::Twitter,
                "https://twitter.com/alice",
            )],
            Vec::new(),
        );
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::new(tmp.path());
        let browser = FakeBrowser::new().respond("data-testid=\"tweet\"", json!([]));

        let stats = Sweeper::new(&registry, &store, Pacing::none())
            .run(&browser)
            .await
            .unwrap();

        assert_eq!(stats.scrapes_succeeded, 1);
        assert_eq!(stats.snapshots_written, 1);

        let date = Utc::now().date_naive();
        let path = tmp
            .path()
            .join("Alice")
            .join("posts")
            .join(format!("twitter_{date}.json"));
        let snapshot: Snapshot =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        match snapshot.data {
            trendwatch_common::types::SnapshotData::Twitter { username, tweets } => {
                assert_eq!(username, "alice");
                assert!(tweets.is_empty());
                assert!(tweets.len() <= 10);
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[tokio::test]
    async fn one_failing_creator_does_not_stop_the_sweep() {
        let registry = registry(
            vec![
                creator("Broken", Platform::Twitter, "https://twitter.com/broken"),
                creator("Alice", Platform::Twitter, "https://twitter.com/alice"),
            ],
            Vec::new(),
        );
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::new(tmp.path());
        let browser = FakeBrowser::new()
            .respond("data-testid=\"tweet\"", json!([]))
            .fail_on("twitter.com/broken");

        let stats = sweep_and_close(&browser, &registry, &store, Pacing::none())
            .await
            .unwrap();

        assert_eq!(stats.creators_processed, 2);
        assert_eq!(stats.scrapes_failed, 1);
        assert_eq!(stats.scrapes_succeeded, 1);

        // Alice still got her snapshot
        let date = Utc::now().date_naive();
        assert!(tmp
            .path()
            .join("Alice")
            .join("posts")
            .join(format!("twitter_{date}.json"))
            .exists());
        assert!(!tmp.path().join("Broken").join("posts").exists());

        // Every page closed, browser closed exactly once
        assert_eq!(
            browser.log.pages_opened.load(Ordering::SeqCst),
            browser.log.pages_closed.load(Ordering::SeqCst)
        );
        assert_eq!(browser.log.browser_closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn browser_is_closed_even_when_the_sweep_fails() {
        let registry = registry(
            vec![creator(
                "Alice",
                Platform::Twitter,
                "https://twitter.com/alice",
            )],
            Vec::new(),
        );
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::new(tmp.path());
        let browser = FakeBrowser::new().fail_pages();

        let result = sweep_and_close(&browser, &registry, &store, Pacing::none()).await;

        assert!(result.is_err());
        assert_eq!(browser.log.browser_closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn hashtag_pass_captures_at_most_three_tags() {
        let registry = registry(Vec::new(), vec!["#one", "#two", "#three", "#four"]);
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::new(tmp.path());
        let browser = FakeBrowser::new();

        let stats = Sweeper::new(&registry, &store, Pacing::none())
            .run(&browser)
            .await
            .unwrap();

        assert_eq!(stats.hashtags_captured, 3);
        assert_eq!(stats.hashtags_failed, 0);

        let visited = browser.log.visited();
        assert_eq!(visited.len(), 3);
        assert!(visited[0].starts_with("https://twitter.com/search?q=%23one"));

        let date = Utc::now().date_naive();
        let shots = browser.log.screenshots();
        assert!(shots[0].ends_with(format!("hashtags/one_{date}.png")));
        assert!(shots[2].ends_with(format!("hashtags/three_{date}.png")));
    }
}
