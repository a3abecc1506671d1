//! Filesystem layout and snapshot persistence.
//!
//! `{base}/{creator_with_underscores}/{images|posts|videos}/` for creators,
//! `{base}/hashtags/` for hashtag search captures. Snapshot filenames are
//! date-stamped, not content-addressed: scraping the same creator twice on
//! one calendar day overwrites the same file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;

use trendwatch_common::types::{Creator, Platform, Snapshot};

const CONTENT_DIRS: [&str; 3] = ["images", "posts", "videos"];

#[derive(Debug, Clone)]
pub struct Store {
    base: PathBuf,
}

impl Store {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Create the full directory tree for every registered creator.
    /// Idempotent and safe to repeat; `create_dir_all` tolerates existing
    /// directories and concurrent callers.
    pub fn ensure_dirs(&self, creators: &[Creator]) -> Result<()> {
        fs::create_dir_all(&self.base)
            .with_context(|| format!("Failed to create storage root: {}", self.base.display()))?;
        for creator in creators {
            let dir = self.creator_dir(creator);
            for sub in CONTENT_DIRS {
                fs::create_dir_all(dir.join(sub))
                    .with_context(|| format!("Failed to create {}/{sub}", dir.display()))?;
            }
        }
        Ok(())
    }

    pub fn creator_dir(&self, creator: &Creator) -> PathBuf {
        self.base.join(dir_key(&creator.name))
    }

    /// `posts/{platform}_{YYYY-MM-DD}.json`
    pub fn snapshot_path(&self, creator: &Creator, platform: Platform, date: NaiveDate) -> PathBuf {
        self.creator_dir(creator)
            .join("posts")
            .join(format!("{platform}_{date}.json"))
    }

    /// `images/{platform}_{YYYY-MM-DD}_{post}_{media}.png`
    pub fn media_shot_path(
        &self,
        creator: &Creator,
        platform: Platform,
        date: NaiveDate,
        post_idx: usize,
        media_idx: usize,
    ) -> PathBuf {
        self.creator_dir(creator)
            .join("images")
            .join(format!("{platform}_{date}_{post_idx}_{media_idx}.png"))
    }

    /// `images/{platform}_profile_{YYYY-MM-DD}.png`
    pub fn profile_shot_path(
        &self,
        creator: &Creator,
        platform: Platform,
        date: NaiveDate,
    ) -> PathBuf {
        self.creator_dir(creator)
            .join("images")
            .join(format!("{platform}_profile_{date}.png"))
    }

    /// `images/{platform}_post_{YYYY-MM-DD}_{idx}.png`
    pub fn post_shot_path(
        &self,
        creator: &Creator,
        platform: Platform,
        date: NaiveDate,
        idx: usize,
    ) -> PathBuf {
        self.creator_dir(creator)
            .join("images")
            .join(format!("{platform}_post_{date}_{idx}.png"))
    }

    /// `hashtags/{tag}_{YYYY-MM-DD}.png` with the `#` stripped from the tag.
    pub fn hashtag_shot_path(&self, tag: &str, date: NaiveDate) -> PathBuf {
        self.base
            .join("hashtags")
            .join(format!("{}_{date}.png", tag.trim_start_matches('#')))
    }

    /// Ensure the parent directory of a screenshot target exists.
    pub fn prepare(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        Ok(())
    }

    /// Write the per-day JSON snapshot. Same-day rewrites overwrite in
    /// place; writes are sequenced by the orchestrator, and concurrent
    /// same-path writers get last-write-wins.
    pub fn write_snapshot(&self, creator: &Creator, snapshot: &Snapshot) -> Result<PathBuf> {
        let path = self.snapshot_path(creator, snapshot.data.platform(), snapshot.date.date_naive());
        self.prepare(&path)?;
        let json = serde_json::to_string_pretty(snapshot)
            .context("Failed to serialize snapshot")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write snapshot: {}", path.display()))?;
        Ok(path)
    }
}

/// Directory key for a creator name: whitespace runs become underscores.
fn dir_key(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("_")
}
