use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;

/// The closed set of platforms the scraper knows how to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    Instagram,
    Tiktok,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Twitter, Platform::Instagram, Platform::Tiktok];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Twitter => "twitter",
            Platform::Instagram => "instagram",
            Platform::Tiktok => "tiktok",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "twitter" | "x" => Ok(Platform::Twitter),
            "instagram" => Ok(Platform::Instagram),
            "tiktok" => Ok(Platform::Tiktok),
            other => Err(ScrapeError::Validation(format!(
                "Unsupported platform: {other}"
            ))),
        }
    }
}

/// Per-platform entry in a creator's configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformProfile {
    pub profile_url: String,
}

/// A configured person/account to monitor across platforms.
/// Immutable once loaded; the name doubles as the storage directory key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub name: String,
    #[serde(default)]
    pub platforms: BTreeMap<Platform, PlatformProfile>,
}

impl Creator {
    pub fn profile_url(&self, platform: Platform) -> Option<&str> {
        self.platforms.get(&platform).map(|p| p.profile_url.as_str())
    }
}

/// One tweet as scraped from a profile timeline. Every field degrades to
/// its empty default when the corresponding DOM element is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tweet {
    #[serde(default)]
    pub text: String,
    /// ISO-8601 timestamp taken from the `datetime` attribute.
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub media_urls: Vec<String>,
    /// Raw engagement-stat strings, not parsed into numbers.
    #[serde(default)]
    pub stats: Vec<String>,
}

/// Profile summary derived from Instagram's og: meta tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstagramProfile {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TiktokProfile {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub follower_count: String,
    #[serde(default)]
    pub bio: String,
}

/// A post-grid entry: link plus thumbnail URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostItem {
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub thumbnail: String,
}

/// The platform-tagged payload of one scrape. Round-trips losslessly
/// through the snapshot JSON format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "platform", rename_all = "lowercase")]
pub enum SnapshotData {
    #[serde(rename_all = "camelCase")]
    Twitter {
        username: String,
        #[serde(default)]
        tweets: Vec<Tweet>,
    },
    #[serde(rename_all = "camelCase")]
    Instagram {
        username: String,
        profile_info: InstagramProfile,
        #[serde(default)]
        post_links: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    Tiktok {
        profile_info: TiktokProfile,
        #[serde(default)]
        posts: Vec<PostItem>,
    },
}

impl SnapshotData {
    pub fn platform(&self) -> Platform {
        match self {
            SnapshotData::Twitter { .. } => Platform::Twitter,
            SnapshotData::Instagram { .. } => Platform::Instagram,
            SnapshotData::Tiktok { .. } => Platform::Tiktok,
        }
    }
}

/// The per-day JSON record of one creator/platform scrape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub date: DateTime<Utc>,
    #[serde(flatten)]
    pub data: SnapshotData,
}

/// Outcome of one unit of scrape work: a success flag plus a free-text
/// message. There are no structured error codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<SnapshotData>,
}

impl ExtractionResult {
    pub fn ok(data: SnapshotData) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}
