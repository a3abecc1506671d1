//! Platform extractors. Each turns a page into `SnapshotData`, degrading
//! missing DOM data to empty defaults; only navigation-level failures
//! surface as errors. Selector fragility is an accepted property of this
//! domain, so every field lookup in the extraction scripts carries an
//! explicit empty fallback.

mod instagram;
mod tiktok;
mod twitter;

pub use instagram::scrape_instagram;
pub use tiktok::scrape_tiktok;
pub use twitter::scrape_twitter;

use std::time::Duration;

use anyhow::Result;
use serde::de::DeserializeOwned;

use trendwatch_common::types::{Creator, Platform, SnapshotData};

use crate::browser::Page;
use crate::pacing::Pacing;
use crate::storage::Store;

/// How long an extractor waits for its anchor selector before proceeding
/// with whatever the page has.
pub(crate) const SELECTOR_TIMEOUT: Duration = Duration::from_secs(10);

/// Dispatch over the closed platform set.
pub async fn extract(
    platform: Platform,
    page: &dyn Page,
    creator: &Creator,
    profile_url: &str,
    store: &Store,
    pacing: &Pacing,
) -> Result<SnapshotData> {
    match platform {
        Platform::Twitter => scrape_twitter(page, creator, profile_url, store, pacing).await,
        Platform::Instagram => scrape_instagram(page, creator, profile_url, store, pacing).await,
        Platform::Tiktok => scrape_tiktok(page, profile_url).await,
    }
}

/// Parse the username from a configured profile URL path
/// (`https://twitter.com/alice` -> `alice`).
pub(crate) fn username_from_url(profile_url: &str) -> String {
    url::Url::parse(profile_url)
        .map(|u| u.path().trim_matches('/').to_string())
        .unwrap_or_default()
}

/// Deserialize an evaluation result, falling back to the type's empty
/// default when the page returned an unexpected shape.
pub(crate) fn from_value<T: DeserializeOwned + Default>(value: serde_json::Value) -> T {
    serde_json::from_value(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_comes_from_the_url_path() {
        assert_eq!(username_from_url("https://twitter.com/alice"), "alice");
        assert_eq!(username_from_url("https://www.instagram.com/alice/"), "alice");
        assert_eq!(username_from_url("https://www.tiktok.com/@alice"), "@alice");
        assert_eq!(username_from_url("not a url"), "");
    }

    #[test]
    fn malformed_eval_results_fall_back_to_default() {
        let tweets: Vec<trendwatch_common::types::Tweet> =
            from_value(serde_json::json!({"oops": true}));
        assert!(tweets.is_empty());

        let null: Vec<String> = from_value(serde_json::Value::Null);
        assert!(null.is_empty());
    }
}
