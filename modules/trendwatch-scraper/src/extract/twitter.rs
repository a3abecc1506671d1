use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use trendwatch_common::types::{Creator, Platform, SnapshotData, Tweet};

use crate::browser::Page;
use crate::pacing::{pause, Pacing};
use crate::storage::Store;

use super::{from_value, username_from_url, SELECTOR_TIMEOUT};

const TWEET_SELECTOR: &str = r#"article[data-testid="tweet"]"#;

/// Pull up to the 10 most recent tweet articles. Every lookup inside the
/// script defaults to empty so a changed layout degrades data quality
/// instead of aborting the batch.
const TWEETS_JS: &str = r#"
(() => {
  const articles = document.querySelectorAll('article[data-testid="tweet"]');
  return Array.from(articles).slice(0, 10).map(article => {
    const textEl = article.querySelector('div[data-testid="tweetText"]');
    const timeEl = article.querySelector('time');
    const media = article.querySelectorAll('img[src*="media"]');
    const stats = article.querySelectorAll('div[data-testid$="-count"]');
    return {
      text: textEl ? textEl.textContent : '',
      timestamp: timeEl ? (timeEl.getAttribute('datetime') || '') : '',
      mediaUrls: Array.from(media).map(img => img.src),
      stats: Array.from(stats).map(el => el.textContent),
    };
  });
})()
"#;

/// Scrape the most recent tweets from a public profile, screenshotting any
/// attached media along the way.
pub async fn scrape_twitter(
    page: &dyn Page,
    creator: &Creator,
    profile_url: &str,
    store: &Store,
    pacing: &Pacing,
) -> Result<SnapshotData> {
    let username = username_from_url(profile_url);
    info!(
        creator = creator.name.as_str(),
        username = username.as_str(),
        "Scraping Twitter profile"
    );

    page.goto(&format!("https://twitter.com/{username}")).await?;

    if !page.wait_for_selector(TWEET_SELECTOR, SELECTOR_TIMEOUT).await {
        info!(
            username = username.as_str(),
            "No tweets visible, login wall or empty profile"
        );
    }

    let tweets: Vec<Tweet> = from_value(page.eval_json(TWEETS_JS).await?);
    info!(username = username.as_str(), tweets = tweets.len(), "Tweets extracted");

    // Each media URL is loaded as a page and captured, with a randomized
    // pause between downloads to keep request pacing low.
    let date = Utc::now().date_naive();
    for (i, tweet) in tweets.iter().enumerate() {
        for (j, media_url) in tweet.media_urls.iter().enumerate() {
            let shot = store.media_shot_path(creator, Platform::Twitter, date, i, j);
            match capture_media(page, media_url, &shot, store).await {
                Ok(()) => info!(path = %shot.display(), "Saved tweet media"),
                Err(e) => warn!(url = media_url.as_str(), error = %e, "Failed to capture tweet media"),
            }
            pause(&pacing.media_gap).await;
        }
    }

    Ok(SnapshotData::Twitter { username, tweets })
}

async fn capture_media(
    page: &dyn Page,
    url: &str,
    shot: &std::path::Path,
    store: &Store,
) -> Result<()> {
    page.goto(url).await?;
    store.prepare(shot)?;
    page.screenshot(shot).await
}
