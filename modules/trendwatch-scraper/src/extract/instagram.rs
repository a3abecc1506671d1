use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use tracing::{debug, info, warn};

use trendwatch_common::types::{Creator, InstagramProfile, Platform, SnapshotData};

use crate::browser::Page;
use crate::pacing::{pause, Pacing};
use crate::storage::Store;

use super::{from_value, username_from_url, SELECTOR_TIMEOUT};

const POST_LINK_SELECTOR: &str = "article a";
const MAX_POST_VISITS: usize = 2;

/// Dismiss the login/cookie modal when it shows up. Best effort; an absent
/// button just returns false.
const MODAL_CLOSE_JS: &str = r#"
(() => {
  const button = document.querySelector('button[aria-label="Close"]');
  if (button) { button.click(); return true; }
  return false;
})()
"#;

const POST_LINKS_JS: &str = r#"
(() => Array.from(document.querySelectorAll('article a')).slice(0, 5).map(a => a.href))()
"#;

/// Profile summary from the og: meta tags, which render without login.
const PROFILE_JS: &str = r#"
(() => {
  const title = document.querySelector('meta[property="og:title"]');
  const description = document.querySelector('meta[property="og:description"]');
  return {
    username: title ? title.content : '',
    description: description ? description.content : '',
  };
})()
"#;

/// Scrape an Instagram profile: og:-derived summary, up to 5 post links,
/// a profile screenshot, and screenshots of the first couple of posts.
pub async fn scrape_instagram(
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
        "Scraping Instagram profile"
    );

    page.goto(profile_url).await?;

    match page.eval_json(MODAL_CLOSE_JS).await {
        Ok(value) if value.as_bool() == Some(true) => {
            debug!("Dismissed login modal");
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
        Ok(_) => {}
        Err(e) => debug!(error = %e, "Modal dismissal failed, continuing"),
    }

    if !page.wait_for_selector(POST_LINK_SELECTOR, SELECTOR_TIMEOUT).await {
        info!(
            username = username.as_str(),
            "No posts visible, login wall or empty profile"
        );
    }

    let post_links: Vec<String> = from_value(page.eval_json(POST_LINKS_JS).await?);
    let profile_info: InstagramProfile = from_value(page.eval_json(PROFILE_JS).await?);
    info!(
        username = username.as_str(),
        posts = post_links.len(),
        "Instagram profile extracted"
    );

    let date = Utc::now().date_naive();
    let profile_shot = store.profile_shot_path(creator, Platform::Instagram, date);
    store.prepare(&profile_shot)?;
    page.screenshot(&profile_shot).await?;

    for (i, link) in post_links.iter().take(MAX_POST_VISITS).enumerate() {
        let shot = store.post_shot_path(creator, Platform::Instagram, date, i);
        match visit_post(page, link, &shot, store).await {
            Ok(()) => info!(path = %shot.display(), "Saved post screenshot"),
            Err(e) => warn!(url = link.as_str(), error = %e, "Failed to capture Instagram post"),
        }
        pause(&pacing.post_gap).await;
    }

    Ok(SnapshotData::Instagram {
        username,
        profile_info,
        post_links,
    })
}

async fn visit_post(
    page: &dyn Page,
    url: &str,
    shot: &std::path::Path,
    store: &Store,
) -> Result<()> {
    page.goto(url).await?;
    store.prepare(shot)?;
    page.screenshot(shot).await
}
