use anyhow::Result;
use tracing::info;

use trendwatch_common::types::{PostItem, SnapshotData, TiktokProfile};

use crate::browser::Page;

use super::from_value;

const PROFILE_JS: &str = r#"
(() => {
  const username = document.querySelector('h1.tiktok-arkop9-H1ShareTitle');
  const followers = document.querySelector('strong[data-e2e="followers-count"]');
  const bio = document.querySelector('h2.tiktok-1n8z9r7-H2ShareDesc');
  return {
    username: username ? username.textContent : '',
    followerCount: followers ? followers.textContent : '0',
    bio: bio ? bio.textContent : '',
  };
})()
"#;

const POSTS_JS: &str = r#"
(() => {
  const items = document.querySelectorAll('div[data-e2e="user-post-item"]');
  return Array.from(items).slice(0, 5).map(item => {
    const a = item.querySelector('a');
    const img = item.querySelector('img');
    return { link: a ? a.href : '', thumbnail: img ? img.src : '' };
  });
})()
"#;

/// Scrape a TikTok profile: username, follower count, bio, and up to 5
/// post-grid items. No screenshots in this variant.
pub async fn scrape_tiktok(page: &dyn Page, profile_url: &str) -> Result<SnapshotData> {
    info!(url = profile_url, "Scraping TikTok profile");

    page.goto(profile_url).await?;

    let profile_info: TiktokProfile = from_value(page.eval_json(PROFILE_JS).await?);
    let posts: Vec<PostItem> = from_value(page.eval_json(POSTS_JS).await?);
    info!(
        username = profile_info.username.as_str(),
        posts = posts.len(),
        "TikTok profile extracted"
    );

    Ok(SnapshotData::Tiktok { profile_info, posts })
}
