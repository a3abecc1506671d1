use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use trendwatch_common::types::{Creator, Platform, Snapshot, SnapshotData};
use trendwatch_common::{Registry, ScrapeError};
use trendwatch_scraper::browser::{Browser, ChromeBrowser};
use trendwatch_scraper::extract;
use trendwatch_scraper::pacing::Pacing;

use crate::AppState;

pub async fn health() -> &'static str {
    "Social Trend Scraper API is running"
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub creator_url: Option<String>,
}

/// On-demand scrape of a single creator/platform. Validation happens
/// before any browser is launched; the scrape itself runs in an
/// independent browser instance, isolated from scheduled sweeps.
pub async fn scrape(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ScrapeRequest>,
) -> impl IntoResponse {
    let (platform, creator, profile_url) = match validate(&state.registry, &req) {
        Ok(checked) => checked,
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "message": message })),
            )
                .into_response();
        }
    };

    info!(platform = %platform, url = profile_url.as_str(), "Received scrape request");

    match scrape_one(&state, platform, &creator, &profile_url).await {
        Ok(data) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "platform": platform,
                "creatorUrl": profile_url,
                "data": data,
            })),
        )
            .into_response(),
        Err(e) => {
            warn!(platform = %platform, url = profile_url.as_str(), error = %e, "On-demand scrape failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "message": format!("Error: {e}") })),
            )
                .into_response()
        }
    }
}

/// Check the request body against the registry. Returns the creator to
/// scrape or a client-facing message for the 400 response.
fn validate(registry: &Registry, req: &ScrapeRequest) -> Result<(Platform, Creator, String), String> {
    let platform_raw = req.platform.as_deref().unwrap_or("").trim();
    let url = req.creator_url.as_deref().unwrap_or("").trim();

    if platform_raw.is_empty() || url.is_empty() {
        return Err("Missing platform or creatorUrl in request body".to_string());
    }

    let platform: Platform = platform_raw
        .parse()
        .map_err(|_| format!("Unsupported platform: {platform_raw}"))?;

    let creator = registry
        .find_by_profile_url(platform, url)
        .ok_or_else(|| format!("Unknown creator for {platform} profile: {url}"))?;

    Ok((platform, creator.clone(), url.to_string()))
}

async fn scrape_one(
    state: &AppState,
    platform: Platform,
    creator: &Creator,
    profile_url: &str,
) -> anyhow::Result<SnapshotData> {
    let browser = ChromeBrowser::launch(&state.config).await?;

    let result = run_extract(&browser, state, platform, creator, profile_url).await;

    if let Err(e) = browser.close().await {
        warn!(error = %e, "Failed to close browser");
    }
    result
}

async fn run_extract(
    browser: &dyn Browser,
    state: &AppState,
    platform: Platform,
    creator: &Creator,
    profile_url: &str,
) -> anyhow::Result<SnapshotData> {
    let page = browser.new_page().await?;
    let extracted = extract::extract(
        platform,
        &*page,
        creator,
        profile_url,
        &state.store,
        &Pacing::default(),
    )
    .await;
    if let Err(e) = page.close().await {
        warn!(error = %e, "Failed to close page");
    }

    let snapshot = Snapshot {
        date: chrono::Utc::now(),
        data: extracted.map_err(|e| ScrapeError::Scraping(e.to_string()))?,
    };
    state.store.write_snapshot(creator, &snapshot)?;
    Ok(snapshot.data)
}
