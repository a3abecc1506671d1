use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::types::{Creator, Platform};

/// The creator watch-list plus hashtags to monitor, loaded once at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registry {
    #[serde(default)]
    pub targets: Vec<Creator>,
    #[serde(default)]
    pub hashtags_to_monitor: Vec<String>,
}

/// On-disk wrapper: the registry file nests everything under `data`.
#[derive(Debug, Default, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    data: Registry,
}

impl Registry {
    /// Load the registry from disk. A missing or malformed file degrades to
    /// an empty registry so the process still starts and can serve
    /// on-demand requests.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(registry) => {
                info!(
                    path = %path.display(),
                    creators = registry.targets.len(),
                    hashtags = registry.hashtags_to_monitor.len(),
                    "Creator registry loaded"
                );
                registry
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to load creator registry, starting empty"
                );
                Self::default()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read registry file: {}", path.display()))?;
        let file: RegistryFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse registry file: {}", path.display()))?;
        Ok(file.data)
    }

    /// Look up the creator whose configured profile URL for `platform`
    /// matches `url` (trailing slashes ignored).
    pub fn find_by_profile_url(&self, platform: Platform, url: &str) -> Option<&Creator> {
        let wanted = url.trim_end_matches('/');
        self.targets.iter().find(|creator| {
            creator
                .profile_url(platform)
                .is_some_and(|configured| configured.trim_end_matches('/') == wanted)
        })
    }
}
