use std::env;
use std::path::PathBuf;

/// Fixed desktop user agent sent with every page load.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Application configuration loaded from environment variables.
/// Constructed once at startup and passed by reference; never mutated.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the on-disk snapshot/screenshot tree.
    pub storage_path: PathBuf,
    /// Creator registry JSON file.
    pub creators_file: PathBuf,

    // Web server
    pub host: String,
    pub port: u16,

    // Browser
    pub headless: bool,
    pub user_agent: String,
}

impl Config {
    /// Load configuration from environment variables. Every variable has a
    /// working default; only a non-numeric PORT aborts startup.
    pub fn from_env() -> Self {
        Self {
            storage_path: env::var("STORAGE_PATH")
                .unwrap_or_else(|_| "./storage".to_string())
                .into(),
            creators_file: env::var("CREATORS_FILE")
                .unwrap_or_else(|_| "./creators.json".to_string())
                .into(),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a number"),
            // HEADLESS=false keeps a visible browser for debugging
            headless: env::var("HEADLESS").map(|v| v != "false").unwrap_or(true),
            user_agent: env::var("SCRAPER_USER_AGENT")
                .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
        }
    }
}
