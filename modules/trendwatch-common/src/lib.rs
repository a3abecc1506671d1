pub mod config;
pub mod error;
pub mod registry;
pub mod types;

pub use config::Config;
pub use error::ScrapeError;
pub use registry::Registry;
pub use types::*;
