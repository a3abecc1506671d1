use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Scraping error: {0}")]
    Scraping(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
