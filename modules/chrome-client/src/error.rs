use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChromeError>;

#[derive(Debug, Error)]
pub enum ChromeError {
    #[error("Browser launch error: {0}")]
    Launch(String),

    #[error("Page error: {0}")]
    Page(String),

    #[error("Navigation error: {0}")]
    Navigation(String),

    #[error("Evaluation error: {0}")]
    Evaluation(String),

    #[error("Screenshot error: {0}")]
    Screenshot(String),
}
