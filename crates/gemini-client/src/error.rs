use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("provider returned no text candidates")]
    EmptyResponse,
}
