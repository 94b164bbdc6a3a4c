use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("Rate limit exceeded. Try again later.")]
    QuotaExceeded,

    #[error("Repository not found.")]
    RepoNotFound,

    #[error("No files found in the repository or unable to fetch content.")]
    NoFilesFound,

    #[error("GitHub API error ({status}): {message}")]
    GitHub { status: u16, message: String },

    #[error("Gemini API error: {0}")]
    Inference(String),

    #[error("Upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::QuotaExceeded => StatusCode::TOO_MANY_REQUESTS,
            Error::RepoNotFound => StatusCode::NOT_FOUND,
            Error::NoFilesFound
            | Error::GitHub { .. }
            | Error::Inference(_)
            | Error::Http(_) => StatusCode::BAD_GATEWAY,
            Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(serde_json::json!({ "detail": self.to_string() }));
        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
