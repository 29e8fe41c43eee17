//! Error type shared by the news and completion clients.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("news API error ({code}): {message}")]
    NewsApi { code: String, message: String },

    #[error("completion API error (status {status}): {body}")]
    Completion { status: StatusCode, body: String },

    #[error("completion response contained no choices")]
    EmptyCompletion,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
