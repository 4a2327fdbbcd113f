//! Calculator source errors.

use f1sync_core::OptimizerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalculatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Calculator page returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Invalid calculator URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// No `self.__next_f.push([1,"..."])` chunk in the page.
    #[error("Could not find self.__next_f.push payload in HTML")]
    PayloadNotFound,

    #[error("Failed to decode __next_f payload: {0}")]
    PayloadDecode(String),

    #[error("Could not locate JSON object start in payload")]
    ObjectNotFound,

    #[error("Unbalanced braces while extracting JSON object")]
    UnbalancedObject,

    #[error("Invalid calculator data: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Optimizer(#[from] OptimizerError),
}
