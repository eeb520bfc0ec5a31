//! Error types for the glowtype API.
//!
//! [`ApiError`] covers failures surfaced to HTTP callers and renders as an
//! [`ErrorResponse`] body. [`ContentError`] covers startup failures while
//! loading content; those never reach a caller because the server refuses
//! to start. [`ConfigError`] covers invalid command-line or environment
//! settings, also reported before the server binds.

use actix_web::http::{StatusCode, uri::InvalidUri};
use actix_web::{HttpResponse, ResponseError};
use std::io;
use std::path::PathBuf;

use crate::types::ErrorResponse;

/// Errors returned to API callers. Messages are already localized.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body could not be parsed.
    #[error("{0}")]
    BadRequest(String),

    /// The requested resource does not exist.
    #[error("{0}")]
    NotFound(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

/// Errors while loading the content directory.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate glowtype id '{0}' in {file}", file = crate::content::GLOWTYPES_FILE)]
    DuplicateId(String),
}

/// Invalid server settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid allowed origin '{origin}': {source}")]
    InvalidOrigin {
        origin: String,
        #[source]
        source: InvalidUri,
    },
}
