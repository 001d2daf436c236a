//! Error types for multipage operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while discovering pages or generating their HTML.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot read template {}: {source}", path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot list pages in {}: {source}", root.display())]
    PageScan {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("template {template} has no <{anchor}> and no injection marker for required resources")]
    MissingAnchor {
        anchor: &'static str,
        template: String,
    },

    #[error("pages {first:?} and {second:?} both write {filename}")]
    DuplicateOutput {
        filename: String,
        first: String,
        second: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, Error>;
