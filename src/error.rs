//! Error types for svgbook operations.
//!
//! Failures fall into two categories that are never unified:
//!
//! - [`IngestError`] is fatal. Traversal, directory listing and raw document
//!   reads abort the whole ingestion and no partial book is produced.
//! - [`AssetError`] and [`ParseError`] are recoverable. They degrade a single
//!   asset or document and the pipeline carries on.
//!
//! A reference that matches no registered asset is not an error at all; the
//! lookup simply returns `None` and the reference is left as written.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal ingestion failure. Surfaced once to the caller; no state changes.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("failed to list directory {path}: {source}")]
    Listing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read document {name}: {source}")]
    DocumentRead {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("document task for {name} did not complete: {reason}")]
    Task { name: String, reason: String },
}

/// One asset could not be read. Logged, and the asset is left out of the registry.
#[derive(Error, Debug)]
#[error("failed to read asset {name}: {source}")]
pub struct AssetError {
    pub name: String,
    #[source]
    pub source: io::Error,
}

/// Structured parse of a document failed. The document falls back to textual processing.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("XML syntax error at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("unexpected closing tag </{found}>, expected </{expected}>")]
    MismatchedEnd { expected: String, found: String },

    #[error("closing tag </{0}> has no matching start tag")]
    UnmatchedEnd(String),

    #[error("element <{0}> is never closed")]
    Unclosed(String),

    #[error("document has no root element")]
    NoRoot,

    #[error("content outside the root element")]
    ContentOutsideRoot,

    #[error("unknown entity reference &{0};")]
    UnknownEntity(String),

    #[error("invalid escape sequence: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),
}

/// Invalid configuration value.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got {value:?}")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

pub type Result<T> = std::result::Result<T, IngestError>;
