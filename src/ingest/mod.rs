//! Turning a host transfer into document and asset handles.

pub mod classify;
pub mod traverse;

pub use classify::{SVG_EXTENSION, SVG_MEDIA_TYPE, is_document, partition};
pub use traverse::{RawFile, Transfer, collect_files};
