//! Document/asset split.

use super::traverse::RawFile;

/// Media type of page documents.
pub const SVG_MEDIA_TYPE: &str = "image/svg+xml";

/// Extension of page documents, compared case-insensitively.
pub const SVG_EXTENSION: &str = ".svg";

/// Whether a file becomes a page rather than an embeddable asset.
pub fn is_document(name: &str, media_type: Option<&str>) -> bool {
    if media_type.is_some_and(|mt| mt.eq_ignore_ascii_case(SVG_MEDIA_TYPE)) {
        return true;
    }
    name.len() >= SVG_EXTENSION.len()
        && name.is_char_boundary(name.len() - SVG_EXTENSION.len())
        && name[name.len() - SVG_EXTENSION.len()..].eq_ignore_ascii_case(SVG_EXTENSION)
}

/// Split files into `(documents, assets)`, keeping relative order.
pub fn partition(files: Vec<RawFile>) -> (Vec<RawFile>, Vec<RawFile>) {
    files
        .into_iter()
        .partition(|f| is_document(f.name(), f.media_type()))
}
