//! Embeddable assets: everything in a transfer that is not a page.

pub mod lookup;
mod registry;

pub use lookup::{LookupStrategy, extract_filename, is_embedded};
pub use registry::{AssetRegistry, Resolution, encode_data_url};
