//! Reference normalization and the ordered lookup strategies.
//!
//! A raw reference such as `../img/Logo%20Big.PNG?v=2#frag` is first reduced
//! to a bare filename (`Logo%20Big.PNG`), then tried against the registry
//! with each [`LookupStrategy`] in [`LookupStrategy::ORDER`].

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

/// Reduce a reference to the filename used for registry lookup.
///
/// Returns `None` for empty values, fragment-only references, values that
/// are already embedded (`data:`) and absolute network URLs.
pub fn extract_filename(value: &str) -> Option<&str> {
    let value = value.trim();
    if value.is_empty() || is_embedded(value) || is_network_url(value) {
        return None;
    }

    let value = value.split('#').next().unwrap_or_default();
    let value = value.split('?').next().unwrap_or_default();
    let filename = value
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    (!filename.is_empty()).then_some(filename)
}

/// Whether a reference already carries its data inline.
pub fn is_embedded(value: &str) -> bool {
    starts_with_ignore_case(value.trim_start(), "data:")
}

fn is_network_url(value: &str) -> bool {
    starts_with_ignore_case(value, "http://")
        || starts_with_ignore_case(value, "https://")
        || value.starts_with("//")
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value.len() >= prefix.len()
        && value.is_char_boundary(prefix.len())
        && value[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// Which registry index a strategy consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Index {
    Exact,
    Lowercase,
}

/// One way of turning a filename into a registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStrategy {
    /// The filename as written.
    Exact,
    /// The filename lowercased, against the lowercase index.
    Lowercase,
    /// The percent-decoded filename.
    DecodedExact,
    /// The percent-decoded filename lowercased, against the lowercase index.
    DecodedLowercase,
}

impl LookupStrategy {
    /// Resolution order; the first strategy that hits wins.
    pub const ORDER: [LookupStrategy; 4] = [
        LookupStrategy::Exact,
        LookupStrategy::Lowercase,
        LookupStrategy::DecodedExact,
        LookupStrategy::DecodedLowercase,
    ];

    pub fn index(self) -> Index {
        match self {
            LookupStrategy::Exact | LookupStrategy::DecodedExact => Index::Exact,
            LookupStrategy::Lowercase | LookupStrategy::DecodedLowercase => Index::Lowercase,
        }
    }

    /// The key this strategy looks up for `filename`.
    pub fn key<'a>(self, filename: &'a str) -> Cow<'a, str> {
        match self {
            LookupStrategy::Exact => Cow::Borrowed(filename),
            LookupStrategy::Lowercase => Cow::Owned(filename.to_lowercase()),
            LookupStrategy::DecodedExact => percent_decode_str(filename).decode_utf8_lossy(),
            LookupStrategy::DecodedLowercase => Cow::Owned(
                percent_decode_str(filename)
                    .decode_utf8_lossy()
                    .to_lowercase(),
            ),
        }
    }
}
