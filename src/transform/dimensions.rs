//! Page size from the root element.

use crate::config::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::svg::SvgDom;

/// Page size in user units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

/// Resolve the page size: `viewBox` first, then `width`/`height`, then the default.
pub fn extract_dimensions(dom: &SvgDom) -> Dimensions {
    let Some(root) = dom.root_element() else {
        return Dimensions::default();
    };

    if let Some([_, _, width, height]) = dom.get_attr(root, "viewBox").and_then(parse_view_box)
        && width > 0.0
        && height > 0.0
    {
        return Dimensions { width, height };
    }

    let width = dom.get_attr(root, "width").and_then(parse_length);
    let height = dom.get_attr(root, "height").and_then(parse_length);
    match (width, height) {
        (Some(width), Some(height)) if width > 0.0 && height > 0.0 => Dimensions { width, height },
        _ => Dimensions::default(),
    }
}

/// Parse `min-x min-y width height`, separated by whitespace and/or commas.
pub fn parse_view_box(value: &str) -> Option<[f64; 4]> {
    let mut numbers = value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().ok().filter(|n| n.is_finite()));

    let mut out = [0.0; 4];
    for slot in &mut out {
        *slot = numbers.next()??;
    }
    numbers.next().is_none().then_some(out)
}

/// A bare number or a number in `px`. Relative and physical units are not sizes here.
fn parse_length(value: &str) -> Option<f64> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value).trim_end();
    number.parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::parse;

    fn dims(markup: &str) -> Dimensions {
        extract_dimensions(&parse(markup).unwrap())
    }

    #[test]
    fn test_view_box_wins() {
        let d = dims(r#"<svg viewBox="0 0 800 600" width="10" height="10"/>"#);
        assert_eq!(d, Dimensions { width: 800.0, height: 600.0 });
    }

    #[test]
    fn test_view_box_with_commas() {
        let d = dims(r#"<svg viewBox="0,0, 320.5,200"/>"#);
        assert_eq!(d, Dimensions { width: 320.5, height: 200.0 });
    }

    #[test]
    fn test_non_positive_view_box_falls_back() {
        let d = dims(r#"<svg viewBox="0 0 0 600" width="100px" height="50"/>"#);
        assert_eq!(d, Dimensions { width: 100.0, height: 50.0 });
    }

    #[test]
    fn test_default_dimensions() {
        assert_eq!(dims("<svg/>"), Dimensions { width: 595.0, height: 842.0 });
        assert_eq!(
            dims(r#"<svg width="100%" height="100%"/>"#),
            Dimensions::default()
        );
        assert_eq!(dims(r#"<svg width="100"/>"#), Dimensions::default());
    }

    #[test]
    fn test_parse_view_box() {
        assert_eq!(parse_view_box("0 0 10 20"), Some([0.0, 0.0, 10.0, 20.0]));
        assert_eq!(parse_view_box("0 0 10"), None);
        assert_eq!(parse_view_box("0 0 10 20 30"), None);
        assert_eq!(parse_view_box("a b c d"), None);
    }
}
