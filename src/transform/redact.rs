//! Blur images and mask text under elements tagged for redaction.

use std::collections::HashSet;

use tracing::debug;
use uuid::Uuid;

use crate::config::IngestConfig;
use crate::svg::{Attribute, NodeId, QualName, SvgDom};

/// Replacement for every non-whitespace character of redacted text.
pub const BLOCK_GLYPH: char = '\u{2588}';

/// Whether a `class` value carries the redaction marker.
///
/// The value is split on commas only; matching is a case-insensitive prefix
/// test on each trimmed piece. `class="a redact"` is one piece and does not
/// match.
pub fn is_redaction_class(class: &str, marker: &str) -> bool {
    class
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .any(|v| v.to_lowercase().starts_with(marker))
}

fn is_image(dom: &SvgDom, id: NodeId) -> bool {
    matches!(dom.local_name(id), Some("image" | "img"))
}

/// Apply redaction to every marked element and return how many were marked.
pub fn redact(dom: &mut SvgDom, config: &IngestConfig) -> usize {
    let marked: Vec<NodeId> = dom
        .elements()
        .into_iter()
        .filter(|&id| {
            dom.get_attr(id, "class")
                .is_some_and(|class| is_redaction_class(class, &config.redact_marker))
        })
        .collect();

    if marked.is_empty() {
        return 0;
    }
    let Some(root) = dom.root_element() else {
        return 0;
    };

    let filter_id = format!("redact-blur-{}", Uuid::new_v4());
    let defs = ensure_defs(dom, root);
    let filter = blur_filter(dom, &filter_id, config.blur_radius);
    dom.append(defs, filter);

    let mut images = Vec::new();
    let mut seen = HashSet::new();
    let mut texts = Vec::new();
    for &id in &marked {
        if is_image(dom, id) {
            if seen.insert(id) {
                images.push(id);
            }
            continue;
        }
        for node in dom.descendants(id) {
            if is_image(dom, node) && seen.insert(node) {
                images.push(node);
            } else if dom.is_text(node) {
                texts.push(node);
            }
        }
    }

    let filter_ref = format!("url(#{filter_id})");
    for &image in &images {
        dom.set_attr(image, "filter", filter_ref.as_str());
        let style = add_blur_style(dom.get_attr(image, "style"), config.blur_radius);
        dom.set_attr(image, "style", style);
    }

    // Nested marked elements share text nodes.
    let texts: HashSet<NodeId> = texts.into_iter().collect();
    for text in texts {
        if let Some(content) = dom.text_mut(text) {
            *content = mask_text(content);
        }
    }

    debug!(
        marked = marked.len(),
        images = images.len(),
        filter = %filter_id,
        "redacted elements"
    );
    marked.len()
}

/// Reuse a `<defs>` that is a direct child of the root, or create one first.
fn ensure_defs(dom: &mut SvgDom, root: NodeId) -> NodeId {
    let existing = dom
        .children(root)
        .find(|&child| dom.local_name(child) == Some("defs"));
    if let Some(defs) = existing {
        return defs;
    }

    let defs = dom.create_element(QualName::local("defs"), Vec::new());
    dom.prepend(root, defs);
    defs
}

fn blur_filter(dom: &mut SvgDom, id: &str, radius: u32) -> NodeId {
    let filter = dom.create_element(
        QualName::local("filter"),
        vec![
            Attribute::new("id", id),
            Attribute::new("x", "-50%"),
            Attribute::new("y", "-50%"),
            Attribute::new("width", "200%"),
            Attribute::new("height", "200%"),
        ],
    );
    let blur = dom.create_element(
        QualName::local("feGaussianBlur"),
        vec![
            Attribute::new("stdDeviation", radius.to_string()),
            Attribute::new("edgeMode", "duplicate"),
        ],
    );
    dom.append(filter, blur);
    filter
}

fn add_blur_style(existing: Option<&str>, radius: u32) -> String {
    let blur = format!("filter: blur({radius}px)");
    match existing.map(str::trim).filter(|s| !s.is_empty()) {
        None => blur,
        Some(style) if style.contains(&blur) => style.to_string(),
        Some(style) => {
            let sep = if style.ends_with(';') { " " } else { "; " };
            format!("{style}{sep}{blur}")
        }
    }
}

/// Replace every non-whitespace character, keeping whitespace in place.
pub fn mask_text(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_whitespace() { c } else { BLOCK_GLYPH })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::{parse, serialize};

    fn config() -> IngestConfig {
        IngestConfig::default()
    }

    fn find(dom: &SvgDom, local: &str) -> Vec<NodeId> {
        dom.elements()
            .into_iter()
            .filter(|&id| dom.local_name(id) == Some(local))
            .collect()
    }

    #[test]
    fn test_is_redaction_class() {
        assert!(is_redaction_class("redact", "redact"));
        assert!(is_redaction_class("box, Redacted-name", "redact"));
        assert!(is_redaction_class("REDACT b", "redact"));
        assert!(!is_redaction_class("a REDACT b", "redact"));
        assert!(!is_redaction_class("note redact-later", "redact"));
        assert!(!is_redaction_class("unredact", "redact"));
        assert!(!is_redaction_class("", "redact"));
    }

    #[test]
    fn test_redacts_image_and_text() {
        let mut dom = parse(
            r#"<svg><g class="redact"><image href="a.png"/><text>Top secret</text></g></svg>"#,
        )
        .unwrap();
        assert_eq!(redact(&mut dom, &config()), 1);

        let filters = find(&dom, "filter");
        assert_eq!(filters.len(), 1);
        let filter_id = dom.get_attr(filters[0], "id").unwrap().to_string();
        assert!(filter_id.starts_with("redact-blur-"));
        assert_eq!(dom.get_attr(filters[0], "width"), Some("200%"));

        let defs = find(&dom, "defs");
        assert_eq!(defs.len(), 1);
        let root = dom.root_element().unwrap();
        assert_eq!(dom.children(root).next(), Some(defs[0]));

        let image = find(&dom, "image")[0];
        assert_eq!(
            dom.get_attr(image, "filter"),
            Some(format!("url(#{filter_id})").as_str())
        );
        assert_eq!(dom.get_attr(image, "style"), Some("filter: blur(20px)"));

        let text = dom.children(find(&dom, "text")[0]).next().unwrap();
        assert_eq!(dom.text_content(text), Some("███ ██████"));
    }

    #[test]
    fn test_marked_image_itself() {
        let mut dom = parse(
            r#"<svg><defs><linearGradient id="g"/></defs><image class="x,redact" style="opacity:0.5" href="a.png"/></svg>"#,
        )
        .unwrap();
        redact(&mut dom, &config());

        assert_eq!(find(&dom, "defs").len(), 1);
        let image = find(&dom, "image")[0];
        assert_eq!(
            dom.get_attr(image, "style"),
            Some("opacity:0.5; filter: blur(20px)")
        );
    }

    #[test]
    fn test_nothing_marked_leaves_tree_alone() {
        let input = r#"<svg><g class="keep"><text>hi</text></g></svg>"#;
        let mut dom = parse(input).unwrap();
        assert_eq!(redact(&mut dom, &config()), 0);
        assert_eq!(serialize(&dom), input);
    }

    #[test]
    fn test_nested_marks_share_nodes() {
        let mut dom = parse(
            r#"<svg><g class="redact"><g class="redact"><image href="a.png"/><text>ab</text></g></g></svg>"#,
        )
        .unwrap();
        assert_eq!(redact(&mut dom, &config()), 2);

        let image = find(&dom, "image")[0];
        assert_eq!(dom.get_attr(image, "style"), Some("filter: blur(20px)"));
        let text = dom.children(find(&dom, "text")[0]).next().unwrap();
        assert_eq!(dom.text_content(text), Some("██"));
    }

    #[test]
    fn test_blur_style_not_duplicated() {
        assert_eq!(
            add_blur_style(Some("filter: blur(20px)"), 20),
            "filter: blur(20px)"
        );
        assert_eq!(add_blur_style(Some("a:b;"), 5), "a:b; filter: blur(5px)");
    }

    #[test]
    fn test_mask_text_keeps_whitespace() {
        let masked = mask_text(" a\tb\nc ");
        assert_eq!(masked, " █\t█\n█ ");
        assert_eq!(masked.chars().filter(|c| c.is_whitespace()).count(), 4);
    }

    #[test]
    fn test_custom_marker_and_radius() {
        let config = IngestConfig::default()
            .with_redact_marker("hide")
            .with_blur_radius(8);
        let mut dom = parse(r#"<svg><image class="Hidden" href="a.png"/></svg>"#).unwrap();
        assert_eq!(redact(&mut dom, &config), 1);

        let blur = find(&dom, "feGaussianBlur")[0];
        assert_eq!(dom.get_attr(blur, "stdDeviation"), Some("8"));
    }
}
