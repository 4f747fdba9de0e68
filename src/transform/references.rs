//! Element attribute references → embedded data URLs.

use tracing::trace;

use crate::assets::{AssetRegistry, extract_filename};
use crate::svg::{NodeId, QualName, SvgDom, XLINK_NS};

/// How an attribute carries a resource reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceAttr {
    /// Unprefixed `href` or `src`.
    Plain,
    /// `href` under a prefix bound to the XLink namespace.
    Namespaced,
    /// A literal `xlink:href` whose prefix was never declared.
    Malformed,
}

/// Outcome counts of one reference pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReferenceStats {
    pub embedded: usize,
    pub missed: usize,
}

/// Classify an attribute on element `id`.
pub fn reference_attr(dom: &SvgDom, id: NodeId, name: &QualName) -> Option<ReferenceAttr> {
    match (name.prefix.as_deref(), name.local.as_str()) {
        (None, "href" | "src") => Some(ReferenceAttr::Plain),
        (Some(prefix), "href") => match dom.lookup_namespace(id, Some(prefix)) {
            Some(XLINK_NS) => Some(ReferenceAttr::Namespaced),
            None if prefix == "xlink" => Some(ReferenceAttr::Malformed),
            _ => None,
        },
        _ => None,
    }
}

/// Rewrite every resolvable reference attribute in place.
///
/// Values are replaced without touching the attribute's qualified name, so a
/// namespaced reference stays namespaced. If an undeclared `xlink:` prefix is
/// present, the declaration is added to the root element.
pub fn resolve_references(dom: &mut SvgDom, registry: &AssetRegistry) -> ReferenceStats {
    let mut stats = ReferenceStats::default();
    let mut needs_xlink_declaration = false;

    for id in dom.elements() {
        let mut updates = Vec::new();
        for (index, attr) in dom.attrs(id).iter().enumerate() {
            let Some(kind) = reference_attr(dom, id, &attr.name) else {
                continue;
            };
            if kind == ReferenceAttr::Malformed {
                needs_xlink_declaration = true;
            }
            let Some(filename) = extract_filename(&attr.value) else {
                continue;
            };
            match registry.lookup(filename) {
                Some(hit) => {
                    trace!(reference = %attr.value, strategy = ?hit.strategy, "embedded reference");
                    updates.push((index, hit.data_url.to_string()));
                }
                None => {
                    trace!(reference = %attr.value, "no asset for reference");
                    stats.missed += 1;
                }
            }
        }

        if let Some(attrs) = dom.attrs_mut(id) {
            for (index, value) in updates {
                attrs[index].value = value;
                stats.embedded += 1;
            }
        }
    }

    if needs_xlink_declaration && let Some(root) = dom.root_element() {
        dom.set_attr(root, "xmlns:xlink", XLINK_NS);
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::is_embedded;
    use crate::svg::{parse, serialize};

    fn registry() -> AssetRegistry {
        let mut registry = AssetRegistry::new();
        registry.insert("logo.png", "data:image/png;base64,TE9HTw==");
        registry.insert("My Photo.jpg", "data:image/jpeg;base64,UEhPVE8=");
        registry
    }

    #[test]
    fn test_plain_and_namespaced_references() {
        let mut dom = parse(
            r#"<svg xmlns:xlink="http://www.w3.org/1999/xlink"><image href="logo.png"/><image xlink:href="img/Logo.PNG"/><img src="My%20Photo.jpg"/></svg>"#,
        )
        .unwrap();
        let stats = resolve_references(&mut dom, &registry());
        assert_eq!(stats, ReferenceStats { embedded: 3, missed: 0 });

        let out = serialize(&dom);
        assert!(out.contains(r#"<image href="data:image/png;base64,TE9HTw=="/>"#));
        assert!(out.contains(r#"<image xlink:href="data:image/png;base64,TE9HTw=="/>"#));
        assert!(out.contains(r#"<img src="data:image/jpeg;base64,UEhPVE8="/>"#));
    }

    #[test]
    fn test_custom_prefix_bound_to_xlink() {
        let mut dom = parse(
            r#"<svg xmlns:x="http://www.w3.org/1999/xlink"><image x:href="logo.png"/></svg>"#,
        )
        .unwrap();
        resolve_references(&mut dom, &registry());
        let image = dom.elements()[1];
        assert!(is_embedded(dom.get_attr(image, "x:href").unwrap()));
    }

    #[test]
    fn test_malformed_xlink_gets_declared() {
        let mut dom = parse(r#"<svg><image xlink:href="logo.png"/></svg>"#).unwrap();
        let stats = resolve_references(&mut dom, &registry());
        assert_eq!(stats.embedded, 1);

        let out = serialize(&dom);
        assert!(out.starts_with(r#"<svg xmlns:xlink="http://www.w3.org/1999/xlink">"#));
        assert!(parse(&out).is_ok());
    }

    #[test]
    fn test_misses_and_skips() {
        let mut dom = parse(
            r##"<svg><use href="#shape"/><image href="missing.png"/><image href="https://example.com/a.png"/><a href=""/></svg>"##,
        )
        .unwrap();
        let before = serialize(&dom);
        let stats = resolve_references(&mut dom, &registry());
        assert_eq!(stats, ReferenceStats { embedded: 0, missed: 1 });
        assert_eq!(serialize(&dom), before);
    }

    #[test]
    fn test_second_pass_is_a_no_op() {
        let mut dom = parse(r#"<svg><image href="logo.png"/></svg>"#).unwrap();
        resolve_references(&mut dom, &registry());
        let once = serialize(&dom);

        let mut again = parse(&once).unwrap();
        let stats = resolve_references(&mut again, &registry());
        assert_eq!(stats, ReferenceStats::default());
        assert_eq!(serialize(&again), once);
    }

    #[test]
    fn test_unrelated_prefixed_href_ignored() {
        let mut dom = parse(
            r#"<svg xmlns:foo="urn:other"><image foo:href="logo.png"/></svg>"#,
        )
        .unwrap();
        let stats = resolve_references(&mut dom, &registry());
        assert_eq!(stats, ReferenceStats::default());
    }
}
