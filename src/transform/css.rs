//! Textual `url(...)` embedding for stylesheets and style attributes.
//!
//! Runs over the final document text whether or not the structured pass
//! succeeded, so it also covers documents that could not be parsed.

use std::sync::LazyLock;

use regex_lite::Regex;
use tracing::trace;

use super::references::ReferenceStats;
use crate::assets::{AssetRegistry, extract_filename};

// One alternative per quoting style, each requiring its own closing quote, so
// a quoted target may contain `)`. Unquoted targets stop at the first `)`.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"url\(\s*(?:"([^"]*)"|'([^']*)'|&quot;(.*?)&quot;|&apos;(.*?)&apos;|([^)"'\s]*))\s*\)"#,
    )
    .expect("url() pattern is valid")
});

/// Rewrite the target of every `url(...)` in `css`.
///
/// Only the target is replaced; whatever quoting surrounded it (plain quotes
/// or `&quot;`/`&apos;` entities) is left as it was. `rewriter` returns
/// `None` to leave an occurrence untouched.
pub fn rewrite_css_urls<F>(css: &str, mut rewriter: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let replacements: Vec<_> = URL_PATTERN
        .captures_iter(css)
        .filter_map(|cap| {
            let target = (1..=5).find_map(|i| cap.get(i))?;
            let new_url = rewriter(target.as_str())?;
            (new_url != target.as_str()).then(|| (target.range(), new_url))
        })
        .collect();

    let mut result = css.to_string();
    // Apply replacements in reverse order
    for (range, replacement) in replacements.into_iter().rev() {
        result.replace_range(range, &replacement);
    }
    result
}

/// Embed every resolvable `url(...)` reference as a data URL.
pub fn embed_css_urls(text: &str, registry: &AssetRegistry) -> (String, ReferenceStats) {
    let mut stats = ReferenceStats::default();
    let out = rewrite_css_urls(text, |target| {
        let filename = extract_filename(target)?;
        match registry.lookup(filename) {
            Some(hit) => {
                stats.embedded += 1;
                Some(hit.data_url.to_string())
            }
            None => {
                trace!(reference = target, "no asset for url()");
                stats.missed += 1;
                None
            }
        }
    });
    (out, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> AssetRegistry {
        let mut registry = AssetRegistry::new();
        registry.insert("bg.png", "data:image/png;base64,Qkc=");
        registry.insert("font.woff2", "data:font/woff2;base64,Rk9OVA==");
        registry
    }

    #[test]
    fn test_rewrite_urls() {
        let css = "body { background: url('images/bg.png'); }";
        let rewritten = rewrite_css_urls(css, |url| Some(url.replace("images/", "assets/")));
        assert_eq!(rewritten, "body { background: url('assets/bg.png'); }");
    }

    #[test]
    fn test_quoting_is_preserved() {
        let registry = registry();
        let cases = [
            ("url(bg.png)", "url(data:image/png;base64,Qkc=)"),
            ("url('bg.png')", "url('data:image/png;base64,Qkc=')"),
            (r#"url("BG.PNG")"#, r#"url("data:image/png;base64,Qkc=")"#),
            (
                "url(&quot;img/bg.png&quot;)",
                "url(&quot;data:image/png;base64,Qkc=&quot;)",
            ),
            ("url( &apos;bg.png&apos; )", "url( &apos;data:image/png;base64,Qkc=&apos; )"),
        ];
        for (input, expected) in cases {
            let (out, stats) = embed_css_urls(input, &registry);
            assert_eq!(out, expected, "input: {input}");
            assert_eq!(stats.embedded, 1);
        }
    }

    #[test]
    fn test_quoted_targets_may_contain_parens() {
        let mut registry = AssetRegistry::new();
        registry.insert("a(1).png", "data:image/png;base64,QQ==");

        let (out, stats) = embed_css_urls(
            r#".x { fill: url("a(1).png") } .y { fill: url(&quot;img/a(1).png&quot;) }"#,
            &registry,
        );
        assert_eq!(
            out,
            r#".x { fill: url("data:image/png;base64,QQ==") } .y { fill: url(&quot;data:image/png;base64,QQ==&quot;) }"#
        );
        assert_eq!(stats.embedded, 2);

        let (out, stats) = embed_css_urls("url(a(1).png)", &registry);
        assert_eq!(out, "url(a(1).png)");
        assert_eq!(stats.embedded, 0);
    }

    #[test]
    fn test_stylesheet_in_markup() {
        let text = r#"<svg><style>@font-face { src: url("font.woff2") } .a { fill: url(#grad) } .b { background: url(gone.png) }</style></svg>"#;
        let (out, stats) = embed_css_urls(text, &registry());
        assert!(out.contains(r#"src: url("data:font/woff2;base64,Rk9OVA==")"#));
        assert!(out.contains("url(#grad)"));
        assert!(out.contains("url(gone.png)"));
        assert_eq!(stats, ReferenceStats { embedded: 1, missed: 1 });
    }

    #[test]
    fn test_embedded_urls_are_not_rewrapped() {
        let (once, _) = embed_css_urls("a { b: url(bg.png) }", &registry());
        let (twice, stats) = embed_css_urls(&once, &registry());
        assert_eq!(twice, once);
        assert_eq!(stats, ReferenceStats::default());
    }
}
