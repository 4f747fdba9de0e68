use std::collections::HashMap;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use super::lookup::{Index, LookupStrategy, extract_filename};
use crate::error::AssetError;
use crate::ingest::RawFile;
use crate::util::guess_mime_type;

/// A successful lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    pub strategy: LookupStrategy,
    pub data_url: &'a str,
}

/// Filename → data URL lookup over every non-document file.
///
/// Two indices share the same values: one keyed by the filename as written,
/// one by its lowercase form. Built once, then only read.
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    exact: HashMap<String, Arc<str>>,
    lowercase: HashMap<String, Arc<str>>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and encode every asset concurrently.
    ///
    /// Never fails: an unreadable asset is logged and left out. When two
    /// names collide on a key, whichever encode completes last wins.
    #[instrument(skip_all, fields(assets = assets.len()))]
    pub async fn build(assets: Vec<RawFile>) -> Self {
        let mut tasks = JoinSet::new();
        for asset in assets {
            tasks.spawn(async move { encode_asset(asset).await });
        }

        let mut registry = Self::new();
        let mut failed = 0usize;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok((name, data_url))) => {
                    registry.insert(&name, data_url);
                }
                Ok(Err(err)) => {
                    failed += 1;
                    warn!("{err}");
                }
                Err(err) => {
                    failed += 1;
                    warn!("asset encode task failed: {err}");
                }
            }
        }

        info!(registered = registry.len(), failed, "asset registry built");
        registry
    }

    /// Register a data URL under `name` in both indices.
    ///
    /// Returns `true` if an existing entry was overwritten.
    pub fn insert(&mut self, name: &str, data_url: impl Into<Arc<str>>) -> bool {
        let data_url = data_url.into();
        let lower = name.to_lowercase();
        let replaced_exact = self
            .exact
            .insert(name.to_string(), Arc::clone(&data_url))
            .is_some();
        let replaced_lower = self.lowercase.insert(lower, data_url).is_some();
        if replaced_exact || replaced_lower {
            debug!(name, "asset key collision, later entry wins");
        }
        replaced_exact || replaced_lower
    }

    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }

    fn index(&self, index: Index) -> &HashMap<String, Arc<str>> {
        match index {
            Index::Exact => &self.exact,
            Index::Lowercase => &self.lowercase,
        }
    }

    /// Look up a bare filename, trying each strategy in order.
    pub fn lookup(&self, filename: &str) -> Option<Resolution<'_>> {
        LookupStrategy::ORDER.iter().find_map(|&strategy| {
            let key = strategy.key(filename);
            self.index(strategy.index())
                .get(key.as_ref())
                .map(|data_url| Resolution {
                    strategy,
                    data_url: data_url.as_ref(),
                })
        })
    }

    /// Resolve a raw attribute or `url()` value to its data URL.
    ///
    /// `None` covers both references that are not lookups at all (embedded
    /// data, network URLs, fragments) and plain misses.
    pub fn resolve(&self, reference: &str) -> Option<&str> {
        let filename = extract_filename(reference)?;
        self.lookup(filename).map(|r| r.data_url)
    }
}

/// Encode bytes as a `data:` URL with a guessed media type.
pub fn encode_data_url(name: &str, bytes: &[u8]) -> String {
    let mime = guess_mime_type(name, bytes);
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

async fn encode_asset(asset: RawFile) -> Result<(String, String), AssetError> {
    let name = asset.name().to_string();
    match asset.read_bytes().await {
        Ok(bytes) => {
            let data_url = encode_data_url(&name, &bytes);
            Ok((name, data_url))
        }
        Err(source) => Err(AssetError { name, source }),
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::io::MemoryFile;

    fn registry(entries: &[(&str, &str)]) -> AssetRegistry {
        let mut registry = AssetRegistry::new();
        for (name, url) in entries {
            registry.insert(name, *url);
        }
        registry
    }

    #[test]
    fn test_encode_data_url() {
        assert_eq!(
            encode_data_url("dot.png", b"abc"),
            "data:image/png;base64,YWJj"
        );
    }

    #[test]
    fn test_lookup_order() {
        let reg = registry(&[("Logo.png", "data:exact"), ("logo.png", "data:lower")]);
        let hit = reg.lookup("Logo.png").unwrap();
        assert_eq!(hit.strategy, LookupStrategy::Exact);
        assert_eq!(hit.data_url, "data:exact");
    }

    #[test]
    fn test_case_tolerant_lookup() {
        let reg = registry(&[("logo.png", "data:logo")]);
        let hit = reg.lookup("Logo.PNG").unwrap();
        assert_eq!(hit.strategy, LookupStrategy::Lowercase);
        assert_eq!(hit.data_url, "data:logo");
    }

    #[test]
    fn test_decoded_lookup() {
        let reg = registry(&[("My Logo.png", "data:spaced")]);
        assert_eq!(
            reg.lookup("My%20Logo.png").unwrap().strategy,
            LookupStrategy::DecodedExact
        );
        assert_eq!(
            reg.lookup("MY%20LOGO.PNG").unwrap().strategy,
            LookupStrategy::DecodedLowercase
        );
    }

    #[test]
    fn test_resolve_reference() {
        let reg = registry(&[("logo.png", "data:logo")]);
        assert_eq!(reg.resolve("../assets/logo.png?x=1"), Some("data:logo"));
        assert_eq!(reg.resolve("missing.png"), None);
        assert_eq!(reg.resolve("data:image/png;base64,AA"), None);
    }

    #[test]
    fn test_insert_reports_collision() {
        let mut reg = AssetRegistry::new();
        assert!(!reg.insert("a.png", "data:1"));
        assert!(reg.insert("A.PNG", "data:2"));
        assert_eq!(reg.lookup("a.png").unwrap().data_url, "data:1");
        assert_eq!(reg.resolve("x/A.png"), Some("data:2"));
    }

    #[tokio::test]
    async fn test_build_is_lenient() {
        let assets: Vec<RawFile> = vec![
            Arc::new(MemoryFile::new("ok.png", b"png".to_vec())),
            Arc::new(MemoryFile::failing("bad.png", io::ErrorKind::NotFound)),
        ];
        let reg = AssetRegistry::build(assets).await;
        assert_eq!(reg.len(), 1);
        assert!(reg.resolve("ok.png").is_some());
        assert!(reg.resolve("bad.png").is_none());
    }
}
