//! Benchmarks for the ingestion pipeline.
//!
//! Run with: cargo bench

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use svgbook::io::MemoryFile;
use svgbook::pages::natural_cmp;
use svgbook::svg::{parse, serialize};
use svgbook::{AssetRegistry, IngestConfig, Transfer, ingest, transform_document};

const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

/// A page with a mix of references, styles and a redacted group.
fn sample_page(i: usize) -> String {
    let mut svg = String::from(
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" viewBox="0 0 595 842">"#,
    );
    svg.push_str(r#"<style>.bg { fill: url("texture.png") }</style>"#);
    for j in 0..50 {
        svg.push_str(&format!(
            r#"<g id="g{j}"><rect x="{j}" y="{i}" width="10" height="10" class="bg"/><image xlink:href="img/Photo{}.PNG"/><text>Line {j} of page {i}</text></g>"#,
            j % 5
        ));
    }
    svg.push_str(
        r#"<g class="redact"><image href="photo0.png"/><text>classified</text></g></svg>"#,
    );
    svg
}

fn sample_registry() -> AssetRegistry {
    let mut registry = AssetRegistry::new();
    for j in 0..5 {
        registry.insert(&format!("photo{j}.png"), "data:image/png;base64,UE5H");
    }
    registry.insert("texture.png", "data:image/png;base64,VEVY");
    registry
}

// ============================================================================
// Document Benchmarks
// ============================================================================

fn bench_parse_serialize(c: &mut Criterion) {
    let page = sample_page(0);
    c.bench_function("parse_serialize", |b| {
        b.iter(|| serialize(&parse(black_box(&page)).unwrap()));
    });
}

fn bench_transform_document(c: &mut Criterion) {
    let page = sample_page(0);
    let registry = sample_registry();
    let config = IngestConfig::default();
    c.bench_function("transform_document", |b| {
        b.iter(|| transform_document("p.svg", black_box(page.as_bytes()), &registry, &config));
    });
}

fn bench_natural_sort(c: &mut Criterion) {
    let names: Vec<String> = (0..1000)
        .rev()
        .map(|i| format!("chapter{}-page{:03}.svg", i % 7, i))
        .collect();
    c.bench_function("natural_sort_1000", |b| {
        b.iter(|| {
            let mut sorted = names.clone();
            sorted.sort_by(|a, b| natural_cmp(a, b));
            sorted
        });
    });
}

// ============================================================================
// Pipeline Benchmarks
// ============================================================================

fn bench_ingest(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let pages: Vec<String> = (0..20).map(sample_page).collect();
    let config = IngestConfig::default();

    c.bench_function("ingest_20_pages", |b| {
        b.iter(|| {
            let mut files: Vec<_> = pages
                .iter()
                .enumerate()
                .map(|(i, svg)| MemoryFile::new(format!("page{i}.svg"), svg.as_str()).into_raw())
                .collect();
            for j in 0..5 {
                files.push(MemoryFile::new(format!("photo{j}.png"), PNG).into_raw());
            }
            files.push(MemoryFile::new("texture.png", PNG).into_raw());
            runtime
                .block_on(ingest(Transfer::selected(files), &config))
                .unwrap()
        });
    });
}

criterion_group!(
    benches,
    bench_parse_serialize,
    bench_transform_document,
    bench_natural_sort,
    bench_ingest,
);

criterion_main!(benches);
