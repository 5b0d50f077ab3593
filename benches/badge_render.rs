//! Badge rendering benchmarks.
//!
//! Benchmarks:
//! - SVG drawing per style (no store access)
//! - Full render path against the memory backend
//! - Public id derivation
//!
//! Run with:
//! ```bash
//! cargo bench --bench badge_render
//! ```

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

use pulse::badge::{BadgeOptions, BadgeRenderer, BadgeSpec, BadgeStyle, svg};
use pulse::clock::FixedClock;
use pulse::store::PresenceStore;
use pulse::token::derive_public_id;

const NOW: i64 = 1_700_000_000_000;
const PUBLIC_ID: &str = "srv_pub_a3a9e1ed9732";

fn spec(style: BadgeStyle) -> BadgeSpec {
    BadgeSpec {
        label: "players".to_string(),
        message: "128/200".to_string(),
        color: "#007ec6".to_string(),
        label_color: "#555".to_string(),
        style,
        logo: None,
        link: Some("https://example.com/server".to_string()),
    }
}

fn svg_styles(c: &mut Criterion) {
    let mut group = c.benchmark_group("svg_render");

    for (name, style) in [
        ("flat", BadgeStyle::Flat),
        ("flat-square", BadgeStyle::FlatSquare),
        ("plastic", BadgeStyle::Plastic),
        ("for-the-badge", BadgeStyle::ForTheBadge),
        ("social", BadgeStyle::Social),
    ] {
        let spec = spec(style);
        group.bench_with_input(BenchmarkId::new("style", name), &spec, |b, spec| {
            b.iter(|| svg::render(black_box(spec)))
        });
    }

    group.finish();
}

fn full_render(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    let store = PresenceStore::memory();
    let record = format!(
        r#"{{"status":"online","players":128,"maxPlayers":200,"tps":19.7,"version":"1.21","timestamp":{NOW}}}"#
    );
    rt.block_on(store.put(PUBLIC_ID, record.as_bytes(), Some(Duration::from_secs(3600))))
        .expect("Failed to seed store");

    let renderer = BadgeRenderer::new(store, Arc::new(FixedClock::new(NOW)));
    let options = BadgeOptions {
        logo: Some("server".to_string()),
        ..Default::default()
    };

    let mut group = c.benchmark_group("badge_render");
    group.measurement_time(Duration::from_secs(5));

    for kind in ["status", "players", "tps"] {
        group.bench_function(BenchmarkId::new("memory", kind), |b| {
            b.iter(|| {
                rt.block_on(renderer.render(Some(PUBLIC_ID), Some(kind), black_box(&options)))
            })
        });
    }

    group.bench_function("offline", |b| {
        b.iter(|| {
            rt.block_on(renderer.render(
                Some("srv_pub_000000000000"),
                None,
                black_box(&options),
            ))
        })
    });

    group.finish();
}

fn token_derivation(c: &mut Criterion) {
    c.bench_function("derive_public_id", |b| {
        b.iter(|| derive_public_id(black_box("sk_live_550e8400-e29b-41d4-a716-446655440000")))
    });
}

criterion_group!(benches, svg_styles, full_render, token_derivation);
criterion_main!(benches);
