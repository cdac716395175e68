// Copyright 2026 the Quietzone Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for the dot-plan builder and the SVG/PNG render backends.
//!
//! Scenarios span symbol densities from a short URL up to a near-capacity
//! text payload so backend cost can be read against module count rather
//! than a single lucky symbol version.

use core::time::Duration;
use criterion::measurement::WallTime;
use criterion::{
    BenchmarkGroup, BenchmarkId, Criterion, black_box, criterion_group, criterion_main,
};
use quietzone_designer::{DesignSettings, render_design};
use quietzone_imaging::{DotPlan, RenderParams};
use quietzone_imaging_png::{render_pixmap, render_png};
use quietzone_imaging_svg::svg_document;
use quietzone_matrix::{EcLevel, QrMatrix, extract_matrix};
use quietzone_payload::{Payload, WifiCredentials, WifiSecurity};

const MARGIN_MODULES: u32 = 2;

fn scenarios() -> Vec<(&'static str, QrMatrix)> {
    let wifi = Payload::Wifi(WifiCredentials {
        ssid: "Atelier Guest".into(),
        password: "correct horse battery staple".into(),
        security: WifiSecurity::Wpa,
        hidden: false,
    });
    let wifi_text = wifi
        .to_text()
        .unwrap_or_else(|e| panic!("wifi payload rejected: {e}"));

    vec![
        ("short_url", matrix_for("https://example.com")),
        ("wifi", matrix_for(&wifi_text)),
        ("long_text", matrix_for(&"lorem ipsum dolor sit amet ".repeat(20))),
    ]
}

fn matrix_for(text: &str) -> QrMatrix {
    extract_matrix(text, EcLevel::H, MARGIN_MODULES)
        .unwrap_or_else(|e| panic!("encoding failed for {} chars: {e}", text.len()))
}

fn plan_for(matrix: &QrMatrix, params: &RenderParams) -> DotPlan {
    DotPlan::new(matrix, params).unwrap_or_else(|e| panic!("planning failed: {e}"))
}

fn bench_plan(g: &mut BenchmarkGroup<'_, WallTime>, name: &str, matrix: &QrMatrix) {
    let params = RenderParams::default();
    g.bench_with_input(BenchmarkId::new("build", name), matrix, |b, matrix| {
        b.iter(|| black_box(plan_for(black_box(matrix), &params)));
    });
}

fn bench_svg(g: &mut BenchmarkGroup<'_, WallTime>, name: &str, matrix: &QrMatrix) {
    let plan = plan_for(matrix, &RenderParams::default());
    g.bench_with_input(BenchmarkId::new("svg_document", name), &plan, |b, plan| {
        b.iter(|| black_box(svg_document(black_box(plan))));
    });
}

fn bench_rasterize(g: &mut BenchmarkGroup<'_, WallTime>, name: &str, matrix: &QrMatrix) {
    let plan = plan_for(matrix, &RenderParams::default());
    g.bench_with_input(BenchmarkId::new("rasterize", name), &plan, |b, plan| {
        b.iter(|| black_box(render_pixmap(black_box(plan))));
    });
}

fn bench_encode_png(g: &mut BenchmarkGroup<'_, WallTime>, name: &str, matrix: &QrMatrix) {
    let plan = plan_for(matrix, &RenderParams::default());
    g.bench_with_input(BenchmarkId::new("render_png", name), &plan, |b, plan| {
        b.iter(|| black_box(render_png(black_box(plan))));
    });
}

fn bench_png_at_width(g: &mut BenchmarkGroup<'_, WallTime>, matrix: &QrMatrix, width: u32) {
    let params = RenderParams {
        pixel_width: width,
        ..RenderParams::default()
    };
    let plan = plan_for(matrix, &params);
    g.bench_with_input(BenchmarkId::new("render_png", width), &plan, |b, plan| {
        b.iter(|| black_box(render_png(black_box(plan))));
    });
}

fn render_pipeline(c: &mut Criterion) {
    let scenarios = scenarios();

    {
        let mut g = c.benchmark_group("dot_plan");
        g.warm_up_time(Duration::from_secs(1));
        g.measurement_time(Duration::from_secs(3));

        for (name, matrix) in &scenarios {
            bench_plan(&mut g, name, matrix);
        }

        g.finish();
    }

    {
        let mut g = c.benchmark_group("backends");
        g.warm_up_time(Duration::from_secs(1));
        g.measurement_time(Duration::from_secs(3));

        for (name, matrix) in &scenarios {
            bench_svg(&mut g, name, matrix);
        }
        // Split the raster cost from PNG encoding so regressions point at
        // the right half.
        for (name, matrix) in &scenarios {
            bench_rasterize(&mut g, name, matrix);
        }
        for (name, matrix) in &scenarios {
            bench_encode_png(&mut g, name, matrix);
        }

        g.finish();
    }

    {
        let mut g = c.benchmark_group("pixel_width");
        g.warm_up_time(Duration::from_secs(1));
        g.measurement_time(Duration::from_secs(3));

        let (_, matrix) = &scenarios[0];
        for width in [256, 512, 1024, 2048] {
            bench_png_at_width(&mut g, matrix, width);
        }

        g.finish();
    }

    // End to end: payload text, symbol extraction, both backends, and the
    // data URL. This is what one designer preview costs.
    {
        let mut g = c.benchmark_group("design_pipeline");
        g.warm_up_time(Duration::from_secs(1));
        g.measurement_time(Duration::from_secs(3));

        let settings = DesignSettings::for_payload(Payload::Url("https://example.com".into()));
        g.bench_function("preview", |b| {
            b.iter(|| black_box(render_design(black_box(&settings))));
        });

        g.finish();
    }
}

criterion_group!(benches, render_pipeline);
criterion_main!(benches);
