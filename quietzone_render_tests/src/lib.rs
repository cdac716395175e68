// Copyright 2026 the Quietzone Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Development-only consistency checks across the Quietzone imaging
//! backends.
//!
//! The SVG and raster backends replay the same dot-plan command stream,
//! so module placement must agree between them down to formatting and
//! pixel rounding. The integration tests under `tests/` render one
//! reference scenario through both backends and compare the results
//! against the plan itself; this crate carries the scenario and the
//! small probing helpers they share.
//!
//! Run with `cargo test -p quietzone_render_tests`.

use quietzone_imaging::{DotPlan, RenderParams};
use quietzone_matrix::{EcLevel, QrMatrix, extract_matrix};

/// Payload of the reference scenario.
pub const SCENARIO_TEXT: &str = "https://example.com";

/// Output width of the reference scenario, in pixels.
pub const SCENARIO_WIDTH: u32 = 512;

/// Matrix of the reference scenario: level H, two-module quiet zone.
pub fn scenario_matrix() -> QrMatrix {
    extract_matrix(SCENARIO_TEXT, EcLevel::H, 2).expect("scenario payload encodes")
}

/// Plan for the reference scenario with the given parameters.
pub fn plan_with(matrix: &QrMatrix, params: &RenderParams) -> DotPlan {
    DotPlan::new(matrix, params).expect("scenario geometry is valid")
}

/// Plan for the reference scenario at default colors and dot scale.
pub fn scenario_plan() -> DotPlan {
    let params = RenderParams {
        pixel_width: SCENARIO_WIDTH,
        ..RenderParams::default()
    };
    plan_with(&scenario_matrix(), &params)
}

/// The element lines of `svg` with the given tag.
pub fn svg_elements<'a>(svg: &'a str, tag: &str) -> Vec<&'a str> {
    let prefix = format!("<{tag} ");
    svg.lines()
        .filter(move |line| line.starts_with(&prefix))
        .collect()
}

/// Numeric value of the `name="..."` attribute inside one element line.
pub fn attr_f64(element: &str, name: &str) -> f64 {
    let key = format!("{name}=\"");
    let start = element
        .find(&key)
        .unwrap_or_else(|| panic!("attribute {name} missing in {element}"))
        + key.len();
    let value = &element[start..];
    let end = value.find('"').expect("attribute value closes");
    value[..end].parse().expect("attribute value parses as f64")
}

/// Unpremultiplied-equivalent RGBA of one pixel.
pub fn probe(pixmap: &tiny_skia::Pixmap, x: u32, y: u32) -> (u8, u8, u8, u8) {
    let px = pixmap.pixel(x, y).expect("probe inside the canvas");
    (px.red(), px.green(), px.blue(), px.alpha())
}

/// Nearest pixel index for a plan coordinate.
#[allow(
    clippy::cast_possible_truncation,
    reason = "plan coordinates are canvas-bounded and non-negative"
)]
pub fn px(coord: f64) -> u32 {
    coord.round() as u32
}
