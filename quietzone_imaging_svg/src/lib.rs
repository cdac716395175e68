// Copyright 2026 the Quietzone Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG export backend for the Quietzone dot-plan command stream.
//!
//! Replays a [`DotPlan`] into a self-contained SVG document: one
//! background rectangle, then one `<rect>` per finder module and one
//! `<circle>` per ordinary dark module, in plan order. No geometry is
//! computed here; every coordinate comes straight from the plan, which
//! is what keeps this output aligned with the raster backend.
//!
//! Output is deterministic: the same plan always renders the same bytes.
//! There are no timestamps, ids, or other per-call artifacts in the
//! document.

#![no_std]

extern crate alloc;

use alloc::format;
use alloc::string::String;
use core::fmt::Write as _;
use kurbo::{Circle, Rect};
use peniko::Color;
use quietzone_imaging::{DotCmd, DotPlan};

/// Renders a finished plan as a complete SVG document string.
///
/// The root element carries explicit `width`/`height` attributes and a
/// matching `viewBox`, all equal to the plan's pixel width, so the
/// document embeds at its intended size without further styling. Each
/// element sits on its own line, which keeps documents diffable.
pub fn svg_document(plan: &DotPlan) -> String {
    let width = plan.pixel_width();
    let dark = fill_style(plan.params().color_dark);
    let light = fill_style(plan.params().color_light);

    let mut body = String::new();
    // Background first: the quiet zone must be filled before any module.
    let _ = writeln!(
        body,
        "<rect x=\"0\" y=\"0\" width=\"{width}\" height=\"{width}\"{light}/>"
    );
    for cmd in plan.commands() {
        match *cmd {
            DotCmd::FillSquare(rect) => write_square(&mut body, rect, &dark),
            DotCmd::FillDot(circle) => write_dot(&mut body, circle, &dark),
        }
    }

    let mut svg = String::with_capacity(body.len() + 96);
    let _ = writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{width}\" viewBox=\"0 0 {width} {width}\">"
    );
    svg.push_str(&body);
    svg.push_str("</svg>");
    svg
}

fn write_square(out: &mut String, rect: Rect, style: &str) {
    let _ = writeln!(
        out,
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"{style}/>",
        fmt_px(rect.x0),
        fmt_px(rect.y0),
        fmt_px(rect.width()),
        fmt_px(rect.height()),
    );
}

fn write_dot(out: &mut String, circle: Circle, style: &str) {
    let _ = writeln!(
        out,
        "<circle cx=\"{}\" cy=\"{}\" r=\"{}\"{style}/>",
        fmt_px(circle.center.x),
        fmt_px(circle.center.y),
        fmt_px(circle.radius),
    );
}

/// Fill attributes for a solid color: `#rrggbb` plus `fill-opacity`
/// when the alpha channel is not fully opaque.
fn fill_style(color: Color) -> String {
    let rgba = color.to_rgba8();
    let alpha = f32::from(rgba.a) / 255.0;
    let mut out = String::new();
    let _ = write!(
        out,
        " fill=\"#{:02x}{:02x}{:02x}\"",
        rgba.r, rgba.g, rgba.b
    );
    if alpha < 1.0 {
        let _ = write!(out, " fill-opacity=\"{}\"", fmt_alpha(alpha));
    }
    out
}

fn fmt_alpha(v: f32) -> String {
    trim_fixed(format!("{v:.3}"))
}

/// Scalar formatting for coordinates: integers print bare, everything
/// else prints with at most three decimals, trailing zeros trimmed.
#[allow(
    clippy::cast_possible_truncation,
    reason = "SVG uses f32-like scalar formatting; coordinates fit comfortably"
)]
fn fmt_px(v: f64) -> String {
    let v = v as f32;
    if v.is_finite() {
        let i = v as i32;
        let diff = (i as f32) - v;
        if diff > -1e-6 && diff < 1e-6 {
            return format!("{i}");
        }
    } else {
        return format!("{v}");
    }
    trim_fixed(format!("{v:.3}"))
}

fn trim_fixed(mut s: String) -> String {
    while s.contains('.') && s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}
