// Copyright 2026 the Quietzone Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Logo compositing over a rounded-dot render.
//!
//! Draws a synthetic circular logo, then stamps it over the same symbol
//! twice: centered with the default white backdrop, and tucked into the
//! bottom-right corner:
//!   `cargo run -p quietzone_demos --example logo_badge`

use quietzone_imaging::{DotPlan, RenderParams};
use quietzone_imaging_png::{
    LogoAnchor, LogoPlacement, composite_logo, encode_png, render_pixmap,
};
use quietzone_matrix::{EcLevel, extract_matrix};
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Transform};

fn paint_logo() -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let mut logo = Pixmap::new(96, 96).ok_or("failed to allocate the logo canvas")?;
    let mut paint = Paint::default();
    paint.set_color(Color::from_rgba8(0xdb, 0x27, 0x77, 0xff));
    paint.anti_alias = true;
    let circle = PathBuilder::from_circle(48.0, 48.0, 40.0).ok_or("degenerate logo circle")?;
    logo.fill_path(&circle, &paint, FillRule::Winding, Transform::identity(), None);
    Ok(encode_png(&logo)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // High error correction leaves headroom for the pixels the logo hides.
    let matrix = extract_matrix("https://example.com/loyalty", EcLevel::H, 2)?;
    let params = RenderParams::with_css_colors(768, "#1e293b", "#ffffff", 0.85)?;
    let plan = DotPlan::new(&matrix, &params)?;

    let logo_png = paint_logo()?;

    let mut centered = render_pixmap(&plan)?;
    composite_logo(&mut centered, &logo_png, &LogoPlacement::default())?;
    std::fs::write("logo_badge_center.png", encode_png(&centered)?)?;
    eprintln!("Wrote logo_badge_center.png");

    let mut cornered = render_pixmap(&plan)?;
    let placement = LogoPlacement::anchored(LogoAnchor::BottomRight, 0.15);
    composite_logo(&mut cornered, &logo_png, &placement)?;
    std::fs::write("logo_badge_corner.png", encode_png(&cornered)?)?;
    eprintln!("Wrote logo_badge_corner.png");

    Ok(())
}
