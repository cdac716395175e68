// Copyright 2026 the Quietzone Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raster backend for the Quietzone dot-plan command stream.
//!
//! A thin adapter that replays a [`DotPlan`] onto a `tiny-skia`
//! [`Pixmap`]: background fill first, then one filled path per command.
//! The plan's coordinates are used as-is, so module placement matches
//! the SVG backend exactly; only edge antialiasing differs between the
//! two outputs.
//!
//! On top of the base render this crate carries the raster-only
//! features: compositing a logo overlay (with its white rounded
//! backdrop) onto a finished render, PNG encoding, and the data-URL /
//! embed-snippet export helpers.
//!
//! The overlay API takes the already rendered pixmap by mutable
//! reference, which makes the ordering contract structural: a logo can
//! only ever be drawn over a complete base image.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use quietzone_imaging::{DotCmd, DotPlan, RasterError};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, PixmapPaint, Transform};

/// Renders a finished plan onto a freshly acquired pixel surface.
///
/// The surface lives exactly as long as one render call chain; nothing
/// is cached between calls. Fails with [`RasterError::Surface`] when the
/// pixmap cannot be allocated.
pub fn render_pixmap(plan: &DotPlan) -> Result<Pixmap, RasterError> {
    let width = plan.pixel_width();
    let mut pixmap = Pixmap::new(width, width).ok_or(RasterError::Surface { width })?;
    pixmap.fill(to_skia_color(plan.params().color_light));

    let mut paint = Paint::default();
    paint.set_color(to_skia_color(plan.params().color_dark));
    paint.anti_alias = true;

    for cmd in plan.commands() {
        let path = match *cmd {
            DotCmd::FillSquare(rect) => tiny_skia::Rect::from_ltrb(
                to_f32(rect.x0),
                to_f32(rect.y0),
                to_f32(rect.x1),
                to_f32(rect.y1),
            )
            .map(PathBuilder::from_rect),
            DotCmd::FillDot(circle) => PathBuilder::from_circle(
                to_f32(circle.center.x),
                to_f32(circle.center.y),
                to_f32(circle.radius),
            ),
        };
        // Degenerate primitives (zero extent after f32 rounding) are
        // skipped rather than failing the whole render.
        let Some(path) = path else {
            continue;
        };
        pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }
    Ok(pixmap)
}

/// Corner anchors for preset logo positions, inset from the canvas edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogoAnchor {
    /// Centered on the canvas.
    Center,
    /// Top-left, inset by [`EDGE_INSET`] of the canvas side.
    TopLeft,
    /// Top-right.
    TopRight,
    /// Bottom-left.
    BottomLeft,
    /// Bottom-right.
    BottomRight,
}

/// Edge inset for corner-anchored logos, as a fraction of the canvas.
pub const EDGE_INSET: f64 = 0.05;

/// Default logo edge length as a fraction of the canvas side.
pub const DEFAULT_LOGO_FRACTION: f64 = 0.2;

/// Where and how large a logo overlay lands on the rendered canvas.
///
/// `fx`/`fy` are placement fractions in `[0, 1]`: the logo origin is
/// `(canvas - logo_size) * fx`, so 0 hugs the left/top edge, 1 the
/// right/bottom edge, and 0.5 centers. Drag-positioned overlays feed
/// their fractions in directly; preset corners go through
/// [`LogoPlacement::anchored`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LogoPlacement {
    /// Logo edge length as a fraction of the canvas side.
    pub size_fraction: f64,
    /// Horizontal placement fraction.
    pub fx: f64,
    /// Vertical placement fraction.
    pub fy: f64,
    /// Whether to paint the white rounded backdrop behind the logo.
    pub backdrop: bool,
}

impl Default for LogoPlacement {
    fn default() -> Self {
        Self {
            size_fraction: DEFAULT_LOGO_FRACTION,
            fx: 0.5,
            fy: 0.5,
            backdrop: true,
        }
    }
}

impl LogoPlacement {
    /// Free placement from explicit fractions.
    pub fn free(fx: f64, fy: f64, size_fraction: f64) -> Self {
        Self {
            size_fraction,
            fx,
            fy,
            backdrop: true,
        }
    }

    /// Preset placement at a corner or the center.
    ///
    /// Corner presets sit [`EDGE_INSET`] of the canvas in from their
    /// edges, expressed here as placement fractions.
    pub fn anchored(anchor: LogoAnchor, size_fraction: f64) -> Self {
        let edge = if size_fraction < 1.0 {
            (EDGE_INSET / (1.0 - size_fraction)).min(1.0)
        } else {
            0.5
        };
        let (fx, fy) = match anchor {
            LogoAnchor::Center => (0.5, 0.5),
            LogoAnchor::TopLeft => (edge, edge),
            LogoAnchor::TopRight => (1.0 - edge, edge),
            LogoAnchor::BottomLeft => (edge, 1.0 - edge),
            LogoAnchor::BottomRight => (1.0 - edge, 1.0 - edge),
        };
        Self {
            size_fraction,
            fx,
            fy,
            backdrop: true,
        }
    }

    /// Logo edge length in pixels for a canvas of the given side.
    pub fn logo_size(&self, canvas: f64) -> f64 {
        canvas * self.size_fraction
    }

    /// Top-left corner of the logo rect in pixels.
    pub fn origin(&self, canvas: f64) -> (f64, f64) {
        let logo = self.logo_size(canvas);
        ((canvas - logo) * self.fx, (canvas - logo) * self.fy)
    }
}

/// Draws a PNG logo over a finished base render.
///
/// When `placement.backdrop` is set, a white rounded rect (corner
/// radius a quarter of the logo size) is filled under the logo first so
/// the overlay stays readable over dark modules. The logo image is then
/// scaled into the placement rect; transparent logo pixels let the
/// backdrop show through.
///
/// Fails with [`RasterError::LogoDecode`] when `logo_png` is not a
/// decodable PNG; the base render is left untouched in that case.
pub fn composite_logo(
    pixmap: &mut Pixmap,
    logo_png: &[u8],
    placement: &LogoPlacement,
) -> Result<(), RasterError> {
    let logo = Pixmap::decode_png(logo_png).map_err(|_| RasterError::LogoDecode)?;

    let canvas = f64::from(pixmap.width());
    let size = to_f32(placement.logo_size(canvas));
    let (x, y) = placement.origin(canvas);
    let (x, y) = (to_f32(x), to_f32(y));

    if placement.backdrop {
        if let Some(path) = rounded_rect_path(x, y, size, size * 0.25) {
            let mut paint = Paint::default();
            paint.set_color_rgba8(255, 255, 255, 255);
            paint.anti_alias = true;
            pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }
    }

    let sx = size / logo.width() as f32;
    let sy = size / logo.height() as f32;
    pixmap.draw_pixmap(
        0,
        0,
        logo.as_ref(),
        &PixmapPaint::default(),
        Transform::from_row(sx, 0.0, 0.0, sy, x, y),
        None,
    );
    Ok(())
}

/// Encodes a rendered pixmap as PNG bytes.
pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, RasterError> {
    pixmap.encode_png().map_err(|err| RasterError::PngEncode {
        reason: err.to_string(),
    })
}

/// Renders a plan straight to PNG bytes.
pub fn render_png(plan: &DotPlan) -> Result<Vec<u8>, RasterError> {
    encode_png(&render_pixmap(plan)?)
}

/// Wraps PNG bytes in a `data:` URL suitable for an `img` element.
pub fn png_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", BASE64.encode(png))
}

/// HTML snippet embedding a rendered code at its intended size.
pub fn embed_snippet(data_url: &str, width: u32) -> String {
    format!("<img src=\"{data_url}\" alt=\"QR code\" width=\"{width}\" height=\"{width}\" />")
}

fn to_skia_color(color: peniko::Color) -> tiny_skia::Color {
    let rgba = color.to_rgba8();
    tiny_skia::Color::from_rgba8(rgba.r, rgba.g, rgba.b, rgba.a)
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "the drawing surface consumes f32; canvas coordinates fit comfortably"
)]
fn to_f32(v: f64) -> f32 {
    v as f32
}

/// Rounded rect outline matching the canvas drawing order: four edges,
/// each corner turned with a single quadratic.
fn rounded_rect_path(x: f32, y: f32, size: f32, radius: f32) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(x + radius, y);
    pb.line_to(x + size - radius, y);
    pb.quad_to(x + size, y, x + size, y + radius);
    pb.line_to(x + size, y + size - radius);
    pb.quad_to(x + size, y + size, x + size - radius, y + size);
    pb.line_to(x + radius, y + size);
    pb.quad_to(x, y + size, x, y + size - radius);
    pb.line_to(x, y + radius);
    pb.quad_to(x, y, x + radius, y);
    pb.close();
    pb.finish()
}
