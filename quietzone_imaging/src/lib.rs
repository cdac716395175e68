// Copyright 2026 the Quietzone Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quietzone Imaging: the rounded-dot geometry pass.
//!
//! This crate turns a [`QrMatrix`] plus [`RenderParams`] into a
//! [`DotPlan`]: an ordered stream of backend-agnostic draw commands.
//! Finder-pattern modules become filled squares, every other dark module
//! becomes a filled circle, and nothing is emitted for light modules.
//!
//! # Position in the stack
//!
//! - **Extraction**: `quietzone_matrix` produces the module grid.
//! - **Geometry pass (this crate)**: one iteration over the grid, all
//!   module-to-pixel math, yielding [`DotCmd`]s.
//! - **Backends**: `quietzone_imaging_svg` and `quietzone_imaging_png`
//!   replay the identical command stream into a vector document or a
//!   pixel buffer.
//!
//! Running the geometry once and replaying it everywhere is what keeps
//! the two outputs consistent: a backend has no geometry of its own to
//! get wrong.
//!
//! # Geometry contract
//!
//! For a symbol of `size` modules with quiet-zone `margin` rendered at
//! `pixel_width`:
//!
//! - `total = size + 2 * margin`, `module_size = pixel_width / total`.
//! - The module at `(row, col)` originates at
//!   `((margin + col) * module_size, (margin + row) * module_size)`.
//! - A finder module fills its whole cell; any other dark module is a
//!   circle centered in the cell with radius
//!   `(module_size / 2) * dot_scale`.
//!
//! The background (quiet zone included) is the light color; backends
//! paint it before replaying commands. Failures are reported before any
//! command is produced, so a plan either exists in full or not at all.

#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::{Circle, Point, Rect};
use peniko::Color;
use peniko::color::Srgb;
use quietzone_matrix::QrMatrix;
use thiserror::Error;

/// Default circle radius as a fraction of half the module size.
///
/// 0.85 leaves a visible gap between neighboring dots while staying
/// dense enough to scan.
pub const DEFAULT_DOT_SCALE: f64 = 0.85;

/// Rasterization failures, shared by the planner and both backends.
///
/// Raised before any output is produced; a failed render never returns a
/// partial document or image.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RasterError {
    /// Output width of zero pixels.
    #[error("pixel width must be positive, got {width}")]
    InvalidPixelWidth {
        /// Rejected width.
        width: u32,
    },
    /// A matrix claiming zero modules per side.
    #[error("matrix size must be positive")]
    EmptyMatrix,
    /// A dot scale that cannot produce geometry.
    ///
    /// The useful range is `(0, 1]` and values above 1 are deliberately
    /// let through for overlapping styles; only non-positive or
    /// non-finite scales are refused.
    #[error("dot scale must be positive and finite, got {scale}")]
    InvalidDotScale {
        /// Rejected scale.
        scale: f64,
    },
    /// A color string the CSS parser does not recognize.
    #[error("unrecognized color string {value:?}")]
    InvalidColor {
        /// The offending input.
        value: String,
    },
    /// The raster backend could not acquire its drawing surface.
    #[error("drawing surface of {width}x{width} pixels could not be acquired")]
    Surface {
        /// Requested surface width.
        width: u32,
    },
    /// Logo overlay bytes that do not decode as a PNG image.
    #[error("logo bytes are not a decodable PNG image")]
    LogoDecode,
    /// PNG serialization of a finished surface failed.
    #[error("PNG encoding failed: {reason}")]
    PngEncode {
        /// Encoder-reported failure.
        reason: String,
    },
}

/// Parses a CSS color string into a [`Color`].
///
/// Accepts whatever the CSS color grammar accepts: named colors, hex
/// forms, `rgb()` and friends. Colors are not validated against any
/// palette.
pub fn parse_css_color(css: &str) -> Result<Color, RasterError> {
    peniko::color::parse_color(css)
        .map(|parsed| parsed.to_alpha_color::<Srgb>())
        .map_err(|_| RasterError::InvalidColor {
            value: String::from(css),
        })
}

/// Rasterization configuration for one render call.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderParams {
    /// Output width and height in pixels; the canvas is always square.
    pub pixel_width: u32,
    /// Module fill color.
    pub color_dark: Color,
    /// Background and quiet-zone color, painted across the full canvas
    /// before any module is drawn.
    pub color_light: Color,
    /// Circle radius relative to half the module size. See
    /// [`DEFAULT_DOT_SCALE`]; values above 1 overlap neighboring cells.
    pub dot_scale: f64,
}

impl RenderParams {
    /// Builds params from CSS color strings.
    pub fn with_css_colors(
        pixel_width: u32,
        color_dark: &str,
        color_light: &str,
        dot_scale: f64,
    ) -> Result<Self, RasterError> {
        Ok(Self {
            pixel_width,
            color_dark: parse_css_color(color_dark)?,
            color_light: parse_css_color(color_light)?,
            dot_scale,
        })
    }
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            pixel_width: 512,
            color_dark: Color::BLACK,
            color_light: Color::WHITE,
            dot_scale: DEFAULT_DOT_SCALE,
        }
    }
}

/// One abstract draw command, always filled in the dark color.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DotCmd {
    /// Axis-aligned square covering a finder-pattern module cell.
    FillSquare(Rect),
    /// Circle centered in an ordinary dark module cell.
    FillDot(Circle),
}

/// The finished geometry pass: validated params plus the ordered command
/// stream every backend replays verbatim.
///
/// Plans are cheap, immutable, and single-use; build one per render
/// call. Command order is row-major over the matrix, so identical inputs
/// produce identical streams, byte for byte downstream.
#[derive(Clone, Debug, PartialEq)]
pub struct DotPlan {
    commands: Vec<DotCmd>,
    params: RenderParams,
    module_size: f64,
}

impl DotPlan {
    /// Runs the geometry pass over `matrix` with `params`.
    ///
    /// Validates everything up front: a zero pixel width, a zero-size
    /// matrix, and degenerate dot scales all fail here, before any
    /// command exists.
    pub fn new(matrix: &QrMatrix, params: &RenderParams) -> Result<Self, RasterError> {
        if params.pixel_width == 0 {
            return Err(RasterError::InvalidPixelWidth {
                width: params.pixel_width,
            });
        }
        if matrix.size == 0 {
            return Err(RasterError::EmptyMatrix);
        }
        if !params.dot_scale.is_finite() || params.dot_scale <= 0.0 {
            return Err(RasterError::InvalidDotScale {
                scale: params.dot_scale,
            });
        }

        let total = matrix.total_modules() as f64;
        let module_size = f64::from(params.pixel_width) / total;
        let margin = matrix.margin as usize;
        let radius = (module_size / 2.0) * params.dot_scale;

        let mut commands = Vec::with_capacity(matrix.size * matrix.size / 2);
        for row in 0..matrix.size {
            let y = (margin + row) as f64 * module_size;
            for col in 0..matrix.size {
                if !matrix.module(row, col) {
                    continue;
                }
                let x = (margin + col) as f64 * module_size;
                if matrix.is_finder(row, col) {
                    commands.push(DotCmd::FillSquare(Rect::new(
                        x,
                        y,
                        x + module_size,
                        y + module_size,
                    )));
                } else {
                    commands.push(DotCmd::FillDot(Circle::new(
                        Point::new(x + module_size / 2.0, y + module_size / 2.0),
                        radius,
                    )));
                }
            }
        }

        Ok(Self {
            commands,
            params: *params,
            module_size,
        })
    }

    /// The ordered draw commands.
    #[inline]
    pub fn commands(&self) -> &[DotCmd] {
        &self.commands
    }

    /// The validated render parameters this plan was built with.
    #[inline]
    pub fn params(&self) -> &RenderParams {
        &self.params
    }

    /// Edge length of one module cell in pixels.
    #[inline]
    pub fn module_size(&self) -> f64 {
        self.module_size
    }

    /// Output canvas width and height in pixels.
    #[inline]
    pub fn pixel_width(&self) -> u32 {
        self.params.pixel_width
    }
}
