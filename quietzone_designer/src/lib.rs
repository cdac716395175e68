// Copyright 2026 the Quietzone Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quietzone Designer: the full content-to-artifacts pipeline.
//!
//! One [`DesignSettings`] value captures everything the designer form
//! holds: the payload, colors, output size, error-correction level,
//! quiet-zone width, and dot scale. [`render_design`] runs the whole
//! chain (payload text, symbol extraction, geometry pass, both backends)
//! and returns a [`DesignArtifacts`] bundle ready for preview and
//! download.
//!
//! Every stage failure surfaces as a [`DesignError`]; nothing partial is
//! ever returned.

use quietzone_imaging::{DEFAULT_DOT_SCALE, DotPlan, RasterError, RenderParams};
use quietzone_imaging_png::{png_data_url, render_png};
use quietzone_imaging_svg::svg_document;
use quietzone_matrix::{EcLevel, ExtractError, QrMatrix, extract_matrix};
use quietzone_payload::{Payload, PayloadError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Any failure along the design pipeline.
#[derive(Debug, Error)]
pub enum DesignError {
    /// The payload was rejected before encoding.
    #[error("payload rejected: {0}")]
    Payload(#[from] PayloadError),
    /// The symbol encoder could not represent the payload.
    #[error("symbol encoding failed: {0}")]
    Extract(#[from] ExtractError),
    /// Geometry or backend failure while rendering.
    #[error("rendering failed: {0}")]
    Raster(#[from] RasterError),
}

/// The designer form as one serializable value.
///
/// Defaults mirror the designer's initial form state: slate-900 on
/// white, 512 px, level H, a two-module quiet zone, and the standard
/// dot scale. Deserialization fills missing fields from those defaults,
/// so persisted partial settings keep loading as the form grows fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignSettings {
    /// Content to encode.
    pub payload: Payload,
    /// Module color, as a CSS color string.
    pub color_dark: String,
    /// Background and quiet-zone color, as a CSS color string.
    pub color_light: String,
    /// Output width and height in pixels.
    pub pixel_width: u32,
    /// Error-correction level for the symbol.
    pub error_correction: EcLevel,
    /// Quiet-zone width in modules.
    pub margin_modules: u32,
    /// Data-module circle radius relative to half the module size.
    pub dot_scale: f64,
}

impl Default for DesignSettings {
    fn default() -> Self {
        Self {
            payload: Payload::Url(String::new()),
            color_dark: String::from("#0f172a"),
            color_light: String::from("#ffffff"),
            pixel_width: 512,
            error_correction: EcLevel::H,
            margin_modules: 2,
            dot_scale: DEFAULT_DOT_SCALE,
        }
    }
}

impl DesignSettings {
    /// Settings for `payload` with every other field at its default.
    pub fn for_payload(payload: Payload) -> Self {
        Self {
            payload,
            ..Self::default()
        }
    }

    /// Resolves the color strings and scale into validated
    /// [`RenderParams`].
    pub fn render_params(&self) -> Result<RenderParams, RasterError> {
        RenderParams::with_css_colors(
            self.pixel_width,
            &self.color_dark,
            &self.color_light,
            self.dot_scale,
        )
    }
}

/// Everything one generation call produces.
#[derive(Clone, Debug, PartialEq)]
pub struct DesignArtifacts {
    /// The extracted module matrix.
    pub matrix: QrMatrix,
    /// Self-contained SVG document.
    pub svg: String,
    /// PNG-encoded raster image.
    pub png: Vec<u8>,
    /// The PNG as a `data:` URL.
    pub data_url: String,
    /// Side length of both outputs in pixels.
    pub pixel_width: u32,
}

impl DesignArtifacts {
    /// HTML snippet embedding the raster output at its native size.
    pub fn embed_snippet(&self) -> String {
        quietzone_imaging_png::embed_snippet(&self.data_url, self.pixel_width)
    }
}

/// Runs the design pipeline once.
///
/// Payload validation, symbol extraction, the geometry pass, and both
/// backends run in order; the first failure aborts the call.
pub fn render_design(settings: &DesignSettings) -> Result<DesignArtifacts, DesignError> {
    let text = settings.payload.to_text()?;
    tracing::debug!(
        "Encoding {} payload of {} chars",
        payload_kind(&settings.payload),
        text.chars().count()
    );

    let matrix = extract_matrix(&text, settings.error_correction, settings.margin_modules)?;
    tracing::debug!(
        "Symbol is {0}x{0} modules with a {1}-module quiet zone",
        matrix.size,
        matrix.margin
    );

    let params = settings.render_params()?;
    let plan = DotPlan::new(&matrix, &params)?;
    let svg = svg_document(&plan);
    let png = render_png(&plan)?;
    let data_url = png_data_url(&png);
    tracing::debug!(
        "Rendered {} SVG bytes and {} PNG bytes at {} px",
        svg.len(),
        png.len(),
        settings.pixel_width
    );

    Ok(DesignArtifacts {
        matrix,
        svg,
        png,
        data_url,
        pixel_width: settings.pixel_width,
    })
}

fn payload_kind(payload: &Payload) -> &'static str {
    match payload {
        Payload::Url(_) => "url",
        Payload::Text(_) => "text",
        Payload::Wifi(_) => "wifi",
    }
}
