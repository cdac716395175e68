// Copyright 2026 the Quietzone Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Client-side model for an external styled-QR renderer.
//!
//! The styled path (shaped dots, gradients, embedded logos) is produced
//! by an outside collaborator rather than by the dot-plan pipeline. This
//! crate owns the two things the core is responsible for at that
//! boundary: the typed options the collaborator accepts, and the
//! completion-polling discipline for collecting its asynchronously
//! signaled output.
//!
//! The collaborator itself stays behind [`StyledRenderer`]; tests drive
//! the loop with scripted mock implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub use quietzone_matrix::EcLevel;

/// Delay before the first readiness poll.
pub const INITIAL_POLL_DELAY: Duration = Duration::from_millis(100);

/// Spacing between readiness polls after the first.
pub const POLL_SPACING: Duration = Duration::from_millis(50);

/// Number of readiness polls before giving up.
pub const MAX_POLL_ATTEMPTS: u32 = 10;

/// Vector markup shorter than this is treated as not-yet-rendered.
///
/// The collaborator materializes its document incrementally, so an empty
/// or skeletal root element can be observable before the real content
/// lands.
pub const MIN_VECTOR_MARKUP_BYTES: usize = 100;

/// Default logo edge length as a fraction of the symbol side.
pub const DEFAULT_LOGO_SIZE_FRACTION: f64 = 0.4;

/// Errors from the styled-renderer boundary.
#[derive(Debug, Error, PartialEq)]
pub enum StyledError {
    /// The collaborator produced no usable output inside the poll window.
    #[error("styled renderer produced no usable output after {attempts} polls")]
    CollaboratorTimeout {
        /// Polls performed before giving up.
        attempts: u32,
    },
    /// The collaborator reported a failure of its own.
    #[error("styled renderer failed: {reason}")]
    Collaborator {
        /// Collaborator-provided failure description.
        reason: String,
    },
    /// A gradient stop offset fell outside `[0, 1]`.
    #[error("gradient stop offset {offset} is outside [0, 1]")]
    InvalidStopOffset {
        /// The rejected offset.
        offset: f64,
    },
    /// A gradient was built with fewer than two color stops.
    #[error("gradient needs at least two color stops, got {count}")]
    TooFewStops {
        /// Number of stops supplied.
        count: usize,
    },
}

/// Gradient geometry kinds the collaborator supports.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    /// Straight-line gradient, optionally rotated.
    #[default]
    Linear,
    /// Gradient radiating from the center.
    Radial,
}

/// One color stop of a gradient.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    /// Position along the gradient axis, in `[0, 1]`.
    pub offset: f64,
    /// CSS color string at this position.
    pub color: String,
}

impl ColorStop {
    /// Stop at `offset` with the given color.
    pub fn new(offset: f64, color: impl Into<String>) -> Self {
        Self {
            offset,
            color: color.into(),
        }
    }
}

/// A gradient fill descriptor, serialized in the collaborator's wire
/// shape (`type` / `rotation` / `colorStops`).
///
/// The rotation value is forwarded to the collaborator untouched; stops
/// are kept in the order supplied, which callers keep ascending by
/// offset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gradient {
    /// Geometry kind.
    #[serde(rename = "type")]
    pub kind: GradientKind,
    /// Rotation, omitted from the wire when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    /// Ordered color stops.
    pub color_stops: Vec<ColorStop>,
}

impl Gradient {
    /// Validated gradient from explicit parts.
    ///
    /// Requires at least two stops, each with a finite offset in
    /// `[0, 1]`.
    pub fn new(
        kind: GradientKind,
        rotation: Option<f64>,
        stops: Vec<ColorStop>,
    ) -> Result<Self, StyledError> {
        if stops.len() < 2 {
            return Err(StyledError::TooFewStops { count: stops.len() });
        }
        for stop in &stops {
            if !(0.0..=1.0).contains(&stop.offset) {
                return Err(StyledError::InvalidStopOffset {
                    offset: stop.offset,
                });
            }
        }
        Ok(Self {
            kind,
            rotation,
            color_stops: stops,
        })
    }

    /// Validated linear gradient with a rotation.
    pub fn linear(rotation: f64, stops: Vec<ColorStop>) -> Result<Self, StyledError> {
        Self::new(GradientKind::Linear, Some(rotation), stops)
    }

    /// Validated radial gradient.
    pub fn radial(stops: Vec<ColorStop>) -> Result<Self, StyledError> {
        Self::new(GradientKind::Radial, None, stops)
    }
}

/// Named gradient presets offered in the designer's fill picker.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientPreset {
    /// Warm linear orange blend.
    Sunset,
    /// Cool linear blue-violet blend.
    Ocean,
    /// Radial cyan-to-magenta burst.
    Neon,
    /// Muted linear teal-to-green blend.
    Forest,
    /// Soft radial rose glow.
    Fire,
}

impl GradientPreset {
    /// Every preset, in picker order.
    pub const ALL: [Self; 5] = [
        Self::Sunset,
        Self::Ocean,
        Self::Neon,
        Self::Forest,
        Self::Fire,
    ];

    /// The gradient this preset names.
    pub fn gradient(self) -> Gradient {
        let (kind, rotation, stops) = match self {
            Self::Sunset => (
                GradientKind::Linear,
                Some(45.0),
                vec![ColorStop::new(0.0, "#ff7e5f"), ColorStop::new(1.0, "#feb47b")],
            ),
            Self::Ocean => (
                GradientKind::Linear,
                Some(135.0),
                vec![ColorStop::new(0.0, "#667eea"), ColorStop::new(1.0, "#764ba2")],
            ),
            Self::Neon => (
                GradientKind::Radial,
                None,
                vec![ColorStop::new(0.0, "#00f5ff"), ColorStop::new(1.0, "#fc00ff")],
            ),
            Self::Forest => (
                GradientKind::Linear,
                Some(90.0),
                vec![ColorStop::new(0.0, "#134e5e"), ColorStop::new(1.0, "#71b280")],
            ),
            Self::Fire => (
                GradientKind::Radial,
                None,
                vec![
                    ColorStop::new(0.0, "#ff9a9e"),
                    ColorStop::new(0.5, "#fecfef"),
                    ColorStop::new(1.0, "#fecfef"),
                ],
            ),
        };
        Gradient {
            kind,
            rotation,
            color_stops: stops,
        }
    }
}

/// Shapes for ordinary data modules.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DotStyle {
    /// Plain filled squares.
    #[default]
    Square,
    /// Filled circles.
    Dots,
    /// Squares with rounded corners.
    Rounded,
    /// Heavily rounded squares.
    ExtraRounded,
    /// Leaf-like shape with two sharp corners.
    Classy,
    /// Classy with the sharp corners softened.
    ClassyRounded,
}

/// Shapes for the outer ring of the finder patterns.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerSquareStyle {
    /// Square ring.
    #[default]
    Square,
    /// Circular ring.
    Dot,
    /// Rounded square ring.
    ExtraRounded,
}

/// Shapes for the solid center of the finder patterns.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerDotStyle {
    /// Square center.
    #[default]
    Square,
    /// Circular center.
    Dot,
}

/// The full option set the styled collaborator accepts, in its wire
/// field names.
///
/// Solid colors and gradients are carried side by side the way the wire
/// does; when both are present for the same surface the collaborator
/// prefers the gradient. Unset options fall back to the collaborator's
/// defaults (square shapes, no logo).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyledOptions {
    /// Text payload to encode.
    pub text: String,
    /// Output width in pixels.
    pub width: u32,
    /// Output height; the collaborator reuses `width` when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Error-correction level for the underlying symbol.
    pub error_correction_level: EcLevel,

    /// Solid fill for data modules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dots_color: Option<String>,
    /// Gradient fill for data modules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dots_gradient: Option<Gradient>,
    /// Data module shape.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dots_type: Option<DotStyle>,

    /// Solid background fill.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Gradient background fill.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_gradient: Option<Gradient>,

    /// Solid fill for the finder-pattern rings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_square_color: Option<String>,
    /// Gradient fill for the finder-pattern rings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_square_gradient: Option<Gradient>,
    /// Finder-pattern ring shape.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_square_type: Option<CornerSquareStyle>,

    /// Solid fill for the finder-pattern centers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_dot_color: Option<String>,
    /// Gradient fill for the finder-pattern centers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_dot_gradient: Option<Gradient>,
    /// Finder-pattern center shape.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_dot_type: Option<CornerDotStyle>,

    /// Logo image as a data URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Logo edge length as a fraction of the symbol side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_size: Option<f64>,
    /// Clear margin around the logo, in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_margin: Option<f64>,
    /// Whether modules behind the logo are suppressed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_background_dots: Option<bool>,
}

impl StyledOptions {
    /// Options with every styling surface left at the collaborator's
    /// default.
    pub fn new(text: impl Into<String>, width: u32, level: EcLevel) -> Self {
        Self {
            text: text.into(),
            width,
            height: None,
            error_correction_level: level,
            dots_color: None,
            dots_gradient: None,
            dots_type: None,
            background_color: None,
            background_gradient: None,
            corner_square_color: None,
            corner_square_gradient: None,
            corner_square_type: None,
            corner_dot_color: None,
            corner_dot_gradient: None,
            corner_dot_type: None,
            image: None,
            image_size: None,
            image_margin: None,
            hide_background_dots: None,
        }
    }

    /// Effective logo size fraction, defaulting to
    /// [`DEFAULT_LOGO_SIZE_FRACTION`].
    pub fn logo_size_fraction(&self) -> f64 {
        self.image_size.unwrap_or(DEFAULT_LOGO_SIZE_FRACTION)
    }

    /// Effective hide-background-dots flag; on unless disabled.
    pub fn hides_background_dots(&self) -> bool {
        self.hide_background_dots.unwrap_or(true)
    }
}

/// A finished answer from the collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StyledOutput {
    /// Self-contained vector markup.
    Vector(String),
    /// Encoded raster bytes (PNG).
    Raster(Vec<u8>),
}

impl StyledOutput {
    /// Whether this answer counts as a completed render.
    ///
    /// Vector markup must clear [`MIN_VECTOR_MARKUP_BYTES`]; raster
    /// output must be non-empty. Anything else is treated as the
    /// collaborator still being mid-render.
    pub fn is_complete(&self) -> bool {
        match self {
            Self::Vector(markup) => markup.len() > MIN_VECTOR_MARKUP_BYTES,
            Self::Raster(bytes) => !bytes.is_empty(),
        }
    }
}

/// The external styled-QR renderer.
///
/// `request` hands the collaborator its options and returns as soon as
/// rendering has started; `poll` is one cheap readiness check.
/// Completion is signaled asynchronously, so callers go through
/// [`render_styled`] rather than assuming an immediate answer.
#[async_trait]
pub trait StyledRenderer: Send + Sync {
    /// Start rendering with the given options.
    async fn request(&self, options: &StyledOptions) -> Result<(), StyledError>;

    /// Check for a finished render. `None` while still in flight.
    async fn poll(&self) -> Result<Option<StyledOutput>, StyledError>;
}

/// Drives a [`StyledRenderer`] to completion.
///
/// Submits the options, waits [`INITIAL_POLL_DELAY`], then polls up to
/// [`MAX_POLL_ATTEMPTS`] times at [`POLL_SPACING`] intervals. An answer
/// that fails [`StyledOutput::is_complete`] keeps the loop polling.
/// Exhausting the window fails with
/// [`StyledError::CollaboratorTimeout`]. Dropping the returned future
/// cancels the wait.
pub async fn render_styled<R>(
    renderer: &R,
    options: &StyledOptions,
) -> Result<StyledOutput, StyledError>
where
    R: StyledRenderer + ?Sized,
{
    renderer.request(options).await?;
    tokio::time::sleep(INITIAL_POLL_DELAY).await;

    for attempt in 1..=MAX_POLL_ATTEMPTS {
        if let Some(output) = renderer.poll().await? {
            if output.is_complete() {
                tracing::debug!("Styled render ready after {} poll(s)", attempt);
                return Ok(output);
            }
            tracing::debug!(
                "Styled render incomplete on attempt {}/{}",
                attempt,
                MAX_POLL_ATTEMPTS
            );
        } else {
            tracing::debug!(
                "Styled render not started on attempt {}/{}",
                attempt,
                MAX_POLL_ATTEMPTS
            );
        }
        if attempt < MAX_POLL_ATTEMPTS {
            tokio::time::sleep(POLL_SPACING).await;
        }
    }

    tracing::warn!(
        "Styled renderer produced no output after {} polls",
        MAX_POLL_ATTEMPTS
    );
    Err(StyledError::CollaboratorTimeout {
        attempts: MAX_POLL_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Renderer that reports readiness from a fixed poll onward.
    struct Scripted {
        ready_after: u32,
        output: StyledOutput,
        polls: AtomicU32,
        requested: Mutex<Option<StyledOptions>>,
    }

    impl Scripted {
        fn new(ready_after: u32, output: StyledOutput) -> Self {
            Self {
                ready_after,
                output,
                polls: AtomicU32::new(0),
                requested: Mutex::new(None),
            }
        }

        fn polls(&self) -> u32 {
            self.polls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StyledRenderer for Scripted {
        async fn request(&self, options: &StyledOptions) -> Result<(), StyledError> {
            *self.requested.lock().unwrap() = Some(options.clone());
            Ok(())
        }

        async fn poll(&self) -> Result<Option<StyledOutput>, StyledError> {
            let n = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
            if n >= self.ready_after {
                Ok(Some(self.output.clone()))
            } else {
                Ok(None)
            }
        }
    }

    struct FailsToStart;

    #[async_trait]
    impl StyledRenderer for FailsToStart {
        async fn request(&self, _options: &StyledOptions) -> Result<(), StyledError> {
            Err(StyledError::Collaborator {
                reason: "container rejected".into(),
            })
        }

        async fn poll(&self) -> Result<Option<StyledOutput>, StyledError> {
            Ok(None)
        }
    }

    fn options() -> StyledOptions {
        StyledOptions::new("https://example.com", 512, EcLevel::H)
    }

    fn long_markup() -> String {
        format!("<svg>{}</svg>", "m".repeat(200))
    }

    #[tokio::test(start_paused = true)]
    async fn polling_returns_the_output_once_ready() {
        let renderer = Scripted::new(3, StyledOutput::Vector(long_markup()));
        let output = render_styled(&renderer, &options()).await.unwrap();
        assert_eq!(output, StyledOutput::Vector(long_markup()));
        assert_eq!(renderer.polls(), 3, "stops polling once the answer lands");
        let seen = renderer.requested.lock().unwrap().clone().unwrap();
        assert_eq!(seen.text, "https://example.com");
        assert_eq!(seen.width, 512);
    }

    #[tokio::test(start_paused = true)]
    async fn immediately_ready_renderer_needs_one_poll() {
        let renderer = Scripted::new(1, StyledOutput::Vector(long_markup()));
        render_styled(&renderer, &options()).await.unwrap();
        assert_eq!(renderer.polls(), 1, "first poll already sees the output");
    }

    #[tokio::test(start_paused = true)]
    async fn exhausting_the_window_times_out() {
        let renderer = Scripted::new(u32::MAX, StyledOutput::Vector(long_markup()));
        let start = tokio::time::Instant::now();
        let err = render_styled(&renderer, &options()).await.unwrap_err();
        assert_eq!(
            err,
            StyledError::CollaboratorTimeout {
                attempts: MAX_POLL_ATTEMPTS
            }
        );
        assert_eq!(renderer.polls(), MAX_POLL_ATTEMPTS);
        // 100ms lead-in plus nine 50ms gaps between the ten polls.
        assert_eq!(start.elapsed(), Duration::from_millis(550));
    }

    #[tokio::test(start_paused = true)]
    async fn skeletal_markup_does_not_count_as_ready() {
        let renderer = Scripted::new(1, StyledOutput::Vector("<svg/>".into()));
        let err = render_styled(&renderer, &options()).await.unwrap_err();
        assert!(matches!(err, StyledError::CollaboratorTimeout { .. }));
        assert_eq!(
            renderer.polls(),
            MAX_POLL_ATTEMPTS,
            "short markup keeps the loop polling"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn raster_bytes_count_as_ready_on_arrival() {
        let renderer = Scripted::new(2, StyledOutput::Raster(vec![0x89, 0x50, 0x4e, 0x47]));
        let output = render_styled(&renderer, &options()).await.unwrap();
        assert!(matches!(output, StyledOutput::Raster(_)));
        assert_eq!(renderer.polls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn request_failure_surfaces_without_polling() {
        let err = render_styled(&FailsToStart, &options()).await.unwrap_err();
        assert_eq!(
            err,
            StyledError::Collaborator {
                reason: "container rejected".into()
            }
        );
    }

    #[test]
    fn empty_raster_output_is_not_complete() {
        assert!(!StyledOutput::Raster(Vec::new()).is_complete());
        assert!(StyledOutput::Raster(vec![1]).is_complete());
    }

    #[test]
    fn gradient_rejects_out_of_range_offsets() {
        let err = Gradient::linear(
            45.0,
            vec![ColorStop::new(0.0, "#000000"), ColorStop::new(1.5, "#ffffff")],
        )
        .unwrap_err();
        assert_eq!(err, StyledError::InvalidStopOffset { offset: 1.5 });
    }

    #[test]
    fn gradient_rejects_a_single_stop() {
        let err = Gradient::radial(vec![ColorStop::new(0.0, "#000000")]).unwrap_err();
        assert_eq!(err, StyledError::TooFewStops { count: 1 });
    }

    #[test]
    fn presets_carry_the_catalog_colors() {
        let sunset = GradientPreset::Sunset.gradient();
        assert_eq!(sunset.kind, GradientKind::Linear);
        assert_eq!(sunset.rotation, Some(45.0));
        assert_eq!(sunset.color_stops[0].color, "#ff7e5f");
        assert_eq!(sunset.color_stops[1].color, "#feb47b");

        let neon = GradientPreset::Neon.gradient();
        assert_eq!(neon.kind, GradientKind::Radial);
        assert_eq!(neon.rotation, None);

        let fire = GradientPreset::Fire.gradient();
        assert_eq!(fire.color_stops.len(), 3, "fire repeats its final color");
        assert_eq!(fire.color_stops[1].offset, 0.5);
        assert_eq!(fire.color_stops[2].color, "#fecfef");

        for preset in GradientPreset::ALL {
            let gradient = preset.gradient();
            assert!(gradient.color_stops.len() >= 2, "presets are well formed");
        }
    }

    #[test]
    fn options_serialize_in_wire_shape() {
        let mut options = StyledOptions::new("hello", 300, EcLevel::Q);
        options.dots_type = Some(DotStyle::ExtraRounded);
        options.dots_gradient = Some(GradientPreset::Ocean.gradient());
        options.corner_square_type = Some(CornerSquareStyle::Dot);
        options.image = Some("data:image/png;base64,AAAA".into());
        options.hide_background_dots = Some(false);

        let value: serde_json::Value = serde_json::to_value(&options).unwrap();
        assert_eq!(value["errorCorrectionLevel"], "Q");
        assert_eq!(value["dotsType"], "extra-rounded");
        assert_eq!(value["cornerSquareType"], "dot");
        assert_eq!(value["dotsGradient"]["type"], "linear");
        assert_eq!(value["dotsGradient"]["rotation"], 135.0);
        assert_eq!(value["dotsGradient"]["colorStops"][0]["color"], "#667eea");
        assert_eq!(value["hideBackgroundDots"], false);
        assert!(
            value.get("height").is_none(),
            "unset options stay off the wire"
        );
        assert!(value.get("backgroundColor").is_none());

        let back: StyledOptions = serde_json::from_value(value).unwrap();
        assert_eq!(back, options);
    }

    #[test]
    fn shape_names_match_the_collaborator_vocabulary() {
        assert_eq!(
            serde_json::to_string(&DotStyle::ClassyRounded).unwrap(),
            "\"classy-rounded\""
        );
        assert_eq!(
            serde_json::to_string(&CornerSquareStyle::ExtraRounded).unwrap(),
            "\"extra-rounded\""
        );
        assert_eq!(
            serde_json::to_string(&CornerDotStyle::Dot).unwrap(),
            "\"dot\""
        );
    }

    #[test]
    fn default_resolution_matches_the_renderer() {
        let options = options();
        assert_eq!(options.logo_size_fraction(), DEFAULT_LOGO_SIZE_FRACTION);
        assert!(options.hides_background_dots());
    }
}
