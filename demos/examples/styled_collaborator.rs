// Copyright 2026 the Quietzone Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polling a styled-renderer collaborator to completion.
//!
//! The collaborator here is an in-process stand-in that serves the
//! house SVG backend's markup after a few polls, so the demo runs
//! without any external renderer:
//!   `cargo run -p quietzone_demos --example styled_collaborator`

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use quietzone_imaging::{DotPlan, RenderParams};
use quietzone_imaging_svg::svg_document;
use quietzone_matrix::{EcLevel, extract_matrix};
use quietzone_styled::{
    CornerSquareStyle, DotStyle, GradientPreset, StyledError, StyledOptions, StyledOutput,
    StyledRenderer, render_styled,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const TEXT: &str = "https://example.com/tickets";

/// Serves prepared markup once enough polls have gone by.
struct DelayedRenderer {
    ready_after: u32,
    polls: AtomicU32,
    markup: String,
}

#[async_trait]
impl StyledRenderer for DelayedRenderer {
    async fn request(&self, options: &StyledOptions) -> Result<(), StyledError> {
        tracing::info!(
            "Collaborator accepted a {}px render of {} chars",
            options.width,
            options.text.chars().count()
        );
        Ok(())
    }

    async fn poll(&self) -> Result<Option<StyledOutput>, StyledError> {
        let poll = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
        if poll < self.ready_after {
            return Ok(None);
        }
        Ok(Some(StyledOutput::Vector(self.markup.clone())))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quietzone_styled=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let matrix = extract_matrix(TEXT, EcLevel::Q, 2)?;
    let plan = DotPlan::new(&matrix, &RenderParams::default())?;
    let renderer = DelayedRenderer {
        ready_after: 3,
        polls: AtomicU32::new(0),
        markup: svg_document(&plan),
    };

    let mut options = StyledOptions::new(TEXT, 512, EcLevel::Q);
    options.dots_type = Some(DotStyle::Rounded);
    options.dots_gradient = Some(GradientPreset::Ocean.gradient());
    options.corner_square_type = Some(CornerSquareStyle::ExtraRounded);

    match render_styled(&renderer, &options).await? {
        StyledOutput::Vector(markup) => {
            std::fs::write("styled_collaborator.svg", markup.as_bytes())?;
            eprintln!(
                "Wrote styled_collaborator.svg after {} polls",
                renderer.polls.load(Ordering::SeqCst)
            );
        }
        StyledOutput::Raster(bytes) => {
            std::fs::write("styled_collaborator.png", &bytes)?;
            eprintln!("Wrote styled_collaborator.png");
        }
    }

    Ok(())
}
