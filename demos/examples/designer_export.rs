// Copyright 2026 the Quietzone Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end designer pipeline: one payload, every export surface.
//!
//! Renders a URL payload with the designer defaults and writes the
//! vector and raster artifacts to the working directory, then renders
//! a Wi-Fi join card with custom colors:
//!   `cargo run -p quietzone_demos --example designer_export`

use quietzone_designer::{DesignSettings, render_design};
use quietzone_payload::{Payload, WifiCredentials, WifiSecurity};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quietzone_designer=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = DesignSettings::for_payload(Payload::Url("https://example.com/menu".into()));
    let artifacts = render_design(&settings)?;

    std::fs::write("designer_export.svg", artifacts.svg.as_bytes())?;
    eprintln!("Wrote designer_export.svg");
    std::fs::write("designer_export.png", &artifacts.png)?;
    eprintln!("Wrote designer_export.png");

    // The embeddable form goes to stdout so it can be piped into a page.
    println!("{}", artifacts.embed_snippet());

    let mut wifi = DesignSettings::for_payload(Payload::Wifi(WifiCredentials {
        ssid: "Atelier Guest".into(),
        password: "letterpress".into(),
        security: WifiSecurity::Wpa,
        hidden: false,
    }));
    wifi.color_dark = "#134e5e".into();
    wifi.color_light = "#f8fafc".into();
    wifi.pixel_width = 640;

    let badge = render_design(&wifi)?;
    std::fs::write("wifi_badge.png", &badge.png)?;
    eprintln!(
        "Wrote wifi_badge.png ({}x{} modules)",
        badge.matrix.size, badge.matrix.size
    );

    Ok(())
}
