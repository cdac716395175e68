// Copyright 2026 the Quietzone Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quietzone Payload: user content to canonical QR payload text.
//!
//! Three content kinds are supported: a URL (normalized so bare domains
//! scan as links), free text (passed through verbatim), and Wi-Fi
//! credentials (formatted as the `WIFI:` scheme network configurators
//! understand). [`Payload::to_text`] validates the content and produces
//! the exact string handed to the symbol encoder.

#![no_std]

extern crate alloc;

use alloc::string::String;
use thiserror::Error;

/// Longest free-text payload accepted, in characters.
///
/// Larger texts force very dense symbols that scan poorly at typical
/// preview sizes, so they are rejected up front instead of deep inside
/// the encoder.
pub const MAX_TEXT_CHARS: usize = 2000;

/// Payload validation errors, raised before any encoding is attempted.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum PayloadError {
    /// URL content with nothing in it.
    #[error("URL is empty")]
    EmptyUrl,
    /// Text content with nothing in it.
    #[error("text is empty")]
    EmptyText,
    /// Text content over [`MAX_TEXT_CHARS`].
    #[error("text runs {len} characters, over the {MAX_TEXT_CHARS} supported")]
    TextTooLong {
        /// Character count of the rejected text.
        len: usize,
    },
    /// Wi-Fi credentials without a network name.
    #[error("Wi-Fi SSID is empty")]
    EmptySsid,
    /// Secured Wi-Fi network without a password.
    #[error("Wi-Fi password is required unless security is nopass")]
    MissingPassword,
}

/// Wi-Fi authentication mode, named as the `WIFI:` scheme spells it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WifiSecurity {
    /// WPA/WPA2 personal.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "WPA"))]
    Wpa,
    /// Legacy WEP.
    #[cfg_attr(feature = "serde", serde(rename = "WEP"))]
    Wep,
    /// Open network, no password field emitted.
    #[cfg_attr(feature = "serde", serde(rename = "nopass"))]
    Nopass,
}

impl WifiSecurity {
    fn as_wire(self) -> &'static str {
        match self {
            Self::Wpa => "WPA",
            Self::Wep => "WEP",
            Self::Nopass => "nopass",
        }
    }
}

/// Credentials for a Wi-Fi join payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WifiCredentials {
    /// Network name. Reserved characters are escaped on output.
    pub ssid: String,
    /// Network password; ignored for [`WifiSecurity::Nopass`].
    pub password: String,
    /// Authentication mode.
    pub security: WifiSecurity,
    /// Whether the network suppresses SSID broadcast (`H:true`).
    pub hidden: bool,
}

/// One piece of user content destined for a QR symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Payload {
    /// A link; bare domains are normalized to `https://`.
    Url(String),
    /// Verbatim text, up to [`MAX_TEXT_CHARS`] characters.
    Text(String),
    /// Wi-Fi credentials, emitted in the `WIFI:` scheme.
    Wifi(WifiCredentials),
}

impl Payload {
    /// Validates the content and renders the canonical payload text.
    pub fn to_text(&self) -> Result<String, PayloadError> {
        match self {
            Self::Url(url) => {
                let normalized = normalize_url(url);
                if normalized.is_empty() {
                    return Err(PayloadError::EmptyUrl);
                }
                Ok(normalized)
            }
            Self::Text(text) => {
                if text.trim().is_empty() {
                    return Err(PayloadError::EmptyText);
                }
                let len = text.chars().count();
                if len > MAX_TEXT_CHARS {
                    return Err(PayloadError::TextTooLong { len });
                }
                Ok(text.clone())
            }
            Self::Wifi(wifi) => wifi_join_text(wifi),
        }
    }
}

/// Prepares a user-typed URL for encoding.
///
/// Leading/trailing whitespace is trimmed. Anything already carrying an
/// `http://` or `https://` scheme (ASCII case-insensitive) passes
/// through unchanged. A bare domain, recognized as containing a dot and
/// no spaces, gains an `https://` prefix. Everything else is returned
/// trimmed, letting the caller decide whether it was meant as a URL at
/// all.
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let has_scheme = trimmed
        .get(..7)
        .is_some_and(|p| p.eq_ignore_ascii_case("http://"))
        || trimmed
            .get(..8)
            .is_some_and(|p| p.eq_ignore_ascii_case("https://"));
    if has_scheme {
        return String::from(trimmed);
    }
    if trimmed.contains('.') && !trimmed.contains(' ') {
        let mut out = String::with_capacity(trimmed.len() + 8);
        out.push_str("https://");
        out.push_str(trimmed);
        return out;
    }
    String::from(trimmed)
}

/// Escapes the characters the `WIFI:` scheme reserves.
///
/// `\`, `;`, `,` and `"` each gain a leading backslash so SSIDs and
/// passwords containing field separators survive parsing.
pub fn escape_wifi_field(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 4);
    for c in field.chars() {
        if matches!(c, '\\' | ';' | ',' | '"') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn wifi_join_text(wifi: &WifiCredentials) -> Result<String, PayloadError> {
    if wifi.ssid.trim().is_empty() {
        return Err(PayloadError::EmptySsid);
    }
    let open = wifi.security == WifiSecurity::Nopass;
    if !open && wifi.password.trim().is_empty() {
        return Err(PayloadError::MissingPassword);
    }

    let mut out = String::with_capacity(wifi.ssid.len() + wifi.password.len() + 24);
    out.push_str("WIFI:T:");
    out.push_str(wifi.security.as_wire());
    out.push_str(";S:");
    out.push_str(&escape_wifi_field(&wifi.ssid));
    out.push(';');
    if !open {
        out.push_str("P:");
        out.push_str(&escape_wifi_field(&wifi.password));
        out.push(';');
    }
    if wifi.hidden {
        out.push_str("H:true;");
    }
    out.push(';');
    Ok(out)
}
