// Copyright 2026 the Quietzone Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quietzone Matrix: the QR module-matrix value type and its extractor.
//!
//! A QR symbol, once encoded, is nothing more than a square grid of dark
//! and light modules. This crate owns that intermediate representation and
//! the thin adapter that produces it from the external symbol encoder:
//!
//! - [`QrMatrix`]: flat row-major boolean grid plus its module count and
//!   the quiet-zone margin requested for rendering.
//! - [`is_finder_module`]: the pure predicate classifying a coordinate as
//!   part of one of the three 7×7 finder patterns.
//! - [`extract_matrix`] (feature `encoder`): requests an encoded symbol
//!   from the `qrcode` crate and linearizes its module grid.
//!
//! Everything downstream (the dot-plan geometry pass and its SVG/PNG
//! backends) consumes [`QrMatrix`] and never talks to the encoder.
//!
//! Extraction is deterministic: identical payload and error-correction
//! level always produce an identical matrix. The symbol size is chosen by
//! the encoder from payload length and level; nothing here influences it.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use thiserror::Error;

/// QR error-correction level, ordered by increasing redundancy.
///
/// Higher levels survive more symbol damage but hold less payload. The
/// level participates in symbol sizing, so it is part of the extraction
/// key alongside the payload text.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EcLevel {
    /// Recovers from ~7% damage.
    L,
    /// Recovers from ~15% damage. The encoder's own plain constructor
    /// defaults to this level.
    #[default]
    M,
    /// Recovers from ~25% damage.
    Q,
    /// Recovers from ~30% damage.
    H,
}

impl EcLevel {
    #[cfg(feature = "encoder")]
    fn to_qrcode(self) -> qrcode::EcLevel {
        match self {
            Self::L => qrcode::EcLevel::L,
            Self::M => qrcode::EcLevel::M,
            Self::Q => qrcode::EcLevel::Q,
            Self::H => qrcode::EcLevel::H,
        }
    }
}

/// Errors produced while obtaining or validating a module matrix.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExtractError {
    /// The external encoder rejected the payload.
    ///
    /// Raised when the text exceeds symbol capacity at the requested
    /// error-correction level, or contains data the encoder's mode
    /// selection cannot carry. Terminal for this generation attempt;
    /// retrying with identical inputs fails identically.
    #[cfg(feature = "encoder")]
    #[error("QR encoding failed: {0}")]
    Encoding(#[from] qrcode::types::QrError),
    /// The module grid length does not match a square of the stated size.
    #[error("module grid has {len} entries, expected {expected} for a {size}x{size} symbol")]
    MalformedGrid {
        /// Number of entries actually supplied.
        len: usize,
        /// Claimed modules per side.
        size: usize,
        /// `size * size`.
        expected: usize,
    },
    /// A symbol must have at least one module per side.
    #[error("matrix size must be at least 1")]
    EmptySymbol,
}

/// Classifies a module coordinate as part of a finder pattern.
///
/// A module at `(row, col)` in a symbol of `size` modules per side belongs
/// to a finder pattern when it falls in one of the three 7×7 corner
/// blocks: top-left (`row < 7 && col < 7`), top-right
/// (`row < 7 && col >= size - 7`), or bottom-left
/// (`row >= size - 7 && col < 7`).
///
/// QR symbols carry exactly three finder patterns; the bottom-right
/// corner never holds one. That asymmetry is part of the format, and the
/// classification depends only on coordinates and symbol size, never on
/// module contents or styling.
pub const fn is_finder_module(row: usize, col: usize, size: usize) -> bool {
    let far = size.saturating_sub(7);
    (row < 7 && col < 7) || (row < 7 && col >= far) || (row >= far && col < 7)
}

/// A decoded QR symbol: square boolean module grid plus render margin.
///
/// `modules` is row-major with exactly `size * size` entries; `true`
/// marks a dark ("on") module. `margin` is the quiet-zone width in module
/// units applied symmetrically on all four sides at render time; it is a
/// rendering parameter and never part of the grid itself.
///
/// Values are ephemeral: extracted fresh per generation call, never
/// cached or mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QrMatrix {
    /// Row-major module grid, `true` = dark.
    pub modules: Vec<bool>,
    /// Modules per side, intrinsic to the encoded payload and level.
    pub size: usize,
    /// Quiet-zone width in module units.
    pub margin: u32,
}

impl QrMatrix {
    /// Builds a matrix from an already linearized module grid.
    ///
    /// Rejects a zero size and any grid whose length is not
    /// `size * size`.
    pub fn from_modules(
        modules: Vec<bool>,
        size: usize,
        margin: u32,
    ) -> Result<Self, ExtractError> {
        if size == 0 {
            return Err(ExtractError::EmptySymbol);
        }
        let expected = size * size;
        if modules.len() != expected {
            return Err(ExtractError::MalformedGrid {
                len: modules.len(),
                size,
                expected,
            });
        }
        Ok(Self {
            modules,
            size,
            margin,
        })
    }

    /// Whether the module at `(row, col)` is dark.
    ///
    /// Panics if either coordinate is out of bounds, like any slice
    /// index.
    #[inline]
    pub fn module(&self, row: usize, col: usize) -> bool {
        self.modules[row * self.size + col]
    }

    /// Whether `(row, col)` lies inside one of the three finder patterns.
    #[inline]
    pub fn is_finder(&self, row: usize, col: usize) -> bool {
        is_finder_module(row, col, self.size)
    }

    /// Symbol width including the quiet zone, in module units.
    #[inline]
    pub fn total_modules(&self) -> usize {
        self.size + 2 * self.margin as usize
    }
}

/// Requests an encoded symbol and linearizes it into a [`QrMatrix`].
///
/// The encoder alone decides the symbol size (version) from payload
/// length and error-correction level; this adapter only flattens the
/// result. `margin_modules` is carried through untouched for the
/// renderer.
///
/// Fails with [`ExtractError::Encoding`] when the payload cannot be
/// represented at the requested level. That failure is terminal and not
/// worth retrying.
#[cfg(feature = "encoder")]
pub fn extract_matrix(
    text: &str,
    level: EcLevel,
    margin_modules: u32,
) -> Result<QrMatrix, ExtractError> {
    let code = qrcode::QrCode::with_error_correction_level(text.as_bytes(), level.to_qrcode())?;
    let size = code.width();
    let modules: Vec<bool> = code
        .to_colors()
        .into_iter()
        .map(|module| module == qrcode::Color::Dark)
        .collect();
    QrMatrix::from_modules(modules, size, margin_modules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn finder_regions_cover_exactly_three_corners() {
        let size = 21;
        assert!(is_finder_module(0, 0, size), "top-left corner");
        assert!(is_finder_module(6, 6, size), "top-left block edge");
        assert!(is_finder_module(0, 14, size), "top-right block start");
        assert!(is_finder_module(0, 20, size), "top-right corner");
        assert!(is_finder_module(14, 0, size), "bottom-left block start");
        assert!(is_finder_module(20, 6, size), "bottom-left block edge");

        assert!(!is_finder_module(7, 7, size), "inside data area");
        assert!(!is_finder_module(7, 0, size), "below top-left block");
        assert!(!is_finder_module(0, 13, size), "left of top-right block");
    }

    #[test]
    fn bottom_right_corner_is_never_finder() {
        let size = 25;
        for row in (size - 7)..size {
            for col in (size - 7)..size {
                assert!(
                    !is_finder_module(row, col, size),
                    "({row}, {col}) misclassified as finder"
                );
            }
        }
    }

    #[test]
    fn classification_ignores_everything_but_coordinates() {
        // Same coordinates, two different sizes: the far blocks move with
        // the symbol edge.
        assert!(is_finder_module(0, 14, 21));
        assert!(!is_finder_module(0, 14, 25));
        assert!(is_finder_module(0, 18, 25));
    }

    #[test]
    fn matrix_requires_square_grid() {
        let err = QrMatrix::from_modules(vec![true; 20], 21, 0).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::MalformedGrid {
                len: 20,
                size: 21,
                expected: 441,
            }
        ));
        assert!(matches!(
            QrMatrix::from_modules(vec![], 0, 0).unwrap_err(),
            ExtractError::EmptySymbol
        ));
    }

    #[test]
    fn module_accessor_is_row_major() {
        let matrix = QrMatrix::from_modules(vec![true, false, false, true], 2, 0).unwrap();
        assert!(matrix.module(0, 0));
        assert!(!matrix.module(0, 1));
        assert!(!matrix.module(1, 0));
        assert!(matrix.module(1, 1));
    }

    #[test]
    fn total_modules_includes_margin_on_both_sides() {
        let matrix = QrMatrix::from_modules(vec![false; 441], 21, 2).unwrap();
        assert_eq!(matrix.total_modules(), 25);
        let bare = QrMatrix::from_modules(vec![false; 441], 21, 0).unwrap();
        assert_eq!(bare.total_modules(), 21);
    }

    #[cfg(feature = "encoder")]
    mod encoder {
        use super::*;

        #[test]
        fn extraction_is_deterministic() {
            let a = extract_matrix("https://example.com", EcLevel::H, 2).unwrap();
            let b = extract_matrix("https://example.com", EcLevel::H, 2).unwrap();
            assert_eq!(a.size, b.size);
            assert_eq!(a.modules, b.modules);
        }

        #[test]
        fn extracted_grid_is_square_with_margin_carried_through() {
            let matrix = extract_matrix("https://example.com", EcLevel::H, 2).unwrap();
            assert!(matrix.size >= 21, "smallest QR symbol is 21 modules");
            assert_eq!(matrix.size % 2, 1, "QR symbol sizes are odd");
            assert_eq!(matrix.modules.len(), matrix.size * matrix.size);
            assert_eq!(matrix.margin, 2);
        }

        #[test]
        fn level_participates_in_symbol_sizing() {
            let text = "https://example.com/some/longer/path?with=query";
            let low = extract_matrix(text, EcLevel::L, 0).unwrap();
            let high = extract_matrix(text, EcLevel::H, 0).unwrap();
            assert!(
                high.size >= low.size,
                "more redundancy never shrinks the symbol"
            );
        }

        #[test]
        fn over_capacity_payload_is_rejected() {
            let text = "q".repeat(8000);
            let err = extract_matrix(&text, EcLevel::H, 0).unwrap_err();
            assert!(matches!(err, ExtractError::Encoding(_)));
        }

        #[test]
        fn finder_corners_are_dark_in_real_symbols() {
            // The outer ring of every finder pattern is dark, so the
            // three pattern corners are reliable probes.
            let matrix = extract_matrix("probe", EcLevel::M, 0).unwrap();
            let far = matrix.size - 1;
            assert!(matrix.module(0, 0));
            assert!(matrix.module(0, far));
            assert!(matrix.module(far, 0));
            assert!(matrix.is_finder(0, 0));
            assert!(matrix.is_finder(0, far));
            assert!(matrix.is_finder(far, 0));
            assert!(!matrix.is_finder(far, far));
        }
    }
}
