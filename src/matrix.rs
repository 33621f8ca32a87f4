//! The module grid a QR encoder produces.
//!
//! Rendering only ever asks two things of an encoded symbol: its side length and whether a
//! given cell is dark. [`QrMatrix`] is that contract; [`Matrix`] implements it on top of the
//! `qrcode` crate's encoder.

use qrcode::{EcLevel, QrCode, Version};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Read-only view of an encoded symbol. Rows run top to bottom, columns left to right.
pub trait QrMatrix {
    /// Side length of the symbol in modules, between 21 and 177.
    fn module_count(&self) -> usize;

    /// Whether the module at `(row, col)` is dark. Out-of-range coordinates are light.
    fn is_dark(&self, row: usize, col: usize) -> bool;
}

/// Error correction level for a QR code.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Serialize, Deserialize)]
pub enum EccLevel {
    /// Tolerates ~7% erroneous codewords.
    #[serde(rename = "L", alias = "low")]
    Low,
    /// Tolerates ~15% erroneous codewords.
    #[default]
    #[serde(rename = "M", alias = "medium")]
    Medium,
    /// Tolerates ~25% erroneous codewords.
    #[serde(rename = "Q", alias = "quartile")]
    Quartile,
    /// Tolerates ~30% erroneous codewords.
    #[serde(rename = "H", alias = "high")]
    High,
}

impl From<EccLevel> for EcLevel {
    fn from(level: EccLevel) -> Self {
        match level {
            EccLevel::Low => EcLevel::L,
            EccLevel::Medium => EcLevel::M,
            EccLevel::Quartile => EcLevel::Q,
            EccLevel::High => EcLevel::H,
        }
    }
}

/// Byte sequence handed to the encoder for a payload.
///
/// The encoder works on bytes; Rust strings are already UTF-8, so every character (including
/// multi-byte ones) maps to its UTF-8 bytes.
pub fn payload_bytes(payload: &str) -> &[u8] {
    payload.as_bytes()
}

/// An immutable square grid of modules, packed bitwise into bytes.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Matrix {
    size: usize,
    modules: Vec<u8>,
}

impl Matrix {
    /// Encodes `payload` at the given error correction level.
    ///
    /// With `version` set the symbol has exactly that version; otherwise the smallest version
    /// that holds the data is chosen. Encoder failures are returned as [`Error::Encode`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use sqrc::matrix::{EccLevel, Matrix, QrMatrix};
    ///
    /// let matrix = Matrix::encode("Hello, World!", EccLevel::Low, Some(1)).unwrap();
    /// assert_eq!(matrix.module_count(), 21);
    /// ```
    pub fn encode(payload: &str, ecc: EccLevel, version: Option<u8>) -> Result<Matrix> {
        let data = payload_bytes(payload);
        let code = match version {
            Some(v) => QrCode::with_version(data, Version::Normal(i16::from(v)), ecc.into()),
            None => QrCode::with_error_correction_level(data, ecc.into()),
        }
        .map_err(Error::Encode)?;

        let size = code.width();
        let colors = code.to_colors();
        Ok(Matrix::from_fn(size, |row, col| {
            colors[row * size + col] == qrcode::Color::Dark
        }))
    }

    /// Builds a matrix of side `size` from a per-cell predicate.
    pub fn from_fn(size: usize, mut is_dark: impl FnMut(usize, usize) -> bool) -> Matrix {
        let mut modules = vec![0u8; (size * size + 7) / 8];
        for row in 0..size {
            for col in 0..size {
                if is_dark(row, col) {
                    let index = row * size + col;
                    modules[index >> 3] |= 1u8 << (index & 7);
                }
            }
        }
        Matrix { size, modules }
    }
}

impl QrMatrix for Matrix {
    fn module_count(&self) -> usize {
        self.size
    }

    fn is_dark(&self, row: usize, col: usize) -> bool {
        if row >= self.size || col >= self.size {
            return false;
        }
        let index = row * self.size + col;
        get_bit(self.modules[index >> 3], (index & 7) as u8)
    }
}

fn get_bit(x: u8, i: u8) -> bool {
    ((x >> i) & 1) != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_picks_smallest_version() {
        let matrix = Matrix::encode("HELLO WORLD", EccLevel::Low, None).unwrap();
        assert_eq!(matrix.module_count(), 21);
    }

    #[test]
    fn test_encode_fixed_version() {
        let matrix = Matrix::encode("https://example.com/", EccLevel::Medium, Some(5)).unwrap();
        assert_eq!(matrix.module_count(), 5 * 4 + 17);
    }

    #[test]
    fn test_encode_too_long_for_version() {
        let payload = "x".repeat(200);
        let err = Matrix::encode(&payload, EccLevel::High, Some(1)).unwrap_err();
        assert!(matches!(err, Error::Encode(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_finder_pattern_corners_are_dark() {
        let matrix = Matrix::encode("https://example.com/", EccLevel::Medium, None).unwrap();
        let n = matrix.module_count();
        for (row, col) in [(0, 0), (0, n - 7), (n - 7, 0)] {
            // ring corners and the center of the 3x3 core
            assert!(matrix.is_dark(row, col));
            assert!(matrix.is_dark(row + 6, col + 6));
            assert!(!matrix.is_dark(row + 1, col + 1));
            assert!(matrix.is_dark(row + 3, col + 3));
        }
    }

    #[test]
    fn test_from_fn_and_out_of_range() {
        let matrix = Matrix::from_fn(21, |row, col| row == col);
        assert!(matrix.is_dark(3, 3));
        assert!(!matrix.is_dark(3, 4));
        assert!(!matrix.is_dark(21, 21));
    }

    #[test]
    fn test_payload_bytes_keeps_multibyte_characters() {
        assert_eq!(payload_bytes("é").to_vec(), vec![0xc3, 0xa9]);
        assert_eq!(payload_bytes("日").to_vec(), vec![0xe6, 0x97, 0xa5]);
        assert!(Matrix::encode("héllo 日本", EccLevel::Medium, None).is_ok());
    }
}
