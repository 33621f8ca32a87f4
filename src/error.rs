use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can abort building or rendering a styled QR code.
///
/// Every variant is terminal for the current render; nothing is retried.
#[derive(Debug, Error)]
pub enum Error {
    /// The options describe an image that cannot be drawn (non-positive size,
    /// quiet zone too wide, out-of-range scale or opacity, ...).
    #[error("invalid configuration: {0}")]
    Config(String),
    /// The encoder rejected the payload, e.g. too long for the chosen version and ECC level.
    #[error("QR encoding failed: {0}")]
    Encode(#[source] qrcode::types::QrError),
    /// The logo bytes could not be fetched.
    #[error("failed to fetch logo from `{location}`: {reason}")]
    LogoFetch { location: String, reason: String },
    /// The logo bytes were fetched but are not a decodable image.
    #[error("failed to decode logo image: {0}")]
    LogoDecode(#[source] image::ImageError),
    /// The raster surface could not be allocated.
    #[error("raster surface error: {0}")]
    Surface(String),
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
