use crate::error::Result;
use crate::options::Options;
use crate::render::QrRenderer;

use image::RgbaImage;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/*---- Utilities ----*/

/// Renders a styled QR code and returns it as PNG bytes.
///
/// # Arguments
///
/// * `content` - The content to encode into the QR Code.
/// * `options` - Optional. Rendering options; defaults to [`Options::default`].
///
/// # Example
///
/// ```
/// use sqrc::helper::generate_png;
///
/// let png = generate_png("Hello, World!", None).unwrap();
/// assert!(!png.is_empty());
/// ```
pub fn generate_png(content: &str, options: Option<Options>) -> Result<Vec<u8>> {
    QrRenderer::new(content, options.unwrap_or_default())?.render()
}

/// Renders a styled QR code into an in-memory image buffer.
///
/// # Arguments
///
/// * `content` - The content to encode into the QR Code.
/// * `options` - Optional. Rendering options; defaults to [`Options::default`].
///
/// # Returns
///
/// An `RgbaImage` of exactly `options.size` pixels square.
///
/// # Example
///
/// ```
/// use sqrc::helper::generate_image_buffer;
///
/// let img = generate_image_buffer("Hello, World!", None).unwrap();
/// assert_eq!(img.dimensions(), (150, 150));
/// ```
pub fn generate_image_buffer(content: &str, options: Option<Options>) -> Result<RgbaImage> {
    QrRenderer::new(content, options.unwrap_or_default())?.render_image()
}

/// Renders a styled QR code and saves it as a PNG file.
///
/// # Arguments
///
/// * `content` - The content to encode into the QR Code.
/// * `options` - Optional. Rendering options; defaults to [`Options::default`].
/// * `directory` - Optional. The directory path where the image will be saved. If not provided, the default directory is "generated".
/// * `filename` - Optional. The name of the image file, without extension. If not provided, a timestamp-based filename will be used.
///
/// # Returns
///
/// The path of the written file.
///
/// # Example
///
/// ```no_run
/// use sqrc::helper::generate_image;
///
/// let path = generate_image("Hello, World!", None, Some("images"), Some("qr_code")).unwrap();
/// println!("saved {}", path.display());
/// ```
pub fn generate_image(
    content: &str,
    options: Option<Options>,
    directory: Option<&str>,
    filename: Option<&str>,
) -> Result<PathBuf> {
    let png = generate_png(content, options)?;

    let directory = Path::new(directory.unwrap_or("generated"));
    let filename = match filename {
        Some(name) => name.to_string(),
        None => timestamp_filename(),
    };
    let file_path = directory.join(format!("{}.png", filename));

    // Check if the directory exists, create it if it doesn't
    if !directory.exists() {
        fs::create_dir_all(directory)?;
    }

    fs::write(&file_path, png)?;
    Ok(file_path)
}

fn timestamp_filename() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|since_the_epoch| since_the_epoch.as_millis())
        .unwrap_or_default();
    format!("qr_{}", millis)
}
