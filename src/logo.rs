//! Center logo: footprint, module exclusion and compositing.

use std::fs;
use std::io::Read;

use image::imageops::FilterType;
use image::DynamicImage;
use log::debug;

use crate::color::{Brush, Color};
use crate::error::{Error, Result};
use crate::geometry::{pixels_to_cells, Circle, PathBuilder, Rect};
use crate::options::{LogoOptions, LogoStyle};
use crate::surface::{FillRule, Surface};

/// Upper bound on fetched logo bodies.
const MAX_LOGO_BYTES: u64 = 10 * 1024 * 1024;

/// Share of the drawable size a logo takes when no width is given.
const DEFAULT_LOGO_RATIO: f32 = 0.2;

/// Cells of margin kept clear around the logo when its background is emptied.
const EXCLUSION_MARGIN_CELLS: isize = 1;

/// Resolves a logo source into a decoded image.
///
/// Implemented for closures, so tests and embedders can supply images directly:
///
/// ```rust
/// use image::{DynamicImage, RgbaImage};
/// use sqrc::logo::ImageLoader;
///
/// let loader = |_: &str| -> sqrc::Result<DynamicImage> {
///     Ok(DynamicImage::ImageRgba8(RgbaImage::new(8, 8)))
/// };
/// assert_eq!(loader.load("anything").unwrap().width(), 8);
/// ```
pub trait ImageLoader {
    fn load(&self, source: &str) -> Result<DynamicImage>;
}

impl<F> ImageLoader for F
where
    F: Fn(&str) -> Result<DynamicImage>,
{
    fn load(&self, source: &str) -> Result<DynamicImage> {
        self(source)
    }
}

/// Fetches `http://` and `https://` sources over the network and reads anything else from
/// the filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultImageLoader;

impl DefaultImageLoader {
    fn fetch(&self, source: &str) -> Result<Vec<u8>> {
        let fetch_error = |reason: String| Error::LogoFetch {
            location: source.to_string(),
            reason,
        };

        if source.starts_with("http://") || source.starts_with("https://") {
            let response = ureq::get(source)
                .call()
                .map_err(|e| fetch_error(e.to_string()))?;
            let mut bytes = Vec::new();
            response
                .into_reader()
                .take(MAX_LOGO_BYTES)
                .read_to_end(&mut bytes)
                .map_err(|e| fetch_error(e.to_string()))?;
            Ok(bytes)
        } else {
            fs::read(source).map_err(|e| fetch_error(e.to_string()))
        }
    }
}

impl ImageLoader for DefaultImageLoader {
    fn load(&self, source: &str) -> Result<DynamicImage> {
        let bytes = self.fetch(source)?;
        debug!("fetched {} logo bytes from {}", bytes.len(), source);
        image::load_from_memory(&bytes).map_err(Error::LogoDecode)
    }
}

/// Pixel geometry of the logo, derived from the options and the drawable area.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct LogoMetrics {
    pub width: f32,
    pub height: f32,
    /// Offset of the logo inside the drawable area (quiet zone excluded).
    pub x: f32,
    pub y: f32,
    pub padding: f32,
    quiet_zone: f32,
}

impl LogoMetrics {
    pub fn new(logo: &LogoOptions, drawable_size: f32, quiet_zone: f32) -> Self {
        let width = logo.width.unwrap_or(drawable_size * DEFAULT_LOGO_RATIO);
        let height = logo.height.unwrap_or(width);
        LogoMetrics {
            width,
            height,
            x: (drawable_size - width) / 2.0,
            y: (drawable_size - height) / 2.0,
            padding: logo.padding,
            quiet_zone,
        }
    }

    /// Where the logo image lands on the surface.
    pub fn footprint(&self) -> Rect {
        Rect::new(
            self.x + self.quiet_zone,
            self.y + self.quiet_zone,
            self.width,
            self.height,
        )
    }

    /// The footprint grown by `padding` on every side.
    pub fn padded(&self) -> Rect {
        Rect::new(
            self.x + self.quiet_zone - self.padding,
            self.y + self.quiet_zone - self.padding,
            self.width + 2.0 * self.padding,
            self.height + 2.0 * self.padding,
        )
    }

    /// Grid cells hidden under the logo: every cell the footprint touches, grown by a
    /// one-cell margin on each side.
    pub fn exclusion_zone(&self, cell_size: f32) -> ExclusionZone {
        ExclusionZone {
            rows: touched_cells(self.y, self.height, cell_size),
            cols: touched_cells(self.x, self.width, cell_size),
        }
    }
}

/// Inclusive range of cells a pixel span `[start, start + length)` overlaps, plus the margin.
fn touched_cells(start: f32, length: f32, cell_size: f32) -> (isize, isize) {
    let first = pixels_to_cells(start, cell_size).floor() as isize;
    // exclusive end: a span ending exactly on a cell boundary does not touch the next cell
    let end = pixels_to_cells(start + length, cell_size).ceil() as isize;
    (first - EXCLUSION_MARGIN_CELLS, end - 1 + EXCLUSION_MARGIN_CELLS)
}

/// An inclusive range of rows and columns.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ExclusionZone {
    rows: (isize, isize),
    cols: (isize, isize),
}

impl ExclusionZone {
    pub fn contains(&self, row: usize, col: usize) -> bool {
        let (row, col) = (row as isize, col as isize);
        row >= self.rows.0 && row <= self.rows.1 && col >= self.cols.0 && col <= self.cols.1
    }
}

/// Paints the padding shape and then the logo itself.
///
/// The padding (background color, square or ellipse) is only drawn when the padding is
/// positive. A circular logo is clipped to a circle inscribed in its unpadded footprint.
pub fn composite_logo<S: Surface + ?Sized>(
    surface: &mut S,
    metrics: &LogoMetrics,
    logo: &LogoOptions,
    background: Color,
    image: &DynamicImage,
) -> Result<()> {
    let frame = metrics.footprint();
    if frame.width > surface.width() as f32 || frame.height > surface.height() as f32 {
        return Err(Error::Config(format!(
            "{}x{} logo does not fit a {}x{} surface",
            frame.width,
            frame.height,
            surface.width(),
            surface.height()
        )));
    }

    if metrics.padding > 0.0 {
        let padded = metrics.padded();
        match logo.style {
            LogoStyle::Circle => {
                let center = padded.center();
                let mut pb = PathBuilder::new();
                pb.ellipse(center.x, center.y, padded.width / 2.0, padded.height / 2.0);
                surface.fill_path(&pb.finish(), &Brush::Solid(background), FillRule::NonZero);
            }
            LogoStyle::Square => surface.fill_rect(padded, background),
        }
    }

    let clip = match logo.style {
        LogoStyle::Circle => Some(Circle {
            center: frame.center(),
            radius: frame.width / 2.0,
        }),
        LogoStyle::Square => None,
    };

    let width = frame.width.round().max(1.0) as u32;
    let height = frame.height.round().max(1.0) as u32;
    let scaled = image
        .resize_exact(width, height, FilterType::Lanczos3)
        .to_rgba8();
    surface.draw_image(&scaled, frame, logo.opacity, clip)
}
