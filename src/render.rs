//! The render pipeline.
//!
//! A [`QrRenderer`] is built once from a payload and [`Options`]; every call to
//! [`QrRenderer::render`] replays the same fixed sequence of stages onto a fresh surface:
//!
//! ```text
//! Initialized -> BackgroundPainted -> ModulesPainted -> EyesPainted -> LogoComposited -> Finalized
//! ```
//!
//! The logo stage is skipped when no logo is configured.

use image::RgbaImage;
use log::debug;

use crate::error::Result;
use crate::eyes::{draw_eyes, resolve_eyes, EyeStyle};
use crate::geometry::{Grid, Rect};
use crate::logo::{composite_logo, DefaultImageLoader, ImageLoader, LogoMetrics};
use crate::matrix::{Matrix, QrMatrix};
use crate::modules::{draw_modules, ModuleField};
use crate::options::Options;
use crate::surface::{SkiaSurface, Surface};

/// Pipeline stages, in the order they are reached.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum RenderStage {
    Initialized,
    BackgroundPainted,
    ModulesPainted,
    EyesPainted,
    LogoComposited,
    Finalized,
}

fn advance(stage: &mut RenderStage, next: RenderStage) {
    debug_assert!(next > *stage, "render stage {:?} after {:?}", next, stage);
    debug!("render stage {:?} -> {:?}", stage, next);
    *stage = next;
}

/// A validated, encoded QR code ready to be painted.
///
/// Construction does all the work that can fail on bad input (option validation, encoding),
/// so rendering can only fail on the surface or the logo.
///
/// # Example
///
/// ```rust
/// use sqrc::{ModuleStyle, Options, QrRenderer};
///
/// let options = Options {
///     size: 256,
///     module_style: ModuleStyle::Rounded,
///     ..Options::default()
/// };
/// let png = QrRenderer::new("https://example.com/", options)
///     .unwrap()
///     .render()
///     .unwrap();
/// assert!(png.starts_with(b"\x89PNG"));
/// ```
pub struct QrRenderer<L = DefaultImageLoader> {
    options: Options,
    matrix: Matrix,
    grid: Grid,
    eyes: [EyeStyle; 3],
    logo: Option<LogoMetrics>,
    loader: L,
}

impl QrRenderer<DefaultImageLoader> {
    /// Validates `options` and encodes `payload`.
    ///
    /// # Arguments
    ///
    /// * `payload` - The text to encode.
    /// * `options` - Size, styling and logo settings.
    ///
    /// # Errors
    ///
    /// [`Error::Config`](crate::Error::Config) for invalid options and
    /// [`Error::Encode`](crate::Error::Encode) when the payload does not fit.
    pub fn new(payload: &str, options: Options) -> Result<Self> {
        options.validate()?;
        let matrix = Matrix::encode(payload, options.ecc, options.version)?;
        let drawable = options.drawable_size();
        let quiet_zone = options.quiet_zone as f32;
        let grid = Grid::new(drawable, quiet_zone, matrix.module_count());
        let eyes = resolve_eyes(options.eyes.as_ref(), &options.foreground, &grid);
        let logo = options
            .logo
            .as_ref()
            .map(|logo| LogoMetrics::new(logo, drawable, quiet_zone));

        debug!(
            "encoded {} payload bytes into {} modules, cell size {:.3}px",
            payload.len(),
            grid.module_count,
            grid.cell_size
        );

        Ok(QrRenderer {
            options,
            matrix,
            grid,
            eyes,
            logo,
            loader: DefaultImageLoader,
        })
    }
}

impl<L: ImageLoader> QrRenderer<L> {
    /// Replaces the loader used to resolve the logo source.
    pub fn with_loader<T: ImageLoader>(self, loader: T) -> QrRenderer<T> {
        QrRenderer {
            options: self.options,
            matrix: self.matrix,
            grid: self.grid,
            eyes: self.eyes,
            logo: self.logo,
            loader,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Renders the code and encodes it as PNG.
    pub fn render(&self) -> Result<Vec<u8>> {
        let mut surface = SkiaSurface::new(self.options.size, self.options.size)?;
        let mut stage = self.render_to(&mut surface)?;
        let png = surface.encode_png()?;
        advance(&mut stage, RenderStage::Finalized);
        Ok(png)
    }

    /// Renders the code into an in-memory RGBA image.
    pub fn render_image(&self) -> Result<RgbaImage> {
        let mut surface = SkiaSurface::new(self.options.size, self.options.size)?;
        let mut stage = self.render_to(&mut surface)?;
        let image = surface.into_image();
        advance(&mut stage, RenderStage::Finalized);
        Ok(image)
    }

    /// Paints every layer onto `surface` and returns the last stage reached.
    ///
    /// On error the surface is left partially painted; callers that need all-or-nothing
    /// output should discard it.
    pub fn render_to<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<RenderStage> {
        let mut stage = RenderStage::Initialized;
        let (width, height) = (surface.width() as f32, surface.height() as f32);

        surface.fill_rect(Rect::new(0.0, 0.0, width, height), self.options.background);
        advance(&mut stage, RenderStage::BackgroundPainted);

        let exclusion = match (&self.options.logo, &self.logo) {
            (Some(logo), Some(metrics)) if logo.empty_background => {
                Some(metrics.exclusion_zone(self.grid.cell_size))
            }
            _ => None,
        };
        let field = ModuleField::new(&self.matrix, exclusion);
        draw_modules(
            surface,
            &field,
            &self.grid,
            self.options.module_style,
            self.options.module_scale,
            &self.options.foreground,
        );
        advance(&mut stage, RenderStage::ModulesPainted);

        draw_eyes(surface, &self.grid, &self.eyes);
        advance(&mut stage, RenderStage::EyesPainted);

        if let (Some(logo), Some(metrics)) = (&self.options.logo, &self.logo) {
            let image = self.loader.load(&logo.url)?;
            debug!(
                "loaded {}x{} logo from {}",
                image.width(),
                image.height(),
                logo.url
            );
            composite_logo(surface, metrics, logo, self.options.background, &image)?;
            advance(&mut stage, RenderStage::LogoComposited);
        }

        Ok(stage)
    }
}
