//! # sqrc
//!
//! A Rust library for rendering styled QR codes to raster images.
//!
//! `sqrc` encodes a payload with the [`qrcode`](https://docs.rs/qrcode) crate and paints the
//! resulting module grid with custom shapes, colors and gradients, distinct finder patterns
//! ("eyes") and an optional centered logo. Output is a PNG byte buffer or an in-memory
//! `RgbaImage` of exactly the requested size.
//!
//! ## Features
//!
//! - Module styles: square, dots, rounded, extra-rounded and classy, with an optional scale.
//! - Solid or gradient (linear with rotation, or radial) foreground paint.
//! - Per-eye corner radii and colors, with separate inner and outer rings.
//! - Logo overlay from a URL or file, with padding, opacity, circular clipping, and optional
//!   removal of the modules underneath.
//! - Options load from JSON (camelCase keys) via serde.
//! - Safe Rust implementation with no unsafe code.
//!
//! ## Installation
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! sqrc = "0.1" # Replace with the latest version
//! ```
//!
//! ## Example
//!
//! Render a rounded QR code with a gradient:
//!
//! ```rust
//! use sqrc::{Options, QrRenderer};
//!
//! let options = Options::from_json(
//!     r##"{
//!         "size": 256,
//!         "moduleStyle": "rounded",
//!         "foreground": { "from": "#1e3c72", "to": "#2a5298", "type": "linear", "rotation": 0.785 },
//!         "eyes": { "radius": 12, "color": { "inner": "#e63946", "outer": "#1d3557" } }
//!     }"##,
//! )
//! .unwrap();
//!
//! let png = QrRenderer::new("https://example.com/", options)
//!     .unwrap()
//!     .render()
//!     .unwrap();
//! assert!(png.starts_with(b"\x89PNG"));
//! ```
//!
//! Generate an in-memory image buffer:
//!
//! ```rust
//! use sqrc::helper::generate_image_buffer;
//!
//! let img = generate_image_buffer("Hello, World!", None).unwrap();
//! assert_eq!(img.dimensions(), (150, 150));
//! ```
//!
//! ## Modules
//!
//! - [`render`]: The render pipeline and [`QrRenderer`].
//! - [`options`]: Rendering options, defaults and validation.
//! - [`modules`]: Neighbor-aware module shapes.
//! - [`eyes`]: Finder pattern rendering.
//! - [`logo`]: Logo metrics, loading and compositing.
//! - [`helper`]: One-call convenience functions.

#![forbid(unsafe_code)]

pub mod color;
pub mod error;
pub mod eyes;
pub mod geometry;
pub mod helper;
pub mod logo;
pub mod matrix;
pub mod modules;
pub mod options;
pub mod render;
pub mod surface;

pub use color::{Color, GradientKind, GradientSpec, Paint};
pub use error::{Error, Result};
pub use logo::{DefaultImageLoader, ImageLoader};
pub use matrix::{EccLevel, Matrix, QrMatrix};
pub use options::{
    CornerRadii, EyeColor, EyeOptions, EyeRadius, EyeSetting, LogoOptions, LogoStyle,
    ModuleStyle, Options,
};
pub use render::{QrRenderer, RenderStage};
pub use surface::{SkiaSurface, Surface};
