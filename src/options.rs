//! Rendering options.
//!
//! [`Options`] carries every knob of a render with the defaults of a plain black-on-white code.
//! It deserializes from the camelCase JSON documents accepted by [`Options::from_json`]:
//!
//! ```json
//! {
//!   "size": 256,
//!   "moduleStyle": "rounded",
//!   "foreground": { "from": "#1c1f25", "to": "#4a5568", "type": "linear", "rotation": 0.5 },
//!   "eyes": { "radius": { "outer": 12, "inner": 4 } },
//!   "logo": { "url": "logo.png", "width": 48, "padding": 4, "style": "circle" }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::color::{Color, Paint};
use crate::error::{Error, Result};
use crate::matrix::EccLevel;

/// Shape drawn for each ordinary dark module.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModuleStyle {
    #[default]
    Square,
    #[serde(alias = "dot")]
    Dots,
    Rounded,
    ExtraRounded,
    Classy,
}

/// Four corner radii, or one radius for all corners.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CornerRadii {
    Uniform(f32),
    /// `[top_left, top_right, bottom_right, bottom_left]`
    PerCorner([f32; 4]),
}

impl CornerRadii {
    pub fn corners(self) -> [f32; 4] {
        match self {
            CornerRadii::Uniform(r) => [r; 4],
            CornerRadii::PerCorner(radii) => radii,
        }
    }
}

/// Corner rounding of one eye.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EyeRadius {
    Uniform(f32),
    /// `[top_left, top_right, bottom_right, bottom_left]`, shared by both rings.
    PerCorner([f32; 4]),
    InnerOuter {
        inner: CornerRadii,
        outer: CornerRadii,
    },
}

impl EyeRadius {
    /// Returns `(outer, inner)` ring radii.
    pub fn rings(self) -> ([f32; 4], [f32; 4]) {
        match self {
            EyeRadius::Uniform(r) => ([r; 4], [r; 4]),
            EyeRadius::PerCorner(radii) => (radii, radii),
            EyeRadius::InnerOuter { inner, outer } => (outer.corners(), inner.corners()),
        }
    }
}

/// Color of one eye.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EyeColor {
    Uniform(Color),
    InnerOuter { inner: Color, outer: Color },
}

impl EyeColor {
    /// Returns `(outer, inner)` ring colors.
    pub fn rings(self) -> (Color, Color) {
        match self {
            EyeColor::Uniform(c) => (c, c),
            EyeColor::InnerOuter { inner, outer } => (outer, inner),
        }
    }
}

/// A setting shared by all three eyes, or given per eye in the order
/// top-left, top-right, bottom-left.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EyeSetting<T> {
    PerZone([T; 3]),
    All(T),
}

impl<T: Copy> EyeSetting<T> {
    pub fn for_zone(&self, index: usize) -> T {
        match self {
            EyeSetting::PerZone(values) => values[index],
            EyeSetting::All(value) => *value,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct EyeOptions {
    #[serde(default)]
    pub radius: Option<EyeSetting<EyeRadius>>,
    #[serde(default)]
    pub color: Option<EyeSetting<EyeColor>>,
}

/// Shape of the logo's padding and clip.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoStyle {
    #[default]
    Square,
    Circle,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoOptions {
    /// `http(s)://` URL or filesystem path, resolved by the renderer's image loader.
    pub url: String,
    /// Logo width in pixels; defaults to 20% of the drawable size.
    #[serde(default)]
    pub width: Option<f32>,
    /// Logo height in pixels; defaults to the width.
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub padding: f32,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    /// Suppress the modules underneath the logo.
    #[serde(default)]
    pub empty_background: bool,
    #[serde(default)]
    pub style: LogoStyle,
}

fn default_opacity() -> f32 {
    1.0
}

impl LogoOptions {
    pub fn new(url: impl Into<String>) -> Self {
        LogoOptions {
            url: url.into(),
            width: None,
            height: None,
            padding: 0.0,
            opacity: default_opacity(),
            empty_background: false,
            style: LogoStyle::Square,
        }
    }
}

/// Everything that controls how a payload is turned into a styled image.
///
/// # Example
///
/// ```rust
/// use sqrc::options::{ModuleStyle, Options};
///
/// let options = Options {
///     size: 256,
///     module_style: ModuleStyle::Rounded,
///     ..Options::default()
/// };
/// options.validate().unwrap();
/// ```
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    pub ecc: EccLevel,
    /// Fixed symbol version (1 to 40). `None` picks the smallest version that fits.
    pub version: Option<u8>,
    /// Output width and height in pixels, quiet zone included.
    pub size: u32,
    /// Margin around the code, in pixels.
    pub quiet_zone: u32,
    pub foreground: Paint,
    pub background: Color,
    pub module_style: ModuleStyle,
    /// Shrinks square and dot modules. Must lie in (0, 1].
    pub module_scale: Option<f32>,
    pub eyes: Option<EyeOptions>,
    pub logo: Option<LogoOptions>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            ecc: EccLevel::Medium,
            version: None,
            size: 150,
            quiet_zone: 10,
            foreground: Paint::Solid(Color::BLACK),
            background: Color::WHITE,
            module_style: ModuleStyle::Square,
            module_scale: None,
            eyes: None,
            logo: None,
        }
    }
}

impl Options {
    /// Parses and validates a JSON options document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Options = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("malformed options: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Side of the area the code itself occupies, in pixels.
    pub fn drawable_size(&self) -> f32 {
        self.size as f32 - 2.0 * self.quiet_zone as f32
    }

    /// Rejects options that cannot produce an image. Radii are never rejected; they clamp.
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(Error::Config("size must be positive".into()));
        }
        if u64::from(self.quiet_zone) * 2 >= u64::from(self.size) {
            return Err(Error::Config(format!(
                "quiet zone {} leaves no room in a {}px image",
                self.quiet_zone, self.size
            )));
        }
        if let Some(version) = self.version {
            if !(1..=40).contains(&version) {
                return Err(Error::Config(format!(
                    "version {} is outside 1..=40",
                    version
                )));
            }
        }
        if let Some(scale) = self.module_scale {
            if !(scale > 0.0 && scale <= 1.0) {
                return Err(Error::Config(format!(
                    "module scale {} is outside (0, 1]",
                    scale
                )));
            }
        }
        if let Paint::Gradient(spec) = self.foreground {
            if !spec.rotation.is_finite() {
                return Err(Error::Config("gradient rotation must be finite".into()));
            }
        }
        if let Some(logo) = &self.logo {
            validate_logo(logo, self.drawable_size())?;
        }
        Ok(())
    }
}

fn validate_logo(logo: &LogoOptions, drawable_size: f32) -> Result<()> {
    if logo.url.trim().is_empty() {
        return Err(Error::Config("logo url is empty".into()));
    }
    for (name, value) in [("width", logo.width), ("height", logo.height)] {
        if let Some(v) = value {
            if !(v.is_finite() && v > 0.0) {
                return Err(Error::Config(format!("logo {} must be positive", name)));
            }
            if v > drawable_size {
                return Err(Error::Config(format!(
                    "logo {} {} exceeds the {}px drawable area",
                    name, v, drawable_size
                )));
            }
        }
    }
    if !(logo.padding.is_finite() && logo.padding >= 0.0) {
        return Err(Error::Config("logo padding must be non-negative".into()));
    }
    if !(0.0..=1.0).contains(&logo.opacity) {
        return Err(Error::Config(format!(
            "logo opacity {} is outside [0, 1]",
            logo.opacity
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::GradientKind;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.size, 150);
        assert_eq!(options.quiet_zone, 10);
        assert_eq!(options.ecc, EccLevel::Medium);
        assert_eq!(options.module_style, ModuleStyle::Square);
        assert_eq!(options.drawable_size(), 130.0);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_geometry() {
        let zero = Options {
            size: 0,
            quiet_zone: 0,
            ..Options::default()
        };
        assert!(matches!(zero.validate(), Err(Error::Config(_))));

        let wide_margin = Options {
            size: 100,
            quiet_zone: 50,
            ..Options::default()
        };
        assert!(matches!(wide_margin.validate(), Err(Error::Config(_))));

        let scale = Options {
            module_scale: Some(1.5),
            ..Options::default()
        };
        assert!(matches!(scale.validate(), Err(Error::Config(_))));

        let version = Options {
            version: Some(41),
            ..Options::default()
        };
        assert!(matches!(version.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_bad_logo() {
        let mut logo = LogoOptions::new("logo.png");
        logo.opacity = 2.0;
        let options = Options {
            logo: Some(logo),
            ..Options::default()
        };
        assert!(matches!(options.validate(), Err(Error::Config(_))));

        let options = Options {
            logo: Some(LogoOptions {
                width: Some(-1.0),
                ..LogoOptions::new("logo.png")
            }),
            ..Options::default()
        };
        assert!(matches!(options.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_logo_larger_than_drawable_area() {
        // default options leave 130px between the quiet zones
        for (width, height) in [(Some(1e12), None), (Some(131.0), None), (Some(40.0), Some(200.0))] {
            let options = Options {
                logo: Some(LogoOptions {
                    width,
                    height,
                    ..LogoOptions::new("logo.png")
                }),
                ..Options::default()
            };
            assert!(
                matches!(options.validate(), Err(Error::Config(_))),
                "{width:?} x {height:?}"
            );
        }

        let options = Options {
            logo: Some(LogoOptions {
                width: Some(130.0),
                ..LogoOptions::new("logo.png")
            }),
            ..Options::default()
        };
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_from_json() {
        let options = Options::from_json(
            r##"{
                "size": 512,
                "ecc": "H",
                "moduleStyle": "extraRounded",
                "foreground": { "from": "#000", "to": "#00f", "rotation": 1.5 },
                "background": "#fafafa",
                "eyes": {
                    "radius": [[48, 48, 8, 48], [48, 48, 48, 8], [48, 8, 48, 48]],
                    "color": { "inner": "#f00", "outer": "#00f" }
                },
                "logo": { "url": "https://example.com/me.png", "width": 118, "emptyBackground": true }
            }"##,
        )
        .unwrap();

        assert_eq!(options.size, 512);
        assert_eq!(options.quiet_zone, 10);
        assert_eq!(options.ecc, EccLevel::High);
        assert_eq!(options.module_style, ModuleStyle::ExtraRounded);
        assert_eq!(options.background, Color::rgb(0xfa, 0xfa, 0xfa));
        match options.foreground {
            Paint::Gradient(spec) => {
                assert_eq!(spec.kind, GradientKind::Linear);
                assert_eq!(spec.rotation, 1.5);
            }
            other => panic!("expected gradient, got {other:?}"),
        }

        let eyes = options.eyes.unwrap();
        let radius = eyes.radius.unwrap();
        assert_eq!(radius.for_zone(1), EyeRadius::PerCorner([48.0, 48.0, 48.0, 8.0]));
        let color = eyes.color.unwrap();
        assert_eq!(
            color.for_zone(2).rings(),
            (Color::rgb(0, 0, 255), Color::rgb(255, 0, 0))
        );

        let logo = options.logo.unwrap();
        assert!(logo.empty_background);
        assert_eq!(logo.opacity, 1.0);
        assert_eq!(logo.style, LogoStyle::Square);
    }

    #[test]
    fn test_from_json_rejects_half_gradient() {
        let err = Options::from_json(r##"{ "foreground": { "from": "#000" } }"##).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_eye_radius_rings() {
        assert_eq!(EyeRadius::Uniform(4.0).rings(), ([4.0; 4], [4.0; 4]));
        let split = EyeRadius::InnerOuter {
            inner: CornerRadii::Uniform(2.0),
            outer: CornerRadii::PerCorner([1.0, 2.0, 3.0, 4.0]),
        };
        assert_eq!(split.rings(), ([1.0, 2.0, 3.0, 4.0], [2.0; 4]));
    }

    #[test]
    fn test_uniform_eye_radius_from_json() {
        let eyes: EyeOptions = serde_json::from_str(r#"{ "radius": 48 }"#).unwrap();
        assert_eq!(eyes.radius, Some(EyeSetting::All(EyeRadius::Uniform(48.0))));
    }
}
