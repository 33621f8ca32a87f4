//! Colors and paints.
//!
//! A [`Paint`] is what the user asks for (a solid color or a gradient spec). A [`Brush`] is the
//! same paint resolved against a concrete bounding box, ready to hand to a surface.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::geometry::{gradient_endpoints, GradientGeometry, Point};

/// An 8-bit straight-alpha RGBA color.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }
}

/// Parses `#rgb`, `#rgba`, `#rrggbb` and `#rrggbbaa`. The leading `#` is optional.
impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let invalid = || Error::Config(format!("invalid hex color: `{}`", s));
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let nibble = |i: usize| {
            u8::from_str_radix(&hex[i..i + 1], 16)
                .map(|v| v * 17)
                .map_err(|_| invalid())
        };
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());

        match hex.len() {
            3 => Ok(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            4 => Ok(Color::rgba(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
            6 => Ok(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Color::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    #[default]
    Linear,
    Radial,
}

/// A two-stop gradient. `rotation` is in radians and only affects linear gradients.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct GradientSpec {
    pub from: Color,
    pub to: Color,
    #[serde(default, rename = "type")]
    pub kind: GradientKind,
    #[serde(default)]
    pub rotation: f32,
}

/// Foreground paint: a solid color or a gradient spanning the whole module field.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Paint {
    Solid(Color),
    Gradient(GradientSpec),
}

impl Default for Paint {
    fn default() -> Self {
        Paint::Solid(Color::BLACK)
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Solid(color)
    }
}

impl From<GradientSpec> for Paint {
    fn from(spec: GradientSpec) -> Self {
        Paint::Gradient(spec)
    }
}

impl Paint {
    /// Resolves this paint against the square box at `origin` with side `box_size`.
    pub fn brush(&self, origin: Point, box_size: f32) -> Brush {
        match *self {
            Paint::Solid(color) => Brush::Solid(color),
            Paint::Gradient(spec) => {
                match gradient_endpoints(spec.kind, origin.x, origin.y, box_size, spec.rotation) {
                    GradientGeometry::Linear { start, end } => Brush::Linear {
                        start,
                        end,
                        from: spec.from,
                        to: spec.to,
                    },
                    GradientGeometry::Radial { center, radius } => Brush::Radial {
                        center,
                        radius,
                        from: spec.from,
                        to: spec.to,
                    },
                }
            }
        }
    }
}

/// A paint bound to surface coordinates.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Brush {
    Solid(Color),
    Linear {
        start: Point,
        end: Point,
        from: Color,
        to: Color,
    },
    /// Concentric gradient from radius 0 at `center` out to `radius`.
    Radial {
        center: Point,
        radius: f32,
        from: Color,
        to: Color,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!("#000".parse::<Color>().unwrap(), Color::BLACK);
        assert_eq!("#fff".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!("1C1F25".parse::<Color>().unwrap(), Color::rgb(0x1c, 0x1f, 0x25));
        assert_eq!(
            "#ff000080".parse::<Color>().unwrap(),
            Color::rgba(255, 0, 0, 0x80)
        );
        assert_eq!("#f008".parse::<Color>().unwrap(), Color::rgba(255, 0, 0, 0x88));
    }

    #[test]
    fn test_parse_invalid_colors() {
        for bad in ["", "#12", "#12345", "#gggggg", "#ééé", "#+f+f+f", "#+1+2+3+4", "# fff"] {
            assert!(matches!(bad.parse::<Color>(), Err(Error::Config(_))), "{bad}");
        }
    }

    #[test]
    fn test_color_display_round_trips() {
        let c = Color::rgba(1, 2, 3, 4);
        assert_eq!(c.to_string(), "#01020304");
        assert_eq!(Color::rgb(0xab, 0xcd, 0xef).to_string(), "#abcdef");
    }

    #[test]
    fn test_paint_deserializes_string_or_gradient() {
        let solid: Paint = serde_json::from_str(r##""#123456""##).unwrap();
        assert_eq!(solid, Paint::Solid(Color::rgb(0x12, 0x34, 0x56)));

        let gradient: Paint =
            serde_json::from_str(r##"{"from":"#000","to":"#fff","type":"radial"}"##).unwrap();
        match gradient {
            Paint::Gradient(spec) => {
                assert_eq!(spec.kind, GradientKind::Radial);
                assert_eq!(spec.rotation, 0.0);
            }
            other => panic!("expected gradient, got {other:?}"),
        }

        assert!(serde_json::from_str::<Paint>(r##"{"from":"#000"}"##).is_err());
    }

    #[test]
    fn test_solid_brush_ignores_box() {
        let brush = Paint::Solid(Color::WHITE).brush(Point::new(3.0, 4.0), 10.0);
        assert_eq!(brush, Brush::Solid(Color::WHITE));
    }

    #[test]
    fn test_radial_brush_is_centered_on_box() {
        let paint = Paint::Gradient(GradientSpec {
            from: Color::BLACK,
            to: Color::WHITE,
            kind: GradientKind::Radial,
            rotation: 1.0,
        });
        match paint.brush(Point::new(10.0, 10.0), 100.0) {
            Brush::Radial { center, radius, .. } => {
                assert_eq!(center, Point::new(60.0, 60.0));
                assert_eq!(radius, 50.0);
            }
            other => panic!("expected radial brush, got {other:?}"),
        }
    }
}
