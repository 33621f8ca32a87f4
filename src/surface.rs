//! Raster surfaces.
//!
//! The renderer never touches pixels directly; it hands finished [`Path`]s and [`Brush`]es to a
//! [`Surface`]. [`SkiaSurface`] is the production backend, rasterizing with `tiny-skia` and
//! encoding through the `image` crate.

use std::f32::consts::FRAC_PI_2;
use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use tiny_skia::{
    ColorU8, FilterQuality, GradientStop, LinearGradient, Mask, Paint, PathBuilder, Pixmap,
    PixmapPaint, RadialGradient, Shader, SpreadMode, Stroke, Transform,
};

use crate::color::{Brush, Color};
use crate::error::{Error, Result};
use crate::geometry::{Circle, Path, PathCommand, Rect};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FillRule {
    NonZero,
    EvenOdd,
}

/// A 2D drawing target owned by a single render.
pub trait Surface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn fill_path(&mut self, path: &Path, brush: &Brush, rule: FillRule);

    fn stroke_path(&mut self, path: &Path, brush: &Brush, line_width: f32);

    /// Draws `image` scaled into `frame` at `opacity` (0 to 1), optionally clipped to `clip`.
    fn draw_image(
        &mut self,
        image: &RgbaImage,
        frame: Rect,
        opacity: f32,
        clip: Option<Circle>,
    ) -> Result<()>;
}

/// A `tiny-skia` pixmap.
pub struct SkiaSurface {
    pixmap: Pixmap,
}

impl SkiaSurface {
    /// Allocates a transparent surface.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            Error::Surface(format!("cannot allocate a {}x{} pixmap", width, height))
        })?;
        Ok(SkiaSurface { pixmap })
    }

    /// Converts the premultiplied pixmap into a straight-alpha image buffer.
    pub fn into_image(self) -> RgbaImage {
        let mut image = RgbaImage::new(self.pixmap.width(), self.pixmap.height());
        for (dst, src) in image.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        image
    }

    /// Encodes the surface as PNG bytes.
    pub fn encode_png(self) -> Result<Vec<u8>> {
        let image = self.into_image();
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, ImageFormat::Png)?;
        Ok(buffer.into_inner())
    }
}

impl Surface for SkiaSurface {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if let Some(rect) = tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height) {
            let paint = solid_paint(color);
            self.pixmap
                .fill_rect(rect, &paint, Transform::identity(), None);
        }
    }

    fn fill_path(&mut self, path: &Path, brush: &Brush, rule: FillRule) {
        if let Some(path) = to_skia_path(path) {
            let rule = match rule {
                FillRule::NonZero => tiny_skia::FillRule::Winding,
                FillRule::EvenOdd => tiny_skia::FillRule::EvenOdd,
            };
            self.pixmap
                .fill_path(&path, &brush_paint(brush), rule, Transform::identity(), None);
        }
    }

    fn stroke_path(&mut self, path: &Path, brush: &Brush, line_width: f32) {
        if let Some(path) = to_skia_path(path) {
            let stroke = Stroke {
                width: line_width,
                ..Stroke::default()
            };
            self.pixmap.stroke_path(
                &path,
                &brush_paint(brush),
                &stroke,
                Transform::identity(),
                None,
            );
        }
    }

    fn draw_image(
        &mut self,
        image: &RgbaImage,
        frame: Rect,
        opacity: f32,
        clip: Option<Circle>,
    ) -> Result<()> {
        if image.width() == 0 || image.height() == 0 {
            return Ok(());
        }
        let source = to_pixmap(image)?;

        let mask = match clip {
            Some(circle) => {
                let mut mask = Mask::new(self.pixmap.width(), self.pixmap.height())
                    .ok_or_else(|| Error::Surface("cannot allocate clip mask".into()))?;
                if let Some(path) =
                    PathBuilder::from_circle(circle.center.x, circle.center.y, circle.radius)
                {
                    mask.fill_path(
                        &path,
                        tiny_skia::FillRule::Winding,
                        true,
                        Transform::identity(),
                    );
                }
                Some(mask)
            }
            None => None,
        };

        let paint = PixmapPaint {
            opacity: opacity.clamp(0.0, 1.0),
            quality: FilterQuality::Bicubic,
            ..PixmapPaint::default()
        };
        let transform = Transform::from_row(
            frame.width / image.width() as f32,
            0.0,
            0.0,
            frame.height / image.height() as f32,
            frame.x,
            frame.y,
        );
        self.pixmap
            .draw_pixmap(0, 0, source.as_ref(), &paint, transform, mask.as_ref());
        Ok(())
    }
}

fn skia_color(color: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a)
}

fn solid_paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(skia_color(color));
    paint.anti_alias = true;
    paint
}

fn brush_paint(brush: &Brush) -> Paint<'static> {
    let stops = |from: Color, to: Color| {
        vec![
            GradientStop::new(0.0, skia_color(from)),
            GradientStop::new(1.0, skia_color(to)),
        ]
    };
    let shader: Option<Shader<'static>> = match *brush {
        Brush::Solid(color) => return solid_paint(color),
        Brush::Linear {
            start,
            end,
            from,
            to,
        } => LinearGradient::new(
            tiny_skia::Point::from_xy(start.x, start.y),
            tiny_skia::Point::from_xy(end.x, end.y),
            stops(from, to),
            SpreadMode::Pad,
            Transform::identity(),
        ),
        Brush::Radial {
            center,
            radius,
            from,
            to,
        } => RadialGradient::new(
            tiny_skia::Point::from_xy(center.x, center.y),
            tiny_skia::Point::from_xy(center.x, center.y),
            radius,
            stops(from, to),
            SpreadMode::Pad,
            Transform::identity(),
        ),
    };

    match (shader, brush) {
        (Some(shader), _) => Paint {
            shader,
            anti_alias: true,
            ..Paint::default()
        },
        // degenerate gradient (zero-length axis or radius)
        (None, Brush::Linear { from, .. }) | (None, Brush::Radial { from, .. }) => {
            solid_paint(*from)
        }
        (None, Brush::Solid(color)) => solid_paint(*color),
    }
}

/// Flattens a path into `tiny-skia`'s representation, turning arcs into cubic Béziers of at
/// most a quarter turn each.
fn to_skia_path(path: &Path) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for command in path.commands() {
        match *command {
            PathCommand::MoveTo(p) => pb.move_to(p.x, p.y),
            PathCommand::LineTo(p) => pb.line_to(p.x, p.y),
            PathCommand::QuadTo(c, p) => pb.quad_to(c.x, c.y, p.x, p.y),
            PathCommand::CubicTo(c1, c2, p) => pb.cubic_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y),
            PathCommand::Arc {
                center,
                radius,
                start_angle,
                sweep,
            } => {
                if sweep <= 0.0 || radius <= 0.0 {
                    continue;
                }
                let segments = (sweep / FRAC_PI_2).ceil().max(1.0) as usize;
                let step = sweep / segments as f32;
                let k = 4.0 / 3.0 * (step / 4.0).tan() * radius;
                let mut a = start_angle;
                for _ in 0..segments {
                    let b = a + step;
                    let (sin_a, cos_a) = a.sin_cos();
                    let (sin_b, cos_b) = b.sin_cos();
                    let (x0, y0) = (center.x + radius * cos_a, center.y + radius * sin_a);
                    let (x3, y3) = (center.x + radius * cos_b, center.y + radius * sin_b);
                    pb.cubic_to(
                        x0 - k * sin_a,
                        y0 + k * cos_a,
                        x3 + k * sin_b,
                        y3 - k * cos_b,
                        x3,
                        y3,
                    );
                    a = b;
                }
            }
            PathCommand::Close => pb.close(),
        }
    }
    pb.finish()
}

fn to_pixmap(image: &RgbaImage) -> Result<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())
        .ok_or_else(|| Error::Surface("cannot allocate logo pixmap".into()))?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}

/// A surface that records drawing calls instead of rasterizing them.
#[cfg(test)]
pub(crate) mod recording {
    use super::*;

    #[derive(Clone, PartialEq, Debug)]
    pub(crate) enum Op {
        FillRect(Rect, Color),
        Fill {
            path: Path,
            brush: Brush,
            rule: FillRule,
        },
        Stroke {
            path: Path,
            brush: Brush,
            width: f32,
        },
        Image {
            frame: Rect,
            opacity: f32,
            clip: Option<Circle>,
        },
    }

    pub(crate) struct RecordingSurface {
        size: u32,
        pub(crate) ops: Vec<Op>,
    }

    impl RecordingSurface {
        pub(crate) fn new(size: u32) -> Self {
            RecordingSurface {
                size,
                ops: Vec::new(),
            }
        }
    }

    impl Surface for RecordingSurface {
        fn width(&self) -> u32 {
            self.size
        }

        fn height(&self) -> u32 {
            self.size
        }

        fn fill_rect(&mut self, rect: Rect, color: Color) {
            self.ops.push(Op::FillRect(rect, color));
        }

        fn fill_path(&mut self, path: &Path, brush: &Brush, rule: FillRule) {
            self.ops.push(Op::Fill {
                path: path.clone(),
                brush: *brush,
                rule,
            });
        }

        fn stroke_path(&mut self, path: &Path, brush: &Brush, line_width: f32) {
            self.ops.push(Op::Stroke {
                path: path.clone(),
                brush: *brush,
                width: line_width,
            });
        }

        fn draw_image(
            &mut self,
            _image: &RgbaImage,
            frame: Rect,
            opacity: f32,
            clip: Option<Circle>,
        ) -> Result<()> {
            self.ops.push(Op::Image {
                frame,
                opacity,
                clip,
            });
            Ok(())
        }
    }
}
