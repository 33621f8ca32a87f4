//! Data modules: neighbor lookup, shape classification and path tracing.
//!
//! Every dark cell outside the finder patterns becomes one [`ModuleShape`], chosen from the
//! module style and the cell's four neighbors. All shapes are traced into a single path that is
//! painted once.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use log::trace;

use crate::color::Paint;
use crate::eyes::in_position_zone;
use crate::geometry::{Grid, Path, PathBuilder, Placement, Point, QuarterTurn};
use crate::logo::ExclusionZone;
use crate::matrix::QrMatrix;
use crate::options::ModuleStyle;
use crate::surface::{FillRule, Surface};

/// Dot radius relative to half a cell when no module scale is set.
const DEFAULT_DOT_SCALE: f32 = 0.75;

/// Which of the four adjacent cells are visibly dark.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Neighbors {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl Neighbors {
    pub fn count(&self) -> usize {
        [self.left, self.right, self.top, self.bottom]
            .iter()
            .filter(|&&n| n)
            .count()
    }
}

/// The matrix as it will actually appear: dark cells minus those hidden under the logo.
pub struct ModuleField<'a, M: QrMatrix + ?Sized> {
    matrix: &'a M,
    exclusion: Option<ExclusionZone>,
}

impl<'a, M: QrMatrix + ?Sized> ModuleField<'a, M> {
    /// `exclusion` is only given when the logo empties its background.
    pub fn new(matrix: &'a M, exclusion: Option<ExclusionZone>) -> Self {
        ModuleField { matrix, exclusion }
    }

    pub fn module_count(&self) -> usize {
        self.matrix.module_count()
    }

    /// Whether `(row, col)` is in range, dark, and not excluded.
    pub fn is_visible(&self, row: isize, col: isize) -> bool {
        let n = self.matrix.module_count() as isize;
        if row < 0 || col < 0 || row >= n || col >= n {
            return false;
        }
        let (row, col) = (row as usize, col as usize);
        if self.exclusion.is_some_and(|zone| zone.contains(row, col)) {
            return false;
        }
        self.matrix.is_dark(row, col)
    }

    pub fn neighbors(&self, row: usize, col: usize) -> Neighbors {
        let (r, c) = (row as isize, col as isize);
        Neighbors {
            left: self.is_visible(r, c - 1),
            right: self.is_visible(r, c + 1),
            top: self.is_visible(r - 1, c),
            bottom: self.is_visible(r + 1, c),
        }
    }
}

/// The outline drawn for a single module, in cell-local terms.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ModuleShape {
    Circle { radius: f32 },
    Square { side: f32 },
    /// A square with its top-right corner rounded, then turned.
    Corner(QuarterTurn),
    /// Like [`ModuleShape::Corner`] but with a full-cell radius, giving a leaf.
    ExtraCorner(QuarterTurn),
    /// A square with its top-right and bottom-left corners rounded, then turned.
    DoubleCorner(QuarterTurn),
}

/// Picks the shape for a dark module.
///
/// `scale` only affects [`ModuleStyle::Square`] and [`ModuleStyle::Dots`]; the connected
/// styles always cover the full cell so adjacent modules join without gaps.
pub fn classify(
    style: ModuleStyle,
    neighbors: Neighbors,
    cell_size: f32,
    scale: Option<f32>,
) -> ModuleShape {
    let full = ModuleShape::Square { side: cell_size };
    match style {
        ModuleStyle::Square => ModuleShape::Square {
            side: cell_size * scale.unwrap_or(1.0),
        },
        ModuleStyle::Dots => ModuleShape::Circle {
            radius: cell_size / 2.0 * scale.unwrap_or(DEFAULT_DOT_SCALE),
        },
        ModuleStyle::Rounded | ModuleStyle::ExtraRounded => {
            let Neighbors {
                left,
                right,
                top,
                bottom,
            } = neighbors;
            let count = neighbors.count();
            if count == 0 {
                return ModuleShape::Circle {
                    radius: cell_size / 2.0,
                };
            }
            if count > 2 || (left && right) || (top && bottom) {
                return full;
            }
            let turn = if count == 2 {
                if left && top {
                    QuarterTurn::Clockwise
                } else if top && right {
                    QuarterTurn::Half
                } else if right && bottom {
                    QuarterTurn::CounterClockwise
                } else {
                    QuarterTurn::None
                }
            } else if top {
                QuarterTurn::Clockwise
            } else if right {
                QuarterTurn::Half
            } else if bottom {
                QuarterTurn::CounterClockwise
            } else {
                QuarterTurn::None
            };
            if style == ModuleStyle::Rounded {
                ModuleShape::Corner(turn)
            } else {
                ModuleShape::ExtraCorner(turn)
            }
        }
        ModuleStyle::Classy => {
            if neighbors.count() == 0 {
                ModuleShape::DoubleCorner(QuarterTurn::Clockwise)
            } else if !neighbors.left && !neighbors.top {
                ModuleShape::Corner(QuarterTurn::CounterClockwise)
            } else if !neighbors.right && !neighbors.bottom {
                ModuleShape::Corner(QuarterTurn::Clockwise)
            } else {
                full
            }
        }
    }
}

/// Traces `shape` around `center` as one closed sub-path.
pub fn trace(pb: &mut PathBuilder, shape: ModuleShape, center: Point, cell_size: f32) {
    let h = cell_size / 2.0;
    let turn = match shape {
        ModuleShape::Corner(t) | ModuleShape::ExtraCorner(t) | ModuleShape::DoubleCorner(t) => t,
        _ => QuarterTurn::None,
    };

    pb.with_placement(Placement::new(center, turn.radians()), |pb| {
        match shape {
            ModuleShape::Circle { radius } => pb.arc(0.0, 0.0, radius, 0.0, TAU),
            ModuleShape::Square { side } => {
                let half = side / 2.0;
                pb.rect(-half, -half, side, side);
            }
            ModuleShape::Corner(_) => {
                pb.arc(0.0, 0.0, h, -FRAC_PI_2, 0.0);
                pb.line_to(h, h);
                pb.line_to(-h, h);
                pb.line_to(-h, -h);
                pb.line_to(0.0, -h);
            }
            ModuleShape::ExtraCorner(_) => {
                pb.arc(-h, h, cell_size, -FRAC_PI_2, 0.0);
                pb.line_to(-h, h);
                pb.line_to(-h, -h);
            }
            ModuleShape::DoubleCorner(_) => {
                pb.arc(0.0, 0.0, h, -FRAC_PI_2, 0.0);
                pb.line_to(h, h);
                pb.line_to(0.0, h);
                pb.arc(0.0, 0.0, h, FRAC_PI_2, PI);
                pb.line_to(-h, -h);
                pb.line_to(0.0, -h);
            }
        }
        pb.close();
    });
}

/// Builds the combined outline of every visible module outside the finder patterns.
pub fn module_path<M: QrMatrix + ?Sized>(
    field: &ModuleField<'_, M>,
    grid: &Grid,
    style: ModuleStyle,
    scale: Option<f32>,
) -> Path {
    let n = field.module_count();
    let mut pb = PathBuilder::new();

    for row in 0..n {
        for col in 0..n {
            if in_position_zone(row, col, n) || !field.is_visible(row as isize, col as isize) {
                continue;
            }
            let shape = classify(style, field.neighbors(row, col), grid.cell_size, scale);
            trace(&mut pb, shape, grid.cell_center(row, col), grid.cell_size);
        }
    }

    trace!("module path holds {} commands", pb.len());
    pb.finish()
}

/// Paints all data modules with a single even-odd fill.
///
/// Gradients span the module field, from the quiet zone edge across all `N` cells.
pub fn draw_modules<S, M>(
    surface: &mut S,
    field: &ModuleField<'_, M>,
    grid: &Grid,
    style: ModuleStyle,
    scale: Option<f32>,
    paint: &Paint,
) where
    S: Surface + ?Sized,
    M: QrMatrix + ?Sized,
{
    let path = module_path(field, grid, style, scale);
    if path.is_empty() {
        return;
    }
    let bounds = grid.bounds();
    let brush = paint.brush(Point::new(bounds.x, bounds.y), bounds.width);
    surface.fill_path(&path, &brush, FillRule::EvenOdd);
}
