//! Finder patterns ("eyes").
//!
//! The three 7x7 corner markers are never drawn as ordinary modules. Each one is painted as a
//! stroked outer ring plus a filled 3x3 core, both rounded independently.

use crate::color::{Brush, Paint};
use crate::geometry::{rounded_square_path, Grid, Point};
use crate::options::EyeOptions;
use crate::surface::{FillRule, Surface};

/// Side of a finder pattern, in cells.
pub const ZONE_CELLS: usize = 7;

/// Side of the filled core, in cells.
const CORE_CELLS: usize = 3;

/// Top-left cell of a finder pattern.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PositionZone {
    pub row: usize,
    pub col: usize,
}

impl PositionZone {
    pub fn contains(&self, row: usize, col: usize) -> bool {
        (self.row..self.row + ZONE_CELLS).contains(&row)
            && (self.col..self.col + ZONE_CELLS).contains(&col)
    }
}

/// The three finder patterns: top-left, top-right, bottom-left.
pub fn position_zones(module_count: usize) -> [PositionZone; 3] {
    let far = module_count.saturating_sub(ZONE_CELLS);
    [
        PositionZone { row: 0, col: 0 },
        PositionZone { row: 0, col: far },
        PositionZone { row: far, col: 0 },
    ]
}

pub fn in_position_zone(row: usize, col: usize, module_count: usize) -> bool {
    position_zones(module_count)
        .iter()
        .any(|zone| zone.contains(row, col))
}

/// Fully resolved look of one eye.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct EyeStyle {
    pub outer_radii: [f32; 4],
    pub inner_radii: [f32; 4],
    pub outer: Brush,
    pub inner: Brush,
}

/// Resolves eye overrides for all three zones.
///
/// Per-zone values win over a shared value; without a color override the eyes use the
/// foreground paint, spread over the whole module field like the modules are.
pub fn resolve_eyes(eyes: Option<&EyeOptions>, foreground: &Paint, grid: &Grid) -> [EyeStyle; 3] {
    let bounds = grid.bounds();
    let field_origin = Point::new(bounds.x, bounds.y);
    let default_brush = foreground.brush(field_origin, bounds.width);

    let resolve = |index: usize| {
        let (outer_radii, inner_radii) = eyes
            .and_then(|e| e.radius)
            .map(|radius| radius.for_zone(index).rings())
            .unwrap_or(([0.0; 4], [0.0; 4]));
        let (outer, inner) = eyes
            .and_then(|e| e.color)
            .map(|color| {
                let (outer, inner) = color.for_zone(index).rings();
                (Brush::Solid(outer), Brush::Solid(inner))
            })
            .unwrap_or((default_brush, default_brush));
        EyeStyle {
            outer_radii,
            inner_radii,
            outer,
            inner,
        }
    };
    [resolve(0), resolve(1), resolve(2)]
}

/// Strokes a rounded square flush inside `(x, y, size)`, filling it as well when `filled`.
pub fn draw_rounded_square<S: Surface + ?Sized>(
    surface: &mut S,
    line_width: f32,
    x: f32,
    y: f32,
    size: f32,
    radii: [f32; 4],
    brush: &Brush,
    filled: bool,
) {
    let path = rounded_square_path(line_width, x, y, size, radii);
    surface.stroke_path(&path, brush, line_width);
    if filled {
        surface.fill_path(&path, brush, FillRule::NonZero);
    }
}

/// Paints the three finder patterns.
pub fn draw_eyes<S: Surface + ?Sized>(surface: &mut S, grid: &Grid, styles: &[EyeStyle; 3]) {
    let cell = grid.cell_size;
    let line_width = cell.ceil();
    let zones = position_zones(grid.module_count);

    for (zone, style) in zones.iter().zip(styles) {
        let origin = grid.cell_origin(zone.row, zone.col);
        draw_rounded_square(
            surface,
            line_width,
            origin.x,
            origin.y,
            cell * ZONE_CELLS as f32,
            style.outer_radii,
            &style.outer,
            false,
        );

        let inset = cell * ((ZONE_CELLS - CORE_CELLS) / 2) as f32;
        draw_rounded_square(
            surface,
            line_width,
            origin.x + inset,
            origin.y + inset,
            cell * CORE_CELLS as f32,
            style.inner_radii,
            &style.inner,
            true,
        );
    }
}
