//! Geometry primitives and the pure path builders the renderer is made of.
//!
//! Everything in here is free of surface state: shapes are described as a list of
//! [`PathCommand`]s in surface pixel coordinates and only later handed to a
//! [`Surface`](crate::surface::Surface) for painting.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use crate::color::GradientKind;

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }
}

/// An axis-aligned rectangle.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect { x, y, width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// A circle, used as a clip mask for round logos.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Circle {
    pub center: Point,
    pub radius: f32,
}

/// Placement of the module grid on the surface.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Grid {
    /// Offset of the grid from the surface's top-left corner (the quiet zone), in pixels.
    pub offset: f32,
    /// Side of the drawable area, in pixels.
    pub size: f32,
    pub module_count: usize,
    pub cell_size: f32,
}

impl Grid {
    pub fn new(size: f32, offset: f32, module_count: usize) -> Self {
        Grid {
            offset,
            size,
            module_count,
            cell_size: size / module_count as f32,
        }
    }

    /// Top-left corner of cell `(row, col)`.
    pub fn cell_origin(&self, row: usize, col: usize) -> Point {
        Point::new(
            self.offset + col as f32 * self.cell_size,
            self.offset + row as f32 * self.cell_size,
        )
    }

    pub fn cell_center(&self, row: usize, col: usize) -> Point {
        let origin = self.cell_origin(row, col);
        Point::new(origin.x + self.cell_size / 2.0, origin.y + self.cell_size / 2.0)
    }

    /// The square covered by all modules.
    pub fn bounds(&self) -> Rect {
        let side = self.module_count as f32 * self.cell_size;
        Rect::new(self.offset, self.offset, side, side)
    }
}

/// One step of a path, in surface coordinates.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    /// Quadratic curve through a control point to an end point.
    QuadTo(Point, Point),
    CubicTo(Point, Point, Point),
    /// Circular arc continuing from the current point, which is always the arc's start.
    /// Angles are in radians, measured clockwise from the +x axis in y-down space.
    Arc {
        center: Point,
        radius: f32,
        start_angle: f32,
        sweep: f32,
    },
    Close,
}

/// An immutable list of path commands.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of sub-paths (one per `MoveTo`).
    pub fn subpath_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, PathCommand::MoveTo(_)))
            .count()
    }
}

/// A rigid placement: rotate about the local origin, then translate to `origin`.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Placement {
    pub origin: Point,
    pub angle: f32,
}

impl Placement {
    pub const IDENTITY: Placement = Placement {
        origin: Point::new(0.0, 0.0),
        angle: 0.0,
    };

    pub fn new(origin: Point, angle: f32) -> Self {
        Placement { origin, angle }
    }

    pub fn apply(&self, p: Point) -> Point {
        if self.angle == 0.0 {
            return Point::new(p.x + self.origin.x, p.y + self.origin.y);
        }
        let (sin, cos) = self.angle.sin_cos();
        Point::new(
            p.x * cos - p.y * sin + self.origin.x,
            p.x * sin + p.y * cos + self.origin.y,
        )
    }

    /// `self` applied after `inner`.
    fn then(&self, inner: Placement) -> Placement {
        Placement {
            origin: self.apply(inner.origin),
            angle: self.angle + inner.angle,
        }
    }
}

/// Accumulates path commands, mapping local coordinates through the active placement.
#[derive(Debug)]
pub struct PathBuilder {
    commands: Vec<PathCommand>,
    placement: Placement,
    open: bool,
}

impl Default for PathBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PathBuilder {
    pub fn new() -> Self {
        PathBuilder {
            commands: Vec::new(),
            placement: Placement::IDENTITY,
            open: false,
        }
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        let p = self.placement.apply(Point::new(x, y));
        self.commands.push(PathCommand::MoveTo(p));
        self.open = true;
    }

    /// Lines to `(x, y)`, or starts a new sub-path there if none is open.
    pub fn line_to(&mut self, x: f32, y: f32) {
        if !self.open {
            return self.move_to(x, y);
        }
        let p = self.placement.apply(Point::new(x, y));
        self.commands.push(PathCommand::LineTo(p));
    }

    pub fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        if !self.open {
            self.move_to(cx, cy);
        }
        let c = self.placement.apply(Point::new(cx, cy));
        let p = self.placement.apply(Point::new(x, y));
        self.commands.push(PathCommand::QuadTo(c, p));
    }

    pub fn cubic_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) {
        if !self.open {
            self.move_to(c1x, c1y);
        }
        let c1 = self.placement.apply(Point::new(c1x, c1y));
        let c2 = self.placement.apply(Point::new(c2x, c2y));
        let p = self.placement.apply(Point::new(x, y));
        self.commands.push(PathCommand::CubicTo(c1, c2, p));
    }

    /// Closed axis-aligned ellipse made of four cubic Béziers.
    pub fn ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32) {
        // 4/3 * tan(π/8)
        const KAPPA: f32 = 0.552_284_8;
        let (kx, ky) = (rx * KAPPA, ry * KAPPA);
        self.move_to(cx + rx, cy);
        self.cubic_to(cx + rx, cy + ky, cx + kx, cy + ry, cx, cy + ry);
        self.cubic_to(cx - kx, cy + ry, cx - rx, cy + ky, cx - rx, cy);
        self.cubic_to(cx - rx, cy - ky, cx - kx, cy - ry, cx, cy - ry);
        self.cubic_to(cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy);
        self.close();
    }

    /// Clockwise arc from `start_angle` to `end_angle`. Like a canvas arc, it is joined to the
    /// open sub-path by a straight line, or starts a new sub-path at the arc's first point.
    pub fn arc(&mut self, cx: f32, cy: f32, radius: f32, start_angle: f32, end_angle: f32) {
        let sweep = (end_angle - start_angle).clamp(0.0, TAU);
        let (sin, cos) = start_angle.sin_cos();
        self.line_to(cx + radius * cos, cy + radius * sin);
        self.commands.push(PathCommand::Arc {
            center: self.placement.apply(Point::new(cx, cy)),
            radius,
            start_angle: start_angle + self.placement.angle,
            sweep,
        });
    }

    /// Closed axis-aligned rectangle (in local coordinates).
    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.move_to(x, y);
        self.line_to(x + width, y);
        self.line_to(x + width, y + height);
        self.line_to(x, y + height);
        self.close();
    }

    pub fn close(&mut self) {
        if self.open {
            self.commands.push(PathCommand::Close);
            self.open = false;
        }
    }

    /// Runs `draw` with `placement` composed onto the current one, restoring it afterwards.
    pub fn with_placement<R>(&mut self, placement: Placement, draw: impl FnOnce(&mut Self) -> R) -> R {
        let saved = self.placement;
        self.placement = saved.then(placement);
        let result = draw(self);
        self.placement = saved;
        result
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn finish(self) -> Path {
        Path {
            commands: self.commands,
        }
    }
}

/// Quarter-turn rotations used to orient corner shapes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum QuarterTurn {
    None,
    Clockwise,
    Half,
    CounterClockwise,
}

impl QuarterTurn {
    pub fn radians(self) -> f32 {
        match self {
            QuarterTurn::None => 0.0,
            QuarterTurn::Clockwise => FRAC_PI_2,
            QuarterTurn::Half => PI,
            QuarterTurn::CounterClockwise => -FRAC_PI_2,
        }
    }
}

/// Converts a pixel length into grid cells.
pub fn pixels_to_cells(pixel_length: f32, cell_size: f32) -> f32 {
    pixel_length / cell_size
}

/// Clamps a corner radius to `[0, side / 2]`.
pub fn clamp_radius(radius: f32, side: f32) -> f32 {
    radius.min(side / 2.0).max(0.0)
}

/// Builds a closed square whose stroke of `line_width` sits flush inside the box
/// `(x, y, size)`.
///
/// `radii` are `[top_left, top_right, bottom_right, bottom_left]`; each is clamped with
/// [`clamp_radius`] against the inset side. A zero radius leaves a mitred corner: no curve is
/// emitted for it at all.
pub fn rounded_square_path(line_width: f32, x: f32, y: f32, size: f32, radii: [f32; 4]) -> Path {
    let x = x + line_width / 2.0;
    let y = y + line_width / 2.0;
    let size = size - line_width;
    let [tl, tr, br, bl] = radii.map(|r| clamp_radius(r, size));

    let mut pb = PathBuilder::new();
    pb.move_to(x + tl, y);
    pb.line_to(x + size - tr, y);
    if tr != 0.0 {
        pb.quad_to(x + size, y, x + size, y + tr);
    }
    pb.line_to(x + size, y + size - br);
    if br != 0.0 {
        pb.quad_to(x + size, y + size, x + size - br, y + size);
    }
    pb.line_to(x + bl, y + size);
    if bl != 0.0 {
        pb.quad_to(x, y + size, x, y + size - bl);
    }
    pb.line_to(x, y + tl);
    if tl != 0.0 {
        pb.quad_to(x, y, x + tl, y);
    }
    pb.close();
    pb.finish()
}

/// Where a gradient lives on the surface.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum GradientGeometry {
    Linear { start: Point, end: Point },
    /// Concentric circles from radius 0 to `radius`.
    Radial { center: Point, radius: f32 },
}

/// Places a gradient over the square box at `(origin_x, origin_y)` with side `box_size`.
///
/// Linear gradients run through the box center, rotated by `rotation` radians, with both
/// endpoints on the box edges. The rotation is split into four quarter-wide sectors around
/// 0, π/2, π and 3π/2; within a sector one coordinate sits on the edge (`±box_size / 2`) and
/// the other follows the tangent, which never diverges inside a sector. Endpoints are rounded
/// to whole pixels.
pub fn gradient_endpoints(
    kind: GradientKind,
    origin_x: f32,
    origin_y: f32,
    box_size: f32,
    rotation: f32,
) -> GradientGeometry {
    let half = box_size / 2.0;
    let center = Point::new(origin_x + half, origin_y + half);
    if kind == GradientKind::Radial {
        return GradientGeometry::Radial {
            center,
            radius: half,
        };
    }

    let r = rotation.rem_euclid(TAU);
    let tan = r.tan();
    let (dx, dy) = if r <= FRAC_PI_4 || r > 7.0 * FRAC_PI_4 {
        (-half, -half * tan)
    } else if r <= 3.0 * FRAC_PI_4 {
        (-half / tan, -half)
    } else if r <= 5.0 * FRAC_PI_4 {
        (half, half * tan)
    } else {
        (half / tan, half)
    };

    GradientGeometry::Linear {
        start: Point::new((center.x + dx).round(), (center.y + dy).round()),
        end: Point::new((center.x - dx).round(), (center.y - dy).round()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    #[test]
    fn test_pixels_to_cells() {
        assert_eq!(pixels_to_cells(48.0, 8.0), 6.0);
        assert_eq!(pixels_to_cells(10.0, 4.0), 2.5);
    }

    #[test]
    fn test_clamp_radius() {
        assert_eq!(clamp_radius(-5.0, 20.0), 0.0);
        assert_eq!(clamp_radius(20.0, 20.0), 10.0);
        assert_eq!(clamp_radius(4.0, 20.0), 4.0);
    }

    #[test]
    fn test_grid_cells() {
        let grid = Grid::new(210.0, 10.0, 21);
        assert_eq!(grid.cell_size, 10.0);
        assert_eq!(grid.cell_origin(2, 3), Point::new(40.0, 30.0));
        assert_eq!(grid.cell_center(0, 0), Point::new(15.0, 15.0));
        assert_eq!(grid.bounds(), Rect::new(10.0, 10.0, 210.0, 210.0));
    }

    #[test]
    fn test_rounded_square_clamps_oversized_radii() {
        let path = rounded_square_path(0.0, 0.0, 0.0, 20.0, [20.0, 20.0, 20.0, 20.0]);
        assert_eq!(path.commands()[0], PathCommand::MoveTo(Point::new(10.0, 0.0)));
        assert_eq!(path.commands()[1], PathCommand::LineTo(Point::new(10.0, 0.0)));
        assert_eq!(
            path.commands()[2],
            PathCommand::QuadTo(Point::new(20.0, 0.0), Point::new(20.0, 10.0))
        );
    }

    #[test]
    fn test_rounded_square_zero_radius_skips_curves() {
        let path = rounded_square_path(2.0, 10.0, 10.0, 22.0, [0.0, -5.0, 0.0, 0.0]);
        assert!(!path
            .commands()
            .iter()
            .any(|c| matches!(c, PathCommand::QuadTo(..))));
        // move, 4 edges, close
        assert_eq!(path.commands().len(), 6);
        // inset by half the line width, side shrunk by the line width
        assert_eq!(path.commands()[0], PathCommand::MoveTo(Point::new(11.0, 11.0)));
        assert_eq!(path.commands()[2], PathCommand::LineTo(Point::new(31.0, 31.0)));
    }

    #[test]
    fn test_rounded_square_mixed_radii() {
        let path = rounded_square_path(0.0, 0.0, 0.0, 10.0, [2.0, 0.0, 3.0, 0.0]);
        let quads = path
            .commands()
            .iter()
            .filter(|c| matches!(c, PathCommand::QuadTo(..)))
            .count();
        assert_eq!(quads, 2);
        assert_eq!(path.commands().last(), Some(&PathCommand::Close));
    }

    #[test]
    fn test_rounded_square_is_deterministic() {
        let a = rounded_square_path(3.0, 1.5, 2.5, 40.0, [4.0, 8.0, 0.0, 12.0]);
        let b = rounded_square_path(3.0, 1.5, 2.5, 40.0, [4.0, 8.0, 0.0, 12.0]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_gradient_axis_aligned_rotations() {
        let cases = [
            (0.0, Point::new(0.0, 50.0), Point::new(100.0, 50.0)),
            (FRAC_PI_2, Point::new(50.0, 0.0), Point::new(50.0, 100.0)),
            (PI, Point::new(100.0, 50.0), Point::new(0.0, 50.0)),
            (3.0 * FRAC_PI_2, Point::new(50.0, 100.0), Point::new(50.0, 0.0)),
        ];
        for (rotation, start, end) in cases {
            match gradient_endpoints(GradientKind::Linear, 0.0, 0.0, 100.0, rotation) {
                GradientGeometry::Linear { start: s, end: e } => {
                    assert!(approx(s, start), "rotation {rotation}: start {s:?}");
                    assert!(approx(e, end), "rotation {rotation}: end {e:?}");
                }
                other => panic!("expected linear gradient, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_gradient_diagonal_hits_corners() {
        match gradient_endpoints(GradientKind::Linear, 10.0, 10.0, 100.0, FRAC_PI_4) {
            GradientGeometry::Linear { start, end } => {
                assert!(approx(start, Point::new(10.0, 10.0)));
                assert!(approx(end, Point::new(110.0, 110.0)));
            }
            other => panic!("expected linear gradient, got {other:?}"),
        }
    }

    #[test]
    fn test_gradient_negative_rotation_normalizes() {
        let a = gradient_endpoints(GradientKind::Linear, 0.0, 0.0, 100.0, -FRAC_PI_2);
        let b = gradient_endpoints(GradientKind::Linear, 0.0, 0.0, 100.0, 3.0 * FRAC_PI_2);
        assert_eq!(a, b);
    }

    #[test]
    fn test_radial_gradient() {
        assert_eq!(
            gradient_endpoints(GradientKind::Radial, 10.0, 20.0, 40.0, 0.0),
            GradientGeometry::Radial {
                center: Point::new(30.0, 40.0),
                radius: 20.0
            }
        );
    }

    #[test]
    fn test_placement_rotates_then_translates() {
        let mut pb = PathBuilder::new();
        pb.with_placement(Placement::new(Point::new(10.0, 10.0), FRAC_PI_2), |pb| {
            pb.move_to(1.0, 0.0);
        });
        pb.line_to(1.0, 0.0);
        let path = pb.finish();
        match path.commands() {
            [PathCommand::MoveTo(a), PathCommand::LineTo(b)] => {
                assert!(approx(*a, Point::new(10.0, 11.0)));
                assert_eq!(*b, Point::new(1.0, 0.0));
            }
            other => panic!("unexpected commands {other:?}"),
        }
    }

    #[test]
    fn test_arc_starts_subpath_at_first_point() {
        let mut pb = PathBuilder::new();
        pb.arc(5.0, 5.0, 2.0, 0.0, TAU);
        pb.close();
        let path = pb.finish();
        assert_eq!(path.subpath_count(), 1);
        assert_eq!(path.commands()[0], PathCommand::MoveTo(Point::new(7.0, 5.0)));
        assert!(matches!(path.commands()[1], PathCommand::Arc { sweep, .. } if sweep == TAU));
    }
}
