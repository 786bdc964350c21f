//! Line-of-sight queries against the tile grid.
//!
//! [`trace`] walks the cells a ray passes through (a grid DDA in tile
//! units) and stops at the first solid tile or slope surface it meets.
//! Grappling hooks use it to find where they catch: a hookable block pulls
//! the hit to the center of the tile so the tether anchors there.

use glam::{IVec2, Vec2};

use crate::numeric::{tile_index, tile_origin};
use crate::tile::{TileGrid, TileKind};
use crate::vector_math::vec_normalize;
use crate::{HALF_TILE, TILE_SIZE};

/// Casts a ray from `origin` along `direction` for at most `max_length`
/// world units and returns where it stops.
///
/// Empty, one-way and out-of-bounds tiles let the ray through. A solid tile
/// stops it where it enters the tile, except hookable tiles, which return
/// their center. A slope stops it where it crosses the slope's surface;
/// rays passing a slope tile without crossing the surface continue. When
/// nothing is hit the point `max_length` along the ray is returned.
///
/// A zero or non-finite direction, a non-finite origin, or a length that
/// is not a positive finite number returns `origin` unchanged.
///
/// # Examples
/// ```
/// use glam::Vec2;
/// use tilebound::{trace, TileAttribute, TileGrid};
/// let grid = TileGrid::from_fn(10, 10, |x, y| {
///     if (x, y) == (5, 5) { TileAttribute::BLOCK } else { TileAttribute::EMPTY }
/// });
/// let hit = trace(&grid, 200.0, Vec2::new(40.0, 88.0), Vec2::X);
/// assert_eq!(hit, Vec2::new(80.0, 88.0));
/// ```
#[must_use]
pub fn trace(grid: &TileGrid, max_length: f32, origin: Vec2, direction: Vec2) -> Vec2 {
    let dir = vec_normalize(direction);
    if dir == Vec2::ZERO || !origin.is_finite() || !max_length.is_finite() || max_length <= 0.0 {
        return origin;
    }
    let mut walk = Walk::new(origin, dir);
    while let Some((cell, length)) = walk.advance() {
        if length > max_length || walk.escaped(grid) {
            break;
        }
        match grid.kind(cell.x, cell.y) {
            TileKind::Solid { hooked: true } => {
                return Vec2::new(tile_origin(cell.x), tile_origin(cell.y)) + HALF_TILE;
            }
            TileKind::Solid { hooked: false } => return origin + dir * length,
            TileKind::Slope(variant) => {
                let (left, right) = variant.chord(cell.x, cell.y);
                let crossing = find_intersection(origin, dir, left, right)
                    .filter(|point| point.distance(origin) <= max_length);
                if let Some(point) = crossing {
                    return point;
                }
            }
            TileKind::Empty | TileKind::OneWay | TileKind::OutOfBounds => {}
        }
    }
    origin + dir * max_length
}

/// [`trace`] with the direction given as an angle in radians, measured from
/// +X towards +Y.
#[must_use]
pub fn trace_angle(grid: &TileGrid, max_length: f32, origin: Vec2, angle: f32) -> Vec2 {
    trace(grid, max_length, origin, Vec2::from_angle(angle))
}

/// Intersection of the ray `ray_origin + t * ray_dir` (`t >= 0`) with the
/// segment from `seg_a` to `seg_b`, if any.
///
/// Parallel rays never intersect, even when collinear with the segment.
///
/// # Examples
/// ```
/// use glam::Vec2;
/// use tilebound::find_intersection;
/// let hit = find_intersection(Vec2::ZERO, Vec2::X, Vec2::new(4.0, -1.0), Vec2::new(4.0, 1.0));
/// assert_eq!(hit, Some(Vec2::new(4.0, 0.0)));
/// assert_eq!(find_intersection(Vec2::ZERO, -Vec2::X, Vec2::new(4.0, -1.0), Vec2::new(4.0, 1.0)), None);
/// ```
#[must_use]
pub fn find_intersection(ray_origin: Vec2, ray_dir: Vec2, seg_a: Vec2, seg_b: Vec2) -> Option<Vec2> {
    let segment = seg_b - seg_a;
    let denominator = ray_dir.perp_dot(segment);
    if denominator.abs() <= f32::EPSILON {
        return None;
    }
    let offset = seg_a - ray_origin;
    let t = offset.perp_dot(segment) / denominator;
    let u = offset.perp_dot(ray_dir) / denominator;
    (t >= 0.0 && (0.0..=1.0).contains(&u)).then(|| ray_origin + ray_dir * t)
}

/// Cell-by-cell walk along a normalized ray.
struct Walk {
    cell: IVec2,
    step: IVec2,
    dir: Vec2,
    /// Ray length at which the next vertical / horizontal grid line is crossed.
    next: Vec2,
    /// Ray length between consecutive grid lines on each axis.
    delta: Vec2,
}

impl Walk {
    fn new(origin: Vec2, dir: Vec2) -> Self {
        let cell = IVec2::new(tile_index(origin.x), tile_index(origin.y));
        let step = IVec2::new(direction_sign(dir.x), direction_sign(dir.y));
        Self {
            cell,
            step,
            dir,
            next: Vec2::new(
                first_crossing(origin.x, cell.x, step.x, dir.x),
                first_crossing(origin.y, cell.y, step.y, dir.y),
            ),
            delta: Vec2::new(crossing_interval(dir.x), crossing_interval(dir.y)),
        }
    }

    /// Enters the next cell, returning it and the ray length at its entry.
    ///
    /// Returns `None` once the float resolution no longer lets the walk
    /// make progress.
    fn advance(&mut self) -> Option<(IVec2, f32)> {
        // Ties cross the horizontal grid line first.
        let entry = if self.next.x < self.next.y {
            self.cell.x = self.cell.x.checked_add(self.step.x)?;
            let crossed = self.next.x;
            self.next.x += self.delta.x;
            (self.next.x > crossed).then_some(crossed)?
        } else {
            self.cell.y = self.cell.y.checked_add(self.step.y)?;
            let crossed = self.next.y;
            self.next.y += self.delta.y;
            (self.next.y > crossed).then_some(crossed)?
        };
        Some((self.cell, entry))
    }

    /// True once the walk is outside the grid and moving away from it, so
    /// no tile it could still enter can stop the ray.
    fn escaped(&self, grid: &TileGrid) -> bool {
        let away_x = (self.cell.x < 0 && self.dir.x <= 0.0)
            || (self.cell.x >= grid.width() && self.dir.x >= 0.0);
        let away_y = (self.cell.y < 0 && self.dir.y <= 0.0)
            || (self.cell.y >= grid.height() && self.dir.y >= 0.0);
        away_x || away_y
    }
}

const fn direction_sign(component: f32) -> i32 {
    if component > 0.0 {
        1
    } else {
        -1
    }
}

fn first_crossing(origin: f32, cell: i32, step: i32, component: f32) -> f32 {
    if component == 0.0 {
        return f32::INFINITY;
    }
    let boundary = if step > 0 {
        tile_origin(cell.saturating_add(1))
    } else {
        tile_origin(cell)
    };
    (boundary - origin).abs() / component.abs()
}

fn crossing_interval(component: f32) -> f32 {
    if component == 0.0 {
        f32::INFINITY
    } else {
        TILE_SIZE / component.abs()
    }
}
