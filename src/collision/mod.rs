//! Probe-based collision resolution against the tile grid.
//!
//! A moving box is not swept as a whole. Instead [`probe`] builds a thin
//! rectangle reaching from the box's center line to its leading edge plus
//! the step's inertia, narrowed on the perpendicular axis so that corners
//! brushing a wall do not register, and [`attempt`] scans the tiles under
//! that rectangle for the first one that stops the box.
//!
//! The scan walks the primary axis from the probe's trailing edge to its
//! leading edge. For each primary cell it visits the perpendicular cells
//! outward from the probe's center cell, so at seams between slopes and
//! flat tiles the tile under the box's center line wins.

use glam::IVec2;

use crate::geometry::{Hitbox, Side};
use crate::kinematics::TouchFlags;
use crate::numeric::{tile_index, tile_origin};
use crate::tile::{SlopeHeight, SlopeOrientation, SlopeVariant, TileAttribute, TileGrid, TileKind};
use crate::{HALF_TILE, PROBE_LONG_FACTOR, PROBE_SHORT_FACTOR, TILE_SIZE};

/// Where and against which tile a probe collided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInfo {
    /// Tile coordinate of the colliding tile.
    pub index: IVec2,
    /// Attribute of the colliding tile.
    pub attribute: TileAttribute,
    /// Resolved coordinate along the probed axis: the position the box's
    /// leading edge should be moved to.
    pub coordinate: f32,
}

impl CollisionInfo {
    /// World rectangle of the colliding tile.
    #[must_use]
    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(
            tile_origin(self.index.x),
            tile_origin(self.index.y),
            TILE_SIZE,
            TILE_SIZE,
        )
    }

    /// Classified attribute of the colliding tile.
    #[must_use]
    pub fn kind(&self) -> TileKind {
        self.attribute.kind()
    }
}

/// Builds the probe rectangle cast from `hitbox` towards `side`.
///
/// Along the probed axis the probe covers the half of the box nearest
/// `side` extended by `inertia` (which carries the sign of the motion, so
/// it is negative for `Left` and `Top`). Across it the probe keeps the
/// centered half of the box width for vertical probes and the centered
/// third of the box height for horizontal ones.
///
/// # Examples
/// ```
/// use tilebound::{probe, Hitbox, Side};
/// let ahead = probe(&Hitbox::new(0.0, 0.0, 8.0, 12.0), Side::Right, 4.0);
/// assert_eq!(ahead, Hitbox::new(4.0, 4.0, 8.0, 4.0));
/// ```
#[must_use]
pub fn probe(hitbox: &Hitbox, side: Side, inertia: f32) -> Hitbox {
    let half_w = hitbox.w / PROBE_LONG_FACTOR;
    let half_h = hitbox.h / PROBE_LONG_FACTOR;
    let (across_x, across_w) = narrow(hitbox.x, hitbox.w, PROBE_LONG_FACTOR);
    let (across_y, across_h) = narrow(hitbox.y, hitbox.h, PROBE_SHORT_FACTOR);
    match side {
        Side::Right => Hitbox::new(hitbox.x + half_w, across_y, half_w + inertia, across_h),
        Side::Left => Hitbox::new(hitbox.x + inertia, across_y, half_w - inertia, across_h),
        Side::Top => Hitbox::new(across_x, hitbox.y + inertia, across_w, half_h - inertia),
        Side::Bottom => Hitbox::new(across_x, hitbox.y + half_h, across_w, half_h + inertia),
    }
}

/// Centered sub-span of `extent / factor` starting at `origin`.
fn narrow(origin: f32, extent: f32, factor: f32) -> (f32, f32) {
    let narrowed = extent / factor;
    (origin + (extent - narrowed) / 2.0, narrowed)
}

/// Scans the tiles under `probe` for the first one that stops motion
/// towards `side`.
///
/// `flags` are the body's touch flags from the previous step; they decide
/// one-way drop-through (`WILL_DROP`) and sticky contact with slopes
/// (`BOTTOM`, `TOP`, `SLOPED`). Returns `None` when nothing in the probe
/// qualifies. An out-of-bounds tile is always returned immediately, with
/// the probe's leading edge as its coordinate.
///
/// # Examples
/// ```
/// use tilebound::{attempt, probe, Hitbox, Side, TileAttribute, TileGrid, TouchFlags};
/// let grid = TileGrid::from_fn(10, 10, |x, y| {
///     if (x, y) == (5, 5) { TileAttribute::BLOCK } else { TileAttribute::EMPTY }
/// });
/// let moving = Hitbox::new(70.0, 84.0, 8.0, 8.0);
/// let hit = attempt(probe(&moving, Side::Right, 4.0), &TouchFlags::empty(), &grid, Side::Right)
///     .expect("the block is within reach");
/// assert!((hit.coordinate - 80.0).abs() < f32::EPSILON);
/// ```
#[must_use]
pub fn attempt(
    probe: Hitbox,
    flags: &TouchFlags,
    grid: &TileGrid,
    side: Side,
) -> Option<CollisionInfo> {
    scan(probe, flags, grid, side).info
}

/// Result of a probe scan, including whether a one-way platform was let
/// through because the body is dropping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Scan {
    pub(crate) info: Option<CollisionInfo>,
    pub(crate) dropped_through: bool,
}

pub(crate) fn scan(probe: Hitbox, flags: &TouchFlags, grid: &TileGrid, side: Side) -> Scan {
    let horizontal = side.is_horizontal();
    let leading = probe.side(side);
    let trailing = probe.side(side.opposing());
    let (across_min, across_mid, across_max) = if horizontal {
        (probe.y, probe.center_y(), probe.bottom())
    } else {
        (probe.x, probe.center_x(), probe.right())
    };
    let across = (
        tile_index(across_min),
        tile_index(across_mid),
        tile_index(across_max),
    );
    let mut dropped_through = false;

    for primary in primary_cells(tile_index(trailing), tile_index(leading), side) {
        for secondary in perpendicular_cells(across.0, across.1, across.2) {
            let (x, y) = if horizontal {
                (primary, secondary)
            } else {
                (secondary, primary)
            };
            let attribute = grid.attribute(x, y);
            let index = IVec2::new(x, y);
            let kind = attribute.kind();
            if kind == TileKind::OutOfBounds {
                return Scan {
                    info: Some(CollisionInfo {
                        index,
                        attribute,
                        coordinate: leading,
                    }),
                    dropped_through,
                };
            }
            let contact = evaluate(&probe, flags, side, index, kind);
            dropped_through |= contact.dropped_through;
            if contact.hit || sticks(flags, side, kind) {
                return Scan {
                    info: Some(CollisionInfo {
                        index,
                        attribute,
                        coordinate: contact.coordinate,
                    }),
                    dropped_through,
                };
            }
        }
    }
    Scan {
        info: None,
        dropped_through,
    }
}

/// Primary-axis cells from the trailing cell to the leading cell.
fn primary_cells(first: i32, last: i32, side: Side) -> impl Iterator<Item = i32> {
    let step = if side.is_max() { 1 } else { -1 };
    let span = last.saturating_sub(first).saturating_mul(step);
    (0..=span).map(move |offset| first.saturating_add(offset * step))
}

/// Perpendicular cells from `mid` outward to `min` and `max`, nearest first.
///
/// At equal distance the direction with more cells left to visit goes
/// first, the lower index when both sides are equally long.
fn perpendicular_cells(min: i32, mid: i32, max: i32) -> impl Iterator<Item = i32> {
    let below = mid.saturating_sub(min).max(0);
    let above = max.saturating_sub(mid).max(0);
    let upward_first = above > below;
    std::iter::once(mid).chain((1..=below.max(above)).flat_map(move |distance| {
        let (first, second) = if upward_first {
            (mid.saturating_add(distance), mid.saturating_sub(distance))
        } else {
            (mid.saturating_sub(distance), mid.saturating_add(distance))
        };
        [first, second]
            .into_iter()
            .filter(move |cell| (min..=max).contains(cell))
    }))
}

/// Outcome of testing one tile against a probe.
struct Contact {
    hit: bool,
    /// Tile edge or slope surface when the tile faces the probe, otherwise
    /// the probe's leading edge.
    coordinate: f32,
    /// A one-way platform would have caught the probe but the body is
    /// dropping through it.
    dropped_through: bool,
}

impl Contact {
    const fn new(hit: bool, coordinate: f32) -> Self {
        Self {
            hit,
            coordinate,
            dropped_through: false,
        }
    }
}

fn evaluate(probe: &Hitbox, flags: &TouchFlags, side: Side, index: IVec2, kind: TileKind) -> Contact {
    let leading = probe.side(side);
    let tile = Hitbox::new(tile_origin(index.x), tile_origin(index.y), TILE_SIZE, TILE_SIZE);
    match kind {
        TileKind::Solid { .. } => Contact::new(probe.overlaps(&tile), tile.side(side.opposing())),
        TileKind::OneWay => {
            // Only bodies coming down onto the top face are caught, and only
            // while their leading edge is less than half a tile into it.
            let catches =
                side == Side::Bottom && probe.overlaps(&tile) && leading - HALF_TILE < tile.y;
            let dropping = flags.contains(TouchFlags::WILL_DROP);
            Contact {
                hit: catches && !dropping,
                coordinate: tile.y,
                dropped_through: catches && dropping,
            }
        }
        TileKind::Slope(variant) => match slope_surface(variant, side, probe.center_x(), &tile) {
            Some(surface) => {
                let reached = if side == Side::Bottom {
                    leading >= surface
                } else {
                    leading <= surface
                };
                Contact::new(reached, surface)
            }
            None => Contact::new(false, leading),
        },
        TileKind::Empty | TileKind::OutOfBounds => Contact::new(false, leading),
    }
}

/// Surface of a slope at horizontal position `at`, when the slope faces a
/// probe towards `side`.
///
/// Floor slopes face bodies moving down, ceiling slopes bodies moving up;
/// horizontal probes never meet a slope surface.
fn slope_surface(variant: SlopeVariant, side: Side, at: f32, tile: &Hitbox) -> Option<f32> {
    let faces = matches!(
        (variant.orientation(), side),
        (SlopeOrientation::Floor, Side::Bottom) | (SlopeOrientation::Ceiling, Side::Top)
    );
    faces.then(|| tile.y + variant.surface_offset((at - tile.x).clamp(0.0, TILE_SIZE)))
}

/// Sticky contact: a body that was already standing (or pressed against a
/// ceiling) keeps contact with slopes it would otherwise skip over, so it
/// does not fall through seams between slope and flat tiles.
fn sticks(flags: &TouchFlags, side: Side, kind: TileKind) -> bool {
    let in_contact = match side {
        Side::Bottom => flags.contains(TouchFlags::BOTTOM),
        Side::Top => flags.contains(TouchFlags::TOP),
        Side::Left | Side::Right => false,
    };
    let TileKind::Slope(variant) = kind else {
        return false;
    };
    in_contact && (flags.contains(TouchFlags::SLOPED) || variant.height() == SlopeHeight::Tall)
}
