//! Per-tick motion of bodies through the tile grid.
//!
//! Each step moves a body along X, then along Y, using the collision
//! resolver to stop it at walls, floors, ceilings and slope surfaces. After
//! the leading side is resolved a zero-length probe on the opposite side
//! pushes the box out of anything it was left embedded in. A tethered body
//! is finally pulled back onto its tether circle and its motion redirected
//! along the tangent, which produces a pendulum swing under gravity.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use bevy::prelude::*;
use glam::Vec2;
use log::{debug, trace};

use crate::collision::{probe, scan, CollisionInfo};
use crate::geometry::{Hitbox, Side};
use crate::tile::{TileGrid, TileKind};
use crate::vector_math::{tangent_redirect, vec_normalize};

/// Contact and mode bits carried by a body between steps.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TouchFlags(u16);

impl TouchFlags {
    /// Pressed against a wall on the right.
    pub const RIGHT: Self = Self(1 << 0);
    /// Pressed against a wall on the left.
    pub const LEFT: Self = Self(1 << 1);
    /// Pressed against a ceiling.
    pub const TOP: Self = Self(1 << 2);
    /// Standing on a floor.
    pub const BOTTOM: Self = Self(1 << 3);
    /// The last vertical contact was a slope.
    pub const SLOPED: Self = Self(1 << 4);
    /// Collision is skipped; the body moves freely.
    pub const NOCLIP: Self = Self(1 << 5);
    /// The body has left the bottom of the map.
    pub const OUT_OF_BOUNDS: Self = Self(1 << 6);
    /// Drop through the one-way platform below on the next steps.
    pub const WILL_DROP: Self = Self(1 << 7);
    /// Standing on a one-way platform, so dropping through is possible.
    pub const ON_ONE_WAY: Self = Self(1 << 8);
    /// The last contact was a hookable tile.
    pub const HOOKED: Self = Self(1 << 9);
    /// The tether pulled the body back this step.
    pub const CONSTRAINED: Self = Self(1 << 10);

    const NAMES: [(Self, &'static str); 11] = [
        (Self::RIGHT, "RIGHT"),
        (Self::LEFT, "LEFT"),
        (Self::TOP, "TOP"),
        (Self::BOTTOM, "BOTTOM"),
        (Self::SLOPED, "SLOPED"),
        (Self::NOCLIP, "NOCLIP"),
        (Self::OUT_OF_BOUNDS, "OUT_OF_BOUNDS"),
        (Self::WILL_DROP, "WILL_DROP"),
        (Self::ON_ONE_WAY, "ON_ONE_WAY"),
        (Self::HOOKED, "HOOKED"),
        (Self::CONSTRAINED, "CONSTRAINED"),
    ];

    /// Every side-contact bit.
    pub const CONTACT: Self = Self::RIGHT
        .union(Self::LEFT)
        .union(Self::TOP)
        .union(Self::BOTTOM);

    /// No flags set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Raw bit value.
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// True when every bit of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when any bit of `other` is set.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// True when no flag is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Bits set in either operand, usable in constant contexts.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Sets the bits of `other`.
    pub const fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clears the bits of `other`.
    pub const fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Sets or clears the bits of `other`.
    pub const fn set(&mut self, other: Self, value: bool) {
        if value {
            self.insert(other);
        } else {
            self.remove(other);
        }
    }
}

impl BitOr for TouchFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for TouchFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for TouchFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name);
        f.debug_tuple("TouchFlags")
            .field(&names.collect::<Vec<_>>().join(" | "))
            .finish()
    }
}

/// Velocity, contact state and tether of a moving body.
///
/// The body's box lives in a separate [`Hitbox`] component; the integrator
/// mutates both together.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct KinematicBody {
    /// Displacement applied per step, in world units.
    pub velocity: Vec2,
    /// Contact and mode flags from the previous step.
    pub flags: TouchFlags,
    /// Fixed point the body is tethered to.
    pub anchor: Vec2,
    /// Tether length; zero or less means untethered.
    pub tether: f32,
}

impl KinematicBody {
    /// A free body moving with `velocity`.
    #[must_use]
    pub fn new(velocity: Vec2) -> Self {
        Self {
            velocity,
            ..Self::default()
        }
    }

    /// Clears velocity, flags and tether.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Replaces the velocity with `speed` along `angle` (radians, measured
    /// from +X towards +Y).
    pub fn accel_angle(&mut self, angle: f32, speed: f32) {
        self.velocity = Vec2::from_angle(angle) * speed;
    }

    /// Adds `amount` to the horizontal velocity without exceeding `limit`
    /// in the direction of `amount`.
    pub fn accel_x(&mut self, amount: f32, limit: f32) {
        self.velocity.x = accelerate(self.velocity.x, amount, limit);
    }

    /// Adds `amount` to the vertical velocity without exceeding `limit` in
    /// the direction of `amount`.
    pub fn accel_y(&mut self, amount: f32, limit: f32) {
        self.velocity.y = accelerate(self.velocity.y, amount, limit);
    }

    /// Moves the horizontal velocity towards zero by `amount`.
    pub fn decel_x(&mut self, amount: f32) {
        self.velocity.x = decelerate(self.velocity.x, amount);
    }

    /// Moves the vertical velocity towards zero by `amount`.
    pub fn decel_y(&mut self, amount: f32) {
        self.velocity.y = decelerate(self.velocity.y, amount);
    }

    /// Pressed against a wall on either side.
    #[must_use]
    pub const fn horizontal_contact(&self) -> bool {
        self.flags.intersects(TouchFlags::RIGHT.union(TouchFlags::LEFT))
    }

    /// Standing on a floor or pressed against a ceiling.
    #[must_use]
    pub const fn vertical_contact(&self) -> bool {
        self.flags.intersects(TouchFlags::TOP.union(TouchFlags::BOTTOM))
    }

    /// Touching anything at all.
    #[must_use]
    pub const fn any_contact(&self) -> bool {
        self.flags.intersects(TouchFlags::CONTACT)
    }

    /// Tethers the body to `anchor` with a rope of `length`.
    pub const fn attach(&mut self, anchor: Vec2, length: f32) {
        self.anchor = anchor;
        self.tether = length;
    }

    /// Releases the tether.
    pub const fn detach(&mut self) {
        self.tether = 0.0;
        self.flags.remove(TouchFlags::CONSTRAINED);
    }

    /// True while a tether is attached.
    #[must_use]
    pub const fn is_tethered(&self) -> bool {
        self.tether > 0.0
    }
}

fn accelerate(current: f32, amount: f32, limit: f32) -> f32 {
    if amount > 0.0 {
        (current + amount).min(limit)
    } else {
        (current + amount).max(-limit)
    }
}

fn decelerate(current: f32, amount: f32) -> f32 {
    if current > 0.0 {
        (current - amount).max(0.0)
    } else {
        (current + amount).min(0.0)
    }
}

/// Advances `body` by one tick using its own velocity as inertia.
///
/// Collisions zero the blocked velocity component. When the body is
/// tethered and the tether pulls it back, the redirected motion becomes the
/// new velocity.
///
/// # Examples
/// ```
/// use glam::Vec2;
/// use tilebound::{step, Hitbox, KinematicBody, TileGrid, TouchFlags};
/// let grid = TileGrid::empty(10, 10);
/// let mut body = KinematicBody::new(Vec2::new(3.0, 2.0));
/// let mut hitbox = Hitbox::new(16.0, 16.0, 8.0, 8.0);
/// step(&mut body, &mut hitbox, &grid);
/// assert_eq!(hitbox.position(), Vec2::new(19.0, 18.0));
/// assert!(!body.flags.contains(TouchFlags::BOTTOM));
/// ```
pub fn step(body: &mut KinematicBody, hitbox: &mut Hitbox, grid: &TileGrid) {
    let inertia = body.velocity;
    resolve_axes(body, hitbox, grid, inertia);
    if body.is_tethered() {
        body.velocity = constrain(body, hitbox, body.velocity);
    }
}

/// Advances `body` by `inertia` instead of its velocity, for bodies carried
/// along by something else.
///
/// Returns `inertia`, redirected along the tether when the tether pulled
/// the body back; the body's velocity is only touched by collisions.
pub fn step_with_inertia(
    body: &mut KinematicBody,
    hitbox: &mut Hitbox,
    grid: &TileGrid,
    inertia: Vec2,
) -> Vec2 {
    resolve_axes(body, hitbox, grid, inertia);
    if body.is_tethered() {
        constrain(body, hitbox, inertia)
    } else {
        inertia
    }
}

fn resolve_axes(body: &mut KinematicBody, hitbox: &mut Hitbox, grid: &TileGrid, inertia: Vec2) {
    if inertia.x != 0.0 {
        resolve_x(body, hitbox, grid, inertia.x);
    }
    if inertia.y != 0.0 {
        resolve_y(body, hitbox, grid, inertia.y);
    }
}

fn resolve_x(body: &mut KinematicBody, hitbox: &mut Hitbox, grid: &TileGrid, inertia: f32) {
    if body.flags.contains(TouchFlags::NOCLIP) {
        hitbox.x += inertia;
        body.flags.remove(TouchFlags::RIGHT | TouchFlags::LEFT);
        return;
    }
    let side = Side::leading(inertia, true);
    match scan(probe(hitbox, side, inertia), &body.flags, grid, side).info {
        Some(info) if info.kind() == TileKind::OutOfBounds => {
            hitbox.x += inertia;
            leave_world(body, &info);
            return;
        }
        Some(info) => {
            trace!("wall at {:?} stops the body on its {side:?} side", info.index);
            hitbox.x = info.coordinate - hitbox.edge_offset(side);
            body.velocity.x = 0.0;
            body.flags.set(TouchFlags::RIGHT, side == Side::Right);
            body.flags.set(TouchFlags::LEFT, side == Side::Left);
            body.flags.set(TouchFlags::HOOKED, info.attribute.is_hooked());
        }
        None => {
            hitbox.x += inertia;
            body.flags.remove(TouchFlags::RIGHT | TouchFlags::LEFT);
        }
    }
    push_out(body, hitbox, grid, side.opposing());
}

fn resolve_y(body: &mut KinematicBody, hitbox: &mut Hitbox, grid: &TileGrid, inertia: f32) {
    if body.flags.contains(TouchFlags::NOCLIP) {
        hitbox.y += inertia;
        body.flags.remove(
            TouchFlags::TOP
                | TouchFlags::BOTTOM
                | TouchFlags::SLOPED
                | TouchFlags::WILL_DROP
                | TouchFlags::ON_ONE_WAY,
        );
        return;
    }
    let side = Side::leading(inertia, false);
    let scanned = scan(probe(hitbox, side, inertia), &body.flags, grid, side);
    match scanned.info {
        Some(info) if info.kind() == TileKind::OutOfBounds => {
            hitbox.y += inertia;
            leave_world(body, &info);
            return;
        }
        Some(info) => {
            trace!("surface at {:?} stops the body on its {side:?} side", info.index);
            let kind = info.kind();
            hitbox.y = info.coordinate - hitbox.edge_offset(side);
            body.velocity.y = 0.0;
            body.flags.set(TouchFlags::TOP, side == Side::Top);
            body.flags.set(TouchFlags::BOTTOM, side == Side::Bottom);
            body.flags.set(TouchFlags::SLOPED, matches!(kind, TileKind::Slope(_)));
            body.flags.set(TouchFlags::HOOKED, info.attribute.is_hooked());
            body.flags.set(
                TouchFlags::ON_ONE_WAY,
                side == Side::Bottom && kind == TileKind::OneWay,
            );
            if side == Side::Bottom {
                body.flags.remove(TouchFlags::WILL_DROP);
            }
        }
        None => {
            hitbox.y += inertia;
            body.flags.remove(
                TouchFlags::TOP | TouchFlags::BOTTOM | TouchFlags::SLOPED | TouchFlags::ON_ONE_WAY,
            );
            // A body still sinking through a one-way platform keeps dropping.
            if !scanned.dropped_through {
                body.flags.remove(TouchFlags::WILL_DROP);
            }
        }
    }
    push_out(body, hitbox, grid, side.opposing());
}

/// Zero-length probe on `side`: moves the box out of a tile it ended up
/// overlapping on the side it was not moving towards.
fn push_out(body: &mut KinematicBody, hitbox: &mut Hitbox, grid: &TileGrid, side: Side) {
    let Some(info) = scan(probe(hitbox, side, 0.0), &body.flags, grid, side).info else {
        return;
    };
    if info.kind() == TileKind::OutOfBounds {
        leave_world(body, &info);
        return;
    }
    let resolved = info.coordinate - hitbox.edge_offset(side);
    if side.is_horizontal() {
        hitbox.x = resolved;
    } else {
        hitbox.y = resolved;
        body.flags.set(TouchFlags::SLOPED, matches!(info.kind(), TileKind::Slope(_)));
    }
    body.flags.set(TouchFlags::HOOKED, info.attribute.is_hooked());
}

/// Switches the body to free motion once it has fallen off the map.
fn leave_world(body: &mut KinematicBody, info: &CollisionInfo) {
    if !body.flags.contains(TouchFlags::OUT_OF_BOUNDS) {
        debug!("body left the map through tile {:?}", info.index);
    }
    body.flags.insert(TouchFlags::OUT_OF_BOUNDS | TouchFlags::NOCLIP);
    body.flags.remove(
        TouchFlags::CONTACT
            | TouchFlags::SLOPED
            | TouchFlags::WILL_DROP
            | TouchFlags::ON_ONE_WAY
            | TouchFlags::HOOKED,
    );
}

/// Pulls a tethered body back onto its tether circle.
///
/// Returns `inertia` redirected along the circle's tangent, keeping its
/// magnitude, when the body had strayed beyond the tether; otherwise
/// `inertia` unchanged.
fn constrain(body: &mut KinematicBody, hitbox: &mut Hitbox, inertia: Vec2) -> Vec2 {
    let center = hitbox.center();
    let distance = center.distance(body.anchor);
    let constrained = distance > body.tether;
    body.flags.set(TouchFlags::CONSTRAINED, constrained);
    if !constrained {
        return inertia;
    }
    let pinned = center + vec_normalize(body.anchor - center) * (distance - body.tether);
    hitbox.set_center(pinned);
    tangent_redirect(pinned - body.anchor, inertia)
}

#[cfg(test)]
mod tests;
