//! Axis-aligned rectangles and the sides they are probed from.
//!
//! World space grows right along X and down along Y, matching the tile grid:
//! the `Top` side of a box has the smallest Y coordinate.

use bevy::prelude::*;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// One of the four sides of an axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Maximum X.
    Right,
    /// Minimum X.
    Left,
    /// Minimum Y.
    Top,
    /// Maximum Y.
    Bottom,
}

impl Side {
    /// The side facing away from this one.
    #[must_use]
    pub const fn opposing(self) -> Self {
        match self {
            Self::Right => Self::Left,
            Self::Left => Self::Right,
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }

    /// True for `Top` and `Bottom`.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    /// True for `Right` and `Left`.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        !self.is_vertical()
    }

    /// True for the sides lying at the larger coordinate of their axis.
    #[must_use]
    pub const fn is_max(self) -> bool {
        matches!(self, Self::Right | Self::Bottom)
    }

    /// True for the sides lying at the smaller coordinate of their axis.
    #[must_use]
    pub const fn is_min(self) -> bool {
        !self.is_max()
    }

    /// The side a body moving along one axis with `speed` leads with.
    ///
    /// Positive speeds lead with the max side.
    #[must_use]
    pub fn leading(speed: f32, horizontal: bool) -> Self {
        match (horizontal, speed > 0.0) {
            (true, true) => Self::Right,
            (true, false) => Self::Left,
            (false, true) => Self::Bottom,
            (false, false) => Self::Top,
        }
    }
}

/// Axis-aligned rectangle in world units.
///
/// Entities carry their world-space collision box as this component; the
/// integrator moves it in place.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Hitbox {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub w: f32,
    /// Height.
    pub h: f32,
}

impl Hitbox {
    /// Creates a box from its top-left corner and dimensions.
    #[must_use]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Coordinate of `side` along its axis.
    #[must_use]
    pub fn side(&self, side: Side) -> f32 {
        match side {
            Side::Right => self.right(),
            Side::Left => self.x,
            Side::Top => self.y,
            Side::Bottom => self.bottom(),
        }
    }

    /// Distance from the box origin to `side` along its axis.
    #[must_use]
    pub const fn edge_offset(&self, side: Side) -> f32 {
        match side {
            Side::Right => self.w,
            Side::Bottom => self.h,
            Side::Left | Side::Top => 0.0,
        }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Horizontal center.
    #[must_use]
    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    /// Vertical center.
    #[must_use]
    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.center_x(), self.center_y())
    }

    /// Top-left corner.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Width and height.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    /// Moves the box so its center lies on `center`.
    pub fn set_center(&mut self, center: Vec2) {
        self.x = center.x - self.w / 2.0;
        self.y = center.y - self.h / 2.0;
    }

    /// Strict overlap test; boxes that merely share an edge do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.right() > other.x
            && self.x < other.right()
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Inclusive point containment.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        self.x <= point.x && point.x <= self.right() && self.y <= point.y && point.y <= self.bottom()
    }
}
