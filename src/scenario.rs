//! Text-legend grids and JSON scenarios for the demo binary and tests.
//!
//! A legend is one string per tile row, one glyph per tile:
//!
//! | glyph | tile |
//! |-------|------|
//! | `.` or space | empty |
//! | `#` | solid block |
//! | `H` | hookable block |
//! | `=` | one-way platform |
//! | `^` | harmful, not solid |
//! | `1`..`8` | slope, numbered as in the level editor |

use bevy::prelude::*;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::geometry::Hitbox;
use crate::kinematics::{KinematicBody, TouchFlags};
use crate::tile::{GridError, SlopeVariant, TileAttribute, TileGrid};

/// Attribute named by a legend glyph.
#[must_use]
pub fn glyph_attribute(glyph: char) -> Option<TileAttribute> {
    match glyph {
        '.' | ' ' => Some(TileAttribute::EMPTY),
        '#' => Some(TileAttribute::BLOCK),
        'H' => Some(TileAttribute::BLOCK | TileAttribute::HOOKED),
        '=' => Some(TileAttribute::BLOCK | TileAttribute::ONE_WAY),
        '^' => Some(TileAttribute::HARMFUL),
        _ => glyph
            .to_digit(10)
            .and_then(|digit| u8::try_from(digit).ok())
            .and_then(SlopeVariant::from_number)
            .map(SlopeVariant::attribute),
    }
}

/// Builds a grid from legend rows, top row first.
///
/// # Errors
/// Returns [`GridError::RaggedRow`] when a row's length differs from the
/// first row's, [`GridError::UnknownGlyph`] for a character outside the
/// legend, and [`GridError::TooLarge`] when the legend does not fit the
/// tile index range.
///
/// # Examples
/// ```
/// use tilebound::{scenario::parse_rows, TileKind};
/// let grid = parse_rows(&["....", "..#.", "===="]).expect("valid legend");
/// assert_eq!((grid.width(), grid.height()), (4, 3));
/// assert_eq!(grid.kind(2, 1), TileKind::Solid { hooked: false });
/// assert_eq!(grid.kind(0, 2), TileKind::OneWay);
/// ```
pub fn parse_rows<S: AsRef<str>>(rows: &[S]) -> Result<TileGrid, GridError> {
    let width = rows.first().map_or(0, |row| row.as_ref().chars().count());
    let mut attributes = Vec::with_capacity(width.saturating_mul(rows.len()));
    for (y, row) in rows.iter().enumerate() {
        let found = row.as_ref().chars().count();
        if found != width {
            return Err(GridError::RaggedRow {
                row: y,
                expected: width,
                found,
            });
        }
        for (x, glyph) in row.as_ref().chars().enumerate() {
            attributes.push(glyph_attribute(glyph).ok_or(GridError::UnknownGlyph { glyph, x, y })?);
        }
    }
    let too_large = || GridError::TooLarge {
        width: u32::try_from(width).unwrap_or(u32::MAX),
        height: u32::try_from(rows.len()).unwrap_or(u32::MAX),
    };
    let columns = u32::try_from(width).map_err(|_| too_large())?;
    let lines = u32::try_from(rows.len()).map_err(|_| too_large())?;
    TileGrid::new(columns, lines, attributes)
}

/// Tether of a scenario body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TetherSpec {
    /// Anchor point in world units.
    pub anchor: [f32; 2],
    /// Tether length in world units.
    pub length: f32,
}

/// A body placed in a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySpec {
    /// Label used in log output.
    #[serde(default)]
    pub name: String,
    /// Initial collision box.
    pub hitbox: Hitbox,
    /// Initial velocity per tick.
    #[serde(default)]
    pub velocity: [f32; 2],
    /// Optional grapple tether.
    #[serde(default)]
    pub tether: Option<TetherSpec>,
    /// Start dropping through one-way platforms.
    #[serde(default)]
    pub will_drop: bool,
}

impl BodySpec {
    /// The components representing this body in a Bevy world.
    #[must_use]
    pub fn bundle(&self) -> (Name, KinematicBody, Hitbox) {
        let mut body = KinematicBody::new(Vec2::from(self.velocity));
        if let Some(tether) = self.tether {
            body.attach(Vec2::from(tether.anchor), tether.length);
        }
        body.flags.set(TouchFlags::WILL_DROP, self.will_drop);
        (Name::new(self.name.clone()), body, self.hitbox)
    }
}

const fn default_ticks() -> u32 {
    120
}

const fn default_max_fall() -> f32 {
    8.0
}

/// A grid, the bodies in it and how long to simulate them.
///
/// # Examples
/// ```
/// use tilebound::scenario::Scenario;
/// let scenario = Scenario::from_json(r##"{
///     "rows": ["....", ".##."],
///     "bodies": [{ "name": "box", "hitbox": { "x": 4.0, "y": 0.0, "w": 8.0, "h": 8.0 } }]
/// }"##).expect("valid scenario");
/// assert_eq!(scenario.ticks, 120);
/// assert_eq!(scenario.grid().expect("valid legend").height(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Legend rows, top row first.
    pub rows: Vec<String>,
    /// Bodies to spawn.
    #[serde(default)]
    pub bodies: Vec<BodySpec>,
    /// Number of ticks to run.
    #[serde(default = "default_ticks")]
    pub ticks: u32,
    /// Downward acceleration per tick applied to every body.
    #[serde(default)]
    pub gravity: f32,
    /// Terminal falling speed per tick.
    #[serde(default = "default_max_fall")]
    pub max_fall: f32,
}

impl Scenario {
    /// Parses a scenario from JSON.
    ///
    /// # Errors
    /// Returns the `serde_json` error for malformed or incomplete input.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Builds the scenario's grid.
    ///
    /// # Errors
    /// Returns the errors of [`parse_rows`].
    pub fn grid(&self) -> Result<TileGrid, GridError> {
        parse_rows(&self.rows)
    }
}
