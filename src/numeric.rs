//! Numeric conversion helpers between world units and tile indices.
//!
//! World coordinates are `f32`; tile indices are `i32`. Conversions floor
//! towards negative infinity and clamp into the `i32` domain so that probes
//! reaching far outside the map still resolve to a defined cell.

use crate::TILE_SIZE;

/// Convert a world coordinate into the index of the tile containing it.
///
/// Non-finite input resolves to tile `0`.
///
/// # Examples
/// ```
/// use tilebound::numeric::tile_index;
/// assert_eq!(tile_index(0.0), 0);
/// assert_eq!(tile_index(15.9), 0);
/// assert_eq!(tile_index(16.0), 1);
/// assert_eq!(tile_index(-0.5), -1);
/// ```
#[expect(
    clippy::cast_possible_truncation,
    reason = "The value is clamped to the i32 bounds before casting."
)]
#[must_use]
pub fn tile_index(value: f32) -> i32 {
    let floored = (f64::from(value) / f64::from(TILE_SIZE)).floor();
    if floored.is_nan() {
        return 0;
    }
    floored.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

/// World coordinate of the near edge of the tile at `index`.
///
/// # Examples
/// ```
/// use tilebound::numeric::tile_origin;
/// assert!((tile_origin(5) - 80.0).abs() < f32::EPSILON);
/// ```
#[expect(
    clippy::cast_precision_loss,
    reason = "Tile indices of practical maps are far below f32's exact integer range."
)]
#[must_use]
pub fn tile_origin(index: i32) -> f32 {
    index as f32 * TILE_SIZE
}
