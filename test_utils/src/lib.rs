//! Utility helpers for tests.
//!
//! Fixture constructors for tile grids, bodies and headless Bevy apps shared
//! by the integration tests of `tilebound`.
pub mod grids;
pub mod physics;

use glam::Vec2;

/// Assert that two points agree within `tolerance` on both axes.
///
/// # Panics
/// Panics with both points in the message when they differ.
///
/// # Examples
/// ```
/// use glam::Vec2;
/// use test_utils::assert_vec_close;
/// assert_vec_close(Vec2::new(1.0, 2.0), Vec2::new(1.0005, 2.0), 1e-3);
/// ```
pub fn assert_vec_close(actual: Vec2, expected: Vec2, tolerance: f32) {
    assert!(
        (actual - expected).abs().max_element() <= tolerance,
        "expected {expected:?}, got {actual:?}"
    );
}
