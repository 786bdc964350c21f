//! Convenience constructors for bodies and headless apps used in tests.

use bevy::prelude::*;
use glam::Vec2;
use tilebound::{Hitbox, KinematicBody, KinematicsPlugin, TileGrid};

/// Side length of the square test box.
pub const BOX_SIZE: f32 = 8.0;

/// An 8x8 box with its top-left corner at `position`.
///
/// # Examples
/// ```rust
/// use test_utils::physics::hitbox;
/// let h = hitbox((40.0, 84.0));
/// assert_eq!(h.right(), 48.0);
/// ```
pub fn hitbox<P: Into<Vec2>>(position: P) -> Hitbox {
    let position = position.into();
    Hitbox::new(position.x, position.y, BOX_SIZE, BOX_SIZE)
}

/// A free body moving with `velocity`.
///
/// # Examples
/// ```rust
/// use test_utils::physics::body;
/// let b = body((1.0, -2.0));
/// assert_eq!(b.velocity.y, -2.0);
/// ```
pub fn body<V: Into<Vec2>>(velocity: V) -> KinematicBody {
    KinematicBody::new(velocity.into())
}

/// A headless app running [`KinematicsPlugin`] over `grid`.
///
/// # Examples
/// ```rust,no_run
/// use test_utils::physics::headless_app;
/// use tilebound::TileGrid;
/// let mut app = headless_app(TileGrid::empty(4, 4));
/// app.update();
/// ```
pub fn headless_app(grid: TileGrid) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(KinematicsPlugin);
    app.insert_resource(grid);
    app
}

/// Steps `body` `ticks` times without a Bevy app, adding `gravity` to its
/// vertical velocity (capped at `max_fall`) before every step.
pub fn simulate(
    body: &mut KinematicBody,
    hitbox: &mut Hitbox,
    grid: &TileGrid,
    ticks: usize,
    gravity: f32,
    max_fall: f32,
) {
    for _ in 0..ticks {
        if gravity != 0.0 {
            body.accel_y(gravity, max_fall);
        }
        tilebound::step(body, hitbox, grid);
    }
}
