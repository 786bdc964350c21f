#![cfg_attr(docsrs, feature(doc_cfg))]
//! Tile-grid collision and kinematics for a 2D action platformer.
//!
//! The crate resolves axis-aligned boxes against a static grid of tiles:
//! solid blocks, one-way platforms, eight slope shapes and the out-of-bounds
//! row below the map. [`step`] moves a [`KinematicBody`] one tick, [`trace`]
//! casts grapple rays, and [`KinematicsPlugin`] runs the step for every body
//! in a Bevy app.
pub mod collision;
pub mod constants;
pub mod geometry;
pub mod kinematics;
pub mod logging;
pub mod numeric;
pub mod plugin;
pub mod raycast;
pub mod scenario;
pub mod tile;
pub mod vector_math;
pub use constants::*;

// Re-export commonly used items
pub use collision::{attempt, probe, CollisionInfo};
pub use geometry::{Hitbox, Side};
pub use kinematics::{step, step_with_inertia, KinematicBody, TouchFlags};
pub use logging::init as init_logging;
pub use plugin::{BodyLeftWorld, KinematicsPlugin, KinematicsSet, Riding};
pub use raycast::{find_intersection, trace, trace_angle};
pub use tile::{
    GridError, SlopeHeight, SlopeOrientation, SlopeSign, SlopeVariant, TileAttribute, TileGrid,
    TileKind,
};
pub use vector_math::{tangent_redirect, vec_normalize};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use tilebound::prelude::*;
    //! ```

    pub use crate::geometry::{Hitbox, Side};
    pub use crate::kinematics::{step, KinematicBody, TouchFlags};
    pub use crate::plugin::{KinematicsPlugin, KinematicsSet, Riding};
    pub use crate::raycast::trace;
    pub use crate::tile::{TileAttribute, TileGrid};
    pub use crate::TILE_SIZE;
}
