//! Bevy plugin running the kinematics step for every body each frame.
//!
//! Free bodies are integrated first. Bodies carrying [`Riding`] are
//! integrated afterwards with their platform's resolved velocity added to
//! their own, so a rider moves with the platform it stands on.

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use log::{debug, info};

use crate::geometry::Hitbox;
use crate::kinematics::{step, step_with_inertia, KinematicBody, TouchFlags};
use crate::tile::TileGrid;

/// System set containing the kinematics systems, for ordering gameplay
/// systems (input, gravity) before or after the step.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct KinematicsSet;

/// Marks a body as carried by the platform entity it holds.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Riding(pub Entity);

/// Triggered once when a body falls off the bottom of the map.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyLeftWorld {
    /// The body that left.
    pub entity: Entity,
}

/// Steps every body that is not riding a platform.
///
/// Does nothing until a [`TileGrid`] resource is present.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn integrate_bodies_system(
    mut commands: Commands,
    grid: Option<Res<TileGrid>>,
    mut bodies: Query<(Entity, &mut KinematicBody, &mut Hitbox), Without<Riding>>,
) {
    let Some(grid) = grid else {
        return;
    };
    for (entity, mut body, mut hitbox) in &mut bodies {
        let was_inside = !body.flags.contains(TouchFlags::OUT_OF_BOUNDS);
        step(&mut body, &mut hitbox, &grid);
        report_exit(&mut commands, entity, was_inside, &body);
    }
}

/// Steps every riding body with its platform's velocity added to its own.
///
/// A rider whose platform has no [`KinematicBody`] moves on its own
/// velocity alone.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn integrate_riders_system(
    mut commands: Commands,
    grid: Option<Res<TileGrid>>,
    platforms: Query<&KinematicBody, Without<Riding>>,
    mut riders: Query<(Entity, &Riding, &mut KinematicBody, &mut Hitbox)>,
) {
    let Some(grid) = grid else {
        return;
    };
    for (entity, riding, mut body, mut hitbox) in &mut riders {
        let carried = platforms.get(riding.0).map_or_else(
            |_| {
                debug!("rider {entity:?} lost platform {:?}", riding.0);
                Vec2::ZERO
            },
            |platform| platform.velocity,
        );
        let was_inside = !body.flags.contains(TouchFlags::OUT_OF_BOUNDS);
        let inertia = body.velocity + carried;
        let redirected = step_with_inertia(&mut body, &mut hitbox, &grid, inertia);
        if body.flags.contains(TouchFlags::CONSTRAINED) {
            body.velocity = redirected - carried;
        }
        report_exit(&mut commands, entity, was_inside, &body);
    }
}

fn report_exit(commands: &mut Commands, entity: Entity, was_inside: bool, body: &KinematicBody) {
    if was_inside && body.flags.contains(TouchFlags::OUT_OF_BOUNDS) {
        commands.trigger(BodyLeftWorld { entity });
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn log_body_left_world(event: On<BodyLeftWorld>) {
    info!("body {:?} left the world", event.event().entity);
}

/// Bevy plugin installing the kinematics systems in [`Update`].
///
/// The plugin does not insert a [`TileGrid`]; the map loader provides it.
#[derive(Debug, Default)]
pub struct KinematicsPlugin;

impl Plugin for KinematicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(log_body_left_world);
        app.configure_sets(Update, KinematicsSet);
        app.add_systems(
            Update,
            (integrate_bodies_system, integrate_riders_system)
                .chain()
                .in_set(KinematicsSet),
        );
        info!("kinematics plugin installed");
    }
}
