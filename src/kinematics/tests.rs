use approx::assert_relative_eq;
use rstest::rstest;

use super::*;
use crate::tile::{SlopeVariant, TileAttribute};

fn grid_with(tiles: &[((i32, i32), TileAttribute)]) -> TileGrid {
    TileGrid::from_fn(20, 20, |x, y| {
        tiles
            .iter()
            .find(|(at, _)| *at == (x, y))
            .map_or(TileAttribute::EMPTY, |(_, attribute)| *attribute)
    })
}

fn row(y: i32, attribute: TileAttribute) -> TileGrid {
    TileGrid::from_fn(20, 20, |_, ty| if ty == y { attribute } else { TileAttribute::EMPTY })
}

fn run(body: &mut KinematicBody, hitbox: &mut Hitbox, grid: &TileGrid, ticks: usize) {
    for _ in 0..ticks {
        step(body, hitbox, grid);
    }
}

fn fall(body: &mut KinematicBody, hitbox: &mut Hitbox, grid: &TileGrid, ticks: usize) {
    for _ in 0..ticks {
        body.accel_y(0.5, 8.0);
        step(body, hitbox, grid);
    }
}

#[rstest]
fn moves_freely_through_empty_space() {
    let grid = TileGrid::empty(20, 20);
    let mut body = KinematicBody::new(Vec2::new(3.0, -2.0));
    let mut hitbox = Hitbox::new(100.0, 100.0, 8.0, 8.0);
    run(&mut body, &mut hitbox, &grid, 5);
    assert_eq!(hitbox.position(), Vec2::new(115.0, 90.0));
    assert_eq!(body.velocity, Vec2::new(3.0, -2.0));
    assert!(!body.any_contact());
}

#[rstest]
fn walking_right_stops_flush_against_a_wall() {
    let grid = grid_with(&[((5, 5), TileAttribute::BLOCK)]);
    let mut body = KinematicBody::new(Vec2::new(4.0, 0.0));
    let mut hitbox = Hitbox::new(40.0, 84.0, 8.0, 8.0);
    run(&mut body, &mut hitbox, &grid, 10);
    assert_relative_eq!(hitbox.x, 72.0);
    assert_relative_eq!(hitbox.right(), 80.0);
    assert_relative_eq!(body.velocity.x, 0.0);
    assert!(body.flags.contains(TouchFlags::RIGHT));
    assert!(!body.flags.contains(TouchFlags::LEFT));
    assert!(body.horizontal_contact());
}

#[rstest]
fn walking_left_stops_flush_against_a_wall() {
    let grid = grid_with(&[((2, 5), TileAttribute::BLOCK)]);
    let mut body = KinematicBody::new(Vec2::new(-4.0, 0.0));
    let mut hitbox = Hitbox::new(60.0, 84.0, 8.0, 8.0);
    run(&mut body, &mut hitbox, &grid, 10);
    assert_relative_eq!(hitbox.x, 48.0);
    assert!(body.flags.contains(TouchFlags::LEFT));
    assert!(!body.flags.contains(TouchFlags::RIGHT));
}

#[rstest]
fn gravity_lands_a_body_on_the_floor() {
    let grid = row(5, TileAttribute::BLOCK);
    let mut body = KinematicBody::default();
    let mut hitbox = Hitbox::new(40.0, 40.0, 8.0, 8.0);
    fall(&mut body, &mut hitbox, &grid, 60);
    assert_relative_eq!(hitbox.bottom(), 80.0);
    assert_relative_eq!(body.velocity.y, 0.0);
    assert!(body.flags.contains(TouchFlags::BOTTOM));
    assert!(!body.flags.contains(TouchFlags::ON_ONE_WAY));
    assert!(!body.flags.contains(TouchFlags::SLOPED));
}

#[rstest]
fn jumping_into_a_ceiling_sets_top() {
    let grid = grid_with(&[((5, 2), TileAttribute::BLOCK)]);
    let mut body = KinematicBody::new(Vec2::new(0.0, -4.0));
    let mut hitbox = Hitbox::new(84.0, 60.0, 8.0, 8.0);
    run(&mut body, &mut hitbox, &grid, 6);
    assert_relative_eq!(hitbox.y, 48.0);
    assert!(body.flags.contains(TouchFlags::TOP));
    assert!(body.vertical_contact());
}

#[rstest]
fn hooked_ceiling_is_reported() {
    let grid = grid_with(&[((5, 2), TileAttribute::BLOCK | TileAttribute::HOOKED)]);
    let mut body = KinematicBody::new(Vec2::new(0.0, -4.0));
    let mut hitbox = Hitbox::new(84.0, 60.0, 8.0, 8.0);
    run(&mut body, &mut hitbox, &grid, 6);
    assert!(body.flags.contains(TouchFlags::TOP | TouchFlags::HOOKED));
}

#[rstest]
fn landing_on_a_one_way_platform() {
    let grid = row(5, TileAttribute::BLOCK | TileAttribute::ONE_WAY);
    let mut body = KinematicBody::new(Vec2::new(0.0, 4.0));
    let mut hitbox = Hitbox::new(80.0, 40.0, 8.0, 8.0);
    run(&mut body, &mut hitbox, &grid, 10);
    assert_relative_eq!(hitbox.y, 72.0);
    assert!(body.flags.contains(TouchFlags::BOTTOM | TouchFlags::ON_ONE_WAY));
}

#[rstest]
fn dropping_through_a_one_way_platform() {
    let grid = row(5, TileAttribute::BLOCK | TileAttribute::ONE_WAY);
    let mut body = KinematicBody::default();
    let mut hitbox = Hitbox::new(80.0, 72.0, 8.0, 8.0);
    body.flags.insert(TouchFlags::BOTTOM | TouchFlags::ON_ONE_WAY | TouchFlags::WILL_DROP);

    fall(&mut body, &mut hitbox, &grid, 1);
    assert!(body.flags.contains(TouchFlags::WILL_DROP), "still sinking through");
    assert!(!body.flags.contains(TouchFlags::BOTTOM));

    fall(&mut body, &mut hitbox, &grid, 11);
    assert!(hitbox.y > 96.0);
    assert!(!body.flags.contains(TouchFlags::WILL_DROP));
    assert!(!body.flags.contains(TouchFlags::ON_ONE_WAY));
}

#[rstest]
fn rising_through_a_one_way_platform() {
    let grid = row(5, TileAttribute::BLOCK | TileAttribute::ONE_WAY);
    let mut body = KinematicBody::new(Vec2::new(0.0, -4.0));
    let mut hitbox = Hitbox::new(80.0, 100.0, 8.0, 8.0);
    run(&mut body, &mut hitbox, &grid, 10);
    assert!(hitbox.bottom() < 80.0);
    assert_relative_eq!(body.velocity.y, -4.0);
    assert!(!body.flags.contains(TouchFlags::TOP));
}

#[rstest]
fn landing_on_a_slope_follows_its_surface() {
    let grid = grid_with(&[((5, 5), SlopeVariant::PositiveFloorTall.into())]);
    let mut body = KinematicBody::new(Vec2::new(0.0, 4.0));
    let mut hitbox = Hitbox::new(84.0, 60.0, 8.0, 8.0);
    run(&mut body, &mut hitbox, &grid, 5);
    assert_relative_eq!(hitbox.bottom(), 84.0);
    assert!(body.flags.contains(TouchFlags::BOTTOM | TouchFlags::SLOPED));
}

#[rstest]
fn embedded_box_is_pushed_out_behind() {
    let grid = grid_with(&[((4, 5), TileAttribute::BLOCK)]);
    let mut body = KinematicBody::new(Vec2::new(0.5, 0.0));
    let mut hitbox = Hitbox::new(76.0, 84.0, 8.0, 8.0);
    step(&mut body, &mut hitbox, &grid);
    assert_relative_eq!(hitbox.x, 80.0);
    assert_relative_eq!(body.velocity.x, 0.5);
    assert!(!body.horizontal_contact());
}

#[rstest]
#[case::block(TileAttribute::BLOCK, false)]
#[case::hooked_block(TileAttribute::BLOCK | TileAttribute::HOOKED, true)]
fn embedded_box_is_pushed_down_out_of_a_ceiling(#[case] ceiling: TileAttribute, #[case] hooked: bool) {
    let grid = grid_with(&[((5, 4), ceiling)]);
    let mut body = KinematicBody::new(Vec2::new(0.0, 0.5));
    let mut hitbox = Hitbox::new(84.0, 78.0, 8.0, 8.0);
    step(&mut body, &mut hitbox, &grid);
    assert_relative_eq!(hitbox.y, 80.0);
    assert_relative_eq!(body.velocity.y, 0.5);
    assert!(!body.vertical_contact());
    assert_eq!(body.flags.contains(TouchFlags::HOOKED), hooked);
    assert!(!body.flags.contains(TouchFlags::SLOPED));
}

#[rstest]
fn embedded_box_is_pushed_down_onto_a_ceiling_slope_surface() {
    // Surface under the box center: 64 + 16 - 0.5 * 8 = 76.
    let grid = grid_with(&[((5, 4), SlopeVariant::NegativeCeilingTall.into())]);
    let mut body = KinematicBody::new(Vec2::new(0.0, 0.5));
    let mut hitbox = Hitbox::new(84.0, 74.0, 8.0, 8.0);
    step(&mut body, &mut hitbox, &grid);
    assert_relative_eq!(hitbox.y, 76.0);
    assert_relative_eq!(body.velocity.y, 0.5);
    assert!(body.flags.contains(TouchFlags::SLOPED));
    assert!(!body.flags.contains(TouchFlags::TOP));
}

#[rstest]
fn falling_off_the_map_switches_to_noclip() {
    let grid = TileGrid::empty(10, 10);
    let mut body = KinematicBody::new(Vec2::new(0.0, 8.0));
    body.flags.insert(TouchFlags::BOTTOM);
    let mut hitbox = Hitbox::new(40.0, 148.0, 8.0, 8.0);
    step(&mut body, &mut hitbox, &grid);
    assert!(body.flags.contains(TouchFlags::OUT_OF_BOUNDS | TouchFlags::NOCLIP));
    assert!(!body.any_contact());
    assert_relative_eq!(hitbox.y, 156.0);

    run(&mut body, &mut hitbox, &grid, 3);
    assert_relative_eq!(hitbox.y, 180.0);
    assert!(body.flags.contains(TouchFlags::OUT_OF_BOUNDS));
}

#[rstest]
fn noclip_bodies_pass_through_walls() {
    let grid = grid_with(&[((5, 5), TileAttribute::BLOCK)]);
    let mut body = KinematicBody::new(Vec2::new(4.0, 0.0));
    body.flags.insert(TouchFlags::NOCLIP | TouchFlags::RIGHT);
    let mut hitbox = Hitbox::new(72.0, 84.0, 8.0, 8.0);
    run(&mut body, &mut hitbox, &grid, 10);
    assert_relative_eq!(hitbox.x, 112.0);
    assert!(!body.horizontal_contact());
}

#[rstest]
fn tether_pulls_a_stray_body_back() {
    let grid = TileGrid::empty(20, 20);
    let mut body = KinematicBody::default();
    body.attach(Vec2::new(80.0, 40.0), 30.0);
    let mut hitbox = Hitbox::new(116.0, 36.0, 8.0, 8.0);
    step(&mut body, &mut hitbox, &grid);
    assert!(body.flags.contains(TouchFlags::CONSTRAINED));
    assert_relative_eq!(hitbox.center().x, 110.0, epsilon = 1e-4);
    assert_relative_eq!(hitbox.center().y, 40.0, epsilon = 1e-4);
    assert_eq!(body.velocity, Vec2::ZERO);
}

#[rstest]
fn tether_redirects_motion_along_the_circle() {
    let grid = TileGrid::empty(20, 20);
    let mut body = KinematicBody::new(Vec2::new(4.0, 4.0));
    body.attach(Vec2::new(80.0, 40.0), 30.0);
    let mut hitbox = Hitbox::new(106.0, 36.0, 8.0, 8.0);
    step(&mut body, &mut hitbox, &grid);

    let radial = hitbox.center() - body.anchor;
    assert_relative_eq!(radial.length(), 30.0, epsilon = 1e-3);
    assert_relative_eq!(body.velocity.length(), 32.0_f32.sqrt(), epsilon = 1e-4);
    assert_relative_eq!(body.velocity.dot(radial), 0.0, epsilon = 1e-3);
}

#[rstest]
fn slack_tether_leaves_motion_alone() {
    let grid = TileGrid::empty(20, 20);
    let mut body = KinematicBody::new(Vec2::new(1.0, 0.0));
    body.attach(Vec2::new(80.0, 40.0), 30.0);
    body.flags.insert(TouchFlags::CONSTRAINED);
    let mut hitbox = Hitbox::new(86.0, 36.0, 8.0, 8.0);
    step(&mut body, &mut hitbox, &grid);
    assert!(!body.flags.contains(TouchFlags::CONSTRAINED));
    assert_eq!(body.velocity, Vec2::new(1.0, 0.0));
    assert_relative_eq!(hitbox.x, 87.0);
}

#[rstest]
fn swinging_body_never_exceeds_its_tether() {
    let grid = TileGrid::empty(20, 20);
    let mut body = KinematicBody::default();
    body.attach(Vec2::new(80.0, 40.0), 30.0);
    let mut hitbox = Hitbox::new(106.0, 36.0, 8.0, 8.0);
    for _ in 0..200 {
        body.accel_y(0.5, 8.0);
        step(&mut body, &mut hitbox, &grid);
        assert!(hitbox.center().distance(body.anchor) <= 30.0 + 1e-3);
    }
}

#[rstest]
fn step_with_inertia_leaves_velocity_to_the_caller() {
    let grid = TileGrid::empty(20, 20);
    let mut body = KinematicBody::new(Vec2::new(0.0, 1.0));
    let mut hitbox = Hitbox::new(40.0, 40.0, 8.0, 8.0);
    let carried = step_with_inertia(&mut body, &mut hitbox, &grid, Vec2::new(4.0, 0.0));
    assert_eq!(carried, Vec2::new(4.0, 0.0));
    assert_eq!(hitbox.position(), Vec2::new(44.0, 40.0));
    assert_eq!(body.velocity, Vec2::new(0.0, 1.0));
}

#[rstest]
fn step_with_inertia_returns_redirected_inertia() {
    let grid = TileGrid::empty(20, 20);
    let mut body = KinematicBody::default();
    body.attach(Vec2::new(80.0, 40.0), 30.0);
    let mut hitbox = Hitbox::new(106.0, 36.0, 8.0, 8.0);
    let carried = step_with_inertia(&mut body, &mut hitbox, &grid, Vec2::new(4.0, 4.0));
    assert_relative_eq!(carried.length(), 32.0_f32.sqrt(), epsilon = 1e-4);
    assert_eq!(body.velocity, Vec2::ZERO);
}

#[rstest]
#[case::under_limit(1.0, 0.5, 4.0, 1.5)]
#[case::clamped(3.8, 0.5, 4.0, 4.0)]
#[case::negative_clamped(-3.8, -0.5, 4.0, -4.0)]
#[case::reversing(2.0, -0.5, 4.0, 1.5)]
fn accel_respects_the_limit(
    #[case] start: f32,
    #[case] amount: f32,
    #[case] limit: f32,
    #[case] expected: f32,
) {
    let mut body = KinematicBody::new(Vec2::new(start, start));
    body.accel_x(amount, limit);
    body.accel_y(amount, limit);
    assert_relative_eq!(body.velocity.x, expected);
    assert_relative_eq!(body.velocity.y, expected);
}

#[rstest]
#[case::slows(3.0, 1.0, 2.0)]
#[case::stops_at_zero(0.5, 1.0, 0.0)]
#[case::negative_stops_at_zero(-0.5, 1.0, 0.0)]
#[case::negative_slows(-3.0, 1.0, -2.0)]
fn decel_never_crosses_zero(#[case] start: f32, #[case] amount: f32, #[case] expected: f32) {
    let mut body = KinematicBody::new(Vec2::new(start, start));
    body.decel_x(amount);
    body.decel_y(amount);
    assert_relative_eq!(body.velocity.x, expected);
    assert_relative_eq!(body.velocity.y, expected);
}

#[rstest]
fn accel_angle_sets_speed_along_direction() {
    let mut body = KinematicBody::default();
    body.accel_angle(std::f32::consts::FRAC_PI_2, 3.0);
    assert_relative_eq!(body.velocity.x, 0.0, epsilon = 1e-6);
    assert_relative_eq!(body.velocity.y, 3.0, epsilon = 1e-6);
}

#[rstest]
fn attach_detach_and_reset() {
    let mut body = KinematicBody::new(Vec2::ONE);
    body.attach(Vec2::new(1.0, 2.0), 10.0);
    assert!(body.is_tethered());
    body.flags.insert(TouchFlags::CONSTRAINED);
    body.detach();
    assert!(!body.is_tethered());
    assert!(!body.flags.contains(TouchFlags::CONSTRAINED));
    body.reset();
    assert_eq!(body, KinematicBody::default());
}

#[rstest]
fn touch_flags_set_and_debug() {
    let mut flags = TouchFlags::empty();
    assert!(flags.is_empty());
    flags.set(TouchFlags::BOTTOM, true);
    flags |= TouchFlags::SLOPED;
    assert!(flags.contains(TouchFlags::BOTTOM | TouchFlags::SLOPED));
    assert!(flags.intersects(TouchFlags::CONTACT));
    flags.set(TouchFlags::BOTTOM, false);
    assert_eq!(flags, TouchFlags::SLOPED);
    assert_eq!(format!("{:?}", TouchFlags::LEFT | TouchFlags::HOOKED), r#"TouchFlags("LEFT | HOOKED")"#);
}
