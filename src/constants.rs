//! Tuning constants shared by the grid, the resolver and the ray tracer.

/// World units per tile edge.
///
/// The attribute tables produced by the level editor assume this value, so
/// it is fixed at compile time rather than loaded per map.
pub const TILE_SIZE: f32 = 16.0;
/// Half of [`TILE_SIZE`]; the depth at which a one-way platform stops catching
/// a falling body.
pub const HALF_TILE: f32 = TILE_SIZE / 2.0;
/// Divisor applied to the box extent along the probed axis.
pub const PROBE_LONG_FACTOR: f32 = 2.0;
/// Divisor applied to the box height for horizontal probes.
pub const PROBE_SHORT_FACTOR: f32 = 3.0;
/// Rise of a slope surface per world unit travelled across its tile.
pub const SLOPE_GRADIENT: f32 = 0.5;
