//! Centralised world and gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place.  Every constant is mirrored by a field of
//! [`crate::config::GameConfig`], which uses these values as its defaults and
//! lets `assets/game.toml` override any subset at startup.
//!
//! World space is screen oriented: `+x` points right, `+y` points down.
//! Angles are in degrees unless stated otherwise.

// ── World ─────────────────────────────────────────────────────────────────────

/// Width of the toroidal world (world units).
///
/// The world is three viewports wide so the camera has room to scroll before
/// the seam comes into view.
pub const WORLD_WIDTH: f32 = 3840.0;

/// Height of the toroidal world (world units).
pub const WORLD_HEIGHT: f32 = 2160.0;

/// When `true` both axes wrap; when `false` positions are clamped and
/// wandering entities are culled once they leave the world.
pub const WRAP_WORLD: bool = true;

// ── Camera ────────────────────────────────────────────────────────────────────

/// Viewport width in world units (one world unit per screen pixel).
pub const VIEW_WIDTH: f32 = 1280.0;

/// Viewport height in world units.
pub const VIEW_HEIGHT: f32 = 720.0;

/// Horizontal deadzone inset from each viewport edge.
///
/// The ship can roam freely inside the band `[left + margin, right - margin]`;
/// crossing it pushes the camera by exactly the excess.
pub const DEADZONE_MARGIN_X: f32 = 400.0;

/// Vertical deadzone inset from each viewport edge.
pub const DEADZONE_MARGIN_Y: f32 = 220.0;

// ── Asteroids ─────────────────────────────────────────────────────────────────

/// Radius of the smallest asteroid generation.
///
/// Also the per-generation shrink: a split child has radius
/// `parent.radius - ASTEROID_MIN_RADIUS`.  Asteroids at or below this radius
/// are terminal and split into nothing.
pub const ASTEROID_MIN_RADIUS: f32 = 20.0;

/// Number of spawnable asteroid sizes; spawn radius is `MIN_RADIUS * kind`.
pub const ASTEROID_KINDS: u32 = 3;

/// Largest spawnable radius.  Also the off-screen spawn offset for the field.
pub const ASTEROID_MAX_RADIUS: f32 = ASTEROID_MIN_RADIUS * ASTEROID_KINDS as f32;

/// Seconds between asteroid field spawns.
pub const ASTEROID_SPAWN_RATE: f32 = 0.8;

/// Slowest base speed (u/s) of a field-spawned asteroid, before size scaling.
pub const ASTEROID_SPAWN_SPEED_MIN: u32 = 40;

/// Fastest base speed (u/s) of a field-spawned asteroid, before size scaling.
pub const ASTEROID_SPAWN_SPEED_MAX: u32 = 100;

/// Maximum deviation (degrees) of a spawned asteroid's heading from the
/// inward edge normal.
pub const ASTEROID_SPAWN_SPREAD_DEG: i32 = 30;

/// Maximum spin magnitude (deg/s) assigned to a new asteroid.
pub const ASTEROID_MAX_SPIN: f32 = 60.0;

/// How far outside the world an asteroid may drift in clamp mode before it
/// is removed.
pub const ASTEROID_CULL_BUFFER: f32 = 120.0;

/// Fill alpha of a freshly spawned (first generation) asteroid.
pub const ASTEROID_FILL_ALPHA: u8 = 200;

/// Fill alpha of split children that can still split again.
pub const ASTEROID_MID_ALPHA: u8 = 128;

/// Fill alpha of the final, smallest generation.
pub const ASTEROID_FINAL_ALPHA: u8 = 64;

// ── Ship ──────────────────────────────────────────────────────────────────────

/// Collision radius of the player ship.
pub const SHIP_RADIUS: f32 = 20.0;

/// Turn rate (deg/s) while a turn input is held.
pub const SHIP_TURN_SPEED: f32 = 300.0;

/// Translation speed (u/s) while a thrust input is held.
pub const SHIP_MOVE_SPEED: f32 = 200.0;

/// Muzzle speed (u/s) of fired projectiles.
pub const SHIP_SHOT_SPEED: f32 = 500.0;

/// Minimum seconds between consecutive shots.
pub const SHIP_SHOT_COOLDOWN: f32 = 0.3;

/// More than this many simultaneously held inputs suppresses firing.
pub const SHIP_MAX_HELD_INPUTS: usize = 3;

// ── Projectiles ───────────────────────────────────────────────────────────────

/// Collision radius of a projectile.
pub const PROJECTILE_RADIUS: f32 = 5.0;

/// Hard cap on projectile age (seconds).
pub const PROJECTILE_MAX_LIFETIME: f32 = 2.0;

/// Age (seconds) before the off-screen cull check starts applying.
pub const PROJECTILE_CULL_GRACE: f32 = 0.05;

/// Inflation of the camera rect used for the projectile visibility cull.
pub const PROJECTILE_CULL_BUFFER: f32 = 90.0;

// ── Objectives ────────────────────────────────────────────────────────────────

/// Radius of a collectible star.
pub const OBJECTIVE_RADIUS: f32 = 18.0;

/// Alpha lost per second while the objective is inside the camera view.
pub const OBJECTIVE_FADE_RATE: f32 = 30.0;

/// Starting alpha of a freshly spawned objective.
pub const OBJECTIVE_FILL_ALPHA: f32 = 200.0;

/// Inset from the viewport edges used by `Objective::spawn_in_view`.
pub const OBJECTIVE_SPAWN_MARGIN: f32 = 20.0;

// ── Spatial Grid ─────────────────────────────────────────────────────────────

/// World-space size of each broad-phase grid cell.
///
/// Twice the largest asteroid radius keeps projectile queries to a 3×3 block.
pub const GRID_CELL_SIZE: f32 = 2.0 * ASTEROID_MAX_RADIUS;
