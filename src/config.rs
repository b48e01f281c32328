//! Runtime game configuration loaded from `assets/game.toml`.
//!
//! [`GameConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  At startup, [`load_game_config`] reads
//! `assets/game.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the values you care about.
//!
//! The simulation core never reads globals: [`crate::simulation::SimulationState`]
//! copies what it needs out of a `GameConfig` at construction time.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `GameConfig::default()`.

use crate::constants::*;
use crate::error::{require_non_negative, require_positive, SimError, SimResult};
use bevy::prelude::*;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::Path;

/// Default location of the optional config override file.
pub const CONFIG_PATH: &str = "assets/game.toml";

/// Runtime-tunable world and gameplay configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── World ─────────────────────────────────────────────────────────────────
    pub world_width: f32,
    pub world_height: f32,
    pub wrap_world: bool,

    // ── Camera ────────────────────────────────────────────────────────────────
    pub view_width: f32,
    pub view_height: f32,
    pub deadzone_margin_x: f32,
    pub deadzone_margin_y: f32,

    // ── Asteroids ─────────────────────────────────────────────────────────────
    pub asteroid_min_radius: f32,
    pub asteroid_kinds: u32,
    pub asteroid_max_radius: f32,
    pub asteroid_spawn_rate: f32,
    pub asteroid_spawn_speed_min: u32,
    pub asteroid_spawn_speed_max: u32,
    pub asteroid_spawn_spread_deg: i32,

    // ── Ship ──────────────────────────────────────────────────────────────────
    pub ship_radius: f32,
    pub ship_turn_speed: f32,
    pub ship_move_speed: f32,
    pub ship_shot_speed: f32,
    pub ship_shot_cooldown: f32,

    // ── Projectiles ───────────────────────────────────────────────────────────
    pub projectile_radius: f32,
    pub projectile_max_lifetime: f32,
    pub projectile_cull_buffer: f32,

    // ── Objectives ────────────────────────────────────────────────────────────
    pub objective_radius: f32,
    pub objective_fade_rate: f32,
    pub objective_spawn_margin: f32,

    // ── Spatial Grid ──────────────────────────────────────────────────────────
    pub grid_cell_size: f32,

    /// Fixed RNG seed for reproducible runs; `None` seeds from entropy.
    pub rng_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            // World
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            wrap_world: WRAP_WORLD,
            // Camera
            view_width: VIEW_WIDTH,
            view_height: VIEW_HEIGHT,
            deadzone_margin_x: DEADZONE_MARGIN_X,
            deadzone_margin_y: DEADZONE_MARGIN_Y,
            // Asteroids
            asteroid_min_radius: ASTEROID_MIN_RADIUS,
            asteroid_kinds: ASTEROID_KINDS,
            asteroid_max_radius: ASTEROID_MAX_RADIUS,
            asteroid_spawn_rate: ASTEROID_SPAWN_RATE,
            asteroid_spawn_speed_min: ASTEROID_SPAWN_SPEED_MIN,
            asteroid_spawn_speed_max: ASTEROID_SPAWN_SPEED_MAX,
            asteroid_spawn_spread_deg: ASTEROID_SPAWN_SPREAD_DEG,
            // Ship
            ship_radius: SHIP_RADIUS,
            ship_turn_speed: SHIP_TURN_SPEED,
            ship_move_speed: SHIP_MOVE_SPEED,
            ship_shot_speed: SHIP_SHOT_SPEED,
            ship_shot_cooldown: SHIP_SHOT_COOLDOWN,
            // Projectiles
            projectile_radius: PROJECTILE_RADIUS,
            projectile_max_lifetime: PROJECTILE_MAX_LIFETIME,
            projectile_cull_buffer: PROJECTILE_CULL_BUFFER,
            // Objectives
            objective_radius: OBJECTIVE_RADIUS,
            objective_fade_rate: OBJECTIVE_FADE_RATE,
            objective_spawn_margin: OBJECTIVE_SPAWN_MARGIN,
            // Spatial Grid
            grid_cell_size: GRID_CELL_SIZE,
            rng_seed: None,
        }
    }
}

impl GameConfig {
    /// Parse a config from TOML text.  Keys not present keep their defaults.
    pub fn from_toml_str(contents: &str) -> SimResult<Self> {
        toml::from_str::<GameConfig>(contents).map_err(|source| SimError::ConfigParse {
            path: "<inline>".to_string(),
            source,
        })
    }

    /// Load and validate a config file.
    ///
    /// A missing file is not an error: the compiled defaults are returned.
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(SimError::ConfigRead {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        let config =
            toml::from_str::<GameConfig>(&contents).map_err(|source| SimError::ConfigParse {
                path: path.display().to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check every tunable is inside the range the simulation can run with.
    pub fn validate(&self) -> SimResult<()> {
        require_positive("world_width", self.world_width)?;
        require_positive("world_height", self.world_height)?;
        require_positive("view_width", self.view_width)?;
        require_positive("view_height", self.view_height)?;
        require_non_negative("deadzone_margin_x", self.deadzone_margin_x)?;
        require_non_negative("deadzone_margin_y", self.deadzone_margin_y)?;
        require_positive("asteroid_min_radius", self.asteroid_min_radius)?;
        require_positive("asteroid_kinds", self.asteroid_kinds as f32)?;
        require_positive("asteroid_max_radius", self.asteroid_max_radius)?;
        if self.asteroid_max_radius < self.asteroid_min_radius * self.asteroid_kinds as f32 {
            return Err(SimError::InvalidConfig {
                name: "asteroid_max_radius",
                value: self.asteroid_max_radius,
                expected: "≥ asteroid_min_radius × asteroid_kinds",
            });
        }
        require_positive("asteroid_spawn_rate", self.asteroid_spawn_rate)?;
        if self.asteroid_spawn_speed_min > self.asteroid_spawn_speed_max {
            return Err(SimError::InvalidConfig {
                name: "asteroid_spawn_speed_min",
                value: self.asteroid_spawn_speed_min as f32,
                expected: "≤ asteroid_spawn_speed_max",
            });
        }
        require_non_negative(
            "asteroid_spawn_spread_deg",
            self.asteroid_spawn_spread_deg as f32,
        )?;
        require_positive("ship_radius", self.ship_radius)?;
        require_non_negative("ship_turn_speed", self.ship_turn_speed)?;
        require_non_negative("ship_move_speed", self.ship_move_speed)?;
        require_positive("ship_shot_speed", self.ship_shot_speed)?;
        require_non_negative("ship_shot_cooldown", self.ship_shot_cooldown)?;
        require_positive("projectile_radius", self.projectile_radius)?;
        require_positive("projectile_max_lifetime", self.projectile_max_lifetime)?;
        require_non_negative("projectile_cull_buffer", self.projectile_cull_buffer)?;
        require_positive("objective_radius", self.objective_radius)?;
        require_non_negative("objective_fade_rate", self.objective_fade_rate)?;
        require_non_negative("objective_spawn_margin", self.objective_spawn_margin)?;
        require_positive("grid_cell_size", self.grid_cell_size)?;
        Ok(())
    }
}

/// Startup system: attempt to load `assets/game.toml` and overwrite the
/// `GameConfig` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults.  Read, parse and validation
/// errors are logged but do not abort startup.
pub fn load_game_config(mut config: ResMut<GameConfig>) {
    if !Path::new(CONFIG_PATH).exists() {
        info!("No {CONFIG_PATH} found; using compiled defaults");
        return;
    }
    match GameConfig::load(CONFIG_PATH) {
        Ok(loaded) => {
            *config = loaded;
            info!("Loaded game config from {CONFIG_PATH}");
        }
        Err(e) => warn!("{e}; using defaults"),
    }
}
