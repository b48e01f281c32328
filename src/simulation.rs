//! Simulation state, tick orchestration and the Bevy plugin wrapping them.
//!
//! [`SimulationState`] owns one collection per entity kind.  A tick runs in a
//! fixed order:
//!
//! 1. advance the asteroids (the only step left once the run is over),
//! 2. apply held controls to the ship, advance it and let the camera follow,
//! 3. advance projectiles and stars, sweeping the expired ones,
//! 4. run the asteroid spawner,
//! 5. resolve collisions against the spatial grid, buffering every removal
//!    and every split child,
//! 6. apply the buffered changes and make sure a star is on the map.
//!
//! Nothing is inserted into or removed from a collection while the collision
//! pass is iterating it.

use crate::asteroid::Asteroid;
use crate::camera::GameCamera;
use crate::collision::{collides, first_asteroid_hit, projectile_hits};
use crate::config::{load_game_config, GameConfig};
use crate::entity::{DrawInstance, FrameContext, Liveness, WorldEntity};
use crate::events::{GameEvent, RestartRequested};
use crate::objective::{Objective, ObjectiveParams};
use crate::ship::{Projectile, Ship, ShipControls, ShipParams};
use crate::spatial_partition::SpatialGrid;
use crate::spawner::{AsteroidField, SpawnParams};
use crate::wrap::WorldBounds;
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameConfig>()
            .init_resource::<ShipControls>()
            .add_message::<GameEvent>()
            .add_message::<RestartRequested>()
            .add_systems(Startup, (load_game_config, init_simulation_system).chain())
            .add_systems(
                FixedUpdate,
                (restart_request_system, simulation_tick_system).chain(),
            );
    }
}

/// What a [`DrawItem`] refers to.  Indices point into the matching
/// `SimulationState` collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drawable {
    Ship,
    Projectile(usize),
    Asteroid(usize),
    Objective(usize),
}

/// One on-screen copy of one entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub what: Drawable,
    pub instance: DrawInstance,
}

#[derive(Resource)]
pub struct SimulationState {
    world: WorldBounds,
    camera: GameCamera,
    ship_params: ShipParams,
    objective_params: ObjectiveParams,
    objective_spawn_margin: f32,
    min_radius: f32,
    ship: Option<Ship>,
    projectiles: Vec<Projectile>,
    asteroids: Vec<Asteroid>,
    objectives: Vec<Objective>,
    field: AsteroidField,
    grid: SpatialGrid,
    rng: StdRng,
    running: bool,
}

impl SimulationState {
    /// Build a fresh run from `config`.  The config is only read here.
    pub fn new(config: &GameConfig) -> Self {
        let world = WorldBounds::new(config.world_width, config.world_height, config.wrap_world);
        let camera = GameCamera::new(Vec2::new(config.view_width, config.view_height), world)
            .with_deadzone(config.deadzone_margin_x, config.deadzone_margin_y);
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut state = Self {
            world,
            camera,
            ship_params: ShipParams::from_config(config),
            objective_params: ObjectiveParams::from_config(config),
            objective_spawn_margin: config.objective_spawn_margin,
            min_radius: config.asteroid_min_radius,
            ship: None,
            projectiles: Vec::new(),
            asteroids: Vec::new(),
            objectives: Vec::new(),
            field: AsteroidField::new(SpawnParams::from_config(config)),
            grid: SpatialGrid::new(config.grid_cell_size, world),
            rng,
            running: false,
        };
        state.restart();
        state
    }

    /// Clear the board and start a new run with the ship at the world centre.
    pub fn restart(&mut self) {
        self.projectiles.clear();
        self.asteroids.clear();
        self.objectives.clear();
        self.field.reset();

        let center = self.world.center();
        self.ship = Some(Ship::new(center, self.world, self.ship_params));
        self.camera.center_on(center.x, center.y);
        self.objectives.push(Objective::spawn_in_view(
            &mut self.rng,
            self.camera.viewport(),
            self.objective_spawn_margin,
            self.world,
            self.objective_params,
        ));
        self.running = true;
        info!("Run started at {center}");
    }

    pub fn world(&self) -> WorldBounds {
        self.world
    }

    pub fn camera(&self) -> &GameCamera {
        &self.camera
    }

    pub fn ship(&self) -> Option<&Ship> {
        self.ship.as_ref()
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    /// `false` once the ship has been destroyed, until [`Self::restart`].
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Add an asteroid to the field directly, outside the spawner's schedule.
    pub fn insert_asteroid(&mut self, asteroid: Asteroid) {
        self.asteroids.push(asteroid);
    }

    /// Shared RNG, for callers building entities to insert.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Advance the whole simulation by `dt` seconds.
    pub fn tick(&mut self, dt: f32, controls: &ShipControls) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let ctx = FrameContext {
            camera: self.camera.viewport(),
        };

        // Once the ship is gone only the asteroids keep drifting.
        self.asteroids.retain_mut(|a| a.advance(dt, &ctx) == Liveness::Alive);
        if !self.running {
            return events;
        }

        if let Some(ship) = self.ship.as_mut() {
            if let Some(shot) = ship.apply_controls(controls, dt) {
                self.projectiles.push(shot);
                events.push(GameEvent::ShotFired);
            }
            ship.advance(dt, &ctx);
            self.camera.push_follow(ship.position().x, ship.position().y);
        }
        self.projectiles.retain_mut(|p| p.advance(dt, &ctx) == Liveness::Alive);
        self.objectives.retain_mut(|o| o.advance(dt, &ctx) == Liveness::Alive);

        if let Some(rock) = self
            .field
            .tick(dt, &mut self.rng, self.camera.viewport(), self.world)
        {
            self.asteroids.push(rock);
        }

        self.resolve_collisions(&mut events);

        if self.objectives.is_empty() {
            self.objectives.push(Objective::spawn_random(
                &mut self.rng,
                self.world,
                self.objective_params,
            ));
        }
        events
    }

    fn resolve_collisions(&mut self, events: &mut Vec<GameEvent>) {
        self.grid.rebuild(self.asteroids.iter().map(|a| a.position()));

        let mut spent_shots = vec![false; self.projectiles.len()];
        let mut shot_rocks = vec![false; self.asteroids.len()];
        for hit in projectile_hits(&self.projectiles, &self.asteroids, &self.grid, self.world) {
            spent_shots[hit.projectile] = true;
            shot_rocks[hit.asteroid] = true;
        }

        let mut collected = vec![false; self.objectives.len()];
        let mut ship_lost = false;
        if let Some(ship) = &self.ship {
            ship_lost = first_asteroid_hit(
                ship.bounding_circle(),
                &self.asteroids,
                &self.grid,
                self.world,
                &shot_rocks,
            )
            .is_some();
            for (i, objective) in self.objectives.iter().enumerate() {
                if collides(ship, objective) {
                    collected[i] = true;
                }
            }
        }

        // Apply everything buffered above.
        take_marked(&mut self.projectiles, &spent_shots);
        for objective in take_marked(&mut self.objectives, &collected) {
            events.push(GameEvent::ObjectiveCollected {
                kind: objective.kind(),
            });
        }

        let mut children = Vec::new();
        for rock in take_marked(&mut self.asteroids, &shot_rocks) {
            events.push(GameEvent::AsteroidDestroyed { tier: rock.tier() });
            if let Some(pair) = rock.split(&mut self.rng, self.min_radius) {
                debug!("asteroid split into r={}", pair[0].radius());
                children.extend(pair);
            }
        }
        self.asteroids.append(&mut children);

        if ship_lost {
            self.ship = None;
            self.running = false;
            events.push(GameEvent::ShipDestroyed);
            info!("Ship destroyed; run over");
        }
    }

    /// Every on-screen copy of every entity, in viewport-local coordinates.
    ///
    /// Draw order: asteroids, objectives, projectiles, ship.
    pub fn draw_list(&self) -> Vec<DrawItem> {
        let camera = self.camera.viewport();
        let mut items = Vec::new();
        let mut push = |what: Drawable, instances: Vec<DrawInstance>| {
            items.extend(instances.into_iter().map(|instance| DrawItem {
                what,
                instance,
            }));
        };
        for (i, a) in self.asteroids.iter().enumerate() {
            push(Drawable::Asteroid(i), a.draw_instances(camera));
        }
        for (i, o) in self.objectives.iter().enumerate() {
            push(Drawable::Objective(i), o.draw_instances(camera));
        }
        for (i, p) in self.projectiles.iter().enumerate() {
            push(Drawable::Projectile(i), p.draw_instances(camera));
        }
        if let Some(ship) = &self.ship {
            push(Drawable::Ship, ship.draw_instances(camera));
        }
        items
    }
}

/// Remove the items whose flag is set and return them in order.
fn take_marked<T>(items: &mut Vec<T>, marked: &[bool]) -> Vec<T> {
    debug_assert_eq!(items.len(), marked.len());
    let mut taken = Vec::new();
    let mut kept = Vec::with_capacity(items.len());
    for (item, &gone) in std::mem::take(items).into_iter().zip(marked) {
        if gone {
            taken.push(item);
        } else {
            kept.push(item);
        }
    }
    *items = kept;
    taken
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Startup system: build the simulation from the (possibly file-loaded) config.
pub fn init_simulation_system(mut commands: Commands, config: Res<GameConfig>) {
    commands.insert_resource(SimulationState::new(&config));
}

pub fn restart_request_system(
    mut requests: MessageReader<RestartRequested>,
    mut sim: ResMut<SimulationState>,
) {
    if requests.read().count() > 0 {
        sim.restart();
    }
}

/// Fixed-step tick; forwards the tick's events as messages.
pub fn simulation_tick_system(
    time: Res<Time>,
    controls: Res<ShipControls>,
    mut sim: ResMut<SimulationState>,
    mut events: MessageWriter<GameEvent>,
) {
    let fired = sim.tick(time.delta_secs(), &controls);
    events.write_batch(fired);
}
