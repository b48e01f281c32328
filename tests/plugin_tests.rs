//! Headless tests for [`SimulationPlugin`].
//!
//! These tests use [`MinimalPlugins`] with a manual clock so the fixed
//! timestep advances deterministically: no window, no rendering.
//!
//! Covered scenarios:
//! 1. Startup builds the simulation from the inserted config.
//! 2. Holding fire emits `ShotFired` messages.
//! 3. Ramming an asteroid emits `ShipDestroyed`; `RestartRequested` revives the run.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;
use torus_roids::asteroid::Asteroid;
use torus_roids::config::GameConfig;
use torus_roids::entity::WorldEntity;
use torus_roids::events::{GameEvent, RestartRequested};
use torus_roids::ship::ShipControls;
use torus_roids::simulation::{SimulationPlugin, SimulationState};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Every `GameEvent` seen so far, gathered in `Update`.
#[derive(Resource, Default)]
struct Collected(Vec<GameEvent>);

fn collect_events(mut reader: MessageReader<GameEvent>, mut out: ResMut<Collected>) {
    out.0.extend(reader.read().copied());
}

/// Minimal app with the plugin, a seeded config and a 20 ms manual clock.
fn headless_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(GameConfig {
            world_width: 2000.0,
            world_height: 2000.0,
            asteroid_spawn_rate: 1_000.0,
            rng_seed: Some(3),
            ..Default::default()
        })
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(20)))
        .init_resource::<Collected>()
        .add_plugins(SimulationPlugin)
        .add_systems(Update, collect_events);
    app
}

fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

fn collected(app: &App) -> &[GameEvent] {
    &app.world().resource::<Collected>().0
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn startup_builds_simulation_from_config() {
    let mut app = headless_app();
    app.update();

    let sim = app.world().resource::<SimulationState>();
    assert_eq!(sim.world().size(), Vec2::new(2000.0, 2000.0));
    let ship = sim.ship().expect("a run starts with a ship");
    assert_eq!(ship.position(), Vec2::new(1000.0, 1000.0));
    assert!(app.world().contains_resource::<ShipControls>());
}

#[test]
fn held_fire_emits_shot_messages() {
    let mut app = headless_app();
    app.update();
    app.world_mut().resource_mut::<ShipControls>().fire = true;
    run_frames(&mut app, 10);

    assert!(collected(&app).contains(&GameEvent::ShotFired));
    let sim = app.world().resource::<SimulationState>();
    assert!(!sim.projectiles().is_empty());
}

#[test]
fn restart_request_revives_destroyed_ship() {
    let mut app = headless_app();
    app.update();

    {
        let mut sim = app.world_mut().resource_mut::<SimulationState>();
        let world = sim.world();
        let center = world.center();
        let rock = Asteroid::new(sim.rng(), center, Vec2::ZERO, 40.0, world);
        sim.insert_asteroid(rock);
    }
    run_frames(&mut app, 5);

    assert!(collected(&app).contains(&GameEvent::ShipDestroyed));
    assert!(!app.world().resource::<SimulationState>().is_running());

    app.world_mut().write_message(RestartRequested);
    run_frames(&mut app, 5);

    let sim = app.world().resource::<SimulationState>();
    assert!(sim.is_running());
    assert!(sim.ship().is_some());
    assert!(sim.asteroids().is_empty());
}
