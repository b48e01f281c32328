//! Simulation core for a wrapped-world asteroid shooter.
//!
//! The world is a rectangular torus: anything leaving one edge re-enters on
//! the opposite edge, and the camera, rendering copies and collision tests
//! all take the shortest way across the seams.  Asteroids carry a procedural
//! outline and a baked surface overlay, and split into faster fragments when
//! shot.
//!
//! [`simulation::SimulationState`] owns every entity and advances them with
//! `tick`; [`simulation::SimulationPlugin`] runs it on Bevy's fixed timestep
//! and forwards [`events::GameEvent`]s as messages.  Windowing, input and
//! drawing stay with the host application.

pub mod asteroid;
pub mod camera;
pub mod collision;
pub mod config;
pub mod constants;
pub mod detail_texture;
pub mod entity;
pub mod error;
pub mod events;
pub mod objective;
pub mod raster;
pub mod render_bridge;
pub mod ship;
pub mod simulation;
pub mod spatial_partition;
pub mod spawner;
pub mod wrap;
