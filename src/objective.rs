//! Collectible objectives.
//!
//! A star sits still in the world and slowly fades while the camera can see
//! it, so the player has to go and grab it rather than leave it parked on
//! screen.  It expires once its alpha drops below zero.

use crate::config::GameConfig;
use crate::constants::OBJECTIVE_FILL_ALPHA;
use crate::entity::{Body, FrameContext, Liveness, WorldEntity};
use crate::wrap::WorldBounds;
use bevy::prelude::*;
use rand::Rng;

/// What was collected.  Reported to the scoring collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectiveKind {
    Star,
}

const STAR_POINTS: usize = 5;
const STAR_INNER_RATIO: f32 = 0.5;

/// Centre-relative star outline: `points` tips alternating with inner
/// vertices, the first tip pointing up (`-y`).
pub fn star_polygon(radius: f32, points: usize, inner_ratio: f32) -> Vec<Vec2> {
    let step = std::f32::consts::PI / points as f32;
    (0..points * 2)
        .map(|i| {
            let r = if i % 2 == 0 {
                radius
            } else {
                radius * inner_ratio
            };
            Vec2::from_angle(i as f32 * step).rotate(Vec2::new(0.0, -r))
        })
        .collect()
}

/// Uniform pick in `[lo, hi]` shrunk by the first inset that leaves room.
fn pick_inset(rng: &mut impl Rng, lo: f32, hi: f32, insets: [f32; 2]) -> f32 {
    insets
        .into_iter()
        .find(|&inset| lo + inset < hi - inset)
        .map(|inset| rng.gen_range(lo + inset..hi - inset))
        .unwrap_or((lo + hi) * 0.5)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectiveParams {
    pub radius: f32,
    /// Alpha lost per second while on camera.
    pub fade_rate: f32,
}

impl ObjectiveParams {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            radius: config.objective_radius,
            fade_rate: config.objective_fade_rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    body: Body,
    world: WorldBounds,
    kind: ObjectiveKind,
    fill_alpha: f32,
    fade_rate: f32,
    local_polygon: Vec<Vec2>,
}

impl Objective {
    pub fn new(position: Vec2, world: WorldBounds, params: ObjectiveParams) -> Self {
        Self {
            body: Body::new(world.confine(position), Vec2::ZERO, params.radius),
            world,
            kind: ObjectiveKind::Star,
            fill_alpha: OBJECTIVE_FILL_ALPHA,
            fade_rate: params.fade_rate,
            local_polygon: star_polygon(params.radius, STAR_POINTS, STAR_INNER_RATIO),
        }
    }

    /// Anywhere in the world.
    pub fn spawn_random(rng: &mut impl Rng, world: WorldBounds, params: ObjectiveParams) -> Self {
        let position = Vec2::new(
            rng.gen_range(0.0..world.width),
            rng.gen_range(0.0..world.height),
        );
        Self::new(position, world, params)
    }

    /// Somewhere inside `camera`, kept `margin` plus one radius from its edges.
    ///
    /// If the margin leaves no room the inset falls back to one radius, and
    /// failing that to the camera centre.
    pub fn spawn_in_view(
        rng: &mut impl Rng,
        camera: Rect,
        margin: f32,
        world: WorldBounds,
        params: ObjectiveParams,
    ) -> Self {
        let insets = [margin + params.radius, params.radius];
        let x = pick_inset(rng, camera.min.x, camera.max.x, insets);
        let y = pick_inset(rng, camera.min.y, camera.max.y, insets);
        Self::new(Vec2::new(x, y), world, params)
    }

    pub fn kind(&self) -> ObjectiveKind {
        self.kind
    }

    pub fn fill_alpha(&self) -> f32 {
        self.fill_alpha
    }

    pub fn local_polygon(&self) -> &[Vec2] {
        &self.local_polygon
    }

    pub fn polygon_in_world_space(&self) -> Vec<Vec2> {
        self.local_polygon
            .iter()
            .map(|&p| self.body.position + p)
            .collect()
    }
}

impl WorldEntity for Objective {
    fn body(&self) -> &Body {
        &self.body
    }

    fn world(&self) -> WorldBounds {
        self.world
    }

    fn advance(&mut self, dt: f32, ctx: &FrameContext) -> Liveness {
        if self
            .world
            .is_visible(self.body.position, self.body.radius, ctx.camera, 0.0)
        {
            self.fill_alpha -= self.fade_rate * dt;
        }
        if self.fill_alpha < 0.0 {
            Liveness::Expired
        } else {
            Liveness::Alive
        }
    }
}
