//! Player ship, its controls and the projectiles it fires.
//!
//! The ship has no inertia: thrust translates it directly along its heading
//! while the input is held.  A heading of 0° points along `+y` (down the
//! screen) and increasing the heading turns the nose clockwise on screen.

use crate::config::GameConfig;
use crate::constants::{PROJECTILE_CULL_GRACE, SHIP_MAX_HELD_INPUTS};
use crate::entity::{Body, FrameContext, Liveness, WorldEntity};
use crate::wrap::WorldBounds;
use bevy::prelude::*;

/// Held input state for one tick, supplied by the input collaborator.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShipControls {
    pub turn_left: bool,
    pub turn_right: bool,
    pub thrust_forward: bool,
    pub thrust_back: bool,
    pub fire: bool,
}

impl ShipControls {
    /// Number of inputs held this tick.
    pub fn held_count(&self) -> usize {
        [
            self.turn_left,
            self.turn_right,
            self.thrust_forward,
            self.thrust_back,
            self.fire,
        ]
        .into_iter()
        .filter(|&held| held)
        .count()
    }
}

/// Ship and projectile tunables, copied out of [`GameConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipParams {
    pub radius: f32,
    /// Degrees per second.
    pub turn_speed: f32,
    pub move_speed: f32,
    pub shot_speed: f32,
    pub shot_cooldown: f32,
    pub projectile_radius: f32,
    pub projectile_max_lifetime: f32,
    pub projectile_cull_buffer: f32,
}

impl ShipParams {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            radius: config.ship_radius,
            turn_speed: config.ship_turn_speed,
            move_speed: config.ship_move_speed,
            shot_speed: config.ship_shot_speed,
            shot_cooldown: config.ship_shot_cooldown,
            projectile_radius: config.projectile_radius,
            projectile_max_lifetime: config.projectile_max_lifetime,
            projectile_cull_buffer: config.projectile_cull_buffer,
        }
    }
}

impl Default for ShipParams {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

// ── Ship ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Ship {
    body: Body,
    world: WorldBounds,
    heading: f32,
    cooldown_timer: f32,
    params: ShipParams,
}

impl Ship {
    pub fn new(position: Vec2, world: WorldBounds, params: ShipParams) -> Self {
        Self {
            body: Body::new(world.confine(position), Vec2::ZERO, params.radius),
            world,
            heading: 0.0,
            cooldown_timer: 0.0,
            params,
        }
    }

    /// Heading in degrees, kept in `[0, 360)`.
    pub fn heading(&self) -> f32 {
        self.heading
    }

    /// Seconds until the next shot is allowed.
    pub fn cooldown(&self) -> f32 {
        self.cooldown_timer
    }

    /// Unit vector the nose points along.
    pub fn forward(&self) -> Vec2 {
        Vec2::from_angle(self.heading.to_radians()).rotate(Vec2::Y)
    }

    /// Turn by `turn_speed * dt` degrees.  Negative `dt` turns the other way.
    pub fn rotate(&mut self, dt: f32) {
        self.heading = (self.heading + self.params.turn_speed * dt).rem_euclid(360.0);
    }

    /// Move along the heading by `move_speed * dt`.  Negative `dt` reverses.
    pub fn thrust(&mut self, dt: f32) {
        let step = self.forward() * self.params.move_speed * dt;
        self.body.position = self.world.confine(self.body.position + step);
    }

    /// Fire a projectile from the ship's position if the cooldown has elapsed.
    pub fn try_fire(&mut self) -> Option<Projectile> {
        if self.cooldown_timer > 0.0 {
            return None;
        }
        self.cooldown_timer = self.params.shot_cooldown;
        Some(Projectile::new(
            self.body.position,
            self.forward() * self.params.shot_speed,
            self.world,
            &self.params,
        ))
    }

    /// Apply one tick of held input.  Returns the projectile fired, if any.
    ///
    /// Holding more than three inputs at once suppresses firing for the tick.
    pub fn apply_controls(&mut self, controls: &ShipControls, dt: f32) -> Option<Projectile> {
        if controls.turn_left {
            self.rotate(-dt);
        }
        if controls.turn_right {
            self.rotate(dt);
        }
        if controls.thrust_forward {
            self.thrust(dt);
        }
        if controls.thrust_back {
            self.thrust(-dt);
        }
        if controls.fire && controls.held_count() <= SHIP_MAX_HELD_INPUTS {
            self.try_fire()
        } else {
            None
        }
    }
}

impl WorldEntity for Ship {
    fn body(&self) -> &Body {
        &self.body
    }

    fn world(&self) -> WorldBounds {
        self.world
    }

    /// The heading turns clockwise on screen, so the drawn rotation is its
    /// negation.
    fn rotation(&self) -> f32 {
        -self.heading
    }

    fn advance(&mut self, dt: f32, _ctx: &FrameContext) -> Liveness {
        self.cooldown_timer = (self.cooldown_timer - dt).max(0.0);
        self.body.integrate(dt);
        self.body.position = self.world.confine(self.body.position);
        Liveness::Alive
    }
}

// ── Projectile ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    body: Body,
    world: WorldBounds,
    age: f32,
    max_lifetime: f32,
    cull_buffer: f32,
}

impl Projectile {
    pub fn new(position: Vec2, velocity: Vec2, world: WorldBounds, params: &ShipParams) -> Self {
        Self {
            body: Body::new(position, velocity, params.projectile_radius),
            world,
            age: 0.0,
            max_lifetime: params.projectile_max_lifetime,
            cull_buffer: params.projectile_cull_buffer,
        }
    }

    /// Seconds since the projectile was fired.
    pub fn age(&self) -> f32 {
        self.age
    }
}

impl WorldEntity for Projectile {
    fn body(&self) -> &Body {
        &self.body
    }

    fn world(&self) -> WorldBounds {
        self.world
    }

    fn advance(&mut self, dt: f32, ctx: &FrameContext) -> Liveness {
        self.age += dt;
        self.body.integrate(dt);

        if self.world.wrap {
            self.body.position = self.world.confine(self.body.position);
        } else if self.world.is_outside(self.body.position, self.cull_buffer) {
            return Liveness::Expired;
        }

        if self.age > self.max_lifetime {
            return Liveness::Expired;
        }
        let visible = self.world.is_visible(
            self.body.position,
            self.body.radius,
            ctx.camera,
            self.cull_buffer,
        );
        if self.age > PROJECTILE_CULL_GRACE && !visible {
            return Liveness::Expired;
        }
        Liveness::Alive
    }
}
