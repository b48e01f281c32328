//! Shared entity state and the capability trait every simulated object
//! implements.
//!
//! Concrete entities (`Ship`, `Projectile`, `Asteroid`, `Objective`) compose a
//! [`Body`] value rather than inheriting from a base type.  The simulation owns
//! one `Vec` per kind and drives each through [`WorldEntity`].

use crate::wrap::{bounding_rect, WorldBounds};
use bevy::prelude::*;

/// Position, velocity and collision radius.  Common to every entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
}

impl Body {
    pub fn new(position: Vec2, velocity: Vec2, radius: f32) -> Self {
        debug_assert!(radius >= 0.0, "radius must not be negative");
        debug_assert!(position.is_finite(), "position must be finite");
        debug_assert!(velocity.is_finite(), "velocity must be finite");
        Self {
            position,
            velocity,
            radius,
        }
    }

    /// Integrate velocity over `dt`.
    pub fn integrate(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }

    pub fn circle(&self) -> CollisionCircle {
        CollisionCircle {
            center: self.position,
            radius: self.radius,
        }
    }
}

/// A positioned circle: the collision shape of every entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionCircle {
    pub center: Vec2,
    pub radius: f32,
}

/// Per-tick read-only context handed to [`WorldEntity::advance`].
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    /// Camera viewport at the start of the tick.
    pub camera: Rect,
}

/// Outcome of advancing an entity by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Alive,
    /// Lifetime ran out or the entity left the world; remove it at sweep time.
    Expired,
}

/// One on-screen copy of an entity for the render collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawInstance {
    /// Centre of the entity in viewport-local coordinates.
    pub screen_position: Vec2,
    /// Counter-clockwise on-screen rotation in degrees.
    pub rotation: f32,
}

/// Capability set shared by every simulated object.
pub trait WorldEntity {
    fn body(&self) -> &Body;

    fn world(&self) -> WorldBounds;

    /// Step the entity's own state by `dt` seconds.
    fn advance(&mut self, dt: f32, ctx: &FrameContext) -> Liveness;

    /// Current on-screen rotation in degrees.
    fn rotation(&self) -> f32 {
        0.0
    }

    fn position(&self) -> Vec2 {
        self.body().position
    }

    fn bounding_circle(&self) -> CollisionCircle {
        self.body().circle()
    }

    /// Every viewport-local copy that should be drawn for `camera`.
    ///
    /// Usually one; up to four for an entity straddling world seams; none when
    /// the entity is off camera.
    fn draw_instances(&self, camera: Rect) -> Vec<DrawInstance> {
        let body = self.body();
        let bounds = bounding_rect(body.position, body.radius);
        self.world()
            .draw_offsets(bounds, camera)
            .into_iter()
            .map(|offset| DrawInstance {
                screen_position: body.position + offset - camera.min,
                rotation: self.rotation(),
            })
            .collect()
    }
}
