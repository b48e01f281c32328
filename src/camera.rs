//! Deadzone-follow camera over the world.
//!
//! The camera is a fixed-size viewport rect.  It only moves when the tracked
//! target leaves the deadzone box, and then by exactly the excess, so the
//! target ends up sitting on the deadzone edge rather than being snapped back
//! to the centre.  In wrap mode the target is first replaced by its nearest
//! torus image, so the camera never scrolls the long way round.

use crate::wrap::{delta, wrap_coord, WorldBounds};
use bevy::prelude::*;

/// Viewport over the world plus deadzone settings.
///
/// Invariant: in wrap mode `viewport.min` is always inside `[0, W) × [0, H)`;
/// in clamp mode the whole viewport stays inside the world (or pinned at the
/// origin when the world is smaller than the view).
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameCamera {
    viewport: Rect,
    world: WorldBounds,
    margin: Vec2,
}

impl GameCamera {
    /// Camera at the world origin with no deadzone (every move pushes).
    pub fn new(view_size: Vec2, world: WorldBounds) -> Self {
        debug_assert!(view_size.x > 0.0 && view_size.y > 0.0);
        let mut camera = Self {
            viewport: Rect::from_corners(Vec2::ZERO, view_size),
            world,
            margin: Vec2::ZERO,
        };
        camera.normalize();
        camera
    }

    /// Builder form of [`Self::set_deadzone`].
    pub fn with_deadzone(mut self, margin_x: f32, margin_y: f32) -> Self {
        self.set_deadzone(margin_x, margin_y);
        self
    }

    /// Set the inset of the deadzone box from each viewport edge.
    ///
    /// Margins larger than half the viewport would invert the box; they are
    /// clamped to half the viewport, which collapses the deadzone to a line
    /// through the centre (the camera then follows the target exactly).
    pub fn set_deadzone(&mut self, margin_x: f32, margin_y: f32) {
        let half = self.viewport.half_size();
        self.margin = Vec2::new(margin_x.clamp(0.0, half.x), margin_y.clamp(0.0, half.y));
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn origin(&self) -> Vec2 {
        self.viewport.min
    }

    pub fn center(&self) -> Vec2 {
        self.viewport.center()
    }

    pub fn margin(&self) -> Vec2 {
        self.margin
    }

    pub fn world(&self) -> WorldBounds {
        self.world
    }

    /// Deadzone box in the camera's current (unwrapped) frame.
    pub fn deadzone(&self) -> Rect {
        Rect {
            min: self.viewport.min + self.margin,
            max: self.viewport.max - self.margin,
        }
    }

    /// Translate the viewport, then re-normalize.
    pub fn translate(&mut self, by: Vec2) {
        self.viewport.min += by;
        self.viewport.max += by;
        self.normalize();
    }

    /// Put the viewport centre at `(x, y)`.  Used on spawn and reset.
    pub fn center_on(&mut self, x: f32, y: f32) {
        let half = self.viewport.half_size();
        self.viewport = Rect::from_center_half_size(Vec2::new(x, y), half);
        self.normalize();
    }

    /// Soft-follow `target` with the rectangular deadzone.
    ///
    /// Moves the viewport by the signed distance the target sits outside the
    /// deadzone on each axis.  A target inside the box leaves the camera alone.
    pub fn push_follow(&mut self, target_x: f32, target_y: f32) {
        let mut target = Vec2::new(target_x, target_y);
        if self.world.wrap {
            let c = self.viewport.center();
            target.x = c.x + delta(target.x, c.x, self.world.width);
            target.y = c.y + delta(target.y, c.y, self.world.height);
        }

        let zone = self.deadzone();
        let excess = Vec2::new(
            excess_outside(target.x, zone.min.x, zone.max.x),
            excess_outside(target.y, zone.min.y, zone.max.y),
        );

        if excess != Vec2::ZERO {
            self.translate(excess);
        }
    }

    /// Keep the origin small (wrap) or inside the world (clamp).
    fn normalize(&mut self) {
        let size = self.viewport.size();
        let origin = if self.world.wrap {
            Vec2::new(
                wrap_coord(self.viewport.min.x, self.world.width),
                wrap_coord(self.viewport.min.y, self.world.height),
            )
        } else {
            let max = (self.world.size() - size).max(Vec2::ZERO);
            self.viewport.min.clamp(Vec2::ZERO, max)
        };
        self.viewport = Rect {
            min: origin,
            max: origin + size,
        };
    }
}

/// Signed distance of `v` outside `[lo, hi]`; zero inside.
fn excess_outside(v: f32, lo: f32, hi: f32) -> f32 {
    if v < lo {
        v - lo
    } else if v > hi {
        v - hi
    } else {
        0.0
    }
}
