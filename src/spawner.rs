//! Periodic asteroid spawner.
//!
//! Every `spawn_rate` seconds one asteroid appears just beyond a random edge
//! of the camera viewport and drifts inward, so new rocks always arrive from
//! off screen regardless of where the player is on the torus.

use crate::asteroid::Asteroid;
use crate::config::GameConfig;
use crate::wrap::WorldBounds;
use bevy::prelude::*;
use rand::Rng;
use std::ops::RangeInclusive;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnParams {
    pub min_radius: f32,
    pub max_radius: f32,
    pub kinds: u32,
    /// Seconds between spawns.
    pub spawn_rate: f32,
    pub speed_min: u32,
    pub speed_max: u32,
    /// Heading spread in whole degrees either side of the inward normal.
    pub spread_deg: i32,
}

impl SpawnParams {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            min_radius: config.asteroid_min_radius,
            max_radius: config.asteroid_max_radius,
            kinds: config.asteroid_kinds,
            spawn_rate: config.asteroid_spawn_rate,
            speed_min: config.asteroid_spawn_speed_min,
            speed_max: config.asteroid_spawn_speed_max,
            spread_deg: config.asteroid_spawn_spread_deg,
        }
    }
}

/// Speed multiplier applied to a freshly spawned asteroid of `radius`.
///
/// Small rocks are fast, mid-sized ones a bit faster than base, and the
/// largest ones slower than base.
pub fn size_speed_multiplier(radius: f32, min_radius: f32, max_radius: f32) -> RangeInclusive<f32> {
    if radius <= min_radius {
        2.0..=2.5
    } else if radius < max_radius {
        1.2..=1.8
    } else {
        0.6..=1.0
    }
}

/// One side of the viewport an asteroid can enter from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];

    /// Unit vector pointing from this edge into the view.
    fn inward(self) -> Vec2 {
        match self {
            Edge::Left => Vec2::X,
            Edge::Right => Vec2::NEG_X,
            Edge::Top => Vec2::Y,
            Edge::Bottom => Vec2::NEG_Y,
        }
    }

    /// Point `offset` outside this edge of `view`, at fraction `t` along it.
    fn point(self, view: Rect, t: f32, offset: f32) -> Vec2 {
        match self {
            Edge::Left => Vec2::new(view.min.x - offset, view.min.y + t * view.height()),
            Edge::Right => Vec2::new(view.max.x + offset, view.min.y + t * view.height()),
            Edge::Top => Vec2::new(view.min.x + t * view.width(), view.min.y - offset),
            Edge::Bottom => Vec2::new(view.min.x + t * view.width(), view.max.y + offset),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AsteroidField {
    timer: f32,
    params: SpawnParams,
}

impl AsteroidField {
    pub fn new(params: SpawnParams) -> Self {
        Self { timer: 0.0, params }
    }

    pub fn params(&self) -> &SpawnParams {
        &self.params
    }

    /// Seconds accumulated since the last spawn.
    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn reset(&mut self) {
        self.timer = 0.0;
    }

    /// Accumulate `dt`; once the spawn interval is exceeded, reset and spawn.
    pub fn tick(
        &mut self,
        dt: f32,
        rng: &mut impl Rng,
        camera: Rect,
        world: WorldBounds,
    ) -> Option<Asteroid> {
        self.timer += dt;
        if self.timer <= self.params.spawn_rate {
            return None;
        }
        self.timer = 0.0;
        Some(self.spawn(rng, camera, world))
    }

    /// Spawn one asteroid just outside a random edge of `camera`.
    pub fn spawn(&self, rng: &mut impl Rng, camera: Rect, world: WorldBounds) -> Asteroid {
        let p = &self.params;
        let edge = Edge::ALL[rng.gen_range(0..Edge::ALL.len())];
        let position = world.confine(edge.point(camera, rng.gen::<f32>(), p.max_radius));

        let speed = rng.gen_range(p.speed_min..=p.speed_max) as f32;
        let turn = rng.gen_range(-p.spread_deg..=p.spread_deg) as f32;
        let heading = Vec2::from_angle(turn.to_radians()).rotate(edge.inward());

        let kind = rng.gen_range(1..=p.kinds);
        let radius = p.min_radius * kind as f32;
        let scale = rng.gen_range(size_speed_multiplier(radius, p.min_radius, p.max_radius));

        debug!("spawning r={radius} asteroid from {edge:?} edge");
        Asteroid::new(rng, position, heading * speed * scale, radius, world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::WorldEntity;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn field() -> AsteroidField {
        AsteroidField::new(SpawnParams::from_config(&GameConfig::default()))
    }

    fn big_world() -> WorldBounds {
        WorldBounds::new(10_000.0, 10_000.0, true)
    }

    #[test]
    fn waits_for_the_interval_then_resets() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut field = field();
        let camera = Rect::new(1000.0, 1000.0, 2280.0, 1720.0);
        assert!(field.tick(0.5, &mut rng, camera, big_world()).is_none());
        assert!(field.tick(0.2, &mut rng, camera, big_world()).is_none());
        assert!(field.tick(0.2, &mut rng, camera, big_world()).is_some());
        assert_eq!(field.timer(), 0.0);
        assert!(field.tick(0.1, &mut rng, camera, big_world()).is_none());
    }

    #[test]
    fn spawns_just_outside_the_view_heading_inward() {
        let mut rng = StdRng::seed_from_u64(2);
        let field = field();
        let camera = Rect::new(1000.0, 1000.0, 2280.0, 1720.0);
        let offset = field.params().max_radius;
        let ring = camera.inflate(offset);
        for _ in 0..40 {
            let rock = field.spawn(&mut rng, camera, big_world());
            let p = rock.position();
            let on_ring = (p.x - ring.min.x).abs() < 1e-3
                || (p.x - ring.max.x).abs() < 1e-3
                || (p.y - ring.min.y).abs() < 1e-3
                || (p.y - ring.max.y).abs() < 1e-3;
            assert!(on_ring, "{p} is not on the spawn ring");
            assert!(!camera.contains(p));
            // Within 30° of the inward normal means it closes on the view.
            let to_view = camera.center() - p;
            assert!(rock.velocity().dot(to_view) > 0.0);
        }
    }

    #[test]
    fn radius_is_a_whole_number_of_generations() {
        let mut rng = StdRng::seed_from_u64(3);
        let field = field();
        let camera = Rect::new(0.0, 0.0, 1280.0, 720.0);
        for _ in 0..30 {
            let rock = field.spawn(&mut rng, camera, big_world());
            let kinds = rock.radius() / field.params().min_radius;
            assert!([1.0, 2.0, 3.0].contains(&kinds), "radius {}", rock.radius());
            let p = rock.position();
            assert!(p.x >= 0.0 && p.x < 10_000.0 && p.y >= 0.0 && p.y < 10_000.0);
        }
    }

    #[test]
    fn speed_stays_inside_scaled_range() {
        let mut rng = StdRng::seed_from_u64(4);
        let field = field();
        let camera = Rect::new(500.0, 500.0, 1780.0, 1220.0);
        let p = *field.params();
        for _ in 0..30 {
            let rock = field.spawn(&mut rng, camera, big_world());
            let range = size_speed_multiplier(rock.radius(), p.min_radius, p.max_radius);
            let speed = rock.velocity().length();
            let lo = p.speed_min as f32 * range.start() - 1e-2;
            let hi = p.speed_max as f32 * range.end() + 1e-2;
            assert!((lo..=hi).contains(&speed), "speed {speed} outside {lo}..{hi}");
        }
    }

    #[test]
    fn multiplier_bands() {
        assert_eq!(size_speed_multiplier(20.0, 20.0, 60.0), 2.0..=2.5);
        assert_eq!(size_speed_multiplier(40.0, 20.0, 60.0), 1.2..=1.8);
        assert_eq!(size_speed_multiplier(60.0, 20.0, 60.0), 0.6..=1.0);
    }
}
