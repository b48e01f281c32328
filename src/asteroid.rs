//! Asteroids: procedural outline, speed tiers and split-on-impact.
//!
//! Each asteroid owns an immutable centre-relative outline generated once at
//! construction.  World-space points are produced on demand by rotating that
//! outline by the current `rotation_angle` and translating by the position.
//!
//! Shooting an asteroid consumes it via [`Asteroid::split`], which yields two
//! faster, smaller children until the minimum radius is reached.

use crate::constants::{
    ASTEROID_CULL_BUFFER, ASTEROID_FILL_ALPHA, ASTEROID_FINAL_ALPHA, ASTEROID_MAX_SPIN,
    ASTEROID_MID_ALPHA,
};
use crate::detail_texture::DetailTexture;
use crate::entity::{Body, FrameContext, Liveness, WorldEntity};
use crate::wrap::WorldBounds;
use bevy::prelude::*;
use rand::Rng;

// ── Outline generation ────────────────────────────────────────────────────────

/// Shape parameters for [`generate_polygon`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonParams {
    pub min_sides: usize,
    pub max_sides: usize,
    /// Fraction of the angular step each vertex may drift by.
    pub angle_jitter: f32,
    /// Fraction of the radius each vertex distance may drift by.
    pub radial_jitter: f32,
}

impl Default for PolygonParams {
    fn default() -> Self {
        Self {
            min_sides: 6,
            max_sides: 12,
            angle_jitter: 0.35,
            radial_jitter: 0.30,
        }
    }
}

/// Vertices never sit closer to the centre than this fraction of the radius.
pub const MIN_VERTEX_DISTANCE: f32 = 0.35;

/// Jittered vertex angles in degrees, sorted ascending.
///
/// The sort keeps the outline simple: without it neighbouring jitter can
/// swap two vertices and fold the polygon over itself.
fn jittered_angles(rng: &mut impl Rng, sides: usize, jitter: f32) -> Vec<f32> {
    let step = 360.0 / sides as f32;
    let reach = step * jitter;
    let mut angles: Vec<f32> = (0..sides)
        .map(|i| i as f32 * step + rng.gen_range(-reach..=reach))
        .collect();
    angles.sort_by(|a, b| a.total_cmp(b));
    angles
}

/// Build a random star-convex outline around the origin.
///
/// The first vertex direction is "up" (`-y`) and angles advance towards `+x`.
pub fn generate_polygon(rng: &mut impl Rng, radius: f32, params: &PolygonParams) -> Vec<Vec2> {
    debug_assert!(radius > 0.0, "radius must be positive");
    debug_assert!(params.min_sides >= 3 && params.min_sides <= params.max_sides);

    let sides = rng.gen_range(params.min_sides..=params.max_sides);
    let rj = params.radial_jitter;
    jittered_angles(rng, sides, params.angle_jitter)
        .into_iter()
        .map(|angle| {
            let dist = (radius * (1.0 + rng.gen_range(-rj..=rj))).max(MIN_VERTEX_DISTANCE * radius);
            Vec2::from_angle(angle.to_radians()).rotate(Vec2::new(0.0, -dist))
        })
        .collect()
}

// ── Speed tiers ───────────────────────────────────────────────────────────────

/// Speed bucket of an asteroid.  Drives both its fill colour and its score.
///
/// Boundaries are strict: a speed of exactly 350 is `Level4`, not `Level5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VelocityTier {
    Level0,
    Level1,
    Level2,
    Level3,
    Level4,
    Level5,
}

impl VelocityTier {
    pub const ALL: [VelocityTier; 6] = [
        Self::Level0,
        Self::Level1,
        Self::Level2,
        Self::Level3,
        Self::Level4,
        Self::Level5,
    ];

    /// Lower bound (exclusive) of tiers 1..=5.
    pub const THRESHOLDS: [f32; 5] = [60.0, 120.0, 200.0, 280.0, 350.0];

    pub fn from_speed(speed: f32) -> Self {
        let idx = Self::THRESHOLDS.iter().filter(|&&t| speed > t).count();
        Self::ALL[idx]
    }

    pub fn from_velocity(velocity: Vec2) -> Self {
        Self::from_speed(velocity.length())
    }

    /// 0 for the slowest tier, 5 for the fastest.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Opaque sRGB colour bytes of this tier.
    pub fn rgb(self) -> [u8; 3] {
        match self {
            Self::Level0 => [25, 38, 56],
            Self::Level1 => [64, 119, 142],
            Self::Level2 => [108, 66, 133],
            Self::Level3 => [196, 107, 44],
            Self::Level4 => [178, 40, 85],
            Self::Level5 => [0, 222, 173],
        }
    }

    pub fn color(self) -> Color {
        let [r, g, b] = self.rgb();
        Color::srgb_u8(r, g, b)
    }
}

/// Colour of a body moving at `velocity`.  A body at rest is drawn white.
pub fn velocity_tier_color(velocity: Vec2) -> Color {
    if velocity == Vec2::ZERO {
        Color::WHITE
    } else {
        VelocityTier::from_velocity(velocity).color()
    }
}

// ── Asteroid ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Asteroid {
    body: Body,
    world: WorldBounds,
    local_polygon: Vec<Vec2>,
    /// Degrees per second; positive spins counter-clockwise on screen.
    spin: f32,
    rotation_angle: f32,
    fill_alpha: u8,
    detail: DetailTexture,
}

impl Asteroid {
    /// Fresh first-generation asteroid with a random outline, spin and facing.
    pub fn new(
        rng: &mut impl Rng,
        position: Vec2,
        velocity: Vec2,
        radius: f32,
        world: WorldBounds,
    ) -> Self {
        Self::with_alpha(rng, position, velocity, radius, world, ASTEROID_FILL_ALPHA)
    }

    fn with_alpha(
        rng: &mut impl Rng,
        position: Vec2,
        velocity: Vec2,
        radius: f32,
        world: WorldBounds,
        fill_alpha: u8,
    ) -> Self {
        let local_polygon = generate_polygon(rng, radius, &PolygonParams::default());
        let detail = DetailTexture::bake(&local_polygon, radius, rng);
        Self {
            body: Body::new(position, velocity, radius),
            world,
            spin: rng.gen_range(-ASTEROID_MAX_SPIN..=ASTEROID_MAX_SPIN),
            rotation_angle: rng.gen_range(0.0..360.0),
            local_polygon,
            fill_alpha,
            detail,
        }
    }

    pub fn radius(&self) -> f32 {
        self.body.radius
    }

    pub fn velocity(&self) -> Vec2 {
        self.body.velocity
    }

    pub fn spin(&self) -> f32 {
        self.spin
    }

    pub fn fill_alpha(&self) -> u8 {
        self.fill_alpha
    }

    pub fn local_polygon(&self) -> &[Vec2] {
        &self.local_polygon
    }

    pub fn detail_texture(&self) -> &DetailTexture {
        &self.detail
    }

    pub fn tier(&self) -> VelocityTier {
        VelocityTier::from_velocity(self.body.velocity)
    }

    /// Tier colour with this asteroid's fill alpha applied.
    pub fn fill_color(&self) -> Color {
        velocity_tier_color(self.body.velocity).with_alpha(self.fill_alpha as f32 / 255.0)
    }

    /// Outline in world space at the current rotation.
    ///
    /// World space is `+y` down, so a counter-clockwise on-screen rotation is
    /// a negative mathematical rotation.
    pub fn polygon_in_world_space(&self) -> Vec<Vec2> {
        let rot = Vec2::from_angle(-self.rotation_angle.to_radians());
        self.local_polygon
            .iter()
            .map(|&p| self.body.position + rot.rotate(p))
            .collect()
    }

    /// Break this asteroid apart.  The parent is consumed either way.
    ///
    /// Terminal asteroids (`radius <= min_radius`) yield `None`.  Otherwise two
    /// children of radius `radius - min_radius` are placed at the parent's
    /// position, their velocities deflected by `±[20°, 50°]` and sped up.
    pub fn split(self, rng: &mut impl Rng, min_radius: f32) -> Option<[Asteroid; 2]> {
        if self.body.radius <= min_radius {
            return None;
        }
        let radius = self.body.radius - min_radius;
        let deflection = rng.gen_range(20.0f32..=50.0);
        let (speed_range, alpha) = if radius > min_radius {
            (1.2f32..=1.8, ASTEROID_MID_ALPHA)
        } else {
            (2.0f32..=2.5, ASTEROID_FINAL_ALPHA)
        };

        let mut child = |angle: f32| {
            let dir = Vec2::from_angle(angle.to_radians()).rotate(self.body.velocity);
            let velocity = dir * rng.gen_range(speed_range.clone());
            Asteroid::with_alpha(
                &mut *rng,
                self.body.position,
                velocity,
                radius,
                self.world,
                alpha,
            )
        };
        Some([child(deflection), child(-deflection)])
    }
}

impl WorldEntity for Asteroid {
    fn body(&self) -> &Body {
        &self.body
    }

    fn world(&self) -> WorldBounds {
        self.world
    }

    fn rotation(&self) -> f32 {
        self.rotation_angle
    }

    fn advance(&mut self, dt: f32, _ctx: &FrameContext) -> Liveness {
        self.body.integrate(dt);
        self.rotation_angle = (self.rotation_angle + self.spin * dt).rem_euclid(360.0);

        if self.world.wrap {
            self.body.position = self.world.confine(self.body.position);
            Liveness::Alive
        } else if self.world.is_outside(self.body.position, ASTEROID_CULL_BUFFER) {
            Liveness::Expired
        } else {
            Liveness::Alive
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const MIN_R: f32 = 20.0;

    fn world() -> WorldBounds {
        WorldBounds::new(400.0, 400.0, true)
    }

    fn ctx() -> FrameContext {
        FrameContext {
            camera: Rect::new(0.0, 0.0, 200.0, 200.0),
        }
    }

    fn signed_angle_deg(from: Vec2, to: Vec2) -> f32 {
        from.perp_dot(to).atan2(from.dot(to)).to_degrees()
    }

    #[test]
    fn drifts_across_the_seam() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut rock = Asteroid::new(
            &mut rng,
            Vec2::new(398.0, 200.0),
            Vec2::new(50.0, 0.0),
            20.0,
            world(),
        );
        assert_eq!(rock.advance(1.0, &ctx()), Liveness::Alive);
        assert_relative_eq!(rock.position().x, 48.0, epsilon = 1e-3);
        assert_relative_eq!(rock.position().y, 200.0);
    }

    #[test]
    fn walled_world_culls_far_outside() {
        let mut rng = StdRng::seed_from_u64(8);
        let walled = WorldBounds::new(400.0, 400.0, false);
        let mut rock = Asteroid::new(
            &mut rng,
            Vec2::new(390.0, 200.0),
            Vec2::new(100.0, 0.0),
            20.0,
            walled,
        );
        assert_eq!(rock.advance(1.0, &ctx()), Liveness::Alive);
        assert_eq!(rock.advance(1.0, &ctx()), Liveness::Expired);
    }

    #[test]
    fn tier_boundaries_use_the_lower_tier() {
        assert_eq!(VelocityTier::from_speed(350.0), VelocityTier::Level4);
        assert_eq!(VelocityTier::from_speed(350.1), VelocityTier::Level5);
        assert_eq!(VelocityTier::from_speed(280.0), VelocityTier::Level3);
        assert_eq!(VelocityTier::from_speed(200.0), VelocityTier::Level2);
        assert_eq!(VelocityTier::from_speed(120.0), VelocityTier::Level1);
        assert_eq!(VelocityTier::from_speed(60.0), VelocityTier::Level0);
        assert_eq!(VelocityTier::from_speed(0.0), VelocityTier::Level0);
    }

    #[test]
    fn tier_depends_only_on_speed() {
        let a = VelocityTier::from_velocity(Vec2::new(300.0, 0.0));
        let b = VelocityTier::from_velocity(Vec2::new(0.0, -300.0));
        assert_eq!(a, b);
        assert_eq!(a, VelocityTier::Level4);
    }

    #[test]
    fn every_tier_has_a_distinct_colour() {
        for (i, a) in VelocityTier::ALL.iter().enumerate() {
            assert_eq!(a.index(), i);
            for b in &VelocityTier::ALL[i + 1..] {
                assert_ne!(a.rgb(), b.rgb());
            }
        }
    }

    #[test]
    fn stationary_body_is_white() {
        assert_eq!(velocity_tier_color(Vec2::ZERO), Color::WHITE);
        assert_eq!(
            velocity_tier_color(Vec2::new(10.0, 0.0)),
            VelocityTier::Level0.color()
        );
    }

    #[test]
    fn terminal_asteroid_splits_into_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        let rock = Asteroid::new(&mut rng, Vec2::ZERO, Vec2::X * 50.0, MIN_R, world());
        assert!(rock.split(&mut rng, MIN_R).is_none());
    }

    #[test]
    fn last_split_gives_final_tier_children() {
        let mut rng = StdRng::seed_from_u64(2);
        let rock = Asteroid::new(&mut rng, Vec2::new(5.0, 6.0), Vec2::X * 50.0, 40.0, world());
        let [a, b] = rock.split(&mut rng, MIN_R).expect("40 > 20 must split");
        for child in [&a, &b] {
            assert_relative_eq!(child.radius(), 20.0);
            assert_eq!(child.fill_alpha(), ASTEROID_FINAL_ALPHA);
            assert_eq!(child.position(), Vec2::new(5.0, 6.0));
            assert_eq!(child.world(), world());
            let mult = child.velocity().length() / 50.0;
            assert!((2.0 - 1e-4..=2.5 + 1e-4).contains(&mult), "mult {mult}");
        }
    }

    #[test]
    fn middle_split_gives_mid_tier_children() {
        let mut rng = StdRng::seed_from_u64(3);
        let rock = Asteroid::new(&mut rng, Vec2::ZERO, Vec2::Y * 80.0, 60.0, world());
        let [a, b] = rock.split(&mut rng, MIN_R).expect("60 > 20 must split");
        for child in [&a, &b] {
            assert_relative_eq!(child.radius(), 40.0);
            assert_eq!(child.fill_alpha(), ASTEROID_MID_ALPHA);
            let mult = child.velocity().length() / 80.0;
            assert!((1.2 - 1e-4..=1.8 + 1e-4).contains(&mult), "mult {mult}");
        }
    }

    #[test]
    fn world_polygon_follows_rotation() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut rock = Asteroid::new(&mut rng, Vec2::new(100.0, 100.0), Vec2::ZERO, 30.0, world());
        rock.rotation_angle = 90.0;
        let local = rock.local_polygon()[0];
        let placed = rock.polygon_in_world_space()[0] - Vec2::new(100.0, 100.0);
        // A quarter turn counter-clockwise on screen maps +x to -y.
        assert_relative_eq!(placed.x, local.y, epsilon = 1e-3);
        assert_relative_eq!(placed.y, -local.x, epsilon = 1e-3);
    }

    #[test]
    fn outline_and_texture_survive_advance() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut rock = Asteroid::new(
            &mut rng,
            Vec2::new(50.0, 50.0),
            Vec2::X * 30.0,
            30.0,
            world(),
        );
        let outline = rock.local_polygon().to_vec();
        let texture = rock.detail_texture().clone();
        for _ in 0..10 {
            rock.advance(0.1, &ctx());
        }
        assert_eq!(rock.local_polygon(), outline.as_slice());
        assert_eq!(rock.detail_texture(), &texture);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn prop_outline_is_well_formed(seed in any::<u64>(), radius in 1.0f32..200.0) {
            let mut rng = StdRng::seed_from_u64(seed);
            let params = PolygonParams::default();
            let points = generate_polygon(&mut rng, radius, &params);
            prop_assert!(points.len() >= params.min_sides && points.len() <= params.max_sides);
            for p in &points {
                prop_assert!(p.length() >= MIN_VERTEX_DISTANCE * radius - 1e-3);
            }
            // Consecutive vertices always turn the same way around the centre,
            // so the outline is star-shaped and never folds over itself.
            for i in 0..points.len() {
                let a = points[i];
                let b = points[(i + 1) % points.len()];
                prop_assert!(a.perp_dot(b) > 0.0, "vertex {} folds back", i);
            }
        }

        #[test]
        fn prop_angles_are_sorted(seed in any::<u64>(), sides in 3usize..24) {
            let mut rng = StdRng::seed_from_u64(seed);
            let angles = jittered_angles(&mut rng, sides, 0.35);
            prop_assert_eq!(angles.len(), sides);
            prop_assert!(angles.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_split_deflects_both_ways(
            seed in any::<u64>(),
            generation in 2u32..=4,
            heading in 0.0f32..360.0,
            speed in 10.0f32..300.0,
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let radius = MIN_R * generation as f32;
            let velocity = Vec2::from_angle(heading.to_radians()) * speed;
            let rock = Asteroid::new(&mut rng, Vec2::new(10.0, 10.0), velocity, radius, world());
            let children = rock.split(&mut rng, MIN_R);
            prop_assert!(children.is_some());
            let [a, b] = children.unwrap();

            prop_assert!((a.radius() + b.radius() - 2.0 * (radius - MIN_R)).abs() < 1e-3);
            let ta = signed_angle_deg(velocity, a.velocity());
            let tb = signed_angle_deg(velocity, b.velocity());
            prop_assert!((20.0 - 1e-2..=50.0 + 1e-2).contains(&ta), "first child turned {}", ta);
            prop_assert!((-50.0 - 1e-2..=-20.0 + 1e-2).contains(&tb), "second child turned {}", tb);
        }
    }
}
