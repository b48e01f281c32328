//! Wrap-aware circle collision.
//!
//! Two circles collide when the distance between their nearest torus images
//! is at most the sum of their radii.  Raw Euclidean distance would miss
//! bodies sitting either side of a seam.

use crate::asteroid::Asteroid;
use crate::entity::{CollisionCircle, WorldEntity};
use crate::ship::Projectile;
use crate::spatial_partition::SpatialGrid;
use crate::wrap::WorldBounds;

/// Circles that exactly touch count as colliding.
pub fn circles_overlap(a: CollisionCircle, b: CollisionCircle, world: WorldBounds) -> bool {
    let d = world.displacement(a.center, b.center);
    let reach = a.radius + b.radius;
    d.length_squared() <= reach * reach
}

/// [`circles_overlap`] on two entities' bounding circles, in `a`'s world.
pub fn collides(a: &impl WorldEntity, b: &impl WorldEntity) -> bool {
    circles_overlap(a.bounding_circle(), b.bounding_circle(), a.world())
}

/// A projectile that struck an asteroid this pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub projectile: usize,
    pub asteroid: usize,
}

/// Lowest-index asteroid overlapping `circle`, skipping any marked in `taken`.
///
/// `grid` must have been rebuilt from `asteroids` in order.
pub fn first_asteroid_hit(
    circle: CollisionCircle,
    asteroids: &[Asteroid],
    grid: &SpatialGrid,
    world: WorldBounds,
    taken: &[bool],
) -> Option<usize> {
    let max_radius = asteroids.iter().map(Asteroid::radius).fold(0.0, f32::max);
    let mut candidates = grid.query(circle.center, circle.radius + max_radius);
    candidates.sort_unstable();
    candidates.into_iter().find(|&i| {
        !taken.get(i).copied().unwrap_or(false)
            && circles_overlap(circle, asteroids[i].bounding_circle(), world)
    })
}

/// Pair projectiles with asteroids they hit.
///
/// Each projectile destroys at most one asteroid and each asteroid is
/// destroyed by at most one projectile; projectiles are resolved in order.
pub fn projectile_hits(
    projectiles: &[Projectile],
    asteroids: &[Asteroid],
    grid: &SpatialGrid,
    world: WorldBounds,
) -> Vec<Hit> {
    let mut taken = vec![false; asteroids.len()];
    let mut hits = Vec::new();
    for (p, shot) in projectiles.iter().enumerate() {
        if let Some(a) =
            first_asteroid_hit(shot.bounding_circle(), asteroids, grid, world, &taken)
        {
            taken[a] = true;
            hits.push(Hit {
                projectile: p,
                asteroid: a,
            });
        }
    }
    hits
}
