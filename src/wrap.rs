//! Torus math: wrapping, minimal displacement and seam-aware projection.
//!
//! The free functions here are pure and take the world size explicitly.
//! [`WorldBounds`] bundles the size with the wrap flag so entity code can ask
//! "confine this position" or "which images of this object are on camera"
//! without caring which mode the world is in.
//!
//! All rect overlap tests are strict (touching edges do not overlap), so an
//! object whose bounding box ends exactly on the camera edge is not drawn.

use bevy::prelude::*;

/// The nine translations an object can be drawn at: `{0, -W, +W} × {0, -H, +H}`.
fn seam_translations(world: Vec2) -> [Vec2; 9] {
    let xs = [0.0, -world.x, world.x];
    let ys = [0.0, -world.y, world.y];
    let mut out = [Vec2::ZERO; 9];
    for (i, &ox) in xs.iter().enumerate() {
        for (j, &oy) in ys.iter().enumerate() {
            out[i * 3 + j] = Vec2::new(ox, oy);
        }
    }
    out
}

/// Reduce `value` into `[0, period)`.
pub fn wrap_coord(value: f32, period: f32) -> f32 {
    debug_assert!(period > 0.0, "period must be positive");
    let r = value.rem_euclid(period);
    // rem_euclid can round up to `period` for tiny negative inputs
    if r >= period {
        0.0
    } else {
        r
    }
}

/// Reduce a position into `[0, W) × [0, H)`.
pub fn wrap_position(p: Vec2, world: Vec2) -> Vec2 {
    Vec2::new(wrap_coord(p.x, world.x), wrap_coord(p.y, world.y))
}

/// Minimal signed toroidal displacement from `b` to `a` along one axis.
///
/// The result lies in `(-period/2, period/2]`.  It is antisymmetric everywhere
/// except at exactly half a period, where both directions report `+period/2`.
pub fn delta(a: f32, b: f32, period: f32) -> f32 {
    let half = period * 0.5;
    let d = (a - b + half).rem_euclid(period) - half;
    if d <= -half {
        d + period
    } else {
        d.min(half)
    }
}

/// Per-axis [`delta`]: the shortest vector from `from` to `to` on the torus.
pub fn torus_delta(to: Vec2, from: Vec2, world: Vec2) -> Vec2 {
    Vec2::new(delta(to.x, from.x, world.x), delta(to.y, from.y, world.y))
}

/// Axis-aligned bounding box of a circle.
pub fn bounding_rect(center: Vec2, radius: f32) -> Rect {
    Rect::from_center_half_size(center, Vec2::splat(radius))
}

/// Strict overlap of two rects.
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    a.min.x < b.max.x && a.max.x > b.min.x && a.min.y < b.max.y && a.max.y > b.min.y
}

/// Every seam translation that makes `object` overlap `camera`.
///
/// Usually one offset; up to four when the object straddles a vertical and a
/// horizontal seam at once.  An empty result means the object is off camera.
pub fn wrap_offsets(object: Rect, camera: Rect, world: Vec2) -> Vec<Vec2> {
    seam_translations(world)
        .into_iter()
        .filter(|&offset| {
            let moved = Rect {
                min: object.min + offset,
                max: object.max + offset,
            };
            rects_overlap(moved, camera)
        })
        .collect()
}

/// Viewport-local positions of a world point, including seam mirrors.
///
/// The primary position is `(p - camera.min) mod (W, H)`.  When it lies within
/// `radius` of the wrap boundary on an axis, the mirrored position `∓W` / `∓H`
/// is emitted too so a sprite straddling the seam renders on both sides.
/// Returns 1–4 positions; callers should draw all of them.
pub fn screen_positions(p: Vec2, camera: Rect, world: Vec2, radius: f32) -> Vec<Vec2> {
    let local = wrap_position(p - camera.min, world);

    let mut xs = vec![local.x];
    if local.x > world.x - radius {
        xs.push(local.x - world.x);
    } else if local.x < radius {
        xs.push(local.x + world.x);
    }

    let mut ys = vec![local.y];
    if local.y > world.y - radius {
        ys.push(local.y - world.y);
    } else if local.y < radius {
        ys.push(local.y + world.y);
    }

    xs.iter()
        .flat_map(|&x| ys.iter().map(move |&y| Vec2::new(x, y)))
        .collect()
}

/// True iff some wrapped image of the circle at `p` touches the camera rect
/// inflated by `buffer` on every side.
pub fn is_visible_wrapped(p: Vec2, camera: Rect, world: Vec2, radius: f32, buffer: f32) -> bool {
    let view = Rect::from_corners(Vec2::ZERO, camera.size() + Vec2::splat(2.0 * buffer));
    screen_positions(p, camera, world, radius + buffer)
        .into_iter()
        .any(|s| rects_overlap(bounding_rect(s + Vec2::splat(buffer), radius), view))
}

// ── WorldBounds ───────────────────────────────────────────────────────────────

/// Size and topology of the world.  Immutable after construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
    /// `true`: rectangular torus.  `false`: hard walls, positions clamped.
    pub wrap: bool,
}

impl WorldBounds {
    pub fn new(width: f32, height: f32, wrap: bool) -> Self {
        debug_assert!(width > 0.0 && height > 0.0, "world must have positive size");
        Self {
            width,
            height,
            wrap,
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.size() * 0.5
    }

    /// Wrap (torus) or clamp (walled) a position into the world.
    pub fn confine(&self, p: Vec2) -> Vec2 {
        if self.wrap {
            wrap_position(p, self.size())
        } else {
            p.clamp(Vec2::ZERO, self.size())
        }
    }

    /// True when `p` is further than `buffer` outside the world rect.
    pub fn is_outside(&self, p: Vec2, buffer: f32) -> bool {
        p.x < -buffer || p.y < -buffer || p.x > self.width + buffer || p.y > self.height + buffer
    }

    /// Shortest vector from `from` to `to`, going across the seam when wrapping.
    pub fn displacement(&self, to: Vec2, from: Vec2) -> Vec2 {
        if self.wrap {
            torus_delta(to, from, self.size())
        } else {
            to - from
        }
    }

    /// Seam offsets at which `object` is visible in `camera`.
    ///
    /// Walled worlds only ever draw the object at its own position.
    pub fn draw_offsets(&self, object: Rect, camera: Rect) -> Vec<Vec2> {
        if self.wrap {
            wrap_offsets(object, camera, self.size())
        } else if rects_overlap(object, camera) {
            vec![Vec2::ZERO]
        } else {
            Vec::new()
        }
    }

    /// Whether the circle at `p` is within `buffer` of the camera view.
    pub fn is_visible(&self, p: Vec2, radius: f32, camera: Rect, buffer: f32) -> bool {
        if self.wrap {
            is_visible_wrapped(p, camera, self.size(), radius, buffer)
        } else {
            rects_overlap(bounding_rect(p, radius), camera.inflate(buffer))
        }
    }
}
