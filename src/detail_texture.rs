//! Procedural surface detail baked once per asteroid.
//!
//! The overlay is a transparent RGBA image the size of the asteroid's
//! bounding circle (plus a 4 px border).  It is composited over the flat
//! tier-coloured polygon at draw time and rotated with the asteroid, so it is
//! built exactly once at construction and never regenerated.
//!
//! Layers, in compositing order:
//! 1. silhouette mask (used only for clipping and sampling),
//! 2. seven inset "strata" rings,
//! 3. spokes from every third vertex plus tiny highlights,
//! 4. edge lighting from a fixed light direction,
//! 5. craters (clipped to the silhouette),
//! 6. speckle grain (clipped to the silhouette).

use crate::raster::{
    alpha_at, clip_to_mask, composite_over, draw_line, fill_circle, fill_polygon, stroke_circle,
    stroke_polygon,
};
use bevy::prelude::*;
use image::{Rgba, RgbaImage};
use rand::Rng;

// ── Tuning ────────────────────────────────────────────────────────────────────

const RING_LAYERS: usize = 7;
const RING_STEP: f32 = 0.09;
const RING_JITTER: f32 = 0.008;
const RING_ALPHA: u8 = 14;

const SPOKE_EVERY: usize = 3;
const SPOKE_WIDTH: f32 = 4.0;
const SPOKE_START_SCALE: f32 = 0.98;
const SPOKE_HIGHLIGHT_ALPHA: u8 = 12;
const SPOKE_HIGHLIGHT_LEN: f32 = 0.6;

const EDGE_INSET_SCALE: f32 = 0.96;
const EDGE_WIDTH: f32 = 3.0;
const EDGE_FACING_THRESHOLD: f32 = 0.12;
const EDGE_HIGHLIGHT_MAX_ALPHA: f32 = 50.0;
const EDGE_SHADOW_MAX_ALPHA: f32 = 26.0;

const CRATER_DENSITY: f32 = 0.05;
const CRATER_MIN_SCALE: f32 = 0.08;
const CRATER_MAX_SCALE: f32 = 0.40;
const CRATER_EDGE_INSET: f32 = 0.88;
const CRATER_TRIES: usize = 20;
const CRATER_JAGGEDNESS: f32 = 0.35;
const CRATER_OUTLINE_POINTS: usize = 10;
const CRATER_BASE_ALPHA: u8 = 30;
const CRATER_SHADOW_ALPHA: u8 = 35;
const CRATER_DARK_RIM_ALPHA: u8 = 50;
const CRATER_LIGHT_RIM_ALPHA: u8 = 40;

const SPECK_COUNT: usize = 1000;
const SPECK_LIGHT_CHANCE: f64 = 0.45;
const SPECK_LIGHT_ALPHA: u8 = 26;
const SPECK_DARK_ALPHA: u8 = 30;
const SPECK_RADIUS_MIN: u32 = 1;
const SPECK_RADIUS_MAX: u32 = 5;

/// Direction the (imaginary) light comes from, in image space.
pub fn light_dir() -> Vec2 {
    Vec2::new(1.0, -0.35).normalize()
}

const OPAQUE_WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Cached detail overlay for one asteroid.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailTexture {
    image: RgbaImage,
}

impl DetailTexture {
    /// Bake the overlay for a centre-relative polygon of the given radius.
    ///
    /// Polygons with fewer than three vertices produce a blank overlay.
    pub fn bake(polygon: &[Vec2], radius: f32, rng: &mut impl Rng) -> Self {
        debug_assert!(radius >= 0.0, "radius must not be negative");
        let diameter = (radius * 2.0) as u32 + 4;
        let mut image = RgbaImage::new(diameter, diameter);
        if polygon.len() < 3 {
            return Self { image };
        }

        let center = Vec2::splat((diameter / 2) as f32);
        let outline: Vec<Vec2> = polygon.iter().map(|&p| center + p).collect();

        let mut mask = RgbaImage::new(diameter, diameter);
        fill_polygon(&mut mask, &outline, OPAQUE_WHITE);

        let innermost = paint_rings(&mut image, &outline, center, rng);
        paint_spokes(&mut image, &outline, &innermost, center);
        paint_edge_lighting(&mut image, &outline, center);
        paint_craters(&mut image, &mask, center, radius, rng);
        paint_specks(&mut image, &mask, center, radius, rng);

        Self { image }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Side length of the square overlay in pixels.
    pub fn diameter(&self) -> u32 {
        self.image.width()
    }
}

fn inset(points: &[Vec2], center: Vec2, scale: f32) -> Vec<Vec2> {
    points
        .iter()
        .map(|&q| center + (q - center) * scale)
        .collect()
}

/// Concentric bands alternating flat grey and a dark→light gradient.
/// Returns the innermost ring so spokes can end on it.
fn paint_rings(
    image: &mut RgbaImage,
    outline: &[Vec2],
    center: Vec2,
    rng: &mut impl Rng,
) -> Vec<Vec2> {
    let mut innermost = outline.to_vec();
    for i in 1..=RING_LAYERS {
        let scale = 1.0 - RING_STEP * i as f32 + rng.gen_range(-RING_JITTER..=RING_JITTER);
        let ring = inset(outline, center, scale);
        let color = if i % 2 == 1 {
            Rgba([128, 128, 128, RING_ALPHA])
        } else {
            let t = (i - 2) as f32 / (RING_LAYERS - 2) as f32;
            let v = (255.0 * t) as u8;
            Rgba([v, v, v, RING_ALPHA])
        };
        fill_polygon(image, &ring, color);
        innermost = ring;
    }
    innermost
}

fn paint_spokes(image: &mut RgbaImage, outline: &[Vec2], innermost: &[Vec2], center: Vec2) {
    let grey = Rgba([128, 128, 128, RING_ALPHA]);
    let highlight = Rgba([255, 255, 255, SPOKE_HIGHLIGHT_ALPHA]);
    let light = light_dir();

    for (i, (&outer, &inner)) in outline.iter().zip(innermost).enumerate() {
        let start = center + (outer - center) * SPOKE_START_SCALE;
        if i % SPOKE_EVERY == 0 {
            draw_line(image, start, inner, SPOKE_WIDTH, grey);
        }
        let mid = start.lerp(inner, 0.5);
        draw_line(
            image,
            mid,
            mid + light * SPOKE_HIGHLIGHT_LEN,
            1.0,
            highlight,
        );
    }
}

/// Thin bright lines on edges facing the light, dark lines on edges facing
/// away.  Edges nearly parallel to the light are left alone.
fn paint_edge_lighting(image: &mut RgbaImage, outline: &[Vec2], center: Vec2) {
    let light = light_dir();
    let n = outline.len();
    // Shoelace sign tells us which perpendicular points outward.
    let winding: f32 = (0..n)
        .map(|i| outline[i].perp_dot(outline[(i + 1) % n]))
        .sum::<f32>()
        .signum();

    let mut overlay = RgbaImage::new(image.width(), image.height());
    for i in 0..n {
        let a = outline[i];
        let b = outline[(i + 1) % n];
        let edge = b - a;
        if edge.length_squared() == 0.0 {
            continue;
        }
        let normal = (Vec2::new(edge.y, -edge.x) * winding).normalize_or_zero();
        let facing = normal.dot(light);

        let color = if facing > EDGE_FACING_THRESHOLD {
            let alpha = EDGE_HIGHLIGHT_MAX_ALPHA * facing.min(1.0);
            Rgba([255, 255, 255, alpha as u8])
        } else if facing < -EDGE_FACING_THRESHOLD {
            let alpha = EDGE_SHADOW_MAX_ALPHA * (-facing).min(1.0);
            Rgba([0, 0, 0, alpha as u8])
        } else {
            continue;
        };

        let a_in = center + (a - center) * EDGE_INSET_SCALE;
        let b_in = center + (b - center) * EDGE_INSET_SCALE;
        draw_line(&mut overlay, a_in, b_in, EDGE_WIDTH, color);
    }
    composite_over(image, &overlay);
}

/// Jagged circle outline so craters don't read as perfect bubbles.
fn irregular_circle(center: Vec2, radius: f32, rng: &mut impl Rng) -> Vec<Vec2> {
    (0..CRATER_OUTLINE_POINTS)
        .map(|i| {
            let angle = (i as f32 / CRATER_OUTLINE_POINTS as f32) * std::f32::consts::TAU;
            let r = radius * (1.0 + rng.gen_range(-CRATER_JAGGEDNESS..=CRATER_JAGGEDNESS));
            center + Vec2::from_angle(angle).rotate(Vec2::new(0.0, -r))
        })
        .collect()
}

/// Random pixel inside the silhouette within `reach` of the centre, by
/// rejection sampling.  `None` if every try missed.
fn sample_inside(
    mask: &RgbaImage,
    center: Vec2,
    reach: f32,
    tries: usize,
    rng: &mut impl Rng,
) -> Option<Vec2> {
    let lo = (center - Vec2::splat(reach)).as_ivec2();
    let hi = (center + Vec2::splat(reach)).as_ivec2();
    (0..tries).find_map(|_| {
        let x = rng.gen_range(lo.x..=hi.x);
        let y = rng.gen_range(lo.y..=hi.y);
        (alpha_at(mask, x, y) > 0).then(|| Vec2::new(x as f32 + 0.5, y as f32 + 0.5))
    })
}

fn paint_craters(
    image: &mut RgbaImage,
    mask: &RgbaImage,
    center: Vec2,
    radius: f32,
    rng: &mut impl Rng,
) {
    let light = light_dir();
    let count = ((radius * CRATER_DENSITY) as usize).max(1);
    let min_r = ((radius * CRATER_MIN_SCALE) as u32).max(2);
    let max_r = ((radius * CRATER_MAX_SCALE) as u32).max(min_r + 1);

    let mut layer = RgbaImage::new(image.width(), image.height());
    for _ in 0..count {
        let Some(pos) = sample_inside(mask, center, radius * CRATER_EDGE_INSET, CRATER_TRIES, rng)
        else {
            continue;
        };
        let r = rng.gen_range(min_r..=max_r) as f32;

        // soft base depression
        let base = irregular_circle(pos, (r * 0.9).floor(), rng);
        fill_polygon(&mut layer, &base, Rgba([0, 0, 0, CRATER_BASE_ALPHA]));

        // inner shadow, away from the light
        let shadow = irregular_circle(pos - light * (r * 0.15), (r * 0.6).floor(), rng);
        fill_polygon(&mut layer, &shadow, Rgba([0, 0, 0, CRATER_SHADOW_ALPHA]));

        // dark far rim
        let rim = irregular_circle(pos - light * (r * 0.25), r, rng);
        let rim_width = (r * 0.25).floor().max(1.0);
        stroke_polygon(
            &mut layer,
            &rim,
            rim_width,
            Rgba([0, 0, 0, CRATER_DARK_RIM_ALPHA]),
        );

        // bright near rim
        stroke_circle(
            &mut layer,
            pos + light * (r * 0.20),
            (r * 0.85).floor(),
            (r * 0.18).floor().max(1.0),
            Rgba([255, 255, 255, CRATER_LIGHT_RIM_ALPHA]),
        );
    }
    clip_to_mask(&mut layer, mask);
    composite_over(image, &layer);
}

fn paint_specks(
    image: &mut RgbaImage,
    mask: &RgbaImage,
    center: Vec2,
    radius: f32,
    rng: &mut impl Rng,
) {
    let mut layer = RgbaImage::new(image.width(), image.height());
    for _ in 0..SPECK_COUNT {
        let Some(pos) = sample_inside(mask, center, radius, 1, rng) else {
            continue;
        };
        let color = if rng.gen_bool(SPECK_LIGHT_CHANCE) {
            Rgba([255, 255, 255, SPECK_LIGHT_ALPHA])
        } else {
            Rgba([0, 0, 0, SPECK_DARK_ALPHA])
        };
        let r = rng.gen_range(SPECK_RADIUS_MIN..=SPECK_RADIUS_MAX) as f32;
        fill_circle(&mut layer, pos, r, color);
    }
    clip_to_mask(&mut layer, mask);
    composite_over(image, &layer);
}
