//! Minimal RGBA rasteriser for baking asteroid detail overlays.
//!
//! Shapes are sampled at pixel centres and *overwrite* the target pixels,
//! like drawing onto a fresh transparent layer.  Layers are then merged with
//! [`composite_over`] and clipped to a silhouette with [`clip_to_mask`].
//!
//! Image space is `+y` down, matching world space.

use bevy::prelude::*;
use image::{Rgba, RgbaImage};

/// Pixel rows/columns `[lo, hi)` covered by `[min, max]`, clipped to `len`.
fn span(min: f32, max: f32, len: u32) -> std::ops::Range<u32> {
    let lo = min.floor().max(0.0) as u32;
    let hi = (max.ceil().max(0.0) as u32).min(len);
    lo..hi.max(lo)
}

fn pixel_center(x: u32, y: u32) -> Vec2 {
    Vec2::new(x as f32 + 0.5, y as f32 + 0.5)
}

/// Fill a simple polygon using the even-odd rule.
///
/// Fewer than three points draws nothing.
pub fn fill_polygon(img: &mut RgbaImage, points: &[Vec2], color: Rgba<u8>) {
    if points.len() < 3 {
        return;
    }
    let (min_y, max_y) = points
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.y), hi.max(p.y))
        });

    let mut crossings: Vec<f32> = Vec::with_capacity(points.len());
    for y in span(min_y, max_y, img.height()) {
        let sy = y as f32 + 0.5;
        crossings.clear();
        for (i, a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            // Half-open so shared vertices are counted once.
            if (a.y <= sy && b.y > sy) || (b.y <= sy && a.y > sy) {
                let t = (sy - a.y) / (b.y - a.y);
                crossings.push(a.x + t * (b.x - a.x));
            }
        }
        crossings.sort_by(|l, r| l.total_cmp(r));
        for pair in crossings.chunks_exact(2) {
            for x in span(pair[0] - 0.5, pair[1] - 0.5, img.width()) {
                let sx = x as f32 + 0.5;
                if sx >= pair[0] && sx < pair[1] {
                    img.put_pixel(x, y, color);
                }
            }
        }
    }
}

/// Draw a segment `width` pixels thick with round caps.
pub fn draw_line(img: &mut RgbaImage, a: Vec2, b: Vec2, width: f32, color: Rgba<u8>) {
    let half = (width * 0.5).max(0.5);
    let ab = b - a;
    let len_sq = ab.length_squared();
    let xs = span(a.x.min(b.x) - half, a.x.max(b.x) + half, img.width());
    for y in span(a.y.min(b.y) - half, a.y.max(b.y) + half, img.height()) {
        for x in xs.clone() {
            let p = pixel_center(x, y);
            let t = if len_sq > 0.0 {
                ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            if p.distance_squared(a + ab * t) <= half * half {
                img.put_pixel(x, y, color);
            }
        }
    }
}

/// Outline a closed polygon.
pub fn stroke_polygon(img: &mut RgbaImage, points: &[Vec2], width: f32, color: Rgba<u8>) {
    for (i, &a) in points.iter().enumerate() {
        draw_line(img, a, points[(i + 1) % points.len()], width, color);
    }
}

/// Fill a disc.  Radii below one pixel still cover the centre pixel.
pub fn fill_circle(img: &mut RgbaImage, center: Vec2, radius: f32, color: Rgba<u8>) {
    stroke_circle(img, center, radius, radius.max(0.5), color);
}

/// Draw a ring whose outer edge is `radius` and which is `width` thick inward.
pub fn stroke_circle(img: &mut RgbaImage, center: Vec2, radius: f32, width: f32, color: Rgba<u8>) {
    let outer = radius.max(0.5);
    let inner = (outer - width).max(0.0);
    let xs = span(center.x - outer, center.x + outer, img.width());
    for y in span(center.y - outer, center.y + outer, img.height()) {
        for x in xs.clone() {
            let d_sq = pixel_center(x, y).distance_squared(center);
            if d_sq <= outer * outer && (inner == 0.0 || d_sq >= inner * inner) {
                img.put_pixel(x, y, color);
            }
        }
    }
}

/// Straight-alpha "source over destination" blend of `src` onto `dst`.
///
/// Both images must be the same size.
pub fn composite_over(dst: &mut RgbaImage, src: &RgbaImage) {
    debug_assert_eq!(dst.dimensions(), src.dimensions());
    for (d, s) in dst.pixels_mut().zip(src.pixels()) {
        let sa = s[3] as f32 / 255.0;
        if sa == 0.0 {
            continue;
        }
        let da = d[3] as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        for c in 0..3 {
            let blended = (s[c] as f32 * sa + d[c] as f32 * da * (1.0 - sa)) / out_a;
            d[c] = blended.round().clamp(0.0, 255.0) as u8;
        }
        d[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }
}

/// Per-channel minimum against `mask`: clears everything outside an opaque
/// white silhouette and leaves the inside untouched.
pub fn clip_to_mask(layer: &mut RgbaImage, mask: &RgbaImage) {
    debug_assert_eq!(layer.dimensions(), mask.dimensions());
    for (l, m) in layer.pixels_mut().zip(mask.pixels()) {
        for c in 0..4 {
            l[c] = l[c].min(m[c]);
        }
    }
}

/// Alpha of the pixel at `(x, y)`, or 0 outside the image.
pub fn alpha_at(img: &RgbaImage, x: i32, y: i32) -> u8 {
    if x < 0 || y < 0 || x as u32 >= img.width() || y as u32 >= img.height() {
        return 0;
    }
    img.get_pixel(x as u32, y as u32)[3]
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn coverage(img: &RgbaImage) -> usize {
        img.pixels().filter(|p| p[3] > 0).count()
    }

    #[test]
    fn square_fill_covers_its_area() {
        let mut img = RgbaImage::new(20, 20);
        let square = [
            Vec2::new(5.0, 5.0),
            Vec2::new(15.0, 5.0),
            Vec2::new(15.0, 15.0),
            Vec2::new(5.0, 15.0),
        ];
        fill_polygon(&mut img, &square, WHITE);
        assert_eq!(coverage(&img), 100);
        assert_eq!(alpha_at(&img, 5, 5), 255);
        assert_eq!(alpha_at(&img, 15, 15), 0);
    }

    #[test]
    fn degenerate_polygon_draws_nothing() {
        let mut img = RgbaImage::new(10, 10);
        fill_polygon(&mut img, &[Vec2::ZERO, Vec2::new(9.0, 9.0)], WHITE);
        assert_eq!(coverage(&img), 0);
    }

    #[test]
    fn shapes_outside_the_image_are_clipped() {
        let mut img = RgbaImage::new(8, 8);
        fill_circle(&mut img, Vec2::new(-20.0, -20.0), 5.0, WHITE);
        draw_line(
            &mut img,
            Vec2::new(-5.0, 4.5),
            Vec2::new(20.0, 4.5),
            1.0,
            WHITE,
        );
        assert_eq!(coverage(&img), 8);
    }

    #[test]
    fn ring_leaves_the_middle_empty() {
        let mut img = RgbaImage::new(21, 21);
        stroke_circle(&mut img, Vec2::new(10.5, 10.5), 8.0, 2.0, WHITE);
        assert_eq!(alpha_at(&img, 10, 10), 0);
        assert_eq!(alpha_at(&img, 10, 3), 255);
    }

    #[test]
    fn composite_over_transparent_keeps_source() {
        let mut dst = RgbaImage::new(1, 1);
        let mut src = RgbaImage::new(1, 1);
        src.put_pixel(0, 0, Rgba([10, 20, 30, 40]));
        composite_over(&mut dst, &src);
        assert_eq!(*dst.get_pixel(0, 0), Rgba([10, 20, 30, 40]));
    }

    #[test]
    fn composite_over_opaque_stays_opaque() {
        let mut dst = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]));
        let src = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 51]));
        composite_over(&mut dst, &src);
        let p = dst.get_pixel(0, 0);
        assert_eq!(p[3], 255);
        assert_eq!(p[0], 51);
    }

    #[test]
    fn mask_clip_zeroes_outside() {
        let mut layer = RgbaImage::from_pixel(2, 1, Rgba([200, 100, 50, 90]));
        let mut mask = RgbaImage::new(2, 1);
        mask.put_pixel(0, 0, WHITE);
        clip_to_mask(&mut layer, &mask);
        assert_eq!(*layer.get_pixel(0, 0), Rgba([200, 100, 50, 90]));
        assert_eq!(*layer.get_pixel(1, 0), Rgba([0, 0, 0, 0]));
    }
}
