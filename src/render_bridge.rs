//! Conversion of simulation output into Bevy render assets.
//!
//! The simulation works in screen-oriented world space (`+y` down).  Bevy's
//! 2D renderer is `+y` up, so mesh positions are mirrored on the y axis here.
//! Texture coordinates stay in image space, which is `+y` down like the baked
//! detail overlay, so the overlay lines up with the outline without a flip.
//!
//! Meshes are built once per asteroid and reused every frame; the per-frame
//! transform comes from [`crate::entity::DrawInstance`].

use crate::asteroid::VelocityTier;
use crate::detail_texture::DetailTexture;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};

/// Fan-triangulate a star-shaped outline around its centre into a [`Mesh`].
///
/// A centre vertex is prepended and triangles `(0, i, i+1)` wrap around the
/// outline, which is valid for any polygon visible in full from its centre
/// (every asteroid and star outline is).
///
/// `texture_size` is the side length of the detail overlay drawn on the mesh;
/// UVs map the outline onto that overlay's pixel grid.
pub fn polygon_mesh(vertices: &[Vec2], texture_size: u32) -> Mesh {
    let n = vertices.len();
    debug_assert!(n >= 3, "polygon must have ≥ 3 vertices");

    let size = texture_size.max(1) as f32;
    let center = (texture_size / 2) as f32;
    let to_uv = |v: Vec2| [(v.x + center) / size, (v.y + center) / size];

    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(n + 1);
    let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(n + 1);
    positions.push([0.0, 0.0, 0.0]);
    uvs.push(to_uv(Vec2::ZERO));
    for v in vertices {
        positions.push([v.x, -v.y, 0.0]);
        uvs.push(to_uv(*v));
    }
    let normals: Vec<[f32; 3]> = vec![[0.0, 0.0, 1.0]; n + 1];

    let mut indices: Vec<u32> = Vec::with_capacity(n * 3);
    for i in 1..=n as u32 {
        let next = if i == n as u32 { 1 } else { i + 1 };
        // Reversed after the y mirror so triangles stay counter-clockwise.
        indices.extend_from_slice(&[0, next, i]);
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

/// Upload-ready sRGB copy of a baked detail overlay.
pub fn detail_image(texture: &DetailTexture) -> Image {
    let img = texture.image();
    Image::new(
        Extent3d {
            width: img.width(),
            height: img.height(),
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        img.as_raw().clone(),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD,
    )
}

/// Flat fill colour for a tier at the given 0–255 alpha.
pub fn tier_material_color(tier: VelocityTier, alpha: u8) -> Color {
    tier.color().with_alpha(alpha as f32 / 255.0)
}

/// Viewport-local screen position to a Bevy 2D translation, for a camera
/// centred on the viewport.
pub fn screen_to_translation(screen: Vec2, view_size: Vec2) -> Vec2 {
    Vec2::new(screen.x - view_size.x * 0.5, view_size.y * 0.5 - screen.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_mesh::VertexAttributeValues;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn square() -> Vec<Vec2> {
        vec![
            Vec2::new(-10.0, -10.0),
            Vec2::new(10.0, -10.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(-10.0, 10.0),
        ]
    }

    #[test]
    fn fan_has_one_triangle_per_edge() {
        let mesh = polygon_mesh(&square(), 24);
        assert_eq!(mesh.count_vertices(), 5);
        let indices = mesh.indices().expect("indexed mesh");
        assert_eq!(indices.len(), 12);
        assert!(indices.iter().all(|i| i < 5));
    }

    #[test]
    fn positions_are_mirrored_and_uvs_are_not() {
        let mesh = polygon_mesh(&square(), 24);
        let Some(VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            panic!("positions missing");
        };
        assert_eq!(positions[1], [-10.0, 10.0, 0.0]);

        let Some(VertexAttributeValues::Float32x2(uvs)) = mesh.attribute(Mesh::ATTRIBUTE_UV_0)
        else {
            panic!("uvs missing");
        };
        assert_eq!(uvs[0], [0.5, 0.5]);
        assert_eq!(uvs[1], [2.0 / 24.0, 2.0 / 24.0]);
    }

    #[test]
    fn detail_image_keeps_size_and_bytes() {
        let mut rng = StdRng::seed_from_u64(1);
        let tex = DetailTexture::bake(&square(), 14.0, &mut rng);
        let image = detail_image(&tex);
        assert_eq!(image.width(), tex.diameter());
        assert_eq!(image.height(), tex.diameter());
        assert_eq!(image.data.as_deref(), Some(tex.image().as_raw().as_slice()));
    }

    #[test]
    fn tier_colour_carries_alpha() {
        let c = tier_material_color(VelocityTier::Level3, 128);
        assert!((c.alpha() - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn screen_centre_maps_to_origin() {
        let view = Vec2::new(800.0, 600.0);
        assert_eq!(
            screen_to_translation(Vec2::new(400.0, 300.0), view),
            Vec2::ZERO
        );
        assert_eq!(
            screen_to_translation(Vec2::ZERO, view),
            Vec2::new(-400.0, 300.0)
        );
    }
}
