use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::engine::assets::tunnel_manifest::ParticleField;

/// Uniformly scattered points inside the field's box.
pub fn particle_field_positions(field: &ParticleField, count: usize, seed: u64) -> Vec<[f32; 3]> {
    let mut rng = StdRng::seed_from_u64(seed);
    let extent = Vec3::from_array(field.extent).abs();
    let offset = Vec3::from_array(field.offset);

    (0..count)
        .map(|_| {
            let unit = Vec3::new(
                rng.gen_range(0.0..1.0),
                rng.gen_range(0.0..1.0),
                rng.gen_range(0.0..1.0),
            );
            (unit * extent + offset).to_array()
        })
        .collect()
}

/// Points in a spherical shell, evenly spread over directions.
pub fn starfield_positions(count: usize, inner: f32, outer: f32, seed: u64) -> Vec<[f32; 3]> {
    let mut rng = StdRng::seed_from_u64(seed);
    let (inner, outer) = (inner.min(outer), inner.max(outer));

    (0..count)
        .map(|_| {
            let radius = if outer > inner {
                rng.gen_range(inner..outer)
            } else {
                inner
            };
            let theta = rng.gen_range(0.0..std::f32::consts::TAU);
            let phi = rng.gen_range(-1.0f32..1.0).acos();
            [
                radius * phi.sin() * theta.cos(),
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
            ]
        })
        .collect()
}

pub fn point_mesh(positions: Vec<[f32; 3]>) -> Mesh {
    let mut mesh = Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::RENDER_WORLD);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_points_stay_inside_the_box() {
        let field = ParticleField {
            extent: [500.0, 50.0, 500.0],
            offset: [-250.0, -25.0, -250.0],
            spin: [0.0; 3],
        };
        let points = particle_field_positions(&field, 2000, 7);
        assert_eq!(points.len(), 2000);
        for [x, y, z] in points {
            assert!((-250.0..=250.0).contains(&x));
            assert!((-25.0..=25.0).contains(&y));
            assert!((-250.0..=250.0).contains(&z));
        }
    }

    #[test]
    fn same_seed_same_points() {
        assert_eq!(
            starfield_positions(32, 400.0, 1000.0, 3),
            starfield_positions(32, 400.0, 1000.0, 3)
        );
    }

    #[test]
    fn stars_sit_in_the_shell() {
        for p in starfield_positions(1000, 400.0, 1000.0, 11) {
            let r = Vec3::from_array(p).length();
            assert!(r >= 399.9 && r <= 1000.1, "radius {r}");
        }
    }
}
