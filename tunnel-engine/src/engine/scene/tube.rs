use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};

use crate::engine::path::{PathCurve, PathFrames};

/// Sweep a circle of `radius` along the curve. Triangles face the centre line,
/// so the tube is visible from inside with regular back-face culling.
pub fn build_tube_mesh(
    curve: &PathCurve,
    frames: &PathFrames,
    tubular_segments: usize,
    radial_segments: usize,
    radius: f32,
) -> Mesh {
    let tubular_segments = tubular_segments.max(1);
    let radial_segments = radial_segments.max(3);
    let rings = tubular_segments + 1;
    let ring_verts = radial_segments + 1;

    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(rings * ring_verts);
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity(rings * ring_verts);
    let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(rings * ring_verts);

    for j in 0..rings {
        let u = j as f32 / tubular_segments as f32;
        // Closed paths reuse the start ring so the seam has no gap.
        let sample = if curve.is_closed() && j == tubular_segments {
            0.0
        } else {
            u
        };
        let center = curve.point_at(sample);
        let frame = frames.frame_at(sample);

        for i in 0..ring_verts {
            let v = i as f32 / radial_segments as f32;
            let angle = v * std::f32::consts::TAU;
            let dir = frame.normal * angle.cos() + frame.binormal * angle.sin();
            let p = center + dir * radius;
            positions.push([p.x, p.y, p.z]);
            normals.push([-dir.x, -dir.y, -dir.z]);
            uvs.push([u, v]);
        }
    }

    let mut indices: Vec<u32> = Vec::with_capacity(tubular_segments * radial_segments * 6);
    for j in 0..tubular_segments {
        let ring0 = j * ring_verts;
        let ring1 = (j + 1) * ring_verts;
        for i in 0..radial_segments {
            let a = (ring0 + i) as u32;
            let b = (ring1 + i) as u32;
            let c = (ring1 + i + 1) as u32;
            let d = (ring0 + i + 1) as u32;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    );
    mesh.insert_indices(Indices::U32(indices));
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh
}
