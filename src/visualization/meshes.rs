//! Hand-built meshes the primitive shapes do not cover
//!
//! - a tube swept along a Catmull-Rom curve (the supply pipe)
//! - an open cylinder wall covering only part of the circle (the cut-away housing)
//! - a point cloud (the air particles)

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;

use crate::simulation::particles::ParticlePos;

/// Sample a Catmull-Rom spline passing through every control point
///
/// The two end tangents come from reflecting the neighbour point, so the
/// curve starts at the first point and ends at the last.
pub fn catmull_rom(points: &[Vec3], samples: usize) -> Vec<Vec3> {
    match points.len() {
        0 => return Vec::new(),
        1 => return vec![points[0]; samples.max(1) + 1],
        _ => {}
    }
    let samples = samples.max(1);
    let n = points.len();
    let segments = (n - 1) as f32;

    let at = |i: isize| -> Vec3 {
        if i < 0 {
            2.0 * points[0] - points[1]
        } else if i as usize >= n {
            2.0 * points[n - 1] - points[n - 2]
        } else {
            points[i as usize]
        }
    };

    (0..=samples)
        .map(|k| {
            let u = k as f32 / samples as f32 * segments;
            let seg = (u.floor() as isize).min(n as isize - 2);
            let t = u - seg as f32;

            let (p0, p1, p2, p3) = (at(seg - 1), at(seg), at(seg + 1), at(seg + 2));
            let t2 = t * t;
            let t3 = t2 * t;
            0.5 * ((2.0 * p1)
                + (p2 - p0) * t
                + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
                + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
        })
        .collect()
}

/// Tube of `radius` around a polyline, `radial_segments` faces around
pub fn tube_mesh(path: &[Vec3], radius: f32, radial_segments: usize) -> Mesh {
    let radial_segments = radial_segments.max(3);
    let ring = radial_segments + 1;

    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(path.len() * ring);
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity(path.len() * ring);
    let mut indices: Vec<u32> = Vec::new();

    // carry the frame along the path so the rings do not twist
    let mut normal = Vec3::ZERO;
    for (i, p) in path.iter().enumerate() {
        let tangent = tube_tangent(path, i);
        normal = if i == 0 {
            tangent.any_orthonormal_vector()
        } else {
            (normal - tangent * normal.dot(tangent))
                .try_normalize()
                .unwrap_or_else(|| tangent.any_orthonormal_vector())
        };
        let binormal = tangent.cross(normal);

        for j in 0..ring {
            let v = j as f32 / radial_segments as f32 * std::f32::consts::TAU;
            let dir = normal * v.cos() + binormal * v.sin();
            positions.push((*p + dir * radius).to_array());
            normals.push(dir.to_array());
        }
    }

    for i in 1..path.len() {
        for j in 1..ring {
            let a = (ring * (i - 1) + (j - 1)) as u32;
            let b = (ring * i + (j - 1)) as u32;
            let c = (ring * i + j) as u32;
            let d = (ring * (i - 1) + j) as u32;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
        .with_inserted_indices(Indices::U32(indices))
}

fn tube_tangent(path: &[Vec3], i: usize) -> Vec3 {
    let prev = path[i.saturating_sub(1)];
    let next = path[(i + 1).min(path.len() - 1)];
    (next - prev).try_normalize().unwrap_or(Vec3::X)
}

/// Cylinder wall along Y, open at both ends, swept over `theta_length` radians
pub fn open_cylinder_arc(radius: f32, height: f32, segments: usize, theta_start: f32, theta_length: f32) -> Mesh {
    let segments = segments.max(1);
    let half = height * 0.5;

    let mut positions: Vec<[f32; 3]> = Vec::with_capacity((segments + 1) * 2);
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity((segments + 1) * 2);
    let mut uvs: Vec<[f32; 2]> = Vec::with_capacity((segments + 1) * 2);

    for i in 0..=segments {
        let u = i as f32 / segments as f32;
        let theta = theta_start + u * theta_length;
        let (sin, cos) = theta.sin_cos();
        for (y, v) in [(half, 0.0), (-half, 1.0)] {
            positions.push([radius * sin, y, radius * cos]);
            normals.push([sin, 0.0, cos]);
            uvs.push([u, v]);
        }
    }

    let mut indices: Vec<u32> = Vec::with_capacity(segments * 6);
    for i in 0..segments as u32 {
        let top = i * 2;
        let bottom = top + 1;
        let next_top = top + 2;
        let next_bottom = top + 3;
        indices.extend_from_slice(&[top, bottom, next_top, bottom, next_bottom, next_top]);
    }

    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
        .with_inserted_indices(Indices::U32(indices))
}

/// Point-list mesh over a particle buffer
///
/// The buffer stays in the main world so it can be advanced in place.
pub fn point_cloud(positions: Vec<ParticlePos>) -> Mesh {
    Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
}
