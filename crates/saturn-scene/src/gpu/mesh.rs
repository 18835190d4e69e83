//! Static geometry for the scene elements.

use std::f32::consts::{PI, TAU};

use saturn_render::{MeshData, VertexPositionNormalUv};

/// UV sphere of the given radius. `uv.y` runs from 0 at the south pole to 1
/// at the north pole; triangles wind counter-clockwise seen from outside.
pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);
    let ring = width_segments + 1;

    let mut vertices = Vec::with_capacity(((height_segments + 1) * ring) as usize);
    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let phi = v * PI;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let theta = u * TAU;
            let normal = [
                -theta.cos() * phi.sin(),
                phi.cos(),
                theta.sin() * phi.sin(),
            ];
            vertices.push(VertexPositionNormalUv {
                position: normal.map(|c| c * radius),
                normal,
                uv: [u, 1.0 - v],
            });
        }
    }

    let mut indices = Vec::with_capacity((width_segments * height_segments * 6) as usize);
    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * ring + ix + 1;
            let b = iy * ring + ix;
            let c = (iy + 1) * ring + ix;
            let d = (iy + 1) * ring + ix + 1;
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    MeshData { vertices, indices }
}

/// Flat annulus in the XY plane facing +Z.
pub fn ring(inner_radius: f32, outer_radius: f32, theta_segments: u32) -> MeshData {
    let theta_segments = theta_segments.max(3);
    let mut vertices = Vec::with_capacity(((theta_segments + 1) * 2) as usize);

    for radius in [inner_radius, outer_radius] {
        for i in 0..=theta_segments {
            let theta = i as f32 / theta_segments as f32 * TAU;
            let (x, y) = (radius * theta.cos(), radius * theta.sin());
            vertices.push(VertexPositionNormalUv {
                position: [x, y, 0.0],
                normal: [0.0, 0.0, 1.0],
                uv: [
                    (x / outer_radius + 1.0) * 0.5,
                    (y / outer_radius + 1.0) * 0.5,
                ],
            });
        }
    }

    let stride = theta_segments + 1;
    let mut indices = Vec::with_capacity((theta_segments * 6) as usize);
    for i in 0..theta_segments {
        let inner = i;
        let outer = i + stride;
        indices.extend_from_slice(&[inner, outer, outer + 1, inner, outer + 1, inner + 1]);
    }

    MeshData { vertices, indices }
}

/// Subdivided plane in the XY plane facing +Z, centered on the origin.
/// `uv` is (0, 0) at the bottom-left corner.
pub fn plane(width: f32, height: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let width_segments = width_segments.max(1);
    let height_segments = height_segments.max(1);
    let columns = width_segments + 1;

    let mut vertices = Vec::with_capacity((columns * (height_segments + 1)) as usize);
    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            vertices.push(VertexPositionNormalUv {
                position: [(u - 0.5) * width, (0.5 - v) * height, 0.0],
                normal: [0.0, 0.0, 1.0],
                uv: [u, 1.0 - v],
            });
        }
    }

    let mut indices = Vec::with_capacity((width_segments * height_segments * 6) as usize);
    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * columns + ix;
            let b = (iy + 1) * columns + ix;
            let c = (iy + 1) * columns + ix + 1;
            let d = iy * columns + ix + 1;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    MeshData { vertices, indices }
}
