//! Regular water grid spanning the pool footprint.

use bytemuck::{Pod, Zeroable};

use crate::params::PoolParams;

/// Horizontal grid coordinate; height and normal are derived per frame
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct WaterPoint {
    /// (x, z) in model space (meters)
    pub position: [f32; 2],
}

/// Immutable water grid mesh
pub struct WaterGrid {
    pub points: Vec<WaterPoint>,
    pub indices: Vec<u32>,
}

impl WaterGrid {
    /// Create a grid covering `[0, width] x [0, depth]`
    pub fn new(pool: &PoolParams) -> Self {
        let cells_x = pool.grid_cells_x;
        let cells_z = pool.grid_cells_z;
        let spacing_x = pool.floor_width_m / cells_x as f32;
        let spacing_z = pool.floor_depth_m / cells_z as f32;

        let mut points = Vec::with_capacity((cells_x + 1) * (cells_z + 1));
        let mut indices = Vec::with_capacity(cells_x * cells_z * 6);

        for z in 0..=cells_z {
            for x in 0..=cells_x {
                points.push(WaterPoint {
                    position: [x as f32 * spacing_x, z as f32 * spacing_z],
                });
            }
        }

        // Counter-clockwise when viewed from above
        for z in 0..cells_z {
            for x in 0..cells_x {
                let top_left = (z * (cells_x + 1) + x) as u32;
                let top_right = top_left + 1;
                let bottom_left = ((z + 1) * (cells_x + 1) + x) as u32;
                let bottom_right = bottom_left + 1;

                indices.extend_from_slice(&[
                    top_left,
                    bottom_left,
                    top_right,
                    top_right,
                    bottom_left,
                    bottom_right,
                ]);
            }
        }

        Self {
            points,
            indices,
        }
    }

    /// Iterate triangles as vertex index triples
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }
}
