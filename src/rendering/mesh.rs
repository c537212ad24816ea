//! Vertex layouts and the floor quad.

use bytemuck::{Pod, Zeroable};

use crate::params::PoolParams;
use crate::water::WaterPoint;

impl WaterPoint {
    const ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub fn buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Floor plane vertex
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct FloorVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl FloorVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
    ];

    pub fn buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Two triangles covering the pool footprint at `y = 0`
pub fn floor_vertices(pool: &PoolParams) -> [FloorVertex; 6] {
    let (w, d) = (pool.floor_width_m, pool.floor_depth_m);
    let v = |x: f32, z: f32| FloorVertex {
        position: [x, 0.0, z],
        normal: [0.0, 1.0, 0.0],
    };
    [
        v(0.0, 0.0),
        v(0.0, d),
        v(w, 0.0),
        v(w, 0.0),
        v(0.0, d),
        v(w, d),
    ]
}
