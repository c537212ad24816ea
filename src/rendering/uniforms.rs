//! Per-frame uniform block shared by every stage.

use std::marker::PhantomData;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::params::SceneParams;
use crate::scene::FrameState;

/// Plain-data block that can live in a uniform buffer
pub trait UniformBlock: Pod {
    const LABEL: &'static str;
}

/// Typed uniform buffer: only `U` can ever be written into it
pub struct UniformBuffer<U: UniformBlock> {
    buffer: wgpu::Buffer,
    _block: PhantomData<U>,
}

impl<U: UniformBlock> UniformBuffer<U> {
    pub fn new(device: &wgpu::Device, initial: &U) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(U::LABEL),
            contents: bytemuck::bytes_of(initial),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        Self {
            buffer,
            _block: PhantomData,
        }
    }

    pub fn write(&self, queue: &wgpu::Queue, value: &U) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(value));
    }

    pub fn binding(&self) -> wgpu::BindingResource<'_> {
        self.buffer.as_entire_binding()
    }
}

/// Mirror of `struct Frame` in `shaders/frame.wgsl`
///
/// Written once before any stage is encoded, so caustics, floor and water
/// all see the same time, model transform and sun direction.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub sky_inv_view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    /// xyz = camera position, w = animation time
    pub camera_time: [f32; 4],
    /// xyz = sun direction, w = glossiness
    pub sun_glossiness: [f32; 4],
    /// xyz = sun color, w = roughness
    pub sun_color_roughness: [f32; 4],
    /// xyz = ambient color, w = caustics intensity
    pub ambient_intensity: [f32; 4],
    /// floor width, floor depth, texture tile, unused
    pub pool: [f32; 4],
    /// n_air, n_water, unused, unused
    pub optics: [f32; 4],
    /// Per term: amplitude, kx, kz, omega
    pub wave_terms: [[f32; 4]; 3],
    /// Phases of the three terms, w = base height
    pub wave_phases: [f32; 4],
}

impl UniformBlock for FrameUniforms {
    const LABEL: &'static str = "Frame Uniform Buffer";
}

impl FrameUniforms {
    pub fn new(frame: &FrameState, params: &SceneParams) -> Self {
        let lighting = &params.lighting;
        let pool = &params.pool;
        let wave = &params.wave;

        Self {
            view_proj: frame.view_proj().to_cols_array_2d(),
            sky_inv_view_proj: frame.sky_inv_view_proj().to_cols_array_2d(),
            model: frame.model.to_cols_array_2d(),
            camera_time: frame.camera_position.extend(frame.time_s).to_array(),
            sun_glossiness: frame.sun_direction.extend(lighting.glossiness).to_array(),
            sun_color_roughness: lighting.sun_color.extend(lighting.roughness).to_array(),
            ambient_intensity: lighting
                .ambient_color
                .extend(lighting.caustics_intensity)
                .to_array(),
            pool: [
                pool.floor_width_m,
                pool.floor_depth_m,
                pool.texture_tile_m,
                0.0,
            ],
            optics: [lighting.n_air, lighting.n_water, 0.0, 0.0],
            wave_terms: wave
                .terms
                .map(|t| [t.amplitude_m, t.kx, t.kz, t.omega]),
            wave_phases: [
                wave.terms[0].phase,
                wave.terms[1].phase,
                wave.terms[2].phase,
                wave.base_height_m,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3};

    #[test]
    fn test_frame_uniforms_size() {
        // 3 mat4 + 10 vec4, no implicit padding
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 352);
        assert_eq!(std::mem::size_of::<FrameUniforms>() % 16, 0);
    }

    #[test]
    fn test_frame_uniforms_pack_frame_state() {
        let params = SceneParams::default();
        let frame = FrameState {
            time_s: 3.5,
            camera_position: Vec3::new(20.0, 10.0, 20.0),
            model: Mat4::from_translation(Vec3::X),
            ..FrameState::default()
        };
        let u = FrameUniforms::new(&frame, &params);

        assert_eq!(u.camera_time, [20.0, 10.0, 20.0, 3.5]);
        assert_eq!(u.model, frame.model.to_cols_array_2d());
        assert_eq!(u.pool, [40.0, 8.0, 4.0, 0.0]);
        assert_eq!(&u.optics[..2], &[1.0, 1.33]);
        assert_eq!(u.wave_phases[3], params.wave.base_height_m);
        assert_eq!(u.wave_terms[1][2], params.wave.terms[1].kz);
        assert_eq!(u.ambient_intensity[3], params.lighting.caustics_intensity);
    }
}
