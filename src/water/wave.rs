//! Analytic wave height field with closed-form normals.
//!
//! The same arithmetic runs in `shaders/frame.wgsl`, so the CPU model and
//! both GPU passes see an identical surface for a given instant.

use glam::{Vec2, Vec3};

use crate::params::WaveParams;

/// Height and unit normal of the surface at one point and instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveSample {
    pub height: f32,
    pub normal: Vec3,
}

/// Closed-form sum-of-sinusoids height field
#[derive(Debug, Clone)]
pub struct WaveField {
    params: WaveParams,
}

impl WaveField {
    pub fn new(params: WaveParams) -> Self {
        Self { params }
    }

    /// Surface height (meters above the floor plane)
    pub fn height(&self, x: f32, z: f32, time_s: f32) -> f32 {
        self.sample(x, z, time_s).height
    }

    /// Unit surface normal
    pub fn normal(&self, x: f32, z: f32, time_s: f32) -> Vec3 {
        self.sample(x, z, time_s).normal
    }

    /// Partial derivatives (∂h/∂x, ∂h/∂z)
    pub fn slope(&self, x: f32, z: f32, time_s: f32) -> Vec2 {
        self.evaluate(x, z, time_s).1
    }

    /// Height and normal in a single evaluation
    pub fn sample(&self, x: f32, z: f32, time_s: f32) -> WaveSample {
        let (height, slope) = self.evaluate(x, z, time_s);
        WaveSample {
            height,
            normal: Vec3::new(-slope.x, 1.0, -slope.y).normalize(),
        }
    }

    fn evaluate(&self, x: f32, z: f32, time_s: f32) -> (f32, Vec2) {
        let mut height = self.params.base_height_m;
        let mut dhdx = 0.0;
        let mut dhdz = 0.0;

        for term in &self.params.terms {
            let arg = term.kx * x + term.kz * z + term.omega * time_s + term.phase;
            height += term.amplitude_m * arg.sin();

            let c = term.amplitude_m * arg.cos();
            dhdx += c * term.kx;
            dhdz += c * term.kz;
        }

        (height, Vec2::new(dhdx, dhdz))
    }
}
