//! Sun, ambient and material parameters for the optical model.

use glam::Vec3;

/// Lighting and refraction constants shared by every stage
#[derive(Debug, Clone)]
pub struct LightingParams {
    /// Unit vector pointing from the scene towards the sun
    pub sun_direction: Vec3,

    /// Sun radiance (linear RGB)
    pub sun_color: Vec3,

    /// Ambient light (linear RGB)
    pub ambient_color: Vec3,

    /// Floor specular strength
    pub glossiness: f32,

    /// Floor roughness, specular power is `1/roughness² - 1`
    pub roughness: f32,

    /// Refractive index above the surface (air)
    pub n_air: f32,

    /// Refractive index below the surface (water)
    pub n_water: f32,

    /// Scale applied to sun color written into the caustics buffer
    pub caustics_intensity: f32,
}

impl Default for LightingParams {
    fn default() -> Self {
        Self {
            sun_direction: Vec3::new(0.9, 1.0, -0.2).normalize(),
            sun_color: Vec3::new(1.0, 0.9, 0.8),
            ambient_color: Vec3::splat(0.2),
            glossiness: 3.0,
            roughness: 0.05,
            n_air: 1.0,
            n_water: 1.33,
            caustics_intensity: 0.5,
        }
    }
}

impl LightingParams {
    /// Relative index for rays entering the water (`n_air / n_water`)
    pub fn eta(&self) -> f32 {
        self.n_air / self.n_water
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.sun_direction.is_normalized() {
            return Err(format!(
                "Sun direction must be unit length, got {:?}",
                self.sun_direction
            ));
        }
        if !(self.roughness > 0.0 && self.roughness <= 1.0) {
            return Err(format!(
                "Roughness must be in (0, 1], got {}",
                self.roughness
            ));
        }
        if self.n_air <= 0.0 || self.n_water <= 0.0 {
            return Err("Refractive indices must be > 0".to_string());
        }
        Ok(())
    }
}
