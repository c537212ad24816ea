//! Parameter definitions with physical units and documented semantics.
//!
//! All scene constants are extracted here with:
//! - Physical units (meters, seconds, radians, etc.)
//! - Documented ranges and meanings
//! - Validation where a bad value would break rendering

mod camera;
mod lighting;
mod pool;
mod render;
mod wave;

// Re-export all types
pub use camera::CameraParams;
pub use lighting::LightingParams;
pub use pool::PoolParams;
pub use render::RenderConfig;
pub use wave::{WaveParams, WaveTerm};

/// Every tunable of the scene, grouped by concern
#[derive(Debug, Clone, Default)]
pub struct SceneParams {
    pub pool: PoolParams,
    pub wave: WaveParams,
    pub lighting: LightingParams,
    pub camera: CameraParams,
    pub render: RenderConfig,
}

impl SceneParams {
    /// Validate all parameter groups
    pub fn validate(&self) -> Result<(), String> {
        self.pool.validate()?;
        self.lighting.validate()?;
        self.render.validate()?;
        Ok(())
    }
}
