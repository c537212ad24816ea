//! Window, projection and asset location configuration.

use std::path::PathBuf;

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Vertical field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane (meters)
    pub near_plane_m: f32,

    /// Far clipping plane (meters)
    pub far_plane_m: f32,

    /// Directory holding `floor.png` and `environment/`
    pub asset_root: PathBuf,

    /// Start with the animation clock paused
    pub start_paused: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 800,
            window_height: 600,
            fov_degrees: 90.0,
            near_plane_m: 0.01,
            far_plane_m: 100.0,
            asset_root: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/assets")),
            start_paused: false,
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height.max(1) as f32
    }

    /// Floor color texture path
    pub fn floor_texture_path(&self) -> PathBuf {
        self.asset_root.join("floor.png")
    }

    /// Directory containing the six cubemap faces
    pub fn environment_dir(&self) -> PathBuf {
        self.asset_root.join("environment")
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.window_width == 0 || self.window_height == 0 {
            return Err(format!(
                "Window size must be non-zero, got {}x{}",
                self.window_width, self.window_height
            ));
        }
        if !(self.near_plane_m > 0.0 && self.far_plane_m > self.near_plane_m) {
            return Err(format!(
                "Invalid clip planes: near {} far {}",
                self.near_plane_m, self.far_plane_m
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_paths() {
        let config = RenderConfig {
            asset_root: PathBuf::from("/data/pool"),
            ..Default::default()
        };
        assert_eq!(config.floor_texture_path(), PathBuf::from("/data/pool/floor.png"));
        assert_eq!(config.environment_dir(), PathBuf::from("/data/pool/environment"));
    }

    #[test]
    fn test_aspect_ratio() {
        let config = RenderConfig::default();
        assert!((config.aspect_ratio() - 800.0 / 600.0).abs() < 1e-6);
    }
}
