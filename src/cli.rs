//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::params::SceneParams;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "water-pool")]
#[command(about = "Animated water pool with Fresnel shading and caustics", long_about = None)]
pub struct Args {
    /// Directory containing floor.png and environment/
    #[arg(long, value_name = "DIR")]
    pub assets: Option<PathBuf>,

    /// Start with the animation paused (Space toggles)
    #[arg(long)]
    pub paused: bool,

    /// Window width in pixels
    #[arg(long, value_name = "PIXELS")]
    pub width: Option<u32>,

    /// Window height in pixels
    #[arg(long, value_name = "PIXELS")]
    pub height: Option<u32>,

    /// Water grid cells along X
    #[arg(long, value_name = "CELLS")]
    pub grid_x: Option<usize>,

    /// Water grid cells along Z
    #[arg(long, value_name = "CELLS")]
    pub grid_z: Option<usize>,

    /// Caustics texture size in texels per side
    #[arg(long, value_name = "TEXELS")]
    pub caustics_resolution: Option<u32>,
}

impl Args {
    /// Override defaults with whatever was given on the command line
    pub fn apply(&self, params: &mut SceneParams) {
        if let Some(dir) = &self.assets {
            params.render.asset_root = dir.clone();
        }
        if self.paused {
            params.render.start_paused = true;
        }
        if let Some(width) = self.width {
            params.render.window_width = width;
        }
        if let Some(height) = self.height {
            params.render.window_height = height;
        }
        if let Some(cells) = self.grid_x {
            params.pool.grid_cells_x = cells;
        }
        if let Some(cells) = self.grid_z {
            params.pool.grid_cells_z = cells;
        }
        if let Some(resolution) = self.caustics_resolution {
            params.pool.caustics_resolution = resolution;
        }
    }

    /// Scene parameters from defaults plus these overrides
    pub fn scene_params(&self) -> SceneParams {
        let mut params = SceneParams::default();
        self.apply(&mut params);
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_keeps_defaults() {
        let args = Args::try_parse_from(["water-pool"]).unwrap();
        let params = args.scene_params();
        assert_eq!(params.pool.grid_cells_x, 500);
        assert_eq!(params.render.window_width, 800);
        assert!(!params.render.start_paused);
    }

    #[test]
    fn test_flags_override_params() {
        let args = Args::try_parse_from([
            "water-pool",
            "--assets",
            "/tmp/pool-assets",
            "--paused",
            "--width",
            "1024",
            "--grid-x",
            "64",
            "--caustics-resolution",
            "256",
        ])
        .unwrap();
        let params = args.scene_params();
        assert_eq!(params.render.asset_root, PathBuf::from("/tmp/pool-assets"));
        assert!(params.render.start_paused);
        assert_eq!(params.render.window_width, 1024);
        assert_eq!(params.render.window_height, 600);
        assert_eq!(params.pool.grid_cells_x, 64);
        assert_eq!(params.pool.grid_cells_z, 100);
        assert_eq!(params.pool.caustics_resolution, 256);
    }

    #[test]
    fn test_rejects_non_numeric_size() {
        assert!(Args::try_parse_from(["water-pool", "--width", "wide"]).is_err());
    }
}
