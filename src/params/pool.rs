//! Pool footprint, water grid tiling and caustics buffer resolution.

use glam::Vec2;

/// Pool geometry and sampling resolutions
#[derive(Debug, Clone)]
pub struct PoolParams {
    /// Floor extent along X (meters), floor spans [0, width]
    pub floor_width_m: f32,

    /// Floor extent along Z (meters), floor spans [0, depth]
    pub floor_depth_m: f32,

    /// Water grid cells along X
    pub grid_cells_x: usize,

    /// Water grid cells along Z
    pub grid_cells_z: usize,

    /// Caustics buffer resolution (texels per side)
    pub caustics_resolution: u32,

    /// World size of one floor texture repeat (meters)
    pub texture_tile_m: f32,
}

impl Default for PoolParams {
    fn default() -> Self {
        Self {
            floor_width_m: 40.0,
            floor_depth_m: 8.0,
            grid_cells_x: 500,
            grid_cells_z: 100,
            caustics_resolution: 512,
            texture_tile_m: 4.0,
        }
    }
}

impl PoolParams {
    /// Floor footprint as (width, depth)
    pub fn footprint(&self) -> Vec2 {
        Vec2::new(self.floor_width_m, self.floor_depth_m)
    }

    /// Whether a floor-plane point lies inside the pool (edges inclusive)
    pub fn contains(&self, xz: Vec2) -> bool {
        xz.x >= 0.0 && xz.x <= self.floor_width_m && xz.y >= 0.0 && xz.y <= self.floor_depth_m
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.floor_width_m > 0.0 && self.floor_depth_m > 0.0) {
            return Err(format!(
                "Pool footprint must be positive, got {}x{}",
                self.floor_width_m, self.floor_depth_m
            ));
        }
        if self.grid_cells_x == 0 || self.grid_cells_z == 0 {
            return Err(format!(
                "Water grid needs at least one cell per axis, got {}x{}",
                self.grid_cells_x, self.grid_cells_z
            ));
        }
        // Indices are uploaded as u32
        let vertex_count = (self.grid_cells_x + 1) * (self.grid_cells_z + 1);
        if vertex_count > u32::MAX as usize {
            return Err(format!("Water grid too large: {} vertices", vertex_count));
        }
        // Default wgpu limit for 2D textures
        if !(1..=8192).contains(&self.caustics_resolution) {
            return Err(format!(
                "Caustics resolution must be in 1..=8192, got {}",
                self.caustics_resolution
            ));
        }
        if self.texture_tile_m <= 0.0 {
            return Err(format!(
                "Texture tile must be positive, got {}",
                self.texture_tile_m
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_edges_inclusive() {
        let pool = PoolParams::default();
        assert!(pool.contains(Vec2::new(0.0, 0.0)));
        assert!(pool.contains(Vec2::new(40.0, 8.0)));
        assert!(!pool.contains(Vec2::new(-0.01, 4.0)));
        assert!(!pool.contains(Vec2::new(20.0, 8.01)));
    }

    #[test]
    fn test_rejects_empty_grid() {
        let mut pool = PoolParams::default();
        pool.grid_cells_z = 0;
        assert!(pool.validate().is_err());
    }
}
