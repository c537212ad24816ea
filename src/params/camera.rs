//! Free-fly camera starting pose and speeds.

use glam::Vec3;

/// Free-fly camera configuration
#[derive(Debug, Clone)]
pub struct CameraParams {
    /// Starting eye position (meters)
    pub position: Vec3,

    /// Forward direction at zero yaw and pitch
    pub base_front: Vec3,

    /// World up vector
    pub up: Vec3,

    /// Translation speed (meters per second)
    pub move_speed_m_per_s: f32,

    /// Yaw/pitch speed (radians per second)
    pub turn_speed_rad_per_s: f32,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            // Centered over the 40m pool, looking down its length
            position: Vec3::new(20.0, 10.0, 20.0),
            base_front: Vec3::NEG_Z,
            up: Vec3::Y,
            move_speed_m_per_s: 6.0,
            turn_speed_rad_per_s: 2.0,
        }
    }
}
