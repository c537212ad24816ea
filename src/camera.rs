//! Free-fly camera driven by held keys.

use glam::{Mat3, Mat4, Vec3};
use winit::keyboard::KeyCode;

use crate::input::InputState;
use crate::params::{CameraParams, RenderConfig};

/// Pitch stays short of straight up or down, where `front` would be parallel
/// to `up`
const MAX_PITCH_RAD: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Free-fly camera: translate along the view axes, yaw about world up and
/// pitch about the camera's horizontal axis
#[derive(Debug, Clone)]
pub struct FlyCamera {
    pub position: Vec3,
    pub front: Vec3,
    pub up: Vec3,

    /// Rotation about world Y (radians), Right arrow increases it
    pub yaw: f32,

    /// Rotation about the horizontal axis (radians), Down arrow increases it
    pub pitch: f32,

    base_front: Vec3,
    move_speed: f32,
    turn_speed: f32,

    fov_y_rad: f32,
    aspect: f32,
    near: f32,
    far: f32,
}

impl FlyCamera {
    pub fn new(params: &CameraParams, render: &RenderConfig) -> Self {
        Self {
            position: params.position,
            front: params.base_front,
            up: params.up,
            yaw: 0.0,
            pitch: 0.0,
            base_front: params.base_front,
            move_speed: params.move_speed_m_per_s,
            turn_speed: params.turn_speed_rad_per_s,
            fov_y_rad: render.fov_degrees.to_radians(),
            aspect: render.aspect_ratio(),
            near: render.near_plane_m,
            far: render.far_plane_m,
        }
    }

    /// Apply one frame of held keys
    ///
    /// Translation uses the front vector from the previous frame, then the
    /// angles change and the front vector is rebuilt from them.
    pub fn update(&mut self, input: &InputState, dt: f32) {
        let step = self.move_speed * dt;
        let right = self.front.cross(self.up).normalize();

        if input.is_down(KeyCode::KeyW) {
            self.position += step * self.front;
        }
        if input.is_down(KeyCode::KeyS) {
            self.position -= step * self.front;
        }
        if input.is_down(KeyCode::KeyA) {
            self.position -= step * right;
        }
        if input.is_down(KeyCode::KeyD) {
            self.position += step * right;
        }
        if input.is_down(KeyCode::ControlLeft) {
            self.position -= step * self.up;
        }
        if input.is_down(KeyCode::Space) {
            self.position += step * self.up;
        }

        let turn = self.turn_speed * dt;
        if input.is_down(KeyCode::ArrowLeft) {
            self.yaw -= turn;
        }
        if input.is_down(KeyCode::ArrowRight) {
            self.yaw += turn;
        }
        if input.is_down(KeyCode::ArrowUp) {
            self.pitch -= turn;
        }
        if input.is_down(KeyCode::ArrowDown) {
            self.pitch += turn;
        }
        self.pitch = self.pitch.clamp(-MAX_PITCH_RAD, MAX_PITCH_RAD);

        self.front = self.orientation().transpose() * self.base_front;
    }

    /// Pitch applied after yaw, as a world-to-camera rotation
    fn orientation(&self) -> Mat3 {
        Mat3::from_rotation_x(self.pitch) * Mat3::from_rotation_y(self.yaw)
    }

    /// Update projection aspect after a resize
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_rad, self.aspect, self.near, self.far)
    }

    /// View matrix with translation removed, for the skybox
    pub fn sky_view_matrix(&self) -> Mat4 {
        Mat4::from_mat3(Mat3::from_mat4(self.view_matrix()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> FlyCamera {
        FlyCamera::new(&CameraParams::default(), &RenderConfig::default())
    }

    fn held(keys: &[KeyCode]) -> InputState {
        let mut input = InputState::new();
        for &key in keys {
            input.press(key);
        }
        input
    }

    #[test]
    fn test_default_pose() {
        let cam = camera();
        assert_eq!(cam.position, Vec3::new(20.0, 10.0, 20.0));
        assert_eq!(cam.front, Vec3::NEG_Z);
    }

    #[test]
    fn test_forward_moves_along_front() {
        let mut cam = camera();
        cam.update(&held(&[KeyCode::KeyW]), 0.5);
        assert!((cam.position - Vec3::new(20.0, 10.0, 17.0)).length() < 1e-5);
    }

    #[test]
    fn test_strafe_and_vertical() {
        let mut cam = camera();
        cam.update(&held(&[KeyCode::KeyD, KeyCode::ControlLeft]), 1.0);
        // front -Z cross up +Y points +X
        assert!((cam.position - Vec3::new(26.0, 4.0, 20.0)).length() < 1e-5);
    }

    #[test]
    fn test_yaw_right_turns_towards_positive_x() {
        let mut cam = camera();
        cam.update(&held(&[KeyCode::ArrowRight]), std::f32::consts::FRAC_PI_4 / 2.0);
        assert!(cam.front.x > 0.0 && cam.front.z < 0.0);
        assert!((cam.front.length() - 1.0).abs() < 1e-5);
        assert!(cam.front.y.abs() < 1e-5);
    }

    #[test]
    fn test_pitch_down_looks_down() {
        let mut cam = camera();
        cam.update(&held(&[KeyCode::ArrowDown]), 0.2);
        assert!(cam.front.y < 0.0);
    }

    #[test]
    fn test_pitch_stops_short_of_vertical() {
        for key in [KeyCode::ArrowDown, KeyCode::ArrowUp] {
            let mut cam = camera();
            cam.update(&held(&[key]), 10.0);
            assert!(cam.pitch.abs() < std::f32::consts::FRAC_PI_2);
            cam.update(&held(&[key, KeyCode::KeyD]), 1.0);
            assert!(cam.position.is_finite());
            assert!(cam.view_matrix().is_finite());
        }
    }

    #[test]
    fn test_sky_view_has_no_translation() {
        let mut cam = camera();
        cam.update(&held(&[KeyCode::ArrowLeft, KeyCode::KeyW]), 0.3);
        let sky = cam.sky_view_matrix();
        assert_eq!(sky.w_axis, glam::Vec4::W);
        // Rotation part is unchanged
        let dir = Vec3::new(0.3, 0.2, -1.0);
        let a = sky.transform_vector3(dir);
        let b = cam.view_matrix().transform_vector3(dir);
        assert!((a - b).length() < 1e-5);
    }

    #[test]
    fn test_projection_follows_aspect() {
        let mut cam = camera();
        let before = cam.projection_matrix();
        cam.set_aspect(1600, 600);
        assert_ne!(before, cam.projection_matrix());
        assert!(cam.projection_matrix().is_finite());
    }
}
