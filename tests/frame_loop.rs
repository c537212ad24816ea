//! Frame loop scenario without a GPU: input, clock, camera and the CPU
//! caustics model driven the way the renderer drives them.

use glam::{Vec2, Vec3};
use water_pool::input::InputState;
use water_pool::params::{PoolParams, SceneParams};
use water_pool::scene::{FramePhase, Scene};
use water_pool::water::{render_caustics, CausticsRenderTarget};
use winit::keyboard::KeyCode;

const DT: f32 = 1.0 / 60.0;

fn scene() -> Scene {
    Scene::new(SceneParams {
        pool: PoolParams {
            grid_cells_x: 100,
            grid_cells_z: 20,
            caustics_resolution: 64,
            ..Default::default()
        },
        ..Default::default()
    })
}

#[test]
fn test_default_scene_setup() {
    let scene = scene();
    assert_eq!(scene.params.pool.footprint(), Vec2::new(40.0, 8.0));
    assert_eq!(scene.camera.position, Vec3::new(20.0, 10.0, 20.0));
    assert_eq!(scene.camera.front, Vec3::NEG_Z);
    assert_eq!(
        scene.params.lighting.sun_direction,
        Vec3::new(0.9, 1.0, -0.2).normalize()
    );
}

#[test]
fn test_one_second_unpaused_moves_water() {
    let mut scene = scene();
    let mut input = InputState::new();

    let first = scene.update(&mut input, 0.0);
    let before = scene.wave.height(0.0, 0.0, first.time_s);

    let mut last = first;
    for _ in 0..60 {
        last = scene.update(&mut input, DT);
    }
    assert!((last.time_s - 1.0).abs() < 1e-3);
    assert_ne!(before, scene.wave.height(0.0, 0.0, last.time_s));
}

#[test]
fn test_paused_freezes_water_while_frames_advance() {
    let mut scene = scene();
    let mut input = InputState::new();

    scene.update(&mut input, 0.5);
    input.press(KeyCode::Space);
    input.release(KeyCode::Space);
    let paused = scene.update(&mut input, DT);
    assert!(scene.clock.is_paused());

    let height = scene.wave.height(0.0, 0.0, paused.time_s);
    for _ in 0..30 {
        let frame = scene.update(&mut input, DT);
        assert_eq!(frame.time_s, paused.time_s);
        assert_eq!(scene.wave.height(0.0, 0.0, frame.time_s), height);
    }

    // Unpausing resumes from the frozen time
    input.press(KeyCode::Space);
    let resumed = scene.update(&mut input, DT);
    assert!((resumed.time_s - (paused.time_s + DT)).abs() < 1e-6);
}

#[test]
fn test_camera_keeps_flying_while_paused() {
    let mut scene = scene();
    let mut input = InputState::new();
    scene.clock.toggle_pause();

    input.press(KeyCode::KeyW);
    let frame = scene.update(&mut input, 0.5);
    assert!((frame.camera_position - Vec3::new(20.0, 10.0, 17.0)).length() < 1e-4);
    assert_eq!(frame.time_s, 0.0);
}

#[test]
fn test_caustics_frame_uses_frame_state() {
    let mut scene = scene();
    let mut input = InputState::new();
    let frame = scene.update(&mut input, 0.25);

    let pool = scene.params.pool.clone();
    let mut target = CausticsRenderTarget::new(pool.caustics_resolution);
    let drawn = render_caustics(
        &mut target,
        &scene.grid,
        &scene.wave,
        &frame,
        &scene.params.lighting,
        &pool,
    );
    assert!(drawn > 0);

    // The floor receives light somewhere and every texel stays finite
    assert!(target.texels().iter().any(|t| t.w > 0.0));
    assert!(target.texels().iter().all(|t| t.is_finite()));
}

#[test]
fn test_compositor_runs_caustics_before_surface_stages() {
    let order: Vec<_> = FramePhase::sequence().collect();
    let caustics = order.iter().position(|p| *p == FramePhase::Caustics);
    let floor = order.iter().position(|p| *p == FramePhase::Floor);
    let water = order.iter().position(|p| *p == FramePhase::Water);
    assert!(caustics < floor && floor < water);
    assert_eq!(order.last(), Some(&FramePhase::Present));
}
