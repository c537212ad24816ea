//! Per-frame scene update and the ordered render stage sequence.

use glam::{Mat4, Vec3};

use crate::camera::FlyCamera;
use crate::input::InputState;
use crate::params::{LightingParams, SceneParams};
use crate::water::{WaterGrid, WaveField};

/// Everything every stage of one frame must agree on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    /// Animation time (seconds), frozen while paused
    pub time_s: f32,

    /// Water model transform
    pub model: Mat4,

    /// Unit vector towards the sun
    pub sun_direction: Vec3,

    pub view: Mat4,
    pub projection: Mat4,

    /// View without translation, used by the skybox
    pub sky_view: Mat4,

    pub camera_position: Vec3,
}

impl Default for FrameState {
    fn default() -> Self {
        Self {
            time_s: 0.0,
            model: Mat4::IDENTITY,
            sun_direction: LightingParams::default().sun_direction,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            sky_view: Mat4::IDENTITY,
            camera_position: Vec3::ZERO,
        }
    }
}

impl FrameState {
    pub fn view_proj(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Maps clip space back to world directions for the fullscreen sky
    pub fn sky_inv_view_proj(&self) -> Mat4 {
        (self.projection * self.sky_view).inverse()
    }
}

/// Animation clock that only advances while running
#[derive(Debug, Clone, Default)]
pub struct AnimationClock {
    time_s: f32,
    paused: bool,
}

impl AnimationClock {
    pub fn new(paused: bool) -> Self {
        Self {
            time_s: 0.0,
            paused,
        }
    }

    /// Advance by `dt` seconds unless paused, returning the current time
    pub fn advance(&mut self, dt: f32) -> f32 {
        if !self.paused {
            self.time_s += dt.max(0.0);
        }
        self.time_s
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

/// Stages of one frame, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePhase {
    Caustics,
    Skybox,
    Floor,
    Water,
    Present,
}

/// Where a stage draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageTarget {
    CausticsTexture,
    Surface,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blending {
    Opaque,
    Additive,
}

/// Fixed pipeline state for a drawing stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSetup {
    pub target: StageTarget,
    pub depth_test: bool,
    pub blending: Blending,
    /// Clear the target on entry instead of loading it
    pub clear: bool,
}

impl FramePhase {
    pub const FIRST: FramePhase = FramePhase::Caustics;

    /// Following stage, `None` after `Present`
    pub fn next(self) -> Option<FramePhase> {
        match self {
            FramePhase::Caustics => Some(FramePhase::Skybox),
            FramePhase::Skybox => Some(FramePhase::Floor),
            FramePhase::Floor => Some(FramePhase::Water),
            FramePhase::Water => Some(FramePhase::Present),
            FramePhase::Present => None,
        }
    }

    /// Every stage of a frame in order
    pub fn sequence() -> impl Iterator<Item = FramePhase> {
        std::iter::successors(Some(Self::FIRST), |phase| phase.next())
    }

    pub fn label(self) -> &'static str {
        match self {
            FramePhase::Caustics => "Caustics Stage",
            FramePhase::Skybox => "Skybox Stage",
            FramePhase::Floor => "Floor Stage",
            FramePhase::Water => "Water Stage",
            FramePhase::Present => "Present",
        }
    }

    /// Pipeline state for drawing stages, `None` for `Present`
    pub fn setup(self) -> Option<StageSetup> {
        let setup = match self {
            FramePhase::Caustics => StageSetup {
                target: StageTarget::CausticsTexture,
                depth_test: false,
                blending: Blending::Additive,
                clear: true,
            },
            FramePhase::Skybox => StageSetup {
                target: StageTarget::Surface,
                depth_test: false,
                blending: Blending::Opaque,
                clear: true,
            },
            FramePhase::Floor | FramePhase::Water => StageSetup {
                target: StageTarget::Surface,
                depth_test: true,
                blending: Blending::Opaque,
                clear: false,
            },
            FramePhase::Present => return None,
        };
        Some(setup)
    }
}

/// CPU-side scene: parameters, camera, clock and the water model
pub struct Scene {
    pub params: SceneParams,
    pub camera: FlyCamera,
    pub clock: AnimationClock,
    pub wave: WaveField,
    pub grid: WaterGrid,
}

impl Scene {
    pub fn new(params: SceneParams) -> Self {
        let camera = FlyCamera::new(&params.camera, &params.render);
        let clock = AnimationClock::new(params.render.start_paused);
        let wave = WaveField::new(params.wave.clone());
        let grid = WaterGrid::new(&params.pool);

        Self {
            params,
            camera,
            clock,
            wave,
            grid,
        }
    }

    /// Run one frame of simulation: input, clock, camera, frame state
    pub fn update(&mut self, input: &mut InputState, dt: f32) -> FrameState {
        if input.take_pause_toggle() {
            self.clock.toggle_pause();
            log::info!(
                "Animation {}",
                if self.clock.is_paused() { "paused" } else { "resumed" }
            );
        }

        let time_s = self.clock.advance(dt);
        self.camera.update(input, dt);

        FrameState {
            time_s,
            model: Mat4::IDENTITY,
            sun_direction: self.params.lighting.sun_direction,
            view: self.camera.view_matrix(),
            projection: self.camera.projection_matrix(),
            sky_view: self.camera.sky_view_matrix(),
            camera_position: self.camera.position,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.params.render.window_width = width;
        self.params.render.window_height = height;
        self.camera.set_aspect(width, height);
    }
}
