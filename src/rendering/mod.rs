//! Rendering system: wgpu device, scene resources and the per-frame stage
//! sequence.

pub mod assets;
pub mod caustics;
pub mod mesh;
pub mod program;
pub mod uniforms;

use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::error::{InitError, Result};
use crate::scene::{FramePhase, FrameState, Scene, StageSetup, StageTarget};
use crate::water::WaterPoint;
use caustics::{CausticsTexture, CAUSTICS_FORMAT};
use mesh::{floor_vertices, FloorVertex};
use program::{
    stage_source, ProgramDescriptor, ShaderProgram, UniformBinding, DEPTH_FORMAT, FRAME_BINDING,
    SURFACE_BINDINGS,
};
use uniforms::{FrameUniforms, UniformBuffer};

/// One compiled program per drawing stage
struct StagePrograms {
    caustics: ShaderProgram,
    skybox: ShaderProgram,
    floor: ShaderProgram,
    water: ShaderProgram,
}

impl StagePrograms {
    fn get(&self, phase: FramePhase) -> Option<&ShaderProgram> {
        match phase {
            FramePhase::Caustics => Some(&self.caustics),
            FramePhase::Skybox => Some(&self.skybox),
            FramePhase::Floor => Some(&self.floor),
            FramePhase::Water => Some(&self.water),
            FramePhase::Present => None,
        }
    }
}

/// Rendering system managing the wgpu device, scene resources and pipelines
pub struct RenderSystem {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    frame_uniforms: UniformBuffer<FrameUniforms>,
    frame_bind_group: wgpu::BindGroup,
    scene_bind_group: wgpu::BindGroup,
    caustics: CausticsTexture,
    water_vertex_buffer: wgpu::Buffer,
    water_index_buffer: wgpu::Buffer,
    water_index_count: u32,
    floor_vertex_buffer: wgpu::Buffer,
    programs: StagePrograms,
}

impl RenderSystem {
    /// Create the device, load assets and compile every stage
    pub async fn new(window: Arc<Window>, scene: &Scene) -> Result<Self> {
        let params = &scene.params;
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Window must have 'static lifetime via Arc
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(InitError::NoAdapter)?;
        let info = adapter.get_info();
        log::info!("Using adapter: {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(InitError::UnsupportedSurface)?;
        log::info!("Surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let depth_view = create_depth_view(&device, config.width, config.height);

        // Assets
        let floor_image = assets::load_rgba(&params.render.floor_texture_path())?;
        let cubemap = assets::load_cubemap_faces(&params.render.environment_dir())?;
        log::info!(
            "Loaded floor texture {}x{} and {}px environment cubemap",
            floor_image.width(),
            floor_image.height(),
            cubemap.size
        );

        let floor_texture =
            assets::upload_texture_2d(&device, &queue, "Floor Texture", &floor_image);
        let environment = assets::upload_cubemap(&device, &queue, &cubemap);
        let floor_view = floor_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let environment_view = environment.create_view(&wgpu::TextureViewDescriptor {
            label: Some("Environment View"),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });

        let repeat_sampler = create_sampler(&device, "Repeat Sampler", wgpu::AddressMode::Repeat);
        let clamp_sampler =
            create_sampler(&device, "Clamp Sampler", wgpu::AddressMode::ClampToEdge);

        let caustics = CausticsTexture::new(&device, params.pool.caustics_resolution);

        // Frame uniforms (group 0)
        let frame_uniforms = UniformBuffer::new(
            &device,
            &FrameUniforms::new(&FrameState::default(), params),
        );
        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: FRAME_BINDING.binding,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: FRAME_BINDING.binding,
                resource: frame_uniforms.binding(),
            }],
        });

        // Scene textures (group 1), slots in SURFACE_BINDINGS order
        let [env_slot, floor_slot, caustics_slot, repeat_slot, clamp_slot] = SURFACE_BINDINGS;
        let scene_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
            entries: &[
                texture_entry(env_slot, wgpu::TextureViewDimension::Cube),
                texture_entry(floor_slot, wgpu::TextureViewDimension::D2),
                texture_entry(caustics_slot, wgpu::TextureViewDimension::D2),
                sampler_entry(repeat_slot),
                sampler_entry(clamp_slot),
            ],
        });
        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &scene_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: env_slot.binding,
                    resource: wgpu::BindingResource::TextureView(&environment_view),
                },
                wgpu::BindGroupEntry {
                    binding: floor_slot.binding,
                    resource: wgpu::BindingResource::TextureView(&floor_view),
                },
                wgpu::BindGroupEntry {
                    binding: caustics_slot.binding,
                    resource: wgpu::BindingResource::TextureView(caustics.view()),
                },
                wgpu::BindGroupEntry {
                    binding: repeat_slot.binding,
                    resource: wgpu::BindingResource::Sampler(&repeat_sampler),
                },
                wgpu::BindGroupEntry {
                    binding: clamp_slot.binding,
                    resource: wgpu::BindingResource::Sampler(&clamp_sampler),
                },
            ],
        });

        // Meshes
        let water_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Water Vertex Buffer"),
            contents: bytemuck::cast_slice(&scene.grid.points),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let water_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Water Index Buffer"),
            contents: bytemuck::cast_slice(&scene.grid.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let floor_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Floor Vertex Buffer"),
            contents: bytemuck::cast_slice(&floor_vertices(&params.pool)),
            usage: wgpu::BufferUsages::VERTEX,
        });

        // Programs
        let frame_only = [&frame_layout];
        let with_scene = [&frame_layout, &scene_layout];
        let water_layout = [WaterPoint::buffer_layout()];
        let floor_layout = [FloorVertex::buffer_layout()];
        let surface_bindings: Vec<UniformBinding> = std::iter::once(FRAME_BINDING)
            .chain(SURFACE_BINDINGS)
            .collect();

        let format = config.format;
        let programs = StagePrograms {
            caustics: build_program(
                &device,
                FramePhase::Caustics,
                &frame_only,
                &water_layout,
                CAUSTICS_FORMAT,
                vec![FRAME_BINDING],
            )
            .await?,
            skybox: build_program(
                &device,
                FramePhase::Skybox,
                &with_scene,
                &[],
                format,
                surface_bindings.clone(),
            )
            .await?,
            floor: build_program(
                &device,
                FramePhase::Floor,
                &with_scene,
                &floor_layout,
                format,
                surface_bindings.clone(),
            )
            .await?,
            water: build_program(
                &device,
                FramePhase::Water,
                &with_scene,
                &water_layout,
                format,
                surface_bindings,
            )
            .await?,
        };
        log::info!("Compiled stage pipelines");

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_view,
            frame_uniforms,
            frame_bind_group,
            scene_bind_group,
            caustics,
            water_vertex_buffer,
            water_index_buffer,
            water_index_count: scene.grid.indices.len() as u32,
            floor_vertex_buffer,
            programs,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Reconfigure the surface and depth buffer for a new window size
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.reconfigure();
    }

    /// Reapply the current surface configuration (after loss or resize)
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, self.config.width, self.config.height);
    }

    /// Render one frame: upload the frame block, then run every stage in order
    pub fn render(
        &self,
        frame: &FrameState,
        scene: &Scene,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        // Every stage reads this single block, written before any encoding
        self.frame_uniforms
            .write(&self.queue, &FrameUniforms::new(frame, &scene.params));

        let output = self.surface.get_current_texture()?;
        let surface_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        for phase in FramePhase::sequence() {
            match (phase.setup(), self.programs.get(phase)) {
                (Some(setup), Some(program)) => {
                    self.encode_stage(&mut encoder, phase, setup, program, &surface_view)
                }
                // Present
                _ => break,
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn encode_stage(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        phase: FramePhase,
        setup: StageSetup,
        program: &ShaderProgram,
        surface_view: &wgpu::TextureView,
    ) {
        let (color, depth) = match setup.target {
            StageTarget::CausticsTexture => (self.caustics.attachment(setup.clear), None),
            StageTarget::Surface => {
                let (color_load, depth_load) = if setup.clear {
                    (
                        wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        wgpu::LoadOp::Clear(1.0),
                    )
                } else {
                    (wgpu::LoadOp::Load, wgpu::LoadOp::Load)
                };
                let color = wgpu::RenderPassColorAttachment {
                    view: surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: color_load,
                        store: wgpu::StoreOp::Store,
                    },
                };
                let depth = wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: depth_load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                };
                (color, Some(depth))
            }
        };

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(program.label()),
            color_attachments: &[Some(color)],
            depth_stencil_attachment: depth,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(program.pipeline());
        for (name, bind_group) in [
            (FRAME_BINDING.name, &self.frame_bind_group),
            ("environment_map", &self.scene_bind_group),
        ] {
            if let Some(slot) = program.binding(name) {
                pass.set_bind_group(slot.group, bind_group, &[]);
            }
        }

        match phase {
            FramePhase::Caustics | FramePhase::Water => {
                pass.set_vertex_buffer(0, self.water_vertex_buffer.slice(..));
                pass.set_index_buffer(self.water_index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..self.water_index_count, 0, 0..1);
            }
            // Fullscreen triangle
            FramePhase::Skybox => pass.draw(0..3, 0..1),
            FramePhase::Floor => {
                pass.set_vertex_buffer(0, self.floor_vertex_buffer.slice(..));
                pass.draw(0..6, 0..1);
            }
            FramePhase::Present => {}
        }
    }
}

/// Compile the pipeline for one drawing stage from its setup table entry
async fn build_program(
    device: &wgpu::Device,
    phase: FramePhase,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
    vertex_buffers: &[wgpu::VertexBufferLayout<'_>],
    color_format: wgpu::TextureFormat,
    bindings: Vec<UniformBinding>,
) -> Result<ShaderProgram> {
    let (Some(setup), Some(source)) = (phase.setup(), stage_source(phase)) else {
        return Err(InitError::Shader {
            label: phase.label().to_string(),
            message: "stage does not draw".to_string(),
        });
    };

    ShaderProgram::build(
        device,
        ProgramDescriptor {
            label: phase.label(),
            source,
            bind_group_layouts,
            bindings,
            vertex_buffers,
            color_format,
            setup,
            depth_attachment: setup.target == StageTarget::Surface,
        },
    )
    .await
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_sampler(
    device: &wgpu::Device,
    label: &str,
    address_mode: wgpu::AddressMode,
) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: address_mode,
        address_mode_v: address_mode,
        address_mode_w: address_mode,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    })
}

fn texture_entry(
    slot: UniformBinding,
    view_dimension: wgpu::TextureViewDimension,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: slot.binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(slot: UniformBinding) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: slot.binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}
