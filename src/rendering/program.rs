//! Shader programs: composed WGSL, a compiled pipeline and its binding table.

use crate::error::{InitError, Result};
use crate::scene::{Blending, FramePhase, StageSetup};

pub const FRAME_WGSL: &str = include_str!("shaders/frame.wgsl");
pub const SURFACE_WGSL: &str = include_str!("shaders/surface.wgsl");
pub const CAUSTICS_WGSL: &str = include_str!("shaders/caustics.wgsl");
pub const SKYBOX_WGSL: &str = include_str!("shaders/skybox.wgsl");
pub const FLOOR_WGSL: &str = include_str!("shaders/floor.wgsl");
pub const WATER_WGSL: &str = include_str!("shaders/water.wgsl");

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Full WGSL module for a drawing stage, `None` for `Present`
pub fn stage_source(phase: FramePhase) -> Option<String> {
    let parts: &[&str] = match phase {
        FramePhase::Caustics => &[FRAME_WGSL, CAUSTICS_WGSL],
        FramePhase::Skybox => &[FRAME_WGSL, SURFACE_WGSL, SKYBOX_WGSL],
        FramePhase::Floor => &[FRAME_WGSL, SURFACE_WGSL, FLOOR_WGSL],
        FramePhase::Water => &[FRAME_WGSL, SURFACE_WGSL, WATER_WGSL],
        FramePhase::Present => return None,
    };
    Some(compose(parts))
}

/// Concatenate WGSL snippets into one module
pub fn compose(parts: &[&str]) -> String {
    parts.join("\n")
}

/// A named resource slot in a program's interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformBinding {
    pub name: &'static str,
    pub group: u32,
    pub binding: u32,
}

pub const FRAME_BINDING: UniformBinding = UniformBinding {
    name: "frame",
    group: 0,
    binding: 0,
};

/// Bindings of `shaders/surface.wgsl`
pub const SURFACE_BINDINGS: [UniformBinding; 5] = [
    UniformBinding {
        name: "environment_map",
        group: 1,
        binding: 0,
    },
    UniformBinding {
        name: "floor_texture",
        group: 1,
        binding: 1,
    },
    UniformBinding {
        name: "caustics_texture",
        group: 1,
        binding: 2,
    },
    UniformBinding {
        name: "repeat_sampler",
        group: 1,
        binding: 3,
    },
    UniformBinding {
        name: "clamp_sampler",
        group: 1,
        binding: 4,
    },
];

/// Everything needed to build one stage's pipeline
pub struct ProgramDescriptor<'a> {
    pub label: &'static str,
    pub source: String,
    pub bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    pub bindings: Vec<UniformBinding>,
    pub vertex_buffers: &'a [wgpu::VertexBufferLayout<'a>],
    pub color_format: wgpu::TextureFormat,
    pub setup: StageSetup,
    /// Whether the pass carries a depth attachment at all
    pub depth_attachment: bool,
}

/// Compiled pipeline plus the names of the resources it binds
pub struct ShaderProgram {
    label: &'static str,
    pipeline: wgpu::RenderPipeline,
    bindings: Vec<UniformBinding>,
}

impl ShaderProgram {
    /// Compile and validate, turning validation errors into [`InitError::Shader`]
    pub async fn build(device: &wgpu::Device, desc: ProgramDescriptor<'_>) -> Result<Self> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(desc.label),
            source: wgpu::ShaderSource::Wgsl(desc.source.into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(desc.label),
            bind_group_layouts: desc.bind_group_layouts,
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some("vs_main"),
                buffers: desc.vertex_buffers,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: desc.color_format,
                    blend: blend_state(desc.setup.blending),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Water is seen from both sides and projected caustics may fold
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: desc
                .depth_attachment
                .then(|| depth_state(desc.setup.depth_test)),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        if let Some(error) = device.pop_error_scope().await {
            return Err(InitError::Shader {
                label: desc.label.to_string(),
                message: error.to_string(),
            });
        }

        log::debug!("Compiled shader program '{}'", desc.label);

        Ok(Self {
            label: desc.label,
            pipeline,
            bindings: desc.bindings,
        })
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    /// Look up a binding slot by its WGSL name
    pub fn binding(&self, name: &str) -> Option<UniformBinding> {
        find_binding(&self.bindings, name)
    }
}

fn find_binding(bindings: &[UniformBinding], name: &str) -> Option<UniformBinding> {
    bindings.iter().copied().find(|b| b.name == name)
}

pub fn blend_state(blending: Blending) -> Option<wgpu::BlendState> {
    match blending {
        Blending::Opaque => None,
        Blending::Additive => {
            let add = wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            };
            Some(wgpu::BlendState {
                color: add,
                alpha: add,
            })
        }
    }
}

/// Depth state for a pass that has a depth attachment
///
/// Stages without depth testing still need a matching format; they neither
/// test nor write.
pub fn depth_state(depth_test: bool) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: depth_test,
        depth_compare: if depth_test {
            wgpu::CompareFunction::Less
        } else {
            wgpu::CompareFunction::Always
        },
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::uniforms::FrameUniforms;

    fn validate(label: &str, source: &str) -> naga::Module {
        let module = naga::front::wgsl::parse_str(source)
            .unwrap_or_else(|e| panic!("{} failed to parse: {}", label, e.emit_to_string(source)));
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(&module)
        .unwrap_or_else(|e| panic!("{} failed validation: {:?}", label, e));
        module
    }

    #[test]
    fn test_stage_shaders_validate() {
        for phase in FramePhase::sequence() {
            let Some(source) = stage_source(phase) else {
                assert_eq!(phase, FramePhase::Present);
                continue;
            };
            let label = format!("{:?}", phase);
            let module = validate(&label, &source);
            let stages: Vec<_> = module.entry_points.iter().map(|e| e.stage).collect();
            assert!(stages.contains(&naga::ShaderStage::Vertex), "{} has no vertex entry", label);
            assert!(
                stages.contains(&naga::ShaderStage::Fragment),
                "{} has no fragment entry",
                label
            );
        }
    }

    #[test]
    fn test_surface_bindings_match_shader() {
        let module = validate("surface", &compose(&[FRAME_WGSL, SURFACE_WGSL]));
        for expected in SURFACE_BINDINGS.iter().chain([&FRAME_BINDING]) {
            let found = module.global_variables.iter().any(|(_, var)| {
                var.name.as_deref() == Some(expected.name)
                    && var.binding
                        == Some(naga::ResourceBinding {
                            group: expected.group,
                            binding: expected.binding,
                        })
            });
            assert!(found, "Binding {:?} missing from WGSL", expected);
        }
    }

    #[test]
    fn test_frame_block_size_matches_uniforms() {
        let module = validate("frame", FRAME_WGSL);
        let (_, frame_type) = module
            .types
            .iter()
            .find(|(_, ty)| ty.name.as_deref() == Some("Frame"))
            .expect("Frame struct");
        match frame_type.inner {
            naga::TypeInner::Struct { span, .. } => assert_eq!(
                span as usize,
                std::mem::size_of::<FrameUniforms>()
            ),
            ref other => panic!("Frame is not a struct: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_caustics_vertex_discards_its_triangle() {
        let source = stage_source(FramePhase::Caustics).unwrap();
        let module = validate("caustics", &source);
        let (_, invalid) = module
            .constants
            .iter()
            .find(|(_, c)| c.name.as_deref() == Some("INVALID_VERTEX"))
            .expect("INVALID_VERTEX constant");
        let value = match module.global_expressions[invalid.init] {
            naga::Expression::Literal(naga::Literal::F32(v)) => v,
            ref other => panic!("INVALID_VERTEX is not an f32 literal: {:?}", other),
        };

        // A fragment weighted even slightly towards an invalid corner must
        // fall below the discard threshold
        for weight in [1e-6_f32, 1e-3, 0.5, 1.0] {
            let interpolated = (1.0 - weight) + weight * value;
            assert!(interpolated < 0.999, "weight {} interpolates to {}", weight, interpolated);
        }
    }

    #[test]
    fn test_binding_lookup() {
        assert_eq!(
            find_binding(&SURFACE_BINDINGS, "caustics_texture"),
            Some(SURFACE_BINDINGS[2])
        );
        assert_eq!(find_binding(&SURFACE_BINDINGS, "missing"), None);
    }

    #[test]
    fn test_stage_setup_maps_to_pipeline_state() {
        let caustics = FramePhase::Caustics.setup().unwrap();
        let blend = blend_state(caustics.blending).unwrap();
        assert_eq!(blend.color.src_factor, wgpu::BlendFactor::One);
        assert_eq!(blend.alpha.dst_factor, wgpu::BlendFactor::One);

        let sky = depth_state(FramePhase::Skybox.setup().unwrap().depth_test);
        assert_eq!(sky.depth_compare, wgpu::CompareFunction::Always);
        assert!(!sky.depth_write_enabled);

        let water = depth_state(FramePhase::Water.setup().unwrap().depth_test);
        assert_eq!(water.depth_compare, wgpu::CompareFunction::Less);
        assert!(water.depth_write_enabled);
        assert!(blend_state(Blending::Opaque).is_none());
    }
}
