//! Bind group layouts and the three pipeline variants used by the island.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use hexisle_materials::{MaterialDesc, MaterialUniform};
use hexisle_mesh::MESH_VERTEX_LAYOUT;
use hexisle_scene::PointLight;

use crate::camera::CameraUniform;
use crate::depth::DepthBuffer;
use crate::shader::PBR_SHADER_SOURCE;
use crate::shadow::ShadowUniform;

/// `@group(1) @binding(0)`. The shadow uniform, map and comparison sampler
/// follow at bindings 1 to 3.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct LightUniform {
    pub position_range: [f32; 4],
    pub color_intensity: [f32; 4],
    /// x = exposure.
    pub params: [f32; 4],
}

static_assertions::const_assert_eq!(std::mem::size_of::<LightUniform>(), 48);

impl LightUniform {
    pub fn new(light: &PointLight, exposure: f32) -> Self {
        Self {
            position_range: light.position.extend(light.range).to_array(),
            color_intensity: light.color.extend(light.intensity).to_array(),
            params: [exposure, 0.0, 0.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineVariant {
    /// Back faces culled, depth written.
    Opaque,
    /// Both faces drawn, depth written.
    DoubleSided,
    /// Alpha blended over what is already drawn; tests depth but does not write it.
    Transparent,
}

impl PipelineVariant {
    pub fn for_material(material: &MaterialDesc) -> Self {
        if material.transparent {
            Self::Transparent
        } else if material.double_sided {
            Self::DoubleSided
        } else {
            Self::Opaque
        }
    }

    fn cull_mode(self) -> Option<wgpu::Face> {
        match self {
            Self::Opaque => Some(wgpu::Face::Back),
            Self::DoubleSided | Self::Transparent => None,
        }
    }

    fn blend(self) -> Option<wgpu::BlendState> {
        match self {
            Self::Transparent => Some(wgpu::BlendState::ALPHA_BLENDING),
            Self::Opaque | Self::DoubleSided => None,
        }
    }

    fn writes_depth(self) -> bool {
        !matches!(self, Self::Transparent)
    }

    fn label(self) -> &'static str {
        match self {
            Self::Opaque => "pbr-opaque",
            Self::DoubleSided => "pbr-double-sided",
            Self::Transparent => "pbr-transparent",
        }
    }
}

pub struct PbrPipeline {
    pub camera_layout: wgpu::BindGroupLayout,
    pub light_layout: wgpu::BindGroupLayout,
    pub material_layout: wgpu::BindGroupLayout,
    pub environment_layout: wgpu::BindGroupLayout,
    opaque: wgpu::RenderPipeline,
    double_sided: wgpu::RenderPipeline,
    transparent: wgpu::RenderPipeline,
}

impl PbrPipeline {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("pbr-shader"),
            source: wgpu::ShaderSource::Wgsl(PBR_SHADER_SOURCE.into()),
        });

        let camera_layout = uniform_layout(
            device,
            "camera-layout",
            wgpu::ShaderStages::VERTEX_FRAGMENT,
            std::mem::size_of::<CameraUniform>() as u64,
        );
        let fragment_uniform = |binding, size: usize| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(size as u64),
            },
            count: None,
        };
        let light_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("light-layout"),
            entries: &[
                fragment_uniform(0, std::mem::size_of::<LightUniform>()),
                fragment_uniform(1, std::mem::size_of::<ShadowUniform>()),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                    count: None,
                },
            ],
        });

        let filtered_texture = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };
        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material-layout"),
            entries: &[
                fragment_uniform(0, std::mem::size_of::<MaterialUniform>()),
                filtered_texture(1),
                filtered_texture(2),
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let environment_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("environment-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: false },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            }],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pbr-pipeline-layout"),
            bind_group_layouts: &[
                &camera_layout,
                &light_layout,
                &material_layout,
                &environment_layout,
            ],
            immediate_size: 0,
        });

        let build = |variant: PipelineVariant| {
            create_variant(device, &layout, &shader, surface_format, variant)
        };

        Self {
            opaque: build(PipelineVariant::Opaque),
            double_sided: build(PipelineVariant::DoubleSided),
            transparent: build(PipelineVariant::Transparent),
            camera_layout,
            light_layout,
            material_layout,
            environment_layout,
        }
    }

    pub fn pipeline(&self, variant: PipelineVariant) -> &wgpu::RenderPipeline {
        match variant {
            PipelineVariant::Opaque => &self.opaque,
            PipelineVariant::DoubleSided => &self.double_sided,
            PipelineVariant::Transparent => &self.transparent,
        }
    }
}

fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    visibility: wgpu::ShaderStages,
    size: u64,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(size),
            },
            count: None,
        }],
    })
}

fn create_variant(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    surface_format: wgpu::TextureFormat,
    variant: PipelineVariant,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(variant.label()),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[MESH_VERTEX_LAYOUT],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: variant.cull_mode(),
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(DepthBuffer::depth_stencil_state(variant.writes_depth())),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: variant.blend(),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview_mask: None,
        cache: None,
    })
}
