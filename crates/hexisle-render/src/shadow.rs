//! Point-light shadow map.
//!
//! The light sits above the island, so a single downward perspective map
//! covers everything below it. Terrain and clouds are rendered depth-only from
//! the light, and receivers compare against the map with a 3x3 PCF kernel in
//! the PBR shader.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use hexisle_mesh::MESH_VERTEX_LAYOUT;

use crate::buffer::MeshBuffer;
use crate::depth::DepthBuffer;

/// Depth-only pass from the light. Only positions are read.
pub const SHADOW_SHADER_SOURCE: &str = r#"
struct ShadowUniform {
    view_proj: mat4x4<f32>,
    params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> shadow: ShadowUniform;

@vertex
fn vs_shadow(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return shadow.view_proj * vec4<f32>(position, 1.0);
}
"#;

/// Shadow map settings chosen at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowSettings {
    pub enabled: bool,
    /// Width and height of the square depth map.
    pub map_size: u32,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            map_size: 1024,
        }
    }
}

/// Shadow camera clip planes, in world units from the light.
pub const SHADOW_NEAR: f32 = 0.5;
pub const SHADOW_FAR: f32 = 500.0;

/// Widest half-angle the shadow frustum may open to, about 80 degrees.
const MAX_TAN_HALF_FOV: f32 = 5.67;
/// Extra room around the fitted receivers.
const FIT_MARGIN: f32 = 1.05;

/// `@group(1) @binding(1)` in the PBR shader and `@group(0)` in the depth pass.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ShadowUniform {
    pub view_proj: [f32; 16],
    /// x = enabled flag, y = one texel in UV units.
    pub params: [f32; 4],
}

static_assertions::const_assert_eq!(std::mem::size_of::<ShadowUniform>(), 80);

impl ShadowUniform {
    pub fn new(view_proj: Mat4, settings: &ShadowSettings) -> Self {
        Self {
            view_proj: view_proj.to_cols_array(),
            params: [
                if settings.enabled { 1.0 } else { 0.0 },
                1.0 / settings.map_size.max(1) as f32,
                0.0,
                0.0,
            ],
        }
    }
}

/// Reverse-Z view-projection looking straight down from `light`, opened just
/// wide enough to contain every receiver corner below the light.
///
/// Corners at or above the light cannot be covered by a downward frustum and
/// are ignored; anything outside the map is treated as lit.
pub fn fit_light_view_proj(
    light: Vec3,
    receivers: impl IntoIterator<Item = (Vec3, Vec3)>,
) -> Mat4 {
    let view = Mat4::look_to_rh(light, Vec3::NEG_Y, Vec3::NEG_Z);

    let mut tan_half = 0.0f32;
    for (lo, hi) in receivers {
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { lo.x } else { hi.x },
                if i & 2 == 0 { lo.y } else { hi.y },
                if i & 4 == 0 { lo.z } else { hi.z },
            );
            let p = view.transform_point3(corner);
            let depth = -p.z;
            if depth <= SHADOW_NEAR {
                continue;
            }
            tan_half = tan_half.max(p.x.abs().max(p.y.abs()) / depth);
        }
    }
    if tan_half == 0.0 {
        tan_half = 1.0;
    }
    let tan_half = (tan_half * FIT_MARGIN).min(MAX_TAN_HALF_FOV);

    let proj = Mat4::perspective_rh(2.0 * tan_half.atan(), 1.0, SHADOW_FAR, SHADOW_NEAR);
    proj * view
}

/// Depth target the light renders into, plus the comparison sampler used to
/// read it back.
pub struct ShadowMap {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    size: u32,
}

impl ShadowMap {
    pub fn new(device: &wgpu::Device, size: u32) -> Self {
        let size = size.max(1);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("shadow-map"),
            size: wgpu::Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DepthBuffer::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("shadow-comparison-sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            // reverse-Z: lit when the receiver is at least as close as the caster
            compare: Some(wgpu::CompareFunction::GreaterEqual),
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            size,
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }
}

/// Depth-only pipeline for the shadow casters.
pub struct ShadowPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub uniform_layout: wgpu::BindGroupLayout,
}

impl ShadowPipeline {
    pub fn new(device: &wgpu::Device) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shadow-shader"),
            source: wgpu::ShaderSource::Wgsl(SHADOW_SHADER_SOURCE.into()),
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("shadow-uniform-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(std::mem::size_of::<ShadowUniform>() as u64),
                },
                count: None,
            }],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("shadow-pipeline-layout"),
            bind_group_layouts: &[&uniform_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("shadow-depth-pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_shadow"),
                buffers: &[MESH_VERTEX_LAYOUT],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DepthBuffer::FORMAT,
                depth_write_enabled: true,
                depth_compare: DepthBuffer::COMPARE_FUNCTION,
                stencil: wgpu::StencilState::default(),
                // Negative under reverse-Z, pushing casters away from the light.
                bias: wgpu::DepthBiasState {
                    constant: -2,
                    slope_scale: -1.75,
                    clamp: 0.0,
                },
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: None,
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            uniform_layout,
        }
    }
}

/// Clears `map` and draws every caster into it.
pub fn render_shadow_map<'a>(
    encoder: &mut wgpu::CommandEncoder,
    pipeline: &ShadowPipeline,
    map: &ShadowMap,
    uniform: &wgpu::BindGroup,
    casters: impl IntoIterator<Item = &'a MeshBuffer>,
) {
    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("shadow-pass"),
        color_attachments: &[],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: &map.view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(DepthBuffer::CLEAR_VALUE),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }),
        ..Default::default()
    });
    pass.set_pipeline(&pipeline.pipeline);
    pass.set_bind_group(0, uniform, &[]);
    for mesh in casters {
        mesh.draw(&mut pass);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_test_device_queue;

    const LIGHT: Vec3 = Vec3::new(10.0, 20.0, 10.0);

    fn corners(lo: Vec3, hi: Vec3) -> impl Iterator<Item = Vec3> {
        (0..8).map(move |i| {
            Vec3::new(
                if i & 1 == 0 { lo.x } else { hi.x },
                if i & 2 == 0 { lo.y } else { hi.y },
                if i & 4 == 0 { lo.z } else { hi.z },
            )
        })
    }

    #[test]
    fn test_uniform_packing() {
        let settings = ShadowSettings {
            enabled: true,
            map_size: 1024,
        };
        let uniform = ShadowUniform::new(Mat4::IDENTITY, &settings);
        assert_eq!(uniform.view_proj, Mat4::IDENTITY.to_cols_array());
        assert_eq!(uniform.params[0], 1.0);
        assert_eq!(uniform.params[1], 1.0 / 1024.0);

        let disabled = ShadowSettings {
            enabled: false,
            ..settings
        };
        let off = ShadowUniform::new(Mat4::IDENTITY, &disabled);
        assert_eq!(off.params[0], 0.0);
    }

    #[test]
    fn test_island_fits_inside_the_map() {
        // Water disc and terrain at the reference sizes.
        let receivers = [
            (Vec3::new(-50.0, 0.0, -50.0), Vec3::new(50.0, 2.0, 50.0)),
            (Vec3::new(-17.0, 0.0, -17.0), Vec3::new(17.0, 10.0, 17.0)),
        ];
        let view_proj = fit_light_view_proj(LIGHT, receivers);
        for corner in receivers.iter().flat_map(|&(lo, hi)| corners(lo, hi)) {
            let ndc = view_proj.project_point3(corner);
            assert!(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0, "{corner} -> {ndc}");
            // reverse-Z: depth in (0, 1], nearer is larger
            assert!(ndc.z > 0.0 && ndc.z <= 1.0, "{corner} -> {ndc}");
        }
    }

    #[test]
    fn test_nearer_points_get_larger_depth() {
        let view_proj = fit_light_view_proj(LIGHT, [(Vec3::splat(-10.0), Vec3::splat(10.0))]);
        let high = view_proj.project_point3(Vec3::new(10.0, 10.0, 10.0));
        let low = view_proj.project_point3(Vec3::new(10.0, 0.0, 10.0));
        assert!(high.z > low.z);
        assert!(high.x.abs() < 1e-5 && high.y.abs() < 1e-5);
    }

    #[test]
    fn test_corners_level_with_light_do_not_blow_up() {
        let view_proj = fit_light_view_proj(
            LIGHT,
            [(Vec3::new(-500.0, 0.0, -500.0), Vec3::new(500.0, 25.0, 500.0))],
        );
        assert!(view_proj.to_cols_array().iter().all(|v| v.is_finite()));

        let empty = fit_light_view_proj(LIGHT, std::iter::empty());
        assert!(empty.to_cols_array().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_shadow_resources_build() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let map = ShadowMap::new(&device, 0);
        assert_eq!(map.size(), 1);
        assert_eq!(map.texture.format(), wgpu::TextureFormat::Depth32Float);
        let _ = ShadowPipeline::new(&device);
    }
}
