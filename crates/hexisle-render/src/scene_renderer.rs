//! Draws a finished island. Everything is uploaded once in
//! [`SceneRenderer::new`]; per frame only the camera uniform changes. Each
//! frame first redraws the shadow casters from the light, then the scene.

use glam::Vec3;
use hexisle_materials::{MaterialDesc, Rgba8Image, TextureSet, TextureSlot};
use hexisle_scene::SceneGraph;

use crate::buffer::{BufferAllocator, MeshBuffer};
use crate::camera::Camera;
use crate::depth::DepthBuffer;
use crate::pbr_pipeline::{LightUniform, PbrPipeline, PipelineVariant};
use crate::shadow::{
    ShadowMap, ShadowPipeline, ShadowSettings, ShadowUniform, fit_light_view_proj,
    render_shadow_map,
};
use crate::texture::{
    GpuTexture, TextureError, create_material_sampler, upload_env_map, upload_rgba8,
};

/// Look settings fixed for the lifetime of a renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub exposure: f32,
    pub shadows: ShadowSettings,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            exposure: 1.0,
            shadows: ShadowSettings::default(),
        }
    }
}

struct DrawItem {
    name: &'static str,
    mesh: MeshBuffer,
    material: wgpu::BindGroup,
    variant: PipelineVariant,
    casts_shadow: bool,
}

pub struct SceneRenderer {
    pipeline: PbrPipeline,
    shadow_pipeline: ShadowPipeline,
    shadow_map: ShadowMap,
    shadow_bind_group: wgpu::BindGroup,
    shadows_enabled: bool,
    depth: DepthBuffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    light_bind_group: wgpu::BindGroup,
    environment_bind_group: wgpu::BindGroup,
    draws: Vec<DrawItem>,
    clear_color: wgpu::Color,
}

impl SceneRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        size: (u32, u32),
        scene: &SceneGraph,
        textures: &TextureSet,
        settings: &RenderSettings,
    ) -> Result<Self, TextureError> {
        let pipeline = PbrPipeline::new(device, surface_format);
        let allocator = BufferAllocator::new(device);

        let camera_uniform = Camera::default().to_uniform();
        let camera_buffer = allocator.create_uniform("camera-uniform", &camera_uniform);
        let camera_bind_group =
            single_buffer_group(device, &pipeline.camera_layout, &camera_buffer, "camera");

        let shadows = settings.shadows;
        let shadow_pipeline = ShadowPipeline::new(device);
        // A disabled map is still bound, so keep it as small as possible.
        let shadow_map = ShadowMap::new(device, if shadows.enabled { shadows.map_size } else { 1 });
        let receivers = scene
            .renderables()
            .filter(|r| r.material.receive_shadow)
            .filter_map(|r| r.geometry.bounds());
        let light_view_proj = fit_light_view_proj(scene.light.position, receivers);
        let shadow_buffer = allocator.create_uniform(
            "shadow-uniform",
            &ShadowUniform::new(light_view_proj, &shadows),
        );
        let shadow_bind_group = single_buffer_group(
            device,
            &shadow_pipeline.uniform_layout,
            &shadow_buffer,
            "shadow",
        );

        let light_uniform = LightUniform::new(&scene.light, settings.exposure);
        let light_buffer = allocator.create_uniform("light-uniform", &light_uniform);
        let light_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("light"),
            layout: &pipeline.light_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: light_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: shadow_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&shadow_map.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&shadow_map.sampler),
                },
            ],
        });

        let env = upload_env_map(device, queue, textures.env_map())?;
        let environment_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("environment-bind-group"),
            layout: &pipeline.environment_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&env.view),
            }],
        });

        let slots = TextureSlot::ALL
            .iter()
            .map(|&slot| {
                upload_rgba8(device, queue, slot.file_name(), textures.get(slot), slot.is_srgb())
            })
            .collect::<Result<Vec<_>, _>>()?;
        let white = Rgba8Image::solid([255, 255, 255, 255]);
        let white_srgb = upload_rgba8(device, queue, "white-srgb", &white, true)?;
        let white_linear = upload_rgba8(device, queue, "white-linear", &white, false)?;
        let sampler = create_material_sampler(device);

        let mut draws = Vec::new();
        for renderable in scene.renderables() {
            let material = &renderable.material;
            let Some(mesh) = allocator.create_mesh(material.name, &renderable.geometry) else {
                log::debug!("Skipping empty batch '{}'", material.name);
                continue;
            };
            let base = material.base_map.map_or(&white_srgb, |slot| &slots[slot.index()]);
            let data = material
                .roughness_metalness_map
                .map_or(&white_linear, |slot| &slots[slot.index()]);
            let bind_group =
                material_group(device, &pipeline, &allocator, material, base, data, &sampler);
            draws.push(DrawItem {
                name: material.name,
                mesh,
                material: bind_group,
                variant: PipelineVariant::for_material(material),
                casts_shadow: material.cast_shadow,
            });
        }
        // Stable, so terrain keeps its order and water stays after the opaque set.
        draws.sort_by_key(|d| d.variant == PipelineVariant::Transparent);
        log::info!("Uploaded {} draw batches", draws.len());
        if shadows.enabled {
            log::info!(
                "Shadow map {0}x{0}, {1} casters",
                shadows.map_size,
                draws.iter().filter(|d| d.casts_shadow).count()
            );
        }

        Ok(Self {
            depth: DepthBuffer::new(device, size.0, size.1),
            pipeline,
            shadow_pipeline,
            shadow_map,
            shadow_bind_group,
            shadows_enabled: shadows.enabled,
            camera_buffer,
            camera_bind_group,
            light_bind_group,
            environment_bind_group,
            draws,
            clear_color: clear_color(scene.background),
        })
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth.resize(device, width, height);
    }

    pub fn draw_count(&self) -> usize {
        self.draws.len()
    }

    pub fn draw_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.draws.iter().map(|d| d.name)
    }

    /// Names of the batches drawn into the shadow map, empty when shadows are off.
    pub fn shadow_caster_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.draws
            .iter()
            .filter(|d| self.shadows_enabled && d.casts_shadow)
            .map(|d| d.name)
    }

    pub fn shadow_map_size(&self) -> u32 {
        self.shadow_map.size()
    }

    /// Records and submits one frame into `target`, which must match the
    /// size last passed to [`Self::resize`].
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        camera: &Camera,
    ) {
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&camera.to_uniform()));

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("island-frame"),
        });
        if self.shadows_enabled {
            let casters = self.draws.iter().filter(|d| d.casts_shadow).map(|d| &d.mesh);
            render_shadow_map(
                &mut encoder,
                &self.shadow_pipeline,
                &self.shadow_map,
                &self.shadow_bind_group,
                casters,
            );
        }
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("island-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(self.depth.attachment()),
                ..Default::default()
            });

            pass.set_bind_group(0, &self.camera_bind_group, &[]);
            pass.set_bind_group(1, &self.light_bind_group, &[]);
            pass.set_bind_group(3, &self.environment_bind_group, &[]);
            let mut bound = None;
            for draw in &self.draws {
                if bound != Some(draw.variant) {
                    pass.set_pipeline(self.pipeline.pipeline(draw.variant));
                    bound = Some(draw.variant);
                }
                pass.set_bind_group(2, &draw.material, &[]);
                draw.mesh.draw(&mut pass);
            }
        }
        queue.submit(std::iter::once(encoder.finish()));
    }
}

fn clear_color(background: Vec3) -> wgpu::Color {
    wgpu::Color {
        r: background.x as f64,
        g: background.y as f64,
        b: background.z as f64,
        a: 1.0,
    }
}

fn single_buffer_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    })
}

fn material_group(
    device: &wgpu::Device,
    pipeline: &PbrPipeline,
    allocator: &BufferAllocator<'_>,
    material: &MaterialDesc,
    base: &GpuTexture,
    data: &GpuTexture,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    let uniform =
        allocator.create_uniform(&format!("{}-material", material.name), &material.to_uniform());
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(material.name),
        layout: &pipeline.material_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&base.view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::TextureView(&data.view),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_test_device_queue;
    use hexisle_scene::{SceneParams, generate};

    fn small_scene() -> SceneGraph {
        let mut params = SceneParams::default();
        params.terrain.range = hexisle_terrain::TileRange::new(-12, 12);
        params.terrain.cull_radius = 10.0;
        generate(params, 3)
    }

    #[test]
    fn test_clear_color_is_background() {
        let color = clear_color(Vec3::new(1.0, 0.5, 0.25));
        assert_eq!((color.r, color.g, color.b, color.a), (1.0, 0.5, 0.25, 1.0));
    }

    #[test]
    fn test_renders_offscreen_with_water_last() {
        let Some((device, queue)) = create_test_device_queue() else {
            return;
        };
        let format = wgpu::TextureFormat::Rgba8UnormSrgb;
        let scene = small_scene();
        let renderer = SceneRenderer::new(
            &device,
            &queue,
            format,
            (64, 48),
            &scene,
            &TextureSet::placeholder(),
            &RenderSettings::default(),
        )
        .unwrap();

        let expected = scene
            .renderables()
            .filter(|r| !r.geometry.is_empty())
            .count();
        assert_eq!(renderer.draw_count(), expected);
        assert_eq!(renderer.draw_names().last(), Some("water"));

        let target = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen"),
            size: wgpu::Extent3d {
                width: 64,
                height: 48,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = target.create_view(&wgpu::TextureViewDescriptor::default());
        let mut camera = Camera::default();
        camera.set_aspect_ratio(64, 48);
        renderer.render(&device, &queue, &view, &camera);
    }

    #[test]
    fn test_terrain_and_clouds_cast_shadows() {
        let Some((device, queue)) = create_test_device_queue() else {
            return;
        };
        let scene = small_scene();
        let build = |settings: &RenderSettings| {
            SceneRenderer::new(
                &device,
                &queue,
                wgpu::TextureFormat::Rgba8UnormSrgb,
                (32, 32),
                &scene,
                &TextureSet::placeholder(),
                settings,
            )
            .unwrap()
        };

        let renderer = build(&RenderSettings::default());
        assert_eq!(renderer.shadow_map_size(), 1024);
        let casters: Vec<_> = renderer.shadow_caster_names().collect();
        assert!(casters.contains(&"cloud"));
        assert!(casters.iter().any(|name| scene.terrain.iter().any(|t| t.material.name == *name)));
        for set_piece in ["water", "basin_wall", "basin_floor"] {
            assert!(!casters.contains(&set_piece), "{set_piece} should only receive");
        }

        let settings = RenderSettings {
            shadows: ShadowSettings {
                enabled: false,
                map_size: 1024,
            },
            ..RenderSettings::default()
        };
        let renderer = build(&settings);
        assert_eq!(renderer.shadow_caster_names().count(), 0);
        assert_eq!(renderer.shadow_map_size(), 1);
    }
}
