//! GPU side of the island: device setup, buffer and texture upload, and the
//! physically based pipeline that draws a finished [`hexisle_scene::SceneGraph`]
//! under a shadow-casting point light.

mod buffer;
mod camera;
mod depth;
mod gpu;
mod orbit;
mod pbr_pipeline;
mod scene_renderer;
mod shader;
mod shadow;
mod texture;

#[cfg(test)]
mod test_support;

pub use buffer::{BufferAllocator, MeshBuffer};
pub use camera::{Camera, CameraUniform};
pub use depth::DepthBuffer;
pub use gpu::{
    RenderContext, RenderContextError, SurfaceError, init_render_context_blocking,
    select_preferred_srgb_format,
};
pub use orbit::OrbitController;
pub use pbr_pipeline::{LightUniform, PbrPipeline, PipelineVariant};
pub use scene_renderer::{RenderSettings, SceneRenderer};
pub use shader::PBR_SHADER_SOURCE;
pub use shadow::{ShadowSettings, ShadowUniform, fit_light_view_proj};
pub use texture::{
    GpuTexture, TextureError, create_material_sampler, mip_level_count, upload_env_map,
    upload_rgba8,
};
