//! Surface descriptions for every renderable in the island scene.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use hexisle_terrain::MaterialClass;

use crate::texture::TextureSlot;

/// sRGB-encoded channel to linear, piecewise as in the sRGB transfer function.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c < 0.04045 {
        c * 0.077_399_38
    } else {
        (c * 0.947_867_3 + 0.052_132_7).powf(2.4)
    }
}

/// `0xRRGGBB` as sRGB components in `[0, 1]`.
pub fn srgb_from_hex(hex: u32) -> Vec3 {
    let channel = |shift: u32| ((hex >> shift) & 0xFF) as f32 / 255.0;
    Vec3::new(channel(16), channel(8), channel(0))
}

/// `0xRRGGBB` decoded and converted to linear.
pub fn linear_from_hex(hex: u32) -> Vec3 {
    let srgb = srgb_from_hex(hex);
    Vec3::new(
        srgb_to_linear(srgb.x),
        srgb_to_linear(srgb.y),
        srgb_to_linear(srgb.z),
    )
}

/// Lighting model a material is shaded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingModel {
    /// Metal/rough with transmission support.
    Physical,
    /// Metal/rough only.
    Standard,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDesc {
    pub name: &'static str,
    pub model: ShadingModel,
    /// Linear RGB multiplier applied to the base map.
    pub base_color: Vec3,
    pub base_map: Option<TextureSlot>,
    /// Texture whose green channel scales roughness and blue channel scales metalness.
    pub roughness_metalness_map: Option<TextureSlot>,
    pub roughness: f32,
    pub metalness: f32,
    /// Scale of the environment contribution.
    pub env_intensity: f32,
    pub transmission: f32,
    pub ior: f32,
    pub thickness: f32,
    /// Use face normals instead of interpolated ones.
    pub flat_shading: bool,
    pub double_sided: bool,
    /// Alpha-blended and drawn after the opaque pass.
    pub transparent: bool,
    /// Drawn into the point light's shadow map.
    pub cast_shadow: bool,
    /// Direct light is attenuated by the shadow map.
    pub receive_shadow: bool,
}

impl Default for MaterialDesc {
    fn default() -> Self {
        Self {
            name: "default",
            model: ShadingModel::Standard,
            base_color: Vec3::ONE,
            base_map: None,
            roughness_metalness_map: None,
            roughness: 1.0,
            metalness: 0.0,
            env_intensity: 1.0,
            transmission: 0.0,
            ior: 1.5,
            thickness: 0.0,
            flat_shading: false,
            double_sided: false,
            transparent: false,
            cast_shadow: false,
            receive_shadow: false,
        }
    }
}

impl MaterialDesc {
    /// Texture a terrain batch is drawn with. Shallow tiles use the darker dirt.
    pub const fn terrain_texture(class: MaterialClass) -> TextureSlot {
        match class {
            MaterialClass::Stone => TextureSlot::Stone,
            MaterialClass::Dirt => TextureSlot::Dirt,
            MaterialClass::Grass => TextureSlot::Grass,
            MaterialClass::Sand => TextureSlot::Sand,
            MaterialClass::Shallow => TextureSlot::Dirt2,
        }
    }

    /// Flat-shaded textured material shared by all terrain batches.
    pub fn terrain(class: MaterialClass) -> Self {
        Self {
            name: class.name(),
            model: ShadingModel::Physical,
            base_map: Some(Self::terrain_texture(class)),
            env_intensity: 0.135,
            flat_shading: true,
            cast_shadow: true,
            receive_shadow: true,
            ..Default::default()
        }
    }

    pub fn water() -> Self {
        Self {
            name: "water",
            model: ShadingModel::Physical,
            base_color: linear_from_hex(0x55AAFF) * 3.0,
            roughness_metalness_map: Some(TextureSlot::Water),
            roughness: 1.0,
            metalness: 0.025,
            env_intensity: 0.2,
            transmission: 1.0,
            ior: 1.4,
            thickness: 1.5,
            transparent: true,
            receive_shadow: true,
            ..Default::default()
        }
    }

    /// Inside and outside of the open basin ring are both visible.
    pub fn basin_wall() -> Self {
        Self {
            name: "basin_wall",
            model: ShadingModel::Physical,
            base_map: Some(TextureSlot::Dirt),
            env_intensity: 0.2,
            double_sided: true,
            receive_shadow: true,
            ..Default::default()
        }
    }

    pub fn basin_floor() -> Self {
        Self {
            name: "basin_floor",
            model: ShadingModel::Physical,
            base_map: Some(TextureSlot::Dirt2),
            env_intensity: 0.1,
            receive_shadow: true,
            ..Default::default()
        }
    }

    pub fn cloud() -> Self {
        Self {
            name: "cloud",
            env_intensity: 0.75,
            flat_shading: true,
            cast_shadow: true,
            ..Default::default()
        }
    }

    pub fn to_uniform(&self) -> MaterialUniform {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        let transmission = match self.model {
            ShadingModel::Physical => self.transmission,
            ShadingModel::Standard => 0.0,
        };
        MaterialUniform {
            base_color: self.base_color.extend(1.0).to_array(),
            surface: [
                self.roughness,
                self.metalness,
                self.env_intensity,
                flag(self.flat_shading),
            ],
            transmission: [
                transmission,
                self.ior,
                self.thickness,
                flag(self.roughness_metalness_map.is_some()),
            ],
            shadow: [flag(self.receive_shadow), 0.0, 0.0, 0.0],
        }
    }
}

/// GPU-side material block, 64 bytes, bound at `@group(2) @binding(0)`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MaterialUniform {
    /// rgb = linear base colour, a = 1.
    pub base_color: [f32; 4],
    /// x = roughness, y = metalness, z = env intensity, w = flat shading flag.
    pub surface: [f32; 4],
    /// x = transmission, y = ior, z = thickness, w = roughness/metalness map flag.
    pub transmission: [f32; 4],
    /// x = receives shadows flag.
    pub shadow: [f32; 4],
}

const _: () = assert!(std::mem::size_of::<MaterialUniform>() == 64);
