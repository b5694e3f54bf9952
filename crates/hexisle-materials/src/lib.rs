//! Textures and surface descriptions for the hex island.
//!
//! [`TextureSet::load`] resolves every image up front; a failure there stops
//! the program before any terrain is generated.

mod error;
mod material;
mod texture;

pub use error::AssetError;
pub use material::{
    MaterialDesc, MaterialUniform, ShadingModel, linear_from_hex, srgb_from_hex, srgb_to_linear,
};
pub use texture::{ENV_MAP_FILE, Rgba8Image, RgbaF32Image, TextureSet, TextureSlot};
