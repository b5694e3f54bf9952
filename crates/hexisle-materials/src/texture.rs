//! Texture slots and the image set they resolve to.

use std::path::Path;

use image::DynamicImage;

use crate::error::AssetError;

/// File name of the equirectangular environment map.
pub const ENV_MAP_FILE: &str = "envmap.hdr";

/// Every colour or data texture the island samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Stone,
    Dirt,
    Dirt2,
    Sand,
    Grass,
    Water,
}

impl TextureSlot {
    pub const ALL: [TextureSlot; 6] = [
        TextureSlot::Stone,
        TextureSlot::Dirt,
        TextureSlot::Dirt2,
        TextureSlot::Sand,
        TextureSlot::Grass,
        TextureSlot::Water,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn file_name(self) -> &'static str {
        match self {
            TextureSlot::Stone => "stone.png",
            TextureSlot::Dirt => "dirt.png",
            TextureSlot::Dirt2 => "dirt2.jpg",
            TextureSlot::Sand => "sand.jpg",
            TextureSlot::Grass => "grass.jpg",
            TextureSlot::Water => "water.jpg",
        }
    }

    /// Colour textures are stored sRGB-encoded; the water map feeds roughness
    /// and metalness and is read as linear data.
    pub const fn is_srgb(self) -> bool {
        !matches!(self, TextureSlot::Water)
    }
}

/// Decoded 8-bit RGBA image.
#[derive(Debug, Clone, PartialEq)]
pub struct Rgba8Image {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Rgba8Image {
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: rgba.to_vec(),
        }
    }
}

/// Decoded 32-bit float RGBA image, used for the HDR environment.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbaF32Image {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<f32>,
}

impl RgbaF32Image {
    pub fn solid(rgba: [f32; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: rgba.to_vec(),
        }
    }
}

/// All textures plus the environment map, resolved before generation starts.
#[derive(Debug, Clone)]
pub struct TextureSet {
    textures: Vec<Rgba8Image>,
    env_map: RgbaF32Image,
}

impl TextureSet {
    /// Decode every slot and the environment map from `dir`.
    ///
    /// Stops at the first file that is missing or fails to decode.
    pub fn load(dir: &Path) -> Result<Self, AssetError> {
        if !dir.is_dir() {
            return Err(AssetError::MissingDirectory(dir.to_path_buf()));
        }

        let textures = TextureSlot::ALL
            .iter()
            .map(|slot| {
                let image = open(&dir.join(slot.file_name()))?.to_rgba8();
                Ok(Rgba8Image {
                    width: image.width(),
                    height: image.height(),
                    pixels: image.into_raw(),
                })
            })
            .collect::<Result<Vec<_>, AssetError>>()?;

        let env = open(&dir.join(ENV_MAP_FILE))?.to_rgba32f();
        let env_map = RgbaF32Image {
            width: env.width(),
            height: env.height(),
            pixels: env.into_raw(),
        };

        tracing::info!(
            dir = %dir.display(),
            env_width = env_map.width,
            env_height = env_map.height,
            "Loaded {} textures and environment map",
            textures.len()
        );
        Ok(Self { textures, env_map })
    }

    /// White 1x1 textures and a flat grey sky, for headless runs and tests.
    pub fn placeholder() -> Self {
        Self {
            textures: TextureSlot::ALL
                .iter()
                .map(|_| Rgba8Image::solid([255, 255, 255, 255]))
                .collect(),
            env_map: RgbaF32Image::solid([0.5, 0.5, 0.5, 1.0]),
        }
    }

    pub fn get(&self, slot: TextureSlot) -> &Rgba8Image {
        &self.textures[slot.index()]
    }

    pub fn env_map(&self) -> &RgbaF32Image {
        &self.env_map
    }
}

fn open(path: &Path) -> Result<DynamicImage, AssetError> {
    if !path.is_file() {
        return Err(AssetError::MissingFile(path.to_path_buf()));
    }
    let image = image::open(path).map_err(|source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    if image.width() == 0 || image.height() == 0 {
        return Err(AssetError::EmptyImage {
            path: path.to_path_buf(),
            width: image.width(),
            height: image.height(),
        });
    }
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(path: &Path, rgba: [u8; 4]) {
        image::RgbaImage::from_pixel(2, 2, image::Rgba(rgba))
            .save(path)
            .unwrap();
    }

    fn write_jpeg(path: &Path) {
        image::RgbImage::from_pixel(4, 4, image::Rgb([120, 90, 60]))
            .save(path)
            .unwrap();
    }

    fn write_hdr(path: &Path) {
        let pixels = vec![image::Rgb([1.5f32, 0.75, 0.25]); 8];
        let file = std::fs::File::create(path).unwrap();
        image::codecs::hdr::HdrEncoder::new(file)
            .encode(&pixels, 4, 2)
            .unwrap();
    }

    fn populate(dir: &Path) {
        for slot in TextureSlot::ALL {
            let path = dir.join(slot.file_name());
            if slot.file_name().ends_with(".png") {
                write_png(&path, [10, 20, 30, 255]);
            } else {
                write_jpeg(&path);
            }
        }
        write_hdr(&dir.join(ENV_MAP_FILE));
    }

    #[test]
    fn test_file_names_are_distinct() {
        let mut names: Vec<_> = TextureSlot::ALL.iter().map(|s| s.file_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), TextureSlot::ALL.len());
    }

    #[test]
    fn test_only_water_is_linear() {
        assert!(!TextureSlot::Water.is_srgb());
        assert!(TextureSlot::Grass.is_srgb());
    }

    #[test]
    fn test_load_full_set() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path());

        let set = TextureSet::load(dir.path()).unwrap();
        let stone = set.get(TextureSlot::Stone);
        assert_eq!((stone.width, stone.height), (2, 2));
        assert_eq!(&stone.pixels[..4], &[10, 20, 30, 255]);

        let grass = set.get(TextureSlot::Grass);
        assert_eq!(grass.pixels.len(), 4 * 4 * 4);

        let env = set.env_map();
        assert_eq!((env.width, env.height), (4, 2));
        assert_eq!(env.pixels.len(), 4 * 2 * 4);
        assert!((env.pixels[0] - 1.5).abs() < 0.05);
        assert_eq!(env.pixels[3], 1.0);
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = TextureSet::load(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, AssetError::MissingDirectory(_)));
    }

    #[test]
    fn test_missing_env_map_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path());
        std::fs::remove_file(dir.path().join(ENV_MAP_FILE)).unwrap();

        match TextureSet::load(dir.path()) {
            Err(AssetError::MissingFile(path)) => assert!(path.ends_with(ENV_MAP_FILE)),
            other => panic!("expected missing env map, got {other:?}"),
        }
    }

    #[test]
    fn test_corrupt_texture_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path());
        std::fs::write(dir.path().join("sand.jpg"), b"definitely not a jpeg").unwrap();

        match TextureSet::load(dir.path()) {
            Err(AssetError::Decode { path, .. }) => assert!(path.ends_with("sand.jpg")),
            other => panic!("expected decode failure, got {other:?}"),
        }
    }

    #[test]
    fn test_placeholder_has_every_slot() {
        let set = TextureSet::placeholder();
        for slot in TextureSlot::ALL {
            assert_eq!(set.get(slot).pixels, vec![255, 255, 255, 255]);
        }
        assert_eq!(set.env_map().pixels.len(), 4);
    }
}
