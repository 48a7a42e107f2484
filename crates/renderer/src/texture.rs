//! Decoded texture images and the terrain's detail/mix texture set.

use std::path::{Path, PathBuf};

use crate::error::AssetError;

/// An RGBA8 image decoded on the CPU.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    pub path: PathBuf,
}

impl TextureImage {
    /// Decode an image file (PNG/JPEG).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|source| AssetError::Texture {
                path: path.to_path_buf(),
                source,
            })?
            .into_rgba8();
        log::debug!("Loaded texture {:?} ({}x{})", path, image.width(), image.height());
        Ok(Self {
            width: image.width(),
            height: image.height(),
            rgba: image.into_raw(),
            path: path.to_path_buf(),
        })
    }
}

/// The two detail textures and optional mix map blended by the terrain material.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainTextures {
    pub detail: [TextureImage; 2],
    pub mix: Option<TextureImage>,
}

impl TerrainTextures {
    /// Load every texture from `directory`. The first failure aborts the whole set.
    pub fn load(
        directory: &Path,
        detail: [&str; 2],
        mix: Option<&str>,
    ) -> Result<Self, AssetError> {
        let detail = [
            TextureImage::load(directory.join(detail[0]))?,
            TextureImage::load(directory.join(detail[1]))?,
        ];
        let mix = mix
            .map(|name| TextureImage::load(directory.join(name)))
            .transpose()?;
        log::info!(
            "Loaded terrain textures from {:?} (mix map: {})",
            directory,
            mix.is_some()
        );
        Ok(Self { detail, mix })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("drone-demo-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_png(path: &Path, w: u32, h: u32) {
        let img = image::RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]));
        img.save(path).unwrap();
    }

    #[test]
    fn loads_detail_and_mix_set() {
        let dir = scratch_dir("textures-ok");
        write_png(&dir.join("a.png"), 2, 3);
        write_png(&dir.join("b.png"), 4, 4);
        write_png(&dir.join("mix.png"), 1, 1);

        let set = TerrainTextures::load(&dir, ["a.png", "b.png"], Some("mix.png")).unwrap();
        assert_eq!((set.detail[0].width, set.detail[0].height), (2, 3));
        assert_eq!(set.detail[0].rgba.len(), 2 * 3 * 4);
        assert_eq!(&set.detail[1].rgba[..4], &[10, 20, 30, 255]);
        assert!(set.mix.is_some());

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn missing_texture_aborts_the_set() {
        let dir = scratch_dir("textures-missing");
        write_png(&dir.join("a.png"), 1, 1);

        let err = TerrainTextures::load(&dir, ["a.png", "nope.png"], None).unwrap_err();
        match err {
            AssetError::Texture { path, .. } => assert!(path.ends_with("nope.png")),
            other => panic!("unexpected error {other:?}"),
        }

        std::fs::remove_dir_all(dir).ok();
    }
}
