use std::collections::HashMap;
use std::path::Path;

use glam::Vec2;
use image::RgbaImage;

use crate::error::{EngineError, Result};

/// Size used for images whose texture was never registered.
pub const MISSING_TEXTURE_SIZE: Vec2 = Vec2::new(32.0, 32.0);

/// Named RGBA textures, shared between the scene (for sizes) and the renderer
/// (for upload).
#[derive(Default)]
pub struct Assets {
    images: HashMap<String, RgbaImage>,
    generation: u64,
}

impl Assets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes the image at `path` and registers it under `name`.
    pub fn load_file(&mut self, name: &str, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|source| EngineError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded texture {name} from {}", path.display());
        self.insert(name, decoded.to_rgba8());
        Ok(())
    }

    pub fn insert(&mut self, name: &str, image: RgbaImage) {
        self.images.insert(name.to_owned(), image);
        self.generation += 1;
    }

    pub fn get(&self, name: &str) -> Option<&RgbaImage> {
        self.images.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.images.contains_key(name)
    }

    pub fn size(&self, name: &str) -> Option<Vec2> {
        self.images
            .get(name)
            .map(|image| Vec2::new(image.width() as f32, image.height() as f32))
    }

    /// Bumped on every insert so the renderer knows when to re-upload.
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserted_images_report_their_size() {
        let mut assets = Assets::new();
        assert_eq!(assets.size("dot"), None);
        assets.insert("dot", RgbaImage::new(12, 7));
        assert!(assets.contains("dot"));
        assert_eq!(assets.size("dot"), Some(Vec2::new(12.0, 7.0)));
        assert_eq!(assets.generation(), 1);
    }

    #[test]
    fn missing_file_is_an_image_error() {
        let mut assets = Assets::new();
        let err = assets
            .load_file("ghost", "definitely/not/here.png")
            .unwrap_err();
        assert!(matches!(err, EngineError::Image { .. }));
        assert!(!assets.contains("ghost"));
    }
}
