use std::path::PathBuf;

use image::{DynamicImage, GenericImageView};
use log::debug;

use crate::RainError;

/// Source of the image a mask is derived from.
pub trait MaskSource {
    fn load(&self) -> Result<DynamicImage, RainError>;
}

/// Image decoded from a file on disk.
#[derive(Clone, Debug)]
pub struct ImageFile {
    path: PathBuf,
}

impl ImageFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MaskSource for ImageFile {
    fn load(&self) -> Result<DynamicImage, RainError> {
        let image = image::open(&self.path)
            .map_err(|source| RainError::Image { path: self.path.clone(), source })?;
        let (w, h) = image.dimensions();
        debug!("loaded mask image {}x{} from {}", w, h, self.path.display());
        Ok(image)
    }
}

/// Already decoded image.
#[derive(Clone, Debug)]
pub struct StaticImage {
    image: DynamicImage,
}

impl StaticImage {
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }
}

impl MaskSource for StaticImage {
    fn load(&self) -> Result<DynamicImage, RainError> {
        Ok(self.image.clone())
    }
}
