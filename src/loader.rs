// Reads the input picture and normalises it to the working resolution.
// Visual expectation: the "Select Points" window shows exactly this image,
// stretched to display_width x display_height.

use crate::config::ScanConfig;
use crate::error::{Error, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};
use tracing::{debug, info, instrument};

/// Two copies of the same picture.
/// `original` is only ever sampled by the warp; `display` collects markers.
pub struct LoadedImage {
    pub original: RgbImage,
    pub display: RgbImage,
}

impl LoadedImage {
    pub fn dimensions(&self) -> (u32, u32) {
        self.original.dimensions()
    }
}

/// Open `config.image_path`, decode it, resize it.
#[instrument(skip_all, fields(path = %config.image_path.display()))]
pub fn load(config: &ScanConfig) -> Result<LoadedImage> {
    let img = image::open(&config.image_path).map_err(|source| Error::ImageLoad {
        path: config.image_path.clone(),
        source,
    })?;
    info!(width = img.width(), height = img.height(), "Image decoded");
    Ok(from_image(config, img))
}

/// Same normalisation for an image that is already in memory.
pub fn from_image(config: &ScanConfig, img: DynamicImage) -> LoadedImage {
    // 1) Drop alpha / promote grey so every later step works on RGB8.
    let rgb = img.to_rgb8();

    // 2) Bilinear resize to the working resolution (aspect ratio is not kept).
    let original = if rgb.dimensions() == (config.display_width, config.display_height) {
        rgb
    } else {
        imageops::resize(&rgb, config.display_width, config.display_height, FilterType::Triangle)
    };
    debug!(
        width = config.display_width,
        height = config.display_height,
        "Resized to working resolution"
    );

    // 3) Independent copy for drawing on.
    let display = original.clone();
    LoadedImage { original, display }
}
