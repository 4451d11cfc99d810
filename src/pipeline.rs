// Four corners in, flattened page + black-and-white scan out.
// Visual: what ends up in the "Perspective Transform" and
// "Adaptive Threshold Output" windows.

use crate::config::ScanConfig;
use crate::error::{Error, Result};
use crate::geometry;
use crate::threshold;
use crate::types::Point;
use image::{GrayImage, Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation, warp_into};
use tracing::{info, instrument, warn};

pub struct ScanResult {
    /// `output_width x output_height` top-down colour view.
    pub warped: RgbImage,
    /// Same size, only 0 and `threshold_max_value`.
    pub binary: GrayImage,
}

/// Run the whole transform-and-threshold chain.
/// `points` must be TL, TR, BR, BL; `original` must be unannotated.
#[instrument(skip(original, config))]
pub fn run(points: &[Point; 4], original: &RgbImage, config: &ScanConfig) -> Result<ScanResult> {
    let src = geometry::quad_from_points(points);
    let dst = geometry::rectangle_corners(config.output_width, config.output_height);

    // 1) Ordering is the caller's job; we only police it when asked to.
    if !geometry::is_convex_clockwise(&src) {
        if config.validate_order {
            return Err(Error::UnorderedCorners);
        }
        warn!("Corners are not convex in TL -> TR -> BR -> BL order; output will look flipped or skewed");
    }

    // 2) Exact 4-point solve.
    let projection = geometry::solve_projection(src, dst)?;

    // 3) Resample into the fixed-size canvas; unmapped pixels stay black.
    let mut warped = RgbImage::new(config.output_width, config.output_height);
    warp_into(original, &projection, Interpolation::Bilinear, Rgb([0, 0, 0]), &mut warped);

    // 4) + 5) Intensity, then local binarisation.
    let gray = threshold::to_luma(&warped);
    let binary = threshold::adaptive_gaussian(
        &gray,
        config.threshold_block_size,
        config.threshold_offset,
        config.threshold_max_value,
    )?;

    info!(
        width = config.output_width,
        height = config.output_height,
        "Perspective transform and threshold complete"
    );
    Ok(ScanResult { warped, binary })
}
