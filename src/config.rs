// Every tunable number the scanner uses, in one place.
// Visual: changing these changes window sizes, marker size and how "inky"
// the black-and-white output looks.

use crate::error::{Error, Result};
use std::path::PathBuf;

pub const DEFAULT_IMAGE_PATH: &str = "01.jpg";

#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    /// Image read at startup.
    pub image_path: PathBuf,
    /// Width of the flattened output (pixels).
    pub output_width: u32,
    /// Height of the flattened output (pixels).
    pub output_height: u32,
    /// Side of the square neighbourhood used for the local mean. Odd, >= 3.
    pub threshold_block_size: u32,
    /// Subtracted from the local mean; larger = fewer black pixels.
    pub threshold_offset: i32,
    /// Value written for "white" in the binary output.
    pub threshold_max_value: u8,
    /// Radius of the filled dot drawn at each click.
    pub marker_radius: i32,
    pub marker_color: [u8; 3],
    /// Working resolution the input is resized to (also the window size).
    pub display_width: u32,
    pub display_height: u32,
    /// Reject quads that are not convex and clockwise from the top-left.
    pub validate_order: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            image_path: PathBuf::from(DEFAULT_IMAGE_PATH),
            output_width: 300,
            output_height: 400,
            threshold_block_size: 25,
            threshold_offset: 15,
            threshold_max_value: 255,
            marker_radius: 10,
            marker_color: [255, 0, 0],
            display_width: 1280,
            display_height: 720,
            validate_order: false,
        }
    }
}

impl ScanConfig {
    /// Defaults, overridden by the command line:
    /// `[--strict-order] [IMAGE_PATH]`. Anything else is rejected.
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = Self::default();
        let mut path_seen = false;
        for arg in args {
            let arg: String = arg.into();
            match arg.as_str() {
                "--strict-order" => config.validate_order = true,
                flag if flag.starts_with("--") => {
                    return Err(Error::InvalidConfig(format!("unknown option {flag}")));
                }
                _ if path_seen => {
                    return Err(Error::InvalidConfig(format!("unexpected argument {arg}")));
                }
                _ => {
                    config.image_path = PathBuf::from(&arg);
                    path_seen = true;
                }
            }
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.output_width == 0 || self.output_height == 0 {
            return Err(Error::InvalidConfig(format!(
                "output size must be non-zero, got {}x{}",
                self.output_width, self.output_height
            )));
        }
        if self.display_width == 0 || self.display_height == 0 {
            return Err(Error::InvalidConfig(format!(
                "display size must be non-zero, got {}x{}",
                self.display_width, self.display_height
            )));
        }
        if self.threshold_block_size < 3 || self.threshold_block_size % 2 == 0 {
            return Err(Error::InvalidConfig(format!(
                "threshold block size must be odd and >= 3, got {}",
                self.threshold_block_size
            )));
        }
        if self.marker_radius < 0 {
            return Err(Error::InvalidConfig(format!(
                "marker radius must not be negative, got {}",
                self.marker_radius
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let c = ScanConfig::default();
        assert_eq!((c.output_width, c.output_height), (300, 400));
        assert_eq!(c.threshold_block_size, 25);
        assert_eq!(c.threshold_offset, 15);
        assert_eq!(c.marker_radius, 10);
        assert_eq!((c.display_width, c.display_height), (1280, 720));
        assert!(!c.validate_order);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn path_argument_overrides_the_image_path() {
        let c = ScanConfig::from_args(["page.png"]).unwrap();
        assert_eq!(c.image_path, PathBuf::from("page.png"));
        assert!(!c.validate_order);

        let c = ScanConfig::from_args(Vec::<String>::new()).unwrap();
        assert_eq!(c, ScanConfig::default());
    }

    #[test]
    fn strict_order_flag_turns_on_order_validation() {
        let c = ScanConfig::from_args(["--strict-order", "page.png"]).unwrap();
        assert!(c.validate_order);
        assert_eq!(c.image_path, PathBuf::from("page.png"));

        let c = ScanConfig::from_args(["page.png", "--strict-order"]).unwrap();
        assert!(c.validate_order);
    }

    #[test]
    fn unknown_flags_and_extra_paths_are_rejected() {
        assert!(matches!(
            ScanConfig::from_args(["--fast"]),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            ScanConfig::from_args(["a.png", "b.png"]),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn even_or_tiny_block_sizes_are_rejected() {
        for size in [0, 1, 2, 24] {
            let c = ScanConfig { threshold_block_size: size, ..ScanConfig::default() };
            assert!(matches!(c.validate(), Err(Error::InvalidConfig(_))), "size {size}");
        }
    }

    #[test]
    fn zero_output_size_is_rejected() {
        let c = ScanConfig { output_width: 0, ..ScanConfig::default() };
        assert!(matches!(c.validate(), Err(Error::InvalidConfig(_))));
    }
}
