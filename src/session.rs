// Click collection as an explicit state machine.
//
//   Collecting (0..=3 points) --4th click--> Ready (pipeline ran once)
//   Ready / Collecting --finish()--> Done
//   Collecting --4th click, pipeline error--> Done
//
// Visual: each accepted click leaves a red dot on the "Select Points" image;
// the 4th one produces the two result images.

use crate::config::ScanConfig;
use crate::draw::draw_marker;
use crate::error::Result;
use crate::loader::LoadedImage;
use crate::pipeline::{self, ScanResult};
use crate::types::Point;
use image::RgbImage;
use tracing::{info, warn};

pub const CORNERS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Collecting,
    Ready,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Point stored at this position in the list (0-based); more needed.
    Recorded { index: usize },
    /// 4th point stored and the scan produced.
    Completed,
    /// Nothing changed (out of bounds, or not collecting any more).
    Ignored,
}

pub struct Session {
    config: ScanConfig,
    original: RgbImage,
    display: RgbImage,
    points: Vec<Point>,
    phase: Phase,
    result: Option<ScanResult>,
    pipeline_runs: usize,
}

impl Session {
    pub fn new(config: ScanConfig, image: LoadedImage) -> Self {
        Self {
            config,
            original: image.original,
            display: image.display,
            points: Vec::with_capacity(CORNERS),
            phase: Phase::Collecting,
            result: None,
            pipeline_runs: 0,
        }
    }

    /// Handle one pointer-down at image coordinates (x, y).
    pub fn click(&mut self, x: i32, y: i32) -> Result<ClickOutcome> {
        if self.phase != Phase::Collecting {
            return Ok(ClickOutcome::Ignored);
        }

        let (w, h) = self.display.dimensions();
        if x < 0 || y < 0 || x >= w as i32 || y >= h as i32 {
            warn!(x, y, "Click outside the image ignored");
            return Ok(ClickOutcome::Ignored);
        }

        let p = Point::new(x, y);
        self.points.push(p);
        draw_marker(&mut self.display, p, self.config.marker_radius, self.config.marker_color);
        info!(x, y, count = self.points.len(), "Corner recorded");

        if self.points.len() < CORNERS {
            return Ok(ClickOutcome::Recorded { index: self.points.len() - 1 });
        }

        // 4th point: run the pipeline exactly once, whatever the outcome.
        let corners = [self.points[0], self.points[1], self.points[2], self.points[3]];
        self.pipeline_runs += 1;
        match pipeline::run(&corners, &self.original, &self.config) {
            Ok(result) => {
                self.result = Some(result);
                self.phase = Phase::Ready;
                Ok(ClickOutcome::Completed)
            }
            Err(e) => {
                self.phase = Phase::Done;
                Err(e)
            }
        }
    }

    pub fn finish(&mut self) {
        self.phase = Phase::Done;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Image with the markers, for the selection window.
    pub fn display(&self) -> &RgbImage {
        &self.display
    }

    pub fn result(&self) -> Option<&ScanResult> {
        self.result.as_ref()
    }

    pub fn pipeline_runs(&self) -> usize {
        self.pipeline_runs
    }
}
