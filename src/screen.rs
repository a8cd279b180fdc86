use image::{DynamicImage, GrayImage};
use screenshots::Screen;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Absolute screen rectangle to search within.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x
            && y >= self.y
            && x < self.x + self.width as i32
            && y < self.y + self.height as i32
    }
}

/// A fixed click target on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Boundary for reading pixels off the live display.
///
/// Matching works on grayscale; captures are converted on the way in.
pub trait ScreenCapture {
    fn capture(&self, region: Region) -> Result<GrayImage>;
}

/// Captures from the primary display.
pub struct DisplayCapture {
    screen: Screen,
}

impl DisplayCapture {
    pub fn primary() -> Result<Self> {
        let screens = Screen::all().map_err(|err| Error::Capture(err.to_string()))?;
        let screen = screens
            .into_iter()
            .next()
            .ok_or_else(|| Error::Capture("no display available".into()))?;
        Ok(Self { screen })
    }
}

impl ScreenCapture for DisplayCapture {
    fn capture(&self, region: Region) -> Result<GrayImage> {
        let captured = self
            .screen
            .capture_area(region.x, region.y, region.width, region.height)
            .map_err(|err| Error::Capture(err.to_string()))?;
        // screenshots pins an older `image` major; rebuild the buffer under ours.
        let (width, height) = (captured.width(), captured.height());
        let rgba = image::RgbaImage::from_raw(width, height, captured.into_raw())
            .ok_or_else(|| Error::Capture("capture buffer size mismatch".into()))?;
        Ok(DynamicImage::ImageRgba8(rgba).to_luma8())
    }
}
