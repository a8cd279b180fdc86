//! Shared fixtures for unit tests: deterministic pixel patterns, scripted
//! capture streams, and a recording input driver.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use image::{GrayImage, Luma};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::input::InputDriver;
use crate::screen::{Region, ScreenCapture};

const BACKGROUND: u8 = 128;

/// Deterministic noise patch. Independent seeds produce patterns with near-zero
/// cross-correlation, so anchors built from different seeds never confuse the
/// matcher at realistic thresholds.
pub fn pattern(seed: u64, width: u32, height: u32) -> GrayImage {
    let mut rng = StdRng::seed_from_u64(seed);
    GrayImage::from_fn(width, height, |_, _| Luma([rng.gen::<u8>()]))
}

/// Flat background frame; flat windows have zero variance and never match.
pub fn blank_frame(width: u32, height: u32) -> GrayImage {
    GrayImage::from_pixel(width, height, Luma([BACKGROUND]))
}

pub fn paste(frame: &mut GrayImage, patch: &GrayImage, x: u32, y: u32) {
    image::imageops::replace(frame, patch, i64::from(x), i64::from(y));
}

/// A 100x60 blank frame with one patch pasted at the given offset.
pub fn frame_with(patch: &GrayImage, x: u32, y: u32) -> GrayImage {
    let mut frame = blank_frame(100, 60);
    paste(&mut frame, patch, x, y);
    frame
}

/// Capture source that serves a pre-scripted frame sequence, repeating the
/// final frame once exhausted.
pub struct ScriptedScreen {
    frames: RefCell<VecDeque<GrayImage>>,
    last: RefCell<Option<GrayImage>>,
    captures: Cell<usize>,
}

impl ScriptedScreen {
    pub fn new(frames: Vec<GrayImage>) -> Self {
        Self {
            frames: RefCell::new(frames.into()),
            last: RefCell::new(None),
            captures: Cell::new(0),
        }
    }

    pub fn captures(&self) -> usize {
        self.captures.get()
    }
}

impl ScreenCapture for ScriptedScreen {
    fn capture(&self, region: Region) -> Result<GrayImage> {
        self.captures.set(self.captures.get() + 1);
        let frame = match self.frames.borrow_mut().pop_front() {
            Some(frame) => {
                *self.last.borrow_mut() = Some(frame.clone());
                frame
            }
            None => self
                .last
                .borrow()
                .clone()
                .unwrap_or_else(|| blank_frame(region.width, region.height)),
        };
        assert_eq!(
            (frame.width(), frame.height()),
            (region.width, region.height),
            "scripted frame size must match the queried region"
        );
        Ok(frame)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Click(i32, i32),
    Type(String),
    SelectAll,
    Copy,
    Paste,
    Submit,
}

/// Records the injected action stream instead of touching real devices.
#[derive(Default)]
pub struct RecordingInput {
    pub actions: Vec<Action>,
}

impl RecordingInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clicks_at(&self, x: i32, y: i32) -> usize {
        self.actions
            .iter()
            .filter(|a| **a == Action::Click(x, y))
            .count()
    }
}

impl InputDriver for RecordingInput {
    fn click(&mut self, x: i32, y: i32) -> Result<()> {
        self.actions.push(Action::Click(x, y));
        Ok(())
    }

    fn type_text(&mut self, text: &str) -> Result<()> {
        self.actions.push(Action::Type(text.to_string()));
        Ok(())
    }

    fn select_all(&mut self) -> Result<()> {
        self.actions.push(Action::SelectAll);
        Ok(())
    }

    fn copy(&mut self) -> Result<()> {
        self.actions.push(Action::Copy);
        Ok(())
    }

    fn paste(&mut self) -> Result<()> {
        self.actions.push(Action::Paste);
        Ok(())
    }

    fn press_submit(&mut self) -> Result<()> {
        self.actions.push(Action::Submit);
        Ok(())
    }
}
