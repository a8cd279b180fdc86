use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::screen::{Region, ScreenCapture};

use super::template::{match_template, MatchResult, Template};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_info;

/// A successful poll: the matched center and its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchPoint {
    pub x: i32,
    pub y: i32,
    pub score: f64,
}

/// Fixed-interval retry wrapper around the template matcher.
///
/// The cadence is deliberately flat: no backoff, no jitter. UI settle times
/// are what the thresholds and intervals were tuned against, and the loops
/// block the calling thread with real sleeps.
///
/// With `timeout: None` a target that never appears blocks forever; the
/// emergency watchdog is the only way out. A configured timeout turns an
/// expired wait into `Error::PollTimeout` instead.
#[derive(Debug, Clone, Copy)]
pub struct Poller {
    pub interval: Duration,
    pub timeout: Option<Duration>,
}

impl Poller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            timeout: None,
        }
    }

    pub fn with_timeout(interval: Duration, timeout: Option<Duration>) -> Self {
        Self { interval, timeout }
    }

    /// Block until `template` matches within `region`; returns the center.
    pub fn poll_until_match<S: ScreenCapture>(
        &self,
        screen: &S,
        region: Region,
        template: &Template,
        threshold: f64,
    ) -> Result<MatchPoint> {
        log_info!(
            "waiting for '{}' in ({}, {}, {}, {})",
            template.name,
            region.x,
            region.y,
            region.width,
            region.height
        );
        let started = Instant::now();
        loop {
            let pixels = screen.capture(region)?;
            if let MatchResult::Match { x, y, score } =
                match_template(&pixels, region, template, threshold)
            {
                log_info!("'{}' matched at ({x}, {y}), score {score:.3}", template.name);
                return Ok(MatchPoint { x, y, score });
            }
            self.check_deadline(&template.name, started)?;
            std::thread::sleep(self.interval);
        }
    }

    /// Block while `template` keeps matching; returns once it disappears.
    /// Used for transient "in progress" indicators.
    pub fn poll_while_match<S: ScreenCapture>(
        &self,
        screen: &S,
        region: Region,
        template: &Template,
        threshold: f64,
    ) -> Result<()> {
        let started = Instant::now();
        loop {
            let pixels = screen.capture(region)?;
            if !match_template(&pixels, region, template, threshold).is_match() {
                log_info!("'{}' no longer on screen", template.name);
                return Ok(());
            }
            self.check_deadline(&template.name, started)?;
            std::thread::sleep(self.interval);
        }
    }

    /// Deadline check shared with callers that run their own confirmation
    /// loops around `match_once`.
    pub(crate) fn check_deadline(&self, anchor: &str, started: Instant) -> Result<()> {
        if let Some(limit) = self.timeout {
            if started.elapsed() >= limit {
                return Err(Error::PollTimeout {
                    anchor: anchor.to_string(),
                    waited: limit,
                });
            }
        }
        Ok(())
    }
}
