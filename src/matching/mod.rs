mod poller;
mod template;

pub use poller::{MatchPoint, Poller};
pub use template::{match_template, MatchResult, Template};

use crate::error::Result;
use crate::screen::{Region, ScreenCapture};

/// Capture `region` once and match `template` against it.
pub fn match_once<S: ScreenCapture>(
    screen: &S,
    region: Region,
    template: &Template,
    threshold: f64,
) -> Result<MatchResult> {
    let pixels = screen.capture(region)?;
    Ok(match_template(&pixels, region, template, threshold))
}
