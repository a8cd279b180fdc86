use std::path::Path;

use image::GrayImage;

use crate::error::{Error, Result};
use crate::screen::Region;

/// Scores below this denominator are treated as zero-variance (flat) image
/// content, for which normalized correlation is undefined.
const NORM_EPSILON: f64 = 1e-9;

/// A named reference bitmap used to locate a UI element on screen.
#[derive(Debug, Clone)]
pub struct Template {
    pub name: String,
    pub image: GrayImage,
}

impl Template {
    /// Load a template from a PNG asset. The match threshold is supplied per
    /// call, not stored with the asset.
    pub fn load(path: &Path) -> Result<Self> {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let image = image::open(path)
            .map_err(|err| Error::TemplateLoad {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?
            .to_luma8();
        Ok(Self { name, image })
    }

    pub fn from_image(name: impl Into<String>, image: GrayImage) -> Self {
        Self {
            name: name.into(),
            image,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Outcome of matching one template against one captured region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchResult {
    /// Best placement scored at or above the threshold. `(x, y)` is the
    /// center of the match in absolute screen coordinates.
    Match { x: i32, y: i32, score: f64 },
    NoMatch,
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Match { .. })
    }
}

/// Slide `template` over every placement in `pixels` (a capture of `region`)
/// and return the best-scoring location, using zero-mean normalized
/// cross-correlation (the `TM_CCOEFF_NORMED` formulation).
///
/// A template larger than the region, or one with no pixel variance, cannot
/// match and yields `NoMatch` rather than an error.
pub fn match_template(
    pixels: &GrayImage,
    region: Region,
    template: &Template,
    threshold: f64,
) -> MatchResult {
    let (rw, rh) = pixels.dimensions();
    let (tw, th) = template.image.dimensions();
    if tw > rw || th > rh || tw == 0 || th == 0 {
        return MatchResult::NoMatch;
    }

    let tpl: Vec<f64> = template
        .image
        .pixels()
        .map(|p| f64::from(p.0[0]))
        .collect();
    let tpl_mean = tpl.iter().sum::<f64>() / tpl.len() as f64;
    let tpl_centered: Vec<f64> = tpl.iter().map(|v| v - tpl_mean).collect();
    let tpl_norm = tpl_centered.iter().map(|v| v * v).sum::<f64>().sqrt();
    if tpl_norm < NORM_EPSILON {
        return MatchResult::NoMatch;
    }

    let mut best_score = f64::MIN;
    let mut best_xy = (0u32, 0u32);

    for dy in 0..=(rh - th) {
        for dx in 0..=(rw - tw) {
            let mut window_sum = 0.0;
            for ty in 0..th {
                for tx in 0..tw {
                    window_sum += f64::from(pixels.get_pixel(dx + tx, dy + ty).0[0]);
                }
            }
            let window_mean = window_sum / tpl.len() as f64;

            let mut numerator = 0.0;
            let mut window_sq = 0.0;
            for ty in 0..th {
                for tx in 0..tw {
                    let w = f64::from(pixels.get_pixel(dx + tx, dy + ty).0[0]) - window_mean;
                    numerator += w * tpl_centered[(ty * tw + tx) as usize];
                    window_sq += w * w;
                }
            }

            let denom = tpl_norm * window_sq.sqrt();
            let score = if denom < NORM_EPSILON {
                0.0
            } else {
                numerator / denom
            };

            if score > best_score {
                best_score = score;
                best_xy = (dx, dy);
            }
        }
    }

    if best_score >= threshold {
        MatchResult::Match {
            x: region.x + best_xy.0 as i32 + (tw / 2) as i32,
            y: region.y + best_xy.1 as i32 + (th / 2) as i32,
            score: best_score,
        }
    } else {
        MatchResult::NoMatch
    }
}
