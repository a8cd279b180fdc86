use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::screen::{Point, Region};
use crate::sender::RunMode;

/// Run configuration, read from a JSON file. Defaults reproduce the screen
/// geometry and cadence the anchor thresholds were tuned against.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub ledger_path: PathBuf,
    pub template_dir: PathBuf,
    /// Region all anchors are searched in.
    pub search_region: Region,
    pub match_threshold: f64,
    pub poll_interval_ms: u64,
    /// `None` preserves the poll-forever behavior; a value makes an anchor
    /// that never appears fail the run instead of blocking indefinitely.
    pub poll_timeout_ms: Option<u64>,
    /// Settle pause between consecutive UI actions.
    pub settle_ms: u64,
    pub close_control: Point,
    pub first_result: Point,
    pub staging_area: Point,
    /// Emergency abort key, held down to kill the process.
    pub abort_key: String,
    pub watchdog_interval_ms: u64,
    /// Uniform pause range applied after each sent contact.
    pub pause_after_send_secs: [f64; 2],
    pub run_mode: RunMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ledger_path: PathBuf::from("send_info/contacts.sqlite3"),
            template_dir: PathBuf::from("assets"),
            search_region: Region::new(0, 0, 1365, 767),
            match_threshold: 0.9,
            poll_interval_ms: 1000,
            poll_timeout_ms: None,
            settle_ms: 1000,
            close_control: Point { x: 1055, y: 30 },
            first_result: Point { x: 1000, y: 260 },
            staging_area: Point { x: 635, y: 400 },
            abort_key: "numpad0".into(),
            watchdog_interval_ms: 50,
            pause_after_send_secs: [1.0, 3.0],
            run_mode: RunMode::Drain,
        }
    }
}

impl Settings {
    /// Load from `path`; a missing file means defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("invalid settings file {}", path.display()))
    }
}
