use std::thread;
use std::time::Duration;

use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::input::InputDriver;
use crate::ledger::Ledger;
use crate::screen::ScreenCapture;

use super::processor::ContactProcessor;
use super::state::{Outcome, Phase};

/// How many contacts one run advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RunMode {
    /// Loop until the pending ledger is exhausted.
    Drain,
    /// Process exactly one contact, then stop.
    Single,
}

impl Default for RunMode {
    fn default() -> Self {
        RunMode::Drain
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: u32,
    pub sent: u32,
    pub failed: u32,
}

/// Outer loop over the pending ledger. Pops the head contact, drives the
/// processor, applies the one ledger mutation its outcome dictates, repeats.
///
/// An error from any contact propagates out and ends the run; there is no
/// skip-to-next recovery.
pub fn run<S: ScreenCapture, I: InputDriver>(
    ledger: &Ledger,
    processor: &mut ContactProcessor<'_, S, I>,
    mode: RunMode,
    pause_after_send_secs: [f64; 2],
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    while let Some(contact) = ledger.next_pending()? {
        let mut report = processor.process(&contact)?;

        match report.outcome {
            Outcome::Sent => {
                ledger.remove_pending(contact.row_id)?;
            }
            Outcome::Failed => {
                ledger.append_failed(&contact.name, &contact.phone)?;
                ledger.remove_pending(contact.row_id)?;
                info!("'{}' ({}) recorded as failed", contact.name, contact.phone);
            }
        }
        report.session.enter(Phase::RowRemoved);
        report.session.enter(Phase::Idle);

        summary.processed += 1;
        match report.outcome {
            Outcome::Sent => summary.sent += 1,
            Outcome::Failed => summary.failed += 1,
        }

        if mode == RunMode::Single {
            break;
        }

        // Breathe between sends the way a human operator would.
        if report.outcome == Outcome::Sent {
            let [lo, hi] = pause_after_send_secs;
            if hi > lo && lo >= 0.0 {
                let secs = rand::thread_rng().gen_range(lo..hi);
                thread::sleep(Duration::from_secs_f64(secs));
            }
        }
    }

    info!(
        "run finished: {} processed, {} sent, {} failed",
        summary.processed, summary.sent, summary.failed
    );
    Ok(summary)
}
