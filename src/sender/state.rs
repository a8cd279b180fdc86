use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;
use uuid::Uuid;

use crate::ledger::Contact;

/// Phases of one contact's trip through the send flow.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Idle,
    LocatingDialogTarget,
    DialogOpened,
    NumberEntered,
    AwaitingLookup,
    MarkFailed,
    AttachAndSend,
    RowRemoved,
}

/// Terminal outcome for one contact. Drives exactly one ledger mutation:
/// `Sent` deletes the pending row, `Failed` appends to the failed view and
/// then deletes the pending row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Sent,
    /// The chat app reported the number unknown. Permanent; never retried.
    Failed,
}

/// Ephemeral per-contact session: current phase plus the trail of phases
/// visited. Never persisted — a watchdog abort simply loses it.
#[derive(Debug, Clone)]
pub struct SendSession {
    pub id: String,
    pub started_at: DateTime<Utc>,
    phase: Phase,
    trail: Vec<Phase>,
}

impl SendSession {
    pub fn new(contact: &Contact) -> Self {
        let id = Uuid::new_v4().to_string();
        info!(
            "session {id}: processing '{}' ({})",
            contact.name, contact.phone
        );
        Self {
            id,
            started_at: Utc::now(),
            phase: Phase::Idle,
            trail: vec![Phase::Idle],
        }
    }

    pub fn enter(&mut self, phase: Phase) {
        info!("session {}: {:?} -> {phase:?}", self.id, self.phase);
        self.phase = phase;
        self.trail.push(phase);
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn trail(&self) -> &[Phase] {
        &self.trail
    }
}
