use std::path::PathBuf;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure kinds for the automation core.
///
/// A below-threshold template match is never an error — it is the normal
/// keep-polling signal. A contact that the chat app cannot find is a business
/// outcome (`sender::Outcome::Failed`), not an error either.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load template {path}: {reason}")]
    TemplateLoad { path: PathBuf, reason: String },

    #[error("screen capture failed: {0}")]
    Capture(String),

    #[error("input injection failed: {0}")]
    Input(String),

    #[error("ledger: {0}")]
    Ledger(#[from] rusqlite::Error),

    #[error("ledger I/O: {0}")]
    LedgerIo(String),

    #[error("ledger migration failed: {0}")]
    Migration(String),

    #[error("anchor '{anchor}' did not appear within {waited:?}")]
    PollTimeout { anchor: String, waited: Duration },

    #[error("failed to start watchdog thread: {0}")]
    Watchdog(String),
}
