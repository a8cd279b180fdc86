mod processor;
mod run;
mod state;

pub use processor::{ContactProcessor, SendConfig, SendReport};
pub use run::{run, RunMode, RunSummary};
pub use state::{Outcome, Phase, SendSession};
