pub mod anchors;
pub mod error;
pub mod input;
pub mod ledger;
pub mod matching;
pub mod screen;
pub mod sender;
pub mod settings;
pub mod utils;
pub mod watchdog;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::{Error, Result};
