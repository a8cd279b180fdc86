use std::thread;
use std::time::Duration;

use device_query::{DeviceQuery, DeviceState, Keycode};
use log::{error, info};

use crate::error::{Error, Result};

/// Source of the currently-pressed key set, polled at a fixed interval.
pub trait KeyStateSource {
    fn pressed_keys(&self) -> Vec<Keycode>;
}

impl KeyStateSource for DeviceState {
    fn pressed_keys(&self) -> Vec<Keycode> {
        self.get_keys()
    }
}

pub fn abort_key_engaged(keys: &[Keycode], abort_key: Keycode) -> bool {
    keys.contains(&abort_key)
}

/// Poll `source` until the abort key is down, then fire `on_trigger` once.
fn watch<S, F>(source: S, abort_key: Keycode, interval: Duration, mut on_trigger: F)
where
    S: KeyStateSource,
    F: FnMut(),
{
    loop {
        if abort_key_engaged(&source.pressed_keys(), abort_key) {
            on_trigger();
            return;
        }
        thread::sleep(interval);
    }
}

/// Always-on emergency abort monitor.
///
/// Runs on its own detached OS thread for the whole process lifetime and
/// shares no state with the main context. Its only observable effect is an
/// immediate, non-graceful process exit when the abort key is pressed, even
/// mid-write; the kill switch must keep working while the main thread is
/// wedged in a blocking poll.
pub struct Watchdog;

impl Watchdog {
    /// A spawn failure is fatal: the run must not proceed without the kill
    /// switch.
    pub fn start(abort_key: Keycode, interval: Duration) -> Result<()> {
        thread::Builder::new()
            .name("autosend-watchdog".into())
            .spawn(move || {
                info!("watchdog armed: {abort_key:?} aborts the process");
                watch(DeviceState::new(), abort_key, interval, || {
                    error!("[emergency abort] {abort_key:?} pressed, terminating now");
                    std::process::exit(1);
                });
            })
            .map_err(|err| Error::Watchdog(err.to_string()))?;
        Ok(())
    }
}

/// Map a settings string to the abort key. Only the handful of keys that make
/// sense as a panic button are accepted.
pub fn parse_abort_key(name: &str) -> Option<Keycode> {
    match name.to_ascii_lowercase().as_str() {
        "numpad0" | "num0" => Some(Keycode::Numpad0),
        "escape" | "esc" => Some(Keycode::Escape),
        "f10" => Some(Keycode::F10),
        "f12" => Some(Keycode::F12),
        "pause" => None, // not exposed by the key-state backend
        _ => None,
    }
}
