use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use device_query::Keycode;
use log::{info, warn, LevelFilter};

use autosend::anchors::AnchorSet;
use autosend::input::DesktopInput;
use autosend::ledger::Ledger;
use autosend::matching::Poller;
use autosend::screen::DisplayCapture;
use autosend::sender::{self, ContactProcessor, SendConfig};
use autosend::settings::Settings;
use autosend::watchdog::{parse_abort_key, Watchdog};

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Info)
        .init();

    let settings_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("autosend.json"));
    let settings = Settings::load(&settings_path)?;
    info!("settings loaded from {}", settings_path.display());

    let ledger = Ledger::open(&settings.ledger_path)
        .with_context(|| format!("failed to open ledger {}", settings.ledger_path.display()))?;
    info!(
        "{} pending, {} failed so far",
        ledger.pending_count()?,
        ledger.failed_count()?
    );

    // The watchdog is armed before anything touches the screen.
    let abort_key = parse_abort_key(&settings.abort_key).unwrap_or_else(|| {
        warn!(
            "unknown abort key '{}', falling back to Numpad0",
            settings.abort_key
        );
        Keycode::Numpad0
    });
    Watchdog::start(
        abort_key,
        Duration::from_millis(settings.watchdog_interval_ms),
    )
    .context("cannot run without the emergency abort watchdog")?;

    let anchors = AnchorSet::load(&settings.template_dir)
        .with_context(|| format!("failed to load anchors from {}", settings.template_dir.display()))?;
    let screen = DisplayCapture::primary().context("failed to open primary display")?;
    let mut input = DesktopInput::new().context("failed to initialize input driver")?;

    // Give the operator time to bring the chat app to the foreground.
    for remaining in (1..=3).rev() {
        info!("starting in {remaining}s, switch to the chat window now");
        thread::sleep(Duration::from_secs(1));
    }

    let poller = Poller::with_timeout(
        Duration::from_millis(settings.poll_interval_ms),
        settings.poll_timeout_ms.map(Duration::from_millis),
    );
    let cfg = SendConfig {
        region: settings.search_region,
        threshold: settings.match_threshold,
        settle: Duration::from_millis(settings.settle_ms),
        close_control: settings.close_control,
        first_result: settings.first_result,
        staging_area: settings.staging_area,
    };
    let mut processor = ContactProcessor::new(&screen, &mut input, &anchors, poller, cfg);

    let summary = sender::run(
        &ledger,
        &mut processor,
        settings.run_mode,
        settings.pause_after_send_secs,
    )?;
    info!(
        "done: {} processed, {} sent, {} failed",
        summary.processed, summary.sent, summary.failed
    );
    Ok(())
}
