use std::thread;
use std::time::{Duration, Instant};

use crate::anchors::AnchorSet;
use crate::error::Result;
use crate::input::InputDriver;
use crate::ledger::Contact;
use crate::matching::{match_once, Poller};
use crate::screen::{Point, Region, ScreenCapture};

use super::state::{Outcome, Phase, SendSession};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Fixed screen geometry and cadence for the send flow.
#[derive(Debug, Clone, Copy)]
pub struct SendConfig {
    /// Region every anchor is searched in.
    pub region: Region,
    pub threshold: f64,
    /// Settle pause between consecutive UI actions.
    pub settle: Duration,
    /// Close control of the new-dialogue view. A fixed point, not an anchor —
    /// the app offers no stable template there.
    pub close_control: Point,
    /// First row of the lookup result list.
    pub first_result: Point,
    /// Staging area holding the prepared payload.
    pub staging_area: Point,
}

/// What one processor invocation did, for logging and assertions.
#[derive(Debug)]
pub struct SendReport {
    pub outcome: Outcome,
    pub session: SendSession,
}

/// Drives exactly one contact from `Idle` through a terminal outcome. The
/// caller owns the loop across contacts and the ledger mutation that follows.
pub struct ContactProcessor<'a, S: ScreenCapture, I: InputDriver> {
    screen: &'a S,
    input: &'a mut I,
    anchors: &'a AnchorSet,
    poller: Poller,
    cfg: SendConfig,
}

impl<'a, S: ScreenCapture, I: InputDriver> ContactProcessor<'a, S, I> {
    pub fn new(
        screen: &'a S,
        input: &'a mut I,
        anchors: &'a AnchorSet,
        poller: Poller,
        cfg: SendConfig,
    ) -> Self {
        Self {
            screen,
            input,
            anchors,
            poller,
            cfg,
        }
    }

    pub fn process(&mut self, contact: &Contact) -> Result<SendReport> {
        let region = self.cfg.region;
        let threshold = self.cfg.threshold;
        let mut session = SendSession::new(contact);

        session.enter(Phase::LocatingDialogTarget);
        let target =
            self.poller
                .poll_until_match(self.screen, region, &self.anchors.new_dialogue, threshold)?;
        self.input.click(target.x, target.y)?;

        // First clicks on this control sometimes don't register; keep
        // re-clicking the same point until the dialogue title shows up.
        let started = Instant::now();
        while !match_once(self.screen, region, &self.anchors.dialogue_title, threshold)?.is_match()
        {
            log_warn!("dialogue did not open, re-clicking ({}, {})", target.x, target.y);
            self.input.click(target.x, target.y)?;
            self.poller.check_deadline("dialogue_title", started)?;
            thread::sleep(self.poller.interval);
        }
        session.enter(Phase::DialogOpened);

        self.input.select_all()?;
        self.input.type_text(&contact.phone)?;
        session.enter(Phase::NumberEntered);
        self.settle();

        self.poller
            .poll_while_match(self.screen, region, &self.anchors.lookup_spinner, threshold)?;
        session.enter(Phase::AwaitingLookup);

        if match_once(self.screen, region, &self.anchors.contact_missing, threshold)?.is_match() {
            log_info!("'{}' not found, dismissing dialogue", contact.phone);
            session.enter(Phase::MarkFailed);
            let close = self.cfg.close_control;
            self.input.click(close.x, close.y)?;
            self.settle();
            self.dismiss_dialogue(close)?;
            return Ok(SendReport {
                outcome: Outcome::Failed,
                session,
            });
        }

        // Lookup hit: open the chat via the first result row.
        let first_result = self.cfg.first_result;
        self.input.click(first_result.x, first_result.y)?;
        self.settle();
        self.dismiss_dialogue(first_result)?;

        // Stage the payload: activate the staging area, grab everything in it.
        self.input
            .click(self.cfg.staging_area.x, self.cfg.staging_area.y)?;
        self.settle();
        self.input.select_all()?;
        self.input.copy()?;
        self.settle();

        // The input box can be obstructed by other UI; wait for it properly.
        let input_box =
            self.poller
                .poll_until_match(self.screen, region, &self.anchors.message_input, threshold)?;
        self.input.click(input_box.x, input_box.y)?;
        self.input.paste()?;
        self.settle();

        self.poller
            .poll_until_match(self.screen, region, &self.anchors.send_ready, threshold)?;
        self.input.press_submit()?;
        log_info!("payload sent to '{}'", contact.phone);
        session.enter(Phase::AttachAndSend);

        Ok(SendReport {
            outcome: Outcome::Sent,
            session,
        })
    }

    /// Confirm the dialogue title is gone, re-clicking `point` on every failed
    /// check. Same cadence and deadline as the open-confirmation loop.
    fn dismiss_dialogue(&mut self, point: Point) -> Result<()> {
        let started = Instant::now();
        while match_once(
            self.screen,
            self.cfg.region,
            &self.anchors.dialogue_title,
            self.cfg.threshold,
        )?
        .is_match()
        {
            log_warn!("dialogue still open, re-clicking ({}, {})", point.x, point.y);
            self.input.click(point.x, point.y)?;
            self.poller.check_deadline("dialogue_title", started)?;
            thread::sleep(self.poller.interval);
        }
        Ok(())
    }

    fn settle(&self) {
        thread::sleep(self.cfg.settle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::matching::Template;
    use crate::testutil::{blank_frame, frame_with, pattern, Action, RecordingInput, ScriptedScreen};
    use image::GrayImage;

    fn anchors() -> AnchorSet {
        AnchorSet {
            new_dialogue: Template::from_image("new_dialogue", pattern(1, 16, 10)),
            dialogue_title: Template::from_image("dialogue_title", pattern(2, 16, 10)),
            lookup_spinner: Template::from_image("lookup_spinner", pattern(3, 16, 10)),
            contact_missing: Template::from_image("contact_missing", pattern(4, 16, 10)),
            message_input: Template::from_image("message_input", pattern(5, 16, 10)),
            send_ready: Template::from_image("send_ready", pattern(6, 16, 10)),
        }
    }

    fn config() -> SendConfig {
        SendConfig {
            region: Region::new(0, 0, 100, 60),
            threshold: 0.9,
            settle: Duration::ZERO,
            close_control: Point { x: 90, y: 5 },
            first_result: Point { x: 80, y: 20 },
            staging_area: Point { x: 50, y: 50 },
        }
    }

    fn contact() -> Contact {
        Contact {
            name: "Bob".into(),
            phone: "85287654321".into(),
            row_id: 1,
        }
    }

    fn f_new(a: &AnchorSet) -> GrayImage {
        frame_with(&a.new_dialogue.image, 30, 20) // center (38, 25)
    }

    fn f_title(a: &AnchorSet) -> GrayImage {
        frame_with(&a.dialogue_title.image, 10, 40)
    }

    fn f_missing(a: &AnchorSet) -> GrayImage {
        frame_with(&a.contact_missing.image, 50, 10)
    }

    fn f_input(a: &AnchorSet) -> GrayImage {
        frame_with(&a.message_input.image, 20, 30) // center (28, 35)
    }

    fn f_send(a: &AnchorSet) -> GrayImage {
        frame_with(&a.send_ready.image, 70, 45)
    }

    fn run_script(frames: Vec<GrayImage>) -> (SendReport, RecordingInput) {
        let a = anchors();
        let screen = ScriptedScreen::new(frames);
        let mut input = RecordingInput::new();
        let report = {
            let mut processor = ContactProcessor::new(
                &screen,
                &mut input,
                &a,
                Poller::new(Duration::from_millis(1)),
                config(),
            );
            processor.process(&contact()).unwrap()
        };
        (report, input)
    }

    #[test]
    fn found_contact_completes_the_send_path() {
        let a = anchors();
        // Capture order: locate target, confirm open, spinner gone, no
        // missing-notice, title gone after result click, input box, send anchor.
        let frames = vec![
            f_new(&a),
            f_title(&a),
            blank_frame(100, 60),
            blank_frame(100, 60),
            blank_frame(100, 60),
            f_input(&a),
            f_send(&a),
        ];
        let (report, input) = run_script(frames);

        assert_eq!(report.outcome, Outcome::Sent);
        assert_eq!(
            report.session.trail(),
            &[
                Phase::Idle,
                Phase::LocatingDialogTarget,
                Phase::DialogOpened,
                Phase::NumberEntered,
                Phase::AwaitingLookup,
                Phase::AttachAndSend,
            ]
        );

        assert_eq!(input.clicks_at(38, 25), 1); // new-dialogue center
        assert_eq!(input.clicks_at(80, 20), 1); // first result
        assert_eq!(input.clicks_at(50, 50), 1); // staging area
        assert_eq!(input.clicks_at(28, 35), 1); // message input center
        assert!(input.actions.contains(&Action::Type("85287654321".into())));
        assert!(input.actions.contains(&Action::Copy));
        assert!(input.actions.contains(&Action::Paste));
        assert_eq!(input.actions.last(), Some(&Action::Submit));
    }

    #[test]
    fn missing_contact_dismisses_and_fails() {
        let a = anchors();
        // Dismissal confirm sees the title once more, forcing one re-click of
        // the close control before it clears.
        let frames = vec![
            f_new(&a),
            f_title(&a),
            blank_frame(100, 60),
            f_missing(&a),
            f_title(&a),
            blank_frame(100, 60),
        ];
        let (report, input) = run_script(frames);

        assert_eq!(report.outcome, Outcome::Failed);
        assert_eq!(report.session.phase(), Phase::MarkFailed);
        assert_eq!(input.clicks_at(90, 5), 2); // dismissal click + one re-click
        assert!(!input.actions.contains(&Action::Paste));
        assert!(!input.actions.contains(&Action::Submit));
    }

    fn run_script_with(
        poller: Poller,
        frames: Vec<GrayImage>,
    ) -> (Result<SendReport>, RecordingInput) {
        let a = anchors();
        let screen = ScriptedScreen::new(frames);
        let mut input = RecordingInput::new();
        let report = {
            let mut processor = ContactProcessor::new(&screen, &mut input, &a, poller, config());
            processor.process(&contact())
        };
        (report, input)
    }

    fn bounded_poller() -> Poller {
        Poller::with_timeout(Duration::from_millis(1), Some(Duration::from_millis(5)))
    }

    #[test]
    fn timeout_bounds_the_open_confirmation_loop() {
        let a = anchors();
        // The dialogue title never appears after the target click; the
        // scripted screen keeps serving the final blank frame.
        let frames = vec![f_new(&a), blank_frame(100, 60)];
        let (report, _input) = run_script_with(bounded_poller(), frames);

        assert!(matches!(report.unwrap_err(), Error::PollTimeout { .. }));
    }

    #[test]
    fn timeout_bounds_the_dismissal_loop() {
        let a = anchors();
        // The title sticks around forever after the not-found dismissal click.
        let frames = vec![
            f_new(&a),
            f_title(&a),
            blank_frame(100, 60),
            f_missing(&a),
            f_title(&a),
        ];
        let (report, _input) = run_script_with(bounded_poller(), frames);

        assert!(matches!(report.unwrap_err(), Error::PollTimeout { .. }));
    }

    #[test]
    fn unregistered_first_click_is_retried() {
        let a = anchors();
        // Title absent after the first click → the target is clicked again.
        let frames = vec![
            f_new(&a),
            blank_frame(100, 60),
            f_title(&a),
            blank_frame(100, 60),
            blank_frame(100, 60),
            blank_frame(100, 60),
            f_input(&a),
            f_send(&a),
        ];
        let (report, input) = run_script(frames);

        assert_eq!(report.outcome, Outcome::Sent);
        assert_eq!(input.clicks_at(38, 25), 2);
    }
}
