use enigo::{Button, Coordinate, Direction, Enigo, Key, Keyboard, Mouse, Settings};

use crate::error::{Error, Result};

/// Boundary for injecting pointer and keyboard events into the chat app.
///
/// The action set is exactly what the send flow needs: click a point, type a
/// phone number, the select-all/copy/paste chords, and the submit key.
pub trait InputDriver {
    fn click(&mut self, x: i32, y: i32) -> Result<()>;
    fn type_text(&mut self, text: &str) -> Result<()>;
    fn select_all(&mut self) -> Result<()>;
    fn copy(&mut self) -> Result<()>;
    fn paste(&mut self) -> Result<()>;
    /// Single key press that submits the staged message (Enter).
    fn press_submit(&mut self) -> Result<()>;
}

/// Production driver backed by OS-level event injection.
pub struct DesktopInput {
    enigo: Enigo,
}

impl DesktopInput {
    pub fn new() -> Result<Self> {
        let enigo =
            Enigo::new(&Settings::default()).map_err(|err| Error::Input(err.to_string()))?;
        Ok(Self { enigo })
    }

    fn chord(&mut self, letter: char) -> Result<()> {
        self.enigo
            .key(Key::Control, Direction::Press)
            .and_then(|_| self.enigo.key(Key::Unicode(letter), Direction::Click))
            .and_then(|_| self.enigo.key(Key::Control, Direction::Release))
            .map_err(|err| Error::Input(err.to_string()))
    }
}

impl InputDriver for DesktopInput {
    fn click(&mut self, x: i32, y: i32) -> Result<()> {
        self.enigo
            .move_mouse(x, y, Coordinate::Abs)
            .and_then(|_| self.enigo.button(Button::Left, Direction::Click))
            .map_err(|err| Error::Input(err.to_string()))
    }

    fn type_text(&mut self, text: &str) -> Result<()> {
        self.enigo
            .text(text)
            .map_err(|err| Error::Input(err.to_string()))
    }

    fn select_all(&mut self) -> Result<()> {
        self.chord('a')
    }

    fn copy(&mut self) -> Result<()> {
        self.chord('c')
    }

    fn paste(&mut self) -> Result<()> {
        self.chord('v')
    }

    fn press_submit(&mut self) -> Result<()> {
        self.enigo
            .key(Key::Return, Direction::Click)
            .map_err(|err| Error::Input(err.to_string()))
    }
}
