use std::path::Path;

use crate::error::Result;
use crate::matching::Template;

/// The named UI anchors the send flow keys off, loaded up front from the
/// template directory so a missing asset fails the run before any contact is
/// touched.
#[derive(Debug)]
pub struct AnchorSet {
    /// "New chat" control in the contact pane.
    pub new_dialogue: Template,
    /// Title of the new-dialogue view; its presence confirms the dialog
    /// opened, its disappearance confirms it closed.
    pub dialogue_title: Template,
    /// Transient indicator shown while the app looks the number up.
    pub lookup_spinner: Template,
    /// "No contact found" notice.
    pub contact_missing: Template,
    /// The message input box.
    pub message_input: Template,
    /// Send affordance that appears once the payload is staged.
    pub send_ready: Template,
}

impl AnchorSet {
    pub fn load(dir: &Path) -> Result<Self> {
        Ok(Self {
            new_dialogue: Template::load(&dir.join("new_dialogue.png"))?,
            dialogue_title: Template::load(&dir.join("dialogue_title.png"))?,
            lookup_spinner: Template::load(&dir.join("lookup_spinner.png"))?,
            contact_missing: Template::load(&dir.join("contact_missing.png"))?,
            message_input: Template::load(&dir.join("message_input.png"))?,
            send_ready: Template::load(&dir.join("send_ready.png"))?,
        })
    }
}
