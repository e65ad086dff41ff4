//! Headless push button.

use horizon_qtypes_core::Signal;
use parking_lot::Mutex;

use super::{impl_control, ControlBase, TriggerControl};

/// An in-memory push button.
#[derive(Debug)]
pub struct PushButton {
    base: ControlBase,
    text: Mutex<String>,

    /// Signal emitted when the user clicks the button.
    pub clicked: Signal<()>,
}

impl Default for PushButton {
    fn default() -> Self {
        Self::new()
    }
}

impl PushButton {
    /// Create a button without text.
    pub fn new() -> Self {
        Self {
            base: ControlBase::default(),
            text: Mutex::new(String::new()),
            clicked: Signal::new(),
        }
    }

    /// Simulate a user click. Disabled buttons ignore it.
    pub fn user_click(&self) -> bool {
        if !self.base.is_enabled() {
            return false;
        }
        self.clicked.emit(());
        true
    }
}

impl_control!(PushButton);

impl TriggerControl for PushButton {
    fn text(&self) -> String {
        self.text.lock().clone()
    }

    fn set_text(&self, text: &str) {
        *self.text.lock() = text.to_string();
    }

    fn clicked(&self) -> &Signal<()> {
        &self.clicked
    }
}
