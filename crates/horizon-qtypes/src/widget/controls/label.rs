//! Headless text label.

use parking_lot::Mutex;

use super::{impl_control, ControlBase, LabelControl};

/// An in-memory static text label.
#[derive(Debug, Default)]
pub struct Label {
    base: ControlBase,
    text: Mutex<String>,
}

impl Label {
    /// Create an empty label.
    pub fn new() -> Self {
        Self::default()
    }
}

impl_control!(Label);

impl LabelControl for Label {
    fn text(&self) -> String {
        self.text.lock().clone()
    }

    fn set_text(&self, text: &str) {
        *self.text.lock() = text.to_string();
    }
}
