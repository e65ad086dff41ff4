//! Headless check box.

use horizon_qtypes_core::Signal;
use parking_lot::Mutex;

use super::{impl_control, ControlBase, ToggleControl};

/// An in-memory two-state check box.
///
/// # Signals
///
/// - `toggled(bool)`: Emitted whenever the state changes
/// - `clicked(bool)`: Emitted only when the user clicks, with the new state
#[derive(Debug)]
pub struct CheckBox {
    base: ControlBase,
    checked: Mutex<bool>,

    /// Signal emitted when the checked state changes.
    pub toggled: Signal<bool>,

    /// Signal emitted when the user clicks the check box.
    pub clicked: Signal<bool>,
}

impl Default for CheckBox {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckBox {
    /// Create an unchecked check box.
    pub fn new() -> Self {
        Self {
            base: ControlBase::default(),
            checked: Mutex::new(false),
            toggled: Signal::new(),
            clicked: Signal::new(),
        }
    }

    /// Simulate a user click. Returns whether the input was accepted.
    pub fn user_click(&self) -> bool {
        if !self.base.accepts_input() {
            return false;
        }
        let checked = !self.is_checked();
        self.set_checked(checked);
        self.clicked.emit(checked);
        true
    }
}

impl_control!(CheckBox);

impl ToggleControl for CheckBox {
    fn is_checked(&self) -> bool {
        *self.checked.lock()
    }

    fn set_checked(&self, checked: bool) {
        let changed = {
            let mut current = self.checked.lock();
            let changed = *current != checked;
            *current = checked;
            changed
        };
        if changed {
            self.toggled.emit(checked);
        }
    }

    fn clicked(&self) -> &Signal<bool> {
        &self.clicked
    }
}
