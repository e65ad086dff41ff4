//! Headless single-line text entry.

use horizon_qtypes_core::Signal;
use parking_lot::Mutex;

use super::{impl_control, ControlBase, TextControl};

/// An in-memory line edit.
///
/// # Signals
///
/// - `text_changed(String)`: Emitted whenever the text changes
/// - `editing_finished()`: Emitted when the user commits
#[derive(Debug)]
pub struct LineEdit {
    base: ControlBase,
    text: Mutex<String>,

    /// Signal emitted when the text changes.
    pub text_changed: Signal<String>,

    /// Signal emitted when the user finishes editing.
    pub editing_finished: Signal<()>,
}

impl Default for LineEdit {
    fn default() -> Self {
        Self::new()
    }
}

impl LineEdit {
    /// Create an empty line edit.
    pub fn new() -> Self {
        Self {
            base: ControlBase::default(),
            text: Mutex::new(String::new()),
            text_changed: Signal::new(),
            editing_finished: Signal::new(),
        }
    }

    /// Simulate the user replacing the text and pressing Enter.
    pub fn user_enter(&self, text: &str) -> bool {
        if !self.base.accepts_input() {
            return false;
        }
        self.set_text(text);
        self.editing_finished.emit(());
        true
    }
}

impl_control!(LineEdit);

impl TextControl for LineEdit {
    fn text(&self) -> String {
        self.text.lock().clone()
    }

    fn set_text(&self, text: &str) {
        let changed = {
            let mut current = self.text.lock();
            if *current == text {
                false
            } else {
                *current = text.to_string();
                true
            }
        };
        if changed {
            self.text_changed.emit(text.to_string());
        }
    }

    fn editing_finished(&self) -> &Signal<()> {
        &self.editing_finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::controls::Control;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_user_enter_commits() {
        let edit = LineEdit::new();
        let commits = Arc::new(AtomicUsize::new(0));
        let commits_clone = commits.clone();
        edit.editing_finished.connect(move |_| {
            commits_clone.fetch_add(1, Ordering::SeqCst);
        });

        edit.set_text("quiet");
        assert_eq!(commits.load(Ordering::SeqCst), 0);

        assert!(edit.user_enter("loud"));
        assert_eq!(edit.text(), "loud");
        assert_eq!(commits.load(Ordering::SeqCst), 1);

        edit.set_enabled(false);
        assert!(!edit.user_enter("ignored"));
        assert_eq!(edit.text(), "loud");
    }
}
