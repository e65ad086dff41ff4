//! Headless combo box.

use horizon_qtypes_core::Signal;
use parking_lot::Mutex;

use super::{impl_control, ChoiceControl, ControlBase};

#[derive(Debug, Default)]
struct ComboState {
    items: Vec<String>,
    current: Option<usize>,
}

/// An in-memory drop-down list of text items.
///
/// # Signals
///
/// - `current_index_changed(usize)`: Emitted whenever the selection moves
/// - `activated(usize)`: Emitted only when the user picks an item
#[derive(Debug)]
pub struct ComboBox {
    base: ControlBase,
    state: Mutex<ComboState>,

    /// Signal emitted when the current index changes.
    pub current_index_changed: Signal<usize>,

    /// Signal emitted when the user selects an item.
    pub activated: Signal<usize>,
}

impl Default for ComboBox {
    fn default() -> Self {
        Self::new()
    }
}

impl ComboBox {
    /// Create an empty combo box.
    pub fn new() -> Self {
        Self {
            base: ControlBase::default(),
            state: Mutex::new(ComboState::default()),
            current_index_changed: Signal::new(),
            activated: Signal::new(),
        }
    }

    /// Add items using builder pattern.
    pub fn with_items<I, S>(self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<String> = items.into_iter().map(Into::into).collect();
        self.add_items(&items);
        self
    }

    /// Position of the first item with exactly this text.
    pub fn find_text(&self, text: &str) -> Option<usize> {
        self.state.lock().items.iter().position(|item| item == text)
    }

    /// Simulate the user picking the item at `index`. Returns whether the
    /// input was accepted.
    pub fn user_select(&self, index: usize) -> bool {
        if !self.base.accepts_input() || index >= self.count() {
            return false;
        }
        self.set_current_index(index);
        self.activated.emit(index);
        true
    }

    /// Simulate the user picking the item with this text.
    pub fn user_select_text(&self, text: &str) -> bool {
        match self.find_text(text) {
            Some(index) => self.user_select(index),
            None => false,
        }
    }
}

impl_control!(ComboBox);

impl ChoiceControl for ComboBox {
    fn count(&self) -> usize {
        self.state.lock().items.len()
    }

    fn item_text(&self, index: usize) -> Option<String> {
        self.state.lock().items.get(index).cloned()
    }

    fn add_items(&self, items: &[String]) {
        let selected = {
            let mut state = self.state.lock();
            state.items.extend(items.iter().cloned());
            if state.current.is_none() && !state.items.is_empty() {
                state.current = Some(0);
                Some(0)
            } else {
                None
            }
        };
        if let Some(index) = selected {
            self.current_index_changed.emit(index);
        }
    }

    fn clear(&self) {
        let mut state = self.state.lock();
        state.items.clear();
        state.current = None;
    }

    fn current_index(&self) -> Option<usize> {
        self.state.lock().current
    }

    fn set_current_index(&self, index: usize) {
        let changed = {
            let mut state = self.state.lock();
            if index < state.items.len() && state.current != Some(index) {
                state.current = Some(index);
                true
            } else {
                false
            }
        };
        if changed {
            self.current_index_changed.emit(index);
        }
    }

    fn activated(&self) -> &Signal<usize> {
        &self.activated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_items_and_selection() {
        let combo = ComboBox::new().with_items(["mm", "cm", "m"]);
        assert_eq!(combo.count(), 3);
        assert_eq!(combo.current_index(), Some(0));
        assert_eq!(combo.current_text().as_deref(), Some("mm"));

        combo.set_current_index(2);
        assert_eq!(combo.current_text().as_deref(), Some("m"));

        combo.set_current_index(7);
        assert_eq!(combo.current_index(), Some(2));
        assert_eq!(combo.find_text("cm"), Some(1));
    }

    #[test]
    fn test_activated_only_on_user_selection() {
        let combo = ComboBox::new().with_items(["a", "b"]);
        let picked = Arc::new(Mutex::new(Vec::new()));
        let picked_clone = picked.clone();
        combo.activated.connect(move |index| picked_clone.lock().push(*index));

        combo.set_current_index(1);
        assert!(picked.lock().is_empty());

        assert!(combo.user_select_text("a"));
        assert!(!combo.user_select(5));
        assert_eq!(picked.lock().as_slice(), &[0]);
    }

    #[test]
    fn test_clear() {
        let combo = ComboBox::new().with_items(["a"]);
        combo.clear();
        assert_eq!(combo.count(), 0);
        assert_eq!(combo.current_index(), None);
        assert_eq!(combo.items(), Vec::<String>::new());
    }
}
