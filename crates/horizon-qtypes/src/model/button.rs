//! Stateless trigger model.

use super::node::{model_handle, Kind, Model, QType};

/// A model with no value. Writing it fires "updated" once.
///
/// The label is used as the button text.
#[derive(Clone)]
pub struct Button {
    model: Model,
}

impl Button {
    /// Create a detached Button model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            model: Model::from_kind(name, Kind::Button),
        }
    }

    pub(crate) fn from_parts(model: Model) -> Self {
        Self { model }
    }

    /// Fire the trigger.
    pub fn press(&self) {
        self.model.notify_updated();
    }

    /// Same as [`press`](Self::press).
    pub fn write(&self) {
        self.press();
    }
}

model_handle!(Button, QType::Button, as_button);

impl std::fmt::Debug for Button {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Button").field("name", &self.name()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_press_fires_once_per_call() {
        let button = Button::new("home").with_label("Home");
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        button.updated().connect(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        button.press();
        button.write();

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
