//! Boolean flag model.

use std::sync::Arc;

use horizon_qtypes_core::Value;

use super::node::{model_handle, Kind, Model, QType};

/// A model holding a single `bool`.
///
/// # Example
///
/// ```
/// use horizon_qtypes::model::Bool;
///
/// let shutter = Bool::new("shutter", false).with_label("Shutter open");
/// shutter.write(true);
/// assert!(shutter.read());
/// ```
#[derive(Clone)]
pub struct Bool {
    model: Model,
    value: Arc<Value<bool>>,
}

impl Bool {
    /// Create a detached Bool model.
    pub fn new(name: impl Into<String>, value: bool) -> Self {
        let value = Arc::new(Value::new(value));
        let model = Model::from_kind(name, Kind::Bool(value.clone()));
        Self { model, value }
    }

    pub(crate) fn from_parts(model: Model, value: Arc<Value<bool>>) -> Self {
        Self { model, value }
    }

    /// The current value.
    pub fn read(&self) -> bool {
        self.value.read()
    }

    /// Store a value and notify.
    pub fn write(&self, value: bool) {
        self.value.write(value);
        self.model.notify_updated();
    }
}

model_handle!(Bool, QType::Bool, as_bool);

impl std::fmt::Debug for Bool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bool")
            .field("name", &self.name())
            .field("value", &self.read())
            .finish()
    }
}
