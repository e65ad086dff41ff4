//! Free text model.

use std::sync::Arc;

use horizon_qtypes_core::Value;

use super::node::{model_handle, Kind, Model, QType};

/// A model holding a string (qtype `string`).
#[derive(Clone)]
pub struct Text {
    model: Model,
    value: Arc<Value<String>>,
}

impl Text {
    /// Create a detached String model.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        let value = Arc::new(Value::new(value.into()));
        let model = Model::from_kind(name, Kind::String(value.clone()));
        Self { model, value }
    }

    pub(crate) fn from_parts(model: Model, value: Arc<Value<String>>) -> Self {
        Self { model, value }
    }

    /// The current text.
    pub fn read(&self) -> String {
        self.value.read()
    }

    /// Store text and notify.
    pub fn write(&self, value: impl Into<String>) {
        self.value.write(value.into());
        self.model.notify_updated();
    }
}

model_handle!(Text, QType::String, as_text);

impl std::fmt::Debug for Text {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Text")
            .field("name", &self.name())
            .field("value", &self.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write() {
        let model = Text::new("sample", "none");
        assert_eq!(model.read(), "none");
        model.write("silicon");
        assert_eq!(model.read(), "silicon");
        assert_eq!(model.qtype(), QType::String);
    }
}
