//! Heading model.

use super::node::{model_handle, Kind, Model, QType};

/// A value-less model, used for headings and as a plain grouping root.
#[derive(Clone)]
pub struct Null {
    model: Model,
}

impl Null {
    /// Create a detached Null model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            model: Model::from_kind(name, Kind::Null),
        }
    }

    pub(crate) fn from_parts(model: Model) -> Self {
        Self { model }
    }
}

model_handle!(Null, QType::Null, as_null);

impl std::fmt::Debug for Null {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Null")
            .field("name", &self.name())
            .field("children", &self.child_count())
            .finish()
    }
}
