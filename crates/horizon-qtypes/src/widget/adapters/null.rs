//! Null model ↔ label.

use std::sync::Arc;

use horizon_qtypes_core::ConnectionId;

use super::{sync_common, ModelWidget};
use crate::model::{Model, WeakModel};
use crate::widget::controls::{ControlHandle, LabelControl};

/// Shows a model's label in a [`LabelControl`]. Used for headings.
pub struct NullWidget {
    model: Model,
    control: Arc<dyn LabelControl>,
    updated_connection: ConnectionId,
}

fn sync(model: &Model, control: &dyn LabelControl) {
    control.set_text(&model.label());
    sync_common(model, control);
}

impl NullWidget {
    /// Bind `model` to `control` and bring the control up to date.
    pub fn new(model: Model, control: Arc<dyn LabelControl>) -> Self {
        sync(&model, control.as_ref());

        let weak_model: WeakModel = model.downgrade();
        let weak_control = Arc::downgrade(&control);
        let updated_connection = model.updated().connect(move |_| {
            if let (Some(model), Some(control)) = (weak_model.upgrade(), weak_control.upgrade()) {
                sync(&model, control.as_ref());
            }
        });

        Self {
            model,
            control,
            updated_connection,
        }
    }
}

impl ModelWidget for NullWidget {
    fn model(&self) -> Model {
        self.model.clone()
    }

    fn control(&self) -> ControlHandle {
        ControlHandle::Label(self.control.clone())
    }

    fn refresh(&self) {
        sync(&self.model, self.control.as_ref());
    }
}

impl Drop for NullWidget {
    fn drop(&mut self) {
        self.model.updated().disconnect(self.updated_connection);
    }
}
