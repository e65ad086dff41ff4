//! Button model ↔ push button.

use std::sync::Arc;

use horizon_qtypes_core::ConnectionId;

use super::{sync_common, upgrade_pair, ModelWidget};
use crate::model::{Button, Model};
use crate::widget::controls::{ControlHandle, TriggerControl};

/// Binds a [`Button`] model to a [`TriggerControl`]. The label becomes the
/// button text.
pub struct ButtonWidget {
    model: Button,
    control: Arc<dyn TriggerControl>,
    updated_connection: ConnectionId,
    clicked_connection: ConnectionId,
}

fn sync(model: &Button, control: &dyn TriggerControl) {
    control.set_text(&model.label());
    sync_common(model, control);
}

impl ButtonWidget {
    /// Bind `model` to `control` and bring the control up to date.
    pub fn new(model: Button, control: Arc<dyn TriggerControl>) -> Self {
        sync(&model, control.as_ref());

        let weak_model = model.downgrade();
        let weak_control = Arc::downgrade(&control);
        let updated_connection = model.updated().connect(move |_| {
            if let Some((model, control)) = upgrade_pair::<Button, _>(&weak_model, &weak_control) {
                sync(&model, control.as_ref());
            }
        });

        let weak_model = model.downgrade();
        let clicked_connection = control.clicked().connect(move |_| {
            if let Some(model) = weak_model.upgrade_as::<Button>() {
                model.press();
            }
        });

        Self {
            model,
            control,
            updated_connection,
            clicked_connection,
        }
    }
}

impl ModelWidget for ButtonWidget {
    fn model(&self) -> Model {
        self.model.model().clone()
    }

    fn control(&self) -> ControlHandle {
        ControlHandle::Trigger(self.control.clone())
    }

    fn refresh(&self) {
        sync(&self.model, self.control.as_ref());
    }
}

impl Drop for ButtonWidget {
    fn drop(&mut self) {
        self.model.updated().disconnect(self.updated_connection);
        self.control.clicked().disconnect(self.clicked_connection);
    }
}
