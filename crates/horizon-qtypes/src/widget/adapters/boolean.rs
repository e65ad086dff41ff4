//! Bool model ↔ toggle control.

use std::sync::Arc;

use horizon_qtypes_core::logging::targets;
use horizon_qtypes_core::ConnectionId;

use super::{sync_common, upgrade_pair, ModelWidget};
use crate::model::{Bool, Model};
use crate::widget::controls::{ControlHandle, ToggleControl};

/// Binds a [`Bool`] to a [`ToggleControl`].
pub struct BoolWidget {
    model: Bool,
    control: Arc<dyn ToggleControl>,
    updated_connection: ConnectionId,
    clicked_connection: ConnectionId,
}

fn sync(model: &Bool, control: &dyn ToggleControl) {
    control.set_checked(model.read());
    sync_common(model, control);
}

impl BoolWidget {
    /// Bind `model` to `control` and bring the control up to date.
    pub fn new(model: Bool, control: Arc<dyn ToggleControl>) -> Self {
        sync(&model, control.as_ref());

        let weak_model = model.downgrade();
        let weak_control = Arc::downgrade(&control);
        let updated_connection = model.updated().connect(move |_| {
            if let Some((model, control)) = upgrade_pair::<Bool, _>(&weak_model, &weak_control) {
                sync(&model, control.as_ref());
            }
        });

        let weak_model = model.downgrade();
        let clicked_connection = control.clicked().connect(move |checked| {
            if let Some(model) = weak_model.upgrade_as::<Bool>() {
                tracing::trace!(target: targets::WIDGET, name = model.name(), checked, "toggle committed");
                model.write(*checked);
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

impl ModelWidget for BoolWidget {
    fn model(&self) -> Model {
        self.model.model().clone()
    }

    fn control(&self) -> ControlHandle {
        ControlHandle::Toggle(self.control.clone())
    }

    fn refresh(&self) {
        sync(&self.model, self.control.as_ref());
    }
}

impl Drop for BoolWidget {
    fn drop(&mut self) {
        self.model.updated().disconnect(self.updated_connection);
        self.control.clicked().disconnect(self.clicked_connection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::controls::CheckBox;

    #[test]
    fn test_two_way_sync() {
        let model = Bool::new("shutter", true);
        let check = Arc::new(CheckBox::new());
        let widget = BoolWidget::new(model.clone(), check.clone());
        assert!(check.is_checked());

        model.write(false);
        assert!(!check.is_checked());

        check.user_click();
        assert!(model.read());

        drop(widget);
        assert_eq!(model.updated().connection_count(), 0);
        assert_eq!(check.clicked.connection_count(), 0);
    }

    #[test]
    fn test_disabled_model_blocks_input() {
        let model = Bool::new("shutter", false).with_disabled(true);
        let check = Arc::new(CheckBox::new());
        let _widget = BoolWidget::new(model.clone(), check.clone());

        assert!(!check.user_click());
        assert!(!model.read());

        model.set_disabled(false);
        assert!(check.user_click());
        assert!(model.read());
    }
}
