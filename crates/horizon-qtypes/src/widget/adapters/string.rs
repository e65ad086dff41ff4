//! String model ↔ text entry.

use std::sync::Arc;

use horizon_qtypes_core::ConnectionId;

use super::{sync_common, upgrade_pair, ModelWidget};
use crate::model::{Model, Text};
use crate::widget::controls::{ControlHandle, TextControl};

/// Binds a [`Text`] model to a [`TextControl`].
pub struct StringWidget {
    model: Text,
    control: Arc<dyn TextControl>,
    updated_connection: ConnectionId,
    finished_connection: ConnectionId,
}

fn sync(model: &Text, control: &dyn TextControl) {
    control.set_text(&model.read());
    sync_common(model, control);
}

impl StringWidget {
    /// Bind `model` to `control` and bring the control up to date.
    pub fn new(model: Text, control: Arc<dyn TextControl>) -> Self {
        sync(&model, control.as_ref());

        let weak_model = model.downgrade();
        let weak_control = Arc::downgrade(&control);
        let updated_connection = model.updated().connect(move |_| {
            if let Some((model, control)) = upgrade_pair::<Text, _>(&weak_model, &weak_control) {
                sync(&model, control.as_ref());
            }
        });

        let weak_model = model.downgrade();
        let weak_control = Arc::downgrade(&control);
        let finished_connection = control.editing_finished().connect(move |_| {
            if let Some((model, control)) = upgrade_pair::<Text, _>(&weak_model, &weak_control) {
                model.write(control.text());
            }
        });

        Self {
            model,
            control,
            updated_connection,
            finished_connection,
        }
    }
}

impl ModelWidget for StringWidget {
    fn model(&self) -> Model {
        self.model.model().clone()
    }

    fn control(&self) -> ControlHandle {
        ControlHandle::Text(self.control.clone())
    }

    fn refresh(&self) {
        sync(&self.model, self.control.as_ref());
    }
}

impl Drop for StringWidget {
    fn drop(&mut self) {
        self.model.updated().disconnect(self.updated_connection);
        self.control.editing_finished().disconnect(self.finished_connection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::controls::{Control, LineEdit};

    #[test]
    fn test_two_way_sync() {
        let model = Text::new("sample", "quartz").with_tool_tip("sample name");
        let edit = Arc::new(LineEdit::new());
        let _widget = StringWidget::new(model.clone(), edit.clone());
        assert_eq!(edit.text(), "quartz");
        assert_eq!(edit.tool_tip(), "sample name");

        model.write("silicon");
        assert_eq!(edit.text(), "silicon");

        edit.user_enter("sapphire");
        assert_eq!(model.read(), "sapphire");
    }
}
