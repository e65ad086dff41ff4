//! Enum model ↔ choice control.

use std::sync::Arc;

use horizon_qtypes_core::logging::targets;
use horizon_qtypes_core::ConnectionId;

use super::{sync_common, upgrade_pair, ModelWidget};
use crate::model::{Enum, Model};
use crate::widget::controls::{ChoiceControl, ControlHandle};

/// Binds an [`Enum`] to a [`ChoiceControl`].
///
/// The control's items follow the model's option list.
pub struct EnumWidget {
    model: Enum,
    control: Arc<dyn ChoiceControl>,
    updated_connection: ConnectionId,
    activated_connection: ConnectionId,
}

fn sync(model: &Enum, control: &dyn ChoiceControl) {
    let options = model.options();
    if control.items() != options {
        control.clear();
        control.add_items(&options);
    }
    if let Some(index) = model.index() {
        control.set_current_index(index);
    }
    sync_common(model, control);
}

impl EnumWidget {
    /// Bind `model` to `control` and bring the control up to date.
    pub fn new(model: Enum, control: Arc<dyn ChoiceControl>) -> Self {
        sync(&model, control.as_ref());

        let weak_model = model.downgrade();
        let weak_control = Arc::downgrade(&control);
        let updated_connection = model.updated().connect(move |_| {
            if let Some((model, control)) = upgrade_pair::<Enum, _>(&weak_model, &weak_control) {
                sync(&model, control.as_ref());
            }
        });

        let weak_model = model.downgrade();
        let weak_control = Arc::downgrade(&control);
        let activated_connection = control.activated().connect(move |index| {
            let Some((model, control)) = upgrade_pair::<Enum, _>(&weak_model, &weak_control) else {
                return;
            };
            let Some(text) = control.item_text(*index) else {
                return;
            };
            if let Err(err) = model.write(&text) {
                tracing::warn!(target: targets::WIDGET, error = %err, "selection rejected");
                sync(&model, control.as_ref());
            }
        });

        Self {
            model,
            control,
            updated_connection,
            activated_connection,
        }
    }
}

impl ModelWidget for EnumWidget {
    fn model(&self) -> Model {
        self.model.model().clone()
    }

    fn control(&self) -> ControlHandle {
        ControlHandle::Choice(self.control.clone())
    }

    fn refresh(&self) {
        sync(&self.model, self.control.as_ref());
    }
}

impl Drop for EnumWidget {
    fn drop(&mut self) {
        self.model.updated().disconnect(self.updated_connection);
        self.control.activated().disconnect(self.activated_connection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::controls::ComboBox;

    #[test]
    fn test_items_follow_options() {
        let model = Enum::new("mode", ["scan", "static"]);
        let combo = Arc::new(ComboBox::new());
        let _widget = EnumWidget::new(model.clone(), combo.clone());
        assert_eq!(combo.items(), ["scan", "static"]);

        model.write("static").unwrap();
        model.set_options(["a", "static", "b"]);
        assert_eq!(combo.items(), ["a", "static", "b"]);
        assert_eq!(combo.current_text().as_deref(), Some("static"));
    }

    #[test]
    fn test_dropped_selection_falls_back_to_first_item() {
        let model = Enum::new("mode", ["scan", "static"]);
        let combo = Arc::new(ComboBox::new());
        let _widget = EnumWidget::new(model.clone(), combo.clone());

        model.set_options(["a", "static", "b"]);
        assert_eq!(model.read(), "a");
        assert_eq!(combo.current_text().as_deref(), Some("a"));
        assert_eq!(combo.current_index(), Some(0));
    }

    #[test]
    fn test_user_selection_writes_model() {
        let model = Enum::new("mode", ["scan", "static"]);
        let combo = Arc::new(ComboBox::new());
        let _widget = EnumWidget::new(model.clone(), combo.clone());

        combo.user_select_text("static");
        assert_eq!(model.read(), "static");

        model.write("scan").unwrap();
        assert_eq!(combo.current_index(), Some(0));
    }
}
