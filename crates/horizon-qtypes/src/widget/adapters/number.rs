//! Number model ↔ numeric control.

use std::sync::Arc;

use horizon_qtypes_core::logging::targets;
use horizon_qtypes_core::ConnectionId;

use super::{sync_common, upgrade_pair, ModelWidget};
use crate::model::{Model, Number};
use crate::widget::controls::{ControlHandle, NumericControl};

/// Text shown by the control while the number is NaN.
pub const NAN_TEXT: &str = "nan";

/// Binds a [`Number`] to a [`NumericControl`].
///
/// The control's range follows the number's limits expressed in the number's
/// units. A NaN value is shown as [`NAN_TEXT`] with the control parked at its
/// minimum. Non-display numbers show their range as tool tip.
pub struct NumberWidget {
    model: Number,
    control: Arc<dyn NumericControl>,
    updated_connection: ConnectionId,
    range_connection: ConnectionId,
    steps_connection: ConnectionId,
    finished_connection: ConnectionId,
}

fn sync_value(model: &Number, control: &dyn NumericControl) {
    let value = model.read();
    if value.is_nan() {
        control.set_special_value_text(Some(NAN_TEXT));
        control.set_value(control.minimum());
    } else {
        control.set_special_value_text(None);
        control.set_value(value);
    }
    sync_common(model, control);
    if let Some(tool_tip) = model.range_tool_tip() {
        control.set_tool_tip(&tool_tip);
    }
}

fn sync_range(model: &Number, control: &dyn NumericControl, range: (f64, f64)) {
    control.set_range(range.0, range.1);
    sync_value(model, control);
}

fn sync_all(model: &Number, control: &dyn NumericControl) {
    let steps = model.steps();
    control.set_decimals(steps.decimals);
    control.set_single_step(steps.single_step);
    match model.control_range() {
        Ok(range) => sync_range(model, control, range),
        Err(err) => {
            tracing::warn!(target: targets::WIDGET, name = model.name(), error = %err, "no control range");
            sync_value(model, control);
        }
    }
}

impl NumberWidget {
    /// Bind `model` to `control` and bring the control up to date.
    pub fn new(model: Number, control: Arc<dyn NumericControl>) -> Self {
        sync_all(&model, control.as_ref());

        let weak_model = model.downgrade();
        let weak_control = Arc::downgrade(&control);
        let updated_connection = model.updated().connect(move |_| {
            if let Some((model, control)) = upgrade_pair::<Number, _>(&weak_model, &weak_control) {
                sync_value(&model, control.as_ref());
            }
        });

        let weak_model = model.downgrade();
        let weak_control = Arc::downgrade(&control);
        let range_connection = model.range_changed().connect(move |range| {
            if let Some((model, control)) = upgrade_pair::<Number, _>(&weak_model, &weak_control) {
                sync_range(&model, control.as_ref(), *range);
            }
        });

        let weak_control = Arc::downgrade(&control);
        let steps_connection = model.steps_changed().connect(move |steps| {
            if let Some(control) = weak_control.upgrade() {
                control.set_decimals(steps.decimals);
                control.set_single_step(steps.single_step);
            }
        });

        let weak_model = model.downgrade();
        let weak_control = Arc::downgrade(&control);
        let finished_connection = control.editing_finished().connect(move |_| {
            if let Some((model, control)) = upgrade_pair::<Number, _>(&weak_model, &weak_control) {
                let value = control.value();
                tracing::trace!(target: targets::WIDGET, name = model.name(), value, "number committed");
                model.write(value);
            }
        });

        Self {
            model,
            control,
            updated_connection,
            range_connection,
            steps_connection,
            finished_connection,
        }
    }
}

impl ModelWidget for NumberWidget {
    fn model(&self) -> Model {
        self.model.model().clone()
    }

    fn control(&self) -> ControlHandle {
        ControlHandle::Numeric(self.control.clone())
    }

    fn refresh(&self) {
        sync_all(&self.model, self.control.as_ref());
    }
}

impl Drop for NumberWidget {
    fn drop(&mut self) {
        self.model.updated().disconnect(self.updated_connection);
        self.model.range_changed().disconnect(self.range_connection);
        self.model.steps_changed().disconnect(self.steps_connection);
        self.control.editing_finished().disconnect(self.finished_connection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NumberLimits;
    use crate::widget::controls::{Control, SpinBox};

    fn position() -> Number {
        Number::builder("position")
            .value(50.0)
            .units("mm")
            .limits(NumberLimits::new(0.0, 100.0))
            .decimals(4)
            .build()
            .unwrap()
    }

    #[test]
    fn test_initial_sync() {
        let spin = Arc::new(SpinBox::new());
        let _widget = NumberWidget::new(position(), spin.clone());

        assert_eq!(spin.minimum(), 0.0);
        assert_eq!(spin.maximum(), 100.0);
        assert_eq!(spin.value(), 50.0);
        assert_eq!(spin.decimals(), 4);
        assert_eq!(spin.tool_tip(), "min: 0\nmax: 100");
    }

    #[test]
    fn test_convert_rescales_control() {
        let model = position();
        let spin = Arc::new(SpinBox::new());
        let _widget = NumberWidget::new(model.clone(), spin.clone());

        model.convert("m").unwrap();

        assert_eq!(spin.minimum(), 0.0);
        assert_eq!(spin.maximum(), 0.1);
        assert!((spin.value() - 0.05).abs() < 1e-12);
        assert_eq!(spin.tool_tip(), "min: 0\nmax: 0.1");
    }

    #[test]
    fn test_nan_parks_at_minimum() {
        let model = Number::builder("delay")
            .limits(NumberLimits::new(-5.0, 5.0))
            .build()
            .unwrap();
        let spin = Arc::new(SpinBox::new());
        let _widget = NumberWidget::new(model.clone(), spin.clone());

        assert_eq!(spin.value(), -5.0);
        assert_eq!(spin.display_text(), NAN_TEXT);

        model.write(1.0);
        assert_eq!(spin.special_value_text(), None);
        assert_eq!(spin.value(), 1.0);

        model.write(f64::NAN);
        assert_eq!(spin.display_text(), NAN_TEXT);
    }

    #[test]
    fn test_commit_writes_model() {
        let model = position();
        let spin = Arc::new(SpinBox::new());
        let _widget = NumberWidget::new(model.clone(), spin.clone());

        spin.user_enter(75.0);
        assert_eq!(model.read(), 75.0);

        spin.user_enter(500.0);
        assert_eq!(model.read(), 100.0);
    }

    #[test]
    fn test_limit_writes_reach_control() {
        let model = position();
        let spin = Arc::new(SpinBox::new());
        let _widget = NumberWidget::new(model.clone(), spin.clone());

        model.limits().write(0.0, 20.0);
        assert_eq!(spin.maximum(), 20.0);
        assert_eq!(spin.value(), 20.0);
        assert_eq!(model.read(), 50.0);
    }

    #[test]
    fn test_display_number_keeps_model_tool_tip() {
        let model = position().with_display(true).with_tool_tip("readback");
        let spin = Arc::new(SpinBox::new());
        let _widget = NumberWidget::new(model, spin.clone());

        assert!(spin.is_read_only());
        assert_eq!(spin.tool_tip(), "readback");
        assert!(!spin.user_enter(1.0));
    }

    #[test]
    fn test_drop_disconnects_everything() {
        let model = position();
        let spin = Arc::new(SpinBox::new());
        let widget = NumberWidget::new(model.clone(), spin.clone());
        drop(widget);

        assert_eq!(model.updated().connection_count(), 0);
        assert_eq!(model.range_changed().connection_count(), 0);
        assert_eq!(model.steps_changed().connection_count(), 0);
        assert_eq!(spin.editing_finished.connection_count(), 0);
    }
}
