//! Number units ↔ choice control.

use std::sync::Arc;

use horizon_qtypes_core::logging::targets;
use horizon_qtypes_core::{units, ConnectionId};

use super::{upgrade_pair, ModelWidget};
use crate::model::{Model, Number};
use crate::widget::controls::{ChoiceControl, ControlHandle};

/// Offers the units of a [`Number`]'s kind in a [`ChoiceControl`].
///
/// Picking a unit converts the number. Conversions made elsewhere move the
/// selection without converting again.
pub struct UnitsWidget {
    model: Number,
    control: Arc<dyn ChoiceControl>,
    units_connection: ConnectionId,
    updated_connection: ConnectionId,
    activated_connection: ConnectionId,
}

fn populate(model: &Number, control: &dyn ChoiceControl) {
    let symbols: Vec<String> = model
        .units_kind()
        .and_then(|kind| units::registry().kind(kind))
        .map(|kind| kind.symbols().map(str::to_string).collect())
        .unwrap_or_default();
    control.clear();
    control.add_items(&symbols);
    select(model, control);
    sync_enabled(model, control);
}

fn select(model: &Number, control: &dyn ChoiceControl) {
    let current = model.units();
    let index = current
        .as_deref()
        .and_then(|units| (0..control.count()).find(|&i| control.item_text(i).as_deref() == Some(units)));
    if let Some(index) = index {
        control.set_current_index(index);
    }
}

fn sync_enabled(model: &Number, control: &dyn ChoiceControl) {
    control.set_enabled(!model.is_units_disabled() && !model.is_disabled());
    control.set_read_only(model.is_display());
}

impl UnitsWidget {
    /// Bind `model`'s units to `control` and fill it with the compatible units.
    pub fn new(model: Number, control: Arc<dyn ChoiceControl>) -> Self {
        populate(&model, control.as_ref());

        let weak_model = model.downgrade();
        let weak_control = Arc::downgrade(&control);
        let units_connection = model.units_updated().connect(move |_| {
            if let Some((model, control)) = upgrade_pair::<Number, _>(&weak_model, &weak_control) {
                select(&model, control.as_ref());
            }
        });

        let weak_model = model.downgrade();
        let weak_control = Arc::downgrade(&control);
        let updated_connection = model.updated().connect(move |_| {
            if let Some((model, control)) = upgrade_pair::<Number, _>(&weak_model, &weak_control) {
                sync_enabled(&model, control.as_ref());
            }
        });

        let weak_model = model.downgrade();
        let weak_control = Arc::downgrade(&control);
        let activated_connection = control.activated().connect(move |index| {
            let Some((model, control)) = upgrade_pair::<Number, _>(&weak_model, &weak_control) else {
                return;
            };
            let Some(destination) = control.item_text(*index) else {
                return;
            };
            if model.units().as_deref() == Some(destination.as_str()) {
                return;
            }
            if let Err(err) = model.convert(&destination) {
                tracing::warn!(
                    target: targets::WIDGET,
                    name = model.name(),
                    units = %destination,
                    error = %err,
                    "unit change rejected"
                );
                select(&model, control.as_ref());
            }
        });

        Self {
            model,
            control,
            units_connection,
            updated_connection,
            activated_connection,
        }
    }
}

impl ModelWidget for UnitsWidget {
    fn model(&self) -> Model {
        self.model.model().clone()
    }

    fn control(&self) -> ControlHandle {
        ControlHandle::Choice(self.control.clone())
    }

    fn refresh(&self) {
        populate(&self.model, self.control.as_ref());
    }
}

impl Drop for UnitsWidget {
    fn drop(&mut self) {
        self.model.units_updated().disconnect(self.units_connection);
        self.model.updated().disconnect(self.updated_connection);
        self.control.activated().disconnect(self.activated_connection);
    }
}
