//! Two-way bindings between models and controls.
//!
//! An adapter owns one control and keeps it in sync with one model:
//!
//! - When the model fires "updated", the adapter pushes the model's state into
//!   the control using programmatic setters, which never emit commit signals.
//! - When the user commits a value in the control, the adapter writes it into
//!   the model.
//!
//! Slots hold only weak references to the model and the control, and every
//! adapter disconnects its slots when dropped. Dropping the adapter therefore
//! leaves no trace on the model.

mod boolean;
mod button;
mod enumeration;
mod null;
mod number;
mod string;
mod units;

use std::sync::{Arc, Weak};

use crate::model::{Model, WeakModel};
use crate::widget::controls::{Control, ControlFactory, ControlHandle};

pub use boolean::BoolWidget;
pub use button::ButtonWidget;
pub use enumeration::EnumWidget;
pub use null::NullWidget;
pub use number::NumberWidget;
pub use string::StringWidget;
pub use units::UnitsWidget;

/// A model bound to a control.
pub trait ModelWidget: Send + Sync {
    /// The bound model.
    fn model(&self) -> Model;

    /// The bound control.
    fn control(&self) -> ControlHandle;

    /// Push the model's current state into the control.
    fn refresh(&self);
}

/// Apply the metadata every qtype shares.
pub(crate) fn sync_common(model: &Model, control: &dyn Control) {
    control.set_enabled(!model.is_disabled());
    control.set_read_only(model.is_display());
    control.set_tool_tip(&model.tool_tip());
}

/// Create the adapter and control matching `model`'s qtype.
///
/// Null models get a label showing their label text.
pub fn build_widget(model: &Model, factory: &dyn ControlFactory) -> Box<dyn ModelWidget> {
    if let Some(model) = model.as_bool() {
        Box::new(BoolWidget::new(model, factory.toggle()))
    } else if let Some(model) = model.as_number() {
        Box::new(NumberWidget::new(model, factory.numeric()))
    } else if let Some(model) = model.as_enum() {
        Box::new(EnumWidget::new(model, factory.choice()))
    } else if let Some(model) = model.as_text() {
        Box::new(StringWidget::new(model, factory.text()))
    } else if let Some(model) = model.as_button() {
        Box::new(ButtonWidget::new(model, factory.trigger()))
    } else {
        Box::new(NullWidget::new(model.clone(), factory.label()))
    }
}

/// Create a units selector for `model` if it is a Number with units.
pub fn build_units_widget(model: &Model, factory: &dyn ControlFactory) -> Option<UnitsWidget> {
    let number = model.as_number()?;
    number.units()?;
    Some(UnitsWidget::new(number, factory.choice()))
}

/// Shared helper for slots: upgrade both weak ends or do nothing.
pub(crate) fn upgrade_pair<M, C>(
    model: &WeakModel,
    control: &Weak<C>,
) -> Option<(M, Arc<C>)>
where
    M: TryFrom<Model>,
    C: ?Sized,
{
    Some((model.upgrade_as::<M>()?, control.upgrade()?))
}
