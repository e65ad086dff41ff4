//! Controls, adapters and containers.
//!
//! - [`controls`]: capability traits every control implements, plus a
//!   headless control set for tests and scripting
//! - [`adapters`]: one adapter per qtype, keeping a model and a control in
//!   sync in both directions
//! - [`TreeWidget`] and [`InputTable`]: containers that build adapters for a
//!   whole set of models and follow their restructuring
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_qtypes::model::Number;
//! use horizon_qtypes::widget::{InputTable, HeadlessFactory, SpinBox};
//!
//! let delay = Number::builder("delay").value(1.5).units("ps").build()?;
//! let table = InputTable::new(Arc::new(HeadlessFactory::new()));
//! table.append(Some(delay.model().clone()), Some("Delay"))?;
//!
//! let spin_box = table.control("delay").and_then(|c| c.downcast::<SpinBox>()).unwrap();
//! spin_box.user_enter(2.0);
//! assert_eq!(delay.read(), 2.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod adapters;
pub mod controls;
mod input_table;
mod tree_widget;

pub use adapters::{build_units_widget, build_widget, ModelWidget, UnitsWidget};
pub use controls::{
    CheckBox, ChoiceControl, ComboBox, Control, ControlFactory, ControlHandle, HeadlessFactory,
    Label, LabelControl, LineEdit, NumericControl, PushButton, SpinBox, TextControl,
    ToggleControl, TriggerControl,
};
pub use input_table::{InputTable, InputTableConfig, Row};
pub use tree_widget::{TreeItem, TreeWidget, TreeWidgetConfig};
