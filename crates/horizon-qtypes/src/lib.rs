//! Horizon QTypes - observable value models bound to GUI controls.
//!
//! Applications describe their inputs as a tree of typed models (booleans,
//! numbers with physical units, enumerations, strings, buttons and grouping
//! nodes). The widget layer turns those models into controls and keeps both
//! sides in sync, so application code only ever reads and writes models.
//!
//! This is the main umbrella crate. It re-exports the core systems from
//! `horizon-qtypes-core` alongside the [`model`] and [`widget`] layers.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_qtypes::model::{Null, Number};
//! use horizon_qtypes::widget::{HeadlessFactory, TreeWidget, TreeWidgetConfig};
//!
//! let stage = Null::new("stage");
//! let position = Number::builder("position").value(2.0).units("mm").build()?;
//! stage.append_child(&position)?;
//!
//! let tree = TreeWidget::new(&stage, TreeWidgetConfig::new(), Arc::new(HeadlessFactory::new()));
//! assert_eq!(tree.widget_count(), 2);
//!
//! position.convert("m")?;
//! assert_eq!(position.read(), 0.002);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use horizon_qtypes_core::*;

pub mod model;
pub mod prelude;
pub mod widget;
