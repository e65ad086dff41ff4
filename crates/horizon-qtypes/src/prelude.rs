//! Prelude module for Horizon QTypes.
//!
//! ```
//! use horizon_qtypes::prelude::*;
//! ```
//!
//! This provides access to:
//! - Typed model handles and the untyped [`Model`]
//! - Signals and errors
//! - The containers and the headless control set

// ============================================================================
// Core
// ============================================================================

pub use crate::{ConversionError, ModelError, Result};
pub use crate::{ConnectionId, Signal, UpdateLock};

// ============================================================================
// Models
// ============================================================================

pub use crate::model::{
    Bool, Button, Enum, Model, ModelSnapshot, Null, Number, NumberLimits, QType, Text, WeakModel,
};

// ============================================================================
// Widgets
// ============================================================================

pub use crate::widget::{
    ControlFactory, ControlHandle, HeadlessFactory, InputTable, InputTableConfig, ModelWidget,
    TreeWidget, TreeWidgetConfig,
};
