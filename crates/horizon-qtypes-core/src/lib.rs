//! Core systems for Horizon QTypes.
//!
//! This crate provides the foundations the model/widget binding layer is
//! built on:
//!
//! - **Signal/Slot System**: Synchronous, type-safe change notification
//! - **Values**: Single-slot storage with scoped update suppression
//! - **Units**: A static unit registry and converter
//! - **Errors**: Conversion and model error types
//! - **Logging**: Tracing targets and tree debug output
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_qtypes_core::Signal;
//!
//! let updated = Signal::<f64>::new();
//! let conn_id = updated.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! updated.emit(42.0);
//! updated.disconnect(conn_id);
//! ```
//!
//! # Units Example
//!
//! ```
//! use horizon_qtypes_core::units;
//!
//! let fs = units::convert(2.5, Some("ps"), Some("fs"))?;
//! assert_eq!(fs, 2500.0);
//! # Ok::<(), horizon_qtypes_core::ConversionError>(())
//! ```

pub mod error;
pub mod logging;
pub mod signal;
pub mod units;
pub mod value;

pub use error::{ConversionError, ModelError, Result};
pub use logging::{DebugTree, PerfSpan, TreeDebug, TreeFormatOptions, TreeStyle};
pub use signal::{ConnectionId, Signal};
pub use units::{Conversion, Registry, UnitKind};
pub use value::{Notifier, UpdateLock, Value};
