//! Observable value models and the model tree.
//!
//! A model holds one value of a fixed qtype, fires an "updated" signal on
//! every logical write, and may have named children. Models are handles:
//! cloning one gives another reference to the same model.
//!
//! # Model Types
//!
//! - [`Bool`]: a flag
//! - [`Number`]: a float with optional units and shared [`NumberLimits`]
//! - [`Enum`]: one option out of a list
//! - [`Text`]: free text (qtype `string`)
//! - [`Button`]: a stateless trigger
//! - [`Null`]: a heading or grouping node
//!
//! [`Model`] is the type-erased handle used by the tree and the containers.
//!
//! # Example
//!
//! ```
//! use horizon_qtypes::model::{Bool, Null, Number};
//!
//! let root = Null::new("stage");
//! let position = Number::builder("position").value(10.0).units("mm").build()?;
//! root.append_child(&position)?;
//! root.append_child(Bool::new("homed", false))?;
//!
//! position.updated().connect(|_| println!("position changed"));
//! position.write(12.5);
//!
//! assert_eq!(root.node_count(), 3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod boolean;
mod button;
mod debug;
mod enumeration;
pub mod index;
mod limits;
mod node;
mod null;
mod number;
mod snapshot;
mod string;
mod tree;

pub use boolean::Bool;
pub use button::Button;
pub use enumeration::Enum;
pub use index::{clamp_insert_index, resolve_index};
pub use limits::{NumberLimits, DEFAULT_MAXIMUM, DEFAULT_MINIMUM};
pub use node::{Model, QType, WeakModel};
pub use null::Null;
pub use number::{Number, NumberBuilder, Quantity, Steps};
pub use snapshot::{ModelSnapshot, SnapshotError, SnapshotValue};
pub use string::Text;
