//! Serializable snapshots of model trees.
//!
//! A snapshot records names, qtypes, values and units of a subtree. It can be
//! written to JSON or TOML and restored onto a tree of the same shape, which is
//! how parameter sets are saved and recalled.
//!
//! # Example
//!
//! ```
//! use horizon_qtypes::model::{Bool, ModelSnapshot, Null, Number};
//!
//! let root = Null::new("settings");
//! root.append_child(Number::builder("delay").value(1.5).units("ps").build()?)?;
//! root.append_child(Bool::new("shutter", true))?;
//!
//! let json = root.snapshot().to_json_string()?;
//! let restored = ModelSnapshot::from_json_str(&json)?;
//! root.restore(&restored)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::io::Write;
use std::path::Path;

use horizon_qtypes_core::logging::targets;
use horizon_qtypes_core::ModelError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::node::{Kind, Model, QType};
use super::{Bool, Enum, Number, Text};

/// Errors from saving or loading snapshots.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Reading or writing the file failed.
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON encoding or decoding failed.
    #[error("invalid JSON snapshot: {0}")]
    Json(#[from] serde_json::Error),
    /// TOML decoding failed.
    #[error("invalid TOML snapshot: {0}")]
    TomlDecode(#[from] toml::de::Error),
    /// TOML encoding failed.
    #[error("cannot encode snapshot as TOML: {0}")]
    TomlEncode(#[from] toml::ser::Error),
    /// Writing the temporary file into place failed.
    #[error("cannot replace snapshot file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// A stored value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnapshotValue {
    /// Value of a Bool model.
    Bool(bool),
    /// Value of a Number model.
    Number(f64),
    /// Value of a String model, or the selected option of an Enum model.
    Text(String),
}

/// The recorded state of one model and its descendants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSnapshot {
    /// Model name.
    pub name: String,
    /// Model qtype.
    pub qtype: QType,
    /// Stored value. Absent for Button, Null and NaN numbers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<SnapshotValue>,
    /// Units of a Number value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    /// Child snapshots in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ModelSnapshot>,
}

impl ModelSnapshot {
    /// Encode as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode as TOML.
    pub fn to_toml_string(&self) -> Result<String, SnapshotError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Decode from TOML.
    pub fn from_toml_str(text: &str) -> Result<Self, SnapshotError> {
        Ok(toml::from_str(text)?)
    }

    /// Write as JSON, replacing `path` atomically.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        write_atomic(path.as_ref(), &self.to_json_string()?)
    }

    /// Read a JSON snapshot file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// Write as TOML, replacing `path` atomically.
    pub fn save_toml(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        write_atomic(path.as_ref(), &self.to_toml_string()?)
    }

    /// Read a TOML snapshot file.
    pub fn load_toml(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }
}

fn write_atomic(path: &Path, contents: &str) -> Result<(), SnapshotError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(parent)?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    file.persist(path)?;
    tracing::debug!(target: targets::MODEL, path = %path.display(), "snapshot saved");
    Ok(())
}

impl Model {
    /// Record this model and its descendants.
    pub fn snapshot(&self) -> ModelSnapshot {
        let (value, units) = match self.kind() {
            Kind::Bool(value) => (Some(SnapshotValue::Bool(value.read())), None),
            Kind::Number(_) => match self.as_number() {
                Some(number) => {
                    let quantity = number.quantity();
                    let value = (!quantity.value.is_nan()).then_some(SnapshotValue::Number(quantity.value));
                    (value, quantity.units)
                }
                None => (None, None),
            },
            Kind::Enum(_) => (self.as_enum().map(|e| SnapshotValue::Text(e.read())), None),
            Kind::String(value) => (Some(SnapshotValue::Text(value.read())), None),
            Kind::Button | Kind::Null => (None, None),
        };
        ModelSnapshot {
            name: self.name().to_string(),
            qtype: self.qtype(),
            value,
            units,
            children: self.children().iter().map(Model::snapshot).collect(),
        }
    }

    /// Write the values recorded in `snapshot` back into this subtree.
    ///
    /// Children are matched by name; snapshot entries without a matching
    /// child are skipped. Number values recorded in other units are converted
    /// into the model's units. The model's own units never change.
    pub fn restore(&self, snapshot: &ModelSnapshot) -> Result<(), ModelError> {
        self.expect_qtype(snapshot.qtype)?;
        self.restore_value(snapshot)?;
        for child_snapshot in &snapshot.children {
            match self.child(&child_snapshot.name) {
                Some(child) => child.restore(child_snapshot)?,
                None => {
                    tracing::debug!(
                        target: targets::MODEL,
                        parent = self.name(),
                        child = %child_snapshot.name,
                        "snapshot entry has no matching model"
                    );
                }
            }
        }
        Ok(())
    }

    fn restore_value(&self, snapshot: &ModelSnapshot) -> Result<(), ModelError> {
        match (snapshot.qtype, &snapshot.value) {
            (QType::Bool, Some(SnapshotValue::Bool(value))) => {
                Bool::try_from(self.clone())?.write(*value);
            }
            (QType::Number, value) => {
                let number = Number::try_from(self.clone())?;
                let value = match value {
                    Some(SnapshotValue::Number(value)) => *value,
                    _ => f64::NAN,
                };
                match snapshot.units.as_deref() {
                    Some(units) => number.write_in(value, units)?,
                    None => number.write(value),
                }
            }
            (QType::Enum, Some(SnapshotValue::Text(value))) => {
                Enum::try_from(self.clone())?.write(value)?;
            }
            (QType::String, Some(SnapshotValue::Text(value))) => {
                Text::try_from(self.clone())?.write(value.clone());
            }
            _ => {}
        }
        Ok(())
    }
}
