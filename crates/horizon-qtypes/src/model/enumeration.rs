//! One-of-many choice model.

use std::sync::Arc;

use horizon_qtypes_core::{ModelError, Result, Value};

use super::node::{model_handle, Kind, Model, QType};

#[derive(Debug, Clone, Default)]
struct Choice {
    options: Vec<String>,
    current: Option<usize>,
}

pub(crate) struct EnumState {
    choice: Value<Choice>,
}

/// A model holding one option out of an ordered list (qtype `enum`).
///
/// Writes are by option text. Text that is not an option is rejected.
///
/// # Example
///
/// ```
/// use horizon_qtypes::model::Enum;
///
/// let mode = Enum::new("mode", ["scan", "static"]);
/// assert_eq!(mode.read(), "scan");
/// mode.write("static")?;
/// assert_eq!(mode.index(), Some(1));
/// assert!(mode.write("sweep").is_err());
/// # Ok::<(), horizon_qtypes::ModelError>(())
/// ```
#[derive(Clone)]
pub struct Enum {
    model: Model,
    state: Arc<EnumState>,
}

impl Enum {
    /// Create a detached Enum model selecting the first option.
    pub fn new<I, S>(name: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        let current = if options.is_empty() { None } else { Some(0) };
        let state = Arc::new(EnumState {
            choice: Value::new(Choice { options, current }),
        });
        let model = Model::from_kind(name, Kind::Enum(state.clone()));
        Self { model, state }
    }

    pub(crate) fn from_parts(model: Model, state: Arc<EnumState>) -> Self {
        Self { model, state }
    }

    /// Text of the selected option, or an empty string if there are no options.
    pub fn read(&self) -> String {
        self.state.choice.with(|choice| {
            choice
                .current
                .and_then(|i| choice.options.get(i).cloned())
                .unwrap_or_default()
        })
    }

    /// Position of the selected option.
    pub fn index(&self) -> Option<usize> {
        self.state.choice.with(|choice| choice.current)
    }

    /// The option list.
    pub fn options(&self) -> Vec<String> {
        self.state.choice.with(|choice| choice.options.clone())
    }

    /// Select an option by its text and notify.
    pub fn write(&self, value: &str) -> Result<()> {
        self.state.choice.try_update(|choice| {
            let position = choice
                .options
                .iter()
                .position(|option| option == value)
                .ok_or_else(|| ModelError::InvalidOption {
                    model: self.name().to_string(),
                    value: value.to_string(),
                })?;
            Ok::<_, ModelError>(Choice {
                options: choice.options.clone(),
                current: Some(position),
            })
        })?;
        self.model.notify_updated();
        Ok(())
    }

    /// Replace the option list and notify.
    ///
    /// The selection is kept when its text is still an option and otherwise
    /// falls back to the first option.
    pub fn set_options<I, S>(&self, options: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        let previous = self.read();
        let current = options
            .iter()
            .position(|option| *option == previous)
            .or(if options.is_empty() { None } else { Some(0) });
        self.state.choice.write(Choice { options, current });
        self.model.notify_updated();
    }
}

model_handle!(Enum, QType::Enum, as_enum);

impl std::fmt::Debug for Enum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enum")
            .field("name", &self.name())
            .field("value", &self.read())
            .field("options", &self.options())
            .finish()
    }
}
