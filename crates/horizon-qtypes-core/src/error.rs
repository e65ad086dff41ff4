//! Error types for Horizon QTypes.

use thiserror::Error;

/// A unit conversion could not be performed.
///
/// Conversion failures are never recovered locally: a silently skipped
/// conversion would corrupt a stored physical quantity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The symbol is not in the unit registry.
    #[error("unknown unit '{0}'")]
    UnknownUnit(String),
    /// Both symbols are known but belong to different kinds.
    #[error("cannot convert '{from}' to '{to}': units are of different kinds")]
    IncompatibleUnits {
        /// Source unit.
        from: String,
        /// Destination unit.
        to: String,
    },
    /// Exactly one side of the conversion has no units.
    #[error("cannot convert between {from:?} and {to:?}: one side has no units")]
    MissingUnits {
        /// Source unit, if any.
        from: Option<String>,
        /// Destination unit, if any.
        to: Option<String>,
    },
}

/// The main error type for model, tree and container operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Unit conversion failed.
    #[error("conversion error: {0}")]
    Conversion(#[from] ConversionError),
    /// The operation exists on the interface but is not supported here.
    #[error("operation '{operation}' is not supported by {target}")]
    UnsupportedOperation {
        /// The operation that was called.
        operation: &'static str,
        /// The type that rejected it.
        target: &'static str,
    },
    /// A strict index lookup fell outside the valid range.
    #[error("index {index} is out of bounds for length {len}")]
    OutOfBounds {
        /// The requested index, before resolution.
        index: isize,
        /// The length of the sequence.
        len: usize,
    },
    /// A sibling with the same name already exists.
    #[error("a model named '{0}' already exists in this scope")]
    DuplicateName(String),
    /// The text is not one of the enum's options.
    #[error("'{value}' is not an option of '{model}'")]
    InvalidOption {
        /// The enum model's name.
        model: String,
        /// The rejected text.
        value: String,
    },
    /// The model is already a child of another model.
    #[error("model '{0}' already has a parent")]
    AlreadyParented(String),
    /// Inserting the model would make it its own ancestor.
    #[error("model '{0}' cannot be inserted below itself")]
    CyclicTree(String),
    /// A model of one qtype was used where another was required.
    #[error("model '{model}' is a {actual} model, expected {expected}")]
    WrongType {
        /// The model's name.
        model: String,
        /// The qtype that was required.
        expected: &'static str,
        /// The model's actual qtype.
        actual: &'static str,
    },
}

impl ModelError {
    /// Build an [`UnsupportedOperation`](Self::UnsupportedOperation) error.
    pub fn unsupported(operation: &'static str, target: &'static str) -> Self {
        Self::UnsupportedOperation { operation, target }
    }
}

/// A specialized Result type for Horizon QTypes operations.
pub type Result<T> = std::result::Result<T, ModelError>;
