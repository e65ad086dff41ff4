//! The shared model node and the type-erased [`Model`] handle.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use horizon_qtypes_core::{ModelError, Notifier, Result, Signal, UpdateLock, Value};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::boolean::Bool;
use super::button::Button;
use super::enumeration::{Enum, EnumState};
use super::null::Null;
use super::number::{Number, NumberState};
use super::string::Text;

/// The behaviour family of a model.
///
/// Fixed when the model is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QType {
    /// A boolean flag.
    Bool,
    /// A floating-point quantity with optional units.
    Number,
    /// One choice out of an ordered option list.
    Enum,
    /// Free text.
    String,
    /// A stateless trigger.
    Button,
    /// A heading without a value.
    Null,
}

impl QType {
    /// The lowercase tag, e.g. `"number"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Number => "number",
            Self::Enum => "enum",
            Self::String => "string",
            Self::Button => "button",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for QType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variant-specific storage.
pub(crate) enum Kind {
    Bool(Arc<Value<bool>>),
    Number(Arc<NumberState>),
    Enum(Arc<EnumState>),
    String(Arc<Value<String>>),
    Button,
    Null,
}

impl Kind {
    fn qtype(&self) -> QType {
        match self {
            Self::Bool(_) => QType::Bool,
            Self::Number(_) => QType::Number,
            Self::Enum(_) => QType::Enum,
            Self::String(_) => QType::String,
            Self::Button => QType::Button,
            Self::Null => QType::Null,
        }
    }
}

pub(crate) struct Node {
    name: String,
    label: RwLock<String>,
    tool_tip: RwLock<String>,
    disabled: AtomicBool,
    display: AtomicBool,
    kind: Kind,
    pub(super) children: RwLock<Vec<Model>>,
    pub(super) parent: RwLock<Weak<Node>>,
    notifier: Notifier,
    restructured: Signal<()>,
}

/// A handle to a model of any qtype.
///
/// Cloning is cheap and yields another handle to the same model. Use
/// [`as_number`](Self::as_number) and friends, or `TryFrom`, to get a typed
/// handle with value access.
#[derive(Clone)]
pub struct Model {
    pub(crate) node: Arc<Node>,
}

/// A non-owning reference to a [`Model`].
#[derive(Clone, Default)]
pub struct WeakModel {
    node: Weak<Node>,
}

impl WeakModel {
    /// Get the model back if it is still alive.
    pub fn upgrade(&self) -> Option<Model> {
        self.node.upgrade().map(|node| Model { node })
    }

    /// Get a typed handle back if the model is alive and of that qtype.
    pub fn upgrade_as<T: TryFrom<Model>>(&self) -> Option<T> {
        self.upgrade().and_then(|model| T::try_from(model).ok())
    }
}

impl fmt::Debug for WeakModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakModel")
            .field("alive", &(self.node.strong_count() > 0))
            .finish()
    }
}

impl Model {
    pub(crate) fn from_kind(name: impl Into<String>, kind: Kind) -> Self {
        let name = name.into();
        Self {
            node: Arc::new(Node {
                label: RwLock::new(name.clone()),
                name,
                tool_tip: RwLock::new(String::new()),
                disabled: AtomicBool::new(false),
                display: AtomicBool::new(false),
                kind,
                children: RwLock::new(Vec::new()),
                parent: RwLock::new(Weak::new()),
                notifier: Notifier::new(),
                restructured: Signal::new(),
            }),
        }
    }

    pub(crate) fn kind(&self) -> &Kind {
        &self.node.kind
    }

    /// The model's name, unique among its siblings.
    pub fn name(&self) -> &str {
        &self.node.name
    }

    /// The display label. Defaults to the name.
    pub fn label(&self) -> String {
        self.node.label.read().clone()
    }

    /// Change the label and notify.
    pub fn set_label(&self, label: impl Into<String>) {
        *self.node.label.write() = label.into();
        self.notify_updated();
    }

    /// The tool tip shown by bound controls.
    pub fn tool_tip(&self) -> String {
        self.node.tool_tip.read().clone()
    }

    /// Change the tool tip and notify.
    pub fn set_tool_tip(&self, tool_tip: impl Into<String>) {
        *self.node.tool_tip.write() = tool_tip.into();
        self.notify_updated();
    }

    /// Whether bound controls are disabled.
    pub fn is_disabled(&self) -> bool {
        self.node.disabled.load(Ordering::SeqCst)
    }

    /// Enable or disable bound controls and notify.
    pub fn set_disabled(&self, disabled: bool) {
        self.node.disabled.store(disabled, Ordering::SeqCst);
        self.notify_updated();
    }

    /// Whether the model is shown in read-only presentation mode.
    pub fn is_display(&self) -> bool {
        self.node.display.load(Ordering::SeqCst)
    }

    /// Switch presentation mode and notify.
    pub fn set_display(&self, display: bool) {
        self.node.display.store(display, Ordering::SeqCst);
        self.notify_updated();
    }

    pub(crate) fn init_label(&self, label: String) {
        *self.node.label.write() = label;
    }

    pub(crate) fn init_tool_tip(&self, tool_tip: String) {
        *self.node.tool_tip.write() = tool_tip;
    }

    pub(crate) fn init_disabled(&self, disabled: bool) {
        self.node.disabled.store(disabled, Ordering::SeqCst);
    }

    pub(crate) fn init_display(&self, display: bool) {
        self.node.display.store(display, Ordering::SeqCst);
    }

    /// The model's qtype.
    pub fn qtype(&self) -> QType {
        self.node.kind.qtype()
    }

    /// Fires once per logical write and on metadata changes.
    pub fn updated(&self) -> &Signal<()> {
        self.node.notifier.updated()
    }

    /// Fires when this model's subtree changes shape.
    pub fn restructured(&self) -> &Signal<()> {
        &self.node.restructured
    }

    /// Suppress "updated" until the guard drops, then fire it once if
    /// anything was written in between.
    pub fn lock(&self) -> UpdateLock<'_> {
        self.node.notifier.lock()
    }

    pub(crate) fn notify_updated(&self) {
        self.node.notifier.notify();
    }

    /// A non-owning handle to this model.
    pub fn downgrade(&self) -> WeakModel {
        WeakModel {
            node: Arc::downgrade(&self.node),
        }
    }

    /// Whether two handles refer to the same model.
    pub fn ptr_eq(&self, other: &Model) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Typed handle if this is a Bool model.
    pub fn as_bool(&self) -> Option<Bool> {
        match &self.node.kind {
            Kind::Bool(value) => Some(Bool::from_parts(self.clone(), value.clone())),
            _ => None,
        }
    }

    /// Typed handle if this is a Number model.
    pub fn as_number(&self) -> Option<Number> {
        match &self.node.kind {
            Kind::Number(state) => Some(Number::from_parts(self.clone(), state.clone())),
            _ => None,
        }
    }

    /// Typed handle if this is an Enum model.
    pub fn as_enum(&self) -> Option<Enum> {
        match &self.node.kind {
            Kind::Enum(state) => Some(Enum::from_parts(self.clone(), state.clone())),
            _ => None,
        }
    }

    /// Typed handle if this is a String model.
    pub fn as_text(&self) -> Option<Text> {
        match &self.node.kind {
            Kind::String(value) => Some(Text::from_parts(self.clone(), value.clone())),
            _ => None,
        }
    }

    /// Typed handle if this is a Button model.
    pub fn as_button(&self) -> Option<Button> {
        match &self.node.kind {
            Kind::Button => Some(Button::from_parts(self.clone())),
            _ => None,
        }
    }

    /// Typed handle if this is a Null model.
    pub fn as_null(&self) -> Option<Null> {
        match &self.node.kind {
            Kind::Null => Some(Null::from_parts(self.clone())),
            _ => None,
        }
    }

    pub(crate) fn wrong_type(&self, expected: QType) -> ModelError {
        ModelError::WrongType {
            model: self.name().to_string(),
            expected: expected.as_str(),
            actual: self.qtype().as_str(),
        }
    }

    /// Require a specific qtype.
    pub fn expect_qtype(&self, expected: QType) -> Result<()> {
        if self.qtype() == expected {
            Ok(())
        } else {
            Err(self.wrong_type(expected))
        }
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("name", &self.name())
            .field("qtype", &self.qtype())
            .field("children", &self.node.children.read().len())
            .finish()
    }
}

/// Shared plumbing for typed model handles.
///
/// Generates `Deref<Target = Model>`, conversions to and from [`Model`] and the
/// `with_*` construction helpers.
macro_rules! model_handle {
    ($handle:ident, $qtype:expr, $as_fn:ident) => {
        impl $handle {
            /// Set the label during construction (no notification).
            pub fn with_label(self, label: impl Into<String>) -> Self {
                self.model.init_label(label.into());
                self
            }

            /// Set the tool tip during construction (no notification).
            pub fn with_tool_tip(self, tool_tip: impl Into<String>) -> Self {
                self.model.init_tool_tip(tool_tip.into());
                self
            }

            /// Set the disabled flag during construction (no notification).
            pub fn with_disabled(self, disabled: bool) -> Self {
                self.model.init_disabled(disabled);
                self
            }

            /// Set presentation mode during construction (no notification).
            pub fn with_display(self, display: bool) -> Self {
                self.model.init_display(display);
                self
            }

            /// The type-erased handle.
            pub fn model(&self) -> &$crate::model::Model {
                &self.model
            }
        }

        impl std::ops::Deref for $handle {
            type Target = $crate::model::Model;

            fn deref(&self) -> &Self::Target {
                &self.model
            }
        }

        impl From<$handle> for $crate::model::Model {
            fn from(handle: $handle) -> Self {
                handle.model
            }
        }

        impl From<&$handle> for $crate::model::Model {
            fn from(handle: &$handle) -> Self {
                handle.model.clone()
            }
        }

        impl TryFrom<$crate::model::Model> for $handle {
            type Error = horizon_qtypes_core::ModelError;

            fn try_from(model: $crate::model::Model) -> std::result::Result<Self, Self::Error> {
                model.$as_fn().ok_or_else(|| model.wrong_type($qtype))
            }
        }
    };
}

pub(crate) use model_handle;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_metadata_defaults() {
        let model = Bool::new("shutter", false);
        assert_eq!(model.name(), "shutter");
        assert_eq!(model.label(), "shutter");
        assert_eq!(model.tool_tip(), "");
        assert!(!model.is_disabled());
        assert!(!model.is_display());
        assert_eq!(model.qtype(), QType::Bool);
    }

    #[test]
    fn test_with_helpers_are_silent() {
        let model = Text::new("comment", "");
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = hits.clone();
        model.updated().connect(move |_| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });

        let model = model
            .with_label("Comment")
            .with_tool_tip("free text")
            .with_disabled(true)
            .with_display(true);

        assert_eq!(model.label(), "Comment");
        assert_eq!(model.tool_tip(), "free text");
        assert!(model.is_disabled());
        assert!(model.is_display());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_metadata_setters_notify() {
        let model = Bool::new("shutter", false);
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = hits.clone();
        model.updated().connect(move |_| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });

        model.set_label("Shutter");
        model.set_tool_tip("opens the shutter");
        model.set_disabled(true);

        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_typed_conversions() {
        let model: Model = Number::new("delay", 0.0).into();
        assert!(model.as_number().is_some());
        assert!(model.as_bool().is_none());

        let err = Bool::try_from(model.clone()).unwrap_err();
        assert_eq!(
            err,
            ModelError::WrongType {
                model: "delay".to_string(),
                expected: "bool",
                actual: "number",
            }
        );
        assert!(model.expect_qtype(QType::Number).is_ok());
    }

    #[test]
    fn test_weak_model() {
        let model: Model = Null::new("heading").into();
        let weak = model.downgrade();
        assert!(weak.upgrade_as::<Null>().is_some());
        assert!(weak.upgrade_as::<Bool>().is_none());

        drop(model);
        assert!(weak.upgrade().is_none());
    }
}
