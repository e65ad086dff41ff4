//! Control capabilities and a headless control set.
//!
//! Adapters never talk to a concrete toolkit. They drive controls through the
//! capability traits in this module, and a [`ControlFactory`] decides what
//! actually gets created. Controls are shared as `Arc<dyn ...>` and use
//! interior mutability, so every method takes `&self`.
//!
//! Programmatic setters never emit the signals adapters listen to. Those
//! ("commit" signals) fire only on user interaction, which is what keeps a
//! model refresh from being written straight back into the model.
//!
//! The headless controls ([`SpinBox`], [`ComboBox`], [`CheckBox`],
//! [`LineEdit`], [`PushButton`], [`Label`]) keep state in memory and expose
//! `user_*` methods that simulate interaction. They back [`HeadlessFactory`].

mod check_box;
mod combo_box;
mod label;
mod line_edit;
mod push_button;
mod spin_box;

use std::any::Any;
use std::sync::Arc;

use horizon_qtypes_core::Signal;
use parking_lot::Mutex;

pub use check_box::CheckBox;
pub use combo_box::ComboBox;
pub use label::Label;
pub use line_edit::LineEdit;
pub use push_button::PushButton;
pub use spin_box::SpinBox;

// ============================================================================
// Capability traits
// ============================================================================

/// State every control has.
pub trait Control: Send + Sync {
    /// Whether the control accepts input.
    fn is_enabled(&self) -> bool;
    /// Enable or disable input.
    fn set_enabled(&self, enabled: bool);
    /// Whether the control only presents its value.
    fn is_read_only(&self) -> bool;
    /// Switch read-only presentation.
    fn set_read_only(&self, read_only: bool);
    /// Current tool tip.
    fn tool_tip(&self) -> String;
    /// Replace the tool tip.
    fn set_tool_tip(&self, tool_tip: &str);
    /// The control as `Any`, for downcasting to a concrete type.
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// A numeric entry with range, steps and a special text at its minimum.
pub trait NumericControl: Control {
    /// Current value.
    fn value(&self) -> f64;
    /// Set the value, clamped into range.
    fn set_value(&self, value: f64);
    /// Lower bound.
    fn minimum(&self) -> f64;
    /// Upper bound.
    fn maximum(&self) -> f64;
    /// Set both bounds (ordered) and clamp the value.
    fn set_range(&self, minimum: f64, maximum: f64);
    /// Displayed decimals.
    fn decimals(&self) -> u32;
    /// Set displayed decimals.
    fn set_decimals(&self, decimals: u32);
    /// Step increment.
    fn single_step(&self) -> f64;
    /// Set the step increment.
    fn set_single_step(&self, step: f64);
    /// Text shown instead of the value while the value equals the minimum.
    fn special_value_text(&self) -> Option<String>;
    /// Set or clear the special value text.
    fn set_special_value_text(&self, text: Option<&str>);
    /// Commit signal: the user finished editing.
    fn editing_finished(&self) -> &Signal<()>;
}

/// A selection from a list of text items.
pub trait ChoiceControl: Control {
    /// Number of items.
    fn count(&self) -> usize;
    /// Text of the item at `index`.
    fn item_text(&self, index: usize) -> Option<String>;
    /// Append items.
    fn add_items(&self, items: &[String]);
    /// Remove all items.
    fn clear(&self);
    /// Selected position.
    fn current_index(&self) -> Option<usize>;
    /// Select a position. Out-of-range indices are ignored.
    fn set_current_index(&self, index: usize);
    /// Commit signal: the user picked the item at this index.
    fn activated(&self) -> &Signal<usize>;

    /// Text of the selected item.
    fn current_text(&self) -> Option<String> {
        self.current_index().and_then(|index| self.item_text(index))
    }

    /// All item texts in order.
    fn items(&self) -> Vec<String> {
        (0..self.count()).filter_map(|i| self.item_text(i)).collect()
    }
}

/// A single-line text entry.
pub trait TextControl: Control {
    /// Current text.
    fn text(&self) -> String;
    /// Replace the text.
    fn set_text(&self, text: &str);
    /// Commit signal: the user finished editing.
    fn editing_finished(&self) -> &Signal<()>;
}

/// A two-state toggle.
pub trait ToggleControl: Control {
    /// Whether the toggle is on.
    fn is_checked(&self) -> bool;
    /// Set the state.
    fn set_checked(&self, checked: bool);
    /// Commit signal: the user clicked, carrying the new state.
    fn clicked(&self) -> &Signal<bool>;
}

/// A push button.
pub trait TriggerControl: Control {
    /// Button text.
    fn text(&self) -> String;
    /// Replace the button text.
    fn set_text(&self, text: &str);
    /// Commit signal: the user clicked.
    fn clicked(&self) -> &Signal<()>;
}

/// Static text.
pub trait LabelControl: Control {
    /// Label text.
    fn text(&self) -> String;
    /// Replace the label text.
    fn set_text(&self, text: &str);
}

/// Creates controls for adapters.
pub trait ControlFactory: Send + Sync {
    /// A numeric entry.
    fn numeric(&self) -> Arc<dyn NumericControl>;
    /// A list selection.
    fn choice(&self) -> Arc<dyn ChoiceControl>;
    /// A text entry.
    fn text(&self) -> Arc<dyn TextControl>;
    /// A toggle.
    fn toggle(&self) -> Arc<dyn ToggleControl>;
    /// A push button.
    fn trigger(&self) -> Arc<dyn TriggerControl>;
    /// A label.
    fn label(&self) -> Arc<dyn LabelControl>;
}

// ============================================================================
// ControlHandle
// ============================================================================

/// Any control, by capability.
#[derive(Clone)]
pub enum ControlHandle {
    /// A numeric entry.
    Numeric(Arc<dyn NumericControl>),
    /// A list selection.
    Choice(Arc<dyn ChoiceControl>),
    /// A text entry.
    Text(Arc<dyn TextControl>),
    /// A toggle.
    Toggle(Arc<dyn ToggleControl>),
    /// A push button.
    Trigger(Arc<dyn TriggerControl>),
    /// A label.
    Label(Arc<dyn LabelControl>),
}

impl ControlHandle {
    /// The shared [`Control`] view.
    pub fn as_control(&self) -> &dyn Control {
        match self {
            Self::Numeric(c) => c.as_ref(),
            Self::Choice(c) => c.as_ref(),
            Self::Text(c) => c.as_ref(),
            Self::Toggle(c) => c.as_ref(),
            Self::Trigger(c) => c.as_ref(),
            Self::Label(c) => c.as_ref(),
        }
    }

    /// The concrete control, if it is a `T`.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        let any = match self.clone() {
            Self::Numeric(c) => c.into_any(),
            Self::Choice(c) => c.into_any(),
            Self::Text(c) => c.into_any(),
            Self::Toggle(c) => c.into_any(),
            Self::Trigger(c) => c.into_any(),
            Self::Label(c) => c.into_any(),
        };
        any.downcast::<T>().ok()
    }
}

impl std::fmt::Debug for ControlHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::Numeric(_) => "Numeric",
            Self::Choice(_) => "Choice",
            Self::Text(_) => "Text",
            Self::Toggle(_) => "Toggle",
            Self::Trigger(_) => "Trigger",
            Self::Label(_) => "Label",
        };
        f.debug_tuple("ControlHandle").field(&kind).finish()
    }
}

// ============================================================================
// Shared control state
// ============================================================================

#[derive(Debug)]
struct BaseState {
    enabled: bool,
    read_only: bool,
    tool_tip: String,
}

/// Enabled/read-only/tool tip state shared by the headless controls.
#[derive(Debug)]
pub(crate) struct ControlBase {
    state: Mutex<BaseState>,
}

impl Default for ControlBase {
    fn default() -> Self {
        Self {
            state: Mutex::new(BaseState {
                enabled: true,
                read_only: false,
                tool_tip: String::new(),
            }),
        }
    }
}

impl ControlBase {
    pub(crate) fn is_enabled(&self) -> bool {
        self.state.lock().enabled
    }

    pub(crate) fn set_enabled(&self, enabled: bool) {
        self.state.lock().enabled = enabled;
    }

    pub(crate) fn is_read_only(&self) -> bool {
        self.state.lock().read_only
    }

    pub(crate) fn set_read_only(&self, read_only: bool) {
        self.state.lock().read_only = read_only;
    }

    pub(crate) fn tool_tip(&self) -> String {
        self.state.lock().tool_tip.clone()
    }

    pub(crate) fn set_tool_tip(&self, tool_tip: &str) {
        self.state.lock().tool_tip = tool_tip.to_string();
    }

    /// Whether simulated user input should be accepted.
    pub(crate) fn accepts_input(&self) -> bool {
        let state = self.state.lock();
        state.enabled && !state.read_only
    }
}

/// Implement [`Control`] by delegating to a `base: ControlBase` field.
macro_rules! impl_control {
    ($control:ty) => {
        impl $crate::widget::controls::Control for $control {
            fn is_enabled(&self) -> bool {
                self.base.is_enabled()
            }

            fn set_enabled(&self, enabled: bool) {
                self.base.set_enabled(enabled);
            }

            fn is_read_only(&self) -> bool {
                self.base.is_read_only()
            }

            fn set_read_only(&self, read_only: bool) {
                self.base.set_read_only(read_only);
            }

            fn tool_tip(&self) -> String {
                self.base.tool_tip()
            }

            fn set_tool_tip(&self, tool_tip: &str) {
                self.base.set_tool_tip(tool_tip);
            }

            fn into_any(
                self: std::sync::Arc<Self>,
            ) -> std::sync::Arc<dyn std::any::Any + Send + Sync> {
                self
            }
        }
    };
}

pub(crate) use impl_control;

// ============================================================================
// HeadlessFactory
// ============================================================================

/// Creates the in-memory controls of this module.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessFactory;

impl HeadlessFactory {
    /// Create a factory.
    pub fn new() -> Self {
        Self
    }
}

impl ControlFactory for HeadlessFactory {
    fn numeric(&self) -> Arc<dyn NumericControl> {
        Arc::new(SpinBox::new())
    }

    fn choice(&self) -> Arc<dyn ChoiceControl> {
        Arc::new(ComboBox::new())
    }

    fn text(&self) -> Arc<dyn TextControl> {
        Arc::new(LineEdit::new())
    }

    fn toggle(&self) -> Arc<dyn ToggleControl> {
        Arc::new(CheckBox::new())
    }

    fn trigger(&self) -> Arc<dyn TriggerControl> {
        Arc::new(PushButton::new())
    }

    fn label(&self) -> Arc<dyn LabelControl> {
        Arc::new(Label::new())
    }
}
