//! Floating-point quantity model with units.
//!
//! A [`Number`] stores its value and units together so they are always read
//! as a consistent pair. Converting to other units rewrites both in one step
//! and produces exactly one "updated" notification.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use horizon_qtypes_core::logging::{span_names, targets};
use horizon_qtypes_core::{units, ConnectionId, ConversionError, PerfSpan, Signal, Value};
use serde::{Deserialize, Serialize};

use super::limits::NumberLimits;
use super::node::{model_handle, Kind, Model, QType};

/// A value together with the units it is expressed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    /// The numeric value. NaN means "no value".
    pub value: f64,
    /// Unit symbol, or `None` for a unitless number.
    pub units: Option<String>,
}

/// Stepping configuration for bound numeric controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Steps {
    /// Increment applied by one step.
    pub single_step: f64,
    /// Displayed decimal places.
    pub decimals: u32,
}

impl Default for Steps {
    fn default() -> Self {
        Self {
            single_step: 1.0,
            decimals: 3,
        }
    }
}

pub(crate) struct NumberState {
    quantity: Value<Quantity>,
    limits: NumberLimits,
    limits_connection: ConnectionId,
    steps: Value<Steps>,
    disabled_units: AtomicBool,
    units_updated: Signal<Option<String>>,
    range_changed: Signal<(f64, f64)>,
    steps_changed: Signal<Steps>,
}

impl NumberState {
    fn new(quantity: Quantity, limits: NumberLimits, steps: Steps) -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<NumberState>| {
            let weak = weak.clone();
            let limits_connection = limits.updated().connect(move |_| {
                if let Some(state) = weak.upgrade() {
                    state.publish_range();
                }
            });
            Self {
                quantity: Value::new(quantity),
                limits,
                limits_connection,
                steps: Value::new(steps),
                disabled_units: AtomicBool::new(false),
                units_updated: Signal::new(),
                range_changed: Signal::new(),
                steps_changed: Signal::new(),
            }
        })
    }

    fn control_range(&self) -> Result<(f64, f64), ConversionError> {
        let units = self.quantity.with(|q| q.units.clone());
        self.limits.read_in(units.as_deref())
    }

    fn publish_range(&self) {
        match self.control_range() {
            Ok(range) => self.range_changed.emit(range),
            Err(err) => {
                tracing::warn!(target: targets::MODEL, error = %err, "limits not expressible in number units");
            }
        }
    }
}

impl Drop for NumberState {
    fn drop(&mut self) {
        self.limits.updated().disconnect(self.limits_connection);
    }
}

/// A model holding a floating-point quantity (qtype `number`).
///
/// # Example
///
/// ```
/// use horizon_qtypes::model::{Number, NumberLimits};
///
/// let position = Number::builder("position")
///     .value(50.0)
///     .units("mm")
///     .limits(NumberLimits::new(0.0, 100.0))
///     .build()?;
///
/// position.convert("m")?;
/// assert_eq!(position.units().as_deref(), Some("m"));
/// assert!((position.read() - 0.05).abs() < 1e-12);
/// assert_eq!(position.control_range()?, (0.0, 0.1));
/// # Ok::<(), horizon_qtypes::ConversionError>(())
/// ```
#[derive(Clone)]
pub struct Number {
    model: Model,
    state: Arc<NumberState>,
}

impl Number {
    /// Create a unitless number with default limits.
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self::assemble(
            name.into(),
            Quantity { value, units: None },
            NumberLimits::default(),
            Steps::default(),
        )
    }

    /// Start building a number with units, limits or steps.
    pub fn builder(name: impl Into<String>) -> NumberBuilder {
        NumberBuilder::new(name)
    }

    fn assemble(name: String, quantity: Quantity, limits: NumberLimits, steps: Steps) -> Self {
        let state = NumberState::new(quantity, limits, steps);
        let model = Model::from_kind(name, Kind::Number(state.clone()));
        Self { model, state }
    }

    pub(crate) fn from_parts(model: Model, state: Arc<NumberState>) -> Self {
        Self { model, state }
    }

    /// The value in the number's own units.
    pub fn read(&self) -> f64 {
        self.state.quantity.with(|q| q.value)
    }

    /// The value converted into `units`.
    pub fn read_in(&self, units: &str) -> Result<f64, ConversionError> {
        self.state
            .quantity
            .with(|q| units::convert(q.value, q.units.as_deref(), Some(units)))
    }

    /// Value and units as one consistent pair.
    pub fn quantity(&self) -> Quantity {
        self.state.quantity.read()
    }

    /// The number's units.
    pub fn units(&self) -> Option<String> {
        self.state.quantity.with(|q| q.units.clone())
    }

    /// The kind of the number's units, e.g. `"position"`.
    pub fn units_kind(&self) -> Option<&'static str> {
        self.units().as_deref().and_then(units::kind_of)
    }

    /// Whether the value is NaN ("no value").
    pub fn is_nan(&self) -> bool {
        self.read().is_nan()
    }

    /// Store a value in the number's own units and notify.
    ///
    /// The value is not clamped to the limits.
    pub fn write(&self, value: f64) {
        self.state.quantity.update(|q| q.value = value);
        self.model.notify_updated();
    }

    /// Store a value given in `units` and notify.
    ///
    /// Nothing is stored if the conversion fails.
    pub fn write_in(&self, value: f64, units: &str) -> Result<(), ConversionError> {
        self.state.quantity.try_update(|q| {
            Ok::<_, ConversionError>(Quantity {
                value: units::convert(value, Some(units), q.units.as_deref())?,
                units: q.units.clone(),
            })
        })?;
        self.model.notify_updated();
        Ok(())
    }

    /// Re-express the number in `destination` units.
    ///
    /// Value and units change together: observers of "updated" never see one
    /// without the other. Exactly one "updated" fires, followed by
    /// `units_updated`. On failure nothing changes and nothing fires.
    pub fn convert(&self, destination: &str) -> Result<(), ConversionError> {
        let _span = PerfSpan::new(span_names::CONVERT);
        {
            let _lock = self.model.lock();
            self.state.quantity.try_update(|q| {
                Ok::<_, ConversionError>(Quantity {
                    value: units::convert(q.value, q.units.as_deref(), Some(destination))?,
                    units: Some(destination.to_string()),
                })
            })?;
            self.model.notify_updated();
            self.state.publish_range();
        }
        tracing::debug!(target: targets::MODEL, name = self.name(), units = destination, "converted");
        self.state.units_updated.emit(Some(destination.to_string()));
        Ok(())
    }

    /// Same as [`convert`](Self::convert).
    pub fn set_units(&self, units: &str) -> Result<(), ConversionError> {
        self.convert(units)
    }

    /// The shared limits.
    pub fn limits(&self) -> &NumberLimits {
        &self.state.limits
    }

    /// The limits expressed in the number's units, ordered.
    pub fn control_range(&self) -> Result<(f64, f64), ConversionError> {
        self.state.control_range()
    }

    /// Tool tip describing the control range, or `None` in display mode.
    pub fn range_tool_tip(&self) -> Option<String> {
        if self.is_display() {
            return None;
        }
        let (min, max) = self.control_range().ok()?;
        Some(format!("min: {min}\nmax: {max}"))
    }

    /// The stepping configuration.
    pub fn steps(&self) -> Steps {
        self.state.steps.read()
    }

    /// Change the step size and/or decimals. `None` keeps the current setting.
    pub fn set_control_steps(&self, single_step: Option<f64>, decimals: Option<u32>) {
        let current = self.steps();
        let steps = Steps {
            single_step: single_step.unwrap_or(current.single_step),
            decimals: decimals.unwrap_or(current.decimals),
        };
        self.state.steps.write(steps);
        self.state.steps_changed.emit(steps);
    }

    /// Whether the units selector of bound controls is disabled.
    pub fn is_units_disabled(&self) -> bool {
        self.state.disabled_units.load(Ordering::SeqCst)
    }

    /// Enable or disable the units selector and notify.
    pub fn set_disabled_units(&self, disabled: bool) {
        self.state.disabled_units.store(disabled, Ordering::SeqCst);
        self.model.notify_updated();
    }

    /// Fires after a conversion with the new units.
    pub fn units_updated(&self) -> &Signal<Option<String>> {
        &self.state.units_updated
    }

    /// Fires when the control range changes, in the number's units.
    pub fn range_changed(&self) -> &Signal<(f64, f64)> {
        &self.state.range_changed
    }

    /// Fires when the stepping configuration changes.
    pub fn steps_changed(&self) -> &Signal<Steps> {
        &self.state.steps_changed
    }

    /// A new, detached number sharing this one's limits.
    ///
    /// The copy has the current value, units and steps, is named
    /// `pre_name + name`, and inherits display mode unless `display` is given.
    pub fn associate(&self, display: Option<bool>, pre_name: &str) -> Number {
        let number = Self::assemble(
            format!("{pre_name}{}", self.name()),
            self.quantity(),
            self.state.limits.clone(),
            self.steps(),
        );
        number.with_display(display.unwrap_or_else(|| self.is_display()))
    }
}

model_handle!(Number, QType::Number, as_number);

impl std::fmt::Debug for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Number")
            .field("name", &self.name())
            .field("quantity", &self.quantity())
            .field("limits", &self.state.limits)
            .finish()
    }
}

/// Builder for [`Number`].
#[derive(Debug)]
pub struct NumberBuilder {
    name: String,
    value: f64,
    units: Option<String>,
    limits: Option<NumberLimits>,
    steps: Steps,
    label: Option<String>,
    tool_tip: Option<String>,
    display: bool,
    disabled: bool,
}

impl NumberBuilder {
    /// Start a builder. The value defaults to NaN.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: f64::NAN,
            units: None,
            limits: None,
            steps: Steps::default(),
            label: None,
            tool_tip: None,
            display: false,
            disabled: false,
        }
    }

    /// Initial value.
    pub fn value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    /// Unit symbol.
    pub fn units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    /// Limits, possibly shared with other numbers.
    pub fn limits(mut self, limits: NumberLimits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Step size of bound controls.
    pub fn single_step(mut self, single_step: f64) -> Self {
        self.steps.single_step = single_step;
        self
    }

    /// Decimal places of bound controls.
    pub fn decimals(mut self, decimals: u32) -> Self {
        self.steps.decimals = decimals;
        self
    }

    /// Display label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Tool tip.
    pub fn tool_tip(mut self, tool_tip: impl Into<String>) -> Self {
        self.tool_tip = Some(tool_tip.into());
        self
    }

    /// Read-only presentation mode.
    pub fn display(mut self, display: bool) -> Self {
        self.display = display;
        self
    }

    /// Disable bound controls.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Validate the units against the registry and the limits, then build.
    ///
    /// Unitless limits adopt the number's units.
    pub fn build(self) -> Result<Number, ConversionError> {
        if let Some(units) = self.units.as_deref() {
            if !units::registry().is_known(units) {
                return Err(ConversionError::UnknownUnit(units.to_string()));
            }
        }
        let limits = self.limits.unwrap_or_default();
        if let Some(units) = self.units.as_deref() {
            if limits.adopt_units(units) {
                tracing::trace!(target: targets::MODEL, name = %self.name, units, "limits adopted units");
            }
        }
        limits.read_in(self.units.as_deref())?;

        let number = Number::assemble(
            self.name,
            Quantity {
                value: self.value,
                units: self.units,
            },
            limits,
            self.steps,
        )
        .with_display(self.display)
        .with_disabled(self.disabled);
        let number = match self.label {
            Some(label) => number.with_label(label),
            None => number,
        };
        Ok(match self.tool_tip {
            Some(tool_tip) => number.with_tool_tip(tool_tip),
            None => number,
        })
    }
}
