//! Headless double-precision spin box.

use horizon_qtypes_core::Signal;
use parking_lot::Mutex;

use super::{impl_control, ControlBase, NumericControl};

#[derive(Debug)]
struct SpinBoxState {
    value: f64,
    minimum: f64,
    maximum: f64,
    decimals: u32,
    single_step: f64,
    special_value_text: Option<String>,
    /// Text typed since editing started; `None` when not editing.
    edit_text: Option<String>,
}

/// An in-memory floating-point spin box.
///
/// Values are clamped into `[minimum, maximum]`. When the value sits at the
/// minimum and a special value text is set, that text is displayed instead of
/// the number.
///
/// # Signals
///
/// - `value_changed(f64)`: Emitted whenever the value changes, programmatically or not
/// - `editing_finished()`: Emitted when the user commits typed text
#[derive(Debug)]
pub struct SpinBox {
    base: ControlBase,
    state: Mutex<SpinBoxState>,

    /// Signal emitted when the value changes.
    pub value_changed: Signal<f64>,

    /// Signal emitted when the user finishes editing.
    pub editing_finished: Signal<()>,
}

impl Default for SpinBox {
    fn default() -> Self {
        Self::new()
    }
}

impl SpinBox {
    /// Create a spin box with range `[0, 99.99]` and two decimals.
    pub fn new() -> Self {
        Self {
            base: ControlBase::default(),
            state: Mutex::new(SpinBoxState {
                value: 0.0,
                minimum: 0.0,
                maximum: 99.99,
                decimals: 2,
                single_step: 1.0,
                special_value_text: None,
                edit_text: None,
            }),
            value_changed: Signal::new(),
            editing_finished: Signal::new(),
        }
    }

    /// Set range using builder pattern.
    pub fn with_range(self, minimum: f64, maximum: f64) -> Self {
        self.set_range(minimum, maximum);
        self
    }

    /// Set value using builder pattern.
    pub fn with_value(self, value: f64) -> Self {
        self.set_value(value);
        self
    }

    /// The text the spin box currently shows.
    pub fn display_text(&self) -> String {
        let state = self.state.lock();
        if let Some(edit) = &state.edit_text {
            return edit.clone();
        }
        if (state.value - state.minimum).abs() < f64::EPSILON {
            if let Some(special) = &state.special_value_text {
                return special.clone();
            }
        }
        format!("{:.prec$}", state.value, prec = state.decimals as usize)
    }

    /// Whether typed text is pending.
    pub fn is_editing(&self) -> bool {
        self.state.lock().edit_text.is_some()
    }

    /// Increase the value by one step.
    pub fn step_up(&self) {
        let (value, step) = {
            let state = self.state.lock();
            (state.value, state.single_step)
        };
        self.set_value(value + step);
    }

    /// Decrease the value by one step.
    pub fn step_down(&self) {
        let (value, step) = {
            let state = self.state.lock();
            (state.value, state.single_step)
        };
        self.set_value(value - step);
    }

    /// Simulate the user typing `text` into the field. Returns whether the
    /// input was accepted.
    pub fn user_type(&self, text: &str) -> bool {
        if !self.base.accepts_input() {
            return false;
        }
        self.state.lock().edit_text = Some(text.to_string());
        true
    }

    /// Simulate the user committing the typed text (Enter or focus loss).
    ///
    /// Unparseable or non-finite text leaves the value unchanged but still
    /// finishes editing. Does nothing if the user was not editing.
    pub fn user_commit(&self) {
        let Some(edit) = self.state.lock().edit_text.take() else {
            return;
        };
        if let Ok(parsed) = edit.trim().parse::<f64>() {
            if parsed.is_finite() {
                self.set_value(parsed);
            }
        }
        self.editing_finished.emit(());
    }

    /// Simulate the user typing a value and committing it.
    pub fn user_enter(&self, value: f64) -> bool {
        if !self.user_type(&value.to_string()) {
            return false;
        }
        self.user_commit();
        true
    }

    /// Abandon typed text without committing.
    pub fn cancel_editing(&self) {
        self.state.lock().edit_text = None;
    }
}

impl_control!(SpinBox);

impl NumericControl for SpinBox {
    fn value(&self) -> f64 {
        self.state.lock().value
    }

    fn set_value(&self, value: f64) {
        let changed = {
            let mut state = self.state.lock();
            let new_value = value.clamp(state.minimum, state.maximum);
            if (state.value - new_value).abs() > f64::EPSILON {
                state.value = new_value;
                Some(new_value)
            } else {
                None
            }
        };
        if let Some(value) = changed {
            self.value_changed.emit(value);
        }
    }

    fn minimum(&self) -> f64 {
        self.state.lock().minimum
    }

    fn maximum(&self) -> f64 {
        self.state.lock().maximum
    }

    fn set_range(&self, minimum: f64, maximum: f64) {
        let changed = {
            let mut state = self.state.lock();
            // A NaN end leaves that bound where it was
            let minimum = if minimum.is_nan() { state.minimum } else { minimum };
            let maximum = if maximum.is_nan() { state.maximum } else { maximum };
            let (min, max) = if minimum <= maximum {
                (minimum, maximum)
            } else {
                (maximum, minimum)
            };
            state.minimum = min;
            state.maximum = max;
            // Clamp current value to new range
            let new_value = state.value.clamp(min, max);
            if (state.value - new_value).abs() > f64::EPSILON {
                state.value = new_value;
                Some(new_value)
            } else {
                None
            }
        };
        if let Some(value) = changed {
            self.value_changed.emit(value);
        }
    }

    fn decimals(&self) -> u32 {
        self.state.lock().decimals
    }

    fn set_decimals(&self, decimals: u32) {
        self.state.lock().decimals = decimals.min(15);
    }

    fn single_step(&self) -> f64 {
        self.state.lock().single_step
    }

    fn set_single_step(&self, step: f64) {
        self.state.lock().single_step = step.abs();
    }

    fn special_value_text(&self) -> Option<String> {
        self.state.lock().special_value_text.clone()
    }

    fn set_special_value_text(&self, text: Option<&str>) {
        self.state.lock().special_value_text = text.filter(|t| !t.is_empty()).map(str::to_string);
    }

    fn editing_finished(&self) -> &Signal<()> {
        &self.editing_finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::controls::Control;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_value_clamped_to_range() {
        let spin = SpinBox::new().with_range(0.0, 10.0);
        spin.set_value(50.0);
        assert_eq!(spin.value(), 10.0);
        spin.set_value(-5.0);
        assert_eq!(spin.value(), 0.0);
    }

    #[test]
    fn test_set_range_orders_and_clamps() {
        let spin = SpinBox::new().with_range(0.0, 100.0).with_value(50.0);
        spin.set_range(0.1, 0.0);
        assert_eq!(spin.minimum(), 0.0);
        assert_eq!(spin.maximum(), 0.1);
        assert_eq!(spin.value(), 0.1);
    }

    #[test]
    fn test_nan_range_end_keeps_current_bound() {
        let spin = SpinBox::new();
        spin.set_range(-5.0, 5.0);
        spin.set_value(4.0);

        spin.set_range(f64::NAN, 2.0);
        assert_eq!((spin.minimum(), spin.maximum()), (-5.0, 2.0));
        assert_eq!(spin.value(), 2.0);

        spin.set_range(f64::NAN, f64::NAN);
        assert_eq!((spin.minimum(), spin.maximum()), (-5.0, 2.0));
    }

    #[test]
    fn test_special_value_text_at_minimum() {
        let spin = SpinBox::new().with_range(-1.0, 1.0);
        spin.set_special_value_text(Some("nan"));
        spin.set_value(spin.minimum());
        assert_eq!(spin.display_text(), "nan");

        spin.set_value(0.5);
        assert_eq!(spin.display_text(), "0.50");

        spin.set_special_value_text(None);
        spin.set_value(-1.0);
        assert_eq!(spin.display_text(), "-1.00");
    }

    #[test]
    fn test_programmatic_set_does_not_commit() {
        let spin = SpinBox::new();
        let commits = Arc::new(AtomicUsize::new(0));
        let commits_clone = commits.clone();
        spin.editing_finished.connect(move |_| {
            commits_clone.fetch_add(1, Ordering::SeqCst);
        });

        spin.set_value(3.0);
        spin.step_up();
        assert_eq!(spin.value(), 4.0);
        assert_eq!(commits.load(Ordering::SeqCst), 0);

        assert!(spin.user_enter(7.5));
        assert_eq!(spin.value(), 7.5);
        assert_eq!(commits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_commit_requires_editing() {
        let spin = SpinBox::new();
        let commits = Arc::new(AtomicUsize::new(0));
        let commits_clone = commits.clone();
        spin.editing_finished.connect(move |_| {
            commits_clone.fetch_add(1, Ordering::SeqCst);
        });

        spin.user_commit();
        assert_eq!(commits.load(Ordering::SeqCst), 0);

        spin.user_type("garbage");
        assert_eq!(spin.display_text(), "garbage");
        spin.user_commit();
        assert_eq!(spin.value(), 0.0);
        assert_eq!(commits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_read_only_rejects_input() {
        let spin = SpinBox::new();
        spin.set_read_only(true);
        assert!(!spin.user_enter(5.0));
        spin.set_read_only(false);
        spin.set_enabled(false);
        assert!(!spin.user_type("5"));
        assert_eq!(spin.value(), 0.0);
    }
}
