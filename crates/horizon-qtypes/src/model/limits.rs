//! Shared numeric bounds.

use std::fmt;
use std::sync::Arc;

use horizon_qtypes_core::{units, ConversionError, Notifier, Signal, Value};
use parking_lot::RwLock;

/// Default lower bound for numbers created without explicit limits.
pub const DEFAULT_MINIMUM: f64 = -1e6;
/// Default upper bound for numbers created without explicit limits.
pub const DEFAULT_MAXIMUM: f64 = 1e6;

struct LimitsInner {
    bounds: Value<(f64, f64)>,
    units: RwLock<Option<String>>,
    notifier: Notifier,
}

/// A `(minimum, maximum)` pair in its own units, shareable between numbers.
///
/// Cloning yields another handle to the same bounds. Every [`Number`] using
/// these limits hears about writes and re-derives its control range.
///
/// Units are fixed once set: a unitless instance adopts the units of the first
/// [`Number`] with units that it is attached to, and never changes them again.
///
/// [`Number`]: super::Number
#[derive(Clone)]
pub struct NumberLimits {
    inner: Arc<LimitsInner>,
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if b < a { (b, a) } else { (a, b) }
}

/// Ordered bounds with a NaN end replaced by its default.
fn sanitized(minimum: f64, maximum: f64) -> (f64, f64) {
    let minimum = if minimum.is_nan() { DEFAULT_MINIMUM } else { minimum };
    let maximum = if maximum.is_nan() { DEFAULT_MAXIMUM } else { maximum };
    ordered(minimum, maximum)
}

impl NumberLimits {
    /// Create unitless limits.
    pub fn new(minimum: f64, maximum: f64) -> Self {
        Self::from_parts(minimum, maximum, None)
    }

    /// Create limits expressed in `units`.
    pub fn with_units(minimum: f64, maximum: f64, units: &str) -> Result<Self, ConversionError> {
        if !units::registry().is_known(units) {
            return Err(ConversionError::UnknownUnit(units.to_string()));
        }
        Ok(Self::from_parts(minimum, maximum, Some(units.to_string())))
    }

    fn from_parts(minimum: f64, maximum: f64, units: Option<String>) -> Self {
        Self {
            inner: Arc::new(LimitsInner {
                bounds: Value::new(sanitized(minimum, maximum)),
                units: RwLock::new(units),
                notifier: Notifier::new(),
            }),
        }
    }

    /// The bounds in the limits' own units, ordered.
    pub fn read(&self) -> (f64, f64) {
        let (a, b) = self.inner.bounds.read();
        ordered(a, b)
    }

    /// The bounds converted into `units`, ordered after conversion.
    ///
    /// Reciprocal conversions swap the ends, hence the re-ordering.
    pub fn read_in(&self, units: Option<&str>) -> Result<(f64, f64), ConversionError> {
        let (a, b) = self.inner.bounds.read();
        let own = self.units();
        let a = units::convert(a, own.as_deref(), units)?;
        let b = units::convert(b, own.as_deref(), units)?;
        Ok(ordered(a, b))
    }

    /// Store new bounds in the limits' own units and notify.
    ///
    /// A NaN end is replaced by [`DEFAULT_MINIMUM`] or [`DEFAULT_MAXIMUM`].
    pub fn write(&self, minimum: f64, maximum: f64) {
        self.inner.bounds.write(sanitized(minimum, maximum));
        self.inner.notifier.notify();
    }

    /// Store new bounds given in `units` and notify.
    pub fn write_in(&self, minimum: f64, maximum: f64, units: &str) -> Result<(), ConversionError> {
        let own = self.units();
        let a = units::convert(minimum, Some(units), own.as_deref())?;
        let b = units::convert(maximum, Some(units), own.as_deref())?;
        self.write(a, b);
        Ok(())
    }

    /// The limits' units.
    pub fn units(&self) -> Option<String> {
        self.inner.units.read().clone()
    }

    /// Take on `units` if no units are set yet. Returns whether they were adopted.
    pub(crate) fn adopt_units(&self, units: &str) -> bool {
        let mut current = self.inner.units.write();
        if current.is_some() {
            return false;
        }
        *current = Some(units.to_string());
        true
    }

    /// Fires after every write.
    pub fn updated(&self) -> &Signal<()> {
        self.inner.notifier.updated()
    }

    /// Whether two handles share the same bounds.
    pub fn ptr_eq(&self, other: &NumberLimits) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for NumberLimits {
    fn default() -> Self {
        Self::new(DEFAULT_MINIMUM, DEFAULT_MAXIMUM)
    }
}

impl fmt::Debug for NumberLimits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumberLimits")
            .field("bounds", &self.read())
            .field("units", &self.units())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_reads_are_ordered() {
        let limits = NumberLimits::new(10.0, -10.0);
        assert_eq!(limits.read(), (-10.0, 10.0));

        limits.write(5.0, 1.0);
        assert_eq!(limits.read(), (1.0, 5.0));
    }

    #[test]
    fn test_nan_bound_falls_back_to_default() {
        let limits = NumberLimits::new(f64::NAN, 5.0);
        assert_eq!(limits.read(), (DEFAULT_MINIMUM, 5.0));

        limits.write(-2.0, f64::NAN);
        assert_eq!(limits.read(), (-2.0, DEFAULT_MAXIMUM));

        limits.write(f64::NAN, f64::NAN);
        assert_eq!(limits.read(), (DEFAULT_MINIMUM, DEFAULT_MAXIMUM));
    }

    #[test]
    fn test_read_in_reorders_reciprocal_units() {
        let limits = NumberLimits::with_units(400.0, 800.0, "nm").unwrap();
        let (min, max) = limits.read_in(Some("wn")).unwrap();
        assert!(min < max);
        assert!((min - 12_500.0).abs() < 1e-9);
        assert!((max - 25_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_write_in_converts_to_own_units() {
        let limits = NumberLimits::with_units(0.0, 1.0, "mm").unwrap();
        limits.write_in(0.0, 0.5, "m").unwrap();
        assert_eq!(limits.read(), (0.0, 500.0));

        assert!(limits.write_in(0.0, 1.0, "ps").is_err());
        assert_eq!(limits.read(), (0.0, 500.0));
    }

    #[test]
    fn test_unknown_units_rejected() {
        assert_eq!(
            NumberLimits::with_units(0.0, 1.0, "furlong").unwrap_err(),
            ConversionError::UnknownUnit("furlong".to_string())
        );
    }

    #[test]
    fn test_units_adopted_once() {
        let limits = NumberLimits::default();
        assert!(limits.adopt_units("mm"));
        assert!(!limits.adopt_units("ps"));
        assert_eq!(limits.units().as_deref(), Some("mm"));
    }

    #[test]
    fn test_write_notifies() {
        let limits = NumberLimits::default();
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        limits.updated().connect(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        limits.write(0.0, 1.0);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
