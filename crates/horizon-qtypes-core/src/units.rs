//! Unit registry and converter.
//!
//! Units are grouped into kinds (energy, time, position, angle,
//! temperature). Symbols within one kind are mutually convertible; symbols of
//! different kinds never are. Every symbol belongs to exactly one kind.
//!
//! Each kind has a native unit. A [`Conversion`] maps a symbol's values to and
//! from that native unit, either by a plain factor or by a pair of functions
//! for non-linear relations such as wavelength and wavenumber.
//!
//! # Example
//!
//! ```
//! use horizon_qtypes_core::units;
//!
//! let metres = units::convert(100.0, Some("mm"), Some("m")).unwrap();
//! assert!((metres - 0.1).abs() < 1e-12);
//!
//! // Different kinds never convert.
//! assert!(units::convert(1.0, Some("ps"), Some("mm")).is_err());
//! ```

use std::f64::consts::PI;

use crate::error::ConversionError;
use crate::logging::targets;

/// How a unit relates to the native unit of its kind.
#[derive(Debug, Clone, Copy)]
pub enum Conversion {
    /// `native = value * factor`.
    Factor(f64),
    /// Arbitrary mapping in both directions.
    Custom {
        /// Map a value in this unit into the native unit.
        to_native: fn(f64) -> f64,
        /// Map a native value into this unit.
        from_native: fn(f64) -> f64,
    },
}

impl Conversion {
    /// Express `value` (in this unit) in the native unit.
    pub fn to_native(&self, value: f64) -> f64 {
        match self {
            Self::Factor(factor) => value * factor,
            Self::Custom { to_native, .. } => to_native(value),
        }
    }

    /// Express a native `value` in this unit.
    pub fn from_native(&self, value: f64) -> f64 {
        match self {
            Self::Factor(factor) => value / factor,
            Self::Custom { from_native, .. } => from_native(value),
        }
    }
}

/// A family of mutually convertible units.
#[derive(Debug)]
pub struct UnitKind {
    name: &'static str,
    units: &'static [(&'static str, Conversion)],
}

impl UnitKind {
    /// The kind's name, e.g. `"position"`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Symbols of this kind in registry order.
    pub fn symbols(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.units.iter().map(|(symbol, _)| *symbol)
    }

    /// Whether `symbol` belongs to this kind.
    pub fn contains(&self, symbol: &str) -> bool {
        self.conversion(symbol).is_some()
    }

    /// The conversion for `symbol`, if it belongs to this kind.
    pub fn conversion(&self, symbol: &str) -> Option<&Conversion> {
        self.units
            .iter()
            .find(|(candidate, _)| *candidate == symbol)
            .map(|(_, conversion)| conversion)
    }

    /// Position of `symbol` in [`symbols`](Self::symbols).
    pub fn index_of(&self, symbol: &str) -> Option<usize> {
        self.units.iter().position(|(candidate, _)| *candidate == symbol)
    }
}

fn wavelength_to_wavenumber(nm: f64) -> f64 {
    1e7 / nm
}

fn celsius_to_kelvin(c: f64) -> f64 {
    c + 273.15
}

fn kelvin_to_celsius(k: f64) -> f64 {
    k - 273.15
}

fn fahrenheit_to_kelvin(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0 + 273.15
}

fn kelvin_to_fahrenheit(k: f64) -> f64 {
    (k - 273.15) * 9.0 / 5.0 + 32.0
}

// native: wn (cm^-1)
const ENERGY: &[(&str, Conversion)] = &[
    (
        "nm",
        Conversion::Custom {
            to_native: wavelength_to_wavenumber,
            from_native: wavelength_to_wavenumber,
        },
    ),
    ("wn", Conversion::Factor(1.0)),
    ("eV", Conversion::Factor(8065.54)),
    ("meV", Conversion::Factor(8.06554)),
    ("Hz", Conversion::Factor(3.335_64e-11)),
    ("GHz", Conversion::Factor(3.335_64e-2)),
    ("THz", Conversion::Factor(33.3564)),
];

// native: fs
const TIME: &[(&str, Conversion)] = &[
    ("as", Conversion::Factor(1e-3)),
    ("fs", Conversion::Factor(1.0)),
    ("ps", Conversion::Factor(1e3)),
    ("ns", Conversion::Factor(1e6)),
    ("us", Conversion::Factor(1e9)),
    ("ms", Conversion::Factor(1e12)),
    ("s", Conversion::Factor(1e15)),
];

// native: mm
const POSITION: &[(&str, Conversion)] = &[
    ("um", Conversion::Factor(1e-3)),
    ("mm", Conversion::Factor(1.0)),
    ("cm", Conversion::Factor(10.0)),
    ("m", Conversion::Factor(1000.0)),
    ("in", Conversion::Factor(25.4)),
];

// native: rad
const ANGLE: &[(&str, Conversion)] = &[
    ("rad", Conversion::Factor(1.0)),
    ("deg", Conversion::Factor(PI / 180.0)),
];

// native: K
const TEMPERATURE: &[(&str, Conversion)] = &[
    ("K", Conversion::Factor(1.0)),
    (
        "deg_C",
        Conversion::Custom {
            to_native: celsius_to_kelvin,
            from_native: kelvin_to_celsius,
        },
    ),
    (
        "deg_F",
        Conversion::Custom {
            to_native: fahrenheit_to_kelvin,
            from_native: kelvin_to_fahrenheit,
        },
    ),
    ("deg_R", Conversion::Factor(5.0 / 9.0)),
];

const KINDS: &[UnitKind] = &[
    UnitKind {
        name: "energy",
        units: ENERGY,
    },
    UnitKind {
        name: "time",
        units: TIME,
    },
    UnitKind {
        name: "position",
        units: POSITION,
    },
    UnitKind {
        name: "angle",
        units: ANGLE,
    },
    UnitKind {
        name: "temperature",
        units: TEMPERATURE,
    },
];

static REGISTRY: Registry = Registry { kinds: KINDS };

/// The static unit registry.
#[derive(Debug)]
pub struct Registry {
    kinds: &'static [UnitKind],
}

impl Registry {
    /// All unit kinds.
    pub fn kinds(&self) -> impl Iterator<Item = &UnitKind> {
        self.kinds.iter()
    }

    /// Look up a kind by name.
    pub fn kind(&self, name: &str) -> Option<&UnitKind> {
        self.kinds.iter().find(|kind| kind.name == name)
    }

    /// The kind a symbol belongs to.
    pub fn kind_of(&self, symbol: &str) -> Option<&UnitKind> {
        self.kinds.iter().find(|kind| kind.contains(symbol))
    }

    /// Whether `symbol` is a registered unit.
    pub fn is_known(&self, symbol: &str) -> bool {
        self.kind_of(symbol).is_some()
    }

    /// Convert `value` between two units.
    ///
    /// Identical units (including both absent) return `value` unchanged.
    pub fn convert(
        &self,
        value: f64,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<f64, ConversionError> {
        if from == to {
            return Ok(value);
        }
        let (from, to) = match (from, to) {
            (Some(from), Some(to)) => (from, to),
            _ => {
                return Err(ConversionError::MissingUnits {
                    from: from.map(str::to_owned),
                    to: to.map(str::to_owned),
                });
            }
        };

        let from_kind = self
            .kind_of(from)
            .ok_or_else(|| ConversionError::UnknownUnit(from.to_owned()))?;
        let to_kind = self
            .kind_of(to)
            .ok_or_else(|| ConversionError::UnknownUnit(to.to_owned()))?;
        if from_kind.name != to_kind.name {
            return Err(ConversionError::IncompatibleUnits {
                from: from.to_owned(),
                to: to.to_owned(),
            });
        }

        let (Some(source), Some(target)) = (from_kind.conversion(from), to_kind.conversion(to))
        else {
            return Err(ConversionError::UnknownUnit(from.to_owned()));
        };
        let converted = target.from_native(source.to_native(value));
        tracing::trace!(target: targets::UNITS, value, from, to, converted, "converted");
        Ok(converted)
    }
}

/// The process-wide unit registry.
pub fn registry() -> &'static Registry {
    &REGISTRY
}

/// Convert `value` between two units using the global registry.
pub fn convert(value: f64, from: Option<&str>, to: Option<&str>) -> Result<f64, ConversionError> {
    registry().convert(value, from, to)
}

/// The kind name of a unit symbol, if registered.
pub fn kind_of(symbol: &str) -> Option<&'static str> {
    registry().kind_of(symbol).map(UnitKind::name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn test_same_units_identity() {
        assert_eq!(convert(3.5, Some("mm"), Some("mm")).unwrap(), 3.5);
        assert_eq!(convert(3.5, None, None).unwrap(), 3.5);
        assert!(convert(f64::NAN, Some("ps"), Some("fs")).unwrap().is_nan());
    }

    #[test]
    fn test_linear_conversions() {
        assert!(close(convert(100.0, Some("mm"), Some("m")).unwrap(), 0.1));
        assert!(close(convert(1.0, Some("ps"), Some("fs")).unwrap(), 1000.0));
        assert!(close(convert(180.0, Some("deg"), Some("rad")).unwrap(), PI));
        assert!(close(convert(1.0, Some("in"), Some("cm")).unwrap(), 2.54));
    }

    #[test]
    fn test_nonlinear_conversions() {
        assert!(close(convert(800.0, Some("nm"), Some("wn")).unwrap(), 12500.0));
        assert!(close(convert(12500.0, Some("wn"), Some("nm")).unwrap(), 800.0));
        assert!(close(convert(0.0, Some("deg_C"), Some("K")).unwrap(), 273.15));
        assert!(close(convert(212.0, Some("deg_F"), Some("deg_C")).unwrap(), 100.0));
    }

    #[test]
    fn test_round_trip_through_native() {
        for kind in registry().kinds() {
            for from in kind.symbols() {
                for to in kind.symbols() {
                    let there = convert(42.0, Some(from), Some(to)).unwrap();
                    let back = convert(there, Some(to), Some(from)).unwrap();
                    assert!(close(back, 42.0), "{from} -> {to} -> {from} gave {back}");
                }
            }
        }
    }

    #[test]
    fn test_incompatible_kinds() {
        assert_eq!(
            convert(1.0, Some("ps"), Some("mm")),
            Err(ConversionError::IncompatibleUnits {
                from: "ps".to_string(),
                to: "mm".to_string(),
            })
        );
    }

    #[test]
    fn test_unknown_and_missing_units() {
        assert_eq!(
            convert(1.0, Some("furlong"), Some("mm")),
            Err(ConversionError::UnknownUnit("furlong".to_string()))
        );
        assert!(matches!(
            convert(1.0, None, Some("mm")),
            Err(ConversionError::MissingUnits { .. })
        ));
    }

    #[test]
    fn test_symbols_are_unique_across_kinds() {
        let mut seen = std::collections::HashSet::new();
        for kind in registry().kinds() {
            for symbol in kind.symbols() {
                assert!(seen.insert(symbol), "duplicate symbol {symbol}");
            }
        }
    }

    #[test]
    fn test_kind_lookup() {
        assert_eq!(kind_of("mm"), Some("position"));
        assert_eq!(kind_of("eV"), Some("energy"));
        assert_eq!(kind_of("parsec"), None);
        let time = registry().kind("time").unwrap();
        assert_eq!(time.index_of("ps"), Some(2));
    }
}
