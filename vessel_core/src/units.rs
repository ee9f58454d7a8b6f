//! # Unit Conversion
//!
//! Conversion utility for the three quantity kinds the calculators deal in:
//! pressure, length, and temperature. Calculator inputs follow fixed unit
//! conventions (psi, inches, °F — MPa, mm, °C for EN 13445), so conversion
//! happens at the boundary, before a value enters an input mapping.
//!
//! Each quantity kind converts through a canonical base unit (psi, inches,
//! °F). Temperature is affine, not multiplicative, so it gets explicit
//! to-base/from-base arms rather than a factor table.
//!
//! ## Example
//!
//! ```rust
//! use vessel_core::units::{convert, Quantity};
//!
//! let mpa = convert(150.0, "psi", "mpa", Quantity::Pressure).unwrap();
//! assert!((mpa - 1.0342).abs() < 1e-3);
//!
//! let celsius = convert(212.0, "f", "c", Quantity::Temperature).unwrap();
//! assert!((celsius - 100.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Quantity kinds with registered conversion paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    Pressure,
    Length,
    Temperature,
}

impl Quantity {
    /// All quantity variants
    pub const ALL: [Quantity; 3] = [Quantity::Pressure, Quantity::Length, Quantity::Temperature];

    /// Lowercase code used in error messages and serialized forms
    pub fn code(&self) -> &'static str {
        match self {
            Quantity::Pressure => "pressure",
            Quantity::Length => "length",
            Quantity::Temperature => "temperature",
        }
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Pressure (base: psi)
// ============================================================================

/// Pressure units. Internal base is psi.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PressureUnit {
    Psi,
    Ksi,
    KiloPascal,
    MegaPascal,
    Bar,
}

const PSI_PER_KSI: f64 = 1000.0;
const PSI_PER_KPA: f64 = 0.145_037_737_730_209_2;
const PSI_PER_MPA: f64 = 145.037_737_730_209_2;
const PSI_PER_BAR: f64 = 14.503_773_773_020_92;

impl PressureUnit {
    fn parse(s: &str) -> Option<Self> {
        match normalize_unit(s).as_str() {
            "psi" => Some(PressureUnit::Psi),
            "ksi" => Some(PressureUnit::Ksi),
            "kpa" => Some(PressureUnit::KiloPascal),
            "mpa" => Some(PressureUnit::MegaPascal),
            "bar" => Some(PressureUnit::Bar),
            _ => None,
        }
    }

    /// psi per one of this unit
    fn psi_factor(&self) -> f64 {
        match self {
            PressureUnit::Psi => 1.0,
            PressureUnit::Ksi => PSI_PER_KSI,
            PressureUnit::KiloPascal => PSI_PER_KPA,
            PressureUnit::MegaPascal => PSI_PER_MPA,
            PressureUnit::Bar => PSI_PER_BAR,
        }
    }
}

// ============================================================================
// Length (base: inches)
// ============================================================================

/// Length units. Internal base is inches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthUnit {
    Inches,
    Feet,
    Millimeters,
    Meters,
}

const IN_PER_FT: f64 = 12.0;
const IN_PER_MM: f64 = 1.0 / 25.4;
const IN_PER_M: f64 = 1000.0 / 25.4;

impl LengthUnit {
    fn parse(s: &str) -> Option<Self> {
        match normalize_unit(s).as_str() {
            "in" | "inch" | "inches" => Some(LengthUnit::Inches),
            "ft" | "foot" | "feet" => Some(LengthUnit::Feet),
            "mm" | "millimeter" | "millimeters" => Some(LengthUnit::Millimeters),
            "m" | "meter" | "meters" => Some(LengthUnit::Meters),
            _ => None,
        }
    }

    /// inches per one of this unit
    fn inch_factor(&self) -> f64 {
        match self {
            LengthUnit::Inches => 1.0,
            LengthUnit::Feet => IN_PER_FT,
            LengthUnit::Millimeters => IN_PER_MM,
            LengthUnit::Meters => IN_PER_M,
        }
    }
}

// ============================================================================
// Temperature (base: °F, affine)
// ============================================================================

/// Temperature units. Internal base is °F.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemperatureUnit {
    Fahrenheit,
    Celsius,
    Kelvin,
}

impl TemperatureUnit {
    fn parse(s: &str) -> Option<Self> {
        match normalize_unit(s).as_str() {
            "f" | "degf" | "fahrenheit" => Some(TemperatureUnit::Fahrenheit),
            "c" | "degc" | "celsius" => Some(TemperatureUnit::Celsius),
            "k" | "kelvin" => Some(TemperatureUnit::Kelvin),
            _ => None,
        }
    }

    fn to_fahrenheit(&self, value: f64) -> f64 {
        match self {
            TemperatureUnit::Fahrenheit => value,
            TemperatureUnit::Celsius => value * 9.0 / 5.0 + 32.0,
            TemperatureUnit::Kelvin => (value - 273.15) * 9.0 / 5.0 + 32.0,
        }
    }

    fn from_fahrenheit(&self, value_f: f64) -> f64 {
        match self {
            TemperatureUnit::Fahrenheit => value_f,
            TemperatureUnit::Celsius => (value_f - 32.0) * 5.0 / 9.0,
            TemperatureUnit::Kelvin => (value_f - 32.0) * 5.0 / 9.0 + 273.15,
        }
    }
}

/// Lowercase, trimmed, degree-sign-free unit token
fn normalize_unit(s: &str) -> String {
    s.trim().to_lowercase().replace(['°', ' '], "")
}

/// Convert a value between two units of the given quantity kind.
///
/// Fails with [`CalcError::UnsupportedConversion`] when either unit is not
/// registered for that quantity kind — including the case where the unit
/// string is a valid unit of a *different* kind ("psi" as a length).
///
/// # Example
///
/// ```rust
/// use vessel_core::units::{convert, Quantity};
///
/// let mm = convert(0.375, "in", "mm", Quantity::Length).unwrap();
/// assert!((mm - 9.525).abs() < 1e-9);
///
/// assert!(convert(1.0, "psi", "mm", Quantity::Pressure).is_err());
/// ```
pub fn convert(value: f64, from_unit: &str, to_unit: &str, quantity: Quantity) -> CalcResult<f64> {
    let unsupported =
        || CalcError::unsupported_conversion(from_unit, to_unit, quantity.code());

    match quantity {
        Quantity::Pressure => {
            let from = PressureUnit::parse(from_unit).ok_or_else(unsupported)?;
            let to = PressureUnit::parse(to_unit).ok_or_else(unsupported)?;
            Ok(value * from.psi_factor() / to.psi_factor())
        }
        Quantity::Length => {
            let from = LengthUnit::parse(from_unit).ok_or_else(unsupported)?;
            let to = LengthUnit::parse(to_unit).ok_or_else(unsupported)?;
            Ok(value * from.inch_factor() / to.inch_factor())
        }
        Quantity::Temperature => {
            let from = TemperatureUnit::parse(from_unit).ok_or_else(unsupported)?;
            let to = TemperatureUnit::parse(to_unit).ok_or_else(unsupported)?;
            Ok(to.from_fahrenheit(from.to_fahrenheit(value)))
        }
    }
}

/// A single conversion request: value, unit pair, and quantity kind.
///
/// ## JSON Example
///
/// ```json
/// { "value": 150.0, "from_unit": "psi", "to_unit": "mpa", "quantity": "pressure" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitConversion {
    /// Value in `from_unit`
    pub value: f64,

    /// Source unit token (e.g., "psi", "mm", "f")
    pub from_unit: String,

    /// Destination unit token
    pub to_unit: String,

    /// Quantity kind the unit pair belongs to
    pub quantity: Quantity,
}

impl UnitConversion {
    /// Perform the conversion described by this descriptor
    pub fn convert(&self) -> CalcResult<f64> {
        convert(self.value, &self.from_unit, &self.to_unit, self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pressure_psi_to_mpa() {
        let mpa = convert(145.037_737_730_209_2, "psi", "mpa", Quantity::Pressure).unwrap();
        assert!((mpa - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pressure_roundtrip() {
        for unit in ["psi", "ksi", "kpa", "mpa", "bar"] {
            let kpa = convert(150.0, "psi", unit, Quantity::Pressure).unwrap();
            let back = convert(kpa, unit, "psi", Quantity::Pressure).unwrap();
            assert!(
                (back - 150.0).abs() < 1e-9,
                "psi -> {unit} -> psi drifted: {back}"
            );
        }
    }

    #[test]
    fn test_length_in_to_mm() {
        let mm = convert(1.0, "in", "mm", Quantity::Length).unwrap();
        assert!((mm - 25.4).abs() < 1e-12);

        let ft = convert(144.0, "in", "ft", Quantity::Length).unwrap();
        assert!((ft - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_temperature_anchors() {
        let c = convert(32.0, "f", "c", Quantity::Temperature).unwrap();
        assert!(c.abs() < 1e-12);

        let k = convert(0.0, "c", "k", Quantity::Temperature).unwrap();
        assert!((k - 273.15).abs() < 1e-12);

        let f = convert(373.15, "k", "f", Quantity::Temperature).unwrap();
        assert!((f - 212.0).abs() < 1e-9);
    }

    #[test]
    fn test_unit_aliases() {
        let a = convert(10.0, "°F", "Celsius", Quantity::Temperature).unwrap();
        let b = convert(10.0, "f", "c", Quantity::Temperature).unwrap();
        assert_eq!(a, b);

        assert!(convert(1.0, "Inches", "mm", Quantity::Length).is_ok());
    }

    #[test]
    fn test_unsupported_pair() {
        let err = convert(1.0, "psi", "furlong", Quantity::Pressure).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_CONVERSION");

        // A valid unit of the wrong kind is just as unsupported
        let err = convert(1.0, "psi", "mm", Quantity::Pressure).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_CONVERSION");
        let err = convert(1.0, "mm", "in", Quantity::Pressure).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_CONVERSION");
    }

    #[test]
    fn test_descriptor() {
        let descriptor = UnitConversion {
            value: 100.0,
            from_unit: "c".to_string(),
            to_unit: "f".to_string(),
            quantity: Quantity::Temperature,
        };
        assert!((descriptor.convert().unwrap() - 212.0).abs() < 1e-12);

        let json = serde_json::to_string(&descriptor).unwrap();
        assert!(json.contains("\"quantity\":\"temperature\""));
        let roundtrip: UnitConversion = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.value, 100.0);
    }
}
