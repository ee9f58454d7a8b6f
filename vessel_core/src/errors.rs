//! # Error Types
//!
//! Structured error types for vessel_core. These errors are designed to be
//! informative for both humans and LLMs, providing enough context to
//! understand and fix issues programmatically.
//!
//! Calculations never return partial results: every operation either
//! produces a complete output mapping or raises exactly one of these
//! errors. Arithmetic infeasibility (a formula denominator going
//! non-positive) is always classified as [`CalcError::InvalidStressCondition`],
//! never surfaced as a raw numeric artifact like a negative or NaN thickness.
//!
//! ## Example
//!
//! ```rust
//! use vessel_core::errors::{CalcError, CalcResult};
//!
//! fn validate_pressure(design_pressure_psi: f64) -> CalcResult<()> {
//!     if design_pressure_psi <= 0.0 {
//!         return Err(CalcError::InvalidValue {
//!             field: "design_pressure_psi".to_string(),
//!             value: design_pressure_psi.to_string(),
//!             reason: "Design pressure must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for vessel_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
///
/// Each variant provides specific context about what went wrong,
/// enabling programmatic error handling by LLMs and other consumers.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// A required field is missing from the input mapping
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// An input value is invalid (wrong sign, out of range, wrong type)
    #[error("Invalid value for '{field}': {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// A formula denominator went non-positive: the combination of
    /// pressure, allowable stress, and joint efficiency describes a
    /// physically infeasible design
    #[error("Invalid stress condition in {calculation_type}: {reason}")]
    InvalidStressCondition {
        calculation_type: String,
        reason: String,
    },

    /// The `calculation_type` sub-key is not an operation this calculator knows
    #[error("Unsupported calculation type: {calculation_type}")]
    UnsupportedCalculationType { calculation_type: String },

    /// The calculator-type key does not map to any registered calculator
    #[error("Unknown calculator type: {calculator_type}")]
    UnknownCalculatorType { calculator_type: String },

    /// No registered conversion path for this unit pair and quantity
    #[error("Unsupported conversion: {from_unit} -> {to_unit} ({quantity})")]
    UnsupportedConversion {
        from_unit: String,
        to_unit: String,
        quantity: String,
    },

    /// Material family not found in the database
    #[error("Unknown material: {material_name}")]
    UnknownMaterial { material_name: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create an InvalidValue error
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidStressCondition error
    pub fn invalid_stress_condition(
        calculation_type: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidStressCondition {
            calculation_type: calculation_type.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnsupportedCalculationType error
    pub fn unsupported_calculation_type(calculation_type: impl Into<String>) -> Self {
        CalcError::UnsupportedCalculationType {
            calculation_type: calculation_type.into(),
        }
    }

    /// Create an UnknownCalculatorType error
    pub fn unknown_calculator_type(calculator_type: impl Into<String>) -> Self {
        CalcError::UnknownCalculatorType {
            calculator_type: calculator_type.into(),
        }
    }

    /// Create an UnsupportedConversion error
    pub fn unsupported_conversion(
        from_unit: impl Into<String>,
        to_unit: impl Into<String>,
        quantity: impl Into<String>,
    ) -> Self {
        CalcError::UnsupportedConversion {
            from_unit: from_unit.into(),
            to_unit: to_unit.into(),
            quantity: quantity.into(),
        }
    }

    /// Create an UnknownMaterial error
    pub fn unknown_material(material_name: impl Into<String>) -> Self {
        CalcError::UnknownMaterial {
            material_name: material_name.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::InvalidValue { .. } => "INVALID_VALUE",
            CalcError::InvalidStressCondition { .. } => "INVALID_STRESS_CONDITION",
            CalcError::UnsupportedCalculationType { .. } => "UNSUPPORTED_CALCULATION_TYPE",
            CalcError::UnknownCalculatorType { .. } => "UNKNOWN_CALCULATOR_TYPE",
            CalcError::UnsupportedConversion { .. } => "UNSUPPORTED_CONVERSION",
            CalcError::UnknownMaterial { .. } => "UNKNOWN_MATERIAL",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}
