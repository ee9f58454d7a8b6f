//! # Calculation Request/Result Boundary
//!
//! The engine's only external interface is an in-process call:
//! `(calculator_type, input mapping) -> output mapping | error`. This module
//! defines the mapping types and the typed field-extraction helpers every
//! calculator uses to pull named physical quantities out of the input map.
//!
//! Upstream layers may pre-validate field presence, but the engine never
//! trusts them: every calculator re-extracts and re-validates its own
//! fields through these helpers.
//!
//! ## Example
//!
//! ```rust
//! use vessel_core::request::{require_positive, InputMap};
//! use serde_json::json;
//!
//! let inputs: InputMap = json!({ "design_pressure_psi": 150.0 })
//!     .as_object()
//!     .unwrap()
//!     .clone();
//!
//! let p = require_positive(&inputs, "design_pressure_psi").unwrap();
//! assert_eq!(p, 150.0);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{CalcError, CalcResult};

/// Input mapping: named physical quantities (numeric or categorical)
pub type InputMap = Map<String, Value>;

/// Output mapping: named derived quantities (numeric, boolean, or rating strings)
pub type OutputMap = Map<String, Value>;

/// A calculation request as assembled by the calling layer.
///
/// ## JSON Example
///
/// ```json
/// {
///   "calculator_type": "asme_viii_div_1",
///   "inputs": {
///     "calculation_type": "cylindrical_shell",
///     "design_pressure_psi": 150.0,
///     "inside_radius_in": 24.0,
///     "allowable_stress_psi": 20000.0,
///     "joint_efficiency": 1.0,
///     "corrosion_allowance_in": 0.125
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// Calculator-type key resolved by the factory
    pub calculator_type: String,

    /// Input mapping passed to the calculator
    pub inputs: InputMap,
}

/// A calculation result: the complete output mapping.
///
/// Stored verbatim by the persistence layer; formatted selectively by the
/// reporting layer. The engine itself never mutates or caches it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Output mapping produced by the calculator
    pub outputs: OutputMap,
}

/// Extract the `calculation_type` sub-key that selects an operation
/// within a calculator.
pub fn calculation_type(inputs: &InputMap) -> CalcResult<String> {
    require_str(inputs, "calculation_type")
}

/// Extract a required numeric field.
///
/// Missing keys and JSON nulls are [`CalcError::MissingField`]; non-numeric,
/// NaN, and infinite values are [`CalcError::InvalidValue`].
pub fn require_f64(inputs: &InputMap, field: &str) -> CalcResult<f64> {
    match optional_f64(inputs, field)? {
        Some(value) => Ok(value),
        None => Err(CalcError::missing_field(field)),
    }
}

/// Extract an optional numeric field (absent and null both mean "not given")
pub fn optional_f64(inputs: &InputMap, field: &str) -> CalcResult<Option<f64>> {
    match inputs.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => {
            let number = value.as_f64().ok_or_else(|| {
                CalcError::invalid_value(field, value.to_string(), "Expected a number")
            })?;
            if !number.is_finite() {
                return Err(CalcError::invalid_value(
                    field,
                    number.to_string(),
                    "Value must be finite",
                ));
            }
            Ok(Some(number))
        }
    }
}

/// Extract a required numeric field that must be strictly positive
pub fn require_positive(inputs: &InputMap, field: &str) -> CalcResult<f64> {
    let value = require_f64(inputs, field)?;
    if value <= 0.0 {
        return Err(CalcError::invalid_value(
            field,
            value.to_string(),
            "Value must be positive",
        ));
    }
    Ok(value)
}

/// Extract a required numeric field that must be non-negative
pub fn require_non_negative(inputs: &InputMap, field: &str) -> CalcResult<f64> {
    let value = require_f64(inputs, field)?;
    if value < 0.0 {
        return Err(CalcError::invalid_value(
            field,
            value.to_string(),
            "Value cannot be negative",
        ));
    }
    Ok(value)
}

/// Extract an optional positive numeric field, falling back to a default
pub fn positive_or(inputs: &InputMap, field: &str, default: f64) -> CalcResult<f64> {
    match optional_f64(inputs, field)? {
        Some(value) if value <= 0.0 => Err(CalcError::invalid_value(
            field,
            value.to_string(),
            "Value must be positive",
        )),
        Some(value) => Ok(value),
        None => Ok(default),
    }
}

/// Extract an optional non-negative numeric field, falling back to a default
pub fn non_negative_or(inputs: &InputMap, field: &str, default: f64) -> CalcResult<f64> {
    match optional_f64(inputs, field)? {
        Some(value) if value < 0.0 => Err(CalcError::invalid_value(
            field,
            value.to_string(),
            "Value cannot be negative",
        )),
        Some(value) => Ok(value),
        None => Ok(default),
    }
}

/// Extract a required string field
pub fn require_str(inputs: &InputMap, field: &str) -> CalcResult<String> {
    match optional_str(inputs, field)? {
        Some(value) => Ok(value),
        None => Err(CalcError::missing_field(field)),
    }
}

/// Extract an optional string field
pub fn optional_str(inputs: &InputMap, field: &str) -> CalcResult<Option<String>> {
    match inputs.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(CalcError::invalid_value(
            field,
            other.to_string(),
            "Expected a string",
        )),
    }
}

/// Serialize a result struct into the output mapping
pub fn to_output_map<T: Serialize>(result: &T) -> CalcResult<OutputMap> {
    match serde_json::to_value(result) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(CalcError::Internal {
            message: format!("Result did not serialize to an object: {other}"),
        }),
        Err(err) => Err(CalcError::Internal {
            message: err.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_inputs() -> InputMap {
        json!({
            "calculation_type": "cylindrical_shell",
            "design_pressure_psi": 150.0,
            "corrosion_allowance_in": 0.0,
            "joint_efficiency": null,
            "head_type": "ellipsoidal"
        })
        .as_object()
        .unwrap()
        .clone()
    }

    #[test]
    fn test_require_f64() {
        let inputs = sample_inputs();
        assert_eq!(require_f64(&inputs, "design_pressure_psi").unwrap(), 150.0);

        let err = require_f64(&inputs, "inside_radius_in").unwrap_err();
        assert_eq!(err.error_code(), "MISSING_FIELD");

        let err = require_f64(&inputs, "head_type").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_VALUE");
    }

    #[test]
    fn test_null_is_missing() {
        let inputs = sample_inputs();
        assert_eq!(optional_f64(&inputs, "joint_efficiency").unwrap(), None);
        let err = require_f64(&inputs, "joint_efficiency").unwrap_err();
        assert_eq!(err.error_code(), "MISSING_FIELD");
    }

    #[test]
    fn test_require_positive() {
        let inputs = sample_inputs();
        assert!(require_positive(&inputs, "design_pressure_psi").is_ok());

        let err = require_positive(&inputs, "corrosion_allowance_in").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_VALUE");
        assert!(require_non_negative(&inputs, "corrosion_allowance_in").is_ok());
    }

    #[test]
    fn test_defaults() {
        let inputs = sample_inputs();
        assert_eq!(positive_or(&inputs, "joint_efficiency", 1.0).unwrap(), 1.0);
        assert_eq!(
            non_negative_or(&inputs, "corrosion_allowance_in", 0.125).unwrap(),
            0.0
        );
    }

    #[test]
    fn test_calculation_type() {
        let inputs = sample_inputs();
        assert_eq!(calculation_type(&inputs).unwrap(), "cylindrical_shell");

        let empty = InputMap::new();
        let err = calculation_type(&empty).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_FIELD");
    }

    #[test]
    fn test_request_serialization() {
        let request = CalculationRequest {
            calculator_type: "asme_viii_div_1".to_string(),
            inputs: sample_inputs(),
        };
        let json = serde_json::to_string(&request).unwrap();
        let roundtrip: CalculationRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.calculator_type, "asme_viii_div_1");
        assert_eq!(roundtrip.inputs.len(), request.inputs.len());
    }

    #[test]
    fn test_to_output_map() {
        #[derive(Serialize)]
        struct SampleResult {
            required_thickness_in: f64,
            adequate: bool,
        }
        let map = to_output_map(&SampleResult {
            required_thickness_in: 0.181,
            adequate: true,
        })
        .unwrap();
        assert_eq!(map["adequate"], json!(true));
    }
}
