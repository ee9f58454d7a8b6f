//! # Calculator Factory
//!
//! Maps a normalized calculator-type key to exactly one concrete
//! calculator. The set of calculators is closed: [`CalculatorKind`]
//! enumerates every variant, and [`CalculatorKind::from_key`] fails with
//! [`CalcError::UnknownCalculatorType`] for anything else.
//!
//! ## Example
//!
//! ```rust
//! use vessel_core::factory::CalculatorKind;
//!
//! let kind = CalculatorKind::from_key("ASME VIII Div 1").unwrap();
//! assert_eq!(kind, CalculatorKind::AsmeViiiDiv1);
//! assert!(CalculatorKind::from_key("asme_ix").is_err());
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::{
    Api579Calculator, AsmeDiv1Calculator, AsmeDiv2Calculator, Calculator, En13445Calculator,
    GeneralVesselCalculator, MaterialPropertyCalculator, PipeStressCalculator,
    SafetyFactorCalculator,
};
use crate::errors::{CalcError, CalcResult};
use crate::request::{InputMap, OutputMap};

/// The closed set of calculator variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculatorKind {
    /// ASME Section VIII Division 1
    AsmeViiiDiv1,
    /// ASME Section VIII Division 2
    AsmeViiiDiv2,
    /// EN 13445 (metric)
    En13445,
    /// Wind/seismic loads and simplified fitness-for-service
    GeneralVessel,
    /// Piping thermal, pressure, and support checks
    PipeStress,
    /// Allowable stress, derating, and joint efficiency lookups
    MaterialProperty,
    /// Pressure safety ratios and fatigue life
    SafetyFactor,
    /// API 579 fitness-for-service screening
    Api579,
}

impl CalculatorKind {
    /// All calculator variants
    pub const ALL: [CalculatorKind; 8] = [
        CalculatorKind::AsmeViiiDiv1,
        CalculatorKind::AsmeViiiDiv2,
        CalculatorKind::En13445,
        CalculatorKind::GeneralVessel,
        CalculatorKind::PipeStress,
        CalculatorKind::MaterialProperty,
        CalculatorKind::SafetyFactor,
        CalculatorKind::Api579,
    ];

    /// Get the canonical key for this calculator
    pub fn key(&self) -> &'static str {
        match self {
            CalculatorKind::AsmeViiiDiv1 => "asme_viii_div_1",
            CalculatorKind::AsmeViiiDiv2 => "asme_viii_div_2",
            CalculatorKind::En13445 => "en_13445",
            CalculatorKind::GeneralVessel => "general_vessel",
            CalculatorKind::PipeStress => "pipe_stress",
            CalculatorKind::MaterialProperty => "material_property",
            CalculatorKind::SafetyFactor => "safety_factor",
            CalculatorKind::Api579 => "api_579",
        }
    }

    /// Resolve a calculator-type key. Keys are normalized (trimmed,
    /// lowercased, separators collapsed to underscores) and a few common
    /// aliases are accepted.
    pub fn from_key(key: &str) -> CalcResult<Self> {
        let normalized = key.trim().to_lowercase().replace(['-', ' ', '.'], "_");
        match normalized.as_str() {
            "asme_viii_div_1" | "asme_div_1" | "asme_viii_division_1" => {
                Ok(CalculatorKind::AsmeViiiDiv1)
            }
            "asme_viii_div_2" | "asme_div_2" | "asme_viii_division_2" => {
                Ok(CalculatorKind::AsmeViiiDiv2)
            }
            "en_13445" | "en13445" => Ok(CalculatorKind::En13445),
            "general_vessel" | "pressure_vessel" => Ok(CalculatorKind::GeneralVessel),
            "pipe_stress" | "piping" => Ok(CalculatorKind::PipeStress),
            "material_property" | "material_properties" => Ok(CalculatorKind::MaterialProperty),
            "safety_factor" | "safety_factors" => Ok(CalculatorKind::SafetyFactor),
            "api_579" | "api579" => Ok(CalculatorKind::Api579),
            _ => Err(CalcError::unknown_calculator_type(key)),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            CalculatorKind::AsmeViiiDiv1 => "ASME VIII Division 1",
            CalculatorKind::AsmeViiiDiv2 => "ASME VIII Division 2",
            CalculatorKind::En13445 => "EN 13445",
            CalculatorKind::GeneralVessel => "General Pressure Vessel",
            CalculatorKind::PipeStress => "Pipe Stress",
            CalculatorKind::MaterialProperty => "Material Property",
            CalculatorKind::SafetyFactor => "Safety Factor",
            CalculatorKind::Api579 => "API 579 Fitness-for-Service",
        }
    }

    /// Get the concrete calculator for this kind
    pub fn calculator(&self) -> &'static dyn Calculator {
        match self {
            CalculatorKind::AsmeViiiDiv1 => &AsmeDiv1Calculator,
            CalculatorKind::AsmeViiiDiv2 => &AsmeDiv2Calculator,
            CalculatorKind::En13445 => &En13445Calculator,
            CalculatorKind::GeneralVessel => &GeneralVesselCalculator,
            CalculatorKind::PipeStress => &PipeStressCalculator,
            CalculatorKind::MaterialProperty => &MaterialPropertyCalculator,
            CalculatorKind::SafetyFactor => &SafetyFactorCalculator,
            CalculatorKind::Api579 => &Api579Calculator,
        }
    }
}

impl std::fmt::Display for CalculatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Validate an input mapping against the selected calculator without
/// computing anything.
pub fn validate_inputs(calculator_type: &str, inputs: &InputMap) -> CalcResult<()> {
    CalculatorKind::from_key(calculator_type)?
        .calculator()
        .validate_inputs(inputs)
}

/// Run a calculation: resolve the calculator, dispatch on the
/// `calculation_type` key, and return the complete output mapping.
pub fn calculate(calculator_type: &str, inputs: &InputMap) -> CalcResult<OutputMap> {
    CalculatorKind::from_key(calculator_type)?
        .calculator()
        .calculate(inputs)
}

impl crate::request::CalculationRequest {
    /// Resolve the calculator and run the request, wrapping the output
    /// mapping in a [`CalculationResult`](crate::request::CalculationResult)
    pub fn run(&self) -> CalcResult<crate::request::CalculationResult> {
        let outputs = calculate(&self.calculator_type, &self.inputs)?;
        Ok(crate::request::CalculationResult { outputs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_canonical_key_resolves() {
        for kind in CalculatorKind::ALL {
            assert_eq!(CalculatorKind::from_key(kind.key()).unwrap(), kind);
        }
    }

    #[test]
    fn test_key_normalization() {
        assert_eq!(
            CalculatorKind::from_key("  ASME-VIII-Div-1  ").unwrap(),
            CalculatorKind::AsmeViiiDiv1
        );
        assert_eq!(
            CalculatorKind::from_key("EN 13445").unwrap(),
            CalculatorKind::En13445
        );
        assert_eq!(
            CalculatorKind::from_key("API 579").unwrap(),
            CalculatorKind::Api579
        );
    }

    #[test]
    fn test_unknown_key() {
        let err = CalculatorKind::from_key("asme_ix").unwrap_err();
        assert_eq!(err, CalcError::unknown_calculator_type("asme_ix"));
    }

    #[test]
    fn test_calculate_end_to_end() {
        let inputs = json!({
            "calculation_type": "cylindrical_shell",
            "design_pressure_psi": 150.0,
            "inside_radius_in": 24.0,
            "allowable_stress_psi": 20000.0,
            "joint_efficiency": 1.0,
            "corrosion_allowance_in": 0.125
        })
        .as_object()
        .unwrap()
        .clone();

        assert!(validate_inputs("asme_viii_div_1", &inputs).is_ok());
        let outputs = calculate("asme_viii_div_1", &inputs).unwrap();

        let required = outputs["required_thickness_in"].as_f64().unwrap();
        let minimum = outputs["minimum_thickness_in"].as_f64().unwrap();
        assert!((required - 0.1808).abs() < 0.0005);
        assert!(required < minimum);
    }

    #[test]
    fn test_calculate_idempotent_outputs() {
        let inputs = json!({
            "calculation_type": "general_metal_loss",
            "original_thickness_in": 0.375,
            "current_thickness_in": 0.250,
            "corrosion_rate_in_per_yr": 0.005,
            "design_pressure_psi": 150.0,
            "inside_radius_in": 30.0,
            "allowable_stress_psi": 20000.0
        })
        .as_object()
        .unwrap()
        .clone();

        let first = calculate("api_579", &inputs).unwrap();
        let second = calculate("api_579", &inputs).unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_unknown_calculator_propagates() {
        let inputs = InputMap::new();
        let err = calculate("finite_element", &inputs).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_CALCULATOR_TYPE");
    }

    #[test]
    fn test_request_run() {
        let request = crate::request::CalculationRequest {
            calculator_type: "material_property".to_string(),
            inputs: json!({
                "calculation_type": "allowable_stress",
                "yield_strength_psi": 38000.0,
                "tensile_strength_psi": 70000.0,
                "design_code": "asme_viii_div_1"
            })
            .as_object()
            .unwrap()
            .clone(),
        };

        let result = request.run().unwrap();
        assert_eq!(result.outputs["allowable_stress_psi"], json!(20000.0));
        assert_eq!(result.outputs["governing_criteria"], json!("tensile_strength"));
    }

    #[test]
    fn test_kind_serialization() {
        let kind = CalculatorKind::AsmeViiiDiv1;
        assert_eq!(
            serde_json::to_string(&kind).unwrap(),
            "\"asme_viii_div1\""
        );
    }
}
