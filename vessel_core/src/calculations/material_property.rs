//! # Material Property Calculator
//!
//! Code factor lookups: allowable stress from yield/tensile strength,
//! temperature derating, weld joint efficiency, and material temperature
//! limits. The stepped scales live in static ordered breakpoint tables,
//! scanned first-match, so the factors are trivially monotone in
//! temperature.
//!
//! ## Example
//!
//! ```rust
//! use vessel_core::calculations::material_property::{AllowableStressInput, allowable_stress};
//!
//! let input = AllowableStressInput {
//!     yield_strength_psi: 38000.0,
//!     tensile_strength_psi: 70000.0,
//!     design_code: "asme_viii_div_1".to_string(),
//! };
//!
//! let result = allowable_stress(&input).unwrap();
//! assert_eq!(result.allowable_stress_psi, 20000.0);
//! assert_eq!(result.governing_criteria, "tensile_strength");
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::request::{
    calculation_type, optional_str, require_f64, require_str, to_output_map, InputMap, OutputMap,
};

use super::{family_or_default, Calculator};
use crate::materials::MaterialFamily;

/// Joint efficiency for a joint type the table does not know
const DEFAULT_JOINT_EFFICIENCY: f64 = 0.70;

/// Temperature derating breakpoints: factor applies at or below the
/// temperature; above the last breakpoint the floor applies.
const DERATING_TABLE: [(f64, f64); 7] = [
    (100.0, 1.00),
    (200.0, 0.95),
    (300.0, 0.90),
    (400.0, 0.85),
    (500.0, 0.80),
    (600.0, 0.70),
    (700.0, 0.65),
];

/// Derating floor above the last breakpoint
const DERATING_FLOOR: f64 = 0.60;

/// Weld joint efficiency per (joint type, radiography level), UW-12 style
static JOINT_EFFICIENCY_TABLE: Lazy<Vec<((JointType, RadiographyLevel), f64)>> = Lazy::new(|| {
    vec![
        ((JointType::Butt, RadiographyLevel::Full), 1.00),
        ((JointType::Butt, RadiographyLevel::Spot), 0.85),
        ((JointType::Butt, RadiographyLevel::None), 0.70),
        ((JointType::Lap, RadiographyLevel::Full), 0.75),
        ((JointType::Lap, RadiographyLevel::Spot), 0.70),
        ((JointType::Lap, RadiographyLevel::None), 0.60),
    ]
});

/// Material property calculator.
///
/// Operations: `allowable_stress`, `temperature_derating`,
/// `joint_efficiency`, `temperature_limit`.
pub struct MaterialPropertyCalculator;

impl Calculator for MaterialPropertyCalculator {
    fn validate_inputs(&self, inputs: &InputMap) -> CalcResult<()> {
        match calculation_type(inputs)?.as_str() {
            "allowable_stress" => AllowableStressInput::from_map(inputs)?.validate(),
            "temperature_derating" => TemperatureDeratingInput::from_map(inputs)?.validate(),
            "joint_efficiency" => JointEfficiencyInput::from_map(inputs).map(|_| ()),
            "temperature_limit" => TemperatureLimitInput::from_map(inputs).map(|_| ()),
            other => Err(CalcError::unsupported_calculation_type(other)),
        }
    }

    fn calculate(&self, inputs: &InputMap) -> CalcResult<OutputMap> {
        match calculation_type(inputs)?.as_str() {
            "allowable_stress" => {
                to_output_map(&allowable_stress(&AllowableStressInput::from_map(inputs)?)?)
            }
            "temperature_derating" => to_output_map(&temperature_derating(
                &TemperatureDeratingInput::from_map(inputs)?,
            )?),
            "joint_efficiency" => {
                to_output_map(&joint_efficiency(&JointEfficiencyInput::from_map(inputs)?))
            }
            "temperature_limit" => {
                to_output_map(&temperature_limit(&TemperatureLimitInput::from_map(inputs)?))
            }
            other => Err(CalcError::unsupported_calculation_type(other)),
        }
    }
}

// ============================================================================
// Allowable Stress
// ============================================================================

/// Input parameters for the allowable-stress basis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllowableStressInput {
    /// Specified minimum yield strength Sy (psi)
    pub yield_strength_psi: f64,

    /// Specified minimum tensile strength Su (psi)
    pub tensile_strength_psi: f64,

    /// Design code key; Division-1-style codes use Sy/1.5 and Su/3.5
    pub design_code: String,
}

impl AllowableStressInput {
    /// Build from the input mapping
    pub fn from_map(inputs: &InputMap) -> CalcResult<Self> {
        Ok(AllowableStressInput {
            yield_strength_psi: require_f64(inputs, "yield_strength_psi")?,
            tensile_strength_psi: require_f64(inputs, "tensile_strength_psi")?,
            design_code: optional_str(inputs, "design_code")?
                .unwrap_or_else(|| "asme_viii_div_1".to_string()),
        })
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if self.yield_strength_psi <= 0.0 {
            return Err(CalcError::invalid_value(
                "yield_strength_psi",
                self.yield_strength_psi.to_string(),
                "Yield strength must be positive",
            ));
        }
        if self.tensile_strength_psi <= self.yield_strength_psi {
            return Err(CalcError::invalid_value(
                "tensile_strength_psi",
                self.tensile_strength_psi.to_string(),
                "Tensile strength must exceed yield strength",
            ));
        }
        Ok(())
    }

    /// True when the design code uses the Division 1 basis
    pub fn is_division_1_basis(&self) -> bool {
        let code = self.design_code.trim().to_lowercase().replace(['-', ' ', '.'], "_");
        code.contains("div_1") || code.contains("division_1")
    }
}

/// Results from allowable-stress calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllowableStressResult {
    /// Yield-based candidate (psi)
    pub yield_based_psi: f64,

    /// Tensile-based candidate (psi)
    pub tensile_based_psi: f64,

    /// Governing allowable stress, the smaller candidate (psi)
    pub allowable_stress_psi: f64,

    /// "yield_strength" or "tensile_strength"
    pub governing_criteria: String,
}

/// Calculate the code allowable stress from yield and tensile strength.
pub fn allowable_stress(input: &AllowableStressInput) -> CalcResult<AllowableStressResult> {
    input.validate()?;

    let (yield_divisor, tensile_divisor) = if input.is_division_1_basis() {
        (1.5, 3.5)
    } else {
        // Conservative basis for codes without a recognized factor set
        (2.0, 4.0)
    };

    let yield_based = input.yield_strength_psi / yield_divisor;
    let tensile_based = input.tensile_strength_psi / tensile_divisor;

    let (allowable, criteria) = if yield_based <= tensile_based {
        (yield_based, "yield_strength")
    } else {
        (tensile_based, "tensile_strength")
    };

    Ok(AllowableStressResult {
        yield_based_psi: yield_based,
        tensile_based_psi: tensile_based,
        allowable_stress_psi: allowable,
        governing_criteria: criteria.to_string(),
    })
}

// ============================================================================
// Temperature Derating
// ============================================================================

/// Stepped derating factor for the design temperature.
///
/// First-match scan of the ordered breakpoint table; above the last
/// breakpoint the 0.60 floor applies.
pub fn derating_factor(design_temperature_f: f64) -> f64 {
    for (limit, factor) in DERATING_TABLE {
        if design_temperature_f <= limit {
            return factor;
        }
    }
    DERATING_FLOOR
}

/// Input parameters for temperature derating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureDeratingInput {
    /// Design temperature (°F)
    pub design_temperature_f: f64,
}

impl TemperatureDeratingInput {
    /// Build from the input mapping
    pub fn from_map(inputs: &InputMap) -> CalcResult<Self> {
        Ok(TemperatureDeratingInput {
            design_temperature_f: require_f64(inputs, "design_temperature_f")?,
        })
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        // Below the creep range the table saturates at 1.0; any finite
        // temperature is acceptable input.
        Ok(())
    }
}

/// Results from temperature derating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureDeratingResult {
    /// Design temperature echoed (°F)
    pub design_temperature_f: f64,

    /// Stepped derating factor in [0.60, 1.00]
    pub derating_factor: f64,
}

/// Look up the stepped temperature derating factor.
pub fn temperature_derating(
    input: &TemperatureDeratingInput,
) -> CalcResult<TemperatureDeratingResult> {
    input.validate()?;
    Ok(TemperatureDeratingResult {
        design_temperature_f: input.design_temperature_f,
        derating_factor: derating_factor(input.design_temperature_f),
    })
}

// ============================================================================
// Joint Efficiency
// ============================================================================

/// Weld joint types the efficiency table knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointType {
    /// Double-welded butt joint
    Butt,
    /// Lap joint
    Lap,
}

impl JointType {
    /// Parse from common string representations; unknown types return None
    /// so the caller can apply the default efficiency without raising
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "butt" | "butt_weld" | "double_butt" => Some(JointType::Butt),
            "lap" | "lap_weld" | "lap_joint" => Some(JointType::Lap),
            _ => None,
        }
    }

    /// Get the snake_case code
    pub fn code(&self) -> &'static str {
        match self {
            JointType::Butt => "butt",
            JointType::Lap => "lap",
        }
    }
}

/// Radiographic examination levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadiographyLevel {
    /// Full radiography
    Full,
    /// Spot radiography
    Spot,
    /// No radiography
    None,
}

impl RadiographyLevel {
    /// Parse from common string representations
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "full" | "full_rt" | "100%" => Some(RadiographyLevel::Full),
            "spot" | "spot_rt" => Some(RadiographyLevel::Spot),
            "none" | "no_rt" | "not_examined" => Some(RadiographyLevel::None),
            _ => None,
        }
    }

    /// Get the snake_case code
    pub fn code(&self) -> &'static str {
        match self {
            RadiographyLevel::Full => "full",
            RadiographyLevel::Spot => "spot",
            RadiographyLevel::None => "none",
        }
    }
}

/// Input parameters for the joint-efficiency lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JointEfficiencyInput {
    /// Joint type token; unknown types take the 0.70 default
    pub joint_type: String,

    /// Radiography level token; unrecognized levels fall back to no-RT
    pub radiography: String,
}

impl JointEfficiencyInput {
    /// Build from the input mapping
    pub fn from_map(inputs: &InputMap) -> CalcResult<Self> {
        Ok(JointEfficiencyInput {
            joint_type: require_str(inputs, "joint_type")?,
            radiography: optional_str(inputs, "radiography")?.unwrap_or_else(|| "none".to_string()),
        })
    }
}

/// Results from the joint-efficiency lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JointEfficiencyResult {
    /// Joint efficiency E
    pub joint_efficiency: f64,

    /// True when the joint type was found in the table; false when the
    /// 0.70 default was applied
    pub table_match: bool,
}

/// Look up the weld joint efficiency.
///
/// Unknown joint types default to 0.70 without raising; a known joint
/// with an unrecognized radiography level uses its no-RT entry.
pub fn joint_efficiency(input: &JointEfficiencyInput) -> JointEfficiencyResult {
    let Some(joint) = JointType::parse(&input.joint_type) else {
        return JointEfficiencyResult {
            joint_efficiency: DEFAULT_JOINT_EFFICIENCY,
            table_match: false,
        };
    };
    let level = RadiographyLevel::parse(&input.radiography).unwrap_or(RadiographyLevel::None);

    let efficiency = JOINT_EFFICIENCY_TABLE
        .iter()
        .find(|((j, r), _)| *j == joint && *r == level)
        .map(|(_, e)| *e)
        .unwrap_or(DEFAULT_JOINT_EFFICIENCY);

    JointEfficiencyResult {
        joint_efficiency: efficiency,
        table_match: true,
    }
}

// ============================================================================
// Material Temperature Limit
// ============================================================================

/// Input parameters for the material temperature-limit check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureLimitInput {
    /// Material family
    pub material: MaterialFamily,

    /// Design temperature (°F)
    pub design_temperature_f: f64,
}

impl TemperatureLimitInput {
    /// Build from the input mapping
    pub fn from_map(inputs: &InputMap) -> CalcResult<Self> {
        Ok(TemperatureLimitInput {
            material: family_or_default(inputs, "material")?,
            design_temperature_f: require_f64(inputs, "design_temperature_f")?,
        })
    }
}

/// Results from the temperature-limit check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureLimitResult {
    /// Material family echoed
    pub material: MaterialFamily,

    /// Family design-temperature limit (°F)
    pub temperature_limit_f: f64,

    /// True when the design temperature is within the limit
    pub within_limit: bool,
}

/// Check the design temperature against the family limit.
pub fn temperature_limit(input: &TemperatureLimitInput) -> TemperatureLimitResult {
    let limit = input.material.properties().temperature_limit_f;
    TemperatureLimitResult {
        material: input.material,
        temperature_limit_f: limit,
        within_limit: input.design_temperature_f <= limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_allowable_stress_tensile_governs() {
        let input = AllowableStressInput {
            yield_strength_psi: 38000.0,
            tensile_strength_psi: 70000.0,
            design_code: "asme_viii_div_1".to_string(),
        };
        let result = allowable_stress(&input).unwrap();

        // min(38000/1.5, 70000/3.5) = min(25333.3, 20000) = 20000
        assert!((result.yield_based_psi - 25333.3).abs() < 0.1);
        assert_eq!(result.tensile_based_psi, 20000.0);
        assert_eq!(result.allowable_stress_psi, 20000.0);
        assert_eq!(result.governing_criteria, "tensile_strength");
    }

    #[test]
    fn test_allowable_stress_yield_governs() {
        let input = AllowableStressInput {
            yield_strength_psi: 25000.0,
            tensile_strength_psi: 70000.0,
            design_code: "asme_viii_div_1".to_string(),
        };
        let result = allowable_stress(&input).unwrap();

        // min(25000/1.5, 70000/3.5) = min(16666.7, 20000)
        assert_eq!(result.governing_criteria, "yield_strength");
        assert!((result.allowable_stress_psi - 16666.7).abs() < 0.1);
    }

    #[test]
    fn test_allowable_stress_conservative_basis() {
        let input = AllowableStressInput {
            yield_strength_psi: 38000.0,
            tensile_strength_psi: 70000.0,
            design_code: "en_13445".to_string(),
        };
        let result = allowable_stress(&input).unwrap();

        // min(38000/2, 70000/4) = min(19000, 17500) = 17500
        assert_eq!(result.allowable_stress_psi, 17500.0);
    }

    #[test]
    fn test_allowable_stress_code_normalization() {
        for code in ["ASME VIII Div 1", "asme-viii-div-1", "Division 1"] {
            let input = AllowableStressInput {
                yield_strength_psi: 38000.0,
                tensile_strength_psi: 70000.0,
                design_code: code.to_string(),
            };
            assert!(input.is_division_1_basis(), "{code} not recognized");
        }
    }

    #[test]
    fn test_allowable_stress_rejects_inverted_strengths() {
        let input = AllowableStressInput {
            yield_strength_psi: 70000.0,
            tensile_strength_psi: 38000.0,
            design_code: "asme_viii_div_1".to_string(),
        };
        assert!(allowable_stress(&input).is_err());
    }

    #[test]
    fn test_derating_breakpoints() {
        assert_eq!(derating_factor(70.0), 1.00);
        assert_eq!(derating_factor(100.0), 1.00);
        assert_eq!(derating_factor(100.1), 0.95);
        assert_eq!(derating_factor(400.0), 0.85);
        assert_eq!(derating_factor(700.0), 0.65);
        assert_eq!(derating_factor(701.0), 0.60);
        assert_eq!(derating_factor(1200.0), 0.60);
    }

    #[test]
    fn test_derating_monotonic() {
        let mut previous = 1.0;
        for t in (0..1500).step_by(25) {
            let factor = derating_factor(t as f64);
            assert!(factor <= previous, "derating rose at {t}");
            previous = factor;
        }
    }

    #[test]
    fn test_joint_efficiency_table() {
        let full_butt = joint_efficiency(&JointEfficiencyInput {
            joint_type: "butt".to_string(),
            radiography: "full".to_string(),
        });
        assert_eq!(full_butt.joint_efficiency, 1.0);
        assert!(full_butt.table_match);

        let bare_lap = joint_efficiency(&JointEfficiencyInput {
            joint_type: "lap".to_string(),
            radiography: "none".to_string(),
        });
        assert_eq!(bare_lap.joint_efficiency, 0.60);
    }

    #[test]
    fn test_joint_efficiency_unknown_type_defaults() {
        let result = joint_efficiency(&JointEfficiencyInput {
            joint_type: "corner".to_string(),
            radiography: "full".to_string(),
        });
        assert_eq!(result.joint_efficiency, 0.70);
        assert!(!result.table_match);
    }

    #[test]
    fn test_joint_efficiency_unknown_radiography_falls_back() {
        let result = joint_efficiency(&JointEfficiencyInput {
            joint_type: "butt".to_string(),
            radiography: "ultrasonic".to_string(),
        });
        // Unrecognized examination level -> no-RT column
        assert_eq!(result.joint_efficiency, 0.70);
        assert!(result.table_match);
    }

    #[test]
    fn test_temperature_limit() {
        let within = temperature_limit(&TemperatureLimitInput {
            material: MaterialFamily::CarbonSteel,
            design_temperature_f: 650.0,
        });
        assert!(within.within_limit);
        assert_eq!(within.temperature_limit_f, 800.0);

        let beyond = temperature_limit(&TemperatureLimitInput {
            material: MaterialFamily::Aluminum,
            design_temperature_f: 650.0,
        });
        assert!(!beyond.within_limit);
    }

    #[test]
    fn test_calculator_dispatch() {
        let calc = MaterialPropertyCalculator;
        let inputs = json!({
            "calculation_type": "joint_efficiency",
            "joint_type": "butt",
            "radiography": "spot"
        })
        .as_object()
        .unwrap()
        .clone();

        assert!(calc.validate_inputs(&inputs).is_ok());
        let outputs = calc.calculate(&inputs).unwrap();
        assert_eq!(outputs["joint_efficiency"], json!(0.85));

        let bad = json!({ "calculation_type": "hardness" }).as_object().unwrap().clone();
        assert!(calc.calculate(&bad).is_err());
    }
}
