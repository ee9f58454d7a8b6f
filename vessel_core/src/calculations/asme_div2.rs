//! # ASME Section VIII Division 2 Calculator
//!
//! Division 2 design-by-rule shells and the screening-level fatigue check.
//! The shell formulas mirror Division 1 with the Division 2 coefficient of
//! 0.5, and every shell operation additionally checks the design
//! temperature against the material family's limit — Division 2 vessels are
//! certified to a tighter design basis, so an out-of-range temperature is
//! surfaced directly in the result rather than left to the caller.
//!
//! ## Example
//!
//! ```rust
//! use vessel_core::calculations::asme_div2::{Div2ShellInput, cylindrical_shell};
//! use vessel_core::materials::MaterialFamily;
//!
//! let input = Div2ShellInput {
//!     design_pressure_psi: 150.0,
//!     inside_radius_in: 24.0,
//!     allowable_stress_psi: 20000.0,
//!     joint_efficiency: 1.0,
//!     corrosion_allowance_in: 0.125,
//!     design_temperature_f: 650.0,
//!     material: MaterialFamily::CarbonSteel,
//! };
//!
//! let result = cylindrical_shell(&input).unwrap();
//! assert!(result.temperature_within_limit);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::materials::MaterialFamily;
use crate::request::{
    calculation_type, optional_f64, require_f64, to_output_map, InputMap, OutputMap,
};

use super::{family_or_default, resolve_inside_radius, Calculator};

/// Cycle count anchoring the cubic S-N approximation
const FATIGUE_REFERENCE_CYCLES: f64 = 1.0e6;

/// ASME VIII Division 2 calculator.
///
/// Operations: `cylindrical_shell`, `spherical_shell`, `fatigue_analysis`.
pub struct AsmeDiv2Calculator;

impl Calculator for AsmeDiv2Calculator {
    fn validate_inputs(&self, inputs: &InputMap) -> CalcResult<()> {
        match calculation_type(inputs)?.as_str() {
            "cylindrical_shell" | "spherical_shell" => Div2ShellInput::from_map(inputs)?.validate(),
            "fatigue_analysis" => FatigueAnalysisInput::from_map(inputs)?.validate(),
            other => Err(CalcError::unsupported_calculation_type(other)),
        }
    }

    fn calculate(&self, inputs: &InputMap) -> CalcResult<OutputMap> {
        match calculation_type(inputs)?.as_str() {
            "cylindrical_shell" => {
                to_output_map(&cylindrical_shell(&Div2ShellInput::from_map(inputs)?)?)
            }
            "spherical_shell" => {
                to_output_map(&spherical_shell(&Div2ShellInput::from_map(inputs)?)?)
            }
            "fatigue_analysis" => {
                to_output_map(&fatigue_analysis(&FatigueAnalysisInput::from_map(inputs)?)?)
            }
            other => Err(CalcError::unsupported_calculation_type(other)),
        }
    }
}

// ============================================================================
// Shells (Part 4.3, design-by-rule)
// ============================================================================

/// Input parameters for Division 2 shell thickness (cylindrical or spherical).
///
/// ## JSON Example
///
/// ```json
/// {
///   "calculation_type": "cylindrical_shell",
///   "design_pressure_psi": 150.0,
///   "inside_radius_in": 24.0,
///   "allowable_stress_psi": 20000.0,
///   "design_temperature_f": 650.0,
///   "material": "carbon_steel",
///   "corrosion_allowance_in": 0.125
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Div2ShellInput {
    /// Internal design pressure (psi)
    pub design_pressure_psi: f64,

    /// Inside radius (in); may be derived from `inside_diameter_in / 2`
    pub inside_radius_in: f64,

    /// Allowable stress S at design temperature (psi)
    pub allowable_stress_psi: f64,

    /// Joint efficiency E (0 < E <= 1)
    pub joint_efficiency: f64,

    /// Corrosion allowance (in)
    pub corrosion_allowance_in: f64,

    /// Design temperature (°F), checked against the material limit
    pub design_temperature_f: f64,

    /// Material family for the temperature limit lookup
    pub material: MaterialFamily,
}

impl Div2ShellInput {
    /// Build from the input mapping
    pub fn from_map(inputs: &InputMap) -> CalcResult<Self> {
        Ok(Div2ShellInput {
            design_pressure_psi: require_f64(inputs, "design_pressure_psi")?,
            inside_radius_in: resolve_inside_radius(inputs)?,
            allowable_stress_psi: require_f64(inputs, "allowable_stress_psi")?,
            joint_efficiency: optional_f64(inputs, "joint_efficiency")?.unwrap_or(1.0),
            corrosion_allowance_in: optional_f64(inputs, "corrosion_allowance_in")?.unwrap_or(0.0),
            design_temperature_f: require_f64(inputs, "design_temperature_f")?,
            material: family_or_default(inputs, "material")?,
        })
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if self.design_pressure_psi <= 0.0 {
            return Err(CalcError::invalid_value(
                "design_pressure_psi",
                self.design_pressure_psi.to_string(),
                "Design pressure must be positive",
            ));
        }
        if self.allowable_stress_psi <= 0.0 {
            return Err(CalcError::invalid_value(
                "allowable_stress_psi",
                self.allowable_stress_psi.to_string(),
                "Allowable stress must be positive",
            ));
        }
        if self.joint_efficiency <= 0.0 || self.joint_efficiency > 1.0 {
            return Err(CalcError::invalid_value(
                "joint_efficiency",
                self.joint_efficiency.to_string(),
                "Joint efficiency must be between 0 and 1",
            ));
        }
        if self.corrosion_allowance_in < 0.0 {
            return Err(CalcError::invalid_value(
                "corrosion_allowance_in",
                self.corrosion_allowance_in.to_string(),
                "Corrosion allowance cannot be negative",
            ));
        }
        Ok(())
    }
}

/// Results from Division 2 shell calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Div2ShellResult {
    /// Inside radius used (in)
    pub inside_radius_in: f64,

    /// Code-required thickness (in)
    pub required_thickness_in: f64,

    /// Required thickness plus corrosion allowance (in)
    pub minimum_thickness_in: f64,

    /// Stress margin carried by the furnished wall (minimum thickness)
    pub safety_factor: f64,

    /// Material temperature limit (°F)
    pub material_temperature_limit_f: f64,

    /// True when the design temperature is within the material limit
    pub temperature_within_limit: bool,
}

/// Calculate Division 2 cylindrical shell thickness: t = P*R / (S*E - 0.5*P).
pub fn cylindrical_shell(input: &Div2ShellInput) -> CalcResult<Div2ShellResult> {
    input.validate()?;

    let p = input.design_pressure_psi;
    let se = input.allowable_stress_psi * input.joint_efficiency;

    let denominator = se - 0.5 * p;
    if denominator <= 0.0 {
        return Err(CalcError::invalid_stress_condition(
            "cylindrical_shell",
            format!(
                "S*E - 0.5*P = {denominator:.1} psi; allowable stress is too low for the design pressure"
            ),
        ));
    }

    let required = p * input.inside_radius_in / denominator;
    let minimum = required + input.corrosion_allowance_in;
    let safety_factor = se / (p * (input.inside_radius_in / minimum + 0.5));

    Ok(shell_result(input, required, minimum, safety_factor))
}

/// Calculate Division 2 spherical shell thickness: t = P*R / (2*S*E - 0.5*P).
pub fn spherical_shell(input: &Div2ShellInput) -> CalcResult<Div2ShellResult> {
    input.validate()?;

    let p = input.design_pressure_psi;
    let se = input.allowable_stress_psi * input.joint_efficiency;

    let denominator = 2.0 * se - 0.5 * p;
    if denominator <= 0.0 {
        return Err(CalcError::invalid_stress_condition(
            "spherical_shell",
            format!(
                "2*S*E - 0.5*P = {denominator:.1} psi; allowable stress is too low for the design pressure"
            ),
        ));
    }

    let required = p * input.inside_radius_in / denominator;
    let minimum = required + input.corrosion_allowance_in;
    let safety_factor = 2.0 * se / (p * (input.inside_radius_in / minimum + 0.5));

    Ok(shell_result(input, required, minimum, safety_factor))
}

fn shell_result(
    input: &Div2ShellInput,
    required: f64,
    minimum: f64,
    safety_factor: f64,
) -> Div2ShellResult {
    let limit = input.material.properties().temperature_limit_f;
    Div2ShellResult {
        inside_radius_in: input.inside_radius_in,
        required_thickness_in: required,
        minimum_thickness_in: minimum,
        safety_factor,
        material_temperature_limit_f: limit,
        temperature_within_limit: input.design_temperature_f <= limit,
    }
}

// ============================================================================
// Fatigue Screening (Part 5, simplified)
// ============================================================================

/// Input parameters for the simplified fatigue screen.
///
/// `fatigue_strength_psi` overrides the material-family lookup when the
/// design stress report carries a grade-specific value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FatigueAnalysisInput {
    /// Alternating stress amplitude (psi)
    pub stress_amplitude_psi: f64,

    /// Material family for the fatigue-strength lookup
    pub material: MaterialFamily,

    /// Optional grade-specific fatigue strength override (psi)
    pub fatigue_strength_psi: Option<f64>,
}

impl FatigueAnalysisInput {
    /// Build from the input mapping
    pub fn from_map(inputs: &InputMap) -> CalcResult<Self> {
        Ok(FatigueAnalysisInput {
            stress_amplitude_psi: require_f64(inputs, "stress_amplitude_psi")?,
            material: family_or_default(inputs, "material")?,
            fatigue_strength_psi: optional_f64(inputs, "fatigue_strength_psi")?,
        })
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if self.stress_amplitude_psi <= 0.0 {
            return Err(CalcError::invalid_value(
                "stress_amplitude_psi",
                self.stress_amplitude_psi.to_string(),
                "Stress amplitude must be positive",
            ));
        }
        if let Some(strength) = self.fatigue_strength_psi {
            if strength <= 0.0 {
                return Err(CalcError::invalid_value(
                    "fatigue_strength_psi",
                    strength.to_string(),
                    "Fatigue strength must be positive",
                ));
            }
        }
        Ok(())
    }

    /// Fatigue strength used for screening: override or family lookup
    pub fn effective_fatigue_strength_psi(&self) -> f64 {
        self.fatigue_strength_psi
            .unwrap_or_else(|| self.material.properties().fatigue_strength_psi)
    }
}

/// Results from fatigue screening.
///
/// ## JSON Example
///
/// ```json
/// {
///   "fatigue_strength_psi": 13000.0,
///   "stress_ratio": 1.46,
///   "infinite_life": false,
///   "estimated_cycles": 320000.0
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FatigueAnalysisResult {
    /// Fatigue strength used for the screen (psi)
    pub fatigue_strength_psi: f64,

    /// Amplitude over fatigue strength
    pub stress_ratio: f64,

    /// True when the amplitude sits at or below the fatigue strength
    pub infinite_life: bool,

    /// Estimated cycles to failure; `null` for infinite life
    pub estimated_cycles: Option<f64>,
}

/// Screen the alternating stress against the fatigue strength.
///
/// Above the limit, life follows the cubic S-N approximation
/// `N = (fatigue_strength / amplitude)^3 * 10^6`.
pub fn fatigue_analysis(input: &FatigueAnalysisInput) -> CalcResult<FatigueAnalysisResult> {
    input.validate()?;

    let strength = input.effective_fatigue_strength_psi();
    let amplitude = input.stress_amplitude_psi;
    let stress_ratio = amplitude / strength;

    let (infinite_life, estimated_cycles) = if amplitude <= strength {
        (true, None)
    } else {
        (
            false,
            Some((strength / amplitude).powi(3) * FATIGUE_REFERENCE_CYCLES),
        )
    };

    Ok(FatigueAnalysisResult {
        fatigue_strength_psi: strength,
        stress_ratio,
        infinite_life,
        estimated_cycles,
    })
}
