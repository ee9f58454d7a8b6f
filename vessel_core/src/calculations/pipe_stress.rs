//! # Pipe Stress Calculator
//!
//! Rule-of-thumb piping checks per B31-style practice: restrained thermal
//! expansion, pressure (hoop and longitudinal) stress, and beam-theory
//! support spacing. These are screening calculations for line sizing and
//! support layout, not a flexibility analysis.
//!
//! ## Example
//!
//! ```rust
//! use vessel_core::calculations::pipe_stress::{PressureStressInput, pressure_stress};
//!
//! let input = PressureStressInput {
//!     design_pressure_psi: 300.0,
//!     outside_diameter_in: 6.625,
//!     wall_thickness_in: 0.280,
//!     allowable_stress_psi: 20000.0,
//!     joint_efficiency: 1.0,
//!     design_temperature_f: 200.0,
//! };
//!
//! let result = pressure_stress(&input).unwrap();
//! assert!(result.adequate);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::materials::MaterialFamily;
use crate::request::{
    calculation_type, optional_f64, require_f64, require_positive, to_output_map, InputMap,
    OutputMap,
};

use super::{family_or_default, Calculator};
use crate::calculations::material_property::derating_factor;

/// Rule-of-thumb growth above which a flexibility analysis is warranted (in)
const FLEXIBILITY_THRESHOLD_IN: f64 = 1.0;

/// Recommended spans keep a margin below the bending-limited maximum
const SPACING_MARGIN: f64 = 0.8;

/// Pipe stress calculator.
///
/// Operations: `thermal_expansion`, `pressure_stress`, `support_spacing`.
pub struct PipeStressCalculator;

impl Calculator for PipeStressCalculator {
    fn validate_inputs(&self, inputs: &InputMap) -> CalcResult<()> {
        match calculation_type(inputs)?.as_str() {
            "thermal_expansion" => ThermalExpansionInput::from_map(inputs)?.validate(),
            "pressure_stress" => PressureStressInput::from_map(inputs)?.validate(),
            "support_spacing" => SupportSpacingInput::from_map(inputs)?.validate(),
            other => Err(CalcError::unsupported_calculation_type(other)),
        }
    }

    fn calculate(&self, inputs: &InputMap) -> CalcResult<OutputMap> {
        match calculation_type(inputs)?.as_str() {
            "thermal_expansion" => {
                to_output_map(&thermal_expansion(&ThermalExpansionInput::from_map(inputs)?)?)
            }
            "pressure_stress" => {
                to_output_map(&pressure_stress(&PressureStressInput::from_map(inputs)?)?)
            }
            "support_spacing" => {
                to_output_map(&support_spacing(&SupportSpacingInput::from_map(inputs)?)?)
            }
            other => Err(CalcError::unsupported_calculation_type(other)),
        }
    }
}

// ============================================================================
// Thermal Expansion
// ============================================================================

/// Input parameters for restrained thermal expansion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThermalExpansionInput {
    /// Run length between anchors (ft)
    pub pipe_length_ft: f64,

    /// Installation (cold) temperature (°F)
    pub installation_temperature_f: f64,

    /// Operating (hot) temperature (°F)
    pub operating_temperature_f: f64,

    /// Material family for expansion coefficient and modulus
    pub material: MaterialFamily,
}

impl ThermalExpansionInput {
    /// Build from the input mapping
    pub fn from_map(inputs: &InputMap) -> CalcResult<Self> {
        Ok(ThermalExpansionInput {
            pipe_length_ft: require_positive(inputs, "pipe_length_ft")?,
            installation_temperature_f: require_f64(inputs, "installation_temperature_f")?,
            operating_temperature_f: require_f64(inputs, "operating_temperature_f")?,
            material: family_or_default(inputs, "material")?,
        })
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if self.pipe_length_ft <= 0.0 {
            return Err(CalcError::invalid_value(
                "pipe_length_ft",
                self.pipe_length_ft.to_string(),
                "Pipe length must be positive",
            ));
        }
        Ok(())
    }

    /// Temperature rise from installation to operation (°F, signed)
    pub fn delta_t_f(&self) -> f64 {
        self.operating_temperature_f - self.installation_temperature_f
    }
}

/// Results from thermal expansion calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThermalExpansionResult {
    /// Temperature change used (°F, signed)
    pub delta_t_f: f64,

    /// Free thermal growth of the run dL = L*alpha*dT (in, signed)
    pub thermal_growth_in: f64,

    /// Fully-restrained expansion stress E*alpha*dT (psi, magnitude)
    pub expansion_stress_psi: f64,

    /// True when growth exceeds the rule-of-thumb threshold and the run
    /// needs a loop, offset, or joint
    pub flexibility_required: bool,
}

/// Calculate thermal growth and the fully-restrained expansion stress.
pub fn thermal_expansion(input: &ThermalExpansionInput) -> CalcResult<ThermalExpansionResult> {
    input.validate()?;

    let props = input.material.properties();
    let delta_t = input.delta_t_f();

    let growth_in = input.pipe_length_ft * 12.0 * props.thermal_expansion_per_f * delta_t;
    let expansion_stress = (props.elastic_modulus_psi * props.thermal_expansion_per_f * delta_t).abs();

    Ok(ThermalExpansionResult {
        delta_t_f: delta_t,
        thermal_growth_in: growth_in,
        expansion_stress_psi: expansion_stress,
        flexibility_required: growth_in.abs() > FLEXIBILITY_THRESHOLD_IN,
    })
}

// ============================================================================
// Pressure Stress
// ============================================================================

/// Input parameters for hoop and longitudinal pressure stress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PressureStressInput {
    /// Internal design pressure (psi)
    pub design_pressure_psi: f64,

    /// Outside diameter Do (in)
    pub outside_diameter_in: f64,

    /// Wall thickness t (in)
    pub wall_thickness_in: f64,

    /// Allowable stress S at ambient temperature (psi)
    pub allowable_stress_psi: f64,

    /// Joint efficiency E (0 < E <= 1)
    pub joint_efficiency: f64,

    /// Design temperature (°F) for the derating factor
    pub design_temperature_f: f64,
}

impl PressureStressInput {
    /// Build from the input mapping
    pub fn from_map(inputs: &InputMap) -> CalcResult<Self> {
        Ok(PressureStressInput {
            design_pressure_psi: require_f64(inputs, "design_pressure_psi")?,
            outside_diameter_in: require_f64(inputs, "outside_diameter_in")?,
            wall_thickness_in: require_f64(inputs, "wall_thickness_in")?,
            allowable_stress_psi: require_f64(inputs, "allowable_stress_psi")?,
            joint_efficiency: optional_f64(inputs, "joint_efficiency")?.unwrap_or(1.0),
            design_temperature_f: optional_f64(inputs, "design_temperature_f")?.unwrap_or(100.0),
        })
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        for (field, value) in [
            ("design_pressure_psi", self.design_pressure_psi),
            ("outside_diameter_in", self.outside_diameter_in),
            ("wall_thickness_in", self.wall_thickness_in),
            ("allowable_stress_psi", self.allowable_stress_psi),
        ] {
            if value <= 0.0 {
                return Err(CalcError::invalid_value(
                    field,
                    value.to_string(),
                    "Value must be positive",
                ));
            }
        }
        if self.joint_efficiency <= 0.0 || self.joint_efficiency > 1.0 {
            return Err(CalcError::invalid_value(
                "joint_efficiency",
                self.joint_efficiency.to_string(),
                "Joint efficiency must be between 0 and 1",
            ));
        }
        if self.wall_thickness_in >= self.outside_diameter_in / 2.0 {
            return Err(CalcError::invalid_value(
                "wall_thickness_in",
                self.wall_thickness_in.to_string(),
                "Wall thickness must be less than half the outside diameter",
            ));
        }
        Ok(())
    }
}

/// Results from pressure stress calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PressureStressResult {
    /// Hoop stress P*Do/(2*t) (psi)
    pub hoop_stress_psi: f64,

    /// Longitudinal stress, half the hoop stress (psi)
    pub longitudinal_stress_psi: f64,

    /// Temperature derating factor applied to the allowable
    pub derating_factor: f64,

    /// Derated allowable S*E*derating (psi)
    pub allowable_stress_psi: f64,

    /// True when the hoop stress is within the derated allowable
    pub adequate: bool,
}

/// Calculate hoop and longitudinal pressure stress against the derated allowable.
pub fn pressure_stress(input: &PressureStressInput) -> CalcResult<PressureStressResult> {
    input.validate()?;

    let hoop =
        input.design_pressure_psi * input.outside_diameter_in / (2.0 * input.wall_thickness_in);
    let longitudinal = hoop / 2.0;

    let derating = derating_factor(input.design_temperature_f);
    let allowable = input.allowable_stress_psi * input.joint_efficiency * derating;

    Ok(PressureStressResult {
        hoop_stress_psi: hoop,
        longitudinal_stress_psi: longitudinal,
        derating_factor: derating,
        allowable_stress_psi: allowable,
        adequate: hoop <= allowable,
    })
}

// ============================================================================
// Support Spacing
// ============================================================================

/// Input parameters for bending-limited support spacing.
///
/// Weights are per-foot contributions; the fluid and insulation terms
/// default to zero for empty uninsulated lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportSpacingInput {
    /// Outside diameter Do (in)
    pub outside_diameter_in: f64,

    /// Wall thickness t (in)
    pub wall_thickness_in: f64,

    /// Pipe weight per foot (lb/ft)
    pub pipe_weight_plf: f64,

    /// Fluid weight per foot (lb/ft)
    pub fluid_weight_plf: f64,

    /// Insulation weight per foot (lb/ft)
    pub insulation_weight_plf: f64,

    /// Allowable bending stress (psi)
    pub allowable_stress_psi: f64,
}

impl SupportSpacingInput {
    /// Build from the input mapping
    pub fn from_map(inputs: &InputMap) -> CalcResult<Self> {
        Ok(SupportSpacingInput {
            outside_diameter_in: require_f64(inputs, "outside_diameter_in")?,
            wall_thickness_in: require_f64(inputs, "wall_thickness_in")?,
            pipe_weight_plf: require_f64(inputs, "pipe_weight_plf")?,
            fluid_weight_plf: optional_f64(inputs, "fluid_weight_plf")?.unwrap_or(0.0),
            insulation_weight_plf: optional_f64(inputs, "insulation_weight_plf")?.unwrap_or(0.0),
            allowable_stress_psi: require_f64(inputs, "allowable_stress_psi")?,
        })
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        for (field, value) in [
            ("outside_diameter_in", self.outside_diameter_in),
            ("wall_thickness_in", self.wall_thickness_in),
            ("pipe_weight_plf", self.pipe_weight_plf),
            ("allowable_stress_psi", self.allowable_stress_psi),
        ] {
            if value <= 0.0 {
                return Err(CalcError::invalid_value(
                    field,
                    value.to_string(),
                    "Value must be positive",
                ));
            }
        }
        for (field, value) in [
            ("fluid_weight_plf", self.fluid_weight_plf),
            ("insulation_weight_plf", self.insulation_weight_plf),
        ] {
            if value < 0.0 {
                return Err(CalcError::invalid_value(
                    field,
                    value.to_string(),
                    "Value cannot be negative",
                ));
            }
        }
        if self.wall_thickness_in >= self.outside_diameter_in / 2.0 {
            return Err(CalcError::invalid_value(
                "wall_thickness_in",
                self.wall_thickness_in.to_string(),
                "Wall thickness must be less than half the outside diameter",
            ));
        }
        Ok(())
    }

    /// Combined weight per foot w (lb/ft)
    pub fn total_weight_plf(&self) -> f64 {
        self.pipe_weight_plf + self.fluid_weight_plf + self.insulation_weight_plf
    }

    /// Section moment of inertia I = pi*(Do^4 - Di^4)/64 (in^4)
    pub fn moment_of_inertia_in4(&self) -> f64 {
        let inside_diameter = self.outside_diameter_in - 2.0 * self.wall_thickness_in;
        std::f64::consts::PI
            * (self.outside_diameter_in.powi(4) - inside_diameter.powi(4))
            / 64.0
    }

    /// Section modulus Z = 2*I/Do (in^3)
    pub fn section_modulus_in3(&self) -> f64 {
        2.0 * self.moment_of_inertia_in4() / self.outside_diameter_in
    }
}

/// Results from support spacing calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportSpacingResult {
    /// Combined pipe + fluid + insulation weight (lb/ft)
    pub total_weight_plf: f64,

    /// Section moment of inertia (in^4)
    pub moment_of_inertia_in4: f64,

    /// Section modulus (in^3)
    pub section_modulus_in3: f64,

    /// Bending-limited maximum span (ft)
    pub maximum_spacing_ft: f64,

    /// Recommended span, 0.8 of the maximum (ft)
    pub recommended_spacing_ft: f64,
}

/// Calculate the bending-limited support span.
///
/// Simple-span bending with M = w*L²/8 and stress = 12*M/Z psi gives
/// `L_max = sqrt(2*S*Z / (3*w))` with L in ft, w in lb/ft, Z in in³.
pub fn support_spacing(input: &SupportSpacingInput) -> CalcResult<SupportSpacingResult> {
    input.validate()?;

    let weight = input.total_weight_plf();
    let inertia = input.moment_of_inertia_in4();
    let modulus = input.section_modulus_in3();

    let maximum = (2.0 * input.allowable_stress_psi * modulus / (3.0 * weight)).sqrt();
    let recommended = SPACING_MARGIN * maximum;

    Ok(SupportSpacingResult {
        total_weight_plf: weight,
        moment_of_inertia_in4: inertia,
        section_modulus_in3: modulus,
        maximum_spacing_ft: maximum,
        recommended_spacing_ft: recommended,
    })
}
