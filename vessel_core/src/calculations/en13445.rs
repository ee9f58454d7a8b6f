//! # EN 13445 Calculator
//!
//! Unfired pressure vessel design per EN 13445-3, in the standard's native
//! metric units: pressure in MPa, lengths in mm, temperature in °C. The
//! nominal design stress `f` and the joint coefficient `z` play the roles
//! S and E play in the ASME formulas.
//!
//! ## Example
//!
//! ```rust
//! use vessel_core::calculations::en13445::{EnShellInput, cylindrical_shell};
//!
//! let input = EnShellInput {
//!     design_pressure_mpa: 1.0,
//!     inside_diameter_mm: 1200.0,
//!     nominal_design_stress_mpa: 138.0,
//!     joint_coefficient: 1.0,
//!     corrosion_allowance_mm: 3.0,
//! };
//!
//! let result = cylindrical_shell(&input).unwrap();
//! assert!(result.required_thickness_mm > 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::request::{
    calculation_type, optional_f64, require_f64, require_str, to_output_map, InputMap, OutputMap,
};

use super::{Calculator, HeadType};

/// EN 13445 calculator.
///
/// Operations: `cylindrical_shell`, `spherical_shell`, `head_thickness`.
pub struct En13445Calculator;

impl Calculator for En13445Calculator {
    fn validate_inputs(&self, inputs: &InputMap) -> CalcResult<()> {
        match calculation_type(inputs)?.as_str() {
            "cylindrical_shell" | "spherical_shell" => EnShellInput::from_map(inputs)?.validate(),
            "head_thickness" => EnHeadInput::from_map(inputs)?.validate(),
            other => Err(CalcError::unsupported_calculation_type(other)),
        }
    }

    fn calculate(&self, inputs: &InputMap) -> CalcResult<OutputMap> {
        match calculation_type(inputs)?.as_str() {
            "cylindrical_shell" => {
                to_output_map(&cylindrical_shell(&EnShellInput::from_map(inputs)?)?)
            }
            "spherical_shell" => to_output_map(&spherical_shell(&EnShellInput::from_map(inputs)?)?),
            "head_thickness" => to_output_map(&head_thickness(&EnHeadInput::from_map(inputs)?)?),
            other => Err(CalcError::unsupported_calculation_type(other)),
        }
    }
}

// ============================================================================
// Shells (EN 13445-3 clause 7)
// ============================================================================

/// Input parameters for EN 13445 shell thickness.
///
/// ## JSON Example
///
/// ```json
/// {
///   "calculation_type": "cylindrical_shell",
///   "design_pressure_mpa": 1.0,
///   "inside_diameter_mm": 1200.0,
///   "nominal_design_stress_mpa": 138.0,
///   "joint_coefficient": 1.0,
///   "corrosion_allowance_mm": 3.0
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnShellInput {
    /// Design pressure P (MPa)
    pub design_pressure_mpa: f64,

    /// Inside diameter D (mm)
    pub inside_diameter_mm: f64,

    /// Nominal design stress f (MPa)
    pub nominal_design_stress_mpa: f64,

    /// Joint coefficient z (0 < z <= 1)
    pub joint_coefficient: f64,

    /// Corrosion allowance c (mm)
    pub corrosion_allowance_mm: f64,
}

impl EnShellInput {
    /// Build from the input mapping
    pub fn from_map(inputs: &InputMap) -> CalcResult<Self> {
        Ok(EnShellInput {
            design_pressure_mpa: require_f64(inputs, "design_pressure_mpa")?,
            inside_diameter_mm: require_f64(inputs, "inside_diameter_mm")?,
            nominal_design_stress_mpa: require_f64(inputs, "nominal_design_stress_mpa")?,
            joint_coefficient: optional_f64(inputs, "joint_coefficient")?.unwrap_or(1.0),
            corrosion_allowance_mm: optional_f64(inputs, "corrosion_allowance_mm")?.unwrap_or(0.0),
        })
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if self.design_pressure_mpa <= 0.0 {
            return Err(CalcError::invalid_value(
                "design_pressure_mpa",
                self.design_pressure_mpa.to_string(),
                "Design pressure must be positive",
            ));
        }
        if self.inside_diameter_mm <= 0.0 {
            return Err(CalcError::invalid_value(
                "inside_diameter_mm",
                self.inside_diameter_mm.to_string(),
                "Diameter must be positive",
            ));
        }
        if self.nominal_design_stress_mpa <= 0.0 {
            return Err(CalcError::invalid_value(
                "nominal_design_stress_mpa",
                self.nominal_design_stress_mpa.to_string(),
                "Nominal design stress must be positive",
            ));
        }
        if self.joint_coefficient <= 0.0 || self.joint_coefficient > 1.0 {
            return Err(CalcError::invalid_value(
                "joint_coefficient",
                self.joint_coefficient.to_string(),
                "Joint coefficient must be between 0 and 1",
            ));
        }
        if self.corrosion_allowance_mm < 0.0 {
            return Err(CalcError::invalid_value(
                "corrosion_allowance_mm",
                self.corrosion_allowance_mm.to_string(),
                "Corrosion allowance cannot be negative",
            ));
        }
        Ok(())
    }
}

/// Results from EN 13445 shell calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnShellResult {
    /// Required wall thickness e from the pressure formula (mm)
    pub required_thickness_mm: f64,

    /// Required thickness plus corrosion allowance (mm)
    pub minimum_thickness_mm: f64,
}

/// Calculate EN 13445 cylindrical shell thickness: e = P*D / (2*f*z - P).
pub fn cylindrical_shell(input: &EnShellInput) -> CalcResult<EnShellResult> {
    input.validate()?;
    shell_thickness(input, 2.0, "cylindrical_shell")
}

/// Calculate EN 13445 spherical shell thickness: e = P*D / (4*f*z - P).
pub fn spherical_shell(input: &EnShellInput) -> CalcResult<EnShellResult> {
    input.validate()?;
    shell_thickness(input, 4.0, "spherical_shell")
}

fn shell_thickness(
    input: &EnShellInput,
    stress_multiplier: f64,
    operation: &str,
) -> CalcResult<EnShellResult> {
    let p = input.design_pressure_mpa;
    let fz = input.nominal_design_stress_mpa * input.joint_coefficient;

    let denominator = stress_multiplier * fz - p;
    if denominator <= 0.0 {
        return Err(CalcError::invalid_stress_condition(
            operation,
            format!(
                "{stress_multiplier}*f*z - P = {denominator:.2} MPa; design stress is too low for the design pressure"
            ),
        ));
    }

    let required = p * input.inside_diameter_mm / denominator;
    Ok(EnShellResult {
        required_thickness_mm: required,
        minimum_thickness_mm: required + input.corrosion_allowance_mm,
    })
}

// ============================================================================
// Dished Ends (EN 13445-3 clause 7.5, simplified)
// ============================================================================

/// Input parameters for EN 13445 dished-end thickness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnHeadInput {
    /// Design pressure P (MPa)
    pub design_pressure_mpa: f64,

    /// Inside diameter D (mm)
    pub inside_diameter_mm: f64,

    /// Nominal design stress f (MPa)
    pub nominal_design_stress_mpa: f64,

    /// Joint coefficient z (0 < z <= 1)
    pub joint_coefficient: f64,

    /// Corrosion allowance c (mm)
    pub corrosion_allowance_mm: f64,

    /// End geometry
    pub head_type: HeadType,
}

impl EnHeadInput {
    /// Build from the input mapping
    pub fn from_map(inputs: &InputMap) -> CalcResult<Self> {
        Ok(EnHeadInput {
            design_pressure_mpa: require_f64(inputs, "design_pressure_mpa")?,
            inside_diameter_mm: require_f64(inputs, "inside_diameter_mm")?,
            nominal_design_stress_mpa: require_f64(inputs, "nominal_design_stress_mpa")?,
            joint_coefficient: optional_f64(inputs, "joint_coefficient")?.unwrap_or(1.0),
            corrosion_allowance_mm: optional_f64(inputs, "corrosion_allowance_mm")?.unwrap_or(0.0),
            head_type: HeadType::from_str_flexible(&require_str(inputs, "head_type")?)?,
        })
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        EnShellInput {
            design_pressure_mpa: self.design_pressure_mpa,
            inside_diameter_mm: self.inside_diameter_mm,
            nominal_design_stress_mpa: self.nominal_design_stress_mpa,
            joint_coefficient: self.joint_coefficient,
            corrosion_allowance_mm: self.corrosion_allowance_mm,
        }
        .validate()
    }

    /// Shape factor beta for the selected end geometry
    pub fn beta_factor(&self) -> f64 {
        match self.head_type {
            HeadType::Ellipsoidal => 1.0,
            HeadType::Torispherical => 1.77,
            HeadType::Hemispherical => 0.5,
        }
    }
}

/// Results from EN 13445 dished-end calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnHeadResult {
    /// End geometry used
    pub head_type: HeadType,

    /// Shape factor beta applied to the formula
    pub beta_factor: f64,

    /// Required wall thickness e = beta*P*D / (2*f*z - P) (mm)
    pub required_thickness_mm: f64,

    /// Required thickness plus corrosion allowance (mm)
    pub minimum_thickness_mm: f64,
}

/// Calculate EN 13445 dished-end thickness.
pub fn head_thickness(input: &EnHeadInput) -> CalcResult<EnHeadResult> {
    input.validate()?;

    let p = input.design_pressure_mpa;
    let fz = input.nominal_design_stress_mpa * input.joint_coefficient;

    let denominator = 2.0 * fz - p;
    if denominator <= 0.0 {
        return Err(CalcError::invalid_stress_condition(
            "head_thickness",
            format!(
                "2*f*z - P = {denominator:.2} MPa; design stress is too low for the design pressure"
            ),
        ));
    }

    let beta = input.beta_factor();
    let required = beta * p * input.inside_diameter_mm / denominator;

    Ok(EnHeadResult {
        head_type: input.head_type,
        beta_factor: beta,
        required_thickness_mm: required,
        minimum_thickness_mm: required + input.corrosion_allowance_mm,
    })
}
