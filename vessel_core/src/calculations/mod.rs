//! # Design-Code Calculations
//!
//! This module contains all calculator variants. Each calculation operation
//! follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable), built from the input
//!   mapping with [`from_map`](AsmeDiv1Calculator) constructors
//! - `*Result` - Calculation results (JSON-serializable)
//! - `fn <operation>(input) -> Result<*Result, CalcError>` - Pure calculation
//!
//! Every calculator implements the uniform [`Calculator`] capability and
//! dispatches internally on the `calculation_type` key of the input mapping.
//! Calculators hold no state: identical input mappings always produce
//! identical output mappings, which is what makes the results auditable and
//! reproducible for regulatory review.
//!
//! ## Available Calculators
//!
//! - [`asme_div1`] - ASME Section VIII Division 1 shells, heads, external
//!   pressure, nozzle reinforcement
//! - [`asme_div2`] - ASME Section VIII Division 2 shells and fatigue screening
//! - [`en13445`] - EN 13445 shells and heads (metric)
//! - [`general_vessel`] - Wind load, seismic load, simplified fitness-for-service
//! - [`pipe_stress`] - Thermal expansion, pressure stress, support spacing
//! - [`material_property`] - Allowable stress, derating, joint efficiency
//! - [`safety_factor`] - Pressure safety ratios, fatigue life
//! - [`api579`] - API 579 fitness-for-service screening

pub mod api579;
pub mod asme_div1;
pub mod asme_div2;
pub mod en13445;
pub mod general_vessel;
pub mod material_property;
pub mod pipe_stress;
pub mod safety_factor;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::request::{optional_f64, optional_str, InputMap, OutputMap};

// Re-export calculator entry points
pub use api579::Api579Calculator;
pub use asme_div1::AsmeDiv1Calculator;
pub use asme_div2::AsmeDiv2Calculator;
pub use en13445::En13445Calculator;
pub use general_vessel::GeneralVesselCalculator;
pub use material_property::MaterialPropertyCalculator;
pub use pipe_stress::PipeStressCalculator;
pub use safety_factor::SafetyFactorCalculator;

/// The uniform two-operation capability every calculator variant exposes.
///
/// `validate_inputs` fails with a validation error naming the first
/// offending field without computing anything; `calculate` runs the
/// operation selected by the `calculation_type` key and returns the
/// complete output mapping. Both fail with
/// [`CalcError::UnsupportedCalculationType`] for an unrecognized operation.
pub trait Calculator {
    /// Validate the input mapping for the selected operation
    fn validate_inputs(&self, inputs: &InputMap) -> CalcResult<()>;

    /// Run the selected operation and produce the output mapping
    fn calculate(&self, inputs: &InputMap) -> CalcResult<OutputMap>;
}

/// Vessel head geometries shared by the ASME and EN head-thickness operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadType {
    /// 2:1 semi-elliptical (or custom aspect ratio)
    Ellipsoidal,
    /// Torispherical (flanged and dished)
    Torispherical,
    /// Hemispherical
    Hemispherical,
}

impl HeadType {
    /// All head type variants
    pub const ALL: [HeadType; 3] = [
        HeadType::Ellipsoidal,
        HeadType::Torispherical,
        HeadType::Hemispherical,
    ];

    /// Get the snake_case code used in input mappings
    pub fn code(&self) -> &'static str {
        match self {
            HeadType::Ellipsoidal => "ellipsoidal",
            HeadType::Torispherical => "torispherical",
            HeadType::Hemispherical => "hemispherical",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "ellipsoidal" | "elliptical" | "semi_elliptical" | "2:1" => Ok(HeadType::Ellipsoidal),
            "torispherical" | "flanged_and_dished" | "f&d" => Ok(HeadType::Torispherical),
            "hemispherical" | "hemi" => Ok(HeadType::Hemispherical),
            _ => Err(CalcError::invalid_value(
                "head_type",
                s,
                "Expected ellipsoidal, torispherical, or hemispherical",
            )),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            HeadType::Ellipsoidal => "Ellipsoidal (2:1)",
            HeadType::Torispherical => "Torispherical",
            HeadType::Hemispherical => "Hemispherical",
        }
    }
}

impl std::fmt::Display for HeadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Resolve the inside radius from `inside_radius_in`, falling back to
/// `inside_diameter_in / 2`. Fails with `MissingField` when neither is
/// supplied positive.
pub(crate) fn resolve_inside_radius(inputs: &InputMap) -> CalcResult<f64> {
    if let Some(radius) = optional_f64(inputs, "inside_radius_in")? {
        if radius > 0.0 {
            return Ok(radius);
        }
    }
    if let Some(diameter) = optional_f64(inputs, "inside_diameter_in")? {
        if diameter > 0.0 {
            return Ok(diameter / 2.0);
        }
    }
    Err(CalcError::missing_field("inside_radius_in"))
}

/// Read an optional material-family field, defaulting to carbon steel
pub(crate) fn family_or_default(
    inputs: &InputMap,
    field: &str,
) -> CalcResult<crate::materials::MaterialFamily> {
    match optional_str(inputs, field)? {
        Some(name) => crate::materials::MaterialFamily::from_str_flexible(&name),
        None => Ok(crate::materials::MaterialFamily::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_head_type_parsing() {
        assert_eq!(
            HeadType::from_str_flexible("Semi-Elliptical").unwrap(),
            HeadType::Ellipsoidal
        );
        assert_eq!(
            HeadType::from_str_flexible("F&D").unwrap(),
            HeadType::Torispherical
        );
        assert!(HeadType::from_str_flexible("flat").is_err());
    }

    #[test]
    fn test_head_type_codes_roundtrip() {
        for head in HeadType::ALL {
            assert_eq!(HeadType::from_str_flexible(head.code()).unwrap(), head);
        }
    }

    #[test]
    fn test_resolve_inside_radius() {
        let from_radius = json!({ "inside_radius_in": 24.0 }).as_object().unwrap().clone();
        assert_eq!(resolve_inside_radius(&from_radius).unwrap(), 24.0);

        let from_diameter = json!({ "inside_diameter_in": 48.0 }).as_object().unwrap().clone();
        assert_eq!(resolve_inside_radius(&from_diameter).unwrap(), 24.0);

        // Radius wins when both are present
        let both = json!({ "inside_radius_in": 30.0, "inside_diameter_in": 48.0 })
            .as_object()
            .unwrap()
            .clone();
        assert_eq!(resolve_inside_radius(&both).unwrap(), 30.0);

        // Neither positive -> MissingField
        let neither = json!({ "inside_radius_in": -24.0 }).as_object().unwrap().clone();
        let err = resolve_inside_radius(&neither).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_FIELD");
    }

    #[test]
    fn test_family_or_default() {
        let named = json!({ "material": "stainless steel" }).as_object().unwrap().clone();
        assert_eq!(
            family_or_default(&named, "material").unwrap(),
            crate::materials::MaterialFamily::StainlessSteel
        );

        let empty = InputMap::new();
        assert_eq!(
            family_or_default(&empty, "material").unwrap(),
            crate::materials::MaterialFamily::CarbonSteel
        );
    }
}
