//! # API 579 Fitness-for-Service Calculator
//!
//! Level 1/2 screening assessments for in-service degradation: general
//! metal loss, local metal loss, and pitting damage. Each assessment
//! reduces field inspection data to a rating on a totally ordered scale;
//! a thinner wall or a denser damage pattern never rates better, all else
//! equal.
//!
//! ## Example
//!
//! ```rust
//! use vessel_core::calculations::api579::{GeneralMetalLossInput, general_metal_loss};
//!
//! let input = GeneralMetalLossInput {
//!     original_thickness_in: 0.375,
//!     current_thickness_in: 0.250,
//!     corrosion_rate_in_per_yr: 0.005,
//!     design_pressure_psi: 150.0,
//!     inside_radius_in: 30.0,
//!     allowable_stress_psi: 20000.0,
//!     joint_efficiency: 1.0,
//! };
//!
//! let result = general_metal_loss(&input).unwrap();
//! assert!((result.thickness_ratio - 0.667).abs() < 0.001);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::request::{
    calculation_type, optional_f64, require_f64, require_non_negative, require_positive,
    to_output_map, InputMap, OutputMap,
};

use super::{resolve_inside_radius, Calculator};

/// Thickness ratio at or above which general metal loss is Level 1 acceptable
const GML_ACCEPT_RATIO: f64 = 0.90;

/// Thickness ratio at or above which general metal loss only needs monitoring
const GML_MONITOR_RATIO: f64 = 0.80;

/// Footprint ratio limits for local metal loss screening
const LML_ACCEPT_RATIO: f64 = 0.10;
const LML_MONITOR_RATIO: f64 = 0.25;

/// Pit depth/spacing screening limits
const PIT_ACCEPT_DEPTH: f64 = 0.25;
const PIT_MONITOR_DEPTH: f64 = 0.50;
const PIT_ACCEPT_SPACING: f64 = 3.0;
const PIT_MONITOR_SPACING: f64 = 1.5;

/// API 579 calculator.
///
/// Operations: `general_metal_loss`, `local_metal_loss`, `pitting_damage`.
pub struct Api579Calculator;

impl Calculator for Api579Calculator {
    fn validate_inputs(&self, inputs: &InputMap) -> CalcResult<()> {
        match calculation_type(inputs)?.as_str() {
            "general_metal_loss" => GeneralMetalLossInput::from_map(inputs)?.validate(),
            "local_metal_loss" => LocalMetalLossInput::from_map(inputs)?.validate(),
            "pitting_damage" => PittingDamageInput::from_map(inputs)?.validate(),
            other => Err(CalcError::unsupported_calculation_type(other)),
        }
    }

    fn calculate(&self, inputs: &InputMap) -> CalcResult<OutputMap> {
        match calculation_type(inputs)?.as_str() {
            "general_metal_loss" => {
                to_output_map(&general_metal_loss(&GeneralMetalLossInput::from_map(inputs)?)?)
            }
            "local_metal_loss" => {
                to_output_map(&local_metal_loss(&LocalMetalLossInput::from_map(inputs)?)?)
            }
            "pitting_damage" => {
                to_output_map(&pitting_damage(&PittingDamageInput::from_map(inputs)?)?)
            }
            other => Err(CalcError::unsupported_calculation_type(other)),
        }
    }
}

// ============================================================================
// Ratings
// ============================================================================

/// Four-level general metal loss rating, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetalLossRating {
    /// Level 1 screen passed; continue operation
    Level1Acceptable,
    /// Level 1 passed with reduced margin; shorten inspection intervals
    Level1Monitor,
    /// Level 1 screen failed; run a Level 2 assessment
    Level2DetailedAssessment,
    /// Wall below the required minimum; act before continued operation
    Level2ImmediateAction,
}

impl MetalLossRating {
    /// All rating variants, best first
    pub const ALL: [MetalLossRating; 4] = [
        MetalLossRating::Level1Acceptable,
        MetalLossRating::Level1Monitor,
        MetalLossRating::Level2DetailedAssessment,
        MetalLossRating::Level2ImmediateAction,
    ];

    /// Severity rank: 0 (acceptable) through 3 (immediate action)
    pub fn severity(&self) -> u8 {
        match self {
            MetalLossRating::Level1Acceptable => 0,
            MetalLossRating::Level1Monitor => 1,
            MetalLossRating::Level2DetailedAssessment => 2,
            MetalLossRating::Level2ImmediateAction => 3,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            MetalLossRating::Level1Acceptable => "Level 1 - Acceptable",
            MetalLossRating::Level1Monitor => "Level 1 - Monitor",
            MetalLossRating::Level2DetailedAssessment => "Level 2 - Detailed Assessment Required",
            MetalLossRating::Level2ImmediateAction => "Level 2 - Immediate Action",
        }
    }
}

impl std::fmt::Display for MetalLossRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Three-level screening rating shared by the local metal loss and
/// pitting assessments, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreeningRating {
    /// Damage within screening limits
    Acceptable,
    /// Within limits with reduced margin; track growth
    Monitor,
    /// Screening limits exceeded; run a detailed assessment
    DetailedAssessmentRequired,
}

impl ScreeningRating {
    /// All rating variants, best first
    pub const ALL: [ScreeningRating; 3] = [
        ScreeningRating::Acceptable,
        ScreeningRating::Monitor,
        ScreeningRating::DetailedAssessmentRequired,
    ];

    /// Severity rank: 0 (acceptable) through 2 (detailed assessment)
    pub fn severity(&self) -> u8 {
        match self {
            ScreeningRating::Acceptable => 0,
            ScreeningRating::Monitor => 1,
            ScreeningRating::DetailedAssessmentRequired => 2,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            ScreeningRating::Acceptable => "Acceptable",
            ScreeningRating::Monitor => "Monitor",
            ScreeningRating::DetailedAssessmentRequired => "Detailed Assessment Required",
        }
    }
}

impl std::fmt::Display for ScreeningRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// General Metal Loss (Part 4)
// ============================================================================

/// Input parameters for the general metal loss assessment.
///
/// ## JSON Example
///
/// ```json
/// {
///   "calculation_type": "general_metal_loss",
///   "original_thickness_in": 0.375,
///   "current_thickness_in": 0.250,
///   "corrosion_rate_in_per_yr": 0.005,
///   "design_pressure_psi": 150.0,
///   "inside_radius_in": 30.0,
///   "allowable_stress_psi": 20000.0
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralMetalLossInput {
    /// Nominal wall thickness at construction (in)
    pub original_thickness_in: f64,

    /// Measured current wall thickness (in)
    pub current_thickness_in: f64,

    /// Measured corrosion rate (in/yr)
    pub corrosion_rate_in_per_yr: f64,

    /// Design pressure for the required-thickness formula (psi)
    pub design_pressure_psi: f64,

    /// Inside radius (in); may be derived from `inside_diameter_in / 2`
    pub inside_radius_in: f64,

    /// Allowable stress S at design temperature (psi)
    pub allowable_stress_psi: f64,

    /// Joint efficiency E (0 < E <= 1)
    pub joint_efficiency: f64,
}

impl GeneralMetalLossInput {
    /// Build from the input mapping
    pub fn from_map(inputs: &InputMap) -> CalcResult<Self> {
        Ok(GeneralMetalLossInput {
            original_thickness_in: require_f64(inputs, "original_thickness_in")?,
            current_thickness_in: require_f64(inputs, "current_thickness_in")?,
            corrosion_rate_in_per_yr: require_f64(inputs, "corrosion_rate_in_per_yr")?,
            design_pressure_psi: require_f64(inputs, "design_pressure_psi")?,
            inside_radius_in: resolve_inside_radius(inputs)?,
            allowable_stress_psi: require_f64(inputs, "allowable_stress_psi")?,
            joint_efficiency: optional_f64(inputs, "joint_efficiency")?.unwrap_or(1.0),
        })
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        for (field, value) in [
            ("original_thickness_in", self.original_thickness_in),
            ("current_thickness_in", self.current_thickness_in),
            ("corrosion_rate_in_per_yr", self.corrosion_rate_in_per_yr),
            ("design_pressure_psi", self.design_pressure_psi),
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
        if self.current_thickness_in > self.original_thickness_in {
            return Err(CalcError::invalid_value(
                "current_thickness_in",
                self.current_thickness_in.to_string(),
                "Current thickness cannot exceed the original thickness",
            ));
        }
        if self.joint_efficiency <= 0.0 || self.joint_efficiency > 1.0 {
            return Err(CalcError::invalid_value(
                "joint_efficiency",
                self.joint_efficiency.to_string(),
                "Joint efficiency must be between 0 and 1",
            ));
        }
        Ok(())
    }
}

/// Results from the general metal loss assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralMetalLossResult {
    /// Current over original thickness
    pub thickness_ratio: f64,

    /// Minimum required thickness from the Division 1 cylindrical formula (in)
    pub minimum_required_thickness_in: f64,

    /// Maximum allowable working pressure at the current thickness (psi)
    pub mawp_psi: f64,

    /// Linear projection of remaining life at the measured rate (yr)
    pub remaining_life_yr: f64,

    /// Assessment rating
    pub rating: MetalLossRating,
}

/// Assess general (uniform) metal loss.
pub fn general_metal_loss(input: &GeneralMetalLossInput) -> CalcResult<GeneralMetalLossResult> {
    input.validate()?;

    let p = input.design_pressure_psi;
    let r = input.inside_radius_in;
    let se = input.allowable_stress_psi * input.joint_efficiency;

    let denominator = se - 0.6 * p;
    if denominator <= 0.0 {
        return Err(CalcError::invalid_stress_condition(
            "general_metal_loss",
            format!(
                "S*E - 0.6*P = {denominator:.1} psi; allowable stress is too low for the design pressure"
            ),
        ));
    }

    let required = p * r / denominator;
    let current = input.current_thickness_in;
    let thickness_ratio = current / input.original_thickness_in;
    // Inverse of the UG-27 form at the measured wall
    let mawp = se * current / (r + 0.6 * current);
    let remaining_life = ((current - required) / input.corrosion_rate_in_per_yr).max(0.0);

    let rating = if current < required {
        MetalLossRating::Level2ImmediateAction
    } else if thickness_ratio >= GML_ACCEPT_RATIO {
        MetalLossRating::Level1Acceptable
    } else if thickness_ratio >= GML_MONITOR_RATIO {
        MetalLossRating::Level1Monitor
    } else {
        MetalLossRating::Level2DetailedAssessment
    };

    Ok(GeneralMetalLossResult {
        thickness_ratio,
        minimum_required_thickness_in: required,
        mawp_psi: mawp,
        remaining_life_yr: remaining_life,
        rating,
    })
}

// ============================================================================
// Local Metal Loss (Part 5)
// ============================================================================

/// Input parameters for the local metal loss assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalMetalLossInput {
    /// Vessel inside diameter (in)
    pub inside_diameter_in: f64,

    /// Nominal wall thickness at construction (in)
    pub original_thickness_in: f64,

    /// Remaining thickness at the deepest point of the defect (in)
    pub remaining_thickness_in: f64,

    /// Minimum required thickness from the governing code formula (in)
    pub minimum_required_thickness_in: f64,

    /// Defect footprint length, longitudinal (in)
    pub defect_length_in: f64,

    /// Defect footprint width, circumferential (in)
    pub defect_width_in: f64,
}

impl LocalMetalLossInput {
    /// Build from the input mapping
    pub fn from_map(inputs: &InputMap) -> CalcResult<Self> {
        Ok(LocalMetalLossInput {
            inside_diameter_in: require_positive(inputs, "inside_diameter_in")?,
            original_thickness_in: require_positive(inputs, "original_thickness_in")?,
            remaining_thickness_in: require_positive(inputs, "remaining_thickness_in")?,
            minimum_required_thickness_in: require_positive(
                inputs,
                "minimum_required_thickness_in",
            )?,
            defect_length_in: require_positive(inputs, "defect_length_in")?,
            defect_width_in: require_positive(inputs, "defect_width_in")?,
        })
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if self.remaining_thickness_in > self.original_thickness_in {
            return Err(CalcError::invalid_value(
                "remaining_thickness_in",
                self.remaining_thickness_in.to_string(),
                "Remaining thickness cannot exceed the original thickness",
            ));
        }
        Ok(())
    }

    /// Defect footprint over the reference wall section D*t
    pub fn footprint_ratio(&self) -> f64 {
        (self.defect_length_in * self.defect_width_in)
            / (self.inside_diameter_in * self.original_thickness_in)
    }
}

/// Results from the local metal loss assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalMetalLossResult {
    /// Defect footprint over the reference wall section
    pub footprint_ratio: f64,

    /// True when the remaining ligament meets the required thickness
    pub thickness_adequate: bool,

    /// Assessment rating
    pub rating: ScreeningRating,
}

/// Assess a local thin area.
pub fn local_metal_loss(input: &LocalMetalLossInput) -> CalcResult<LocalMetalLossResult> {
    input.validate()?;

    let footprint_ratio = input.footprint_ratio();
    let thickness_adequate =
        input.remaining_thickness_in >= input.minimum_required_thickness_in;

    let rating = if !thickness_adequate {
        ScreeningRating::DetailedAssessmentRequired
    } else if footprint_ratio <= LML_ACCEPT_RATIO {
        ScreeningRating::Acceptable
    } else if footprint_ratio <= LML_MONITOR_RATIO {
        ScreeningRating::Monitor
    } else {
        ScreeningRating::DetailedAssessmentRequired
    };

    Ok(LocalMetalLossResult {
        footprint_ratio,
        thickness_adequate,
        rating,
    })
}

// ============================================================================
// Pitting Damage (Part 6)
// ============================================================================

/// Input parameters for the pitting damage assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PittingDamageInput {
    /// Nominal wall thickness (in)
    pub wall_thickness_in: f64,

    /// Deepest measured pit (in)
    pub max_pit_depth_in: f64,

    /// Average center-to-center pit spacing (in)
    pub pit_spacing_in: f64,

    /// Average pit mouth diameter (in)
    pub pit_diameter_in: f64,
}

impl PittingDamageInput {
    /// Build from the input mapping
    pub fn from_map(inputs: &InputMap) -> CalcResult<Self> {
        Ok(PittingDamageInput {
            wall_thickness_in: require_positive(inputs, "wall_thickness_in")?,
            max_pit_depth_in: require_non_negative(inputs, "max_pit_depth_in")?,
            pit_spacing_in: require_positive(inputs, "pit_spacing_in")?,
            pit_diameter_in: require_positive(inputs, "pit_diameter_in")?,
        })
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if self.max_pit_depth_in > self.wall_thickness_in {
            return Err(CalcError::invalid_value(
                "max_pit_depth_in",
                self.max_pit_depth_in.to_string(),
                "Pit depth cannot exceed the wall thickness",
            ));
        }
        Ok(())
    }
}

/// Results from the pitting damage assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PittingDamageResult {
    /// Deepest pit over wall thickness
    pub pit_depth_ratio: f64,

    /// Pit spacing over pit diameter; larger is more widely scattered
    pub pit_spacing_ratio: f64,

    /// Assessment rating
    pub rating: ScreeningRating,
}

/// Assess scattered pitting damage.
pub fn pitting_damage(input: &PittingDamageInput) -> CalcResult<PittingDamageResult> {
    input.validate()?;

    let depth_ratio = input.max_pit_depth_in / input.wall_thickness_in;
    let spacing_ratio = input.pit_spacing_in / input.pit_diameter_in;

    let rating = if depth_ratio <= PIT_ACCEPT_DEPTH && spacing_ratio >= PIT_ACCEPT_SPACING {
        ScreeningRating::Acceptable
    } else if depth_ratio <= PIT_MONITOR_DEPTH && spacing_ratio >= PIT_MONITOR_SPACING {
        ScreeningRating::Monitor
    } else {
        ScreeningRating::DetailedAssessmentRequired
    };

    Ok(PittingDamageResult {
        pit_depth_ratio: depth_ratio,
        pit_spacing_ratio: spacing_ratio,
        rating,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn gml_input() -> GeneralMetalLossInput {
        GeneralMetalLossInput {
            original_thickness_in: 0.375,
            current_thickness_in: 0.250,
            corrosion_rate_in_per_yr: 0.005,
            design_pressure_psi: 150.0,
            inside_radius_in: 30.0,
            allowable_stress_psi: 20000.0,
            joint_efficiency: 1.0,
        }
    }

    #[test]
    fn test_general_metal_loss() {
        let result = general_metal_loss(&gml_input()).unwrap();

        // Rt = 0.250/0.375 = 0.667
        assert!((result.thickness_ratio - 0.6667).abs() < 0.0005);
        // tmin = 150*30/(20000 - 90) = 0.2260
        assert!((result.minimum_required_thickness_in - 0.2260).abs() < 0.0005);
        // life = (0.250 - 0.226)/0.005 = 4.79 yr
        assert!((result.remaining_life_yr - 4.79).abs() < 0.02);
        // Wall still above tmin but Rt < 0.80
        assert_eq!(result.rating, MetalLossRating::Level2DetailedAssessment);
    }

    #[test]
    fn test_general_metal_loss_acceptable() {
        let mut input = gml_input();
        input.current_thickness_in = 0.350; // Rt = 0.933
        let result = general_metal_loss(&input).unwrap();
        assert_eq!(result.rating, MetalLossRating::Level1Acceptable);
    }

    #[test]
    fn test_general_metal_loss_monitor_band() {
        let mut input = gml_input();
        input.current_thickness_in = 0.310; // Rt = 0.827
        let result = general_metal_loss(&input).unwrap();
        assert_eq!(result.rating, MetalLossRating::Level1Monitor);
    }

    #[test]
    fn test_general_metal_loss_immediate_action() {
        let mut input = gml_input();
        input.current_thickness_in = 0.200; // below tmin = 0.226
        let result = general_metal_loss(&input).unwrap();
        assert_eq!(result.rating, MetalLossRating::Level2ImmediateAction);
        assert_eq!(result.remaining_life_yr, 0.0);
    }

    #[test]
    fn test_general_metal_loss_rating_monotonic() {
        // Thinner current wall never improves the rating
        let mut previous = 0;
        for thickness in [0.370, 0.350, 0.310, 0.250, 0.200] {
            let mut input = gml_input();
            input.current_thickness_in = thickness;
            let rating = general_metal_loss(&input).unwrap().rating;
            assert!(rating.severity() >= previous);
            previous = rating.severity();
        }
    }

    #[test]
    fn test_general_metal_loss_mawp() {
        let result = general_metal_loss(&gml_input()).unwrap();
        // MAWP = 20000*0.250/(30 + 0.15) = 165.8 psi, still above design
        assert!((result.mawp_psi - 165.84).abs() < 0.05);
        assert!(result.mawp_psi > 150.0);
    }

    #[test]
    fn test_general_metal_loss_infeasible_stress() {
        let mut input = gml_input();
        input.allowable_stress_psi = 80.0;
        let err = general_metal_loss(&input).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_STRESS_CONDITION");
    }

    fn lml_input() -> LocalMetalLossInput {
        LocalMetalLossInput {
            inside_diameter_in: 60.0,
            original_thickness_in: 0.375,
            remaining_thickness_in: 0.280,
            minimum_required_thickness_in: 0.226,
            defect_length_in: 4.0,
            defect_width_in: 0.5,
        }
    }

    #[test]
    fn test_local_metal_loss_acceptable() {
        let result = local_metal_loss(&lml_input()).unwrap();

        // footprint = (4*0.5)/(60*0.375) = 0.089
        assert!((result.footprint_ratio - 0.0889).abs() < 0.0005);
        assert!(result.thickness_adequate);
        assert_eq!(result.rating, ScreeningRating::Acceptable);
    }

    #[test]
    fn test_local_metal_loss_monitor() {
        let mut input = lml_input();
        input.defect_length_in = 8.0; // footprint 0.178
        let result = local_metal_loss(&input).unwrap();
        assert_eq!(result.rating, ScreeningRating::Monitor);
    }

    #[test]
    fn test_local_metal_loss_large_footprint() {
        let mut input = lml_input();
        input.defect_length_in = 15.0;
        input.defect_width_in = 0.5; // footprint 0.333
        let result = local_metal_loss(&input).unwrap();
        assert_eq!(result.rating, ScreeningRating::DetailedAssessmentRequired);
    }

    #[test]
    fn test_local_metal_loss_thin_ligament() {
        let mut input = lml_input();
        input.remaining_thickness_in = 0.200; // below required
        let result = local_metal_loss(&input).unwrap();
        assert!(!result.thickness_adequate);
        assert_eq!(result.rating, ScreeningRating::DetailedAssessmentRequired);
    }

    fn pitting_input() -> PittingDamageInput {
        PittingDamageInput {
            wall_thickness_in: 0.375,
            max_pit_depth_in: 0.06,
            pit_spacing_in: 2.0,
            pit_diameter_in: 0.25,
        }
    }

    #[test]
    fn test_pitting_acceptable() {
        let result = pitting_damage(&pitting_input()).unwrap();

        // depth ratio 0.16, spacing ratio 8.0
        assert!((result.pit_depth_ratio - 0.16).abs() < 0.001);
        assert_eq!(result.pit_spacing_ratio, 8.0);
        assert_eq!(result.rating, ScreeningRating::Acceptable);
    }

    #[test]
    fn test_pitting_monitor() {
        let mut input = pitting_input();
        input.max_pit_depth_in = 0.15; // depth ratio 0.40
        let result = pitting_damage(&input).unwrap();
        assert_eq!(result.rating, ScreeningRating::Monitor);
    }

    #[test]
    fn test_pitting_dense_pattern() {
        let mut input = pitting_input();
        input.pit_spacing_in = 0.3; // spacing ratio 1.2
        let result = pitting_damage(&input).unwrap();
        assert_eq!(result.rating, ScreeningRating::DetailedAssessmentRequired);
    }

    #[test]
    fn test_pitting_through_wall_rejected() {
        let mut input = pitting_input();
        input.max_pit_depth_in = 0.40; // deeper than the wall
        let err = pitting_damage(&input).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_VALUE");
    }

    #[test]
    fn test_rating_order() {
        for window in MetalLossRating::ALL.windows(2) {
            assert!(window[0].severity() < window[1].severity());
        }
        for window in ScreeningRating::ALL.windows(2) {
            assert!(window[0].severity() < window[1].severity());
        }
        assert_eq!(
            serde_json::to_string(&MetalLossRating::Level1Monitor).unwrap(),
            "\"level1_monitor\""
        );
    }

    #[test]
    fn test_calculator_dispatch() {
        let calc = Api579Calculator;
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

        assert!(calc.validate_inputs(&inputs).is_ok());
        let outputs = calc.calculate(&inputs).unwrap();
        assert_eq!(outputs["rating"], json!("level2_detailed_assessment"));

        let bad = json!({ "calculation_type": "crack_like_flaw" }).as_object().unwrap().clone();
        assert!(calc.calculate(&bad).is_err());
    }
}
