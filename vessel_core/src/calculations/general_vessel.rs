//! # General Pressure Vessel Calculator
//!
//! Code-agnostic vessel checks: ASCE 7-style wind and seismic loads on a
//! vertical vessel, and the simplified in-service fitness rating used for
//! inspection planning. The wind and seismic operations use the static
//! equivalent-load forms; site-specific coefficient selection stays with
//! the caller.
//!
//! ## Example
//!
//! ```rust
//! use vessel_core::calculations::general_vessel::{WindLoadInput, wind_load};
//!
//! let input = WindLoadInput {
//!     basic_wind_speed_mph: 110.0,
//!     exposure_coefficient: 1.0,
//!     importance_factor: 1.0,
//!     gust_factor: 0.85,
//!     force_coefficient: 0.8,
//!     projected_area_ft2: 320.0,
//!     vessel_height_ft: 40.0,
//! };
//!
//! let result = wind_load(&input).unwrap();
//! assert!(result.wind_moment_ftlb > 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::request::{
    calculation_type, optional_f64, require_f64, require_positive, to_output_map, InputMap,
    OutputMap,
};

use super::Calculator;

/// ASCE velocity-pressure constant (psf per mph²)
const VELOCITY_PRESSURE_COEFF: f64 = 0.00256;

/// General pressure vessel calculator.
///
/// Operations: `wind_load`, `seismic_load`, `fitness_for_service`.
pub struct GeneralVesselCalculator;

impl Calculator for GeneralVesselCalculator {
    fn validate_inputs(&self, inputs: &InputMap) -> CalcResult<()> {
        match calculation_type(inputs)?.as_str() {
            "wind_load" => WindLoadInput::from_map(inputs)?.validate(),
            "seismic_load" => SeismicLoadInput::from_map(inputs)?.validate(),
            "fitness_for_service" => FitnessForServiceInput::from_map(inputs)?.validate(),
            other => Err(CalcError::unsupported_calculation_type(other)),
        }
    }

    fn calculate(&self, inputs: &InputMap) -> CalcResult<OutputMap> {
        match calculation_type(inputs)?.as_str() {
            "wind_load" => to_output_map(&wind_load(&WindLoadInput::from_map(inputs)?)?),
            "seismic_load" => to_output_map(&seismic_load(&SeismicLoadInput::from_map(inputs)?)?),
            "fitness_for_service" => to_output_map(&fitness_for_service(
                &FitnessForServiceInput::from_map(inputs)?,
            )?),
            other => Err(CalcError::unsupported_calculation_type(other)),
        }
    }
}

// ============================================================================
// Wind Load (ASCE 7 static form)
// ============================================================================

/// Input parameters for wind load on a vertical vessel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindLoadInput {
    /// Basic wind speed V (mph)
    pub basic_wind_speed_mph: f64,

    /// Exposure coefficient Ce for the site category
    pub exposure_coefficient: f64,

    /// Importance factor I
    pub importance_factor: f64,

    /// Gust effect factor Gf
    pub gust_factor: f64,

    /// Force coefficient Cf (0.8 typical for cylindrical stacks)
    pub force_coefficient: f64,

    /// Projected area normal to the wind (ft²)
    pub projected_area_ft2: f64,

    /// Vessel height H above grade (ft)
    pub vessel_height_ft: f64,
}

impl WindLoadInput {
    /// Build from the input mapping
    pub fn from_map(inputs: &InputMap) -> CalcResult<Self> {
        Ok(WindLoadInput {
            basic_wind_speed_mph: require_f64(inputs, "basic_wind_speed_mph")?,
            exposure_coefficient: optional_f64(inputs, "exposure_coefficient")?.unwrap_or(1.0),
            importance_factor: optional_f64(inputs, "importance_factor")?.unwrap_or(1.0),
            gust_factor: optional_f64(inputs, "gust_factor")?.unwrap_or(0.85),
            force_coefficient: optional_f64(inputs, "force_coefficient")?.unwrap_or(0.8),
            projected_area_ft2: require_f64(inputs, "projected_area_ft2")?,
            vessel_height_ft: require_f64(inputs, "vessel_height_ft")?,
        })
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        for (field, value) in [
            ("basic_wind_speed_mph", self.basic_wind_speed_mph),
            ("exposure_coefficient", self.exposure_coefficient),
            ("importance_factor", self.importance_factor),
            ("gust_factor", self.gust_factor),
            ("force_coefficient", self.force_coefficient),
            ("projected_area_ft2", self.projected_area_ft2),
            ("vessel_height_ft", self.vessel_height_ft),
        ] {
            if value <= 0.0 {
                return Err(CalcError::invalid_value(
                    field,
                    value.to_string(),
                    "Value must be positive",
                ));
            }
        }
        Ok(())
    }
}

/// Results from wind load calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindLoadResult {
    /// Velocity pressure q = 0.00256*Ce*I*V² (psf)
    pub velocity_pressure_psf: f64,

    /// Total wind force F = q*Gf*Cf*A (lb)
    pub wind_force_lb: f64,

    /// Overturning moment at the base M = F*H/2 (ft-lb)
    pub wind_moment_ftlb: f64,
}

/// Calculate the static wind load and base moment.
pub fn wind_load(input: &WindLoadInput) -> CalcResult<WindLoadResult> {
    input.validate()?;

    let velocity_pressure = VELOCITY_PRESSURE_COEFF
        * input.exposure_coefficient
        * input.importance_factor
        * input.basic_wind_speed_mph.powi(2);
    let force =
        velocity_pressure * input.gust_factor * input.force_coefficient * input.projected_area_ft2;
    // Resultant acts at mid-height of the projected area
    let moment = force * input.vessel_height_ft / 2.0;

    Ok(WindLoadResult {
        velocity_pressure_psf: velocity_pressure,
        wind_force_lb: force,
        wind_moment_ftlb: moment,
    })
}

// ============================================================================
// Seismic Load (equivalent lateral force)
// ============================================================================

/// Input parameters for the equivalent-lateral-force seismic check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeismicLoadInput {
    /// Seismic response coefficient Cs
    pub seismic_coefficient: f64,

    /// Importance factor I
    pub importance_factor: f64,

    /// Operating weight W (lb)
    pub operating_weight_lb: f64,

    /// Response modification factor R
    pub response_modification: f64,

    /// Vessel height H above grade (ft)
    pub vessel_height_ft: f64,
}

impl SeismicLoadInput {
    /// Build from the input mapping
    pub fn from_map(inputs: &InputMap) -> CalcResult<Self> {
        Ok(SeismicLoadInput {
            seismic_coefficient: require_f64(inputs, "seismic_coefficient")?,
            importance_factor: optional_f64(inputs, "importance_factor")?.unwrap_or(1.0),
            operating_weight_lb: require_f64(inputs, "operating_weight_lb")?,
            response_modification: optional_f64(inputs, "response_modification")?.unwrap_or(3.0),
            vessel_height_ft: require_f64(inputs, "vessel_height_ft")?,
        })
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        for (field, value) in [
            ("seismic_coefficient", self.seismic_coefficient),
            ("importance_factor", self.importance_factor),
            ("operating_weight_lb", self.operating_weight_lb),
            ("response_modification", self.response_modification),
            ("vessel_height_ft", self.vessel_height_ft),
        ] {
            if value <= 0.0 {
                return Err(CalcError::invalid_value(
                    field,
                    value.to_string(),
                    "Value must be positive",
                ));
            }
        }
        Ok(())
    }
}

/// Results from seismic load calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeismicLoadResult {
    /// Base shear V = Cs*I*W/R (lb)
    pub base_shear_lb: f64,

    /// Overturning moment M = V*0.75*H (ft-lb), distributed-mass resultant
    pub overturning_moment_ftlb: f64,
}

/// Calculate the equivalent-lateral-force base shear and overturning moment.
pub fn seismic_load(input: &SeismicLoadInput) -> CalcResult<SeismicLoadResult> {
    input.validate()?;

    let base_shear = input.seismic_coefficient * input.importance_factor
        * input.operating_weight_lb
        / input.response_modification;
    let moment = base_shear * 0.75 * input.vessel_height_ft;

    Ok(SeismicLoadResult {
        base_shear_lb: base_shear,
        overturning_moment_ftlb: moment,
    })
}

// ============================================================================
// Simplified Fitness-for-Service
// ============================================================================

/// In-service fitness rating, ordered from best to worst.
///
/// The scale is total: a vessel never rates better as its wall thins or
/// its remaining life shortens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FfsRating {
    /// Continue operation on the normal inspection cycle
    Fit,
    /// Continue operation with shortened inspection intervals
    Monitor,
    /// Plan repair at the next turnaround
    Repair,
    /// Remove from service; wall is below the required thickness
    Replace,
}

impl FfsRating {
    /// All rating variants, best first
    pub const ALL: [FfsRating; 4] = [
        FfsRating::Fit,
        FfsRating::Monitor,
        FfsRating::Repair,
        FfsRating::Replace,
    ];

    /// Get the snake_case code used in output mappings
    pub fn code(&self) -> &'static str {
        match self {
            FfsRating::Fit => "fit",
            FfsRating::Monitor => "monitor",
            FfsRating::Repair => "repair",
            FfsRating::Replace => "replace",
        }
    }

    /// Severity rank: 0 (fit) through 3 (replace)
    pub fn severity(&self) -> u8 {
        match self {
            FfsRating::Fit => 0,
            FfsRating::Monitor => 1,
            FfsRating::Repair => 2,
            FfsRating::Replace => 3,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            FfsRating::Fit => "Fit for Service",
            FfsRating::Monitor => "Fit - Monitor",
            FfsRating::Repair => "Repair Required",
            FfsRating::Replace => "Replace",
        }
    }

    /// Recommended actions for this rating
    pub fn recommendations(&self) -> Vec<String> {
        let actions: &[&str] = match self {
            FfsRating::Fit => &["Continue normal operation", "Maintain inspection schedule"],
            FfsRating::Monitor => &[
                "Continue operation",
                "Shorten inspection interval",
                "Track corrosion rate against the current projection",
            ],
            FfsRating::Repair => &[
                "Plan repair at the next scheduled turnaround",
                "Increase monitoring frequency until repaired",
            ],
            FfsRating::Replace => &[
                "Remove from service",
                "Wall thickness is below the required minimum",
                "Re-rate or replace before returning to service",
            ],
        };
        actions.iter().map(|s| s.to_string()).collect()
    }
}

impl std::fmt::Display for FfsRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Input parameters for the simplified fitness-for-service rating.
///
/// ## JSON Example
///
/// ```json
/// {
///   "calculation_type": "fitness_for_service",
///   "current_thickness_in": 0.32,
///   "minimum_required_thickness_in": 0.25,
///   "corrosion_rate_in_per_yr": 0.005,
///   "required_remaining_life_yr": 10.0
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitnessForServiceInput {
    /// Measured wall thickness (in)
    pub current_thickness_in: f64,

    /// Minimum required thickness from the governing code formula (in)
    pub minimum_required_thickness_in: f64,

    /// Measured corrosion rate (in/yr)
    pub corrosion_rate_in_per_yr: f64,

    /// Remaining life the owner requires of the vessel (yr)
    pub required_remaining_life_yr: f64,
}

impl FitnessForServiceInput {
    /// Build from the input mapping
    pub fn from_map(inputs: &InputMap) -> CalcResult<Self> {
        Ok(FitnessForServiceInput {
            current_thickness_in: require_positive(inputs, "current_thickness_in")?,
            minimum_required_thickness_in: require_positive(
                inputs,
                "minimum_required_thickness_in",
            )?,
            corrosion_rate_in_per_yr: require_f64(inputs, "corrosion_rate_in_per_yr")?,
            required_remaining_life_yr: optional_f64(inputs, "required_remaining_life_yr")?
                .unwrap_or(10.0),
        })
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        // A zero rate would make remaining life unbounded and the rating
        // thresholds meaningless; the caller must supply a measured rate.
        if self.corrosion_rate_in_per_yr <= 0.0 {
            return Err(CalcError::invalid_value(
                "corrosion_rate_in_per_yr",
                self.corrosion_rate_in_per_yr.to_string(),
                "Corrosion rate must be positive",
            ));
        }
        if self.required_remaining_life_yr <= 0.0 {
            return Err(CalcError::invalid_value(
                "required_remaining_life_yr",
                self.required_remaining_life_yr.to_string(),
                "Required remaining life must be positive",
            ));
        }
        Ok(())
    }
}

/// Results from the simplified fitness-for-service rating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitnessForServiceResult {
    /// Projected remaining life at the measured corrosion rate (yr)
    pub remaining_life_yr: f64,

    /// True when the wall is at or above the required thickness
    pub thickness_adequate: bool,

    /// Overall rating on the fit < monitor < repair < replace scale
    pub rating: FfsRating,

    /// Recommended interval to the next thickness survey (yr)
    pub next_inspection_interval_yr: f64,

    /// Actions recommended for the rating
    pub recommendations: Vec<String>,
}

/// Rate the vessel's fitness for continued service.
pub fn fitness_for_service(
    input: &FitnessForServiceInput,
) -> CalcResult<FitnessForServiceResult> {
    input.validate()?;

    let margin = input.current_thickness_in - input.minimum_required_thickness_in;
    let remaining_life = (margin / input.corrosion_rate_in_per_yr).max(0.0);
    let thickness_adequate = input.current_thickness_in >= input.minimum_required_thickness_in;

    let rating = if !thickness_adequate {
        FfsRating::Replace
    } else if remaining_life >= input.required_remaining_life_yr {
        FfsRating::Fit
    } else if remaining_life >= 0.5 * input.required_remaining_life_yr {
        FfsRating::Monitor
    } else {
        FfsRating::Repair
    };

    let next_inspection_interval_yr = match rating {
        FfsRating::Fit => (remaining_life / 3.0).min(5.0),
        FfsRating::Monitor => (remaining_life / 4.0).min(2.0),
        FfsRating::Repair => 0.5,
        FfsRating::Replace => 0.0,
    };

    Ok(FitnessForServiceResult {
        remaining_life_yr: remaining_life,
        thickness_adequate,
        rating,
        next_inspection_interval_yr,
        recommendations: rating.recommendations(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wind_load() {
        let input = WindLoadInput {
            basic_wind_speed_mph: 110.0,
            exposure_coefficient: 1.0,
            importance_factor: 1.0,
            gust_factor: 0.85,
            force_coefficient: 0.8,
            projected_area_ft2: 320.0,
            vessel_height_ft: 40.0,
        };
        let result = wind_load(&input).unwrap();

        // q = 0.00256*1*1*110^2 = 30.98 psf
        assert!((result.velocity_pressure_psf - 30.976).abs() < 0.001);
        // F = 30.976*0.85*0.8*320 = 6740.4 lb
        assert!((result.wind_force_lb - 6740.4).abs() < 0.5);
        // M = F*40/2 = 134808 ft-lb
        assert!((result.wind_moment_ftlb - 134_808.0).abs() < 10.0);
    }

    #[test]
    fn test_seismic_load() {
        let input = SeismicLoadInput {
            seismic_coefficient: 0.3,
            importance_factor: 1.25,
            operating_weight_lb: 80_000.0,
            response_modification: 3.0,
            vessel_height_ft: 40.0,
        };
        let result = seismic_load(&input).unwrap();

        // V = 0.3*1.25*80000/3 = 10000 lb
        assert!((result.base_shear_lb - 10_000.0).abs() < 0.001);
        // M = 10000*0.75*40 = 300000 ft-lb
        assert!((result.overturning_moment_ftlb - 300_000.0).abs() < 0.01);
    }

    fn ffs_input() -> FitnessForServiceInput {
        FitnessForServiceInput {
            current_thickness_in: 0.32,
            minimum_required_thickness_in: 0.25,
            corrosion_rate_in_per_yr: 0.005,
            required_remaining_life_yr: 10.0,
        }
    }

    #[test]
    fn test_ffs_fit() {
        let result = fitness_for_service(&ffs_input()).unwrap();

        // life = 0.07/0.005 = 14 yr >= 10 required
        assert!((result.remaining_life_yr - 14.0).abs() < 1e-9);
        assert_eq!(result.rating, FfsRating::Fit);
        assert!(result.thickness_adequate);
        // interval = min(5, 14/3) = 4.67
        assert!((result.next_inspection_interval_yr - 14.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_ffs_monitor() {
        let mut input = ffs_input();
        input.corrosion_rate_in_per_yr = 0.010; // life = 7 yr, in [5, 10)
        let result = fitness_for_service(&input).unwrap();
        assert_eq!(result.rating, FfsRating::Monitor);
        assert!((result.next_inspection_interval_yr - 7.0 / 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_ffs_repair() {
        let mut input = ffs_input();
        input.corrosion_rate_in_per_yr = 0.020; // life = 3.5 yr < 5
        let result = fitness_for_service(&input).unwrap();
        assert_eq!(result.rating, FfsRating::Repair);
        assert_eq!(result.next_inspection_interval_yr, 0.5);
    }

    #[test]
    fn test_ffs_replace() {
        let mut input = ffs_input();
        input.current_thickness_in = 0.20; // below required
        let result = fitness_for_service(&input).unwrap();
        assert_eq!(result.rating, FfsRating::Replace);
        assert!(!result.thickness_adequate);
        assert_eq!(result.remaining_life_yr, 0.0);
        assert_eq!(result.next_inspection_interval_yr, 0.0);
    }

    #[test]
    fn test_ffs_rating_monotonic_in_thickness() {
        // Thinner wall never rates better, all else equal
        let mut previous = FfsRating::Fit.severity();
        for thickness in [0.40, 0.32, 0.28, 0.26, 0.24] {
            let mut input = ffs_input();
            input.current_thickness_in = thickness;
            let rating = fitness_for_service(&input).unwrap().rating;
            assert!(rating.severity() >= previous);
            previous = rating.severity();
        }
    }

    #[test]
    fn test_ffs_zero_corrosion_rate_rejected() {
        let mut input = ffs_input();
        input.corrosion_rate_in_per_yr = 0.0;
        let err = fitness_for_service(&input).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_VALUE");
    }

    #[test]
    fn test_rating_codes() {
        assert_eq!(FfsRating::Fit.code(), "fit");
        assert_eq!(FfsRating::Replace.code(), "replace");
        assert_eq!(
            serde_json::to_string(&FfsRating::Monitor).unwrap(),
            "\"monitor\""
        );
        // Severity ranks are strictly increasing across the scale
        for window in FfsRating::ALL.windows(2) {
            assert!(window[0].severity() < window[1].severity());
        }
    }

    #[test]
    fn test_calculator_dispatch() {
        let calc = GeneralVesselCalculator;
        let inputs = json!({
            "calculation_type": "fitness_for_service",
            "current_thickness_in": 0.32,
            "minimum_required_thickness_in": 0.25,
            "corrosion_rate_in_per_yr": 0.005
        })
        .as_object()
        .unwrap()
        .clone();

        let outputs = calc.calculate(&inputs).unwrap();
        assert_eq!(outputs["rating"], json!("fit"));
        assert!(outputs["recommendations"].as_array().unwrap().len() >= 2);

        let bad = json!({ "calculation_type": "nozzle_loads" }).as_object().unwrap().clone();
        assert!(calc.validate_inputs(&bad).is_err());
    }
}
