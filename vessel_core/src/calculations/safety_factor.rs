//! # Safety Factor Calculator
//!
//! Pressure safety ratios against the design basis, and a corrected
//! endurance-limit fatigue estimate. The endurance correction follows the
//! classical factor chain: base endurance (half the tensile strength by
//! default) knocked down by surface finish, size, reliability, and
//! temperature factors, then compared against the concentrated stress
//! amplitude.
//!
//! ## Example
//!
//! ```rust
//! use vessel_core::calculations::safety_factor::{PressureRatiosInput, pressure_ratios};
//!
//! let input = PressureRatiosInput {
//!     design_pressure_psi: 150.0,
//!     operating_pressure_psi: 120.0,
//!     burst_pressure_psi: 700.0,
//!     yield_pressure_psi: 250.0,
//!     test_pressure_psi: 195.0,
//! };
//!
//! let result = pressure_ratios(&input).unwrap();
//! assert!(result.meets_asme_requirements);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::request::{
    calculation_type, optional_f64, require_positive, to_output_map, InputMap, OutputMap,
};

use super::Calculator;

/// ASME-style minimum burst margin over design pressure
const MIN_BURST_RATIO: f64 = 4.0;

/// ASME-style minimum yield margin over design pressure
const MIN_YIELD_RATIO: f64 = 1.5;

/// Cycle count anchoring the cubic S-N approximation
const FATIGUE_REFERENCE_CYCLES: f64 = 1.0e6;

/// Safety factor calculator.
///
/// Operations: `pressure_ratios`, `fatigue_life`.
pub struct SafetyFactorCalculator;

impl Calculator for SafetyFactorCalculator {
    fn validate_inputs(&self, inputs: &InputMap) -> CalcResult<()> {
        match calculation_type(inputs)?.as_str() {
            "pressure_ratios" => PressureRatiosInput::from_map(inputs)?.validate(),
            "fatigue_life" => FatigueLifeInput::from_map(inputs)?.validate(),
            other => Err(CalcError::unsupported_calculation_type(other)),
        }
    }

    fn calculate(&self, inputs: &InputMap) -> CalcResult<OutputMap> {
        match calculation_type(inputs)?.as_str() {
            "pressure_ratios" => {
                to_output_map(&pressure_ratios(&PressureRatiosInput::from_map(inputs)?)?)
            }
            "fatigue_life" => to_output_map(&fatigue_life(&FatigueLifeInput::from_map(inputs)?)?),
            other => Err(CalcError::unsupported_calculation_type(other)),
        }
    }
}

// ============================================================================
// Pressure Ratios
// ============================================================================

/// Input parameters for the pressure safety ratios.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PressureRatiosInput {
    /// Design pressure (psi)
    pub design_pressure_psi: f64,

    /// Normal operating pressure (psi)
    pub operating_pressure_psi: f64,

    /// Calculated or tested burst pressure (psi)
    pub burst_pressure_psi: f64,

    /// Pressure at first yield (psi)
    pub yield_pressure_psi: f64,

    /// Hydrostatic test pressure (psi)
    pub test_pressure_psi: f64,
}

impl PressureRatiosInput {
    /// Build from the input mapping
    pub fn from_map(inputs: &InputMap) -> CalcResult<Self> {
        Ok(PressureRatiosInput {
            design_pressure_psi: require_positive(inputs, "design_pressure_psi")?,
            operating_pressure_psi: require_positive(inputs, "operating_pressure_psi")?,
            burst_pressure_psi: require_positive(inputs, "burst_pressure_psi")?,
            yield_pressure_psi: require_positive(inputs, "yield_pressure_psi")?,
            test_pressure_psi: require_positive(inputs, "test_pressure_psi")?,
        })
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if self.yield_pressure_psi >= self.burst_pressure_psi {
            return Err(CalcError::invalid_value(
                "yield_pressure_psi",
                self.yield_pressure_psi.to_string(),
                "Yield pressure must be below the burst pressure",
            ));
        }
        Ok(())
    }
}

/// Results from the pressure safety ratios.
///
/// ## JSON Example
///
/// ```json
/// {
///   "burst_ratio": 4.67,
///   "yield_ratio": 1.67,
///   "test_ratio": 1.3,
///   "design_margin": 1.25,
///   "meets_asme_requirements": true
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PressureRatiosResult {
    /// Burst pressure over design pressure
    pub burst_ratio: f64,

    /// Yield pressure over design pressure
    pub yield_ratio: f64,

    /// Test pressure over design pressure
    pub test_ratio: f64,

    /// Design pressure over operating pressure
    pub design_margin: f64,

    /// True when burst >= 4.0 and yield >= 1.5 margins both hold
    pub meets_asme_requirements: bool,
}

/// Derive the safety ratios from the supplied pressures.
pub fn pressure_ratios(input: &PressureRatiosInput) -> CalcResult<PressureRatiosResult> {
    input.validate()?;

    let burst_ratio = input.burst_pressure_psi / input.design_pressure_psi;
    let yield_ratio = input.yield_pressure_psi / input.design_pressure_psi;
    let test_ratio = input.test_pressure_psi / input.design_pressure_psi;
    let design_margin = input.design_pressure_psi / input.operating_pressure_psi;

    Ok(PressureRatiosResult {
        burst_ratio,
        yield_ratio,
        test_ratio,
        design_margin,
        meets_asme_requirements: burst_ratio >= MIN_BURST_RATIO && yield_ratio >= MIN_YIELD_RATIO,
    })
}

// ============================================================================
// Fatigue Life (corrected endurance limit)
// ============================================================================

/// Input parameters for the corrected endurance-limit fatigue estimate.
///
/// `endurance_limit_psi` overrides the 0.5*Su default when test data is
/// available. All correction factors sit in (0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FatigueLifeInput {
    /// Alternating stress amplitude (psi)
    pub stress_amplitude_psi: f64,

    /// Stress concentration factor Kt (>= 1)
    pub stress_concentration_factor: f64,

    /// Tensile strength Su for the base endurance default (psi)
    pub tensile_strength_psi: f64,

    /// Optional measured endurance limit override (psi)
    pub endurance_limit_psi: Option<f64>,

    /// Surface finish factor ka
    pub surface_finish_factor: f64,

    /// Size factor kb
    pub size_factor: f64,

    /// Reliability factor kc
    pub reliability_factor: f64,

    /// Temperature factor kd
    pub temperature_factor: f64,
}

impl FatigueLifeInput {
    /// Build from the input mapping
    pub fn from_map(inputs: &InputMap) -> CalcResult<Self> {
        Ok(FatigueLifeInput {
            stress_amplitude_psi: require_positive(inputs, "stress_amplitude_psi")?,
            stress_concentration_factor: optional_f64(inputs, "stress_concentration_factor")?
                .unwrap_or(1.0),
            tensile_strength_psi: require_positive(inputs, "tensile_strength_psi")?,
            endurance_limit_psi: optional_f64(inputs, "endurance_limit_psi")?,
            surface_finish_factor: optional_f64(inputs, "surface_finish_factor")?.unwrap_or(0.9),
            size_factor: optional_f64(inputs, "size_factor")?.unwrap_or(0.9),
            reliability_factor: optional_f64(inputs, "reliability_factor")?.unwrap_or(0.897),
            temperature_factor: optional_f64(inputs, "temperature_factor")?.unwrap_or(1.0),
        })
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if self.stress_concentration_factor < 1.0 {
            return Err(CalcError::invalid_value(
                "stress_concentration_factor",
                self.stress_concentration_factor.to_string(),
                "Stress concentration factor cannot be below 1",
            ));
        }
        if let Some(limit) = self.endurance_limit_psi {
            if limit <= 0.0 {
                return Err(CalcError::invalid_value(
                    "endurance_limit_psi",
                    limit.to_string(),
                    "Endurance limit must be positive",
                ));
            }
        }
        for (field, value) in [
            ("surface_finish_factor", self.surface_finish_factor),
            ("size_factor", self.size_factor),
            ("reliability_factor", self.reliability_factor),
            ("temperature_factor", self.temperature_factor),
        ] {
            if value <= 0.0 || value > 1.0 {
                return Err(CalcError::invalid_value(
                    field,
                    value.to_string(),
                    "Correction factors must be between 0 and 1",
                ));
            }
        }
        Ok(())
    }

    /// Base endurance limit before correction: override or 0.5*Su
    pub fn base_endurance_psi(&self) -> f64 {
        self.endurance_limit_psi
            .unwrap_or(0.5 * self.tensile_strength_psi)
    }
}

/// Results from the fatigue-life estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FatigueLifeResult {
    /// Base endurance limit before correction (psi)
    pub base_endurance_psi: f64,

    /// Endurance limit after the ka*kb*kc*kd chain (psi)
    pub corrected_endurance_psi: f64,

    /// Amplitude times the stress concentration factor (psi)
    pub effective_stress_psi: f64,

    /// True when the effective stress sits at or below the corrected limit
    pub infinite_life: bool,

    /// Estimated cycles to failure; `null` for infinite life
    pub estimated_cycles: Option<f64>,
}

/// Estimate fatigue life against the corrected endurance limit.
pub fn fatigue_life(input: &FatigueLifeInput) -> CalcResult<FatigueLifeResult> {
    input.validate()?;

    let base = input.base_endurance_psi();
    let corrected = base
        * input.surface_finish_factor
        * input.size_factor
        * input.reliability_factor
        * input.temperature_factor;
    let effective = input.stress_amplitude_psi * input.stress_concentration_factor;

    let (infinite_life, estimated_cycles) = if effective <= corrected {
        (true, None)
    } else {
        (
            false,
            Some((corrected / effective).powi(3) * FATIGUE_REFERENCE_CYCLES),
        )
    };

    Ok(FatigueLifeResult {
        base_endurance_psi: base,
        corrected_endurance_psi: corrected,
        effective_stress_psi: effective,
        infinite_life,
        estimated_cycles,
    })
}
