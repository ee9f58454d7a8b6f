//! # Materials Database
//!
//! Material-family property lookups used across the calculators: design
//! temperature limits (ASME VIII Div 2 temperature check), fatigue strength
//! (Div 2 fatigue screening), thermal expansion coefficient and elastic
//! modulus (pipe stress).
//!
//! Values are representative mid-range properties for each family, not
//! grade-specific data. Operations that need exact grade values accept a
//! numeric override field alongside the family key.
//!
//! ## Example
//!
//! ```rust
//! use vessel_core::materials::MaterialFamily;
//!
//! let family = MaterialFamily::from_str_flexible("carbon steel").unwrap();
//! let props = family.properties();
//! assert_eq!(props.temperature_limit_f, 800.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Material families supported by the property database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialFamily {
    /// Carbon steel (SA-516 class)
    CarbonSteel,
    /// Low-alloy steel (SA-387 class)
    LowAlloySteel,
    /// Austenitic stainless steel (SA-240 class)
    StainlessSteel,
    /// Nickel alloy (SB-443 class)
    NickelAlloy,
    /// Aluminum alloy (SB-209 class)
    Aluminum,
}

/// Per-family properties consumed by the calculators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperties {
    /// Maximum design temperature (°F)
    pub temperature_limit_f: f64,
    /// Fatigue strength at 10^6 cycles (psi)
    pub fatigue_strength_psi: f64,
    /// Mean coefficient of thermal expansion (in/in/°F)
    pub thermal_expansion_per_f: f64,
    /// Elastic modulus at ambient temperature (psi)
    pub elastic_modulus_psi: f64,
}

impl MaterialFamily {
    /// All material family variants
    pub const ALL: [MaterialFamily; 5] = [
        MaterialFamily::CarbonSteel,
        MaterialFamily::LowAlloySteel,
        MaterialFamily::StainlessSteel,
        MaterialFamily::NickelAlloy,
        MaterialFamily::Aluminum,
    ];

    /// Get the snake_case code used in input mappings
    pub fn code(&self) -> &'static str {
        match self {
            MaterialFamily::CarbonSteel => "carbon_steel",
            MaterialFamily::LowAlloySteel => "low_alloy_steel",
            MaterialFamily::StainlessSteel => "stainless_steel",
            MaterialFamily::NickelAlloy => "nickel_alloy",
            MaterialFamily::Aluminum => "aluminum",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "carbon_steel" | "cs" | "carbon" => Ok(MaterialFamily::CarbonSteel),
            "low_alloy_steel" | "low_alloy" | "alloy_steel" => Ok(MaterialFamily::LowAlloySteel),
            "stainless_steel" | "ss" | "stainless" | "austenitic" => {
                Ok(MaterialFamily::StainlessSteel)
            }
            "nickel_alloy" | "nickel" => Ok(MaterialFamily::NickelAlloy),
            "aluminum" | "aluminium" | "al" => Ok(MaterialFamily::Aluminum),
            _ => Err(CalcError::unknown_material(s)),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            MaterialFamily::CarbonSteel => "Carbon Steel",
            MaterialFamily::LowAlloySteel => "Low-Alloy Steel",
            MaterialFamily::StainlessSteel => "Stainless Steel",
            MaterialFamily::NickelAlloy => "Nickel Alloy",
            MaterialFamily::Aluminum => "Aluminum",
        }
    }

    /// Get the property set for this family
    pub fn properties(&self) -> MaterialProperties {
        match self {
            MaterialFamily::CarbonSteel => MaterialProperties {
                temperature_limit_f: 800.0,
                fatigue_strength_psi: 13_000.0,
                thermal_expansion_per_f: 6.5e-6,
                elastic_modulus_psi: 29.0e6,
            },
            MaterialFamily::LowAlloySteel => MaterialProperties {
                temperature_limit_f: 1000.0,
                fatigue_strength_psi: 15_000.0,
                thermal_expansion_per_f: 7.3e-6,
                elastic_modulus_psi: 29.7e6,
            },
            MaterialFamily::StainlessSteel => MaterialProperties {
                temperature_limit_f: 1500.0,
                fatigue_strength_psi: 17_000.0,
                thermal_expansion_per_f: 9.6e-6,
                elastic_modulus_psi: 28.3e6,
            },
            MaterialFamily::NickelAlloy => MaterialProperties {
                temperature_limit_f: 1200.0,
                fatigue_strength_psi: 20_000.0,
                thermal_expansion_per_f: 7.1e-6,
                elastic_modulus_psi: 30.0e6,
            },
            MaterialFamily::Aluminum => MaterialProperties {
                temperature_limit_f: 400.0,
                fatigue_strength_psi: 7_000.0,
                thermal_expansion_per_f: 12.8e-6,
                elastic_modulus_psi: 10.0e6,
            },
        }
    }
}

impl Default for MaterialFamily {
    fn default() -> Self {
        MaterialFamily::CarbonSteel
    }
}

impl std::fmt::Display for MaterialFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_flexible() {
        assert_eq!(
            MaterialFamily::from_str_flexible("Carbon Steel").unwrap(),
            MaterialFamily::CarbonSteel
        );
        assert_eq!(
            MaterialFamily::from_str_flexible("SS").unwrap(),
            MaterialFamily::StainlessSteel
        );
        assert_eq!(
            MaterialFamily::from_str_flexible("low-alloy-steel").unwrap(),
            MaterialFamily::LowAlloySteel
        );

        let err = MaterialFamily::from_str_flexible("unobtainium").unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_MATERIAL");
    }

    #[test]
    fn test_codes_roundtrip() {
        for family in MaterialFamily::ALL {
            assert_eq!(
                MaterialFamily::from_str_flexible(family.code()).unwrap(),
                family
            );
        }
    }

    #[test]
    fn test_properties() {
        let props = MaterialFamily::CarbonSteel.properties();
        assert_eq!(props.temperature_limit_f, 800.0);
        assert_eq!(props.elastic_modulus_psi, 29.0e6);

        // Stainless tolerates more heat and grows more per degree
        let ss = MaterialFamily::StainlessSteel.properties();
        assert!(ss.temperature_limit_f > props.temperature_limit_f);
        assert!(ss.thermal_expansion_per_f > props.thermal_expansion_per_f);
    }

    #[test]
    fn test_serialization() {
        let family = MaterialFamily::StainlessSteel;
        let json = serde_json::to_string(&family).unwrap();
        assert_eq!(json, "\"stainless_steel\"");
        let roundtrip: MaterialFamily = serde_json::from_str(&json).unwrap();
        assert_eq!(family, roundtrip);
    }

    #[test]
    fn test_display() {
        assert_eq!(MaterialFamily::NickelAlloy.to_string(), "Nickel Alloy");
        assert_eq!(MaterialFamily::default(), MaterialFamily::CarbonSteel);
    }
}
