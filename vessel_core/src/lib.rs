//! # vessel_core - Pressure Vessel & Piping Calculation Engine
//!
//! `vessel_core` is the computational heart of VesselCalc, providing
//! pressure-vessel and piping design-code calculations with a clean,
//! LLM-friendly API. All inputs and outputs are JSON-serializable, making
//! it ideal for integration with AI assistants via MCP or similar protocols.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results;
//!   identical inputs always produce identical outputs
//! - **JSON-First**: All types implement Serialize/Deserialize, and the
//!   process boundary is a JSON mapping in and a JSON mapping out
//! - **Rich Errors**: Structured error types, not just strings; infeasible
//!   designs fail explicitly instead of returning malformed numbers
//! - **Well-Documented**: Every type and function has examples
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use vessel_core::calculate;
//!
//! let inputs = json!({
//!     "calculation_type": "cylindrical_shell",
//!     "design_pressure_psi": 150.0,
//!     "inside_radius_in": 24.0,
//!     "allowable_stress_psi": 20000.0,
//!     "joint_efficiency": 1.0,
//!     "corrosion_allowance_in": 0.125
//! })
//! .as_object()
//! .unwrap()
//! .clone();
//!
//! let outputs = calculate("asme_viii_div_1", &inputs).unwrap();
//! let thickness = outputs["required_thickness_in"].as_f64().unwrap();
//! assert!(thickness > 0.18 && thickness < 0.19);
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - All calculator variants (ASME VIII, EN 13445,
//!   API 579, pipe stress, loads, safety factors)
//! - [`factory`] - Calculator-type key resolution and dispatch
//! - [`materials`] - Material family property database
//! - [`units`] - Pressure/length/temperature unit conversion
//! - [`request`] - Input/output mapping boundary
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod errors;
pub mod factory;
pub mod materials;
pub mod request;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use errors::{CalcError, CalcResult};
pub use factory::{calculate, validate_inputs, CalculatorKind};
pub use request::{CalculationRequest, CalculationResult, InputMap, OutputMap};
pub use units::{convert as convert_units, Quantity, UnitConversion};
