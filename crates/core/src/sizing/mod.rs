//! Garment size recommendation engine.
//!
//! A pure, deterministic rule chain: base size from the primary body
//! measurement, then a fit-preference nudge, then a BMI nudge, each
//! appending a human-readable rationale when it changes the outcome. The
//! same input always produces the same [`SizeRecommendation`].

mod engine;
mod label;
mod profile;

pub use engine::{SizeRecommendation, recommend};
pub use label::{AlphaSize, SizeLabel};
pub use profile::{FitPreference, GarmentType, MeasurementProfile, parse_measurement};
