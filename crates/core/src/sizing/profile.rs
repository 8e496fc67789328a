//! Size engine inputs: garment types, fit preference, body measurements.

use serde::{Deserialize, Serialize};

/// Garment categories the engine can size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GarmentType {
    Shirt,
    Pants,
    Jacket,
    FullUniform,
}

impl GarmentType {
    /// Whether torso measurements (chest, height) drive the size label.
    #[must_use]
    pub const fn is_upper_body(self) -> bool {
        matches!(self, Self::Shirt | Self::Jacket | Self::FullUniform)
    }

    /// Whether waist and inseam are relevant.
    #[must_use]
    pub const fn is_lower_body(self) -> bool {
        matches!(self, Self::Pants | Self::FullUniform)
    }
}

/// How the customer likes their uniform to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitPreference {
    Slim,
    #[default]
    Standard,
    Relaxed,
}

/// Body measurements for a recommendation. Absent means "not provided",
/// never zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeasurementProfile {
    /// Height in cm.
    pub height: Option<f64>,
    /// Weight in kg.
    pub weight: Option<f64>,
    /// Chest circumference in cm.
    pub chest: Option<f64>,
    /// Waist circumference in cm.
    pub waist: Option<f64>,
    /// Inseam length in cm.
    pub inseam: Option<f64>,
    pub preferred_fit: FitPreference,
}

impl MeasurementProfile {
    /// How many of the five measurement fields were actually provided
    /// (not defaulted). Feeds the confidence score.
    #[must_use]
    pub const fn provided_count(&self) -> usize {
        self.height.is_some() as usize
            + self.weight.is_some() as usize
            + self.chest.is_some() as usize
            + self.waist.is_some() as usize
            + self.inseam.is_some() as usize
    }
}

/// Parse one measurement form field.
///
/// Measurements arrive as free-text form input. Anything that is not a
/// finite positive number counts as "not provided".
#[must_use]
pub fn parse_measurement(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}
