//! The recommendation rule chain.

use serde::Serialize;

use super::label::{AlphaSize, SizeLabel};
use super::profile::{FitPreference, GarmentType, MeasurementProfile};

/// Fallback height in cm when none was provided.
const DEFAULT_HEIGHT_CM: f64 = 175.0;
/// Fallback weight in kg when none was provided.
const DEFAULT_WEIGHT_KG: f64 = 75.0;
/// BMI above which the size is bumped one step.
const BMI_SIZE_UP_THRESHOLD: f64 = 27.0;

const BASE_CONFIDENCE: f64 = 0.75;
const CONFIDENCE_PER_MEASUREMENT: f64 = 0.05;
const MAX_CONFIDENCE: f64 = 0.98;

const CM_PER_INCH: f64 = 2.54;

/// A recommendation with full transparency into which rules fired.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeRecommendation {
    pub size: SizeLabel,
    /// Heuristic `[0, 1]` score reflecting how many real measurements
    /// informed the result.
    pub confidence: f64,
    /// One entry per rule that changed the outcome, in evaluation order.
    pub reasoning: Vec<String>,
}

/// Recommend a size for a garment from a measurement profile.
///
/// Pure and deterministic: no side effects, same input gives same output.
/// Missing measurements fall back to defaults rather than failing; the UI
/// decides whether a recommendation on pure defaults is worth showing.
#[must_use]
pub fn recommend(garment: GarmentType, profile: &MeasurementProfile) -> SizeRecommendation {
    let mut reasoning = Vec::new();
    let mut size = base_size(garment, profile, &mut reasoning);

    size = apply_fit_preference(size, profile.preferred_fit, &mut reasoning);
    size = apply_bmi(size, profile, &mut reasoning);

    #[allow(clippy::cast_precision_loss)] // at most five measurements
    let confidence = (CONFIDENCE_PER_MEASUREMENT
        .mul_add(profile.provided_count() as f64, BASE_CONFIDENCE))
    .min(MAX_CONFIDENCE);

    SizeRecommendation {
        size,
        confidence,
        reasoning,
    }
}

/// Base sizing by primary measurement.
fn base_size(
    garment: GarmentType,
    profile: &MeasurementProfile,
    reasoning: &mut Vec<String>,
) -> SizeLabel {
    match garment {
        GarmentType::Pants => {
            match profile.waist {
                // Still answer without a waist: fall back to the torso
                // height breakpoints.
                None => height_size(profile, reasoning),
                Some(waist) => {
                    let size = waist_inches(waist);
                    reasoning.push(format!(
                        "Waist {waist:.0} cm converts to a size {size} trouser waist"
                    ));
                    if let Some(inseam) = profile.inseam {
                        reasoning.push(format!(
                            "Inseam {inseam:.0} cm noted for length; it does not change the waist size"
                        ));
                    }
                    SizeLabel::Numeric(size)
                }
            }
        }
        GarmentType::Shirt | GarmentType::Jacket => torso_size(profile, reasoning),
        GarmentType::FullUniform => {
            // The jacket drives the uniform's label; a provided waist is
            // surfaced as a trouser note alongside it.
            let size = torso_size(profile, reasoning);
            if let Some(waist) = profile.waist {
                reasoning.push(format!(
                    "Matching trousers run around size {} for a {waist:.0} cm waist",
                    waist_inches(waist)
                ));
            }
            size
        }
    }
}

/// Chest breakpoints, falling back to height when chest is absent.
fn torso_size(profile: &MeasurementProfile, reasoning: &mut Vec<String>) -> SizeLabel {
    match profile.chest {
        None => height_size(profile, reasoning),
        Some(chest) => {
            let alpha = if chest < 92.0 {
                AlphaSize::S
            } else if chest < 102.0 {
                AlphaSize::M
            } else if chest < 112.0 {
                AlphaSize::L
            } else if chest < 122.0 {
                AlphaSize::Xl
            } else {
                AlphaSize::Xxl
            };
            reasoning.push(format!("Chest {chest:.0} cm maps to {alpha}"));
            SizeLabel::Alpha(alpha)
        }
    }
}

/// Height breakpoints, used when no girth measurement is available.
fn height_size(profile: &MeasurementProfile, reasoning: &mut Vec<String>) -> SizeLabel {
    let height = profile.height.unwrap_or(DEFAULT_HEIGHT_CM);
    let alpha = if height < 170.0 {
        AlphaSize::S
    } else if height > 185.0 {
        AlphaSize::Xl
    } else if height > 178.0 {
        AlphaSize::L
    } else {
        AlphaSize::M
    };
    if profile.height.is_some() {
        reasoning.push(format!("Height {height:.0} cm suggests {alpha}"));
    } else {
        reasoning.push(format!(
            "No girth or height measurements; starting from {alpha} for an average build"
        ));
    }
    SizeLabel::Alpha(alpha)
}

/// Fit adjustment, applied exactly once after base sizing.
fn apply_fit_preference(
    size: SizeLabel,
    fit: FitPreference,
    reasoning: &mut Vec<String>,
) -> SizeLabel {
    let adjusted = match fit {
        FitPreference::Slim => size.map_alpha(AlphaSize::slim_step_down),
        FitPreference::Standard => size,
        FitPreference::Relaxed => size.map_alpha(AlphaSize::relaxed_step_up),
    };
    if adjusted != size {
        let direction = match fit {
            FitPreference::Slim => "down",
            _ => "up",
        };
        reasoning.push(format!(
            "Sized {direction} from {size} to {adjusted} for a {} fit",
            fit_name(fit)
        ));
    }
    adjusted
}

/// BMI adjustment.
///
/// Runs after the fit nudge and compounds with it, so a slim-fit high-BMI
/// profile can land back at (or above) its base size. That ordering is a
/// quirk of the original heuristic and is kept for behavioral
/// compatibility.
fn apply_bmi(size: SizeLabel, profile: &MeasurementProfile, reasoning: &mut Vec<String>) -> SizeLabel {
    let height = profile.height.unwrap_or(DEFAULT_HEIGHT_CM);
    let weight = profile.weight.unwrap_or(DEFAULT_WEIGHT_KG);
    let bmi = weight / (height / 100.0).powi(2);

    if bmi <= BMI_SIZE_UP_THRESHOLD {
        return size;
    }
    let bumped = size.map_alpha(AlphaSize::bmi_step_up);
    if bumped != size {
        reasoning.push(format!(
            "BMI around {bmi:.1} suggests sizing up from {size} to {bumped}"
        ));
    }
    bumped
}

/// Waist in cm to an even trouser size in inches.
fn waist_inches(waist_cm: f64) -> u32 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    // measurements are parsed as finite positives
    let mut size = (waist_cm / CM_PER_INCH).round() as u32;
    if size % 2 == 1 {
        size += 1;
    }
    size
}

const fn fit_name(fit: FitPreference) -> &'static str {
    match fit {
        FitPreference::Slim => "slim",
        FitPreference::Standard => "standard",
        FitPreference::Relaxed => "relaxed",
    }
}
