//! Size recommendation endpoint.
//!
//! Thin parsing shim over the core engine: measurement fields arrive as the
//! free-text form strings the frontend collected, and anything that does
//! not parse as a positive number simply counts as "not provided". The
//! engine itself never fails; the frontend decides whether to require at
//! least one measurement before calling.

use axum::{Json, response::IntoResponse};
use serde::Deserialize;
use tracing::instrument;

use pilot_wardrobe_core::sizing::{
    self, FitPreference, GarmentType, MeasurementProfile, parse_measurement,
};

/// Size recommendation request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeRecommendationRequest {
    pub garment_type: GarmentType,
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub chest: Option<String>,
    #[serde(default)]
    pub waist: Option<String>,
    #[serde(default)]
    pub inseam: Option<String>,
    #[serde(default)]
    pub preferred_fit: FitPreference,
}

impl SizeRecommendationRequest {
    fn profile(&self) -> MeasurementProfile {
        MeasurementProfile {
            height: parse_field(self.height.as_deref()),
            weight: parse_field(self.weight.as_deref()),
            chest: parse_field(self.chest.as_deref()),
            waist: parse_field(self.waist.as_deref()),
            inseam: parse_field(self.inseam.as_deref()),
            preferred_fit: self.preferred_fit,
        }
    }
}

fn parse_field(raw: Option<&str>) -> Option<f64> {
    raw.and_then(parse_measurement)
}

/// Recommend a size for the submitted garment type and measurements.
#[instrument(skip(request))]
pub async fn recommend(Json(request): Json<SizeRecommendationRequest>) -> impl IntoResponse {
    let recommendation = sizing::recommend(request.garment_type, &request.profile());
    Json(recommendation)
}
