// Distance Matrix HTTP adapter

use crate::parse::{parse_distance_text, parse_duration_text};
use async_trait::async_trait;
use serde::Deserialize;
use spotqueue_core::domain::{Coordinates, TravelEstimate};
use spotqueue_core::port::{TravelError, TravelEstimator};
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.distancematrix.ai";

/// Adapter configuration
#[derive(Debug, Clone)]
pub struct DistanceMatrixConfig {
    pub base_url: String,
    pub api_key: String,
    /// Fixed service point: the API measures from here to the user
    pub fixed_coordinates: Coordinates,
}

impl DistanceMatrixConfig {
    pub fn new(api_key: impl Into<String>, fixed_coordinates: Coordinates) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            fixed_coordinates,
        }
    }
}

/// Travel estimator over the Distance Matrix API
pub struct DistanceMatrixEstimator {
    config: DistanceMatrixConfig,
    client: reqwest::Client,
}

impl DistanceMatrixEstimator {
    pub fn new(config: DistanceMatrixConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn request_url(&self, destination: Coordinates) -> String {
        let origin = self.config.fixed_coordinates;
        format!(
            "{}/maps/api/distancematrix/json?origins={},{}&destinations={},{}&key={}",
            self.config.base_url,
            origin.latitude,
            origin.longitude,
            destination.latitude,
            destination.longitude,
            self.config.api_key
        )
    }
}

#[async_trait]
impl TravelEstimator for DistanceMatrixEstimator {
    async fn estimate(&self, origin: Coordinates) -> Result<TravelEstimate, TravelError> {
        let url = self.request_url(origin);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TravelError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TravelError::BadStatus(format!("HTTP {}", status)));
        }

        let body: DmxResponse = response
            .json()
            .await
            .map_err(|e| TravelError::MalformedResponse(e.to_string()))?;

        if body.status != "OK" {
            return Err(TravelError::BadStatus(body.status));
        }

        let element = body
            .rows
            .first()
            .and_then(|row| row.elements.first())
            .ok_or_else(|| {
                TravelError::MalformedResponse("response carries no route element".to_string())
            })?;

        let estimate = element.to_estimate()?;
        debug!(
            distance = estimate.distance,
            duration = estimate.duration_minutes,
            "Travel estimated"
        );

        Ok(estimate)
    }
}

#[derive(Debug, Deserialize)]
struct DmxResponse {
    status: String,
    #[serde(default)]
    rows: Vec<DmxRow>,
}

#[derive(Debug, Deserialize)]
struct DmxRow {
    #[serde(default)]
    elements: Vec<DmxElement>,
}

#[derive(Debug, Deserialize)]
struct DmxElement {
    distance: Option<DmxQuantity>,
    duration: Option<DmxQuantity>,
}

/// One reported quantity: `value` is the structured number (meters or
/// seconds), `text` the human-readable rendering
#[derive(Debug, Deserialize)]
struct DmxQuantity {
    value: Option<f64>,
    text: Option<String>,
}

impl DmxElement {
    fn to_estimate(&self) -> Result<TravelEstimate, TravelError> {
        let distance = self
            .distance
            .as_ref()
            .ok_or_else(|| TravelError::MalformedResponse("missing distance".to_string()))?;
        let duration = self
            .duration
            .as_ref()
            .ok_or_else(|| TravelError::MalformedResponse("missing duration".to_string()))?;

        // Structured fields win; free text is the fallback
        let distance_value = match distance.value {
            Some(meters) => meters / 1000.0,
            None => distance
                .text
                .as_deref()
                .and_then(parse_distance_text)
                .unwrap_or(0.0),
        };

        let duration_minutes = match duration.value {
            Some(seconds) => (seconds / 60.0) as i64,
            None => duration
                .text
                .as_deref()
                .and_then(parse_duration_text)
                .ok_or_else(|| {
                    TravelError::MalformedResponse("unparseable duration text".to_string())
                })?,
        };

        Ok(TravelEstimate::new(distance_value, duration_minutes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(json: serde_json::Value) -> DmxElement {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_structured_fields_preferred() {
        let el = element(serde_json::json!({
            "distance": { "value": 18500.0, "text": "99 km" },
            "duration": { "value": 2160.0, "text": "99 mins" }
        }));
        let estimate = el.to_estimate().unwrap();
        assert_eq!(estimate.distance, 18.5);
        assert_eq!(estimate.duration_minutes, 36);
    }

    #[test]
    fn test_text_fallback() {
        let el = element(serde_json::json!({
            "distance": { "text": "18.5 km" },
            "duration": { "text": "1 hour 12 mins" }
        }));
        let estimate = el.to_estimate().unwrap();
        assert_eq!(estimate.distance, 18.5);
        assert_eq!(estimate.duration_minutes, 72);
    }

    #[test]
    fn test_missing_fields_are_malformed() {
        let el = element(serde_json::json!({
            "duration": { "text": "5 mins" }
        }));
        assert!(matches!(
            el.to_estimate(),
            Err(TravelError::MalformedResponse(_))
        ));

        let el = element(serde_json::json!({
            "distance": { "text": "2 km" },
            "duration": { "text": "soon" }
        }));
        assert!(matches!(
            el.to_estimate(),
            Err(TravelError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_request_url_measures_from_fixed_point() {
        let config = DistanceMatrixConfig::new("test-key", Coordinates::new(24.8523464, 67.0078039));
        let estimator = DistanceMatrixEstimator::new(config);
        let url = estimator.request_url(Coordinates::new(24.8416198, 67.164574));
        assert!(url.starts_with("https://api.distancematrix.ai/maps/api/distancematrix/json?"));
        assert!(url.contains("origins=24.8523464,67.0078039"));
        assert!(url.contains("destinations=24.8416198,67.164574"));
        assert!(url.contains("key=test-key"));
    }
}
