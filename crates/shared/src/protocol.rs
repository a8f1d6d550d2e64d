use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{FieldValue, FormInput};

/// JSON body for `POST /api/predict`: feature names mapped to coerced
/// values. Immutable once sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct PredictionRequest {
    pub fields: BTreeMap<String, FieldValue>,
}

impl PredictionRequest {
    pub fn from_form(input: &FormInput) -> Self {
        let fields = input
            .iter()
            .map(|(name, raw)| (name.to_string(), FieldValue::coerce(raw)))
            .collect();
        Self { fields }
    }
}

/// Reply from `POST /api/predict`. `predicted_price` is present iff
/// `success`; `error` is present iff not. `formatted_price` is a
/// server-side convenience string the client ignores for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_price: Option<String>,
}

/// Reply from `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub model_loaded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_path: Option<String>,
}

/// Reply from `GET /api/features`: the ordered feature columns the
/// model expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureListResponse {
    pub features: Vec<String>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_numbers_unquoted_and_strings_quoted() {
        let mut input = FormInput::new();
        input.set("LotArea", "9600");
        input.set("RoofStyle", "Gable");
        input.set("Remarks", "");

        let request = PredictionRequest::from_form(&input);
        let json = serde_json::to_string(&request).expect("serialize");
        assert_eq!(
            json,
            r#"{"LotArea":9600,"Remarks":"","RoofStyle":"Gable"}"#
        );
    }

    #[test]
    fn parses_success_response() {
        let body: PredictionResponse = serde_json::from_str(
            r#"{"success": true, "predicted_price": 180921.4, "formatted_price": "$180,921.40"}"#,
        )
        .expect("parse");
        assert!(body.success);
        assert_eq!(body.predicted_price, Some(180_921.4));
        assert_eq!(body.error, None);
    }

    #[test]
    fn parses_failure_response_without_price() {
        let body: PredictionResponse =
            serde_json::from_str(r#"{"success": false, "error": "Model not loaded"}"#)
                .expect("parse");
        assert!(!body.success);
        assert_eq!(body.predicted_price, None);
        assert_eq!(body.error.as_deref(), Some("Model not loaded"));
    }

    #[test]
    fn parses_health_response_with_and_without_extras() {
        let body: HealthResponse = serde_json::from_str(
            r#"{"status": "healthy", "model_loaded": true, "model_path": "mlruns/0/model.pkl"}"#,
        )
        .expect("parse");
        assert!(body.model_loaded);
        assert_eq!(body.status.as_deref(), Some("healthy"));

        let minimal: HealthResponse =
            serde_json::from_str(r#"{"model_loaded": false}"#).expect("parse");
        assert!(!minimal.model_loaded);
        assert_eq!(minimal.model_path, None);
    }
}
