//! Verifier wire DTOs (Data Transfer Objects)

use crate::domain::value_objects::{AgePrediction, ChallengeLabel, VerifierResponse};
use crate::error::LivenessError;
use serde::{Deserialize, Serialize};

/// Request for POST /process_frame
#[derive(Debug, Clone, Serialize)]
pub struct ProcessFrameRequest<'a> {
    /// `data:image/jpeg;base64,...`
    pub frame: &'a str,
}

/// Response for POST /process_frame
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessFrameResponse {
    pub challenge: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub passed: bool,
    #[serde(default)]
    pub next_challenge: Option<String>,
}

impl TryFrom<ProcessFrameResponse> for VerifierResponse {
    type Error = LivenessError;

    fn try_from(dto: ProcessFrameResponse) -> Result<Self, Self::Error> {
        let challenge = ChallengeLabel::new(dto.challenge);
        if challenge.as_str().is_empty() {
            return Err(LivenessError::MalformedResponse(
                "empty challenge label".to_string(),
            ));
        }
        if challenge.is_done() {
            return Ok(VerifierResponse::Done {
                message: dto.message,
            });
        }
        if challenge.is_failed() {
            return Ok(VerifierResponse::Failed {
                message: dto.message,
            });
        }
        Ok(VerifierResponse::InProgress {
            challenge,
            message: dto.message,
            passed: dto.passed,
            next_challenge: dto
                .next_challenge
                .filter(|next| !next.is_empty())
                .map(ChallengeLabel::new),
        })
    }
}

/// Response for POST /predict
///
/// Success and error bodies share one shape; either field may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub predicted_age: Option<f64>,
    #[serde(default)]
    pub error: Option<String>,
}

impl From<PredictResponse> for AgePrediction {
    fn from(dto: PredictResponse) -> Self {
        match dto.predicted_age {
            Some(age) => AgePrediction::Estimated(age),
            None => AgePrediction::Rejected(dto.error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<VerifierResponse, LivenessError> {
        serde_json::from_str::<ProcessFrameResponse>(json)?.try_into()
    }

    #[test]
    fn test_request_shape() {
        let json = serde_json::to_value(ProcessFrameRequest {
            frame: "data:image/jpeg;base64,AAAA",
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"frame": "data:image/jpeg;base64,AAAA"}));
    }

    #[test]
    fn test_in_progress_with_next_challenge() {
        let response = parse(
            r#"{"challenge":"blink","message":"Blink detected","passed":true,"next_challenge":"Turn your face to the left"}"#,
        )
        .unwrap();
        assert_eq!(
            response,
            VerifierResponse::InProgress {
                challenge: "blink".into(),
                message: "Blink detected".to_string(),
                passed: true,
                next_challenge: Some("Turn your face to the left".into()),
            }
        );
    }

    #[test]
    fn test_done_ignores_passed_flag() {
        let response =
            parse(r#"{"challenge":"done","message":"All challenges passed!","passed":true}"#)
                .unwrap();
        assert_eq!(
            response,
            VerifierResponse::Done {
                message: "All challenges passed!".to_string()
            }
        );
    }

    #[test]
    fn test_failed_sentinel() {
        let response = parse(
            r#"{"challenge":"failed","message":"Spoof Detected (timeout)","passed":false}"#,
        )
        .unwrap();
        assert!(matches!(response, VerifierResponse::Failed { .. }));
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let response = parse(r#"{"challenge":"alignment"}"#).unwrap();
        assert_eq!(
            response,
            VerifierResponse::InProgress {
                challenge: "alignment".into(),
                message: String::new(),
                passed: false,
                next_challenge: None,
            }
        );
    }

    #[test]
    fn test_missing_challenge_is_malformed() {
        assert!(matches!(
            parse(r#"{"message":"hi","passed":false}"#),
            Err(LivenessError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse(r#"{"challenge":"","passed":false}"#),
            Err(LivenessError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_predict_response_variants() {
        let ok: PredictResponse = serde_json::from_str(r#"{"predicted_age":34}"#).unwrap();
        assert_eq!(AgePrediction::from(ok), AgePrediction::Estimated(34.0));

        let err: PredictResponse =
            serde_json::from_str(r#"{"error":"No file uploaded"}"#).unwrap();
        assert_eq!(
            AgePrediction::from(err),
            AgePrediction::Rejected(Some("No file uploaded".to_string()))
        );

        let empty: PredictResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(AgePrediction::from(empty), AgePrediction::Rejected(None));
    }
}
