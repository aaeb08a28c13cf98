//! HTTP Verifier Implementation
//!
//! Implements the [`Verifier`] port against the verifier service's JSON and
//! multipart endpoints using `reqwest`.

use crate::application::config::LivenessConfig;
use crate::domain::entities::Frame;
use crate::domain::ports::Verifier;
use crate::domain::value_objects::{AgePrediction, VerifierResponse};
use crate::error::{LivenessError, LivenessResult};
use crate::infra::dto::{PredictResponse, ProcessFrameRequest, ProcessFrameResponse};
use platform::encoding::JPEG_MIME;
use platform::http::{build_client, join_url};
use reqwest::multipart;

/// Multipart part carrying the still for age estimation
const IMAGE_PART: &str = "image";
const IMAGE_FILENAME: &str = "capture.jpg";

/// Verifier reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpVerifier {
    client: reqwest::Client,
    start_session_url: String,
    process_frame_url: String,
    predict_url: String,
}

impl HttpVerifier {
    pub fn new(config: &LivenessConfig) -> LivenessResult<Self> {
        let client = build_client(&config.http_client_config())?;
        Self::with_client(client, config)
    }

    /// Use an existing client (shared connection pool)
    pub fn with_client(client: reqwest::Client, config: &LivenessConfig) -> LivenessResult<Self> {
        let base = &config.verifier_base_url;
        Ok(Self {
            client,
            start_session_url: join_url(base, &config.start_session_path)?,
            process_frame_url: join_url(base, &config.process_frame_path)?,
            predict_url: join_url(base, &config.predict_path)?,
        })
    }

    pub fn process_frame_url(&self) -> &str {
        &self.process_frame_url
    }
}

impl Verifier for HttpVerifier {
    async fn start_session(&self) -> LivenessResult<()> {
        let response = self.client.post(&self.start_session_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %self.start_session_url, status = status.as_u16(), "Session start rejected");
            return Err(LivenessError::UnexpectedStatus(status.as_u16()));
        }

        tracing::debug!(url = %self.start_session_url, "Session start acknowledged");
        Ok(())
    }

    async fn submit_frame(&self, frame: &Frame) -> LivenessResult<VerifierResponse> {
        let data_url = frame.to_data_url();
        let response = self
            .client
            .post(&self.process_frame_url)
            .json(&ProcessFrameRequest { frame: &data_url })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LivenessError::UnexpectedStatus(status.as_u16()));
        }

        let body = response.bytes().await?;
        let dto: ProcessFrameResponse = serde_json::from_slice(&body)?;
        let verdict = VerifierResponse::try_from(dto)?;

        tracing::debug!(frame_id = %frame.id, verdict = ?verdict, "Frame evaluated");
        Ok(verdict)
    }

    async fn predict_age(&self, frame: &Frame) -> LivenessResult<AgePrediction> {
        let part = multipart::Part::bytes(frame.jpeg().to_vec())
            .file_name(IMAGE_FILENAME)
            .mime_str(JPEG_MIME)?;
        let form = multipart::Form::new().part(IMAGE_PART, part);

        let response = self
            .client
            .post(&self.predict_url)
            .multipart(form)
            .send()
            .await?;

        // Error answers (400/500) still carry a JSON body with `error`
        let status = response.status();
        let body = response.bytes().await?;
        match serde_json::from_slice::<PredictResponse>(&body) {
            Ok(dto) => {
                if !status.is_success() {
                    tracing::warn!(status = status.as_u16(), error = ?dto.error, "Age estimation rejected");
                }
                Ok(dto.into())
            }
            Err(_) if !status.is_success() => Err(LivenessError::UnexpectedStatus(status.as_u16())),
            Err(e) => Err(e.into()),
        }
    }
}
