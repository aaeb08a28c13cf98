//! Age Estimation Use Case
//!
//! One frame, one request, one answer. Independent of any challenge session.

use crate::application::sampler::{SharedSampler, lock_sampler};
use crate::domain::ports::Verifier;
use crate::domain::value_objects::AgePrediction;
use crate::error::{LivenessError, LivenessResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Result of one estimation attempt, ready to render
#[derive(Debug, Clone, PartialEq)]
pub enum AgeEstimate {
    /// Verifier answered
    Answered(AgePrediction),
    /// Sampler had no sized frame
    CameraNotReady,
    /// Request did not complete
    SendFailed,
}

pub struct AgeEstimationUseCase<V>
where
    V: Verifier,
{
    verifier: Arc<V>,
    sampler: SharedSampler,
    busy: AtomicBool,
}

impl<V> AgeEstimationUseCase<V>
where
    V: Verifier,
{
    pub fn new(verifier: Arc<V>, sampler: SharedSampler) -> Self {
        Self {
            verifier,
            sampler,
            busy: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Capture one frame and ask the verifier for an age estimate
    ///
    /// ## Returns
    /// * `Ok(AgeEstimate)` - anything the operator should see
    /// * `Err(LivenessError::Busy)` - another estimation is still running
    pub async fn execute(&self) -> LivenessResult<AgeEstimate> {
        if self.busy.swap(true, Ordering::SeqCst) {
            return Err(LivenessError::Busy);
        }
        let _guard = BusyGuard(&self.busy);

        let frame = lock_sampler(&self.sampler).capture();
        let Some(frame) = frame else {
            tracing::warn!("Age estimation requested before camera produced a frame");
            return Ok(AgeEstimate::CameraNotReady);
        };

        match self.verifier.predict_age(&frame).await {
            Ok(prediction) => {
                match &prediction {
                    AgePrediction::Estimated(age) => {
                        tracing::info!(frame_id = %frame.id, age, "Age estimated");
                    }
                    AgePrediction::Rejected(reason) => {
                        tracing::info!(frame_id = %frame.id, reason = ?reason, "Age estimation rejected");
                    }
                }
                Ok(AgeEstimate::Answered(prediction))
            }
            Err(e) => {
                e.log();
                Ok(AgeEstimate::SendFailed)
            }
        }
    }
}

/// Clears the busy flag on every exit path
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::sampler::FrameSampler;
    use crate::domain::value_objects::FacingMode;
    use crate::infra::static_device::StaticDevice;
    use crate::test_support::{ScriptedVerifier, sample_jpeg};

    fn sampler(started: bool) -> SharedSampler {
        let mut sampler = FrameSampler::new(
            Box::new(StaticDevice::new("test", sample_jpeg(8, 8))),
            FacingMode::User,
        );
        if started {
            sampler.start_camera(FacingMode::User).unwrap();
        }
        sampler.into_shared()
    }

    #[tokio::test]
    async fn test_estimate_is_returned() {
        let verifier = Arc::new(
            ScriptedVerifier::new().with_prediction(Ok(AgePrediction::Estimated(27.0))),
        );
        let use_case = AgeEstimationUseCase::new(Arc::clone(&verifier), sampler(true));

        let estimate = use_case.execute().await.unwrap();
        assert_eq!(estimate, AgeEstimate::Answered(AgePrediction::Estimated(27.0)));
        assert_eq!(verifier.predicts(), 1);
        assert!(!use_case.is_busy());
    }

    #[tokio::test]
    async fn test_camera_not_ready_skips_request() {
        let verifier = Arc::new(ScriptedVerifier::new());
        let use_case = AgeEstimationUseCase::new(Arc::clone(&verifier), sampler(false));

        assert_eq!(use_case.execute().await.unwrap(), AgeEstimate::CameraNotReady);
        assert_eq!(verifier.predicts(), 0);
        assert!(!use_case.is_busy());
    }

    #[tokio::test]
    async fn test_transport_failure_is_reported_as_send_failed() {
        let verifier = Arc::new(
            ScriptedVerifier::new().with_prediction(Err(LivenessError::UnexpectedStatus(502))),
        );
        let use_case = AgeEstimationUseCase::new(verifier, sampler(true));

        assert_eq!(use_case.execute().await.unwrap(), AgeEstimate::SendFailed);
    }

    #[tokio::test]
    async fn test_rejection_carries_reason() {
        let verifier = Arc::new(ScriptedVerifier::new().with_prediction(Ok(
            AgePrediction::Rejected(Some("No face detected".to_string())),
        )));
        let use_case = AgeEstimationUseCase::new(verifier, sampler(true));

        assert_eq!(
            use_case.execute().await.unwrap(),
            AgeEstimate::Answered(AgePrediction::Rejected(Some("No face detected".to_string())))
        );
    }

    #[tokio::test]
    async fn test_second_request_while_busy_is_rejected() {
        let verifier = Arc::new(ScriptedVerifier::new());
        let use_case = AgeEstimationUseCase::new(verifier, sampler(true));

        use_case.busy.store(true, Ordering::SeqCst);
        assert!(matches!(use_case.execute().await, Err(LivenessError::Busy)));

        use_case.busy.store(false, Ordering::SeqCst);
        assert!(use_case.execute().await.is_ok());
    }
}
