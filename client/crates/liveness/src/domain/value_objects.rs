//! Domain Value Objects
//!
//! Immutable value types for the liveness domain.

use derive_more::Display;
use std::str::FromStr;

/// Opaque challenge label issued by the verifier
///
/// The client never interprets a label beyond display and comparison with
/// the two terminal sentinels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub struct ChallengeLabel(String);

impl ChallengeLabel {
    /// Sentinel reported when every challenge has been passed
    pub const DONE: &'static str = "done";
    /// Sentinel reported on spoof detection or non-compliance
    pub const FAILED: &'static str = "failed";

    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_done(&self) -> bool {
        self.0 == Self::DONE
    }

    pub fn is_failed(&self) -> bool {
        self.0 == Self::FAILED
    }

    pub fn is_terminal(&self) -> bool {
        self.is_done() || self.is_failed()
    }
}

impl From<&str> for ChallengeLabel {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

/// Camera selector requested when acquiring a capture stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum FacingMode {
    /// Front camera
    #[default]
    #[display("user")]
    User,
    /// Rear camera
    #[display("environment")]
    Environment,
}

impl FacingMode {
    pub fn toggled(self) -> Self {
        match self {
            FacingMode::User => FacingMode::Environment,
            FacingMode::Environment => FacingMode::User,
        }
    }
}

impl FromStr for FacingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" | "front" => Ok(FacingMode::User),
            "environment" | "rear" | "back" => Ok(FacingMode::Environment),
            other => Err(format!("unknown facing mode: {other}")),
        }
    }
}

/// Verifier verdict for one submitted frame
///
/// Transport and parse failures are not a variant: they surface as
/// `Err(LivenessError)` from the verifier port.
#[derive(Debug, Clone, PartialEq)]
pub enum VerifierResponse {
    /// Session still running; `passed` tells whether the current challenge
    /// was just satisfied
    InProgress {
        challenge: ChallengeLabel,
        message: String,
        passed: bool,
        next_challenge: Option<ChallengeLabel>,
    },
    /// Every challenge passed
    Done { message: String },
    /// Spoof or non-compliance detected
    Failed { message: String },
}

impl VerifierResponse {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, VerifierResponse::InProgress { .. })
    }
}

/// Result of the single-shot age estimation
#[derive(Debug, Clone, PartialEq)]
pub enum AgePrediction {
    /// Model produced an age estimate, in years
    Estimated(f64),
    /// Verifier refused, with its reason when one was given
    Rejected(Option<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_sentinels() {
        assert!(ChallengeLabel::new("done").is_done());
        assert!(ChallengeLabel::new("failed").is_failed());
        assert!(ChallengeLabel::new("failed").is_terminal());
        assert!(!ChallengeLabel::new("blink").is_terminal());
        // Labels are compared verbatim
        assert!(!ChallengeLabel::new("Done").is_done());
    }

    #[test]
    fn test_challenge_display() {
        assert_eq!(ChallengeLabel::from("turn_left").to_string(), "turn_left");
    }

    #[test]
    fn test_facing_mode_toggle() {
        assert_eq!(FacingMode::User.toggled(), FacingMode::Environment);
        assert_eq!(FacingMode::Environment.toggled(), FacingMode::User);
        assert_eq!(FacingMode::default(), FacingMode::User);
    }

    #[test]
    fn test_facing_mode_parse() {
        assert_eq!("front".parse::<FacingMode>(), Ok(FacingMode::User));
        assert_eq!("Environment".parse::<FacingMode>(), Ok(FacingMode::Environment));
        assert_eq!("rear".parse::<FacingMode>(), Ok(FacingMode::Environment));
        assert!("sideways".parse::<FacingMode>().is_err());
        assert_eq!(FacingMode::Environment.to_string(), "environment");
    }
}
