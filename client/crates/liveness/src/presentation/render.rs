//! Operator-facing text

use crate::application::age_estimation::AgeEstimate;
use crate::domain::value_objects::AgePrediction;
use crate::domain::view::{Phase, SessionView, StatusLine};

/// `Challenge: <label>`, or empty before the verifier has named one
pub fn challenge_text(view: &SessionView) -> String {
    match &view.challenge {
        Some(label) => format!("Challenge: {label}"),
        None => String::new(),
    }
}

pub fn status_text(status: &StatusLine) -> String {
    match status {
        StatusLine::Blank => String::new(),
        StatusLine::Started => "Session started. Look at the camera.".to_string(),
        StatusLine::Verifier(message) => message.clone(),
        StatusLine::Passed {
            challenge,
            next: Some(next),
            ..
        } => format!("Passed: {challenge}. Next: {next}"),
        StatusLine::Passed {
            challenge, message, ..
        } => {
            if message.is_empty() {
                format!("Passed: {challenge}")
            } else {
                format!("Passed: {challenge}. {message}")
            }
        }
        StatusLine::Resumed => "Perform the next challenge.".to_string(),
        StatusLine::ConnectionIssue => "Connection problem, retrying...".to_string(),
        StatusLine::Succeeded(message) => format!("Verification complete: {message}"),
        StatusLine::Failed(message) => format!("Verification failed: {message}"),
        StatusLine::Cancelled => "Session cancelled.".to_string(),
    }
}

/// Seconds left, blank before the first countdown
pub fn countdown_text(view: &SessionView) -> String {
    view.countdown
        .map(|remaining| format!("{remaining}s"))
        .unwrap_or_default()
}

/// Single-line summary used by the terminal front end
pub fn session_line(view: &SessionView) -> String {
    let mut parts = vec![format!("[{}]", view.phase)];
    for text in [
        challenge_text(view),
        status_text(&view.status),
        if view.phase == Phase::Sampling || view.phase == Phase::Paused {
            countdown_text(view)
        } else {
            String::new()
        },
    ] {
        if !text.is_empty() {
            parts.push(text);
        }
    }
    parts.join(" | ")
}

pub fn age_text(estimate: &AgeEstimate) -> String {
    match estimate {
        AgeEstimate::Answered(AgePrediction::Estimated(age)) => {
            format!("{} years", format_age(*age))
        }
        AgeEstimate::Answered(AgePrediction::Rejected(reason)) => {
            format!("Error: {}", reason.as_deref().unwrap_or("Unknown error"))
        }
        AgeEstimate::SendFailed => "Error sending image to server".to_string(),
        AgeEstimate::CameraNotReady => "Camera not ready".to_string(),
    }
}

fn format_age(age: f64) -> String {
    if age.fract() == 0.0 {
        format!("{age:.0}")
    } else {
        format!("{age:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ChallengeLabel;

    #[test]
    fn test_challenge_text() {
        let mut view = SessionView::default();
        assert_eq!(challenge_text(&view), "");
        view.challenge = Some(ChallengeLabel::from("blink"));
        assert_eq!(challenge_text(&view), "Challenge: blink");
    }

    #[test]
    fn test_passed_status_mentions_next_challenge() {
        let status = StatusLine::Passed {
            challenge: "blink".into(),
            next: Some("turnHead".into()),
            message: "ok".to_string(),
        };
        assert_eq!(status_text(&status), "Passed: blink. Next: turnHead");

        let last = StatusLine::Passed {
            challenge: "turnHead".into(),
            next: None,
            message: "ok".to_string(),
        };
        assert_eq!(status_text(&last), "Passed: turnHead. ok");
    }

    #[test]
    fn test_terminal_status_texts() {
        assert_eq!(
            status_text(&StatusLine::Succeeded("Verified".to_string())),
            "Verification complete: Verified"
        );
        assert_eq!(
            status_text(&StatusLine::Failed("Spoof Detected (timeout)".to_string())),
            "Verification failed: Spoof Detected (timeout)"
        );
    }

    #[test]
    fn test_session_line_hides_countdown_when_settled() {
        let mut view = SessionView {
            phase: Phase::Sampling,
            challenge: Some("blink".into()),
            status: StatusLine::Verifier("keep trying".to_string()),
            countdown: Some(7),
            attempt: 1,
        };
        assert_eq!(
            session_line(&view),
            "[Sampling] | Challenge: blink | keep trying | 7s"
        );

        view.phase = Phase::Done;
        view.status = StatusLine::Succeeded("Verified".to_string());
        assert_eq!(
            session_line(&view),
            "[Done] | Challenge: blink | Verification complete: Verified"
        );
    }

    #[test]
    fn test_age_texts() {
        assert_eq!(
            age_text(&AgeEstimate::Answered(AgePrediction::Estimated(34.0))),
            "34 years"
        );
        assert_eq!(
            age_text(&AgeEstimate::Answered(AgePrediction::Estimated(29.46))),
            "29.5 years"
        );
        assert_eq!(
            age_text(&AgeEstimate::Answered(AgePrediction::Rejected(Some(
                "No file uploaded".to_string()
            )))),
            "Error: No file uploaded"
        );
        assert_eq!(
            age_text(&AgeEstimate::Answered(AgePrediction::Rejected(None))),
            "Error: Unknown error"
        );
        assert_eq!(age_text(&AgeEstimate::SendFailed), "Error sending image to server");
        assert_eq!(age_text(&AgeEstimate::CameraNotReady), "Camera not ready");
    }
}
