//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (Session, Frame)
//! - Domain value objects (ChallengeLabel, FacingMode, VerifierResponse)
//! - The session state machine and per-challenge countdown
//! - Port traits (Verifier, CaptureDevice, VideoStream)

pub mod countdown;
pub mod entities;
pub mod ports;
pub mod state_machine;
pub mod value_objects;
pub mod view;
