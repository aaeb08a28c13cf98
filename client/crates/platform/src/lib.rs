//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Base64 and data-URL encoding of captured stills
//! - JPEG header inspection (frame dimensions)
//! - HTTP client construction for the remote verifier
//! - Cancellable repeating and one-shot timers

pub mod encoding;
pub mod http;
pub mod jpeg;
pub mod timer;
