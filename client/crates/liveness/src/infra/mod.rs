//! Infrastructure Layer - Adapters for the port traits
//!
//! - `http_verifier` - Verifier over HTTP (`reqwest`)
//! - `directory_device` / `static_device` - Capture devices

pub mod directory_device;
pub mod dto;
pub mod http_verifier;
pub mod static_device;
