//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.
//! Contains the session controller, the frame sampler and the age
//! estimation use case.

pub mod age_estimation;
pub mod config;
pub mod controller;
pub mod sampler;
