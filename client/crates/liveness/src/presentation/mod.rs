//! Presentation Layer
//!
//! Turns session views and age estimates into operator text.

pub mod render;
