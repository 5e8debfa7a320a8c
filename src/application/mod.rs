//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic according to the loaded settings.

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
