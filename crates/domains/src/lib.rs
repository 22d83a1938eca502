//! # Domain Models and Ports
//!
//! Server-origin records, the display-ready feed model, and the two port
//! traits every adapter must implement to collaborate with the engine.

pub mod error;
pub mod models;
pub mod ports;

pub use error::{FeedError, FieldError, Result};
