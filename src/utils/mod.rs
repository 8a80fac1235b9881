//! # Utilities Module
//!
//! Cross-cutting helpers that don't belong in domain-specific modules.
//!
//! ## Sub-modules
//! - `telemetry`: progress ticks and cooperative cancellation

pub mod telemetry;

pub use telemetry::RunMonitor;
