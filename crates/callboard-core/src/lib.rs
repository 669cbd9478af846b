//! Core domain types for Callboard.
//!
//! Holds the call-event record model, the error taxonomy, the single
//! rounding rule every displayed metric goes through, and display formatting
//! helpers shared by downstream crates.

pub mod calculations;
pub mod error;
pub mod formatting;
pub mod models;
