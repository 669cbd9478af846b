//! Session runtime for Callboard.
//!
//! Owns the cumulative dataset for one user session, applies uploads with
//! commit-on-success semantics, and recomputes filter availability and
//! aggregate views per request. Also provides logging bootstrap for host
//! applications embedding the core.

pub mod bootstrap;
pub mod session;

pub use callboard_core as core;
pub use callboard_data as data;
