//! Data layer for Callboard.
//!
//! Responsible for parsing uploaded CSV/spreadsheet files into call records,
//! maintaining the cumulative de-duplicated dataset across uploads, running
//! the year/month filter and aggregation engine, and exporting filtered
//! subsets back to raw CSV.

pub mod aggregate;
pub mod export;
pub mod reader;
pub mod store;

pub use callboard_core as core;
