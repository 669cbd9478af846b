//! The cumulative in-memory store of ingested call records.
//!
//! A [`Dataset`] holds the union of every upload in the session with
//! exact-duplicate rows collapsed to one. It is replaced wholesale by
//! [`Dataset::merge`] on each successful upload and never edited in place.

use std::collections::HashSet;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use callboard_core::error::{DashboardError, Result};
use callboard_core::models::{FilterSelection, Record};

// ── Dataset ───────────────────────────────────────────────────────────────────

/// The session's cumulative, de-duplicated collection of call records.
///
/// Insertion order is not semantically significant; every derived view sorts
/// its own output for determinism.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset from freshly loaded records, collapsing duplicates
    /// within the batch itself.
    pub fn from_records(records: Vec<Record>) -> Self {
        Self::new().merge(records)
    }

    /// Return a new dataset equal to the row-wise union of `self` and
    /// `incoming`, with exact-duplicate rows removed.
    ///
    /// Never mutates `self`; merging the same batch twice yields an equal
    /// dataset (idempotent).
    pub fn merge(&self, incoming: Vec<Record>) -> Dataset {
        let mut seen: HashSet<Record> = self.records.iter().cloned().collect();
        let mut records = self.records.clone();
        for record in incoming {
            if seen.insert(record.clone()) {
                records.push(record);
            }
        }
        Dataset { records }
    }

    /// All records currently held.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // ── Filter selection ──────────────────────────────────────────────────

    /// Distinct years present in the dataset, newest first.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self
            .records
            .iter()
            .map(|r| r.date.year())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years
    }

    /// Distinct months with records in `year`, in calendar order.
    ///
    /// Fails with [`DashboardError::EmptySelection`] when the year has no
    /// records at all.
    pub fn months_in(&self, year: i32) -> Result<Vec<u32>> {
        let mut months: Vec<u32> = self
            .records
            .iter()
            .filter(|r| r.date.year() == year)
            .map(|r| r.date.month())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        if months.is_empty() {
            return Err(DashboardError::EmptySelection(year));
        }
        months.sort_unstable();
        Ok(months)
    }

    /// The subset of records falling in the selected year and month.
    pub fn filter_month(&self, selection: FilterSelection) -> Vec<Record> {
        self.records
            .iter()
            .filter(|r| r.date.year() == selection.year && r.date.month() == selection.month)
            .cloned()
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
