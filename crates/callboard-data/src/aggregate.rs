//! The filter & aggregation engine.
//!
//! [`AggregateView`] is the read-only snapshot handed to the presentation
//! layer for one (year, month) selection: the filtered records plus every
//! derived count, mean, and breakdown the dashboard charts consume. All
//! grouped outputs carry a deterministic order (count descending, label
//! ascending) so chart ordering reproduces across runs.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use callboard_core::calculations::{mean, percent, round_half_to_even};
use callboard_core::models::{AgeBucket, FilterSelection, Metric, Record};

/// Number of intents reported by the top-intents breakdown.
pub const TOP_INTENT_LIMIT: usize = 5;

// ── Breakdown entry types ─────────────────────────────────────────────────────

/// One label with its record count, e.g. a tier or an intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

/// Record count for one calendar date within the selected month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Record count for one (age bucket, gender) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeGenderCount {
    pub bucket: AgeBucket,
    pub gender: String,
    pub count: usize,
}

/// Record count for one categorical label split by the repeat flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitCount {
    pub label: String,
    pub is_repeat: bool,
    pub count: usize,
}

// ── AggregateView ─────────────────────────────────────────────────────────────

/// Everything the presentation layer needs for one month view.
///
/// Recomputed in full on every filter change; never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateView {
    /// The (year, month) this view was computed for.
    pub selection: FilterSelection,
    /// The filtered subset itself, for tables and raw-CSV export.
    pub records: Vec<Record>,

    pub total_records: usize,
    pub total_repeats: usize,
    pub total_non_repeats: usize,
    /// Share of repeat calls, rounded; `Undefined` for an empty subset.
    pub repeat_percent: Metric,
    /// Exactly `100 − repeat_percent` when defined.
    pub non_repeat_percent: Metric,
    /// Rounded mean call length in minutes.
    pub avg_call_length: Metric,
    /// Rounded mean quoted wait time.
    pub avg_quoted_wait_time: Metric,
    /// Number of distinct specialists handling calls in the subset.
    pub distinct_specialist_count: usize,

    /// Tier → count over repeat calls, count descending then label ascending.
    pub tier_breakdown_repeats: Vec<LabelCount>,
    /// Tier → count over non-repeat calls, same ordering.
    pub tier_breakdown_non_repeats: Vec<LabelCount>,
    /// The five most common intents in the subset.
    pub top_intents: Vec<LabelCount>,
    /// Calls per day, ascending by date; zero-count dates are omitted.
    pub daily_counts: Vec<DailyCount>,
    /// (age bucket, gender) → count over the whole subset; records missing
    /// age or gender are excluded rather than bucketed.
    pub age_gender_breakdown: Vec<AgeGenderCount>,
    /// (msg-within-12h label, repeat flag) → count.
    pub msg_within_12h_breakdown: Vec<SplitCount>,
    /// (shift label, repeat flag) → count.
    pub shift_breakdown: Vec<SplitCount>,
}

impl AggregateView {
    /// Compute the full aggregate snapshot for a filtered subset.
    ///
    /// Never fails: an empty subset produces zero counts and `Undefined`
    /// ratios/means rather than an error.
    pub fn compute(selection: FilterSelection, records: Vec<Record>) -> Self {
        let total_records = records.len();
        let total_repeats = records.iter().filter(|r| r.is_repeat).count();
        let total_non_repeats = total_records - total_repeats;

        let repeat_percent = match percent(total_repeats, total_records) {
            Some(p) => Metric::Defined(round_half_to_even(p)),
            None => Metric::Undefined,
        };
        let non_repeat_percent = match repeat_percent {
            Metric::Defined(p) => Metric::Defined(100 - p),
            Metric::Undefined => Metric::Undefined,
        };

        let avg_call_length = rounded_mean(records.iter().filter_map(|r| r.call_length_minutes));
        let avg_quoted_wait_time = rounded_mean(records.iter().filter_map(|r| r.quoted_wait_time));

        let distinct_specialist_count = records
            .iter()
            .filter_map(|r| r.specialist_id.as_deref())
            .collect::<HashSet<_>>()
            .len();

        let tier_breakdown_repeats =
            ranked_counts(records.iter().filter(|r| r.is_repeat).filter_map(|r| r.tier.clone()));
        let tier_breakdown_non_repeats =
            ranked_counts(records.iter().filter(|r| !r.is_repeat).filter_map(|r| r.tier.clone()));

        let mut top_intents = ranked_counts(records.iter().filter_map(|r| r.intent.clone()));
        top_intents.truncate(TOP_INTENT_LIMIT);

        let mut daily: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for record in &records {
            *daily.entry(record.date).or_default() += 1;
        }
        let daily_counts = daily
            .into_iter()
            .map(|(date, count)| DailyCount { date, count })
            .collect();

        let mut age_gender: BTreeMap<(AgeBucket, String), usize> = BTreeMap::new();
        for record in &records {
            if let (Some(age), Some(gender)) = (record.age, record.gender.as_ref()) {
                *age_gender
                    .entry((AgeBucket::from_age(age), gender.clone()))
                    .or_default() += 1;
            }
        }
        let age_gender_breakdown = age_gender
            .into_iter()
            .map(|((bucket, gender), count)| AgeGenderCount {
                bucket,
                gender,
                count,
            })
            .collect();

        let msg_within_12h_breakdown =
            split_counts(records.iter().filter_map(|r| {
                r.msg_within_12h.as_ref().map(|m| (m.clone(), r.is_repeat))
            }));
        let shift_breakdown = split_counts(
            records
                .iter()
                .filter_map(|r| r.shift.as_ref().map(|s| (s.clone(), r.is_repeat))),
        );

        Self {
            selection,
            records,
            total_records,
            total_repeats,
            total_non_repeats,
            repeat_percent,
            non_repeat_percent,
            avg_call_length,
            avg_quoted_wait_time,
            distinct_specialist_count,
            tier_breakdown_repeats,
            tier_breakdown_non_repeats,
            top_intents,
            daily_counts,
            age_gender_breakdown,
            msg_within_12h_breakdown,
            shift_breakdown,
        }
    }

    /// `true` when the selection matched no records and every ratio/mean is
    /// the undefined sentinel.
    pub fn is_empty(&self) -> bool {
        self.total_records == 0
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn rounded_mean(values: impl IntoIterator<Item = f64>) -> Metric {
    match mean(values) {
        Some(m) => Metric::Defined(round_half_to_even(m)),
        None => Metric::Undefined,
    }
}

/// Count occurrences of each label and order the result count-descending,
/// then label-ascending for ties.
fn ranked_counts(labels: impl IntoIterator<Item = String>) -> Vec<LabelCount> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }
    let mut ranked: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount { label, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    ranked
}

/// Count occurrences of each (label, repeat flag) pair, ordered by label
/// ascending then non-repeat before repeat.
fn split_counts(pairs: impl IntoIterator<Item = (String, bool)>) -> Vec<SplitCount> {
    let mut counts: BTreeMap<(String, bool), usize> = BTreeMap::new();
    for pair in pairs {
        *counts.entry(pair).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|((label, is_repeat), count)| SplitCount {
            label,
            is_repeat,
            count,
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
