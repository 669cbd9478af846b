use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ── Record ────────────────────────────────────────────────────────────────────

/// A single call event ingested from an uploaded tabular file.
///
/// Only `date` is required at load time; every other field is `None` when the
/// source column is absent or the cell is empty/unparseable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Calendar date of the call.
    pub date: NaiveDate,
    /// Call duration in minutes.
    pub call_length_minutes: Option<f64>,
    /// Wait time quoted to the caller, in minutes.
    pub quoted_wait_time: Option<f64>,
    /// Identifier of the handling specialist; not unique across records.
    pub specialist_id: Option<String>,
    /// Whether this call is a repeat of an earlier one (0/1 in source data).
    pub is_repeat: bool,
    /// Service tier label.
    pub tier: Option<String>,
    /// Caller intent label.
    pub intent: Option<String>,
    /// Caller age in years.
    pub age: Option<u32>,
    /// Caller gender label.
    pub gender: Option<String>,
    /// Whether the caller messaged within 12 hours of the call.
    pub msg_within_12h: Option<String>,
    /// Shift during which the call was handled (e.g. 1/2/3).
    pub shift: Option<String>,
}

/// Float fields are compared and hashed through their bit patterns so that
/// `Record` can satisfy `Eq` + `Hash` and exact-duplicate rows collapse to
/// one in the merge store.
fn float_bits(value: Option<f64>) -> Option<u64> {
    value.map(f64::to_bits)
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date
            && float_bits(self.call_length_minutes) == float_bits(other.call_length_minutes)
            && float_bits(self.quoted_wait_time) == float_bits(other.quoted_wait_time)
            && self.specialist_id == other.specialist_id
            && self.is_repeat == other.is_repeat
            && self.tier == other.tier
            && self.intent == other.intent
            && self.age == other.age
            && self.gender == other.gender
            && self.msg_within_12h == other.msg_within_12h
            && self.shift == other.shift
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.date.hash(state);
        float_bits(self.call_length_minutes).hash(state);
        float_bits(self.quoted_wait_time).hash(state);
        self.specialist_id.hash(state);
        self.is_repeat.hash(state);
        self.tier.hash(state);
        self.intent.hash(state);
        self.age.hash(state);
        self.gender.hash(state);
        self.msg_within_12h.hash(state);
        self.shift.hash(state);
    }
}

// ── FilterSelection ───────────────────────────────────────────────────────────

/// A transient (year, month) pair narrowing the dataset for one view request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub year: i32,
    /// Calendar month, 1 (January) through 12 (December).
    pub month: u32,
}

impl FilterSelection {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }
}

// ── Metric ────────────────────────────────────────────────────────────────────

/// A rounded scalar metric that is undefined when its denominator is empty.
///
/// Ratios and means over an empty subset resolve to [`Metric::Undefined`]
/// rather than an error or a NaN; the presentation layer renders the
/// undefined state as a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    Defined(i64),
    Undefined,
}

impl Metric {
    /// The metric value, treating the undefined state as 0.
    pub fn value_or_zero(&self) -> i64 {
        match self {
            Metric::Defined(v) => *v,
            Metric::Undefined => 0,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Metric::Defined(_))
    }
}

// ── AgeBucket ─────────────────────────────────────────────────────────────────

/// Half-open age ranges used by the demographic breakdown.
///
/// The topmost bucket is unbounded. Display labels match the demographic
/// chart axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeBucket {
    /// Ages in `[0, 20)`.
    Under20,
    /// Ages in `[20, 40)`.
    From20To39,
    /// Ages in `[40, 60)`.
    From40To59,
    /// Ages 60 and above.
    Over60,
}

impl AgeBucket {
    /// Bucket for a caller age.
    pub fn from_age(age: u32) -> Self {
        match age {
            0..=19 => AgeBucket::Under20,
            20..=39 => AgeBucket::From20To39,
            40..=59 => AgeBucket::From40To59,
            _ => AgeBucket::Over60,
        }
    }

    /// Chart label for this bucket.
    pub fn label(&self) -> &'static str {
        match self {
            AgeBucket::Under20 => "0-20",
            AgeBucket::From20To39 => "21-40",
            AgeBucket::From40To59 => "41-60",
            AgeBucket::Over60 => "61+",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
