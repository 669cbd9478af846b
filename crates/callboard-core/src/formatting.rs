//! Display formatting for metric values.
//!
//! The presentation layer renders every scalar through these helpers so that
//! undefined ratios and means show a placeholder instead of a zero that
//! looks like real data.

use crate::models::Metric;

/// Placeholder shown for metrics whose denominator was empty.
pub const UNDEFINED_PLACEHOLDER: &str = "\u{2014}";

/// Format a metric value with thousands separators, or the placeholder when
/// the metric is undefined.
///
/// # Examples
///
/// ```
/// use callboard_core::formatting::format_metric;
/// use callboard_core::models::Metric;
///
/// assert_eq!(format_metric(Metric::Defined(1234567)), "1,234,567");
/// assert_eq!(format_metric(Metric::Defined(-42)), "-42");
/// assert_eq!(format_metric(Metric::Undefined), "\u{2014}");
/// ```
pub fn format_metric(metric: Metric) -> String {
    match metric {
        Metric::Defined(v) => {
            let negative = v < 0;
            let grouped = group_thousands(&v.unsigned_abs().to_string());
            if negative {
                format!("-{}", grouped)
            } else {
                grouped
            }
        }
        Metric::Undefined => UNDEFINED_PLACEHOLDER.to_string(),
    }
}

/// Format a percentage metric as e.g. `"50%"`, or the placeholder when
/// undefined.
pub fn format_percent(metric: Metric) -> String {
    match metric {
        Metric::Defined(v) => format!("{}%", v),
        Metric::Undefined => UNDEFINED_PLACEHOLDER.to_string(),
    }
}

/// English month name for a calendar month number (1–12).
pub fn month_name(month: u32) -> Option<&'static str> {
    const NAMES: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    NAMES.get(month.checked_sub(1)? as usize).copied()
}

/// Insert `,` separators every three digits, starting from the right.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let chars: Vec<char> = digits.chars().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*c);
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
