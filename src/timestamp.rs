//! Timestamp normalization for WhatsApp export headers.
//!
//! Exports carry their timestamps as locale-dependent text such as
//! `1/15/24, 10:30 PM`, `15/01/2024, 22:30:05` or `2024-01-15, 22:30`.
//! [`normalize_timestamp`] turns any of these into a [`NaiveDateTime`], or
//! `None` when nothing matches. A `None` is a normal outcome: callers exclude
//! such messages from time-bucketed views instead of failing.
//!
//! # Day/month ambiguity
//!
//! Slash-separated dates are inspected before parsing:
//!
//! | first field | second field | order tried first |
//! |-------------|--------------|-------------------|
//! | > 12        | any          | day/month         |
//! | ≤ 12        | > 12         | month/day         |
//! | ≤ 12        | ≤ 12         | day/month         |
//!
//! The preferred order is tried first, then the other order, then the ISO
//! forms.
//!
//! ```
//! use chatpulse::timestamp::normalize_timestamp;
//! use chrono::{Datelike, Timelike};
//!
//! let ts = normalize_timestamp("05/03/24, 10:00 AM").unwrap();
//! assert_eq!((ts.day(), ts.month(), ts.year()), (5, 3, 2024));
//! assert_eq!(ts.hour(), 10);
//! ```

use chrono::NaiveDateTime;

/// Narrow no-break space, used by newer iOS exports before `AM`/`PM`.
pub const NARROW_NO_BREAK_SPACE: char = '\u{202F}';

/// No-break space.
pub const NO_BREAK_SPACE: char = '\u{00A0}';

/// Order of the day and month fields in a slash-separated date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    /// `DD/MM/YY`
    DayFirst,
    /// `MM/DD/YY`
    MonthFirst,
}

impl DateOrder {
    /// Returns chrono format strings for this order.
    ///
    /// Two-digit year forms come before four-digit ones: chrono's `%Y`
    /// would otherwise accept `24` as the year 24.
    pub fn parse_formats(self) -> &'static [&'static str] {
        match self {
            DateOrder::DayFirst => &[
                "%d/%m/%y, %I:%M %p",
                "%d/%m/%Y, %I:%M %p",
                "%d/%m/%y, %I:%M:%S %p",
                "%d/%m/%Y, %I:%M:%S %p",
                "%d/%m/%y, %H:%M",
                "%d/%m/%Y, %H:%M",
                "%d/%m/%y, %H:%M:%S",
                "%d/%m/%Y, %H:%M:%S",
            ],
            DateOrder::MonthFirst => &[
                "%m/%d/%y, %I:%M %p",
                "%m/%d/%Y, %I:%M %p",
                "%m/%d/%y, %I:%M:%S %p",
                "%m/%d/%Y, %I:%M:%S %p",
                "%m/%d/%y, %H:%M",
                "%m/%d/%Y, %H:%M",
                "%m/%d/%y, %H:%M:%S",
                "%m/%d/%Y, %H:%M:%S",
            ],
        }
    }

    /// Returns the other order.
    pub fn alternate(self) -> Self {
        match self {
            DateOrder::DayFirst => DateOrder::MonthFirst,
            DateOrder::MonthFirst => DateOrder::DayFirst,
        }
    }
}

/// ISO-like forms, tried after both slash orders.
const ISO_FORMATS: &[&str] = &["%Y-%m-%d, %H:%M", "%Y-%m-%d, %H:%M:%S"];

/// Replaces narrow and regular no-break spaces with ASCII spaces and trims.
pub fn normalize_spaces(raw: &str) -> String {
    raw.replace([NARROW_NO_BREAK_SPACE, NO_BREAK_SPACE], " ")
        .trim()
        .to_string()
}

/// Decides which slash order to try first.
///
/// Looks at the first two numeric fields of the date part (everything before
/// the first comma). Falls back to [`DateOrder::DayFirst`] when the fields are
/// ambiguous or not numeric at all.
pub fn preferred_order(timestamp: &str) -> DateOrder {
    let date_part = timestamp.split(',').next().unwrap_or_default().trim();
    if !date_part.contains('/') {
        return DateOrder::DayFirst;
    }

    let mut fields = date_part.split('/').map(|f| f.trim().parse::<u32>());
    match (fields.next(), fields.next()) {
        (Some(Ok(first)), Some(Ok(_))) if first > 12 => DateOrder::DayFirst,
        (Some(Ok(_)), Some(Ok(second))) if second > 12 => DateOrder::MonthFirst,
        _ => DateOrder::DayFirst,
    }
}

/// Normalizes a raw export timestamp.
///
/// Returns `None` for empty or unrecognized input. Never panics.
pub fn normalize_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let cleaned = normalize_spaces(raw);
    if cleaned.is_empty() {
        return None;
    }

    let order = preferred_order(&cleaned);
    order
        .parse_formats()
        .iter()
        .chain(order.alternate().parse_formats())
        .chain(ISO_FORMATS)
        .find_map(|fmt| NaiveDateTime::parse_from_str(&cleaned, fmt).ok())
}
