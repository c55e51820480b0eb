//! Race dates as they appear in the dataset.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// Parse a calendar date in ISO (`YYYY-MM-DD`, optionally followed by a time)
/// or US locale (`MM/DD/YYYY`) form.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if text.contains('/') {
        return NaiveDate::parse_from_str(text, "%m/%d/%Y").ok();
    }

    // ISO datetimes ("2024-05-04T08:00:00Z") keep only the date part
    let date_part = match text.as_bytes().get(10) {
        Some(b'T' | b' ') => &text[..10],
        _ => text,
    };
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// A race date: the raw dataset text plus the parsed calendar date, if any.
///
/// The raw text is kept because identity resolution uses it verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceDate {
    raw: String,
    parsed: Option<NaiveDate>,
}

impl RaceDate {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let parsed = parse_date(&raw);
        Self { raw, parsed }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.parsed
    }

    /// `(month, day)` used for calendar-position ordering.
    pub fn month_day(&self) -> Option<(u32, u32)> {
        self.parsed.map(|date| (date.month(), date.day()))
    }
}

impl From<NaiveDate> for RaceDate {
    fn from(date: NaiveDate) -> Self {
        Self {
            raw: date.format("%Y-%m-%d").to_string(),
            parsed: Some(date),
        }
    }
}

impl fmt::Display for RaceDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parsed {
            Some(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            None => f.write_str(&self.raw),
        }
    }
}

/// Compare by month then day, ignoring the year. Invalid dates sort last.
pub fn cmp_month_day(a: Option<&RaceDate>, b: Option<&RaceDate>) -> Ordering {
    let a = a.and_then(RaceDate::month_day);
    let b = b.and_then(RaceDate::month_day);
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl Serialize for RaceDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for RaceDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// Deserialize an optional date, treating non-string values and blank text as absent.
pub(crate) fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<RaceDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(text)) if !text.trim().is_empty() => {
            Some(RaceDate::new(text))
        }
        _ => None,
    })
}
