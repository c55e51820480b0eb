//! Race distance with an explicit variant for open-ended events.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Sentinel spellings accepted for an open-ended distance (compared case-insensitively).
const UNBOUNDED_SPELLINGS: &[&str] = &["infinity", "+infinity", "inf", "∞", "unbounded"];

/// Distance of a race in kilometers.
///
/// Timed events and other open-ended formats have no fixed distance; they are
/// represented by [`Distance::Unbounded`] so that range checks never see `NaN`
/// or an overflowing float.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distance {
    Finite(f64),
    Unbounded,
}

impl Default for Distance {
    fn default() -> Self {
        Self::Finite(0.0)
    }
}

impl Distance {
    /// Build a distance from a raw float, degrading invalid values to zero.
    pub fn from_km(km: f64) -> Self {
        if km.is_nan() || km < 0.0 {
            Self::Finite(0.0)
        } else if km.is_infinite() {
            Self::Unbounded
        } else {
            Self::Finite(km)
        }
    }

    /// Kilometers for a finite distance.
    pub fn km(self) -> Option<f64> {
        match self {
            Self::Finite(km) => Some(km),
            Self::Unbounded => None,
        }
    }

    pub fn is_unbounded(self) -> bool {
        matches!(self, Self::Unbounded)
    }

    /// Whether the distance lies within `target ± tolerance` (inclusive).
    pub fn is_near(self, target: f64, tolerance: f64) -> bool {
        self.km()
            .is_some_and(|km| (km - target).abs() <= tolerance)
    }

    /// Whether the distance is strictly longer than `km`. Unbounded always is.
    pub fn exceeds(self, km: f64) -> bool {
        match self {
            Self::Finite(value) => value > km,
            Self::Unbounded => true,
        }
    }

    /// Total order: finite distances by value, unbounded after all of them.
    pub fn total_cmp(self, other: Self) -> Ordering {
        match (self, other) {
            (Self::Finite(a), Self::Finite(b)) => a.total_cmp(&b),
            (Self::Finite(_), Self::Unbounded) => Ordering::Less,
            (Self::Unbounded, Self::Finite(_)) => Ordering::Greater,
            (Self::Unbounded, Self::Unbounded) => Ordering::Equal,
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(km) => write!(f, "{} km", km),
            Self::Unbounded => f.write_str("open distance"),
        }
    }
}

/// Lenient parsing: never fails, unknown text becomes zero.
impl FromStr for Distance {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_lowercase();
        if UNBOUNDED_SPELLINGS.contains(&text.as_str()) {
            return Ok(Self::Unbounded);
        }

        let numeric = text
            .strip_suffix("km")
            .or_else(|| text.strip_suffix('k'))
            .unwrap_or(&text)
            .trim();

        Ok(numeric
            .parse::<f64>()
            .map(Self::from_km)
            .unwrap_or_default())
    }
}

impl Serialize for Distance {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Finite(km) => serializer.serialize_f64(*km),
            Self::Unbounded => serializer.serialize_str("Infinity"),
        }
    }
}

impl<'de> Deserialize<'de> for Distance {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
            Other(serde::de::IgnoredAny),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Number(km)) => Self::from_km(km),
            Some(Raw::Text(text)) => text.parse().unwrap_or_default(),
            Some(Raw::Other(_)) | None => Self::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case("10", Distance::Finite(10.0))]
    #[case("21.1km", Distance::Finite(21.1))]
    #[case(" 5k ", Distance::Finite(5.0))]
    #[case("Infinity", Distance::Unbounded)]
    #[case("∞", Distance::Unbounded)]
    #[case("unbounded", Distance::Unbounded)]
    #[case("about a mile", Distance::Finite(0.0))]
    #[case("-3", Distance::Finite(0.0))]
    fn test_parse_text(#[case] input: &str, #[case] expected: Distance) {
        let parsed: Distance = input.parse().unwrap();
        check!(parsed == expected);
    }

    #[rstest]
    #[case("42.2", Distance::Finite(42.2))]
    #[case("\"Infinity\"", Distance::Unbounded)]
    #[case("\"50\"", Distance::Finite(50.0))]
    #[case("null", Distance::Finite(0.0))]
    #[case("true", Distance::Finite(0.0))]
    fn test_deserialize_json(#[case] json: &str, #[case] expected: Distance) {
        let parsed: Distance = serde_json::from_str(json).unwrap();
        check!(parsed == expected);
    }

    #[test]
    fn test_unbounded_sorts_after_finite() {
        check!(Distance::Unbounded.total_cmp(Distance::Finite(1000.0)) == Ordering::Greater);
        check!(Distance::Finite(5.0).total_cmp(Distance::Finite(10.0)) == Ordering::Less);
        check!(Distance::Unbounded.total_cmp(Distance::Unbounded) == Ordering::Equal);
    }

    #[test]
    fn test_tolerance_and_exceeds() {
        check!(Distance::Finite(10.5).is_near(10.0, 0.5));
        check!(!Distance::Finite(10.6).is_near(10.0, 0.5));
        check!(!Distance::Unbounded.is_near(10.0, 0.5));
        check!(Distance::Unbounded.exceeds(42.2));
        check!(!Distance::Finite(42.2).exceeds(42.2));
    }

    #[test]
    fn test_serialize_sentinel() {
        check!(serde_json::to_string(&Distance::Unbounded).unwrap() == "\"Infinity\"");
        check!(serde_json::to_string(&Distance::Finite(5.0)).unwrap() == "5.0");
    }
}
