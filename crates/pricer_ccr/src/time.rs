//! Day count conventions for the exposure date grid.
//!
//! Adjustment integrals are weighted by the year fraction between
//! consecutive anchor dates. The default convention is Act/365.25.
//!
//! ```
//! use pricer_ccr::time::DayCount;
//! use chrono::NaiveDate;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
//!
//! // 366 days / 365.25
//! let yf = DayCount::Act36525.year_fraction(start, end);
//! assert!((yf - 366.0 / 365.25).abs() < 1e-15);
//! ```

use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Year fraction convention applied to consecutive anchor dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DayCount {
    /// Actual days / 365.25.
    #[default]
    Act36525,
    /// Actual days / 365.
    Act365Fixed,
    /// Actual days / 360.
    Act360,
}

impl DayCount {
    /// Returns the standard convention name.
    ///
    /// ```
    /// use pricer_ccr::time::DayCount;
    ///
    /// assert_eq!(DayCount::Act36525.name(), "ACT/365.25");
    /// assert_eq!(DayCount::Act360.name(), "ACT/360");
    /// ```
    pub fn name(&self) -> &'static str {
        match self {
            DayCount::Act36525 => "ACT/365.25",
            DayCount::Act365Fixed => "ACT/365",
            DayCount::Act360 => "ACT/360",
        }
    }

    #[inline]
    fn denominator(&self) -> f64 {
        match self {
            DayCount::Act36525 => 365.25,
            DayCount::Act365Fixed => 365.0,
            DayCount::Act360 => 360.0,
        }
    }

    /// Year fraction from `start` to `end`; negative when `end < start`.
    #[inline]
    pub fn year_fraction(&self, start: NaiveDate, end: NaiveDate) -> f64 {
        (end - start).num_days() as f64 / self.denominator()
    }

    /// Interval lengths Δtᵢ between consecutive dates.
    ///
    /// Returns `dates.len() - 1` values, or nothing for fewer than two dates.
    pub fn year_fractions(&self, dates: &[NaiveDate]) -> Vec<f64> {
        dates
            .windows(2)
            .map(|w| self.year_fraction(w[0], w[1]))
            .collect()
    }
}

impl FromStr for DayCount {
    type Err = String;

    /// Parses a convention name (case-insensitive).
    ///
    /// Accepts "ACT/365.25", "Act36525", "ACT/365", "Act365Fixed",
    /// "ACT/360" and "Act360".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace(['/', ' ', '.', '_', '-'], "").as_str() {
            "ACT36525" | "ACTUAL36525" | "A36525" => Ok(DayCount::Act36525),
            "ACT365" | "ACT365FIXED" | "ACTUAL365" | "A365" => Ok(DayCount::Act365Fixed),
            "ACT360" | "ACTUAL360" | "A360" => Ok(DayCount::Act360),
            _ => Err(format!("Unknown day count convention: {}", s)),
        }
    }
}

impl fmt::Display for DayCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Serialize for DayCount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for DayCount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DayCount::from_str(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_is_act_365_25() {
        assert_eq!(DayCount::default(), DayCount::Act36525);
    }

    #[test]
    fn test_year_fraction_conventions() {
        let start = date(2024, 1, 1);
        let end = date(2024, 7, 1); // 182 days

        assert_relative_eq!(
            DayCount::Act36525.year_fraction(start, end),
            182.0 / 365.25,
            epsilon = 1e-15
        );
        assert_relative_eq!(
            DayCount::Act365Fixed.year_fraction(start, end),
            182.0 / 365.0,
            epsilon = 1e-15
        );
        assert_relative_eq!(
            DayCount::Act360.year_fraction(start, end),
            182.0 / 360.0,
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_year_fraction_reversed_is_negative() {
        let yf = DayCount::Act36525.year_fraction(date(2024, 7, 1), date(2024, 1, 1));
        assert!(yf < 0.0);
    }

    #[test]
    fn test_year_fractions_grid() {
        let dates = vec![date(2024, 1, 1), date(2024, 1, 31), date(2024, 3, 1)];
        let dts = DayCount::Act360.year_fractions(&dates);
        assert_eq!(dts.len(), 2);
        assert_relative_eq!(dts[0], 30.0 / 360.0, epsilon = 1e-15);
        assert_relative_eq!(dts[1], 30.0 / 360.0, epsilon = 1e-15);
    }

    #[test]
    fn test_year_fractions_single_date() {
        assert!(DayCount::Act36525
            .year_fractions(&[date(2024, 1, 1)])
            .is_empty());
    }

    #[test]
    fn test_from_str_aliases() {
        assert_eq!("ACT/365.25".parse::<DayCount>(), Ok(DayCount::Act36525));
        assert_eq!("act36525".parse::<DayCount>(), Ok(DayCount::Act36525));
        assert_eq!("Act/365".parse::<DayCount>(), Ok(DayCount::Act365Fixed));
        assert_eq!("A360".parse::<DayCount>(), Ok(DayCount::Act360));
        assert!("30/360".parse::<DayCount>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for dc in [DayCount::Act36525, DayCount::Act365Fixed, DayCount::Act360] {
            assert_eq!(dc.to_string().parse::<DayCount>(), Ok(dc));
        }
    }
}
