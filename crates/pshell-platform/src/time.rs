//! Wall-clock timestamps.
//!
//! Modification times are kept as signed seconds relative to the Unix epoch,
//! so files older than 1970 keep their real date. Rendering happens in the
//! host's local timezone.

use std::fmt;

use chrono::{Local, TimeZone};

/// `<Mon> <DD> <YYYY> <HH:MM:SS>`, e.g. `Jan 05 2024 13:45:02`.
pub const MTIME_FORMAT: &str = "%b %d %Y %H:%M:%S";

/// Seconds since the Unix epoch; negative before 1970.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn from_unix_secs(secs: i64) -> Self {
        Self(secs)
    }

    pub fn unix_secs(self) -> i64 {
        self.0
    }

    /// Render in `tz`. `None` when the instant is outside the calendar range
    /// chrono can represent.
    pub fn format_in<Tz>(self, tz: &Tz) -> Option<String>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let dt = tz.timestamp_opt(self.0, 0).single()?;
        Some(dt.format(MTIME_FORMAT).to_string())
    }

    /// Render in the local timezone, falling back to raw seconds.
    pub fn format_local(self) -> String {
        self.format_in(&Local).unwrap_or_else(|| {
            log::debug!("timestamp {} out of calendar range", self.0);
            self.0.to_string()
        })
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_local())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn utc(secs: i64) -> String {
        Timestamp::from_unix_secs(secs).format_in(&Utc).unwrap()
    }

    #[test]
    fn epoch() {
        assert_eq!(utc(0), "Jan 01 1970 00:00:00");
    }

    #[test]
    fn zero_padded_fields() {
        // 2024-01-05 13:45:02 UTC
        assert_eq!(utc(1_704_462_302), "Jan 05 2024 13:45:02");
    }

    #[test]
    fn last_second_of_leap_year() {
        assert_eq!(utc(1_735_689_599), "Dec 31 2024 23:59:59");
    }

    #[test]
    fn before_epoch() {
        assert_eq!(utc(-1), "Dec 31 1969 23:59:59");
        // 1960-03-04 05:06:07 UTC
        assert_eq!(utc(-310_157_633), "Mar 04 1960 05:06:07");
    }

    #[test]
    fn offset_is_applied() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let ts = Timestamp::from_unix_secs(0);
        assert_eq!(ts.format_in(&plus_two).unwrap(), "Jan 01 1970 02:00:00");

        let minus_five = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(ts.format_in(&minus_five).unwrap(), "Dec 31 1969 19:00:00");
    }

    #[test]
    fn display_is_local_time() {
        let ts = Timestamp::from_unix_secs(1_704_462_302);
        let expected = Local
            .timestamp_opt(1_704_462_302, 0)
            .unwrap()
            .format(MTIME_FORMAT)
            .to_string();
        assert_eq!(ts.to_string(), expected);
    }

    #[test]
    fn out_of_range_falls_back_to_seconds() {
        let ts = Timestamp::from_unix_secs(i64::MAX);
        assert_eq!(ts.format_in(&Utc), None);
        assert_eq!(ts.to_string(), i64::MAX.to_string());
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn display_has_fixed_width(secs in -3_000_000_000i64..4_102_444_800) {
                // "Mon DD YYYY HH:MM:SS" for four-digit years
                prop_assert_eq!(utc(secs).len(), 20);
            }

            #[test]
            fn rendering_keeps_every_second(secs in -3_000_000_000i64..4_102_444_800) {
                let parsed = chrono::NaiveDateTime::parse_from_str(&utc(secs), MTIME_FORMAT).unwrap();
                prop_assert_eq!(parsed.and_utc().timestamp(), secs);
            }
        }
    }
}
