use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::fmt::Display;

/// 30.44 days, the average month length used for tenure.
const MONTH_MILLIS: i64 = 2_630_016_000;

/// Tenure tier of an account. Ordered from newest to oldest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub(crate) enum Rank {
    Newcomer,
    Apprentice,
    Explorer,
    Master,
    Legend,
}

impl Rank {
    /// Derives the tier from the time elapsed between `enrolled_at` and `now`.
    ///
    /// The distance is absolute, so an enrollment in the future counts the
    /// same as one equally far in the past.
    pub(crate) fn derive(enrolled_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let elapsed = (now - enrolled_at).num_milliseconds().unsigned_abs();

        Rank::from_months(elapsed / MONTH_MILLIS as u64)
    }

    /// Join dates are stored without a time, they count from UTC midnight.
    pub(crate) fn for_join_date(join_date: NaiveDate, now: DateTime<Utc>) -> Self {
        Rank::derive(join_date.and_time(Default::default()).and_utc(), now)
    }

    fn from_months(months: u64) -> Self {
        match months {
            0 => Rank::Newcomer,
            1..=2 => Rank::Apprentice,
            3..=5 => Rank::Explorer,
            6..=11 => Rank::Master,
            _ => Rank::Legend,
        }
    }

    pub(crate) fn tier(&self) -> u8 {
        *self as u8 + 1
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Rank::Newcomer => "Newcomer",
            Rank::Apprentice => "Apprentice",
            Rank::Explorer => "Explorer",
            Rank::Master => "Master",
            Rank::Legend => "Legend",
        }
    }
}

impl Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn months(n: i64) -> Duration {
        Duration::milliseconds(MONTH_MILLIS * n)
    }

    #[test]
    fn month_boundaries_are_inclusive_lower() {
        let now = now();

        assert_eq!(Rank::derive(now - months(1), now), Rank::Apprentice);
        assert_eq!(Rank::derive(now - months(3), now), Rank::Explorer);
        assert_eq!(Rank::derive(now - months(6), now), Rank::Master);
        assert_eq!(Rank::derive(now - months(12), now), Rank::Legend);
    }

    #[test]
    fn just_below_each_boundary_stays_in_lower_tier() {
        let now = now();
        let tick = Duration::milliseconds(1);

        assert_eq!(Rank::derive(now - months(1) + tick, now), Rank::Newcomer);
        assert_eq!(Rank::derive(now - months(3) + tick, now), Rank::Apprentice);
        assert_eq!(Rank::derive(now - months(6) + tick, now), Rank::Explorer);
        assert_eq!(Rank::derive(now - months(12) + tick, now), Rank::Master);
    }

    #[test]
    fn same_instant_is_newcomer() {
        assert_eq!(Rank::derive(now(), now()), Rank::Newcomer);
    }

    #[test]
    fn future_enrollment_uses_absolute_distance() {
        let now = now();

        assert_eq!(Rank::derive(now + Duration::days(2), now), Rank::Newcomer);
        assert_eq!(Rank::derive(now + months(4), now), Rank::Explorer);
    }

    #[test]
    fn join_date_counts_from_midnight() {
        let join_date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        assert_eq!(Rank::for_join_date(join_date, now()), Rank::Legend);
        assert_eq!(
            Rank::for_join_date(now().date_naive(), now()),
            Rank::Newcomer
        );
    }

    #[test]
    fn tiers_are_numbered_from_one() {
        assert_eq!(Rank::Newcomer.tier(), 1);
        assert_eq!(Rank::Legend.tier(), 5);
        assert!(Rank::Master < Rank::Legend);
    }

    #[test]
    fn serializes_as_label() {
        assert_eq!(
            serde_json::to_string(&Rank::Explorer).unwrap(),
            "\"Explorer\""
        );
        assert_eq!(Rank::Apprentice.to_string(), "Apprentice");
    }
}
