use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::AocError;

/// Puzzles unlock at midnight US Eastern, which is 05:00 UTC in December.
const UNLOCK_HOUR_UTC: u32 = 5;

/// When the puzzle for `year`/`day` becomes available
pub fn unlock_time(year: u16, day: u8) -> Result<DateTime<Utc>, AocError> {
    if !(1..=25).contains(&day) {
        return Err(AocError::InvalidDate { year, day });
    }
    NaiveDate::from_ymd_opt(i32::from(year), 12, u32::from(day))
        .and_then(|date| date.and_hms_opt(UNLOCK_HOUR_UTC, 0, 0))
        .map(|time| time.and_utc())
        .ok_or(AocError::InvalidDate { year, day })
}

/// How long from `now` until the puzzle unlocks, zero if it already has
pub fn time_until_unlock(year: u16, day: u8, now: DateTime<Utc>) -> Result<Duration, AocError> {
    let unlock = unlock_time(year, day)?;
    Ok((unlock - now).to_std().unwrap_or(Duration::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn unlocks_at_five_utc() {
        let t = unlock_time(2023, 1).unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2023, 12, 1, 5, 0, 0).unwrap());
        let t = unlock_time(2023, 25).unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2023, 12, 25, 5, 0, 0).unwrap());
    }

    #[test]
    fn rejects_days_outside_advent() {
        assert!(matches!(unlock_time(2023, 0), Err(AocError::InvalidDate { .. })));
        assert!(matches!(unlock_time(2023, 26), Err(AocError::InvalidDate { .. })));
    }

    #[test]
    fn waiting_time() {
        let before = Utc.with_ymd_and_hms(2023, 12, 3, 4, 59, 30).unwrap();
        assert_eq!(time_until_unlock(2023, 3, before).unwrap(), Duration::from_secs(30));
        let after = Utc.with_ymd_and_hms(2023, 12, 3, 6, 0, 0).unwrap();
        assert_eq!(time_until_unlock(2023, 3, after).unwrap(), Duration::ZERO);
    }
}
