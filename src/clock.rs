use chrono::{DateTime, NaiveDate, Utc};

/// Source of "now" for day boundaries and streaks.
///
/// Days are UTC calendar days throughout the service.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_today_truncates_to_utc_day() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 3, 10, 23, 59, 59).unwrap());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    }
}
