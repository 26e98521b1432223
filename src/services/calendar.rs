use chrono::{Datelike, Days, NaiveDate, Weekday};
use std::fmt;
use std::str::FromStr;

/// Which weekend days the booking calendar greys out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeekendPolicy {
    /// Every day of the week can be booked.
    None,
    /// Closed on Sundays only.
    SundayOnly,
    /// Closed on Saturdays and Sundays.
    #[default]
    SaturdayAndSunday,
}

impl WeekendPolicy {
    pub fn excludes(self, weekday: Weekday) -> bool {
        match self {
            WeekendPolicy::None => false,
            WeekendPolicy::SundayOnly => weekday == Weekday::Sun,
            WeekendPolicy::SaturdayAndSunday => matches!(weekday, Weekday::Sat | Weekday::Sun),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WeekendPolicy::None => "none",
            WeekendPolicy::SundayOnly => "sunday",
            WeekendPolicy::SaturdayAndSunday => "saturday_and_sunday",
        }
    }
}

impl fmt::Display for WeekendPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WeekendPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "open" => Ok(WeekendPolicy::None),
            "sunday" | "sunday_only" => Ok(WeekendPolicy::SundayOnly),
            "saturday_and_sunday" | "weekends" => Ok(WeekendPolicy::SaturdayAndSunday),
            other => Err(format!("unknown weekend policy: {}", other)),
        }
    }
}

/// Date selection rules of the booking calendar.
///
/// Only used to decide what the calendar offers; a date already on a form is
/// never re-checked at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DatePolicy {
    weekend: WeekendPolicy,
}

impl DatePolicy {
    pub fn new(weekend: WeekendPolicy) -> Self {
        Self { weekend }
    }

    pub fn weekend_policy(&self) -> WeekendPolicy {
        self.weekend
    }

    /// Booking starts tomorrow: today's slots are treated as already past.
    pub fn is_selectable(&self, date: NaiveDate, today: NaiveDate) -> bool {
        date > today && !self.weekend.excludes(date.weekday())
    }

    /// Selectable dates among the `horizon_days` days following `today`.
    pub fn selectable_dates(&self, today: NaiveDate, horizon_days: u32) -> Vec<NaiveDate> {
        (1..=u64::from(horizon_days))
            .filter_map(|offset| today.checked_add_days(Days::new(offset)))
            .filter(|date| self.is_selectable(*date, today))
            .collect()
    }
}
