use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::core::config::ConfigError;
use crate::core::models::cost::{CostQuery, Granularity};

/// Date format expected by the cost API.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Snapshot of "now" in a fixed time zone. Every date of a run derives from one of these.
#[derive(Debug, Clone, Copy)]
pub struct TimeContext {
    zone: Tz,
    now: DateTime<Tz>,
}

pub fn parse_zone(name: &str) -> Result<Tz, ConfigError> {
    name.parse::<Tz>()
        .map_err(|_| ConfigError::InvalidTimezone(name.to_string()))
}

impl TimeContext {
    /// Capture the current instant in the named zone.
    pub fn new(zone_name: &str) -> Result<Self, ConfigError> {
        Ok(Self::at(parse_zone(zone_name)?, Utc::now()))
    }

    pub fn at(zone: Tz, instant: DateTime<Utc>) -> Self {
        Self {
            zone,
            now: instant.with_timezone(&zone),
        }
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    pub fn now(&self) -> DateTime<Tz> {
        self.now
    }

    fn today_date(&self) -> NaiveDate {
        self.now.date_naive()
    }

    fn first_of_month_date(&self) -> NaiveDate {
        let today = self.today_date();
        today - Duration::days(today.day0() as i64)
    }

    fn last_of_previous_month_date(&self) -> NaiveDate {
        self.first_of_month_date() - Duration::days(1)
    }

    fn first_of_previous_month_date(&self) -> NaiveDate {
        let last = self.last_of_previous_month_date();
        last - Duration::days(last.day0() as i64)
    }

    pub fn today(&self) -> String {
        self.today_date().format(DATE_FORMAT).to_string()
    }

    pub fn yesterday(&self) -> String {
        (self.today_date() - Duration::days(1))
            .format(DATE_FORMAT)
            .to_string()
    }

    pub fn first_of_month(&self) -> String {
        self.first_of_month_date().format(DATE_FORMAT).to_string()
    }

    pub fn first_of_previous_month(&self) -> String {
        self.first_of_previous_month_date()
            .format(DATE_FORMAT)
            .to_string()
    }

    /// Build the query range for a granularity.
    ///
    /// Daily covers yesterday. Monthly covers the month to date; on the first of
    /// the month that range is empty, so it covers the whole previous month instead.
    pub fn query_for(&self, granularity: Granularity) -> CostQuery {
        let (start, end) = match granularity {
            Granularity::Daily => (self.yesterday(), self.today()),
            Granularity::Monthly => {
                if self.today_date() == self.first_of_month_date() {
                    (self.first_of_previous_month(), self.first_of_month())
                } else {
                    (self.first_of_month(), self.today())
                }
            }
        };
        CostQuery {
            granularity,
            start,
            end,
        }
    }
}
