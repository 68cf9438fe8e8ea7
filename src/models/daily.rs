//! Per-day weather records and their calendar-month buckets

use super::Measurement;
use crate::{Result, ViabilityError};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const ENGLISH_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const SPANISH_MONTHS: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// Language of the month names written into the results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthNames {
    #[default]
    English,
    Spanish,
}

impl MonthNames {
    fn table(self) -> &'static [&'static str; 12] {
        match self {
            MonthNames::English => &ENGLISH_MONTHS,
            MonthNames::Spanish => &SPANISH_MONTHS,
        }
    }
}

/// Weather for one calendar day. Absent fields were not reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    /// Temperature in Celsius
    pub temperature: Option<f64>,
    /// Dew point in Celsius
    pub dew_point: Option<f64>,
    /// Relative humidity in percent
    pub relative_humidity: Option<f64>,
    /// Precipitation in mm
    pub precipitation: Option<f64>,
    /// Wind speed in m/s
    pub wind_speed: Option<f64>,
}

impl DailyRecord {
    /// Create a record without any measurement
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            temperature: None,
            dew_point: None,
            relative_humidity: None,
            precipitation: None,
            wind_speed: None,
        }
    }

    /// Store a measurement, replacing any previous value for it
    pub fn set(&mut self, measurement: Measurement, value: f64) {
        *self.slot(measurement) = Some(value);
    }

    /// Read a measurement
    #[must_use]
    pub fn get(&self, measurement: Measurement) -> Option<f64> {
        match measurement {
            Measurement::Temperature => self.temperature,
            Measurement::DewPoint => self.dew_point,
            Measurement::RelativeHumidity => self.relative_humidity,
            Measurement::Precipitation => self.precipitation,
            Measurement::WindSpeed => self.wind_speed,
        }
    }

    /// Builder-style setter, handy for fixtures
    #[must_use]
    pub fn with(mut self, measurement: Measurement, value: f64) -> Self {
        self.set(measurement, value);
        self
    }

    /// Month this day belongs to
    #[must_use]
    pub fn month_key(&self) -> MonthKey {
        MonthKey::from_date(self.date)
    }

    fn slot(&mut self, measurement: Measurement) -> &mut Option<f64> {
        match measurement {
            Measurement::Temperature => &mut self.temperature,
            Measurement::DewPoint => &mut self.dew_point,
            Measurement::RelativeHumidity => &mut self.relative_humidity,
            Measurement::Precipitation => &mut self.precipitation,
            Measurement::WindSpeed => &mut self.wind_speed,
        }
    }
}

/// Calendar month, rendered as `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    /// 1-based, always within 1..=12
    month: u32,
}

impl MonthKey {
    /// Create a key, rejecting months outside 1..=12
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ViabilityError::validation(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        Ok(Self { year, month })
    }

    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// 1-based month
    #[must_use]
    pub fn month(&self) -> u32 {
        self.month
    }

    /// English month name
    #[must_use]
    pub fn month_name(&self) -> &'static str {
        self.month_name_in(MonthNames::English)
    }

    #[must_use]
    pub fn month_name_in(&self, names: MonthNames) -> &'static str {
        let index = self.month.saturating_sub(1) as usize;
        names.table().get(index).copied().unwrap_or("")
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = ViabilityError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ViabilityError::validation(format!("invalid month key '{s}'"));
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

/// Days of one calendar month, ordered by date
#[derive(Debug, Clone, PartialEq)]
pub struct MonthBucket {
    pub key: MonthKey,
    pub days: Vec<DailyRecord>,
}

impl MonthBucket {
    #[must_use]
    pub fn new(key: MonthKey) -> Self {
        Self {
            key,
            days: Vec::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
