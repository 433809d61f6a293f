use crate::time::error::Error;
use core::str::FromStr;
use lazy_static::*;
use regex::Regex;
use std::time::Duration;

lazy_static! {
    static ref DURATION_REGEX: Regex = Regex::new(
        r"^\s*(?P<value>\d+(?:\.\d+)?)\s*(?P<unit>[a-z]+)\s*$"
    )
    .expect("Regex compilation error");
}

#[derive(Debug, PartialEq)]
pub struct DurationUnit {
    value: f64,
    unit: TimeUnit,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
}

impl TimeUnit {
    fn millis(self) -> f64 {
        match self {
            TimeUnit::Millisecond => 1.0,
            TimeUnit::Second => 1_000.0,
            TimeUnit::Minute => 60_000.0,
            TimeUnit::Hour => 3_600_000.0,
        }
    }
}

impl FromStr for DurationUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = DURATION_REGEX
            .captures(s)
            .ok_or_else(|| Error::Syntax(s.to_owned()))?;
        let value = caps["value"]
            .parse::<f64>()
            .map_err(|_| Error::Syntax(s.to_owned()))?;
        let unit = caps["unit"].parse::<TimeUnit>()?;
        Ok(Self { value, unit })
    }
}

impl From<DurationUnit> for Duration {
    fn from(unit: DurationUnit) -> Self {
        Duration::from_micros((unit.value * unit.unit.millis() * 1_000.0).round() as u64)
    }
}

impl FromStr for TimeUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ms" | "millisecond" | "millis" | "milliseconds" => Ok(TimeUnit::Millisecond),
            "s" | "second" | "secs" | "seconds" => Ok(TimeUnit::Second),
            "m" | "minute" | "mins" | "minutes" => Ok(TimeUnit::Minute),
            "h" | "hour" | "hours" => Ok(TimeUnit::Hour),
            _ => Err(Error::UnitNotSupported(s.to_owned())),
        }
    }
}

pub fn parse_duration(s: &str) -> Result<Duration, Error> {
    s.parse::<DurationUnit>().map(Duration::from)
}
