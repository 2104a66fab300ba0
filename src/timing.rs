//! Phase timing and the units it is reported in.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Units the compile/execute timings are printed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TimeUnit {
    #[value(name = "ns")]
    Nanoseconds,
    #[value(name = "us")]
    Microseconds,
    #[default]
    #[value(name = "ms")]
    Milliseconds,
    #[value(name = "s")]
    Seconds,
}

impl TimeUnit {
    pub fn name(self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "nanoseconds",
            TimeUnit::Microseconds => "microseconds",
            TimeUnit::Milliseconds => "milliseconds",
            TimeUnit::Seconds => "seconds",
        }
    }

    /// Whole units in `d`, truncated.
    pub fn whole(self, d: Duration) -> u128 {
        match self {
            TimeUnit::Nanoseconds => d.as_nanos(),
            TimeUnit::Microseconds => d.as_micros(),
            TimeUnit::Milliseconds => d.as_millis(),
            TimeUnit::Seconds => d.as_secs() as u128,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = match self {
            TimeUnit::Nanoseconds => "ns",
            TimeUnit::Microseconds => "us",
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Seconds => "s",
        };
        write!(f, "{short}")
    }
}

impl FromStr for TimeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ns" => Ok(TimeUnit::Nanoseconds),
            "us" => Ok(TimeUnit::Microseconds),
            "ms" => Ok(TimeUnit::Milliseconds),
            "s" => Ok(TimeUnit::Seconds),
            other => Err(format!("runtime units must be one of ns, us, ms, s (got '{other}')")),
        }
    }
}

/// Wall-clock duration of each interpreter phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timings {
    pub compile: Duration,
    pub execute: Duration,
}

impl Timings {
    /// The two report lines, e.g. `Time to parse: 3 milliseconds`.
    pub fn report(&self, unit: TimeUnit) -> String {
        format!(
            "Time to parse: {} {}\nTime to execute: {} {}",
            unit.whole(self.compile),
            unit.name(),
            unit.whole(self.execute),
            unit.name()
        )
    }
}
