use chrono::{DateTime, Utc};
use serde::Deserialize;

const SECS_PER_MINUTE: i64 = 60;
const SECS_PER_HOUR: i64 = 60 * 60;
const SECS_PER_DAY: i64 = 60 * 60 * 24;

/// How much detail the relative time carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Granularity {
    /// Coarsest unit plus the next smaller one when it is non-zero,
    /// e.g. `"2 hours, 5 minutes ago"`.
    #[default]
    Fine,
    /// Coarsest unit only, e.g. `"2 hours ago"`.
    Coarse,
}

pub fn pluralize(value: i64, unit: &str) -> String {
    if value == 1 {
        format!("{} {}", value, unit)
    } else {
        format!("{} {}s", value, unit)
    }
}

/// Format an elapsed number of seconds as a relative time string.
///
/// Negative input (a timestamp ahead of the viewer's clock) reads as zero.
pub fn format_elapsed(seconds: i64, granularity: Granularity) -> String {
    let seconds = seconds.max(0);

    if seconds < SECS_PER_MINUTE {
        return format!("{} ago", pluralize(seconds, "second"));
    }

    let minutes = seconds / SECS_PER_MINUTE;
    let hours = seconds / SECS_PER_HOUR;
    let days = seconds / SECS_PER_DAY;

    let (major, minor) = if days > 0 {
        (pluralize(days, "day"), non_zero(hours % 24, "hour"))
    } else if hours > 0 {
        (pluralize(hours, "hour"), non_zero(minutes % 60, "minute"))
    } else {
        (pluralize(minutes, "minute"), None)
    };

    match (granularity, minor) {
        (Granularity::Fine, Some(minor)) => format!("{}, {} ago", major, minor),
        _ => format!("{} ago", major),
    }
}

fn non_zero(value: i64, unit: &str) -> Option<String> {
    (value > 0).then(|| pluralize(value, unit))
}

pub fn time_ago(now: DateTime<Utc>, then: DateTime<Utc>, granularity: Granularity) -> String {
    format_elapsed((now - then).num_seconds(), granularity)
}
