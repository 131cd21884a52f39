//! Parsing of the `datetime` attribute values written by the page generator.
//!
//! The generator is not consistent about precision or offsets: listing end
//! times arrive as `2024-05-01T12:00:00.000Z`, the last-updated stamp as a naive
//! `2024-05-01T12:00:00`, and some pages carry minute precision offsets such as
//! `2024-05-01T12:00+00:00`. Naive values are read in the viewer's local offset,
//! the same way a browser `Date` reads them.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::{AnnotateError, Result};

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M%:z", "%Y-%m-%dT%H:%M%z"];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

pub fn parse_timestamp(value: &str, local_offset: FixedOffset) -> Result<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    // chrono's rfc3339 parser wants seconds, and a trailing `Z` is not a `%z`
    let zulu_normalised = value
        .strip_suffix('Z')
        .or_else(|| value.strip_suffix('z'))
        .map(|rest| format!("{rest}+00:00"));
    let with_offset = zulu_normalised.as_deref().unwrap_or(value);
    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(with_offset, format) {
            return Ok(parsed.with_timezone(&Utc));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return local_offset
                .from_local_datetime(&naive)
                .single()
                .map(|local| local.with_timezone(&Utc))
                .ok_or_else(|| AnnotateError::InvalidTimestamp(value.to_string()));
        }
    }

    // Date-only forms are UTC midnight, not local midnight
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    Err(AnnotateError::InvalidTimestamp(value.to_string()))
}
