//! Time related utils.

use crate::Error;
use crate::Result;
use chrono::NaiveDateTime;
use chrono::Utc;

/// UTC instant used across ec2sign.
pub type DateTime = chrono::DateTime<Utc>;

/// Date format: "20220313"
const DATE: &str = "%Y%m%d";

/// ISO 8601 basic format: "20220313T072004Z"
const ISO8601: &str = "%Y%m%dT%H%M%SZ";

/// Read the current UTC time.
///
/// This is the only place that reads the wall clock.
#[inline]
pub fn now() -> DateTime {
    Utc::now()
}

/// Format time into date: `20220301`
pub fn format_date(t: DateTime) -> String {
    t.format(DATE).to_string()
}

/// Format time into ISO 8601 basic: `20220313T072004Z`
pub fn format_iso8601(t: DateTime) -> String {
    t.format(ISO8601).to_string()
}

/// Parse ISO 8601 basic time: `20220313T072004Z`
pub fn parse_iso8601(s: &str) -> Result<DateTime> {
    let t = NaiveDateTime::parse_from_str(s, ISO8601).map_err(|e| {
        Error::unexpected("failed to parse ISO 8601 basic time")
            .with_source(e)
            .with_context(format!("input: {s}"))
    })?;
    Ok(t.and_utc())
}
