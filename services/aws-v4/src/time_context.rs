use ec2sign_core::time::{format_date, format_iso8601, DateTime};

/// TimeContext pins a signing operation to one UTC instant.
///
/// Both renderings come from the same instant, so the `x-amz-date` value and
/// the date in the credential scope can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeContext {
    instant: DateTime,
}

impl TimeContext {
    /// Create a time context for the given instant.
    pub fn new(instant: DateTime) -> Self {
        Self { instant }
    }

    /// The instant this context renders.
    pub fn instant(&self) -> DateTime {
        self.instant
    }

    /// Full timestamp: `20190101T000000Z`
    pub fn amz_date(&self) -> String {
        format_iso8601(self.instant)
    }

    /// Date only: `20190101`
    pub fn date_stamp(&self) -> String {
        format_date(self.instant)
    }
}

impl From<DateTime> for TimeContext {
    fn from(instant: DateTime) -> Self {
        Self::new(instant)
    }
}
