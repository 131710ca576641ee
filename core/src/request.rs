use std::time::Duration;

/// SigningMethod is the presentation mode used in signing.
///
/// Only one mode is used per request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SigningMethod {
    /// Signing with the `Authorization` header.
    Header,
    /// Signing with `X-Amz-*` query parameters, valid for the given duration.
    Query(Duration),
}

impl SigningMethod {
    /// Returns the expiry of a presigned request, `None` for header signing.
    pub fn expires_in(&self) -> Option<Duration> {
        match self {
            SigningMethod::Header => None,
            SigningMethod::Query(d) => Some(*d),
        }
    }

    /// Returns true if the signature goes into the query string.
    pub fn is_query(&self) -> bool {
        matches!(self, SigningMethod::Query(_))
    }
}
