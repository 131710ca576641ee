//! Canonical request construction.
//!
//! - [Create a canonical request](https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html#create-canonical-request)

use crate::constants::{
    AWS_QUERY_ENCODE_SET, AWS_URI_ENCODE_SET, EMPTY_STRING_SHA256, HOST, X_AMZ_DATE,
};
use crate::{Query, RequestDescriptor, TimeContext};
use ec2sign_core::hash::hex_sha256;
use ec2sign_core::{Error, Result, SigningMethod};
use percent_encoding::utf8_percent_encode;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Build the canonical request for `descriptor`.
///
/// ```text
/// POST
/// /
///
/// content-type:application/x-www-form-urlencoded
/// host:ec2.amazonaws.com
/// x-amz-date:20190101T000000Z
///
/// content-type;host;x-amz-date
/// <hex sha256 of payload>
/// ```
///
/// `method` decides which headers are signed when the descriptor doesn't
/// designate them: header signing always covers `x-amz-date`, query signing
/// only covers `host` unless asked otherwise.
pub fn build_canonical_request(
    descriptor: &RequestDescriptor,
    time: &TimeContext,
    method: SigningMethod,
) -> Result<String> {
    descriptor.validate()?;

    let headers = canonical_headers(descriptor, time, method)?;

    // 512 is enough for most EC2 requests.
    let mut f = String::with_capacity(512);
    writeln!(f, "{}", descriptor.method())?;
    writeln!(f, "{}", canonical_uri(descriptor.path()))?;
    writeln!(f, "{}", canonical_query_string(descriptor.query()))?;
    for (name, value) in headers.iter() {
        writeln!(f, "{name}:{value}")?;
    }
    writeln!(f)?;
    writeln!(f, "{}", signed_header_list(&headers))?;
    write!(f, "{}", payload_hash(descriptor.payload()))?;

    Ok(f)
}

/// Normalize dot segments, then encode the path with AWS UriEncode.
///
/// The path is not decoded first, so an already escaped `%2F` is signed
/// as `%252F`.
pub(crate) fn canonical_uri(path: &str) -> String {
    let path = normalize_path(path);
    utf8_percent_encode(&path, &AWS_URI_ENCODE_SET).to_string()
}

/// Drop empty and `.` segments and resolve `..`.
///
/// A path without `.` or `//` is returned as is. A trailing slash survives.
fn normalize_path(path: &str) -> String {
    let path = match path {
        "" => "/".to_string(),
        v if !v.starts_with('/') => format!("/{v}"),
        v => v.to_string(),
    };
    if !path.contains('.') && !path.contains("//") {
        return path;
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            v => segments.push(v),
        }
    }

    let mut normalized = format!("/{}", segments.join("/"));
    let trailing = ["/", "/.", "/.."].iter().any(|v| path.ends_with(v));
    if trailing && !normalized.ends_with('/') {
        normalized.push('/');
    }
    normalized
}

/// Encode names and values, then sort by encoded name.
///
/// The sort is stable: repeated names keep their given order. A raw query
/// is used as is.
pub(crate) fn canonical_query_string(query: &Query) -> String {
    match query {
        Query::Raw(raw) => raw.clone(),
        Query::Params(params) => {
            let mut encoded = params
                .iter()
                .map(|(k, v)| {
                    (
                        utf8_percent_encode(k, &AWS_QUERY_ENCODE_SET).to_string(),
                        utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET).to_string(),
                    )
                })
                .collect::<Vec<_>>();
            encoded.sort_by(|(a, _), (b, _)| a.cmp(b));

            encoded
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("&")
        }
    }
}

/// Signed headers with their normalized values, sorted by name.
pub(crate) fn canonical_headers(
    descriptor: &RequestDescriptor,
    time: &TimeContext,
    method: SigningMethod,
) -> Result<BTreeMap<String, String>> {
    let mut names: Vec<&str> = match descriptor.signed_headers() {
        Some(names) => names.iter().map(String::as_str).collect(),
        None => descriptor.headers().keys().map(String::as_str).collect(),
    };
    names.push(HOST);
    if !method.is_query() {
        names.push(X_AMZ_DATE);
    }

    let mut headers = BTreeMap::new();
    for name in names {
        let value = match name {
            HOST => descriptor.host().to_string(),
            X_AMZ_DATE => time.amz_date(),
            _ => descriptor.headers().get(name).cloned().ok_or_else(|| {
                Error::request_invalid("signed header is not present in request")
                    .with_context(format!("header: {name}"))
            })?,
        };
        headers.insert(name.to_string(), normalize_header_value(&value));
    }

    Ok(headers)
}

/// `content-type;host;x-amz-date`
pub(crate) fn signed_header_list(headers: &BTreeMap<String, String>) -> String {
    headers.keys().map(String::as_str).collect::<Vec<_>>().join(";")
}

/// Hex SHA-256 of the payload.
pub(crate) fn payload_hash(payload: &[u8]) -> String {
    if payload.is_empty() {
        EMPTY_STRING_SHA256.to_string()
    } else {
        hex_sha256(payload)
    }
}

/// Trim the value and collapse inner whitespace runs into one space.
fn normalize_header_value(v: &str) -> String {
    v.split_whitespace().collect::<Vec<_>>().join(" ")
}
