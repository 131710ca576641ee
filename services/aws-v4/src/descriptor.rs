use crate::constants::{HOST, X_AMZ_DATE};
use bytes::Bytes;
use ec2sign_core::{Error, Result};
use http::header::AUTHORIZATION;
use http::Method;
use percent_encoding::percent_decode_str;
use std::collections::BTreeMap;

/// Query part of a request to sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Raw, unencoded `(name, value)` pairs.
    ///
    /// They are percent-encoded and stably sorted by name while signing.
    Params(Vec<(String, String)>),
    /// An already encoded and sorted query string, like
    /// `Action=RunInstances&ImageId=ami-047a51fa27710816e`.
    ///
    /// Used verbatim as the canonical query string.
    Raw(String),
}

impl Default for Query {
    fn default() -> Self {
        Query::Params(Vec::new())
    }
}

impl Query {
    /// Returns true if there is no query at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Query::Params(v) => v.is_empty(),
            Query::Raw(s) => s.is_empty(),
        }
    }

    /// Decode into raw pairs.
    ///
    /// A raw query is split on `&` and on the first `=` of every segment,
    /// then percent-decoded. `+` is kept as is.
    pub fn to_params(&self) -> Vec<(String, String)> {
        match self {
            Query::Params(v) => v.clone(),
            Query::Raw(s) => parse_query(s),
        }
    }
}

fn parse_query(s: &str) -> Vec<(String, String)> {
    s.split('&')
        .filter(|seg| !seg.is_empty())
        .map(|seg| {
            let (k, v) = seg.split_once('=').unwrap_or((seg, ""));
            (
                percent_decode_str(k).decode_utf8_lossy().into_owned(),
                percent_decode_str(v).decode_utf8_lossy().into_owned(),
            )
        })
        .collect()
}

/// RequestDescriptor is the immutable description of a request to sign.
///
/// Every `with_*` method returns a new descriptor.
///
/// `host`, `x-amz-date` and `authorization` are owned by the signer (the
/// date comes from the [`TimeContext`](crate::TimeContext)) and can't be set
/// as headers.
///
/// ```
/// use ec2sign_aws_v4::RequestDescriptor;
/// use http::Method;
///
/// let desc = RequestDescriptor::new(Method::GET, "ec2.amazonaws.com")
///     .with_query_param("Action", "DescribeRegions")
///     .with_query_param("Version", "2016-11-15");
/// assert_eq!(desc.path(), "/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    method: Method,
    host: String,
    path: String,
    query: Query,
    headers: BTreeMap<String, String>,
    signed_headers: Option<Vec<String>>,
    payload: Bytes,
}

impl RequestDescriptor {
    /// Create a descriptor for `method` against `host` with path `/`.
    pub fn new(method: Method, host: impl Into<String>) -> Self {
        Self {
            method,
            host: host.into(),
            path: "/".to_string(),
            query: Query::default(),
            headers: BTreeMap::new(),
            signed_headers: None,
            payload: Bytes::new(),
        }
    }

    /// Build a descriptor from request parts and the body that will be sent.
    ///
    /// The host comes from the uri authority, or the `host` header when the
    /// uri is relative. The port is kept only when it is not the default one
    /// of the scheme. Every other header is kept and will be signed, except
    /// `authorization` and `x-amz-date` which belong to a previous signature.
    pub fn from_parts(parts: &http::request::Parts, payload: impl Into<Bytes>) -> Result<Self> {
        let host = match parts.uri.authority() {
            Some(authority) => match (parts.uri.scheme_str(), authority.port_u16()) {
                (Some("http"), Some(80)) | (Some("https"), Some(443)) | (_, None) => {
                    authority.host().to_string()
                }
                (_, Some(port)) => format!("{}:{port}", authority.host()),
            },
            None => parts
                .headers
                .get(http::header::HOST)
                .map(|v| v.to_str())
                .transpose()?
                .map(|v| v.to_string())
                .ok_or_else(|| {
                    Error::request_invalid("request without authority is invalid for signing")
                        .with_context(format!("uri: {}", parts.uri))
                })?,
        };

        let mut headers = BTreeMap::new();
        for (name, value) in parts.headers.iter() {
            if name == http::header::HOST || name == AUTHORIZATION || name.as_str() == X_AMZ_DATE {
                continue;
            }
            headers.insert(name.as_str().to_string(), value.to_str()?.to_string());
        }

        Ok(Self {
            method: parts.method.clone(),
            host,
            path: parts.uri.path().to_string(),
            query: Query::Params(parts.uri.query().map(parse_query).unwrap_or_default()),
            headers,
            signed_headers: None,
            payload: payload.into(),
        })
    }

    /// Set the uri path, `/` if empty.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Replace the whole query.
    pub fn with_query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    /// Use an already encoded and sorted query string.
    pub fn with_raw_query(self, raw: impl Into<String>) -> Self {
        self.with_query(Query::Raw(raw.into()))
    }

    /// Append a raw query parameter.
    ///
    /// A [`Query::Raw`] query is decoded into parameters first, so the result
    /// is sorted while signing.
    pub fn with_query_param(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_query_params([(name.into(), value.into())])
    }

    /// Append raw query parameters, keeping their order.
    pub fn with_query_params(
        mut self,
        params: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        let mut all = self.query.to_params();
        all.extend(params);
        self.query = Query::Params(all);
        self
    }

    /// Set a header. The name is trimmed and lowercased.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().trim().to_lowercase(), value.into());
        self
    }

    /// Designate exactly which headers are signed.
    ///
    /// `host` (and `x-amz-date` for header signing) are always added.
    pub fn with_signed_headers<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.signed_headers = Some(
            names
                .into_iter()
                .map(|v| v.as_ref().trim().to_lowercase())
                .collect(),
        );
        self
    }

    /// Set the payload.
    pub fn with_payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.payload = payload.into();
        self
    }

    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Host, possibly with port.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Uri path as given, `/` if empty.
    pub fn path(&self) -> &str {
        if self.path.is_empty() {
            "/"
        } else {
            &self.path
        }
    }

    /// Query as given.
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Extra headers, keyed by lowercase name.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Headers designated by the caller, `None` means every header.
    pub fn signed_headers(&self) -> Option<&[String]> {
        self.signed_headers.as_deref()
    }

    /// Payload bytes.
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Check the signing contract.
    ///
    /// - host must not be empty
    /// - header names must be non-empty and valid http header names
    /// - `host`, `x-amz-date` and `authorization` must not appear among the headers
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::request_invalid("host is required for signing"));
        }

        for name in self.headers.keys() {
            if name.is_empty() || http::HeaderName::from_bytes(name.as_bytes()).is_err() {
                return Err(Error::request_invalid("header name is not valid")
                    .with_context(format!("header: {name:?}")));
            }
            if name == HOST || name == X_AMZ_DATE || name == AUTHORIZATION.as_str() {
                return Err(Error::request_invalid("header is owned by the signer")
                    .with_context(format!("header: {name}")));
            }
        }

        Ok(())
    }
}
