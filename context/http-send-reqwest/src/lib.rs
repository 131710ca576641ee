//! Reqwest-based transport for ec2sign.
//!
//! `ReqwestHttpSend` implements [`HttpSend`] so that a signed
//! `http::Request<Bytes>` can be handed to `reqwest` unchanged.
//!
//! ```no_run
//! use ec2sign_core::{Context, OsEnv};
//! use ec2sign_http_send_reqwest::ReqwestHttpSend;
//!
//! let ctx = Context::new()
//!     .with_http_send(ReqwestHttpSend::default())
//!     .with_env(OsEnv);
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use ec2sign_core::{Error, HttpSend, Result};
use http_body_util::BodyExt;
use log::debug;
use reqwest::{Client, Request};

/// HttpSend implementation backed by a [`reqwest::Client`].
#[derive(Debug, Default, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        debug!("sending {} {}", req.method(), req.uri());

        let req = Request::try_from(req).map_err(|e| {
            Error::request_invalid("failed to convert request for reqwest").with_source(e)
        })?;
        let resp: http::Response<_> = self
            .client
            .execute(req)
            .await
            .map_err(|e| Error::unexpected("failed to send http request").with_source(e))?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| Error::unexpected("failed to read http response body").with_source(e))?;
        debug!("received {} with {} bytes", parts.status, bs.len());

        Ok(http::Response::from_parts(parts, bs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_request_is_rejected_before_sending() {
        // reqwest only accepts absolute http(s) urls.
        let req = http::Request::builder()
            .uri("/relative/only")
            .body(Bytes::new())
            .expect("request must be valid");

        let err = ReqwestHttpSend::default()
            .http_send(req)
            .await
            .expect_err("must fail");
        assert_eq!(err.kind(), ec2sign_core::ErrorKind::RequestInvalid);
    }
}
