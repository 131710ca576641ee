// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::canonical::{
    build_canonical_request, canonical_headers, canonical_query_string, signed_header_list,
};
use crate::constants::{
    AWS4_HMAC_SHA256, AWS4_REQUEST, X_AMZ_ALGORITHM, X_AMZ_CREDENTIAL, X_AMZ_DATE,
    X_AMZ_DATE_PARAM, X_AMZ_EXPIRES, X_AMZ_SECURITY_TOKEN, X_AMZ_SECURITY_TOKEN_PARAM,
    X_AMZ_SIGNATURE, X_AMZ_SIGNED_HEADERS,
};
use crate::{Credential, RequestDescriptor, TimeContext};
use bytes::Bytes;
use ec2sign_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use ec2sign_core::time::DateTime;
use ec2sign_core::{Error, Result, SignRequest, SigningMethod};
use http::request::Parts;
use http::uri::PathAndQuery;
use http::{header, HeaderName, HeaderValue, Method, Uri};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::time::Duration;

/// Characters that can't appear in a uri path as is. `%` is kept.
const WIRE_PATH_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// RequestSigner that implement AWS SigV4.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
///
/// Signing is a pure function of the descriptor, the credential and the
/// time context: it doesn't read the clock, the environment or the network.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    service: String,
    region: String,
}

impl RequestSigner {
    /// Create a new signer for `service` in `region`, like `ec2` in `us-east-1`.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),
        }
    }

    /// Service this signer signs for.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Region this signer signs for.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Sign `descriptor` with `credential` at `time`.
    ///
    /// The credential is checked before anything else, so an incomplete
    /// credential always fails with `CredentialMissing`.
    pub fn sign(
        &self,
        descriptor: &RequestDescriptor,
        credential: &Credential,
        time: &TimeContext,
        method: SigningMethod,
    ) -> Result<SignedRequest> {
        credential.check()?;
        descriptor.validate()?;

        let scope = credential_scope(time, &self.region, &self.service);

        let mut desc = descriptor.clone();
        match method {
            SigningMethod::Header => {
                if let Some(token) = &credential.session_token {
                    desc = desc.with_header(X_AMZ_SECURITY_TOKEN, token);
                    if let Some(names) = desc.signed_headers() {
                        let mut names = names.to_vec();
                        names.push(X_AMZ_SECURITY_TOKEN.to_string());
                        desc = desc.with_signed_headers(names);
                    }
                }
            }
            SigningMethod::Query(expires_in) => {
                let headers = canonical_headers(&desc, time, method)?;
                desc = desc.with_query_params(presign_query_params(
                    credential,
                    &scope,
                    time,
                    expires_in,
                    &signed_header_list(&headers),
                ));
            }
        }

        let signed = canonical_headers(&desc, time, method)?;
        let signed_headers = signed_header_list(&signed);

        let canonical_request = build_canonical_request(&desc, time, method)?;
        let string_to_sign =
            build_string_to_sign(&canonical_request, time, &self.region, &self.service);
        let signing_key = derive_signing_key(
            &credential.secret_access_key,
            &time.date_stamp(),
            &self.region,
            &self.service,
        )?;
        let signature = sign(&string_to_sign, &signing_key)?;

        let mut headers = desc
            .headers()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect::<Vec<_>>();
        let query = match method {
            SigningMethod::Header => {
                headers.push((X_AMZ_DATE.to_string(), time.amz_date()));
                headers.push((
                    header::AUTHORIZATION.to_string(),
                    attach_as_header(
                        &credential.access_key_id,
                        &scope,
                        &signed_headers,
                        &signature,
                    ),
                ));
                canonical_query_string(desc.query())
            }
            SigningMethod::Query(_) => {
                if signed.contains_key(X_AMZ_DATE) {
                    headers.push((X_AMZ_DATE.to_string(), time.amz_date()));
                }
                attach_to_query(&desc, &signature)
            }
        };

        Ok(SignedRequest {
            method: desc.method().clone(),
            host: desc.host().to_string(),
            path: utf8_percent_encode(desc.path(), WIRE_PATH_ENCODE_SET).to_string(),
            query,
            headers,
            signature,
            credential_scope: scope,
            signed_headers,
            canonical_request,
            string_to_sign,
        })
    }
}

impl SignRequest for RequestSigner {
    type Credential = Credential;

    fn sign_request(
        &self,
        req: &mut Parts,
        payload: &[u8],
        credential: Option<&Self::Credential>,
        method: SigningMethod,
        now: DateTime,
    ) -> Result<()> {
        let Some(cred) = credential else {
            return Err(Error::credential_missing("credential is required for signing"));
        };
        cred.check()?;

        let desc = RequestDescriptor::from_parts(req, Bytes::copy_from_slice(payload))?;
        let signed = self.sign(&desc, cred, &TimeContext::new(now), method)?;
        signed.apply(req)
    }
}

/// The outcome of signing: everything the request has to carry on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    method: Method,
    host: String,
    path: String,
    query: String,
    headers: Vec<(String, String)>,
    signature: String,
    credential_scope: String,
    signed_headers: String,
    canonical_request: String,
    string_to_sign: String,
}

impl SignedRequest {
    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Host the request must be sent to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Path as sent on the wire.
    ///
    /// This is the descriptor path, not its canonical form: `/a%2Fb` stays
    /// `/a%2Fb` while the canonical request carries `/a%252Fb`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Encoded query string, `X-Amz-Signature` included for query signing.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Headers the request must carry besides `host`.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Value of a header by lowercase name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// The `Authorization` value, only set for header signing.
    pub fn authorization(&self) -> Option<&str> {
        self.header(header::AUTHORIZATION.as_str())
    }

    /// Lowercase hex signature.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// `20190101/us-east-1/ec2/aws4_request`
    pub fn credential_scope(&self) -> &str {
        &self.credential_scope
    }

    /// `content-type;host;x-amz-date`
    pub fn signed_headers(&self) -> &str {
        &self.signed_headers
    }

    /// Canonical request that was signed.
    pub fn canonical_request(&self) -> &str {
        &self.canonical_request
    }

    /// String to sign that was signed.
    pub fn string_to_sign(&self) -> &str {
        &self.string_to_sign
    }

    /// Full url with the given scheme, like `https`.
    pub fn url(&self, scheme: &str) -> String {
        if self.query.is_empty() {
            format!("{scheme}://{}{}", self.host, self.path)
        } else {
            format!("{scheme}://{}{}?{}", self.host, self.path, self.query)
        }
    }

    /// Write query and headers into the request parts.
    ///
    /// The uri path is left as the request already carries it.
    pub fn apply(&self, parts: &mut Parts) -> Result<()> {
        let path = match parts.uri.path() {
            "" => "/",
            v => v,
        };
        let path_and_query = if self.query.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{}", self.query)
        };

        let mut uri_parts = std::mem::take(&mut parts.uri).into_parts();
        uri_parts.path_and_query = Some(path_and_query.parse::<PathAndQuery>()?);
        parts.uri = Uri::from_parts(uri_parts)?;

        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())?;
            let mut value = HeaderValue::from_str(value)?;
            if name == header::AUTHORIZATION || name.as_str() == X_AMZ_SECURITY_TOKEN {
                value.set_sensitive(true);
            }
            parts.headers.insert(name, value);
        }

        Ok(())
    }
}

/// Scope: `20190101/us-east-1/ec2/aws4_request`
pub fn credential_scope(time: &TimeContext, region: &str, service: &str) -> String {
    format!(
        "{}/{}/{}/{}",
        time.date_stamp(),
        region,
        service,
        AWS4_REQUEST
    )
}

/// StringToSign:
///
/// ```text
/// AWS4-HMAC-SHA256
/// 20190101T000000Z
/// 20190101/us-east-1/ec2/aws4_request
/// <hashed_canonical_request>
/// ```
pub fn build_string_to_sign(
    canonical_request: &str,
    time: &TimeContext,
    region: &str,
    service: &str,
) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        AWS4_HMAC_SHA256,
        time.amz_date(),
        credential_scope(time, region, service),
        hex_sha256(canonical_request.as_bytes())
    )
}

/// Derive the signing key:
///
/// ```text
/// kDate    = HMAC("AWS4" + secret, date_stamp)
/// kRegion  = HMAC(kDate, region)
/// kService = HMAC(kRegion, service)
/// kSigning = HMAC(kService, "aws4_request")
/// ```
pub fn derive_signing_key(
    secret: &str,
    date_stamp: &str,
    region: &str,
    service: &str,
) -> Result<Vec<u8>> {
    let secret = format!("AWS4{secret}");
    let sign_date = hmac_sha256(secret.as_bytes(), date_stamp.as_bytes())?;
    let sign_region = hmac_sha256(&sign_date, region.as_bytes())?;
    let sign_service = hmac_sha256(&sign_region, service.as_bytes())?;
    hmac_sha256(&sign_service, AWS4_REQUEST.as_bytes())
}

/// Lowercase hex HMAC-SHA256 of `string_to_sign`.
pub fn sign(string_to_sign: &str, signing_key: &[u8]) -> Result<String> {
    hex_hmac_sha256(signing_key, string_to_sign.as_bytes())
}

/// `AWS4-HMAC-SHA256 Credential=<ak>/<scope>, SignedHeaders=<list>, Signature=<sig>`
pub fn attach_as_header(
    access_key_id: &str,
    credential_scope: &str,
    signed_headers: &str,
    signature: &str,
) -> String {
    format!(
        "{AWS4_HMAC_SHA256} Credential={access_key_id}/{credential_scope}, SignedHeaders={signed_headers}, Signature={signature}"
    )
}

/// Canonical query string of `descriptor` with `X-Amz-Signature` appended.
pub fn attach_to_query(descriptor: &RequestDescriptor, signature: &str) -> String {
    let query = canonical_query_string(descriptor.query());
    if query.is_empty() {
        format!("{X_AMZ_SIGNATURE}={signature}")
    } else {
        format!("{query}&{X_AMZ_SIGNATURE}={signature}")
    }
}

/// Parameters a presigned request carries before it is signed.
fn presign_query_params(
    cred: &Credential,
    scope: &str,
    time: &TimeContext,
    expires_in: Duration,
    signed_headers: &str,
) -> Vec<(String, String)> {
    let mut params = vec![
        (X_AMZ_ALGORITHM.to_string(), AWS4_HMAC_SHA256.to_string()),
        (
            X_AMZ_CREDENTIAL.to_string(),
            format!("{}/{}", cred.access_key_id, scope),
        ),
        (X_AMZ_DATE_PARAM.to_string(), time.amz_date()),
        (X_AMZ_EXPIRES.to_string(), expires_in.as_secs().to_string()),
        (X_AMZ_SIGNED_HEADERS.to_string(), signed_headers.to_string()),
    ];
    if let Some(token) = &cred.session_token {
        params.push((X_AMZ_SECURITY_TOKEN_PARAM.to_string(), token.clone()));
    }
    params
}
