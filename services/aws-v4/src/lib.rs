//! AWS SigV4 signing for the EC2 Query API.
//!
//! This crate builds canonical requests, derives signing keys and attaches
//! signatures either as an `Authorization` header or as presigned query
//! parameters.
//!
//! ## Example
//!
//! ```
//! use ec2sign_aws_v4::{Credential, RequestDescriptor, RequestSigner, TimeContext};
//! use ec2sign_core::{time, SigningMethod};
//! use http::Method;
//!
//! # fn main() -> ec2sign_core::Result<()> {
//! let desc = RequestDescriptor::new(Method::POST, "ec2.amazonaws.com")
//!     .with_header("content-type", "application/x-www-form-urlencoded")
//!     .with_payload("Action=RunInstances&ImageId=ami-047a51fa27710816e&InstanceType=t2.micro&MaxCount=1&MinCount=1&Version=2016-11-15");
//! let cred = Credential::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY");
//!
//! let signed = RequestSigner::new("ec2", "us-east-1").sign(
//!     &desc,
//!     &cred,
//!     &TimeContext::new(time::now()),
//!     SigningMethod::Header,
//! )?;
//! assert!(signed.authorization().is_some());
//! # Ok(())
//! # }
//! ```
//!
//! Credentials usually come from a provider instead:
//!
//! - [`StaticCredentialProvider`]
//! - [`EnvCredentialProvider`]
//! - [`ProfileCredentialProvider`]
//! - [`ConfigCredentialProvider`]
//! - [`DefaultCredentialProvider`]

#![warn(missing_docs)]

mod constants;

mod config;
pub use config::{Config, DEFAULT_REGION};

mod credential;
pub use credential::Credential;

mod descriptor;
pub use descriptor::{Query, RequestDescriptor};

mod time_context;
pub use time_context::TimeContext;

mod canonical;
pub use canonical::build_canonical_request;

mod sign_request;
pub use sign_request::{
    attach_as_header, attach_to_query, build_string_to_sign, credential_scope,
    derive_signing_key, sign, RequestSigner, SignedRequest,
};

mod provide_credential;
pub use provide_credential::*;
