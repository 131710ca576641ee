//! Core components for signing EC2 API requests.
//!
//! This crate provides the foundational types and traits shared by the
//! ec2sign crates:
//!
//! - [`Context`]: holds the collaborators that live outside the signer:
//!   environment ([`Env`]), file reading ([`FileRead`]) and the HTTP
//!   transport ([`HttpSend`]).
//! - [`ProvideCredential`]: the credential source collaborator, composable
//!   with [`ProvideCredentialChain`].
//! - [`SignRequest`]: a synchronous, side-effect free request signer.
//! - [`Signer`]: loads a credential, reads the clock once and signs.
//! - [`Error`]: the single error type, classified by [`ErrorKind`].
//!
//! ## Example
//!
//! ```
//! use ec2sign_core::{Context, ProvideCredential, Result, SigningCredential};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     key: String,
//!     secret: String,
//! }
//!
//! impl SigningCredential for MyCredential {
//!     fn is_valid(&self) -> bool {
//!         !self.key.is_empty() && !self.secret.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MyProvider;
//!
//! #[async_trait]
//! impl ProvideCredential for MyProvider {
//!     type Credential = MyCredential;
//!
//!     async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
//!         Ok(Some(MyCredential {
//!             key: "my-access-key".to_string(),
//!             secret: "my-secret-key".to_string(),
//!         }))
//!     }
//! }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: SHA-256 and HMAC-SHA256 helpers
//! - [`time`]: UTC time and the SigV4 time formats
//! - [`utils`]: redaction of secrets in `Debug` output

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};

mod context;
pub use context::{Context, Env, FileRead, HttpSend, NoopEnv, NoopFileRead, NoopHttpSend};
pub use context::{OsEnv, StaticEnv};

mod api;
pub use api::{ProvideCredential, SignRequest, SigningCredential};
mod chain;
pub use chain::ProvideCredentialChain;
mod request;
pub use request::SigningMethod;
mod signer;
pub use signer::Signer;
