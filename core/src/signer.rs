use crate::time::{self, DateTime};
use crate::{
    Context, Error, ProvideCredential, Result, SignRequest, SigningCredential, SigningMethod,
};
use log::debug;
use std::sync::Arc;

/// Signer glues a credential provider and a request signer together.
///
/// Every call loads a fresh credential and reads the clock exactly once.
/// Nothing is cached between calls: the credential only lives for the
/// duration of one signing operation.
#[derive(Clone, Debug)]
pub struct Signer<K: SigningCredential> {
    ctx: Context,
    provider: Arc<dyn ProvideCredential<Credential = K>>,
    builder: Arc<dyn SignRequest<Credential = K>>,
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer.
    pub fn new(
        ctx: Context,
        provider: impl ProvideCredential<Credential = K>,
        builder: impl SignRequest<Credential = K>,
    ) -> Self {
        Self {
            ctx,
            provider: Arc::new(provider),
            builder: Arc::new(builder),
        }
    }

    /// Get the context used by this signer.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Replace the credential provider.
    pub fn with_credential_provider(
        mut self,
        provider: impl ProvideCredential<Credential = K>,
    ) -> Self {
        self.provider = Arc::new(provider);
        self
    }

    /// Sign the request at the current time.
    pub async fn sign(
        &self,
        req: &mut http::request::Parts,
        payload: &[u8],
        method: SigningMethod,
    ) -> Result<()> {
        self.sign_at(req, payload, method, time::now()).await
    }

    /// Sign the request at the given instant.
    pub async fn sign_at(
        &self,
        req: &mut http::request::Parts,
        payload: &[u8],
        method: SigningMethod,
        now: DateTime,
    ) -> Result<()> {
        let cred = self.provider.provide_credential(&self.ctx).await?;
        let Some(cred) = cred.filter(|c| c.is_valid()) else {
            return Err(Error::credential_missing(
                "no valid credential found, refusing to sign",
            ));
        };
        debug!("signing {} {} with {cred:?}", req.method, req.uri);

        self.builder
            .sign_request(req, payload, Some(&cred), method, now)
    }
}
