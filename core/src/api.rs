use crate::time::DateTime;
use crate::{Context, Result, SigningMethod};
use std::fmt::Debug;

/// SigningCredential is the trait used by signer as the signing credential.
pub trait SigningCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// Check if the credential carries everything needed to sign.
    fn is_valid(&self) -> bool;
}

impl<T: SigningCredential> SigningCredential for Option<T> {
    fn is_valid(&self) -> bool {
        let Some(cred) = self else {
            return false;
        };

        cred.is_valid()
    }
}

/// ProvideCredential is the credential source collaborator.
///
/// Implementations return `Ok(None)` when their source simply has nothing to
/// offer (env var unset, profile missing) and `Err` when the source exists but
/// is broken (unparsable profile file).
#[async_trait::async_trait]
pub trait ProvideCredential: Debug + Send + Sync + Unpin + 'static {
    /// Credential returned by this provider.
    type Credential: Send + Sync + Unpin + 'static;

    /// Load credential from current context.
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>>;
}

/// SignRequest signs an HTTP request in place.
///
/// Signing is a pure computation: implementations must not read the clock,
/// the environment or the network. The signing instant is passed in as `now`
/// and is the only time source for the whole request.
pub trait SignRequest: Debug + Send + Sync + Unpin + 'static {
    /// Credential used by this signer.
    type Credential: Send + Sync + Unpin + 'static;

    /// Sign `req`, whose body is `payload`.
    ///
    /// ## Credential
    ///
    /// `None` or an incomplete credential must fail with
    /// [`ErrorKind::CredentialMissing`](crate::ErrorKind::CredentialMissing)
    /// before any other work.
    ///
    /// ## Method
    ///
    /// [`SigningMethod::Header`] attaches the signature as headers,
    /// [`SigningMethod::Query`] rewrites the query string into a presigned one.
    fn sign_request(
        &self,
        req: &mut http::request::Parts,
        payload: &[u8],
        credential: Option<&Self::Credential>,
        method: SigningMethod,
        now: DateTime,
    ) -> Result<()>;
}
