use anyhow::Result;
use chrono::{TimeZone, Utc};
use ec2sign_aws_v4::{Credential, RequestSigner, StaticCredentialProvider};
use ec2sign_core::{Context, ErrorKind, ProvideCredential, Signer, SigningMethod};
use http::Request;

#[derive(Debug)]
struct NoCredential;

#[async_trait::async_trait]
impl ProvideCredential for NoCredential {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> ec2sign_core::Result<Option<Credential>> {
        Ok(None)
    }
}

#[tokio::test]
async fn test_signer_with_static_provider() -> Result<()> {
    let signer = Signer::new(
        Context::new(),
        StaticCredentialProvider::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY"),
        RequestSigner::new("ec2", "us-east-1"),
    );
    let now = Utc
        .with_ymd_and_hms(2019, 1, 1, 0, 0, 0)
        .single()
        .expect("must be valid");

    let (mut parts, _) = Request::post(
        "https://ec2.amazonaws.com/?Action=RunInstances&ImageId=ami-047a51fa27710816e&InstanceType=t2.micro&MaxCount=1&MinCount=1",
    )
    .body(())?
    .into_parts();
    signer
        .sign_at(&mut parts, b"", SigningMethod::Header, now)
        .await?;

    assert_eq!(
        parts.headers["authorization"],
        "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20190101/us-east-1/ec2/aws4_request, SignedHeaders=host;x-amz-date, Signature=d9232c581912b5d6fa1cb6a24d11e400542e5c31a30382f5d65d4df31b2064e8"
    );
    assert_eq!(parts.headers["x-amz-date"], "20190101T000000Z");
    Ok(())
}

#[tokio::test]
async fn test_signer_without_credential() -> Result<()> {
    let signer = Signer::new(
        Context::new(),
        NoCredential,
        RequestSigner::new("ec2", "us-east-1"),
    );

    let (mut parts, _) = Request::get("https://ec2.amazonaws.com/").body(())?.into_parts();
    let err = signer
        .sign(&mut parts, b"", SigningMethod::Header)
        .await
        .expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::CredentialMissing);

    let signer = signer.with_credential_provider(StaticCredentialProvider::new("AKIDEXAMPLE", ""));
    let err = signer
        .sign(&mut parts, b"", SigningMethod::Header)
        .await
        .expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::CredentialMissing);
    Ok(())
}
