use super::live_test_enabled;
use anyhow::Result;
use bytes::Bytes;
use ec2sign_aws_v4::{Config, DefaultCredentialProvider, RequestSigner};
use ec2sign_core::{Context, OsEnv, Signer, SigningMethod};
use ec2sign_file_read_tokio::TokioFileRead;
use ec2sign_http_send_reqwest::ReqwestHttpSend;
use http::{header, Method, Request, StatusCode};
use log::{debug, warn};
use std::time::Duration;

async fn init_live_signer() -> Result<Option<(Signer<ec2sign_aws_v4::Credential>, String)>> {
    if !live_test_enabled() {
        return Ok(None);
    }

    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let config = Config::default().from_env(&ctx).from_profile(&ctx).await?;
    let region = config.region().to_string();

    let signer = Signer::new(
        ctx,
        DefaultCredentialProvider::from_config(config),
        RequestSigner::new("ec2", &region),
    );
    Ok(Some((signer, region)))
}

#[tokio::test]
async fn test_describe_regions_with_header() -> Result<()> {
    let Some((signer, region)) = init_live_signer().await? else {
        warn!("EC2SIGN_AWS_V4_TEST is not set, skipped");
        return Ok(());
    };

    let body = Bytes::from_static(b"Action=DescribeRegions&Version=2016-11-15");
    let req = Request::builder()
        .method(Method::POST)
        .uri(format!("https://ec2.{region}.amazonaws.com/"))
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(body.clone())?;

    let (mut parts, _) = req.into_parts();
    signer.sign(&mut parts, &body, SigningMethod::Header).await?;
    let req = Request::from_parts(parts, body);
    debug!("signed request: {req:?}");

    let resp = signer.context().http_send_as_string(req).await?;
    debug!("got response: {:?}", resp.body());
    assert_eq!(StatusCode::OK, resp.status());
    Ok(())
}

#[tokio::test]
async fn test_describe_regions_with_query() -> Result<()> {
    let Some((signer, region)) = init_live_signer().await? else {
        warn!("EC2SIGN_AWS_V4_TEST is not set, skipped");
        return Ok(());
    };

    let req = Request::builder()
        .method(Method::GET)
        .uri(format!(
            "https://ec2.{region}.amazonaws.com/?Action=DescribeRegions&Version=2016-11-15"
        ))
        .body(Bytes::new())?;

    let (mut parts, body) = req.into_parts();
    signer
        .sign(&mut parts, &body, SigningMethod::Query(Duration::from_secs(60)))
        .await?;
    let req = Request::from_parts(parts, body);
    debug!("signed request: {req:?}");

    let resp = signer.context().http_send_as_string(req).await?;
    debug!("got response: {:?}", resp.body());
    assert_eq!(StatusCode::OK, resp.status());
    Ok(())
}
