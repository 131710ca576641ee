//! Cross-check against `aws-sigv4`, the signer used by the official SDK.

use super::{test_credential, test_time, TEST_ACCESS_KEY, TEST_SECRET_KEY};
use anyhow::Result;
use aws_credential_types::Credentials;
use aws_sigv4::http_request::{SignableBody, SignableRequest, SignatureLocation, SigningSettings};
use aws_sigv4::sign::v4;
use ec2sign_aws_v4::{RequestDescriptor, RequestSigner};
use ec2sign_core::SigningMethod;
use http::{header, Request};
use pretty_assertions::assert_eq;
use std::time::{Duration, SystemTime};
use test_case::test_case;

fn describe_regions() -> Request<&'static str> {
    Request::get("https://ec2.amazonaws.com/?Action=DescribeRegions&Version=2016-11-15")
        .body("")
        .expect("request must be valid")
}

fn describe_regions_on_default_port() -> Request<&'static str> {
    Request::get("https://ec2.us-east-1.amazonaws.com:443/?Action=DescribeRegions&Version=2016-11-15")
        .body("")
        .expect("request must be valid")
}

fn escaped_slash_in_path() -> Request<&'static str> {
    Request::get("https://ec2.amazonaws.com/a%2Fb/c?Action=DescribeRegions&Version=2016-11-15")
        .body("")
        .expect("request must be valid")
}

fn describe_instances_with_filters() -> Request<&'static str> {
    Request::get("https://ec2.us-east-1.amazonaws.com/?Version=2016-11-15&Filter.2.Value.1=my-ec2-instance&Filter.2.Name=tag%3AName&Filter.1.Value.1=running&Filter.1.Name=instance-state-name&Action=DescribeInstances")
        .body("")
        .expect("request must be valid")
}

fn run_instances_form() -> Request<&'static str> {
    Request::post("https://ec2.us-east-1.amazonaws.com/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded; charset=utf-8")
        .body("Action=RunInstances&ImageId=ami-0915bcb5fa77e4892&InstanceType=t2.micro&MaxCount=1&MinCount=1&TagSpecification.1.ResourceType=instance&TagSpecification.1.Tag.1.Key=Name&TagSpecification.1.Tag.1.Value=my-boto3-ec2-instance&Version=2016-11-15")
        .expect("request must be valid")
}

fn terminate_with_spaced_header() -> Request<&'static str> {
    Request::post("https://ec2.amazonaws.com/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header("x-amz-meta-note", "  keep   one space ")
        .body("Action=TerminateInstances&InstanceId.1=i-1234567890abcdef0&Version=2016-11-15")
        .expect("request must be valid")
}

fn reference_sign(
    req: &mut Request<&'static str>,
    method: SigningMethod,
    session_token: Option<&str>,
) -> Result<String> {
    let mut ss = SigningSettings::default();
    if let SigningMethod::Query(expires_in) = method {
        ss.signature_location = SignatureLocation::QueryParams;
        ss.expires_in = Some(expires_in);
    }
    let id = Credentials::new(
        TEST_ACCESS_KEY,
        TEST_SECRET_KEY,
        session_token.map(|v| v.to_string()),
        None,
        "hardcoded-credentials",
    )
    .into();
    let sp = v4::SigningParams::builder()
        .identity(&id)
        .region("us-east-1")
        .name("ec2")
        .time(SystemTime::from(test_time().instant()))
        .settings(ss)
        .build()?;

    let body = *req.body();
    let output = aws_sigv4::http_request::sign(
        SignableRequest::new(
            req.method().as_str(),
            req.uri().to_string(),
            req.headers()
                .iter()
                .map(|(k, v)| (k.as_str(), v.to_str().expect("header must be valid"))),
            SignableBody::Bytes(body.as_bytes()),
        )?,
        &sp.into(),
    )?;

    let signature = output.signature().to_string();
    let (instructions, _) = output.into_parts();
    instructions.apply_to_request_http1x(req);
    Ok(signature)
}

fn our_sign(
    req: Request<&'static str>,
    method: SigningMethod,
    session_token: Option<&str>,
) -> Result<ec2sign_aws_v4::SignedRequest> {
    let mut cred = test_credential();
    if let Some(token) = session_token {
        cred = cred.with_session_token(token);
    }

    let (parts, body) = req.into_parts();
    let desc = RequestDescriptor::from_parts(&parts, body)?;
    Ok(RequestSigner::new("ec2", "us-east-1").sign(&desc, &cred, &test_time(), method)?)
}

#[test_case(describe_regions, None; "describe regions")]
#[test_case(describe_regions_on_default_port, None; "default port is not signed")]
#[test_case(escaped_slash_in_path, None; "escaped slash in path")]
#[test_case(describe_instances_with_filters, None; "describe instances with filters")]
#[test_case(run_instances_form, None; "run instances form body")]
#[test_case(terminate_with_spaced_header, None; "header value normalization")]
#[test_case(run_instances_form, Some("academy-session-token"); "run instances with session token")]
fn test_header_signing_matches_reference(
    req_fn: fn() -> Request<&'static str>,
    session_token: Option<&str>,
) -> Result<()> {
    let mut expected = req_fn();
    let signature = reference_sign(&mut expected, SigningMethod::Header, session_token)?;

    let signed = our_sign(req_fn(), SigningMethod::Header, session_token)?;

    assert_eq!(signed.signature(), signature);
    assert_eq!(
        signed.authorization(),
        Some(expected.headers()[header::AUTHORIZATION].to_str()?)
    );
    Ok(())
}

#[test_case(describe_regions, None; "describe regions")]
#[test_case(describe_regions_on_default_port, None; "default port is not signed")]
#[test_case(escaped_slash_in_path, None; "escaped slash in path")]
#[test_case(describe_instances_with_filters, None; "describe instances with filters")]
#[test_case(run_instances_form, None; "run instances form body")]
#[test_case(describe_regions, Some("academy-session-token"); "describe regions with session token")]
fn test_query_signing_matches_reference(
    req_fn: fn() -> Request<&'static str>,
    session_token: Option<&str>,
) -> Result<()> {
    let method = SigningMethod::Query(Duration::from_secs(3600));

    let mut expected = req_fn();
    let signature = reference_sign(&mut expected, method, session_token)?;

    let signed = our_sign(req_fn(), method, session_token)?;

    assert_eq!(signed.signature(), signature);
    assert!(expected
        .uri()
        .query()
        .unwrap_or_default()
        .contains(&format!("X-Amz-Signature={signature}")));
    Ok(())
}
