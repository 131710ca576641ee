//! Launch one `t2.micro` instance by calling the EC2 Query API with a
//! presigned url.
//!
//! ```shell
//! AWS_PROFILE=academy cargo run --example run_instances
//! ```

use anyhow::Result;
use bytes::Bytes;
use ec2sign_aws_v4::{
    Config, DefaultCredentialProvider, RequestDescriptor, RequestSigner, TimeContext,
};
use ec2sign_core::{time, Context, OsEnv, ProvideCredential, SigningMethod};
use ec2sign_file_read_tokio::TokioFileRead;
use ec2sign_http_send_reqwest::ReqwestHttpSend;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);

    let config = Config::default().from_env(&ctx).from_profile(&ctx).await?;
    let region = config.region().to_string();
    let host = format!("ec2.{region}.amazonaws.com");

    let Some(cred) = DefaultCredentialProvider::from_config(config)
        .provide_credential(&ctx)
        .await?
    else {
        eprintln!("No access key is available.");
        return Ok(());
    };

    let params = "Action=RunInstances&ImageId=ami-047a51fa27710816e&InstanceType=t2.micro&MaxCount=1&MinCount=1&Version=2016-11-15";
    println!("Request Parameters:\n{params}");

    let desc = RequestDescriptor::new(http::Method::GET, host).with_raw_query(params);
    let signed = RequestSigner::new("ec2", &region).sign(
        &desc,
        &cred,
        &TimeContext::new(time::now()),
        SigningMethod::Query(Duration::from_secs(60)),
    )?;

    let url = signed.url("https");
    println!("\nRequest URL = {url}");

    let mut req = http::Request::get(url).body(Bytes::new())?;
    for (name, value) in signed.headers() {
        req.headers_mut().insert(
            http::HeaderName::from_bytes(name.as_bytes())?,
            http::HeaderValue::from_str(value)?,
        );
    }

    let resp = ctx.http_send_as_string(req).await?;
    println!("\nResponse code: {}\n", resp.status());
    println!("{}", resp.body());
    Ok(())
}
