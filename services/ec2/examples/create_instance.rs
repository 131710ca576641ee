//! Launch one tagged `t2.micro` instance with the `academy` profile.
//!
//! ```shell
//! cargo run --example create_instance
//! ```

use anyhow::Result;
use ec2sign_aws_v4::Config;
use ec2sign_core::{Context, OsEnv};
use ec2sign_ec2::{Ec2Client, RunInstancesInput, TagSpecification};
use ec2sign_file_read_tokio::TokioFileRead;
use ec2sign_http_send_reqwest::ReqwestHttpSend;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);

    let config = Config {
        profile: Some("academy".to_string()),
        ..Default::default()
    }
    .from_env(&ctx)
    .from_profile(&ctx)
    .await?;
    let client = Ec2Client::new(ctx, config);

    let input = RunInstancesInput::new("ami-0915bcb5fa77e4892", "t2.micro")
        .with_count(1, 1)
        .with_tag_specification(
            TagSpecification::new("instance").with_tag("Name", "my-boto3-ec2-instance"),
        );
    let instances = client.run_instances(&input).await?;

    println!("Create complete!");
    for instance in instances {
        println!("New instance: {}", instance.instance_id);
    }
    Ok(())
}
