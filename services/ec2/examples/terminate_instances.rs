//! Terminate the running instances named `my-boto3-ec2-instance` after asking
//! for consent.
//!
//! ```shell
//! cargo run --example terminate_instances
//! ```

use anyhow::Result;
use ec2sign_aws_v4::Config;
use ec2sign_core::{Context, OsEnv};
use ec2sign_ec2::{Ec2Client, Filter};
use ec2sign_file_read_tokio::TokioFileRead;
use ec2sign_http_send_reqwest::ReqwestHttpSend;
use std::io::BufRead;

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

    let instances = client
        .describe_instances(&[
            Filter::new("instance-state-name", ["running"]),
            Filter::new("tag:Name", ["my-boto3-ec2-instance"]),
        ])
        .await?;
    for instance in &instances {
        println!("Filtered instances: {}", instance.instance_id);
    }

    println!("Delete instances? (y/n)");
    let mut consent = String::new();
    std::io::stdin().lock().read_line(&mut consent)?;
    if consent.trim() != "y" {
        println!("Delete aborted!");
        return Ok(());
    }

    let ids: Vec<String> = instances.into_iter().map(|i| i.instance_id).collect();
    for change in client.terminate_instances(&ids).await? {
        println!(
            "{}: {} -> {}",
            change.instance_id, change.previous_state.name, change.current_state.name
        );
    }
    println!("Delete completed!");
    Ok(())
}
