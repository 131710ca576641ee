//! A small EC2 Query API client signed with `ec2sign-aws-v4`.
//!
//! ## Example
//!
//! ```no_run
//! use ec2sign_aws_v4::Config;
//! use ec2sign_core::{Context, OsEnv};
//! use ec2sign_ec2::{Ec2Client, Filter};
//! use ec2sign_file_read_tokio::TokioFileRead;
//! use ec2sign_http_send_reqwest::ReqwestHttpSend;
//!
//! # async fn example() -> ec2sign_core::Result<()> {
//! let ctx = Context::new()
//!     .with_file_read(TokioFileRead)
//!     .with_http_send(ReqwestHttpSend::default())
//!     .with_env(OsEnv);
//! let config = Config::default().from_env(&ctx).from_profile(&ctx).await?;
//!
//! let client = Ec2Client::new(ctx, config);
//! let running = client
//!     .describe_instances(&[Filter::new("instance-state-name", ["running"])])
//!     .await?;
//! println!("{} running instance(s)", running.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod client;
pub use client::{Ec2Client, API_VERSION};

mod model;
pub use model::{
    Filter, Instance, InstanceState, InstanceStateChange, RunInstancesInput, Tag,
    TagSpecification,
};
