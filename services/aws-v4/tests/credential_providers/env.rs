use anyhow::Result;
use ec2sign_aws_v4::{Config, ConfigCredentialProvider, EnvCredentialProvider};
use ec2sign_core::{Context, ProvideCredential, StaticEnv};
use std::collections::HashMap;

fn ctx_with(envs: &[(&str, &str)]) -> Context {
    Context::new().with_env(StaticEnv {
        home_dir: None,
        envs: envs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>(),
    })
}

#[tokio::test]
async fn test_env_provider_reads_academy_style_session() -> Result<()> {
    let ctx = ctx_with(&[
        ("AWS_ACCESS_KEY_ID", "ASIAEXAMPLE"),
        ("AWS_SECRET_ACCESS_KEY", "secret"),
        ("AWS_SESSION_TOKEN", "token"),
    ]);

    let cred = EnvCredentialProvider::new()
        .provide_credential(&ctx)
        .await?
        .expect("credential must be loaded");
    assert_eq!(cred.access_key_id, "ASIAEXAMPLE");
    assert_eq!(cred.session_token.as_deref(), Some("token"));
    Ok(())
}

#[tokio::test]
async fn test_config_provider_from_env() -> Result<()> {
    let ctx = ctx_with(&[
        ("AWS_ACCESS_KEY_ID", "AKIDEXAMPLE"),
        ("AWS_SECRET_ACCESS_KEY", "secret"),
    ]);

    let config = Config::default().from_env(&ctx);
    let cred = ConfigCredentialProvider::new(config)
        .provide_credential(&Context::new())
        .await?
        .expect("credential must be loaded");
    assert_eq!(cred.access_key_id, "AKIDEXAMPLE");
    assert!(cred.session_token.is_none());
    Ok(())
}
