use anyhow::Result;
use ec2sign_aws_v4::{Config, DefaultCredentialProvider, ProfileCredentialProvider};
use ec2sign_core::{Context, ProvideCredential, StaticEnv};
use ec2sign_file_read_tokio::TokioFileRead;
use std::collections::HashMap;
use std::fs;
use tempfile::tempdir;

#[tokio::test]
async fn test_profile_under_home_dir() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let home = tempdir()?;
    fs::create_dir_all(home.path().join(".aws"))?;
    fs::write(
        home.path().join(".aws/credentials"),
        "[academy]\naws_access_key_id = ASIAACADEMY\naws_secret_access_key = academy-secret\naws_session_token = academy-token\n",
    )?;
    fs::write(
        home.path().join(".aws/config"),
        "[profile academy]\nregion = us-west-2\n",
    )?;

    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_env(StaticEnv {
            home_dir: Some(home.path().to_path_buf()),
            envs: HashMap::new(),
        });

    let cred = ProfileCredentialProvider::new()
        .with_profile("academy")
        .provide_credential(&ctx)
        .await?
        .expect("credential must be loaded");
    assert_eq!(cred.access_key_id, "ASIAACADEMY");
    assert_eq!(cred.session_token.as_deref(), Some("academy-token"));

    let config = Config {
        profile: Some("academy".to_string()),
        ..Default::default()
    }
    .from_env(&ctx)
    .from_profile(&ctx)
    .await?;
    assert_eq!(config.region(), "us-west-2");

    let cred = DefaultCredentialProvider::from_config(config)
        .provide_credential(&ctx)
        .await?
        .expect("credential must be loaded");
    assert_eq!(cred.secret_access_key, "academy-secret");
    Ok(())
}

#[tokio::test]
async fn test_explicit_profile_is_not_replaced_by_env() -> Result<()> {
    let home = tempdir()?;
    fs::create_dir_all(home.path().join(".aws"))?;
    fs::write(
        home.path().join(".aws/credentials"),
        "[default]\naws_access_key_id = AKIDDEFAULT\naws_secret_access_key = default-secret\n\n[academy]\naws_access_key_id = ASIAACADEMY\naws_secret_access_key = academy-secret\n",
    )?;
    fs::write(
        home.path().join(".aws/config"),
        "[default]\nregion = us-east-1\n\n[profile academy]\nregion = us-west-2\n",
    )?;

    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_env(StaticEnv {
            home_dir: Some(home.path().to_path_buf()),
            envs: HashMap::from([("AWS_PROFILE".to_string(), "default".to_string())]),
        });

    let config = Config {
        profile: Some("academy".to_string()),
        ..Default::default()
    }
    .from_env(&ctx)
    .from_profile(&ctx)
    .await?;
    assert_eq!(config.profile(), "academy");
    assert_eq!(config.region(), "us-west-2");

    let cred = DefaultCredentialProvider::from_config(config)
        .provide_credential(&ctx)
        .await?
        .expect("credential must be loaded");
    assert_eq!(cred.access_key_id, "ASIAACADEMY");

    let cred = DefaultCredentialProvider::from_config(Config::default().from_env(&ctx))
        .provide_credential(&ctx)
        .await?
        .expect("credential must be loaded");
    assert_eq!(cred.access_key_id, "AKIDDEFAULT");
    Ok(())
}
