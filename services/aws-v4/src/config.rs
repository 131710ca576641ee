use crate::constants::*;
use ec2sign_core::{Context, Error, Result};
use ini::Ini;
use log::debug;

/// Region used when neither the config nor the environment names one.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Config for AWS services.
///
/// Explicit fields win, then the environment, then the profile files:
///
/// ```no_run
/// use ec2sign_aws_v4::Config;
/// use ec2sign_core::{Context, OsEnv};
/// use ec2sign_file_read_tokio::TokioFileRead;
///
/// # async fn example() -> ec2sign_core::Result<()> {
/// let ctx = Context::new().with_file_read(TokioFileRead).with_env(OsEnv);
/// let config = Config::default().from_env(&ctx).from_profile(&ctx).await?;
/// println!("region: {}", config.region());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// `config_file` will be load from:
    ///
    /// - env value: [`AWS_CONFIG_FILE`]
    /// - default to: `~/.aws/config`
    pub config_file: String,
    /// `shared_credentials_file` will be loaded from:
    ///
    /// - env value: [`AWS_SHARED_CREDENTIALS_FILE`]
    /// - default to: `~/.aws/credentials`
    pub shared_credentials_file: String,
    /// `profile` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_PROFILE`]
    /// - default to: `default`
    pub profile: Option<String>,

    /// `region` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_REGION`], then [`AWS_DEFAULT_REGION`]
    /// - profile config: `region`
    pub region: Option<String>,
    /// `endpoint_url` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_ENDPOINT_URL_EC2`]
    pub endpoint_url: Option<String>,
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_ACCESS_KEY_ID`]
    pub access_key_id: Option<String>,
    /// `secret_access_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_SECRET_ACCESS_KEY`]
    pub secret_access_key: Option<String>,
    /// `session_token` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_SESSION_TOKEN`]
    pub session_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_file: "~/.aws/config".to_string(),
            shared_credentials_file: "~/.aws/credentials".to_string(),
            profile: None,
            region: None,
            endpoint_url: None,
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
        }
    }
}

impl Config {
    /// Load config from env.
    ///
    /// Fields that are already set are kept.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        let envs = ctx.env_vars();

        if let Some(v) = envs.get(AWS_CONFIG_FILE) {
            self.config_file = v.to_string();
        }
        if let Some(v) = envs.get(AWS_SHARED_CREDENTIALS_FILE) {
            self.shared_credentials_file = v.to_string();
        }
        if self.profile.is_none() {
            self.profile = envs.get(AWS_PROFILE).cloned();
        }
        if self.region.is_none() {
            self.region = envs
                .get(AWS_REGION)
                .or_else(|| envs.get(AWS_DEFAULT_REGION))
                .cloned();
        }
        if self.endpoint_url.is_none() {
            self.endpoint_url = envs.get(AWS_ENDPOINT_URL_EC2).cloned();
        }
        if self.access_key_id.is_none() {
            self.access_key_id = envs.get(AWS_ACCESS_KEY_ID).cloned();
        }
        if self.secret_access_key.is_none() {
            self.secret_access_key = envs.get(AWS_SECRET_ACCESS_KEY).cloned();
        }
        if self.session_token.is_none() {
            self.session_token = envs.get(AWS_SESSION_TOKEN).cloned();
        }
        self
    }

    /// Load `region` from the profile section of the config file.
    ///
    /// A missing file or section is skipped, a file that can't be parsed is
    /// a `ConfigInvalid` error.
    pub async fn from_profile(mut self, ctx: &Context) -> Result<Self> {
        if self.region.is_some() {
            return Ok(self);
        }

        let Some(conf) = load_ini(ctx, &self.config_file).await? else {
            return Ok(self);
        };

        let section = config_section_name(self.profile());
        match conf.section(Some(section.as_str())) {
            Some(props) => {
                if let Some(v) = props.get("region") {
                    self.region = Some(v.to_string());
                }
            }
            None => debug!("section {section} not found in config file"),
        }

        Ok(self)
    }

    /// Profile to read, `default` if unset.
    pub fn profile(&self) -> &str {
        self.profile.as_deref().unwrap_or("default")
    }

    /// Region to sign for, [`DEFAULT_REGION`] if unset.
    pub fn region(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }
}

/// Section name of `profile` in the config file: `default` or `profile <name>`.
pub(crate) fn config_section_name(profile: &str) -> String {
    match profile {
        "default" => "default".to_string(),
        x => format!("profile {x}"),
    }
}

/// Read and parse an ini file.
///
/// Returns `None` if the path can't be expanded or the file can't be read.
pub(crate) async fn load_ini(ctx: &Context, path: &str) -> Result<Option<Ini>> {
    let Some(expanded) = ctx.expand_home_dir(path) else {
        debug!("failed to expand homedir for path: {path}");
        return Ok(None);
    };

    let content = match ctx.file_read_as_string(&expanded).await {
        Ok(content) => content,
        Err(err) => {
            debug!("failed to read {expanded}: {err}");
            return Ok(None);
        }
    };

    let conf = Ini::load_from_str(&content).map_err(|e| {
        Error::config_invalid("failed to parse profile file")
            .with_source(e)
            .with_context(format!("path: {expanded}"))
    })?;
    Ok(Some(conf))
}
