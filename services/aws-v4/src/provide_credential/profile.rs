// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::config::{config_section_name, load_ini};
use crate::{constants::*, Credential};
use async_trait::async_trait;
use ec2sign_core::{Context, ProvideCredential, Result};
use ini::Ini;
use log::debug;

/// ProfileCredentialProvider loads AWS credentials from the shared profile files.
///
/// This provider reads credentials from:
/// - `~/.aws/credentials` (or the path specified by `AWS_SHARED_CREDENTIALS_FILE`)
/// - `~/.aws/config` (or the path specified by `AWS_CONFIG_FILE`)
///
/// The profile to use is determined by:
/// 1. The profile specified via `with_profile()`, like `academy`
/// 2. The `AWS_PROFILE` environment variable
/// 3. Default to "default"
#[derive(Debug, Clone)]
pub struct ProfileCredentialProvider {
    profile: Option<String>,
    config_file: Option<String>,
    credentials_file: Option<String>,
}

impl Default for ProfileCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileCredentialProvider {
    /// Create a new ProfileCredentialProvider with default settings.
    pub fn new() -> Self {
        Self {
            profile: None,
            config_file: None,
            credentials_file: None,
        }
    }

    /// Set the profile name to use.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Set the path to the config file.
    pub fn with_config_file(mut self, path: impl Into<String>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Set the path to the credentials file.
    pub fn with_credentials_file(mut self, path: impl Into<String>) -> Self {
        self.credentials_file = Some(path.into());
        self
    }

    async fn load_from_credentials_file(
        &self,
        ctx: &Context,
        profile: &str,
    ) -> Result<Option<Credential>> {
        let path = match &self.credentials_file {
            Some(path) => path.clone(),
            None => ctx
                .env_var(AWS_SHARED_CREDENTIALS_FILE)
                .unwrap_or_else(|| "~/.aws/credentials".to_string()),
        };

        let Some(conf) = load_ini(ctx, &path).await? else {
            return Ok(None);
        };
        Ok(credential_from_section(&conf, profile))
    }

    async fn load_from_config_file(
        &self,
        ctx: &Context,
        profile: &str,
    ) -> Result<Option<Credential>> {
        let path = match &self.config_file {
            Some(path) => path.clone(),
            None => ctx
                .env_var(AWS_CONFIG_FILE)
                .unwrap_or_else(|| "~/.aws/config".to_string()),
        };

        let Some(conf) = load_ini(ctx, &path).await? else {
            return Ok(None);
        };
        Ok(credential_from_section(&conf, &config_section_name(profile)))
    }
}

fn credential_from_section(conf: &Ini, section: &str) -> Option<Credential> {
    let Some(props) = conf.section(Some(section)) else {
        debug!("section {section} not found in profile file");
        return None;
    };

    let access_key_id = props.get("aws_access_key_id")?;
    let secret_access_key = props.get("aws_secret_access_key")?;

    let mut cred = Credential::new(access_key_id, secret_access_key);
    cred.session_token = props.get("aws_session_token").map(|s| s.to_string());
    Some(cred)
}

#[async_trait]
impl ProvideCredential for ProfileCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let profile = self
            .profile
            .clone()
            .or_else(|| ctx.env_var(AWS_PROFILE))
            .unwrap_or_else(|| "default".to_string());

        if let Some(cred) = self.load_from_credentials_file(ctx, &profile).await? {
            debug!("loaded credential from credentials file, profile: {profile}");
            return Ok(Some(cred));
        }

        self.load_from_config_file(ctx, &profile).await
    }
}
