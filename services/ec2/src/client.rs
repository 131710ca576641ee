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

use crate::model::{
    filter_params, instance_id_params, parse_describe_instances, parse_error,
    parse_run_instances, parse_terminate_instances, Filter, Instance, InstanceStateChange,
    RunInstancesInput,
};
use bytes::Bytes;
use ec2sign_aws_v4::{Config, Credential, DefaultCredentialProvider, RequestSigner};
use ec2sign_core::{Context, Error, ProvideCredential, Result, Signer, SigningMethod};
use http::header::CONTENT_TYPE;
use log::debug;

/// EC2 Query API version.
pub const API_VERSION: &str = "2016-11-15";

const SERVICE: &str = "ec2";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// Client for the EC2 Query API.
///
/// Every call is a `POST` with a form encoded body, signed in the
/// `Authorization` header with a freshly loaded credential.
#[derive(Clone, Debug)]
pub struct Ec2Client {
    signer: Signer<Credential>,
    endpoint: String,
    region: String,
}

impl Ec2Client {
    /// Create a client for the region and endpoint named by `config`.
    ///
    /// Credentials come from [`DefaultCredentialProvider::from_config`].
    pub fn new(ctx: Context, config: Config) -> Self {
        let region = config.region().to_string();
        let endpoint = match &config.endpoint_url {
            Some(v) => v.trim_end_matches('/').to_string(),
            None => format!("https://ec2.{region}.amazonaws.com"),
        };

        let signer = Signer::new(
            ctx,
            DefaultCredentialProvider::from_config(config),
            RequestSigner::new(SERVICE, &region),
        );

        Self {
            signer,
            endpoint,
            region,
        }
    }

    /// Replace the credential provider.
    pub fn with_credential_provider(
        mut self,
        provider: impl ProvideCredential<Credential = Credential>,
    ) -> Self {
        self.signer = self.signer.with_credential_provider(provider);
        self
    }

    /// Endpoint requests are sent to, like `https://ec2.us-east-1.amazonaws.com`.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Region used in the credential scope.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Launch instances and return them as reported at launch time.
    pub async fn run_instances(&self, input: &RunInstancesInput) -> Result<Vec<Instance>> {
        let body = self.call("RunInstances", input.to_params()).await?;
        let instances = parse_run_instances(&body)?;
        debug!("launched {} instance(s)", instances.len());
        Ok(instances)
    }

    /// List the instances matching all `filters`, across reservations.
    pub async fn describe_instances(&self, filters: &[Filter]) -> Result<Vec<Instance>> {
        let body = self
            .call("DescribeInstances", filter_params(filters))
            .await?;
        parse_describe_instances(&body)
    }

    /// Terminate instances. An empty list sends nothing.
    pub async fn terminate_instances(
        &self,
        instance_ids: &[String],
    ) -> Result<Vec<InstanceStateChange>> {
        if instance_ids.is_empty() {
            debug!("no instance to terminate, skip TerminateInstances");
            return Ok(Vec::new());
        }

        let body = self
            .call("TerminateInstances", instance_id_params(instance_ids))
            .await?;
        parse_terminate_instances(&body)
    }

    async fn call(&self, action: &str, params: Vec<(String, String)>) -> Result<String> {
        let body = {
            let mut form = form_urlencoded::Serializer::new(String::new());
            form.append_pair("Action", action);
            form.append_pair("Version", API_VERSION);
            for (k, v) in &params {
                form.append_pair(k, v);
            }
            form.finish()
        };

        let (mut parts, ()) = http::Request::post(format!("{}/", self.endpoint))
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(())?
            .into_parts();
        self.signer
            .sign(&mut parts, body.as_bytes(), SigningMethod::Header)
            .await
            .map_err(|e| e.with_context(format!("action: {action}")))?;

        debug!("sending {action} to {}", self.endpoint);
        let req = http::Request::from_parts(parts, Bytes::from(body));
        let resp = self
            .signer
            .context()
            .http_send_as_string(req)
            .await
            .map_err(|e| {
                Error::unexpected(format!("failed to send {action} request"))
                    .with_source(e)
                    .with_context(format!("endpoint: {}", self.endpoint))
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(parse_error(action, status, resp.body()));
        }
        Ok(resp.into_body())
    }
}
