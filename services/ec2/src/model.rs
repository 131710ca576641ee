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

use ec2sign_core::{Error, Result};
use http::StatusCode;
use quick_xml::de;
use serde::Deserialize;

/// Input of `RunInstances`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunInstancesInput {
    /// AMI to launch, like `ami-0915bcb5fa77e4892`.
    pub image_id: String,
    /// Instance type, like `t2.micro`.
    pub instance_type: String,
    /// Minimum number of instances to launch.
    pub min_count: u32,
    /// Maximum number of instances to launch.
    pub max_count: u32,
    /// Name of the key pair.
    pub key_name: Option<String>,
    /// Subnet to launch into.
    pub subnet_id: Option<String>,
    /// Tags applied at launch.
    pub tag_specifications: Vec<TagSpecification>,
}

impl RunInstancesInput {
    /// Launch exactly one instance of `instance_type` from `image_id`.
    pub fn new(image_id: impl Into<String>, instance_type: impl Into<String>) -> Self {
        Self {
            image_id: image_id.into(),
            instance_type: instance_type.into(),
            min_count: 1,
            max_count: 1,
            key_name: None,
            subnet_id: None,
            tag_specifications: Vec::new(),
        }
    }

    /// Set min and max count.
    pub fn with_count(mut self, min_count: u32, max_count: u32) -> Self {
        self.min_count = min_count;
        self.max_count = max_count;
        self
    }

    /// Set the key pair name.
    pub fn with_key_name(mut self, key_name: impl Into<String>) -> Self {
        self.key_name = Some(key_name.into());
        self
    }

    /// Set the subnet id.
    pub fn with_subnet_id(mut self, subnet_id: impl Into<String>) -> Self {
        self.subnet_id = Some(subnet_id.into());
        self
    }

    /// Append a tag specification.
    pub fn with_tag_specification(mut self, spec: TagSpecification) -> Self {
        self.tag_specifications.push(spec);
        self
    }

    pub(crate) fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("ImageId".to_string(), self.image_id.clone()),
            ("InstanceType".to_string(), self.instance_type.clone()),
            ("MinCount".to_string(), self.min_count.to_string()),
            ("MaxCount".to_string(), self.max_count.to_string()),
        ];
        if let Some(v) = &self.key_name {
            params.push(("KeyName".to_string(), v.clone()));
        }
        if let Some(v) = &self.subnet_id {
            params.push(("SubnetId".to_string(), v.clone()));
        }

        // Query API lists are 1-based.
        for (i, spec) in self.tag_specifications.iter().enumerate() {
            let prefix = format!("TagSpecification.{}", i + 1);
            params.push((format!("{prefix}.ResourceType"), spec.resource_type.clone()));
            for (j, tag) in spec.tags.iter().enumerate() {
                params.push((format!("{prefix}.Tag.{}.Key", j + 1), tag.key.clone()));
                params.push((format!("{prefix}.Tag.{}.Value", j + 1), tag.value.clone()));
            }
        }
        params
    }
}

/// Tags for one resource type created by `RunInstances`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSpecification {
    /// Resource type, like `instance` or `volume`.
    pub resource_type: String,
    /// Tags to apply.
    pub tags: Vec<Tag>,
}

impl TagSpecification {
    /// Create an empty specification for `resource_type`.
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            tags: Vec::new(),
        }
    }

    /// Append a tag.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push(Tag::new(key, value));
        self
    }
}

/// A key/value tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Tag key.
    pub key: String,
    /// Tag value.
    pub value: String,
}

impl Tag {
    /// Create a tag.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A `DescribeInstances` filter, like `instance-state-name` = `running`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    /// Filter name, `tag:<key>` for tags.
    pub name: String,
    /// Accepted values, any of them matches.
    pub values: Vec<String>,
}

impl Filter {
    /// Create a filter.
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

pub(crate) fn filter_params(filters: &[Filter]) -> Vec<(String, String)> {
    let mut params = Vec::new();
    for (i, filter) in filters.iter().enumerate() {
        let prefix = format!("Filter.{}", i + 1);
        params.push((format!("{prefix}.Name"), filter.name.clone()));
        for (j, value) in filter.values.iter().enumerate() {
            params.push((format!("{prefix}.Value.{}", j + 1), value.clone()));
        }
    }
    params
}

pub(crate) fn instance_id_params(instance_ids: &[String]) -> Vec<(String, String)> {
    instance_ids
        .iter()
        .enumerate()
        .map(|(i, id)| (format!("InstanceId.{}", i + 1), id.clone()))
        .collect()
}

/// An EC2 instance as reported by `RunInstances` and `DescribeInstances`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    /// Instance id, like `i-1234567890abcdef0`.
    pub instance_id: String,
    /// AMI the instance was launched from.
    pub image_id: String,
    /// Instance type.
    pub instance_type: String,
    /// Current state.
    pub state: InstanceState,
    /// Key pair name.
    pub key_name: Option<String>,
    /// Subnet id.
    pub subnet_id: Option<String>,
    /// Private IPv4 address.
    pub private_ip_address: Option<String>,
    /// Public IPv4 address.
    pub public_ip_address: Option<String>,
    /// Launch time in RFC 3339.
    pub launch_time: Option<String>,
    /// Tags.
    pub tags: Vec<Tag>,
}

impl Instance {
    /// Value of the tag named `key`.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.value.as_str())
    }
}

/// Instance state, like `16` / `running`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceState {
    /// State code.
    pub code: i32,
    /// State name.
    pub name: String,
}

/// A state transition reported by `TerminateInstances`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceStateChange {
    /// Instance id.
    pub instance_id: String,
    /// State after the call.
    pub current_state: InstanceState,
    /// State before the call.
    pub previous_state: InstanceState,
}

pub(crate) fn parse_run_instances(body: &str) -> Result<Vec<Instance>> {
    let resp: RunInstancesResponse = parse_xml("RunInstances", body)?;
    Ok(resp.instances_set.items.into_iter().map(Into::into).collect())
}

pub(crate) fn parse_describe_instances(body: &str) -> Result<Vec<Instance>> {
    let resp: DescribeInstancesResponse = parse_xml("DescribeInstances", body)?;
    Ok(resp
        .reservation_set
        .items
        .into_iter()
        .flat_map(|r| r.instances_set.items)
        .map(Into::into)
        .collect())
}

pub(crate) fn parse_terminate_instances(body: &str) -> Result<Vec<InstanceStateChange>> {
    let resp: TerminateInstancesResponse = parse_xml("TerminateInstances", body)?;
    Ok(resp.instances_set.items.into_iter().map(Into::into).collect())
}

/// Turn a non-2xx response into an error.
pub(crate) fn parse_error(action: &str, status: StatusCode, body: &str) -> Error {
    let err = Error::unexpected(format!("{action} request failed"))
        .with_context(format!("status: {status}"));

    let resp = de::from_str::<ErrorResponse>(body).unwrap_or_default();
    let Some(e) = resp.errors.errors.first() else {
        return err.with_context(format!("body: {body}"));
    };

    let err = err
        .with_context(format!("code: {}", e.code))
        .with_context(format!("message: {}", e.message));
    if resp.request_id.is_empty() {
        err
    } else {
        err.with_context(format!("request_id: {}", resp.request_id))
    }
}

fn parse_xml<T: serde::de::DeserializeOwned>(action: &str, body: &str) -> Result<T> {
    de::from_str(body).map_err(|e| {
        Error::unexpected(format!("failed to parse {action} response"))
            .with_source(e)
            .with_context(format!("response_length: {}", body.len()))
    })
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|v| !v.is_empty())
}

/// `<xxxSet><item>..</item></xxxSet>`
#[derive(Debug, Deserialize)]
struct ItemSet<T> {
    #[serde(rename = "item", default)]
    items: Vec<T>,
}

impl<T> Default for ItemSet<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RunInstancesResponse {
    instances_set: ItemSet<InstanceItem>,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct DescribeInstancesResponse {
    reservation_set: ItemSet<ReservationItem>,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ReservationItem {
    instances_set: ItemSet<InstanceItem>,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct InstanceItem {
    instance_id: String,
    image_id: String,
    instance_type: String,
    instance_state: StateItem,
    key_name: Option<String>,
    subnet_id: Option<String>,
    private_ip_address: Option<String>,
    ip_address: Option<String>,
    launch_time: Option<String>,
    tag_set: ItemSet<TagItem>,
}

impl From<InstanceItem> for Instance {
    fn from(v: InstanceItem) -> Self {
        Self {
            instance_id: v.instance_id,
            image_id: v.image_id,
            instance_type: v.instance_type,
            state: v.instance_state.into(),
            key_name: non_empty(v.key_name),
            subnet_id: non_empty(v.subnet_id),
            private_ip_address: non_empty(v.private_ip_address),
            public_ip_address: non_empty(v.ip_address),
            launch_time: non_empty(v.launch_time),
            tags: v
                .tag_set
                .items
                .into_iter()
                .map(|t| Tag::new(t.key, t.value))
                .collect(),
        }
    }
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StateItem {
    code: i32,
    name: String,
}

impl From<StateItem> for InstanceState {
    fn from(v: StateItem) -> Self {
        Self {
            code: v.code,
            name: v.name,
        }
    }
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TagItem {
    key: String,
    value: String,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TerminateInstancesResponse {
    instances_set: ItemSet<StateChangeItem>,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StateChangeItem {
    instance_id: String,
    current_state: StateItem,
    previous_state: StateItem,
}

impl From<StateChangeItem> for InstanceStateChange {
    fn from(v: StateChangeItem) -> Self {
        Self {
            instance_id: v.instance_id,
            current_state: v.current_state.into(),
            previous_state: v.previous_state.into(),
        }
    }
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct ErrorResponse {
    errors: ErrorList,
    #[serde(rename = "RequestID")]
    request_id: String,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct ErrorList {
    #[serde(rename = "Error")]
    errors: Vec<ErrorItem>,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct ErrorItem {
    code: String,
    message: String,
}
