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

//! Tokio-based file reading for ec2sign.
//!
//! Profile based credential providers read `~/.aws/credentials` and
//! `~/.aws/config` through [`Context::file_read`](ec2sign_core::Context::file_read);
//! plug `TokioFileRead` into the context to back those reads with `tokio::fs`.
//!
//! ```no_run
//! use ec2sign_core::{Context, OsEnv};
//! use ec2sign_file_read_tokio::TokioFileRead;
//!
//! # async fn example() -> ec2sign_core::Result<()> {
//! let ctx = Context::new().with_file_read(TokioFileRead).with_env(OsEnv);
//! let content = ctx.file_read_as_string("/home/ec2-user/.aws/credentials").await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use ec2sign_core::{Error, FileRead, Result};

/// Tokio-based implementation of the `FileRead` trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileRead;

#[async_trait]
impl FileRead for TokioFileRead {
    async fn file_read(&self, path: &str) -> Result<Vec<u8>> {
        tokio::fs::read(path).await.map_err(|e| {
            Error::unexpected("failed to read file")
                .with_source(e)
                .with_context(format!("path: {path}"))
        })
    }
}
