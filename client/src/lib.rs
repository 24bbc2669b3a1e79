// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Outbound HTTP clients for the httpbin test API.
//!
//! Every client issues a single request against an endpoint and extracts one scalar field from
//! the returned JSON envelope.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use async_trait::async_trait;
use demoapp_core::env::get_optional_var;
use std::io;
use url::Url;

mod httpbin;
pub use httpbin::{OriginIpClient, UuidClient};
#[cfg(any(test, feature = "testutils"))]
mod mock;
#[cfg(any(test, feature = "testutils"))]
pub use mock::MockHttpBin;

/// Base URL of the public httpbin service.
const DEFAULT_BASE_URL: &str = "http://httpbin.org/";

/// Error returned by the outbound clients.
///
/// The message is fixed per operation and the underlying cause is available as the source.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ClientError {
    /// Description of the operation that failed.
    message: &'static str,

    /// Underlying cause of the failure.
    #[source]
    source: io::Error,
}

impl ClientError {
    /// Creates a new error for the operation described by `message` caused by `source`.
    pub fn new(message: &'static str, source: io::Error) -> Self {
        Self { message, source }
    }

    /// Returns the description of the operation that failed.
    pub fn message(&self) -> &'static str {
        self.message
    }

    /// Returns the underlying cause of the failure.
    pub fn cause(&self) -> &io::Error {
        &self.source
    }
}

/// Result type for this crate.
pub type ClientResult<T> = Result<T, ClientError>;

/// Configuration properties for the httpbin clients.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpBinOptions {
    /// Base URL of the service.  Endpoints are resolved relative to it.
    pub base_url: Url,
}

impl HttpBinOptions {
    /// Creates a new set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This uses the optional `<prefix>_BASE_URL` variable.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        let raw = get_optional_var::<String>(prefix, "BASE_URL")?
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        Self::from_base_url(&raw)
            .map_err(|e| format!("Invalid value in environment variable {}_BASE_URL: {}", prefix, e))
    }

    /// Creates a new set of options pointing to the service at `raw`.
    ///
    /// The path of the URL always ends in a slash so that endpoints are appended to it.
    pub fn from_base_url(raw: &str) -> Result<Self, String> {
        let mut base_url = Url::parse(raw).map_err(|e| format!("Invalid URL {}: {}", raw, e))?;
        if base_url.cannot_be_a_base() {
            return Err(format!("URL {} cannot be used as a base", raw));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { base_url })
    }
}

/// Interface to obtain the IP address the service sees our requests coming from.
#[async_trait]
pub trait OriginIpSource {
    /// Returns the origin IP address of the caller as reported by the service.
    async fn get_origin_ip(&self) -> ClientResult<String>;
}

/// Interface to obtain freshly generated UUIDs.
#[async_trait]
pub trait UuidSource {
    /// Returns a new UUID in textual form.
    async fn get_uuid(&self) -> ClientResult<String>;
}
