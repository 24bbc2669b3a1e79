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

//! Clients for the httpbin `/ip` and `/uuid` endpoints.

use crate::{ClientError, ClientResult, HttpBinOptions, OriginIpSource, UuidSource};
use async_trait::async_trait;
use bytes::Buf;
use log::{debug, error};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::io;
use url::Url;

/// Message of the error returned when the origin IP cannot be obtained.
const ORIGIN_IP_ERROR: &str = "Failed to get the origin IP address.";

/// Message of the error returned when a UUID cannot be obtained.
const UUID_ERROR: &str = "Failed to get an UUID.";

/// Converts a `reqwest::Error` to an `io::Error`.
fn reqwest_error_to_io_error(e: reqwest::Error) -> io::Error {
    io::Error::other(format!("{}", e))
}

/// Converts a failed `response` into an `io::Error`.
async fn http_response_to_io_error(response: Response) -> io::Error {
    let status = response.status();

    let kind = match status {
        StatusCode::BAD_REQUEST => io::ErrorKind::InvalidInput,
        StatusCode::UNAUTHORIZED => io::ErrorKind::PermissionDenied,
        StatusCode::FORBIDDEN => io::ErrorKind::PermissionDenied,
        StatusCode::NOT_FOUND => io::ErrorKind::NotFound,
        StatusCode::TOO_MANY_REQUESTS => io::ErrorKind::ConnectionRefused,
        _ => io::ErrorKind::Other,
    };

    match response.text().await {
        Ok(text) => {
            debug!("statusCode={}, responseBody={}", status.as_u16(), text);
            io::Error::new(
                kind,
                format!("HTTP request returned status {} with text '{}'", status, text),
            )
        }
        Err(e) => io::Error::new(
            kind,
            format!("HTTP request returned status {} and failed to get text due to {}", status, e),
        ),
    }
}

/// Common logic to talk to the httpbin service.
#[derive(Clone)]
struct HttpBinClient {
    /// Asynchronous HTTP client with which to issue the service requests.
    client: Client,

    /// Base URL of the service.
    base_url: Url,
}

impl HttpBinClient {
    /// Creates a new client configured with `opts`.
    fn new(opts: HttpBinOptions) -> Self {
        Self { client: Client::default(), base_url: opts.base_url }
    }

    /// Issues a GET request against `endpoint` and returns the `field` of the JSON object in the
    /// response as a string.
    async fn fetch_scalar_field(&self, endpoint: &str, field: &str) -> io::Result<String> {
        let url = self.base_url.join(endpoint).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("Invalid endpoint {}: {}", endpoint, e))
        })?;

        let response =
            self.client.get(url.clone()).send().await.map_err(reqwest_error_to_io_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(http_response_to_io_error(response).await);
        }

        let bytes = response.bytes().await.map_err(reqwest_error_to_io_error)?;
        debug!("statusCode={}, responseBody={}", status.as_u16(), String::from_utf8_lossy(&bytes));
        let envelope: serde_json::Map<String, Value> = serde_json::from_reader(bytes.reader())?;

        match envelope.get(field) {
            Some(Value::String(value)) => Ok(value.clone()),
            Some(Value::Number(value)) => Ok(value.to_string()),
            Some(Value::Bool(value)) => Ok(value.to_string()),
            Some(value) => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Field {} in response from {} is not a scalar: {}", field, url, value),
            )),
            None => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Response from {} lacks field {}", url, field),
            )),
        }
    }
}

/// Client for the endpoint that reports the caller's origin IP.
#[derive(Clone)]
pub struct OriginIpClient(HttpBinClient);

impl OriginIpClient {
    /// Creates a new client configured with `opts`.
    pub fn new(opts: HttpBinOptions) -> Self {
        Self(HttpBinClient::new(opts))
    }
}

#[async_trait]
impl OriginIpSource for OriginIpClient {
    async fn get_origin_ip(&self) -> ClientResult<String> {
        self.0.fetch_scalar_field("ip", "origin").await.map_err(|e| {
            error!("{} Cause: {}", ORIGIN_IP_ERROR, e);
            ClientError::new(ORIGIN_IP_ERROR, e)
        })
    }
}

/// Client for the endpoint that generates UUIDs.
#[derive(Clone)]
pub struct UuidClient(HttpBinClient);

impl UuidClient {
    /// Creates a new client configured with `opts`.
    pub fn new(opts: HttpBinOptions) -> Self {
        Self(HttpBinClient::new(opts))
    }
}

#[async_trait]
impl UuidSource for UuidClient {
    async fn get_uuid(&self) -> ClientResult<String> {
        self.0.fetch_scalar_field("uuid", "uuid").await.map_err(|e| {
            error!("{} Cause: {}", UUID_ERROR, e);
            ClientError::new(UUID_ERROR, e)
        })
    }
}
