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

//! Fake implementation of the httpbin clients.

use crate::{ClientError, ClientResult, OriginIpSource, UuidSource};
use async_trait::async_trait;
use std::io;

/// Client that returns canned values without talking to any service.
///
/// Operations whose canned value is `None` fail.
#[derive(Clone, Default)]
pub struct MockHttpBin {
    /// Value to return as the origin IP.
    origin: Option<String>,

    /// Value to return as the UUID.
    uuid: Option<String>,
}

impl MockHttpBin {
    /// Creates a new mock that returns `origin` and `uuid` when available.
    pub fn new<S: Into<String>>(origin: Option<S>, uuid: Option<S>) -> Self {
        Self { origin: origin.map(Into::into), uuid: uuid.map(Into::into) }
    }
}

#[async_trait]
impl OriginIpSource for MockHttpBin {
    async fn get_origin_ip(&self) -> ClientResult<String> {
        self.origin.clone().ok_or_else(|| {
            ClientError::new("Failed to get the origin IP address.", io::Error::other("Mock failure"))
        })
    }
}

#[async_trait]
impl UuidSource for MockHttpBin {
    async fn get_uuid(&self) -> ClientResult<String> {
        self.uuid
            .clone()
            .ok_or_else(|| ClientError::new("Failed to get an UUID.", io::Error::other("Mock failure")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_as_trait_objects() {
        let mock = MockHttpBin::new(Some("10.0.0.1"), Some("the-uuid"));
        let origin: Box<dyn OriginIpSource + Send + Sync> = Box::from(mock.clone());
        let uuid: Box<dyn UuidSource + Send + Sync> = Box::from(mock);
        assert_eq!("10.0.0.1", origin.get_origin_ip().await.unwrap());
        assert_eq!("the-uuid", uuid.get_uuid().await.unwrap());
    }

    #[tokio::test]
    async fn test_mock_failures() {
        let mock = MockHttpBin::default();
        assert_eq!(
            "Failed to get the origin IP address.",
            mock.get_origin_ip().await.unwrap_err().to_string()
        );
        assert_eq!("Failed to get an UUID.", mock.get_uuid().await.unwrap_err().to_string());
    }
}
