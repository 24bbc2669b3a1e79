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

//! Data types for the message queue.

use demoapp_core::model::{ModelError, ModelResult};
use derive_getters::Getters;
use std::fmt;
use time::OffsetDateTime;
use uuid::Uuid;

/// Name of the queue used when none is configured.
pub const DEFAULT_QUEUE_NAME: &str = "default.queue";

/// Name of a queue.  Queue names cannot be empty nor contain whitespace.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QueueName(String);

impl QueueName {
    /// Creates a new queue name after validating it.
    pub fn new<S: Into<String>>(name: S) -> ModelResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ModelError("Queue name cannot be empty".to_owned()));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(ModelError(format!("Queue name '{}' cannot contain whitespace", name)));
        }
        Ok(Self(name))
    }

    /// Returns the queue name as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for QueueName {
    fn default() -> Self {
        Self(DEFAULT_QUEUE_NAME.to_owned())
    }
}

impl fmt::Display for QueueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A message stored in a queue.
#[derive(Clone, Debug, Getters, PartialEq)]
pub struct Message {
    /// Unique identifier of the message.
    id: Uuid,

    /// Queue the message was published to.
    queue: QueueName,

    /// Textual content of the message.
    payload: String,

    /// Time at which the message was published.
    sent: OffsetDateTime,
}

impl Message {
    /// Creates a new message with a fresh identifier for `queue`.
    pub fn new<P: Into<String>>(queue: QueueName, payload: P, sent: OffsetDateTime) -> Self {
        Self { id: Uuid::new_v4(), queue, payload: payload.into(), sent }
    }

    /// Reconstructs a message from its stored parts.
    pub(crate) fn from_parts(
        id: Uuid,
        queue: QueueName,
        payload: String,
        sent: OffsetDateTime,
    ) -> Self {
        Self { id, queue, payload, sent }
    }

    /// Consumes the message and returns its payload.
    pub fn take_payload(self) -> String {
        self.payload
    }
}
