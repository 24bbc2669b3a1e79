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

//! Producer side of the message queue.

use crate::db;
use crate::driver::Listener;
use crate::model::{Message, QueueName};
use demoapp_core::db::Db;
use demoapp_core::driver::DriverResult;
use futures::lock::Mutex;
use log::{info, warn};
use std::sync::Arc;
use time::OffsetDateTime;
use uuid::Uuid;

/// Publishes messages to a queue.
#[derive(Clone)]
pub struct Sender {
    /// The database that acts as the message broker.
    db: Arc<dyn Db + Send + Sync>,

    /// Queue to publish messages to and to receive messages from.
    queue: QueueName,

    /// Listener to notify when a message is sent for immediate processing.  This is only useful
    /// when the sender and listener live in the same process, and thus is why this is optional.
    listener: Option<Arc<Mutex<Listener>>>,
}

impl Sender {
    /// Creates a new sender that publishes messages to `queue` backed by `db`.
    pub fn new(db: Arc<dyn Db + Send + Sync>, queue: QueueName) -> Self {
        Self { db, queue, listener: None }
    }

    /// Configures the sender to poke `listener` when new messages are sent.
    pub fn with_listener(mut self, listener: Arc<Mutex<Listener>>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Returns the queue this sender is bound to.
    pub fn queue(&self) -> &QueueName {
        &self.queue
    }

    /// Attempts to notify the listener, if one is configured, so that the message is delivered
    /// as early as possible.  Failures are logged and then ignored because the listener will pick
    /// the message up on its next polling cycle anyway.
    async fn maybe_notify_listener(&self) {
        if let Some(listener) = self.listener.clone() {
            let mut listener = listener.lock().await;
            if let Err(e) = listener.notify().await {
                warn!("Failed to notify listener; will deliver later: {}", e);
            }
        }
    }

    /// Publishes a message with `payload` to the queue and returns its identifier.
    pub async fn send<P: Into<String>>(&self, payload: P) -> DriverResult<Uuid> {
        let message = Message::new(self.queue.clone(), payload, OffsetDateTime::now_utc());

        let mut tx = self.db.begin().await?;
        db::put_message(tx.ex(), &message).await?;
        tx.commit().await?;
        info!("Message sent: {}", message.payload());

        self.maybe_notify_listener().await;

        Ok(*message.id())
    }

    /// Pulls the oldest pending message from the queue, if any.
    ///
    /// The returned message is removed from the queue and will not be delivered to any listener.
    pub async fn receive(&self) -> DriverResult<Option<Message>> {
        let mut tx = self.db.begin().await?;
        let message = db::take_oldest_message(tx.ex(), &self.queue).await?;
        tx.commit().await?;
        Ok(message)
    }
}
