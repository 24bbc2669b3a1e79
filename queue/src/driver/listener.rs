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

//! Consumer side of the message queue.

use crate::db;
use crate::model::{Message, QueueName};
use demoapp_core::db::Db;
use demoapp_core::driver::{DriverError, DriverResult};
use demoapp_core::env::get_optional_var;
use futures::channel::mpsc::{self, Sender};
use futures::{Future, StreamExt};
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Default value for the `poll_period` configuration property.
const DEFAULT_POLL_PERIOD_SECS: u64 = 1;

/// Configuration properties for the listener.
#[derive(Clone, Debug, PartialEq)]
pub struct ListenerOptions {
    /// Queue to consume messages from.
    pub queue: QueueName,

    /// How often to look for new messages when not explicitly notified.
    pub poll_period: Duration,
}

impl Default for ListenerOptions {
    fn default() -> Self {
        Self {
            queue: QueueName::default(),
            poll_period: Duration::from_secs(DEFAULT_POLL_PERIOD_SECS),
        }
    }
}

impl ListenerOptions {
    /// Creates a new set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This uses `<prefix>_NAME` and `<prefix>_POLL_PERIOD`, both optional.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        let queue = match get_optional_var::<String>(prefix, "NAME")? {
            Some(name) => QueueName::new(name)
                .map_err(|e| format!("Invalid value in environment variable {}_NAME: {}", prefix, e))?,
            None => QueueName::default(),
        };
        Ok(Self {
            queue,
            poll_period: get_optional_var::<Duration>(prefix, "POLL_PERIOD")?
                .unwrap_or(Duration::from_secs(DEFAULT_POLL_PERIOD_SECS)),
        })
    }
}

/// Delivers all pending messages in `queue` to `handler`, oldest first, and returns how many
/// were delivered.
///
/// Every message is removed from the queue before it is handed to the `handler`, which means that
/// a handler failure loses the message.
pub(super) async fn drain<H, HFut>(
    db: &(dyn Db + Send + Sync),
    queue: &QueueName,
    handler: &H,
) -> DriverResult<usize>
where
    H: Fn(Message) -> HFut,
    HFut: Future<Output = ()>,
{
    let mut delivered = 0;
    loop {
        let message = {
            let mut tx = db.begin().await?;
            let message = db::take_oldest_message(tx.ex(), queue).await?;
            tx.commit().await?;
            message
        };

        match message {
            Some(message) => {
                info!("Message received: {}", message.payload());
                handler(message).await;
                delivered += 1;
            }
            None => break Ok(delivered),
        }
    }
}

/// Background consumer of a queue.
///
/// The listener wakes up whenever it is notified and every polling period, and on each wakeup
/// drains all pending messages.  Processing stops once all copies of the listener are dropped.
#[derive(Clone)]
pub struct Listener {
    /// Background message processing loop.
    _worker: Arc<JoinHandle<()>>,

    /// Communication channel with the `worker` to trigger processing cycles.
    control_tx: Sender<()>,
}

impl Listener {
    /// Creates a new listener backed by `db`, configured according to `opts` and using `handler`
    /// to process the received messages.
    pub fn new<H, HFut>(db: Arc<dyn Db + Send + Sync>, opts: ListenerOptions, handler: H) -> Self
    where
        H: Fn(Message) -> HFut + Send + Sync + 'static,
        HFut: Future<Output = ()> + Send + 'static,
    {
        let (control_tx, mut control_rx) = mpsc::channel(1);
        let worker = tokio::spawn(async move {
            loop {
                match tokio::time::timeout(opts.poll_period, control_rx.next()).await {
                    Ok(None) => break,
                    Ok(Some(())) | Err(_) => (),
                }

                if let Err(e) = drain(db.as_ref(), &opts.queue, &handler).await {
                    warn!("Message processing cycle failed: {}; will retry later", e);
                }
            }
        });
        Self { _worker: Arc::from(worker), control_tx }
    }

    /// Triggers execution of a processing cycle in the background.
    pub async fn notify(&mut self) -> DriverResult<()> {
        match self.control_tx.try_send(()) {
            Ok(()) => Ok(()),
            Err(e) if e.is_full() => {
                // A pending notification already exists and the listener drains the whole queue
                // when it handles it, so there is no need to insert another.
                Ok(())
            }
            Err(e) => Err(DriverError::BackendError(format!("Cannot awaken listener task: {}", e))),
        }
    }
}
