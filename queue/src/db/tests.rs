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

//! Common tests for any database implementation.

use crate::db::*;
use crate::model::{Message, QueueName};
use demoapp_core::db::Db;
use std::time::Duration;
use time::OffsetDateTime;
use time::macros::datetime;

/// Creates a message for `queue` with a `payload` that was sent `offset_secs` after a fixed base
/// time.
fn new_message(queue: &QueueName, payload: &str, offset_secs: u64) -> Message {
    let base: OffsetDateTime = datetime!(2023-06-01 10:00:00 UTC);
    Message::new(queue.clone(), payload, base + Duration::from_secs(offset_secs))
}

async fn test_take_oldest_message_empty(db: Box<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();
    assert_eq!(None, take_oldest_message(&mut ex, &QueueName::default()).await.unwrap());
    drop(ex);
    db.close().await;
}

async fn test_put_and_take_roundtrip(db: Box<dyn Db + Send + Sync>) {
    let queue = QueueName::default();
    let message = new_message(&queue, "A test message", 0);

    let mut ex = db.ex().await.unwrap();
    put_message(&mut ex, &message).await.unwrap();
    assert_eq!(1, count_messages(&mut ex, &queue).await.unwrap());

    let taken = take_oldest_message(&mut ex, &queue).await.unwrap().unwrap();
    assert_eq!(message, taken);
    assert_eq!(0, count_messages(&mut ex, &queue).await.unwrap());
    assert_eq!(None, take_oldest_message(&mut ex, &queue).await.unwrap());
    drop(ex);
    db.close().await;
}

async fn test_take_is_fifo(db: Box<dyn Db + Send + Sync>) {
    let queue = QueueName::default();

    let mut ex = db.ex().await.unwrap();
    // The sent timestamps go backwards to prove that ordering follows insertion, not time.
    for (i, payload) in ["first", "second", "third"].iter().enumerate() {
        put_message(&mut ex, &new_message(&queue, payload, 100 - i as u64)).await.unwrap();
    }

    let mut payloads = vec![];
    while let Some(message) = take_oldest_message(&mut ex, &queue).await.unwrap() {
        payloads.push(message.take_payload());
    }
    assert_eq!(vec!["first", "second", "third"], payloads);
    drop(ex);
    db.close().await;
}

async fn test_queues_are_isolated(db: Box<dyn Db + Send + Sync>) {
    let queue1 = QueueName::new("queue.one").unwrap();
    let queue2 = QueueName::new("queue.two").unwrap();

    let mut ex = db.ex().await.unwrap();
    put_message(&mut ex, &new_message(&queue1, "for one", 0)).await.unwrap();
    put_message(&mut ex, &new_message(&queue2, "for two", 1)).await.unwrap();

    assert_eq!(1, count_messages(&mut ex, &queue1).await.unwrap());
    assert_eq!(1, count_messages(&mut ex, &queue2).await.unwrap());

    let message = take_oldest_message(&mut ex, &queue2).await.unwrap().unwrap();
    assert_eq!("for two", message.payload());
    assert_eq!(None, take_oldest_message(&mut ex, &queue2).await.unwrap());

    let message = take_oldest_message(&mut ex, &queue1).await.unwrap().unwrap();
    assert_eq!("for one", message.payload());
    drop(ex);
    db.close().await;
}

async fn test_put_duplicate_id(db: Box<dyn Db + Send + Sync>) {
    let queue = QueueName::default();
    let message = new_message(&queue, "once", 0);

    let mut ex = db.ex().await.unwrap();
    put_message(&mut ex, &message).await.unwrap();
    assert_eq!(DbError::AlreadyExists, put_message(&mut ex, &message).await.unwrap_err());
    assert_eq!(1, count_messages(&mut ex, &queue).await.unwrap());
    drop(ex);
    db.close().await;
}

async fn test_take_in_rolled_back_tx_keeps_message(db: Box<dyn Db + Send + Sync>) {
    let queue = QueueName::default();
    put_message(&mut db.ex().await.unwrap(), &new_message(&queue, "kept", 0)).await.unwrap();

    {
        let mut tx = db.begin().await.unwrap();
        let message = take_oldest_message(tx.ex(), &queue).await.unwrap().unwrap();
        assert_eq!("kept", message.payload());
    }

    assert_eq!(1, count_messages(&mut db.ex().await.unwrap(), &queue).await.unwrap());
    db.close().await;
}

macro_rules! generate_db_tests [
    ( $setup:expr $(, #[$extra:meta] )? ) => {
        demoapp_core::db::testutils::generate_tests!(
            $(#[$extra],)?
            $setup,
            $crate::db::tests,
            test_take_oldest_message_empty,
            test_put_and_take_roundtrip,
            test_take_is_fifo,
            test_queues_are_isolated,
            test_put_duplicate_id,
            test_take_in_rolled_back_tx_keeps_message
        );
    }
];

mod sqlite {
    use super::*;
    use demoapp_core::db::sqlite::testutils::setup;

    /// Opens an in-memory database with the queue schema installed.
    async fn setup_with_schema() -> Box<dyn Db + Send + Sync> {
        let db = setup().await;
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        Box::from(db)
    }

    generate_db_tests!(setup_with_schema().await);
}

#[cfg(feature = "postgres")]
mod postgres {
    use super::*;
    use demoapp_core::db::postgres::testutils::setup;

    /// Opens the test database with the queue schema installed.
    async fn setup_with_schema() -> Box<dyn Db + Send + Sync> {
        let db = setup().await;
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        Box::from(db)
    }

    generate_db_tests!(
        setup_with_schema().await,
        #[ignore = "Requires environment configuration and is expensive"]
    );
}
