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

//! Database abstraction for the message queue.

use crate::model::{Message, QueueName};
#[cfg(feature = "postgres")]
use demoapp_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use demoapp_core::db::sqlite;
use demoapp_core::db::{DbError, DbResult, Executor};
#[cfg(feature = "postgres")]
use sqlx::postgres::PgRow;
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
#[cfg(feature = "postgres")]
use time::OffsetDateTime;
use uuid::Uuid;

#[cfg(test)]
mod tests;

/// Converts a raw queue name read from the database into a `QueueName`.
fn queue_name_from_db(raw: String) -> DbResult<QueueName> {
    QueueName::new(raw).map_err(DbError::from)
}

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for Message {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: Uuid = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let queue: String = row.try_get("queue").map_err(postgres::map_sqlx_error)?;
        let payload: String = row.try_get("payload").map_err(postgres::map_sqlx_error)?;
        let sent: OffsetDateTime = row.try_get("sent").map_err(postgres::map_sqlx_error)?;
        Ok(Message::from_parts(id, queue_name_from_db(queue)?, payload, sent))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Message {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: Uuid = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let queue: String = row.try_get("queue").map_err(sqlite::map_sqlx_error)?;
        let payload: String = row.try_get("payload").map_err(sqlite::map_sqlx_error)?;
        let sent_sec: i64 = row.try_get("sent_sec").map_err(sqlite::map_sqlx_error)?;
        let sent_nsec: i64 = row.try_get("sent_nsec").map_err(sqlite::map_sqlx_error)?;
        let sent = sqlite::build_timestamp(sent_sec, sent_nsec)?;
        Ok(Message::from_parts(id, queue_name_from_db(queue)?, payload, sent))
    }
}

/// Initializes the database schema.
pub async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => postgres::run_schema(ex, include_str!("postgres.sql")).await,

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Stores a new `message` at the tail of its queue.
pub(crate) async fn put_message(ex: &mut Executor, message: &Message) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "INSERT INTO messages (id, queue, payload, sent) VALUES ($1, $2, $3, $4)";
            sqlx::query(query_str)
                .bind(message.id())
                .bind(message.queue().as_str())
                .bind(message.payload())
                .bind(message.sent())
                .execute(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let (sent_sec, sent_nsec) = sqlite::unpack_timestamp(*message.sent())?;

            let query_str = "
                INSERT INTO messages (id, queue, payload, sent_sec, sent_nsec)
                VALUES (?, ?, ?, ?, ?)
            ";
            sqlx::query(query_str)
                .bind(message.id())
                .bind(message.queue().as_str())
                .bind(message.payload())
                .bind(sent_sec)
                .bind(sent_nsec)
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
    Ok(())
}

/// Atomically removes the oldest message in `queue` and returns it, if any.
///
/// Removal acknowledges the message: once returned, no other consumer will ever see it.
pub(crate) async fn take_oldest_message(
    ex: &mut Executor,
    queue: &QueueName,
) -> DbResult<Option<Message>> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                DELETE FROM messages
                WHERE seq = (
                    SELECT seq FROM messages WHERE queue = $1
                    ORDER BY seq LIMIT 1
                    FOR UPDATE SKIP LOCKED
                )
                RETURNING id, queue, payload, sent
            ";
            let row = sqlx::query(query_str)
                .bind(queue.as_str())
                .fetch_optional(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.map(Message::try_from).transpose()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                DELETE FROM messages
                WHERE seq = (SELECT seq FROM messages WHERE queue = ? ORDER BY seq LIMIT 1)
                RETURNING id, queue, payload, sent_sec, sent_nsec
            ";
            let row = sqlx::query(query_str)
                .bind(queue.as_str())
                .fetch_optional(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            row.map(Message::try_from).transpose()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Counts the messages pending delivery in `queue`.
#[cfg(test)]
pub(crate) async fn count_messages(ex: &mut Executor, queue: &QueueName) -> DbResult<i64> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT COUNT(*) AS count FROM messages WHERE queue = $1";
            let row = sqlx::query(query_str)
                .bind(queue.as_str())
                .fetch_one(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get("count").map_err(postgres::map_sqlx_error)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT COUNT(*) AS count FROM messages WHERE queue = ?";
            let row = sqlx::query(query_str)
                .bind(queue.as_str())
                .fetch_one(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            row.try_get("count").map_err(sqlite::map_sqlx_error)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}
