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

//! Database abstraction to persist products and students.
//!
//! Every operation is a free function that takes an `Executor` so that callers can decide whether
//! to issue it directly against the pool or as part of a transaction.

#[cfg(feature = "postgres")]
use demoapp_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use demoapp_core::db::sqlite;
use demoapp_core::db::{DbError, DbResult, Executor};

mod products;
#[cfg(test)]
pub(crate) use products::delete_product;
pub(crate) use products::{
    get_product_by_code, get_product_by_id, get_products_by_active, get_products_by_name,
    put_product,
};
mod students;
pub(crate) use students::{
    get_student_by_id, get_students_by_grade, get_students_by_name, put_student,
};


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

/// Converts a row count as returned by the database into an unsigned number.
fn count_to_u64(count: i64) -> DbResult<u64> {
    u64::try_from(count)
        .map_err(|e| DbError::DataIntegrityError(format!("Invalid row count {}: {}", count, e)))
}

/// Converts a pagination quantity into the signed type the databases expect.
fn u64_to_i64(value: u64) -> DbResult<i64> {
    i64::try_from(value)
        .map_err(|e| DbError::BackendError(format!("Value {} out of range: {}", value, e)))
}
