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

//! Product and student CRUD service backed by a relational database, with a database-backed
//! message queue consumed in the background.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use demoapp_core::db::Db;
use demoapp_core::driver::DriverResult;
use demoapp_queue::driver::{Listener, ListenerOptions};
use log::debug;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

pub mod db;
mod driver;
use driver::Driver;
pub mod model;
mod rest;
use rest::app;

/// Populates `db` with the sample products that are missing and returns how many were created.
pub async fn seed(db: Arc<dyn Db + Send + Sync>) -> DriverResult<usize> {
    Driver::new(db).seed_products().await
}

/// Instantiates all resources to serve the application on `bind_addr`.
///
/// The queue listener configured by `listener_opts` runs for as long as the server does.
///
/// While it'd be nice to push this responsibility to `main`, doing so would force us to expose many
/// crate-internal types to the public, which in turn would make dead code detection harder.
pub async fn serve(
    bind_addr: impl Into<SocketAddr>,
    db: Arc<dyn Db + Send + Sync>,
    listener_opts: ListenerOptions,
) -> Result<(), Box<dyn Error>> {
    let _listener = Listener::new(db.clone(), listener_opts, |message| async move {
        debug!("Processed message {} sent at {}", message.id(), message.sent());
    });

    let driver = Driver::new(db);
    let app = app(driver);

    let listener = tokio::net::TcpListener::bind(bind_addr.into()).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
