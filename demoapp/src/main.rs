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

//! Entry point to the service.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use demoapp::{seed, serve};
use demoapp_core::db::Db;
use demoapp_core::db::postgres::{PostgresDb, PostgresOptions};
use demoapp_core::env::get_optional_var;
use demoapp_queue::driver::ListenerOptions;
use log::info;
use std::error::Error;
use std::net::Ipv4Addr;
use std::sync::Arc;

/// Port to listen on when `DEMOAPP_PORT` is not set.
const DEFAULT_PORT: u16 = 8080;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let port = get_optional_var::<u16>("DEMOAPP", "PORT")?.unwrap_or(DEFAULT_PORT);
    let addr = (Ipv4Addr::LOCALHOST, port);
    let run_seed = get_optional_var::<bool>("DEMOAPP", "SEED")?.unwrap_or(true);

    let db_opts = PostgresOptions::from_env("PGSQL_PROD")?;
    let listener_opts = ListenerOptions::from_env("QUEUE")?;

    let db: Arc<dyn Db + Send + Sync> = Arc::new(PostgresDb::connect(db_opts)?);
    {
        let mut ex = db.ex().await?;
        demoapp::db::init_schema(&mut ex).await?;
        demoapp_queue::db::init_schema(&mut ex).await?;
    }

    if run_seed {
        let created = seed(db.clone()).await?;
        info!("Created {} sample products", created);
    }

    let result = serve(addr, db.clone(), listener_opts).await;
    db.close().await;
    result
}
