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

//! API to find students by name.

use crate::driver::Driver;
use crate::rest::NameQuery;
use axum::Json;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use demoapp_core::rest::{EmptyBody, RestError};
use log::debug;

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Query(query): Query<NameQuery>,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    debug!("name={}", query.name);
    let students = driver.get_students_by_name(&query.name).await?;
    Ok(Json(students))
}
