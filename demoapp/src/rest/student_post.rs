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

//! API to create or replace a student.

use crate::driver::Driver;
use crate::model::StudentRequest;
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use demoapp_core::rest::RestError;
use log::debug;

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Json(request): Json<StudentRequest>,
) -> Result<impl IntoResponse, RestError> {
    debug!("student={:?}", request);
    let (id, student) = request.validate()?;
    let student = driver.save_student(id, &student).await?;
    Ok(Json(student))
}
