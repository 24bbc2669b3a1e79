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

//! API to get a student by its identifier.

use crate::driver::Driver;
use crate::model::StudentId;
use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use demoapp_core::rest::{EmptyBody, RestError};
use log::debug;

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<StudentId>,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    debug!("id={}", id);
    match driver.get_student_by_id(&id).await? {
        Some(student) => Ok(Json(student)),
        None => Err(RestError::NotFound(format!("Student {} not found", id))),
    }
}

#[cfg(test)]
mod tests {
    use crate::model::*;
    use crate::rest::testutils::*;
    use axum::http;
    use demoapp_core::rest::testutils::*;

    fn route(id: &str) -> (http::Method, String) {
        (http::Method::GET, format!("/students/{}", id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        let student = context.put_student("Alice", 3).await;
        context.put_student("Bob", 4).await;

        let response = OneShotBuilder::new(context.into_app(), route(student.id().as_str()))
            .send_empty()
            .await
            .expect_json::<Student>()
            .await;
        assert_eq!(student, response);
    }

    #[tokio::test]
    async fn test_missing() {
        let context = TestContext::setup().await;

        context.put_student("Alice", 3).await;

        OneShotBuilder::new(context.into_app(), route("unknown"))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("Student unknown not found")
            .await;
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route("some-id"));
}
