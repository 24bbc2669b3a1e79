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

//! API to get a page of the students in a grade.

use crate::driver::Driver;
use crate::model::{PageRequest, StudentSortKey};
use crate::rest::PageQuery;
use axum::Json;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use demoapp_core::rest::{EmptyBody, RestError};
use log::debug;
use serde::Deserialize;

/// Query parameters that select the grade.
#[derive(Debug, Deserialize)]
pub(crate) struct GradeQuery {
    /// Grade to list the students of.
    grade: Option<i32>,
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Query(grade): Query<GradeQuery>,
    Query(query): Query<PageQuery>,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    let grade = match grade.grade {
        Some(grade) => grade,
        None => {
            return Err(RestError::InvalidRequest("Required parameter grade is missing".to_owned()));
        }
    };
    let request: PageRequest<StudentSortKey> = query.into_request()?;
    debug!("grade={}, pageable={}", grade, request);
    let page = driver.get_students_by_grade(grade, &request).await?;
    Ok(Json(page))
}

#[cfg(test)]
mod tests {
    use crate::model::*;
    use crate::rest::testutils::*;
    use axum::http;
    use demoapp_core::rest::testutils::*;

    fn route() -> (http::Method, String) {
        (http::Method::GET, "/students".to_owned())
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        context.put_student("Carol", 5).await;
        context.put_student("Bob", 5).await;
        context.put_student("Alice", 5).await;
        context.put_student("Dave", 6).await;

        let response = OneShotBuilder::new(context.into_app(), route())
            .with_query([("grade", "5"), ("size", "2"), ("sort", "name")])
            .send_empty()
            .await
            .expect_json::<Page<Student>>()
            .await;
        assert_eq!(3, *response.total_elements());
        assert_eq!(2, *response.total_pages());
        assert_eq!(2, *response.size());
        let names: Vec<String> = response.into_content().iter().map(|s| s.name().clone()).collect();
        assert_eq!(vec!["Alice", "Bob"], names);
    }

    #[tokio::test]
    async fn test_empty_grade() {
        let context = TestContext::setup().await;

        context.put_student("Alice", 5).await;

        let response = OneShotBuilder::new(context.into_app(), route())
            .with_query([("grade", "1")])
            .send_empty()
            .await
            .expect_json::<Page<Student>>()
            .await;
        assert_eq!(0, *response.total_elements());
        assert_eq!(0, *response.total_pages());
        assert!(response.into_content().is_empty());
    }

    #[tokio::test]
    async fn test_missing_grade() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.into_app(), route())
            .send_empty()
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("Required parameter grade is missing")
            .await;
    }

    #[tokio::test]
    async fn test_bad_direction() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.into_app(), route())
            .with_query([("grade", "1"), ("sort", "name,up")])
            .send_empty()
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("Invalid sort direction 'up'")
            .await;
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route(), [("grade", "1")]);
}
