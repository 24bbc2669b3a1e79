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

//! Entry point to the REST server.

use crate::driver::Driver;
use crate::model::{PageRequest, SortKey};
use axum::Router;
use demoapp_core::model::ModelResult;
use serde::Deserialize;

mod product_by_code_get;
mod product_get;
mod product_post;
mod products_get;
mod products_search_get;
mod student_get;
mod student_post;
mod students_get;
mod students_search_get;
#[cfg(test)]
mod testutils;

/// Query parameters that select one page of a collection.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PageQuery {
    /// Zero-based number of the page to return.
    page: Option<u32>,

    /// Maximum number of elements in the page.
    size: Option<u32>,

    /// Sort criteria in the form `field` or `field,asc|desc`.
    sort: Option<String>,
}

impl PageQuery {
    /// Converts the query into a validated page request.
    fn into_request<K: SortKey>(self) -> ModelResult<PageRequest<K>> {
        PageRequest::from_raw(self.page, self.size, self.sort.as_deref())
    }
}

/// Query parameters of the search APIs.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct NameQuery {
    /// Exact name to look for.
    #[serde(default)]
    name: String,
}

/// Creates the router for the application.
pub(crate) fn app(driver: Driver) -> Router {
    use axum::routing::get;
    Router::new()
        .route("/products", get(products_get::handler).post(product_post::handler))
        .route("/products/:id", get(product_get::handler))
        .route("/products/code/:code", get(product_by_code_get::handler))
        .route("/products/search", get(products_search_get::handler))
        .route("/students", get(students_get::handler).post(student_post::handler))
        .route("/students/:id", get(student_get::handler))
        .route("/students/search", get(students_search_get::handler))
        .with_state(driver)
}
