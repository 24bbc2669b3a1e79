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

//! API to get a product by its code.

use crate::driver::Driver;
use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use demoapp_core::rest::{EmptyBody, RestError};
use log::debug;

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(code): Path<String>,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    debug!("code={}", code);
    match driver.get_product_by_code(&code).await? {
        Some(product) => Ok(Json(product)),
        None => Err(RestError::NotFound(format!("Product with code {} not found", code))),
    }
}

#[cfg(test)]
mod tests {
    use crate::model::*;
    use crate::rest::testutils::*;
    use axum::http;
    use demoapp_core::rest::testutils::*;

    fn route(code: &str) -> (http::Method, String) {
        (http::Method::GET, format!("/products/code/{}", code))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        let product = context.put_product("P001", "Product 1", true).await;
        context.put_product("P002", "Product 2", true).await;

        let response = OneShotBuilder::new(context.into_app(), route("P001"))
            .send_empty()
            .await
            .expect_json::<Product>()
            .await;
        assert_eq!(product, response);
    }

    #[tokio::test]
    async fn test_missing() {
        let context = TestContext::setup().await;

        context.put_product("P001", "Product 1", true).await;

        OneShotBuilder::new(context.into_app(), route("p001"))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("code p001 not found")
            .await;
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route("P001"));
}
