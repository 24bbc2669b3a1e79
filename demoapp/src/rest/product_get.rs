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

//! API to get a product by its identifier.

use crate::driver::Driver;
use crate::model::ProductId;
use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use demoapp_core::rest::{EmptyBody, RestError};
use log::debug;

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<ProductId>,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    debug!("id={}", id);
    match driver.get_product_by_id(id).await? {
        Some(product) => Ok(Json(product)),
        None => Err(RestError::NotFound(format!("Product {} not found", id))),
    }
}

#[cfg(test)]
mod tests {
    use crate::model::*;
    use crate::rest::testutils::*;
    use axum::http;
    use demoapp_core::rest::testutils::*;

    fn route(id: &str) -> (http::Method, String) {
        (http::Method::GET, format!("/products/{}", id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        context.put_product("P001", "Product 1", true).await;
        let product = context.put_product("P002", "Product 2", false).await;

        let response = OneShotBuilder::new(context.into_app(), route(&product.id().to_string()))
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

        OneShotBuilder::new(context.into_app(), route("12345"))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("Product 12345 not found")
            .await;
    }

    #[tokio::test]
    async fn test_bad_id() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.into_app(), route("abc"))
            .send_empty()
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_text("parse")
            .await;
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route("1"));
}
