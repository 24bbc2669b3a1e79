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

//! API to create or update a product.

use crate::driver::Driver;
use crate::model::ProductRequest;
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use demoapp_core::rest::RestError;
use log::debug;

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Json(request): Json<ProductRequest>,
) -> Result<impl IntoResponse, RestError> {
    debug!("product={:?}", request);
    let (id, product) = request.validate()?;
    let product = driver.save_product(id, &product).await?;
    Ok(Json(product))
}

#[cfg(test)]
mod tests {
    use crate::model::*;
    use crate::rest::testutils::*;
    use axum::http;
    use demoapp_core::rest::testutils::*;

    fn route() -> (http::Method, String) {
        (http::Method::POST, "/products".to_owned())
    }

    /// Builds a request to create a product with all fields set.
    fn new_request(code: &str, name: &str) -> ProductRequest {
        ProductRequest {
            id: None,
            code: Some(code.to_owned()),
            name: Some(name.to_owned()),
            description: Some(format!("The {}", name)),
            active: Some(true),
        }
    }

    #[tokio::test]
    async fn test_create() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), route())
            .send_json(new_request("P001", "Product 1"))
            .await
            .expect_json::<Product>()
            .await;
        assert_eq!("P001", response.code());
        assert_eq!("Product 1", response.name());
        assert_eq!("The Product 1", response.description());
        assert!(*response.active());

        assert_eq!(Some(response.clone()), context.get_product(*response.id()).await);
    }

    #[tokio::test]
    async fn test_create_defaults() {
        let context = TestContext::setup().await;

        let request = ProductRequest {
            code: Some("P001".to_owned()),
            name: Some("Product 1".to_owned()),
            ..Default::default()
        };
        let response = OneShotBuilder::new(context.app(), route())
            .send_json(request)
            .await
            .expect_json::<Product>()
            .await;
        assert_eq!("", response.description());
        assert!(!*response.active());
    }

    #[tokio::test]
    async fn test_update() {
        let context = TestContext::setup().await;

        let product = context.put_product("P001", "Product 1", true).await;

        let mut request = new_request("P001", "Renamed");
        request.id = Some(*product.id());
        request.active = Some(false);
        let response = OneShotBuilder::new(context.app(), route())
            .send_json(request)
            .await
            .expect_json::<Product>()
            .await;
        assert_eq!(product.id(), response.id());
        assert_eq!("Renamed", response.name());
        assert!(!*response.active());

        assert_eq!(Some(response), context.get_product(*product.id()).await);
    }

    #[tokio::test]
    async fn test_update_unchanged() {
        let context = TestContext::setup().await;

        let product = context.put_product("P001", "Product 1", true).await;

        let request = ProductRequest {
            id: Some(*product.id()),
            code: Some(product.code().clone()),
            name: Some(product.name().clone()),
            description: Some(product.description().clone()),
            active: Some(*product.active()),
        };
        let response = OneShotBuilder::new(context.app(), route())
            .send_json(request)
            .await
            .expect_json::<Product>()
            .await;
        assert_eq!(product, response);
    }

    #[tokio::test]
    async fn test_unknown_id_creates() {
        let context = TestContext::setup().await;

        let mut request = new_request("P001", "Product 1");
        request.id = Some(ProductId::new(42));
        let response = OneShotBuilder::new(context.app(), route())
            .send_json(request)
            .await
            .expect_json::<Product>()
            .await;
        assert_eq!("P001", response.code());
        assert_eq!("Product 1", response.name());

        assert_eq!(Some(response.clone()), context.get_product(*response.id()).await);
    }

    #[tokio::test]
    async fn test_duplicate_code() {
        let context = TestContext::setup().await;

        context.put_product("P001", "Product 1", true).await;

        OneShotBuilder::new(context.into_app(), route())
            .send_json(new_request("P001", "Product 2"))
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("Already exists")
            .await;
    }

    #[tokio::test]
    async fn test_invalid_fields() {
        let context = TestContext::setup().await;

        let request = ProductRequest { code: Some("  ".to_owned()), ..Default::default() };
        OneShotBuilder::new(context.into_app(), route())
            .send_json(request)
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("Invalid product: code must not be blank; name must not be blank")
            .await;
    }

    test_payload_must_be_json!(TestContext::setup().await.into_app(), route());
}
