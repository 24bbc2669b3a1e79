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

//! Operations on products.

use crate::db;
use crate::driver::Driver;
use crate::model::*;
use demoapp_core::driver::DriverResult;

impl Driver {
    /// Saves `product`, replacing the existing one with the given `id` if there is one and creating
    /// a new one otherwise.
    pub(crate) async fn save_product(
        self,
        id: Option<ProductId>,
        product: &NewProduct,
    ) -> DriverResult<Product> {
        let product = db::put_product(&mut self.db.ex().await?, id, product).await?;
        Ok(product)
    }

    /// Gets the product with the given `id`, if any.
    pub(crate) async fn get_product_by_id(self, id: ProductId) -> DriverResult<Option<Product>> {
        let product = db::get_product_by_id(&mut self.db.ex().await?, id).await?;
        Ok(product)
    }

    /// Gets the product with the given `code`, if any.
    pub(crate) async fn get_product_by_code(self, code: &str) -> DriverResult<Option<Product>> {
        let product = db::get_product_by_code(&mut self.db.ex().await?, code).await?;
        Ok(product)
    }

    /// Gets all products whose name is exactly `name`.
    pub(crate) async fn get_products_by_name(self, name: &str) -> DriverResult<Vec<Product>> {
        let products = db::get_products_by_name(&mut self.db.ex().await?, name).await?;
        Ok(products)
    }

    /// Gets one page of the products whose active flag matches `active`.
    pub(crate) async fn get_products_by_active(
        self,
        active: bool,
        request: &PageRequest<ProductSortKey>,
    ) -> DriverResult<Page<Product>> {
        let mut tx = self.db.begin().await?;
        let page = db::get_products_by_active(tx.ex(), active, request).await?;
        tx.commit().await?;
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::testutils::*;
    use demoapp_core::driver::DriverError;

    #[tokio::test]
    async fn test_save_product_new() {
        let context = TestContext::setup().await;

        let new = NewProduct::new("P001", "Product 1", "Description 1", true).unwrap();
        let product = context.driver().save_product(None, &new).await.unwrap();
        assert_eq!("P001", product.code());
        assert_eq!("Product 1", product.name());
        assert_eq!("Description 1", product.description());
        assert!(*product.active());

        let stored = db::get_product_by_id(&mut context.ex().await, *product.id()).await.unwrap();
        assert_eq!(Some(product), stored);
    }

    #[tokio::test]
    async fn test_save_product_update_existing() {
        let context = TestContext::setup().await;

        let product = context.put_product("P001", "Product 1", true).await;

        let changes = NewProduct::new("P001", "Product 1b", "Updated", false).unwrap();
        let updated =
            context.driver().save_product(Some(*product.id()), &changes).await.unwrap();
        assert_eq!(product.id(), updated.id());
        assert_eq!("Product 1b", updated.name());
        assert!(!*updated.active());
    }

    #[tokio::test]
    async fn test_save_product_unchanged() {
        let context = TestContext::setup().await;

        let product = context.put_product("P001", "Product 1", true).await;

        let same = NewProduct::new(
            product.code().clone(),
            product.name().clone(),
            product.description().clone(),
            *product.active(),
        )
        .unwrap();
        let saved = context.driver().save_product(Some(*product.id()), &same).await.unwrap();
        assert_eq!(product, saved);
    }

    #[tokio::test]
    async fn test_save_product_unknown_id_creates() {
        let context = TestContext::setup().await;

        let product = NewProduct::new("P001", "Product 1", "", true).unwrap();
        let saved =
            context.driver().save_product(Some(ProductId::new(5)), &product).await.unwrap();
        assert_eq!("P001", saved.code());

        let stored = db::get_product_by_id(&mut context.ex().await, *saved.id()).await.unwrap();
        assert_eq!(Some(saved), stored);
    }

    #[tokio::test]
    async fn test_save_product_duplicate_code() {
        let context = TestContext::setup().await;

        context.put_product("P001", "Product 1", true).await;

        let product = NewProduct::new("P001", "Other", "", true).unwrap();
        assert_eq!(
            DriverError::AlreadyExists("Already exists".to_owned()),
            context.driver().save_product(None, &product).await.unwrap_err()
        );
    }

    #[tokio::test]
    async fn test_get_product_by_id() {
        let context = TestContext::setup().await;

        let product = context.put_product("P001", "Product 1", true).await;

        assert_eq!(
            Some(product.clone()),
            context.driver().get_product_by_id(*product.id()).await.unwrap()
        );
        assert_eq!(None, context.driver().get_product_by_id(ProductId::new(999)).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_product_by_code() {
        let context = TestContext::setup().await;

        context.put_product("P001", "Product 1", true).await;
        let product = context.put_product("P002", "Product 2", true).await;

        assert_eq!(Some(product), context.driver().get_product_by_code("P002").await.unwrap());
        assert_eq!(None, context.driver().get_product_by_code("P003").await.unwrap());
    }

    #[tokio::test]
    async fn test_get_products_by_name() {
        let context = TestContext::setup().await;

        let product1 = context.put_product("P001", "Gadget", true).await;
        context.put_product("P002", "Widget", true).await;
        let product3 = context.put_product("P003", "Gadget", false).await;

        assert_eq!(
            vec![product1, product3],
            context.driver().get_products_by_name("Gadget").await.unwrap()
        );
        assert!(context.driver().get_products_by_name("Nothing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_products_by_active() {
        let context = TestContext::setup().await;

        let active = context.put_product("P001", "Product 1", true).await;
        let inactive = context.put_product("P002", "Product 2", false).await;

        let request = PageRequest::from_raw(Some(0), Some(5), Some("name")).unwrap();

        let page = context.driver().get_products_by_active(true, &request).await.unwrap();
        assert_eq!(1, *page.total_elements());
        assert_eq!(1, *page.total_pages());
        assert_eq!(vec![active], page.into_content());

        let page = context.driver().get_products_by_active(false, &request).await.unwrap();
        assert_eq!(vec![inactive], page.into_content());
    }
}
