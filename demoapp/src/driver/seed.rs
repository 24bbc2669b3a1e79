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

//! Population of the database with sample data at startup.

use crate::db;
use crate::driver::Driver;
use crate::model::*;
use demoapp_core::driver::DriverResult;
use log::debug;

/// Number of sample products to create.
const SAMPLE_PRODUCTS: usize = 10;

/// Number of leading sample products that are marked as active.
const ACTIVE_SAMPLE_PRODUCTS: usize = 8;

/// Builds the `i`th sample product.
fn sample_product(i: usize) -> DriverResult<NewProduct> {
    let product = NewProduct::new(
        format!("P00{}", i),
        format!("Product {}", i),
        format!("This is a cool product {}", i),
        i < ACTIVE_SAMPLE_PRODUCTS,
    )?;
    Ok(product)
}

impl Driver {
    /// Creates the sample products, skipping those whose code is already taken.
    ///
    /// Returns the number of products that were created.
    pub(crate) async fn seed_products(self) -> DriverResult<usize> {
        let mut tx = self.db.begin().await?;
        let mut created = 0;
        for i in 0..SAMPLE_PRODUCTS {
            let product = sample_product(i)?;
            if db::get_product_by_code(tx.ex(), product.code()).await?.is_some() {
                debug!("Product {} already exists", product.code());
                continue;
            }
            let product = db::put_product(tx.ex(), None, &product).await?;
            debug!("Product saved: {:?}", product);
            created += 1;
        }
        tx.commit().await?;
        Ok(created)
    }
}
