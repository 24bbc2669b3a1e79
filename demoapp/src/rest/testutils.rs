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

//! Test utilities for the REST API.

use crate::db;
use crate::driver::Driver;
use crate::model::*;
use crate::rest::app;
use axum::Router;
use demoapp_core::db::Db;
use std::sync::Arc;

/// State of a running test.
pub(crate) struct TestContext {
    /// The database backing the application.
    db: Arc<dyn Db + Send + Sync>,

    /// The application under test.
    app: Router,
}

impl TestContext {
    /// Initializes an in-memory database with the schema and an application on top of it.
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> =
            Arc::new(demoapp_core::db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let driver = Driver::new(db.clone());
        let app = app(driver);
        Self { db, app }
    }

    /// Gets a copy of the application.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Consumes the context and returns the application.
    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    /// Creates a product directly in the database.
    pub(crate) async fn put_product(&self, code: &str, name: &str, active: bool) -> Product {
        let product =
            NewProduct::new(code, name, format!("This is {}", name), active).unwrap();
        db::put_product(&mut self.db.ex().await.unwrap(), None, &product).await.unwrap()
    }

    /// Gets a product directly from the database.
    pub(crate) async fn get_product(&self, id: ProductId) -> Option<Product> {
        db::get_product_by_id(&mut self.db.ex().await.unwrap(), id).await.unwrap()
    }

    /// Creates a student directly in the database.
    pub(crate) async fn put_student(&self, name: &str, grade: i32) -> Student {
        let student = NewStudent::new(name, grade).unwrap();
        db::put_student(&mut self.db.ex().await.unwrap(), None, &student).await.unwrap()
    }

    /// Gets a student directly from the database.
    pub(crate) async fn get_student(&self, id: &StudentId) -> Option<Student> {
        db::get_student_by_id(&mut self.db.ex().await.unwrap(), id).await.unwrap()
    }
}
