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

//! Persistence of products.

use super::{count_to_u64, u64_to_i64};
use crate::model::{NewProduct, Page, PageRequest, Product, ProductId, ProductSortKey, SortKey};
use demoapp_core::db::{DbError, DbResult, Executor};
#[cfg(feature = "postgres")]
use demoapp_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use demoapp_core::db::sqlite;
use futures::TryStreamExt;
#[cfg(feature = "postgres")]
use sqlx::postgres::PgRow;
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for Product {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let code: String = row.try_get("code").map_err(postgres::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(postgres::map_sqlx_error)?;
        let description: String = row.try_get("description").map_err(postgres::map_sqlx_error)?;
        let active: bool = row.try_get("active").map_err(postgres::map_sqlx_error)?;
        Ok(Product::from_parts(ProductId::new(id), NewProduct::new(code, name, description, active)?))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Product {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let code: String = row.try_get("code").map_err(sqlite::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(sqlite::map_sqlx_error)?;
        let description: String = row.try_get("description").map_err(sqlite::map_sqlx_error)?;
        let active: bool = row.try_get("active").map_err(sqlite::map_sqlx_error)?;
        Ok(Product::from_parts(ProductId::new(id), NewProduct::new(code, name, description, active)?))
    }
}

/// Inserts `product` and returns the identifier assigned to it.
async fn insert_product(ex: &mut Executor, product: &NewProduct) -> DbResult<ProductId> {
    let id: i64 = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO products (code, name, description, active)
                VALUES ($1, $2, $3, $4)
                RETURNING id
            ";
            let row = sqlx::query(query_str)
                .bind(product.code())
                .bind(product.name())
                .bind(product.description())
                .bind(product.active())
                .fetch_one(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get("id").map_err(postgres::map_sqlx_error)?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                INSERT INTO products (code, name, description, active)
                VALUES (?, ?, ?, ?)
                RETURNING id
            ";
            let row = sqlx::query(query_str)
                .bind(product.code())
                .bind(product.name())
                .bind(product.description())
                .bind(product.active())
                .fetch_one(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            row.try_get("id").map_err(sqlite::map_sqlx_error)?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    Ok(ProductId::new(id))
}

/// Replaces the contents of the product `id` with `product`.
///
/// Returns false if there is no product with the given `id`.
async fn update_product(
    ex: &mut Executor,
    id: ProductId,
    product: &NewProduct,
) -> DbResult<bool> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE products SET code = $1, name = $2, description = $3, active = $4
                WHERE id = $5
            ";
            sqlx::query(query_str)
                .bind(product.code())
                .bind(product.name())
                .bind(product.description())
                .bind(product.active())
                .bind(id.as_i64())
                .execute(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                UPDATE products SET code = ?, name = ?, description = ?, active = ?
                WHERE id = ?
            ";
            sqlx::query(query_str)
                .bind(product.code())
                .bind(product.name())
                .bind(product.description())
                .bind(product.active())
                .bind(id.as_i64())
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?
                .rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    match rows_affected {
        0 => Ok(false),
        1 => Ok(true),
        n => Err(DbError::BackendError(format!("Update affected {} rows", n))),
    }
}

/// Stores `product`.
///
/// If `id` is none or does not match an existing product, the product is inserted and assigned a
/// new identifier.  Otherwise, the existing product with that `id` is updated.
pub(crate) async fn put_product(
    ex: &mut Executor,
    id: Option<ProductId>,
    product: &NewProduct,
) -> DbResult<Product> {
    let id = match id {
        Some(id) => {
            if update_product(ex, id, product).await? {
                id
            } else {
                insert_product(ex, product).await?
            }
        }
        None => insert_product(ex, product).await?,
    };
    Ok(Product::from_parts(id, product.clone()))
}

/// Gets the product with the given `id`, if it exists.
pub(crate) async fn get_product_by_id(
    ex: &mut Executor,
    id: ProductId,
) -> DbResult<Option<Product>> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM products WHERE id = $1";
            let row = sqlx::query(query_str)
                .bind(id.as_i64())
                .fetch_optional(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.map(Product::try_from).transpose()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM products WHERE id = ?";
            let row = sqlx::query(query_str)
                .bind(id.as_i64())
                .fetch_optional(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            row.map(Product::try_from).transpose()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the product with the given business `code`, if it exists.
pub(crate) async fn get_product_by_code(
    ex: &mut Executor,
    code: &str,
) -> DbResult<Option<Product>> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM products WHERE code = $1";
            let row = sqlx::query(query_str)
                .bind(code)
                .fetch_optional(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.map(Product::try_from).transpose()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM products WHERE code = ?";
            let row = sqlx::query(query_str)
                .bind(code)
                .fetch_optional(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            row.map(Product::try_from).transpose()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets all products whose name is exactly `name`, sorted by identifier.
pub(crate) async fn get_products_by_name(ex: &mut Executor, name: &str) -> DbResult<Vec<Product>> {
    let mut products = vec![];
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM products WHERE name = $1 ORDER BY id";
            let mut rows = sqlx::query(query_str).bind(name).fetch(&mut **ex);
            while let Some(row) = rows.try_next().await.map_err(postgres::map_sqlx_error)? {
                products.push(Product::try_from(row)?);
            }
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM products WHERE name = ? ORDER BY id";
            let mut rows = sqlx::query(query_str).bind(name).fetch(&mut **ex);
            while let Some(row) = rows.try_next().await.map_err(sqlite::map_sqlx_error)? {
                products.push(Product::try_from(row)?);
            }
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
    Ok(products)
}

/// Gets the page described by `request` of all products whose active flag matches `active`.
///
/// This issues two queries, so the caller should run it inside a transaction for the total
/// count to match the returned content.
pub(crate) async fn get_products_by_active(
    ex: &mut Executor,
    active: bool,
    request: &PageRequest<ProductSortKey>,
) -> DbResult<Page<Product>> {
    let limit = i64::from(*request.size());
    let offset = u64_to_i64(request.offset())?;
    let order_by = format!("{} {}, id ASC", request.sort().column(), request.direction().sql());

    let mut products = vec![];
    let total = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT COUNT(*) AS count FROM products WHERE active = $1";
            let row = sqlx::query(query_str)
                .bind(active)
                .fetch_one(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            let total: i64 = row.try_get("count").map_err(postgres::map_sqlx_error)?;

            let query_str = format!(
                "SELECT * FROM products WHERE active = $1 ORDER BY {} LIMIT $2 OFFSET $3",
                order_by
            );
            let mut rows =
                sqlx::query(&query_str).bind(active).bind(limit).bind(offset).fetch(&mut **ex);
            while let Some(row) = rows.try_next().await.map_err(postgres::map_sqlx_error)? {
                products.push(Product::try_from(row)?);
            }
            total
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT COUNT(*) AS count FROM products WHERE active = ?";
            let row = sqlx::query(query_str)
                .bind(active)
                .fetch_one(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            let total: i64 = row.try_get("count").map_err(sqlite::map_sqlx_error)?;

            let query_str = format!(
                "SELECT * FROM products WHERE active = ? ORDER BY {} LIMIT ? OFFSET ?",
                order_by
            );
            let mut rows =
                sqlx::query(&query_str).bind(active).bind(limit).bind(offset).fetch(&mut **ex);
            while let Some(row) = rows.try_next().await.map_err(sqlite::map_sqlx_error)? {
                products.push(Product::try_from(row)?);
            }
            total
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    Ok(Page::new(products, count_to_u64(total)?, request))
}

/// Deletes the product with the given `id`.
#[cfg(test)]
pub(crate) async fn delete_product(ex: &mut Executor, id: ProductId) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_i64())
            .execute(&mut **ex)
            .await
            .map_err(postgres::map_sqlx_error)?
            .rows_affected(),

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id.as_i64())
            .execute(&mut **ex)
            .await
            .map_err(sqlite::map_sqlx_error)?
            .rows_affected(),

        #[allow(unused)]
        _ => unreachable!(),
    };
    match rows_affected {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        n => Err(DbError::BackendError(format!("Deletion affected {} rows", n))),
    }
}
