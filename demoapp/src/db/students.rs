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

//! Persistence of students.

use super::{count_to_u64, u64_to_i64};
use crate::model::{NewStudent, Page, PageRequest, SortKey, Student, StudentId, StudentSortKey};
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
impl TryFrom<PgRow> for Student {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: String = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(postgres::map_sqlx_error)?;
        let grade: i32 = row.try_get("grade").map_err(postgres::map_sqlx_error)?;
        Ok(Student::from_parts(StudentId::new(id), NewStudent::new(name, grade)?))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Student {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: String = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(sqlite::map_sqlx_error)?;
        let grade: i32 = row.try_get("grade").map_err(sqlite::map_sqlx_error)?;
        Ok(Student::from_parts(StudentId::new(id), NewStudent::new(name, grade)?))
    }
}

/// Stores `student`.
///
/// If `id` is none, the student is assigned a new identifier.  Otherwise, the student with that
/// `id` is replaced or created if it does not exist yet.
pub(crate) async fn put_student(
    ex: &mut Executor,
    id: Option<StudentId>,
    student: &NewStudent,
) -> DbResult<Student> {
    let id = id.unwrap_or_else(StudentId::generate);

    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO students (id, name, grade) VALUES ($1, $2, $3)
                ON CONFLICT (id) DO UPDATE SET name = excluded.name, grade = excluded.grade
            ";
            sqlx::query(query_str)
                .bind(id.as_str())
                .bind(student.name())
                .bind(student.grade())
                .execute(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                INSERT INTO students (id, name, grade) VALUES (?, ?, ?)
                ON CONFLICT (id) DO UPDATE SET name = excluded.name, grade = excluded.grade
            ";
            sqlx::query(query_str)
                .bind(id.as_str())
                .bind(student.name())
                .bind(student.grade())
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?
                .rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    if rows_affected != 1 {
        return Err(DbError::BackendError(format!("Upsert affected {} rows", rows_affected)));
    }
    Ok(Student::from_parts(id, student.clone()))
}

/// Gets the student with the given `id`, if it exists.
pub(crate) async fn get_student_by_id(
    ex: &mut Executor,
    id: &StudentId,
) -> DbResult<Option<Student>> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM students WHERE id = $1";
            let row = sqlx::query(query_str)
                .bind(id.as_str())
                .fetch_optional(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.map(Student::try_from).transpose()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM students WHERE id = ?";
            let row = sqlx::query(query_str)
                .bind(id.as_str())
                .fetch_optional(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            row.map(Student::try_from).transpose()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets all students whose name is exactly `name`, sorted by identifier.
pub(crate) async fn get_students_by_name(ex: &mut Executor, name: &str) -> DbResult<Vec<Student>> {
    let mut students = vec![];
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM students WHERE name = $1 ORDER BY id";
            let mut rows = sqlx::query(query_str).bind(name).fetch(&mut **ex);
            while let Some(row) = rows.try_next().await.map_err(postgres::map_sqlx_error)? {
                students.push(Student::try_from(row)?);
            }
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM students WHERE name = ? ORDER BY id";
            let mut rows = sqlx::query(query_str).bind(name).fetch(&mut **ex);
            while let Some(row) = rows.try_next().await.map_err(sqlite::map_sqlx_error)? {
                students.push(Student::try_from(row)?);
            }
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
    Ok(students)
}

/// Gets the page described by `request` of all students in `grade`.
///
/// This issues two queries, so the caller should run it inside a transaction for the total
/// count to match the returned content.
pub(crate) async fn get_students_by_grade(
    ex: &mut Executor,
    grade: i32,
    request: &PageRequest<StudentSortKey>,
) -> DbResult<Page<Student>> {
    let limit = i64::from(*request.size());
    let offset = u64_to_i64(request.offset())?;
    let order_by = format!("{} {}, id ASC", request.sort().column(), request.direction().sql());

    let mut students = vec![];
    let total = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT COUNT(*) AS count FROM students WHERE grade = $1";
            let row = sqlx::query(query_str)
                .bind(grade)
                .fetch_one(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            let total: i64 = row.try_get("count").map_err(postgres::map_sqlx_error)?;

            let query_str = format!(
                "SELECT * FROM students WHERE grade = $1 ORDER BY {} LIMIT $2 OFFSET $3",
                order_by
            );
            let mut rows =
                sqlx::query(&query_str).bind(grade).bind(limit).bind(offset).fetch(&mut **ex);
            while let Some(row) = rows.try_next().await.map_err(postgres::map_sqlx_error)? {
                students.push(Student::try_from(row)?);
            }
            total
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT COUNT(*) AS count FROM students WHERE grade = ?";
            let row = sqlx::query(query_str)
                .bind(grade)
                .fetch_one(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            let total: i64 = row.try_get("count").map_err(sqlite::map_sqlx_error)?;

            let query_str = format!(
                "SELECT * FROM students WHERE grade = ? ORDER BY {} LIMIT ? OFFSET ?",
                order_by
            );
            let mut rows =
                sqlx::query(&query_str).bind(grade).bind(limit).bind(offset).fetch(&mut **ex);
            while let Some(row) = rows.try_next().await.map_err(sqlite::map_sqlx_error)? {
                students.push(Student::try_from(row)?);
            }
            total
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    Ok(Page::new(students, count_to_u64(total)?, request))
}
