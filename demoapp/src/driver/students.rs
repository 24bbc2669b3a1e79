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

//! Operations on students.

use crate::db;
use crate::driver::Driver;
use crate::model::*;
use demoapp_core::driver::DriverResult;

impl Driver {
    /// Saves `student`, assigning a new identifier when `id` is missing and replacing any existing
    /// student with the same `id` otherwise.
    pub(crate) async fn save_student(
        self,
        id: Option<StudentId>,
        student: &NewStudent,
    ) -> DriverResult<Student> {
        let student = db::put_student(&mut self.db.ex().await?, id, student).await?;
        Ok(student)
    }

    /// Gets the student with the given `id`, if any.
    pub(crate) async fn get_student_by_id(self, id: &StudentId) -> DriverResult<Option<Student>> {
        let student = db::get_student_by_id(&mut self.db.ex().await?, id).await?;
        Ok(student)
    }

    /// Gets all students whose name is exactly `name`.
    pub(crate) async fn get_students_by_name(self, name: &str) -> DriverResult<Vec<Student>> {
        let students = db::get_students_by_name(&mut self.db.ex().await?, name).await?;
        Ok(students)
    }

    /// Gets one page of the students in `grade`.
    pub(crate) async fn get_students_by_grade(
        self,
        grade: i32,
        request: &PageRequest<StudentSortKey>,
    ) -> DriverResult<Page<Student>> {
        let mut tx = self.db.begin().await?;
        let page = db::get_students_by_grade(tx.ex(), grade, request).await?;
        tx.commit().await?;
        Ok(page)
    }
}
