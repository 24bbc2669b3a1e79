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

//! High-level data types.

use demoapp_core::model::{ModelError, ModelResult};
use derive_getters::Getters;
use derive_more::{AsRef, Constructor, Display};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of elements that can be requested in a single page.
pub(crate) const MAX_PAGE_SIZE: u32 = 2000;

/// Number of elements in a page when the request does not specify one.
pub(crate) const DEFAULT_PAGE_SIZE: u32 = 5;

/// Collects the names of the fields that failed validation for an entity.
struct Validator {
    /// Name of the entity being validated, used in the error message.
    entity: &'static str,

    /// Descriptions of each failed check.
    errors: Vec<String>,
}

impl Validator {
    /// Starts validating an `entity`.
    fn new(entity: &'static str) -> Self {
        Self { entity, errors: vec![] }
    }

    /// Records a failure with `message` if `ok` is false.
    fn check(&mut self, ok: bool, message: &str) {
        if !ok {
            self.errors.push(message.to_owned());
        }
    }

    /// Finishes validation, returning an error that lists every failed check.
    fn finish(self) -> ModelResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ModelError(format!("Invalid {}: {}", self.entity, self.errors.join("; "))))
        }
    }
}

/// Returns true if `value` is present and has non-whitespace content.
fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Identifier of a product, assigned by the database on insertion.
#[derive(Clone, Constructor, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProductId(i64);

impl ProductId {
    /// Returns the raw value of the identifier.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

/// Validated content of a product, without its identifier.
#[derive(Clone, Debug, Getters, PartialEq)]
pub struct NewProduct {
    /// Business code of the product.  Unique across all products.
    code: String,

    /// Human-readable name of the product.
    name: String,

    /// Free-form description of the product.
    description: String,

    /// Whether the product is available for sale.
    active: bool,
}

impl NewProduct {
    /// Creates a new product after validating its fields.
    pub fn new<S1, S2, S3>(code: S1, name: S2, description: S3, active: bool) -> ModelResult<Self>
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        ProductRequest {
            id: None,
            code: Some(code.into()),
            name: Some(name.into()),
            description: Some(description.into()),
            active: Some(active),
        }
        .validate()
        .map(|(_id, product)| product)
    }
}

/// A product as stored in the database.
#[derive(Clone, Debug, Deserialize, Getters, PartialEq, Serialize)]
pub struct Product {
    /// Identifier of the product.
    id: ProductId,

    /// Business code of the product.  Unique across all products.
    code: String,

    /// Human-readable name of the product.
    name: String,

    /// Free-form description of the product.
    description: String,

    /// Whether the product is available for sale.
    active: bool,
}

impl Product {
    /// Attaches an `id` to a `product` that has been stored.
    pub(crate) fn from_parts(id: ProductId, product: NewProduct) -> Self {
        Self {
            id,
            code: product.code,
            name: product.name,
            description: product.description,
            active: product.active,
        }
    }
}

/// Inbound representation of a product as received by the API.
///
/// All fields are optional so that validation can report every missing field at once.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ProductRequest {
    /// Identifier of the product to update, or none to create a new one.
    pub id: Option<ProductId>,

    /// Business code of the product.
    pub code: Option<String>,

    /// Human-readable name of the product.
    pub name: Option<String>,

    /// Free-form description of the product.  Defaults to empty.
    pub description: Option<String>,

    /// Whether the product is available for sale.  Defaults to false.
    pub active: Option<bool>,
}

impl ProductRequest {
    /// Validates the request and splits it into the optional identifier and the product content.
    pub fn validate(self) -> ModelResult<(Option<ProductId>, NewProduct)> {
        let mut validator = Validator::new("product");
        validator.check(is_present(&self.code), "code must not be blank");
        validator.check(is_present(&self.name), "name must not be blank");
        validator.finish()?;

        let product = NewProduct {
            code: self.code.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            active: self.active.unwrap_or(false),
        };
        Ok((self.id, product))
    }
}

/// Identifier of a student, assigned on insertion as a UUID in textual form.
#[derive(AsRef, Clone, Constructor, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StudentId(String);

impl StudentId {
    /// Creates a new random identifier.
    pub(crate) fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated content of a student, without its identifier.
#[derive(Clone, Debug, Getters, PartialEq)]
pub struct NewStudent {
    /// Full name of the student.
    name: String,

    /// Grade the student is in.  Never negative.
    grade: i32,
}

impl NewStudent {
    /// Creates a new student after validating its fields.
    pub fn new<S: Into<String>>(name: S, grade: i32) -> ModelResult<Self> {
        StudentRequest { id: None, name: Some(name.into()), grade: Some(grade) }
            .validate()
            .map(|(_id, student)| student)
    }
}

/// A student as stored in the database.
#[derive(Clone, Debug, Deserialize, Getters, PartialEq, Serialize)]
pub struct Student {
    /// Identifier of the student.
    id: StudentId,

    /// Full name of the student.
    name: String,

    /// Grade the student is in.
    grade: i32,
}

impl Student {
    /// Attaches an `id` to a `student` that has been stored.
    pub(crate) fn from_parts(id: StudentId, student: NewStudent) -> Self {
        Self { id, name: student.name, grade: student.grade }
    }
}

/// Inbound representation of a student as received by the API.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StudentRequest {
    /// Identifier of the student to replace, or none to create a new one.
    pub id: Option<StudentId>,

    /// Full name of the student.
    pub name: Option<String>,

    /// Grade the student is in.
    pub grade: Option<i32>,
}

impl StudentRequest {
    /// Validates the request and splits it into the optional identifier and the student content.
    pub fn validate(self) -> ModelResult<(Option<StudentId>, NewStudent)> {
        let mut validator = Validator::new("student");
        validator.check(is_present(&self.name), "name must not be blank");
        match self.grade {
            None => validator.check(false, "grade must be present"),
            Some(grade) => validator.check(grade >= 0, "grade must not be negative"),
        }
        validator.finish()?;

        let student = NewStudent {
            name: self.name.unwrap_or_default(),
            grade: self.grade.unwrap_or_default(),
        };
        Ok((self.id, student))
    }
}

/// Direction in which to sort the results of a query.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SortDirection {
    /// Smallest values first.
    #[default]
    Asc,

    /// Largest values first.
    Desc,
}

impl SortDirection {
    /// Returns the SQL keyword for this direction.
    pub(crate) fn sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Properties of an entity that queries can be sorted by.
///
/// Implementations are closed enumerations so that only known columns ever reach SQL.
pub trait SortKey: Copy + fmt::Debug + Sized {
    /// Key to use when the request does not specify one.
    const DEFAULT: Self;

    /// Parses the name of a field as exposed in the API.
    fn parse(field: &str) -> Option<Self>;

    /// Returns the database column backing this key.
    fn column(self) -> &'static str;
}

/// Properties of a product that queries can be sorted by.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProductSortKey {
    /// Sort by identifier.
    Id,

    /// Sort by business code.
    Code,

    /// Sort by name.
    Name,

    /// Sort by description.
    Description,

    /// Sort by the active flag.
    Active,
}

impl SortKey for ProductSortKey {
    const DEFAULT: Self = ProductSortKey::Name;

    fn parse(field: &str) -> Option<Self> {
        match field {
            "id" => Some(ProductSortKey::Id),
            "code" => Some(ProductSortKey::Code),
            "name" => Some(ProductSortKey::Name),
            "description" => Some(ProductSortKey::Description),
            "active" => Some(ProductSortKey::Active),
            _ => None,
        }
    }

    fn column(self) -> &'static str {
        match self {
            ProductSortKey::Id => "id",
            ProductSortKey::Code => "code",
            ProductSortKey::Name => "name",
            ProductSortKey::Description => "description",
            ProductSortKey::Active => "active",
        }
    }
}

/// Properties of a student that queries can be sorted by.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StudentSortKey {
    /// Sort by identifier.
    Id,

    /// Sort by name.
    Name,

    /// Sort by grade.
    Grade,
}

impl SortKey for StudentSortKey {
    const DEFAULT: Self = StudentSortKey::Name;

    fn parse(field: &str) -> Option<Self> {
        match field {
            "id" => Some(StudentSortKey::Id),
            "name" => Some(StudentSortKey::Name),
            "grade" => Some(StudentSortKey::Grade),
            _ => None,
        }
    }

    fn column(self) -> &'static str {
        match self {
            StudentSortKey::Id => "id",
            StudentSortKey::Name => "name",
            StudentSortKey::Grade => "grade",
        }
    }
}

/// Request for a slice of the results of a query.
#[derive(Clone, Copy, Debug, Eq, Getters, PartialEq)]
pub struct PageRequest<K: SortKey> {
    /// Zero-based index of the page to return.
    page: u32,

    /// Maximum number of elements in the page.
    size: u32,

    /// Property to sort the results by.  Ties are broken by identifier.
    sort: K,

    /// Direction of the sort.
    direction: SortDirection,
}

impl<K: SortKey> PageRequest<K> {
    /// Creates a new page request after validating its parameters.
    pub fn new(page: u32, size: u32, sort: K, direction: SortDirection) -> ModelResult<Self> {
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(ModelError(format!(
                "Page size must be between 1 and {}; got {}",
                MAX_PAGE_SIZE, size
            )));
        }
        Ok(Self { page, size, sort, direction })
    }

    /// Creates a page request from the raw parameters of an API call, applying defaults to the
    /// missing ones.
    ///
    /// `sort` has the form `field` or `field,asc|desc`.  An empty `sort` selects the default.
    pub fn from_raw(page: Option<u32>, size: Option<u32>, sort: Option<&str>) -> ModelResult<Self> {
        let (sort, direction) = match sort.filter(|raw| !raw.trim().is_empty()) {
            None => (K::DEFAULT, SortDirection::Asc),
            Some(raw) => {
                let (field, direction) = match raw.split_once(',') {
                    None => (raw, SortDirection::Asc),
                    Some((field, direction)) => {
                        let direction = match direction.trim().to_ascii_lowercase().as_str() {
                            "asc" => SortDirection::Asc,
                            "desc" => SortDirection::Desc,
                            _ => {
                                return Err(ModelError(format!(
                                    "Invalid sort direction '{}'",
                                    direction
                                )));
                            }
                        };
                        (field, direction)
                    }
                };
                match K::parse(field.trim()) {
                    Some(sort) => (sort, direction),
                    None => return Err(ModelError(format!("Unknown sort field '{}'", field))),
                }
            }
        };
        Self::new(page.unwrap_or(0), size.unwrap_or(DEFAULT_PAGE_SIZE), sort, direction)
    }

    /// Returns the number of elements to skip to reach this page.
    pub(crate) fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

impl<K: SortKey> fmt::Display for PageRequest<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "page={}, size={}, sort={}: {}",
            self.page,
            self.size,
            self.sort.column(),
            self.direction.sql()
        )
    }
}

/// A slice of the results of a query.
#[derive(Debug, Deserialize, Eq, Getters, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Elements in this page.
    content: Vec<T>,

    /// Number of elements across all pages.
    total_elements: u64,

    /// Number of pages needed to hold all elements.
    total_pages: u64,

    /// Zero-based index of this page.
    number: u32,

    /// Maximum number of elements in this page.
    size: u32,
}

impl<T> Page<T> {
    /// Creates a new page with `content` for `request`, knowing that the query produces a total
    /// of `total_elements`.
    pub(crate) fn new<K: SortKey>(
        content: Vec<T>,
        total_elements: u64,
        request: &PageRequest<K>,
    ) -> Self {
        let size = u64::from(request.size);
        Self {
            content,
            total_elements,
            total_pages: total_elements.div_ceil(size),
            number: request.page,
            size: request.size,
        }
    }

    /// Consumes the page and returns its elements.
    pub fn into_content(self) -> Vec<T> {
        self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_test::{Token, assert_tokens};

    #[test]
    fn test_product_request_ok_with_defaults() {
        let request = ProductRequest {
            code: Some("P001".to_owned()),
            name: Some("Product 1".to_owned()),
            ..Default::default()
        };
        let (id, product) = request.validate().unwrap();
        assert_eq!(None, id);
        assert_eq!("P001", product.code());
        assert_eq!("Product 1", product.name());
        assert_eq!("", product.description());
        assert!(!product.active());
    }

    #[test]
    fn test_product_request_lists_all_errors() {
        let request = ProductRequest { code: Some("  ".to_owned()), ..Default::default() };
        assert_eq!(
            ModelError("Invalid product: code must not be blank; name must not be blank".to_owned()),
            request.validate().unwrap_err()
        );
    }

    #[test]
    fn test_product_request_keeps_id() {
        let request = ProductRequest {
            id: Some(ProductId::new(42)),
            code: Some("P001".to_owned()),
            name: Some("Product 1".to_owned()),
            description: Some("Nice".to_owned()),
            active: Some(true),
        };
        let (id, product) = request.validate().unwrap();
        assert_eq!(Some(ProductId::new(42)), id);
        assert_eq!(NewProduct::new("P001", "Product 1", "Nice", true).unwrap(), product);
    }

    #[test]
    fn test_product_json_shape() {
        let product = Product::from_parts(
            ProductId::new(7),
            NewProduct::new("P007", "Product 7", "Desc", false).unwrap(),
        );
        assert_eq!(
            serde_json::json!({
                "id": 7,
                "code": "P007",
                "name": "Product 7",
                "description": "Desc",
                "active": false,
            }),
            serde_json::to_value(&product).unwrap()
        );
    }

    #[test]
    fn test_student_request_errors() {
        assert_eq!(
            ModelError("Invalid student: name must not be blank; grade must be present".to_owned()),
            StudentRequest::default().validate().unwrap_err()
        );
        assert_eq!(
            ModelError("Invalid student: grade must not be negative".to_owned()),
            NewStudent::new("Alice", -1).unwrap_err()
        );
    }

    #[test]
    fn test_student_request_ok() {
        let request = StudentRequest {
            id: Some(StudentId::new("abc".to_owned())),
            name: Some("Alice".to_owned()),
            grade: Some(0),
        };
        let (id, student) = request.validate().unwrap();
        assert_eq!(Some(StudentId::new("abc".to_owned())), id);
        assert_eq!(NewStudent::new("Alice", 0).unwrap(), student);
    }

    #[test]
    fn test_ids_ser_de() {
        assert_tokens(&ProductId::new(123), &[Token::I64(123)]);
        assert_tokens(&StudentId::new("some-id".to_owned()), &[Token::Str("some-id")]);
    }

    #[test]
    fn test_student_id_generate_is_uuid() {
        let id = StudentId::generate();
        assert_eq!(36, id.as_str().len());
        assert_ne!(id, StudentId::generate());
    }

    #[test]
    fn test_page_request_defaults() {
        let request = PageRequest::<ProductSortKey>::from_raw(None, None, None).unwrap();
        assert_eq!(
            PageRequest::new(0, DEFAULT_PAGE_SIZE, ProductSortKey::Name, SortDirection::Asc)
                .unwrap(),
            request
        );
        assert_eq!("page=0, size=5, sort=name: ASC", request.to_string());
    }

    #[test]
    fn test_page_request_empty_sort_is_default() {
        let exp_request =
            PageRequest::new(1, 3, StudentSortKey::Name, SortDirection::Asc).unwrap();
        for sort in ["", "  "] {
            let request =
                PageRequest::<StudentSortKey>::from_raw(Some(1), Some(3), Some(sort)).unwrap();
            assert_eq!(exp_request, request);
        }
    }

    #[test]
    fn test_page_request_sort_parsing() {
        let request =
            PageRequest::<StudentSortKey>::from_raw(Some(2), Some(10), Some("grade,DESC")).unwrap();
        assert_eq!(StudentSortKey::Grade, *request.sort());
        assert_eq!(SortDirection::Desc, *request.direction());
        assert_eq!(20, request.offset());

        let request = PageRequest::<StudentSortKey>::from_raw(None, None, Some("id")).unwrap();
        assert_eq!(StudentSortKey::Id, *request.sort());
        assert_eq!(SortDirection::Asc, *request.direction());
    }

    #[test]
    fn test_page_request_errors() {
        assert_eq!(
            ModelError("Unknown sort field 'grade'".to_owned()),
            PageRequest::<ProductSortKey>::from_raw(None, None, Some("grade")).unwrap_err()
        );
        assert_eq!(
            ModelError("Invalid sort direction 'up'".to_owned()),
            PageRequest::<ProductSortKey>::from_raw(None, None, Some("name,up")).unwrap_err()
        );
        assert_eq!(
            ModelError("Page size must be between 1 and 2000; got 0".to_owned()),
            PageRequest::<ProductSortKey>::from_raw(None, Some(0), None).unwrap_err()
        );
        assert!(PageRequest::<ProductSortKey>::from_raw(None, Some(2001), None).is_err());
        assert!(PageRequest::<ProductSortKey>::from_raw(None, Some(2000), None).is_ok());
    }

    #[test]
    fn test_page_arithmetic() {
        let request =
            PageRequest::new(1, 5, ProductSortKey::Name, SortDirection::Asc).unwrap();
        let page = Page::new(vec![1, 2], 7, &request);
        assert_eq!(7, *page.total_elements());
        assert_eq!(2, *page.total_pages());
        assert_eq!(1, *page.number());
        assert_eq!(5, *page.size());

        let page: Page<i32> = Page::new(vec![], 0, &request);
        assert_eq!(0, *page.total_pages());

        let page = Page::new(vec![1], 10, &request);
        assert_eq!(2, *page.total_pages());
    }

    #[test]
    fn test_page_json_shape() {
        let request = PageRequest::new(0, 5, ProductSortKey::Name, SortDirection::Asc).unwrap();
        let page = Page::new(vec!["a"], 1, &request);
        assert_eq!(
            serde_json::json!({
                "content": ["a"],
                "totalElements": 1,
                "totalPages": 1,
                "number": 0,
                "size": 5,
            }),
            serde_json::to_value(&page).unwrap()
        );
    }
}
