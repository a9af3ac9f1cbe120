//! Pagination, ordering and filtering types for repository queries
//!
//! Queries are expressed as typed objects instead of free-form predicates:
//! a [`Filter`] is a conjunction of [`FilterCondition`]s and a [`PageRequest`]
//! carries the page window plus an optional [`SortSpec`]. Field names are
//! resolved against each entity's field table, so unknown names are rejected
//! before any backend runs the query.
//!
//! # Example
//!
//! ```rust
//! use employee_management::repository::{Filter, FilterCondition, OrderDirection, PageRequest};
//!
//! let filter = Filter::new()
//!     .and(FilterCondition::eq("isDeleted", false))
//!     .and(FilterCondition::contains("firstName", "ana"));
//!
//! let page = PageRequest::new(2, 20).sorted_by("lastName", OrderDirection::from_param("DESC"));
//! assert_eq!(page.pagination().offset, 20);
//! assert_eq!(filter.conditions().len(), 2);
//! ```

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::entity::Entity;
use super::error::{RepositoryError, RepositoryOperation};
use super::traits::RepositoryResult;

/// Page used when the caller asks for page zero or below
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the caller asks for zero or fewer items
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Direction for ordering results
///
/// # Example
///
/// ```rust
/// use employee_management::repository::OrderDirection;
///
/// assert_eq!(format!("{}", OrderDirection::Ascending), "asc");
/// assert_eq!(OrderDirection::from_param("Desc"), OrderDirection::Descending);
/// assert_eq!(OrderDirection::from_param("down"), OrderDirection::Ascending);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    /// Sort in ascending order (A-Z, 0-9)
    #[default]
    Ascending,
    /// Sort in descending order (Z-A, 9-0)
    Descending,
}

impl OrderDirection {
    /// Parse a request parameter; only "desc" (any case) sorts descending
    pub fn from_param(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("desc") {
            Self::Descending
        } else {
            Self::Ascending
        }
    }

    /// SQL keyword for the direction
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// Offset and limit derived from a page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    /// Number of results to skip
    pub offset: u64,
    /// Maximum number of results to return
    pub limit: u64,
}

impl Pagination {
    #[must_use]
    pub const fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Create pagination for a specific page number (1-indexed)
    ///
    /// # Example
    ///
    /// ```rust
    /// use employee_management::repository::Pagination;
    ///
    /// let page3 = Pagination::page(3, 20);
    /// assert_eq!(page3.offset, 40);
    /// assert_eq!(page3.limit, 20);
    ///
    /// // far past the end, never wraps
    /// assert_eq!(Pagination::page(u64::MAX, 10).offset, u64::MAX);
    /// ```
    #[must_use]
    pub const fn page(page_number: u64, page_size: u64) -> Self {
        let offset = page_number.saturating_sub(1).saturating_mul(page_size);
        Self {
            offset,
            limit: page_size,
        }
    }
}

/// Requested sort field and direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    /// Field name as exposed by the API (`firstName`) or its column (`first_name`)
    pub field: String,
    pub direction: OrderDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: OrderDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// Page window plus optional ordering
///
/// Raw values are kept as supplied; [`PageRequest::normalized`] applies the
/// defaults before a backend uses them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-indexed page number
    pub page: i64,
    /// Number of rows per page
    pub page_size: i64,
    /// Optional ordering; insertion order when absent
    pub sort: Option<SortSpec>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            sort: None,
        }
    }
}

impl PageRequest {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page,
            page_size,
            sort: None,
        }
    }

    /// Order the page by `field`
    #[must_use]
    pub fn sorted_by(mut self, field: impl Into<String>, direction: OrderDirection) -> Self {
        self.sort = Some(SortSpec::new(field, direction));
        self
    }

    /// Replace non-positive page and page size with their defaults
    ///
    /// # Example
    ///
    /// ```rust
    /// use employee_management::repository::PageRequest;
    ///
    /// let page = PageRequest::new(0, -5).normalized();
    /// assert_eq!(page.page, 1);
    /// assert_eq!(page.page_size, 10);
    /// ```
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            page: if self.page <= 0 { DEFAULT_PAGE } else { self.page },
            page_size: if self.page_size <= 0 {
                DEFAULT_PAGE_SIZE
            } else {
                self.page_size
            },
            sort: self.sort.clone(),
        }
    }

    /// Offset and limit of the normalized request
    pub fn pagination(&self) -> Pagination {
        let normalized = self.normalized();
        Pagination::page(normalized.page.unsigned_abs(), normalized.page_size.unsigned_abs())
    }
}

/// Comparison operators for filter conditions
///
/// ```rust
/// use employee_management::repository::FilterOperator;
///
/// assert_eq!(format!("{}", FilterOperator::Equal), "=");
/// assert_eq!(format!("{}", FilterOperator::Contains), "CONTAINS");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    /// Case-insensitive substring match
    Contains,
    /// Value is in a list
    In,
    IsNull,
    IsNotNull,
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "="),
            Self::NotEqual => write!(f, "!="),
            Self::GreaterThan => write!(f, ">"),
            Self::GreaterThanOrEqual => write!(f, ">="),
            Self::LessThan => write!(f, "<"),
            Self::LessThanOrEqual => write!(f, "<="),
            Self::Contains => write!(f, "CONTAINS"),
            Self::In => write!(f, "IN"),
            Self::IsNull => write!(f, "IS NULL"),
            Self::IsNotNull => write!(f, "IS NOT NULL"),
        }
    }
}

/// A value used in filter conditions and read from entity fields
///
/// ```rust
/// use employee_management::repository::FilterValue;
///
/// let string_val: FilterValue = "active".into();
/// let int_val: FilterValue = 42_i64.into();
/// let bool_val: FilterValue = true.into();
/// assert_eq!(bool_val, FilterValue::Boolean(true));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Uuid(Uuid),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    /// List of strings (for IN)
    StringList(Vec<String>),
    /// List of integers (for IN)
    IntegerList(Vec<i64>),
    Null,
}

impl FilterValue {
    /// Compare two scalar values of compatible types
    ///
    /// `Null` sorts before everything else; incompatible types yield `None`.
    pub fn compare(&self, other: &FilterValue) -> Option<Ordering> {
        use FilterValue as V;
        match (self, other) {
            (V::Null, V::Null) => Some(Ordering::Equal),
            (V::Null, _) => Some(Ordering::Less),
            (_, V::Null) => Some(Ordering::Greater),
            (V::String(a), V::String(b)) => Some(a.cmp(b)),
            (V::Integer(a), V::Integer(b)) => Some(a.cmp(b)),
            (V::Float(a), V::Float(b)) => a.partial_cmp(b),
            (V::Integer(a), V::Float(b)) => (*a as f64).partial_cmp(b),
            (V::Float(a), V::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (V::Boolean(a), V::Boolean(b)) => Some(a.cmp(b)),
            (V::Uuid(a), V::Uuid(b)) => Some(a.cmp(b)),
            (V::Date(a), V::Date(b)) => Some(a.cmp(b)),
            (V::DateTime(a), V::DateTime(b)) => Some(a.cmp(b)),
            (V::DateTime(a), V::Date(b)) => Some(a.date_naive().cmp(b)),
            (V::Date(a), V::DateTime(b)) => Some(a.cmp(&b.date_naive())),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for FilterValue {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<i16> for FilterValue {
    fn from(n: i16) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<f64> for FilterValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<Uuid> for FilterValue {
    fn from(id: Uuid) -> Self {
        Self::Uuid(id)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(at: DateTime<Utc>) -> Self {
        Self::DateTime(at)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(list: Vec<String>) -> Self {
        Self::StringList(list)
    }
}

impl From<Vec<i64>> for FilterValue {
    fn from(list: Vec<i64>) -> Self {
        Self::IntegerList(list)
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// A single filter condition
///
/// ```rust
/// use employee_management::repository::{FilterCondition, FilterValue};
///
/// let active = FilterCondition::eq("isActive", true);
/// assert!(active.matches(&FilterValue::Boolean(true)));
///
/// let name = FilterCondition::contains("firstName", "ANA");
/// assert!(name.matches(&FilterValue::String("Mariana".into())));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCondition {
    /// The field name to filter on
    pub field: String,
    pub operator: FilterOperator,
    /// The value to compare against
    pub value: FilterValue,
}

impl FilterCondition {
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Equality filter (field = value)
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::Equal, value.into())
    }

    /// Not-equal filter (field != value)
    pub fn ne(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::NotEqual, value.into())
    }

    pub fn gt(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::GreaterThan, value.into())
    }

    pub fn gte(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::GreaterThanOrEqual, value.into())
    }

    pub fn lt(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::LessThan, value.into())
    }

    pub fn lte(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::LessThanOrEqual, value.into())
    }

    /// Case-insensitive substring filter
    pub fn contains(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::new(
            field,
            FilterOperator::Contains,
            FilterValue::String(needle.into()),
        )
    }

    /// IN list filter for strings
    pub fn in_strings(field: impl Into<String>, values: Vec<String>) -> Self {
        Self::new(field, FilterOperator::In, FilterValue::StringList(values))
    }

    /// IN list filter for integers
    pub fn in_integers(field: impl Into<String>, values: Vec<i64>) -> Self {
        Self::new(field, FilterOperator::In, FilterValue::IntegerList(values))
    }

    pub fn is_null(field: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::IsNull, FilterValue::Null)
    }

    pub fn is_not_null(field: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::IsNotNull, FilterValue::Null)
    }

    /// Evaluate the condition against a field value
    pub fn matches(&self, actual: &FilterValue) -> bool {
        match self.operator {
            FilterOperator::IsNull => actual.is_null(),
            FilterOperator::IsNotNull => !actual.is_null(),
            FilterOperator::Equal => actual.compare(&self.value) == Some(Ordering::Equal),
            FilterOperator::NotEqual => actual.compare(&self.value) != Some(Ordering::Equal),
            FilterOperator::GreaterThan => {
                !actual.is_null() && actual.compare(&self.value) == Some(Ordering::Greater)
            }
            FilterOperator::GreaterThanOrEqual => {
                !actual.is_null()
                    && matches!(
                        actual.compare(&self.value),
                        Some(Ordering::Greater | Ordering::Equal)
                    )
            }
            FilterOperator::LessThan => {
                !actual.is_null() && actual.compare(&self.value) == Some(Ordering::Less)
            }
            FilterOperator::LessThanOrEqual => {
                !actual.is_null()
                    && matches!(
                        actual.compare(&self.value),
                        Some(Ordering::Less | Ordering::Equal)
                    )
            }
            FilterOperator::Contains => match (actual, &self.value) {
                (FilterValue::String(haystack), FilterValue::String(needle)) => haystack
                    .to_lowercase()
                    .contains(&needle.to_lowercase()),
                _ => false,
            },
            FilterOperator::In => match (actual, &self.value) {
                (FilterValue::String(v), FilterValue::StringList(list)) => list.contains(v),
                (FilterValue::Integer(v), FilterValue::IntegerList(list)) => list.contains(v),
                _ => false,
            },
        }
    }
}

/// Conjunction of filter conditions
///
/// An empty filter matches every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<FilterCondition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition
    #[must_use]
    pub fn and(mut self, condition: FilterCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Add a condition only when one is given
    ///
    /// Convenient for optional request parameters.
    #[must_use]
    pub fn and_maybe(self, condition: Option<FilterCondition>) -> Self {
        match condition {
            Some(condition) => self.and(condition),
            None => self,
        }
    }

    pub fn conditions(&self) -> &[FilterCondition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Reject conditions naming a field the entity does not publish
    pub fn validate<E: Entity>(&self, operation: RepositoryOperation) -> RepositoryResult<()> {
        for condition in &self.conditions {
            if E::field(&condition.field).is_none() {
                return Err(RepositoryError::validation_failed(
                    operation,
                    format!("Unknown filter field: {}", condition.field),
                )
                .for_entity(E::ENTITY_NAME));
            }
        }
        Ok(())
    }

    /// Evaluate every condition against an entity
    ///
    /// Unknown fields never match; call [`Filter::validate`] first to report them.
    pub fn matches<E: Entity>(&self, entity: &E) -> bool {
        self.conditions.iter().all(|condition| {
            E::field(&condition.field)
                .map(|def| condition.matches(&entity.field_value(def.column)))
                .unwrap_or(false)
        })
    }
}

impl From<Vec<FilterCondition>> for Filter {
    fn from(conditions: Vec<FilterCondition>) -> Self {
        Self { conditions }
    }
}
