//! Entity metadata used by the generic repositories
//!
//! Each persisted type publishes a static field table. Filters and sort specs
//! are resolved against it, which keeps query composition typed and limits
//! ordering to whitelisted columns.

use uuid::Uuid;

use super::error::{RepositoryError, RepositoryOperation};
use super::pagination::{FilterValue, SortSpec};
use super::traits::RepositoryResult;
use crate::domain::AuditFields;

/// Storage type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Boolean,
    Uuid,
    Date,
    DateTime,
}

/// One queryable field of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Name used by the API (`firstName`)
    pub name: &'static str,
    /// Column name in the relational store (`first_name`)
    pub column: &'static str,
    pub kind: FieldKind,
    /// Whether the field may be used for ordering
    pub sortable: bool,
}

impl FieldDef {
    pub const fn new(
        name: &'static str,
        column: &'static str,
        kind: FieldKind,
        sortable: bool,
    ) -> Self {
        Self {
            name,
            column,
            kind,
            sortable,
        }
    }

    /// Case-insensitive match on the API name or the column name
    pub fn matches(&self, requested: &str) -> bool {
        let requested = requested.trim();
        self.name.eq_ignore_ascii_case(requested) || self.column.eq_ignore_ascii_case(requested)
    }
}

/// Value of a unique index held by an entity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UniqueKey {
    /// Index name, matching the database constraint
    pub constraint: &'static str,
    pub value: String,
}

impl UniqueKey {
    pub fn new(constraint: &'static str, value: impl Into<String>) -> Self {
        Self {
            constraint,
            value: value.into(),
        }
    }
}

/// A persisted record the generic repositories can store and query
pub trait Entity: Clone + Send + Sync + 'static {
    /// Name used in errors and logs
    const ENTITY_NAME: &'static str;

    fn id(&self) -> Uuid;

    /// Queryable fields, in declaration order
    fn fields() -> &'static [FieldDef];

    /// Current value of the field stored in `column`
    ///
    /// Returns `FilterValue::Null` for unknown columns.
    fn field_value(&self, column: &str) -> FilterValue;

    fn audit(&self) -> &AuditFields;

    fn audit_mut(&mut self) -> &mut AuditFields;

    /// Values that must be unique across all stored rows
    fn unique_keys(&self) -> Vec<UniqueKey> {
        Vec::new()
    }

    /// Resolve a requested field name
    fn field(name: &str) -> Option<&'static FieldDef> {
        Self::fields().iter().find(|def| def.matches(name))
    }

    /// Resolve a sort spec to a sortable field
    ///
    /// Unknown or non-sortable fields are rejected rather than ignored.
    fn sort_field(sort: &SortSpec) -> RepositoryResult<&'static FieldDef> {
        Self::field(&sort.field)
            .filter(|def| def.sortable)
            .ok_or_else(|| {
                RepositoryError::validation_failed(
                    RepositoryOperation::FindWithPagination,
                    format!("Unknown sort field: {}", sort.field),
                )
                .for_entity(Self::ENTITY_NAME)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_def_matches_name_and_column() {
        let def = FieldDef::new("firstName", "first_name", FieldKind::Text, true);
        assert!(def.matches("firstName"));
        assert!(def.matches("FirstName"));
        assert!(def.matches("FIRST_NAME"));
        assert!(def.matches(" firstname "));
        assert!(!def.matches("first"));
    }

    #[test]
    fn test_unique_key() {
        let key = UniqueKey::new("ix_employees_email", "a@x.com");
        assert_eq!(key.constraint, "ix_employees_email");
        assert_eq!(key.value, "a@x.com");
    }
}
