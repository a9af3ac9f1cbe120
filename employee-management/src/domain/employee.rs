//! Employee aggregate

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::audit::AuditFields;
use super::document::normalize_digits;
use super::phone_number::PhoneNumber;
use super::role::EmployeeRole;
use crate::repository::{Entity, FieldDef, FieldKind, FilterValue, UniqueKey};

/// Unique index over employee emails
pub const EMPLOYEE_EMAIL_INDEX: &str = "ix_employees_email";

/// Unique index over digits-only employee documents
pub const EMPLOYEE_DOCUMENT_INDEX: &str = "ix_employees_document";

/// Minimum number of phone numbers an employee must carry
pub const MIN_PHONE_NUMBERS: usize = 2;

static EMPLOYEE_FIELDS: &[FieldDef] = &[
    FieldDef::new("id", "id", FieldKind::Uuid, true),
    FieldDef::new("firstName", "first_name", FieldKind::Text, true),
    FieldDef::new("lastName", "last_name", FieldKind::Text, true),
    FieldDef::new("email", "email", FieldKind::Text, true),
    FieldDef::new("document", "document", FieldKind::Text, true),
    FieldDef::new("birthDate", "birth_date", FieldKind::Date, true),
    FieldDef::new("role", "role", FieldKind::Integer, true),
    FieldDef::new("isActive", "is_active", FieldKind::Boolean, true),
    FieldDef::new("isDeleted", "is_deleted", FieldKind::Boolean, false),
    FieldDef::new("status", "status", FieldKind::Integer, true),
    FieldDef::new("createdAt", "created_at", FieldKind::DateTime, true),
    FieldDef::new("updatedAt", "updated_at", FieldKind::DateTime, true),
    FieldDef::new("deletedAt", "deleted_at", FieldKind::DateTime, false),
];

/// An employee with login credentials and at least two phone numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Government document, digits only
    pub document: String,
    pub birth_date: NaiveDate,
    pub role: EmployeeRole,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    #[serde(default)]
    pub phone_numbers: Vec<PhoneNumber>,
    #[serde(flatten)]
    pub audit: AuditFields,
}

impl Employee {
    /// "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether the employee may sign in
    pub fn can_sign_in(&self) -> bool {
        self.audit.is_active && !self.audit.is_deleted
    }
}

impl Entity for Employee {
    const ENTITY_NAME: &'static str = "Employee";

    fn id(&self) -> Uuid {
        self.id
    }

    fn fields() -> &'static [FieldDef] {
        EMPLOYEE_FIELDS
    }

    fn field_value(&self, column: &str) -> FilterValue {
        match column {
            "id" => self.id.into(),
            "first_name" => self.first_name.clone().into(),
            "last_name" => self.last_name.clone().into(),
            "email" => self.email.clone().into(),
            "document" => self.document.clone().into(),
            "birth_date" => self.birth_date.into(),
            "role" => self.role.code().into(),
            "is_active" => self.audit.is_active.into(),
            "is_deleted" => self.audit.is_deleted.into(),
            "status" => self.audit.status.code().into(),
            "created_at" => self.audit.created_at.into(),
            "updated_at" => self.audit.updated_at.into(),
            "deleted_at" => self.audit.deleted_at.into(),
            _ => FilterValue::Null,
        }
    }

    fn audit(&self) -> &AuditFields {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut AuditFields {
        &mut self.audit
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![
            UniqueKey::new(EMPLOYEE_EMAIL_INDEX, self.email.to_lowercase()),
            UniqueKey::new(EMPLOYEE_DOCUMENT_INDEX, normalize_digits(&self.document)),
        ]
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Employee with two phones and the given email and document
    pub fn employee(email: &str, document: &str) -> Employee {
        let id = Uuid::now_v7();
        Employee {
            id,
            first_name: "Ana".into(),
            last_name: "Souza".into(),
            email: email.into(),
            document: document.into(),
            birth_date: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
            role: EmployeeRole::Analyst,
            password_hash: String::new(),
            phone_numbers: vec![
                PhoneNumber::new(id, "11987654321", None, "System"),
                PhoneNumber::new(id, "1133334444", Some("Home".into()), "System"),
            ],
            audit: AuditFields::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::employee;
    use super::*;

    #[test]
    fn test_full_name() {
        let e = employee("ana@example.com", "12345678909");
        assert_eq!(e.full_name(), "Ana Souza");
    }

    #[test]
    fn test_password_hash_is_never_serialized() {
        let mut e = employee("ana@example.com", "12345678909");
        e.password_hash = "$argon2id$secret".into();
        let json = serde_json::to_value(&e).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["firstName"], "Ana");
        assert_eq!(json["role"], "Analyst");
        assert_eq!(json["isDeleted"], false);
        assert_eq!(json["phoneNumbers"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_field_values() {
        let e = employee("ana@example.com", "12345678909");
        assert_eq!(
            e.field_value("first_name"),
            FilterValue::String("Ana".into())
        );
        assert_eq!(e.field_value("role"), FilterValue::Integer(3));
        assert_eq!(e.field_value("deleted_at"), FilterValue::Null);
        assert_eq!(e.field_value("salary"), FilterValue::Null);
    }

    #[test]
    fn test_field_lookup() {
        assert_eq!(Employee::field("FirstName").map(|f| f.column), Some("first_name"));
        assert_eq!(Employee::field("birth_date").map(|f| f.name), Some("birthDate"));
        assert!(Employee::field("passwordHash").is_none());
    }

    #[test]
    fn test_unique_keys_are_normalized() {
        let e = employee("Ana@Example.com", "123.456.789-09");
        let keys = e.unique_keys();
        assert!(keys.contains(&UniqueKey::new(EMPLOYEE_EMAIL_INDEX, "ana@example.com")));
        assert!(keys.contains(&UniqueKey::new(EMPLOYEE_DOCUMENT_INDEX, "12345678909")));
    }

    #[test]
    fn test_can_sign_in() {
        let mut e = employee("ana@example.com", "12345678909");
        assert!(e.can_sign_in());
        e.audit.is_active = false;
        assert!(!e.can_sign_in());
        e.audit.is_active = true;
        e.audit.is_deleted = true;
        assert!(!e.can_sign_in());
    }
}
