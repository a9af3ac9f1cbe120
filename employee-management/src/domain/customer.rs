//! Customer aggregate

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::address::Address;
use super::audit::AuditFields;
use crate::repository::{Entity, FieldDef, FieldKind, FilterValue};

static CUSTOMER_FIELDS: &[FieldDef] = &[
    FieldDef::new("id", "id", FieldKind::Uuid, true),
    FieldDef::new("fullName", "full_name", FieldKind::Text, true),
    FieldDef::new("email", "email", FieldKind::Text, true),
    FieldDef::new("documentNumber", "document_number", FieldKind::Text, true),
    FieldDef::new("gender", "gender", FieldKind::Text, true),
    FieldDef::new("birthDate", "birth_date", FieldKind::Date, true),
    FieldDef::new("phone", "phone", FieldKind::Text, true),
    FieldDef::new("favoriteSport", "favorite_sport", FieldKind::Text, true),
    FieldDef::new("favoriteClub", "favorite_club", FieldKind::Text, true),
    FieldDef::new("isActive", "is_active", FieldKind::Boolean, true),
    FieldDef::new("isDeleted", "is_deleted", FieldKind::Boolean, false),
    FieldDef::new("status", "status", FieldKind::Integer, true),
    FieldDef::new("createdAt", "created_at", FieldKind::DateTime, true),
    FieldDef::new("updatedAt", "updated_at", FieldKind::DateTime, true),
    FieldDef::new("deletedAt", "deleted_at", FieldKind::DateTime, false),
];

/// A customer with an optional postal address and consent flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    /// CPF or CNPJ, digits only
    pub document_number: String,
    #[serde(default)]
    pub gender: String,
    pub birth_date: NaiveDate,
    pub phone: String,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub favorite_sport: Option<String>,
    #[serde(default)]
    pub favorite_club: Option<String>,
    pub accept_terms_use: bool,
    pub accept_privacy_policy: bool,
    #[serde(flatten)]
    pub audit: AuditFields,
}

impl Entity for Customer {
    const ENTITY_NAME: &'static str = "Customer";

    fn id(&self) -> Uuid {
        self.id
    }

    fn fields() -> &'static [FieldDef] {
        CUSTOMER_FIELDS
    }

    fn field_value(&self, column: &str) -> FilterValue {
        match column {
            "id" => self.id.into(),
            "full_name" => self.full_name.clone().into(),
            "email" => self.email.clone().into(),
            "document_number" => self.document_number.clone().into(),
            "gender" => self.gender.clone().into(),
            "birth_date" => self.birth_date.into(),
            "phone" => self.phone.clone().into(),
            "favorite_sport" => self.favorite_sport.clone().into(),
            "favorite_club" => self.favorite_club.clone().into(),
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
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn customer(full_name: &str, email: &str) -> Customer {
        Customer {
            id: Uuid::now_v7(),
            full_name: full_name.into(),
            email: email.into(),
            document_number: "52998224725".into(),
            gender: "F".into(),
            birth_date: NaiveDate::from_ymd_opt(1985, 3, 2).unwrap(),
            phone: "11987654321".into(),
            address: None,
            favorite_sport: Some("Volleyball".into()),
            favorite_club: None,
            accept_terms_use: true,
            accept_privacy_policy: true,
            audit: AuditFields::default(),
        }
    }
}
