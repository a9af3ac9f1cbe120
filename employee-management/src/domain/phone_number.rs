//! Employee phone numbers

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::audit::AuditFields;

/// Phone type recorded when the caller leaves it blank
pub const DEFAULT_PHONE_TYPE: &str = "Mobile";

/// A phone number owned by an employee
///
/// `employee_id` is a back-reference; the employee's `phone_numbers` list
/// owns the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumber {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub number: String,
    /// Free text, e.g. "Mobile" or "Home"
    #[serde(rename = "type")]
    pub phone_type: String,
    #[serde(flatten)]
    pub audit: AuditFields,
}

impl PhoneNumber {
    /// New phone for `employee_id` with a fresh id
    pub fn new(
        employee_id: Uuid,
        number: impl Into<String>,
        phone_type: Option<String>,
        actor: &str,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            employee_id,
            number: number.into().trim().to_string(),
            phone_type: phone_type
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_PHONE_TYPE.to_string()),
            audit: AuditFields::created_by(actor),
        }
    }
}
