//! Customer postal address

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::audit::AuditFields;

/// Postal address owned one-to-one by a customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub street: String,
    pub number: String,
    #[serde(default)]
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub country: String,
    /// Eight digit postal code
    pub zip_code: String,
    #[serde(flatten)]
    pub audit: AuditFields,
}

/// Address fields supplied by a client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressInput {
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
}

impl Address {
    /// Build a new address for `customer_id`
    pub fn from_input(customer_id: Uuid, input: AddressInput, actor: &str) -> Self {
        Self {
            id: Uuid::now_v7(),
            customer_id,
            street: input.street.trim().to_string(),
            number: input.number.trim().to_string(),
            complement: input
                .complement
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            neighborhood: input.neighborhood.trim().to_string(),
            city: input.city.trim().to_string(),
            state: input.state.trim().to_string(),
            country: input.country.trim().to_string(),
            zip_code: input.zip_code.trim().to_string(),
            audit: AuditFields::created_by(actor),
        }
    }

    /// Overwrite the postal fields, keeping id and creation data
    pub fn apply(&mut self, input: AddressInput, actor: &str) {
        let id = self.id;
        let customer_id = self.customer_id;
        let mut audit = self.audit.clone();
        audit.touch(actor);

        *self = Self {
            id,
            customer_id,
            audit,
            ..Self::from_input(customer_id, input, actor)
        };
    }
}
