//! Audit and lifecycle fields shared by every persisted entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Actor recorded when no authenticated subject is available
pub const SYSTEM_ACTOR: &str = "System";

/// Lifecycle status of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DataStatus {
    /// Freshly created, not yet activated
    #[default]
    Created,
    /// In active use
    Active,
    /// Deactivated but still visible
    Inactive,
    /// Logically removed
    Deleted,
}

impl DataStatus {
    /// Stable integer code used for storage
    pub fn code(self) -> i16 {
        match self {
            Self::Created => 0,
            Self::Active => 1,
            Self::Inactive => 2,
            Self::Deleted => 3,
        }
    }

    /// Parse a stored integer code, falling back to `Created`
    pub fn from_code(code: i16) -> Self {
        match code {
            1 => Self::Active,
            2 => Self::Inactive,
            3 => Self::Deleted,
            _ => Self::Created,
        }
    }
}

impl fmt::Display for DataStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
            Self::Deleted => write!(f, "deleted"),
        }
    }
}

/// Creation, update and soft-delete bookkeeping
///
/// Serialized flattened into the owning entity, so an employee's JSON carries
/// `createdAt`, `isDeleted` and friends at the top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditFields {
    /// When the record was created (UTC)
    pub created_at: DateTime<Utc>,
    /// Who created the record
    pub created_by: String,
    /// When the record was last updated
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Who last updated the record
    #[serde(default)]
    pub updated_by: Option<String>,
    /// When the record was soft-deleted
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    /// Who soft-deleted the record
    #[serde(default)]
    pub deleted_by: Option<String>,
    /// Soft-delete marker
    #[serde(default)]
    pub is_deleted: bool,
    /// Active flag
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Lifecycle status
    #[serde(default)]
    pub status: DataStatus,
}

fn default_true() -> bool {
    true
}

impl Default for AuditFields {
    fn default() -> Self {
        Self::created_by(SYSTEM_ACTOR)
    }
}

impl AuditFields {
    /// Fresh audit block stamped with the current time
    pub fn created_by(actor: impl Into<String>) -> Self {
        Self {
            created_at: Utc::now(),
            created_by: actor.into(),
            updated_at: None,
            updated_by: None,
            deleted_at: None,
            deleted_by: None,
            is_deleted: false,
            is_active: true,
            status: DataStatus::Created,
        }
    }

    /// Record an update by `actor`
    pub fn touch(&mut self, actor: impl Into<String>) {
        self.updated_at = Some(Utc::now());
        self.updated_by = Some(actor.into());
    }

    /// Mark the record as logically deleted
    ///
    /// Keeps an already assigned `deleted_by`; otherwise records the system actor.
    pub fn mark_deleted(&mut self, at: DateTime<Utc>) {
        self.is_deleted = true;
        self.deleted_at = Some(at);
        self.status = DataStatus::Deleted;
        if self.deleted_by.is_none() {
            self.deleted_by = Some(SYSTEM_ACTOR.to_string());
        }
    }

    /// Whether default list queries should include the record
    pub fn is_visible(&self) -> bool {
        !self.is_deleted
    }
}
