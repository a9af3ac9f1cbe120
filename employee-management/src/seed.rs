//! Master account seeding

use chrono::NaiveDate;
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::PasswordHasher;
use crate::config::SeedConfig;
use crate::domain::{AuditFields, DataStatus, DomainError, Employee, EmployeeRole, SYSTEM_ACTOR};
use crate::error::Result;
use crate::repository::{Filter, FilterCondition, ReadRepository, WriteRepository};

/// Create the Director account named by `seed` unless its email is taken
///
/// Returns whether an account was created. The record is written directly,
/// without request validation, so the placeholder document and the missing
/// phone numbers are accepted.
pub async fn seed_master_account<R>(
    repo: &R,
    hasher: &PasswordHasher,
    seed: &SeedConfig,
) -> Result<bool>
where
    R: ReadRepository<Employee> + WriteRepository<Employee>,
{
    let email = seed.email.trim().to_lowercase();
    let existing = repo
        .find(&Filter::new().and(FilterCondition::eq("email", email.as_str())))
        .await?;
    if !existing.is_empty() {
        info!(email = %email, "Master account already exists");
        return Ok(false);
    }

    let mut audit = AuditFields::created_by(SYSTEM_ACTOR);
    audit.status = DataStatus::Active;
    let master = Employee {
        id: Uuid::now_v7(),
        first_name: seed.first_name.clone(),
        last_name: seed.last_name.clone(),
        email,
        document: seed.document.clone(),
        birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap_or_default(),
        role: EmployeeRole::Director,
        password_hash: hasher.hash(&seed.password)?,
        phone_numbers: Vec::new(),
        audit,
    };

    if repo.add(&master).await? {
        info!(email = %master.email, employee_id = %master.id, "Master account created");
        Ok(true)
    } else {
        Err(DomainError::EmployeeOperation {
            operation: "seed".to_string(),
            reason: "no rows were affected".to_string(),
        }
        .into())
    }
}

/// Seed when enabled, logging instead of failing
///
/// A broken seed must not keep the service from starting.
pub async fn run<R>(repo: &R, hasher: &PasswordHasher, seed: &SeedConfig)
where
    R: ReadRepository<Employee> + WriteRepository<Employee>,
{
    if !seed.enabled {
        info!("Master account seeding disabled");
        return;
    }

    if let Err(e) = seed_master_account(repo, hasher, seed).await {
        error!(email = %seed.email, "Failed to seed master account: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::PasswordConfig;
    use crate::repository::InMemoryRepository;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(&PasswordConfig {
            memory_cost_kib: 1024,
            time_cost: 1,
            parallelism: 1,
            min_password_length: 8,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_seed_creates_director_once() {
        let repo = InMemoryRepository::new();
        let hasher = hasher();
        let seed = SeedConfig::default();

        assert!(seed_master_account(&repo, &hasher, &seed).await.unwrap());
        assert!(!seed_master_account(&repo, &hasher, &seed).await.unwrap());

        let all = repo.find(&Filter::new()).await.unwrap();
        assert_eq!(all.len(), 1);
        let master = &all[0];
        assert_eq!(master.role, EmployeeRole::Director);
        assert_eq!(master.full_name(), "Admin Master");
        assert_eq!(master.audit.status, DataStatus::Active);
        assert!(hasher.verify("admin@123", &master.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_run_swallows_store_failures() {
        let repo: InMemoryRepository<Employee> = InMemoryRepository::new();
        repo.set_offline(true);

        run(&repo, &hasher(), &SeedConfig::default()).await;
        repo.set_offline(false);
        assert!(repo.find(&Filter::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_respects_disabled_flag() {
        let repo: InMemoryRepository<Employee> = InMemoryRepository::new();
        let seed = SeedConfig {
            enabled: false,
            ..Default::default()
        };

        run(&repo, &hasher(), &seed).await;
        assert!(repo.find(&Filter::new()).await.unwrap().is_empty());
    }
}
