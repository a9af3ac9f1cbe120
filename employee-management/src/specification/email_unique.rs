use uuid::Uuid;

use super::Specification;
use crate::domain::{DomainError, Employee};
use crate::error::Result;
use crate::repository::{Filter, FilterCondition, ReadRepository};

/// No other employee may own the candidate's email
///
/// Emails compare case-insensitively. On update pass the employee's own id
/// as `exclude_id` so keeping the current email is allowed.
pub struct EmployeeEmailMustBeUnique<'a, R> {
    repository: &'a R,
    exclude_id: Option<Uuid>,
}

impl<'a, R> EmployeeEmailMustBeUnique<'a, R> {
    pub fn new(repository: &'a R, exclude_id: Option<Uuid>) -> Self {
        Self {
            repository,
            exclude_id,
        }
    }
}

impl<R: ReadRepository<Employee>> Specification<Employee> for EmployeeEmailMustBeUnique<'_, R> {
    async fn is_satisfied_by(&self, candidate: &Employee) -> Result<bool> {
        let email = candidate.email.trim().to_lowercase();
        if email.is_empty() {
            return Ok(true);
        }

        let filter = Filter::new().and(FilterCondition::eq("email", email.as_str()));
        let conflict = self
            .repository
            .find(&filter)
            .await?
            .into_iter()
            .find(|existing| Some(existing.id) != self.exclude_id);

        match conflict {
            Some(existing) => Err(DomainError::EmployeeEmailAlreadyExists {
                email,
                existing_id: existing.id,
            }
            .into()),
            None => Ok(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::employee_fixtures::employee;
    use crate::error::Error;
    use crate::repository::{InMemoryRepository, WriteRepository};

    #[tokio::test]
    async fn test_blank_email_skips_lookup() {
        let repo: InMemoryRepository<Employee> = InMemoryRepository::new();
        repo.set_offline(true);

        let candidate = employee("   ", "12345678909");
        assert!(EmployeeEmailMustBeUnique::new(&repo, None)
            .is_satisfied_by(&candidate)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_email_fails_with_owner() {
        let repo = InMemoryRepository::new();
        let owner = employee("a@x.com", "12345678909");
        repo.add(&owner).await.unwrap();

        let candidate = employee("a@x.com", "52998224725");
        let err = EmployeeEmailMustBeUnique::new(&repo, None)
            .is_satisfied_by(&candidate)
            .await
            .unwrap_err();

        match err {
            Error::Domain(DomainError::EmployeeEmailAlreadyExists { email, existing_id }) => {
                assert_eq!(email, "a@x.com");
                assert_eq!(existing_id, owner.id);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_own_email_is_allowed_on_update() {
        let repo = InMemoryRepository::new();
        let owner = employee("a@x.com", "12345678909");
        repo.add(&owner).await.unwrap();

        assert!(EmployeeEmailMustBeUnique::new(&repo, Some(owner.id))
            .is_satisfied_by(&owner)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_unused_email_passes() {
        let repo = InMemoryRepository::new();
        repo.add(&employee("a@x.com", "12345678909")).await.unwrap();

        let candidate = employee("b@x.com", "52998224725");
        assert!(EmployeeEmailMustBeUnique::new(&repo, None)
            .is_satisfied_by(&candidate)
            .await
            .unwrap());
    }
}
