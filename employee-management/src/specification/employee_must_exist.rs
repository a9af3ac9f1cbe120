use uuid::Uuid;

use super::Specification;
use crate::domain::{DomainError, Employee};
use crate::error::Result;
use crate::repository::ReadRepository;

/// The id must name a live (not soft-deleted) employee
pub struct EmployeeMustExist<'a, R> {
    repository: &'a R,
}

impl<'a, R> EmployeeMustExist<'a, R> {
    pub fn new(repository: &'a R) -> Self {
        Self { repository }
    }
}

impl<R: ReadRepository<Employee>> Specification<Uuid> for EmployeeMustExist<'_, R> {
    async fn is_satisfied_by(&self, id: &Uuid) -> Result<bool> {
        if id.is_nil() {
            return Err(DomainError::EmployeeNotFound(*id).into());
        }

        match self.repository.get_by_id(*id).await? {
            Some(employee) if !employee.audit.is_deleted => Ok(true),
            _ => Err(DomainError::EmployeeNotFound(*id).into()),
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
    async fn test_existing_employee_passes() {
        let repo = InMemoryRepository::new();
        let e = employee("a@x.com", "12345678909");
        repo.add(&e).await.unwrap();

        assert!(EmployeeMustExist::new(&repo).is_satisfied_by(&e.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_nil_id_fails_without_lookup() {
        let repo: InMemoryRepository<Employee> = InMemoryRepository::new();
        repo.set_offline(true);

        let err = EmployeeMustExist::new(&repo)
            .is_satisfied_by(&Uuid::nil())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Domain(DomainError::EmployeeNotFound(_))));
    }

    #[tokio::test]
    async fn test_unknown_and_deleted_employees_fail() {
        let repo = InMemoryRepository::new();
        let e = employee("a@x.com", "12345678909");
        repo.add(&e).await.unwrap();
        repo.delete(&e).await.unwrap();

        let spec = EmployeeMustExist::new(&repo);
        for id in [e.id, Uuid::new_v4()] {
            let err = spec.is_satisfied_by(&id).await.unwrap_err();
            assert!(matches!(err, Error::Domain(DomainError::EmployeeNotFound(missing)) if missing == id));
        }
    }

    #[tokio::test]
    async fn test_repository_failure_propagates() {
        let repo: InMemoryRepository<Employee> = InMemoryRepository::new();
        repo.set_offline(true);
        let err = EmployeeMustExist::new(&repo)
            .is_satisfied_by(&Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Repository(_)));
    }
}
