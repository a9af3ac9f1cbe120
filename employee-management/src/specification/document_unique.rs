use uuid::Uuid;

use super::Specification;
use crate::domain::{normalize_digits, DomainError, Employee};
use crate::error::Result;
use crate::repository::{Filter, FilterCondition, ReadRepository};

/// No other employee may own the candidate's document
///
/// Documents compare digits-only, so "123.456.789-09" and "12345678909" collide.
/// Stored documents are always digits-only.
pub struct EmployeeDocumentMustBeUnique<'a, R> {
    repository: &'a R,
    exclude_id: Option<Uuid>,
}

impl<'a, R> EmployeeDocumentMustBeUnique<'a, R> {
    pub fn new(repository: &'a R, exclude_id: Option<Uuid>) -> Self {
        Self {
            repository,
            exclude_id,
        }
    }
}

impl<R: ReadRepository<Employee>> Specification<Employee>
    for EmployeeDocumentMustBeUnique<'_, R>
{
    async fn is_satisfied_by(&self, candidate: &Employee) -> Result<bool> {
        let document = normalize_digits(&candidate.document);
        if document.is_empty() {
            return Ok(true);
        }

        let filter = Filter::new().and(FilterCondition::eq("document", document.as_str()));
        let matches = self.repository.find(&filter).await?;

        let conflict = matches
            .into_iter()
            .find(|existing| Some(existing.id) != self.exclude_id);

        match conflict {
            Some(existing) => Err(DomainError::EmployeeDocumentAlreadyExists {
                document,
                existing_id: existing.id,
            }
            .into()),
            None => Ok(true),
        }
    }
}
