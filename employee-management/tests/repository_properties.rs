//! Repository, specification and envelope properties on the in-memory store

mod common;

use common::employee;
use employee_management::domain::{DomainError, Employee};
use employee_management::error::Error;
use employee_management::repository::{
    Filter, FilterCondition, InMemoryRepository, OrderDirection, PageRequest, ReadRepository,
    WriteRepository,
};
use employee_management::response::{calculate_total_pages, ApiMetadata};
use employee_management::specification::{
    EmployeeDocumentMustBeUnique, EmployeeEmailMustBeUnique, Specification,
};

async fn seeded(count: usize) -> (InMemoryRepository<Employee>, Vec<Employee>) {
    let repo = InMemoryRepository::new();
    let mut rows = Vec::with_capacity(count);
    for i in 0..count {
        let e = employee("Same", &format!("user{i}@x.com"), &format!("{i:011}"));
        repo.add(&e).await.unwrap();
        rows.push(e);
    }
    (repo, rows)
}

#[tokio::test]
async fn document_uniqueness_ignores_formatting_unless_self_excluded() {
    let repo = InMemoryRepository::new();
    let owner = employee("Ana", "a@x.com", "12345678909");
    repo.add(&owner).await.unwrap();

    let other = employee("Bia", "b@x.com", "123.456.789-09");
    let err = EmployeeDocumentMustBeUnique::new(&repo, None)
        .is_satisfied_by(&other)
        .await
        .unwrap_err();
    match err {
        Error::Domain(DomainError::EmployeeDocumentAlreadyExists {
            document,
            existing_id,
        }) => {
            assert_eq!(document, "12345678909");
            assert_eq!(existing_id, owner.id);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    assert!(EmployeeDocumentMustBeUnique::new(&repo, Some(owner.id))
        .is_satisfied_by(&owner)
        .await
        .unwrap());
}

#[tokio::test]
async fn blank_keys_pass_without_touching_the_store() {
    let repo: InMemoryRepository<Employee> = InMemoryRepository::new();
    repo.set_offline(true);

    let blank = employee("Ana", "", "");
    assert!(EmployeeEmailMustBeUnique::new(&repo, None)
        .is_satisfied_by(&blank)
        .await
        .unwrap());
    assert!(EmployeeDocumentMustBeUnique::new(&repo, None)
        .is_satisfied_by(&blank)
        .await
        .unwrap());
}

#[tokio::test]
async fn pagination_windows_are_stable() {
    let (repo, rows) = seeded(10).await;
    let all = Filter::new();

    let (first, total) = repo
        .find_with_pagination(&all, &PageRequest::new(1, 2))
        .await
        .unwrap();
    assert_eq!(total, 10);
    assert_eq!(first.len(), 2);

    // every first name ties, so order falls back to insertion order
    let sorted = PageRequest::new(5, 2).sorted_by("firstName", OrderDirection::Ascending);
    for _ in 0..3 {
        let (last, total) = repo.find_with_pagination(&all, &sorted).await.unwrap();
        assert_eq!(total, 10);
        let ids: Vec<_> = last.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![rows[8].id, rows[9].id]);
    }
}

#[tokio::test]
async fn non_positive_paging_uses_defaults() {
    let (repo, _) = seeded(12).await;

    let (page, total) = repo
        .find_with_pagination(&Filter::new(), &PageRequest::new(0, 0))
        .await
        .unwrap();
    assert_eq!(total, 12);
    assert_eq!(page.len(), 10);
}

#[tokio::test]
async fn unknown_sort_field_is_rejected() {
    let (repo, _) = seeded(1).await;
    let request = PageRequest::new(1, 10).sorted_by("salary", OrderDirection::Descending);

    let err = repo
        .find_with_pagination(&Filter::new(), &request)
        .await
        .unwrap_err();
    assert!(err.message.contains("salary"));
}

#[test]
fn total_pages_use_ceiling_division() {
    assert_eq!(calculate_total_pages(10, 3), 4);
    assert_eq!(calculate_total_pages(10, 0), 10);
    assert_eq!(ApiMetadata::new(10, 3, 1).total_pages, 4);
}

#[tokio::test]
async fn soft_deleted_rows_stay_addressable_by_id() {
    let (repo, rows) = seeded(3).await;
    let target = &rows[1];

    assert!(repo.delete(target).await.unwrap());

    let stored = repo.get_by_id(target.id).await.unwrap().unwrap();
    assert!(stored.audit.is_deleted);
    assert!(stored.audit.deleted_at.is_some());

    let live = Filter::new().and(FilterCondition::eq("isDeleted", false));
    let (page, total) = repo
        .find_with_pagination(&live, &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(total, 2);
    assert!(page.iter().all(|e| e.id != target.id));
}
