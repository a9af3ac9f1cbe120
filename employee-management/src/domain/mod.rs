//! Domain model: employees, customers and the rules they carry

mod address;
mod audit;
mod customer;
mod document;
mod employee;
mod error;
mod phone_number;
mod role;

pub use address::{Address, AddressInput};
pub use audit::{AuditFields, DataStatus, SYSTEM_ACTOR};
pub use customer::Customer;
pub use document::{is_valid_cnpj, is_valid_cpf, is_valid_document, normalize_digits};
pub use employee::{Employee, EMPLOYEE_DOCUMENT_INDEX, EMPLOYEE_EMAIL_INDEX, MIN_PHONE_NUMBERS};
pub use error::DomainError;
pub use phone_number::{PhoneNumber, DEFAULT_PHONE_TYPE};
pub use role::EmployeeRole;

#[cfg(test)]
pub(crate) use customer::fixtures as customer_fixtures;
#[cfg(test)]
pub(crate) use employee::fixtures as employee_fixtures;
