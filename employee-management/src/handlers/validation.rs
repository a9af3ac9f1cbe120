//! Request validation rules
//!
//! Rules collect every failure instead of stopping at the first one, so a
//! client sees all problems in a single `error.detail`.

use std::sync::LazyLock;

use chrono::{NaiveDate, Utc};
use regex::Regex;
use uuid::Uuid;

use crate::domain::{is_valid_document, MIN_PHONE_NUMBERS};

/// Minimum length for person and customer names
pub const MIN_NAME_LENGTH: usize = 3;

/// Longest password accepted on creation
pub const MAX_PASSWORD_LENGTH: usize = 255;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid")
});

/// Accumulates validation messages for one request
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` unless `ok`
    pub fn check(&mut self, ok: bool, message: impl Into<String>) -> &mut Self {
        if !ok {
            self.errors.push(message.into());
        }
        self
    }

    pub fn id(&mut self, id: Uuid, label: &str) -> &mut Self {
        self.check(!id.is_nil(), format!("{label} must not be empty"))
    }

    pub fn name(&mut self, value: &str, label: &str) -> &mut Self {
        let value = value.trim();
        if value.is_empty() {
            return self.check(false, format!("{label} is required"));
        }
        self.check(
            value.chars().count() >= MIN_NAME_LENGTH,
            format!("{label} must be at least {MIN_NAME_LENGTH} characters long"),
        )
    }

    pub fn email(&mut self, value: &str) -> &mut Self {
        let value = value.trim();
        if value.is_empty() {
            return self.check(false, "Email is required");
        }
        self.check(is_valid_email(value), "Email is not valid")
    }

    pub fn document(&mut self, value: &str, label: &str) -> &mut Self {
        if value.trim().is_empty() {
            return self.check(false, format!("{label} is required"));
        }
        self.check(is_valid_document(value), format!("{label} is not a valid CPF or CNPJ"))
    }

    pub fn birth_date(&mut self, value: NaiveDate) -> &mut Self {
        self.check(
            value <= Utc::now().date_naive(),
            "Birth date cannot be in the future",
        )
    }

    /// Password required on creation: 8 to 255 characters
    pub fn new_password(&mut self, value: &str, min_length: usize) -> &mut Self {
        if value.is_empty() {
            return self.check(false, "Password is required");
        }
        let length = value.chars().count();
        self.check(
            length >= min_length,
            format!("Password must be at least {min_length} characters long"),
        )
        .check(
            length <= MAX_PASSWORD_LENGTH,
            format!("Password must be at most {MAX_PASSWORD_LENGTH} characters long"),
        )
    }

    /// Password on change: optional, but long enough when given
    pub fn optional_password(&mut self, value: Option<&str>, min_length: usize) -> &mut Self {
        match value.filter(|p| !p.is_empty()) {
            Some(p) => self.check(
                p.chars().count() >= min_length,
                format!("Password must be at least {min_length} characters long if provided"),
            ),
            None => self,
        }
    }

    pub fn phone(&mut self, value: &str, label: &str) -> &mut Self {
        if value.trim().is_empty() {
            return self.check(false, format!("{label} is required"));
        }
        self.check(is_valid_phone(value), format!("{label} must have 10 or 11 digits"))
    }

    /// At least two numbers, each of them valid
    pub fn phone_numbers<'a>(&mut self, numbers: impl IntoIterator<Item = &'a str>) -> &mut Self {
        let numbers: Vec<&str> = numbers.into_iter().collect();
        self.check(
            numbers.len() >= MIN_PHONE_NUMBERS,
            "At least two phone numbers are required",
        );
        for (index, number) in numbers.iter().enumerate() {
            self.phone(number, &format!("Phone number {}", index + 1));
        }
        self
    }

    pub fn zip_code(&mut self, value: &str) -> &mut Self {
        self.check(is_valid_zip_code(value), "Zip code must have 8 digits")
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok(())` when no rule failed, otherwise every message in order
    pub fn finish(self) -> Result<(), Vec<String>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value.trim())
}

/// 10 or 11 digits once `-`, `.`, spaces and parentheses are removed
pub fn is_valid_phone(value: &str) -> bool {
    let cleaned: String = value
        .chars()
        .filter(|c| !matches!(c, '-' | '.' | ' ' | '(' | ')'))
        .collect();
    cleaned.chars().all(|c| c.is_ascii_digit()) && matches!(cleaned.len(), 10 | 11)
}

/// Brazilian CEP: 8 digits, optionally written as `00000-000`
pub fn is_valid_zip_code(value: &str) -> bool {
    let cleaned: String = value.trim().chars().filter(|c| *c != '-').collect();
    cleaned.len() == 8 && cleaned.chars().all(|c| c.is_ascii_digit())
}
