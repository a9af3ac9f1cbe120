//! Government document helpers (CPF and CNPJ)

const CPF_LENGTH: usize = 11;
const CNPJ_LENGTH: usize = 14;

const CNPJ_FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// Strip everything but ASCII digits
///
/// "123.456.789-09" and "12345678909" normalize to the same value.
pub fn normalize_digits(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Whether the input is a valid CPF or CNPJ
///
/// Only `.`, `-` and `/` are accepted as separators.
pub fn is_valid_document(input: &str) -> bool {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| !matches!(c, '.' | '-' | '/'))
        .collect();

    if !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    match cleaned.len() {
        CPF_LENGTH => is_valid_cpf(&cleaned),
        CNPJ_LENGTH => is_valid_cnpj(&cleaned),
        _ => false,
    }
}

/// Validate an 11 digit CPF by its two check digits
pub fn is_valid_cpf(digits: &str) -> bool {
    let Some(values) = to_digits(digits, CPF_LENGTH) else {
        return false;
    };

    let first_weights: Vec<u32> = (2..=10).rev().collect();
    let second_weights: Vec<u32> = (2..=11).rev().collect();

    values[9] == check_digit(&values[..9], &first_weights)
        && values[10] == check_digit(&values[..10], &second_weights)
}

/// Validate a 14 digit CNPJ by its two check digits
pub fn is_valid_cnpj(digits: &str) -> bool {
    let Some(values) = to_digits(digits, CNPJ_LENGTH) else {
        return false;
    };

    values[12] == check_digit(&values[..12], &CNPJ_FIRST_WEIGHTS)
        && values[13] == check_digit(&values[..13], &CNPJ_SECOND_WEIGHTS)
}

fn to_digits(input: &str, expected_len: usize) -> Option<Vec<u32>> {
    let values: Vec<u32> = input.chars().map(|c| c.to_digit(10)).collect::<Option<_>>()?;
    if values.len() != expected_len {
        return None;
    }
    // repeated digits pass the checksum but are never issued
    if values.iter().all(|d| *d == values[0]) {
        return None;
    }
    Some(values)
}

fn check_digit(values: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = values.iter().zip(weights).map(|(v, w)| v * w).sum();
    match sum % 11 {
        rest if rest < 2 => 0,
        rest => 11 - rest,
    }
}
