//! Domain field validation.
//!
//! Validators for the fields the registry accepts from user input or from
//! external lookups: Brazilian postal codes (CEP), company tax ids (CNPJ),
//! `YYYY-MM` month tags, and display names. Used at the registry boundary
//! before anything is persisted.
//!
//! Postal codes and tax ids are normalized to digits-only form before
//! storage; the validators here accept the common punctuated forms
//! (`01310-100`, `11.222.333/0001-81`) and reject anything else.

use std::fmt;

/// Validation error with structured context.
///
/// Contains the specific constraint that was violated and the field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// Description of the violated constraint.
    pub constraint: String,
}

impl ValidationError {
    fn new(field: &str, constraint: impl Into<String>) -> Self {
        Self { field: field.to_string(), constraint: constraint.into() }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.constraint)
    }
}

impl std::error::Error for ValidationError {}

/// Maximum display-name length in bytes.
const MAX_NAME_BYTES: usize = 120;

/// Strips formatting punctuation and returns the digits of a code field.
fn digits_of(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Validates and normalizes a postal code (CEP).
///
/// Accepts `01310100` or `01310-100`; returns the digits-only form.
///
/// # Errors
///
/// Returns [`ValidationError`] if the value does not contain exactly 8
/// digits, or contains characters other than digits and a single hyphen.
pub fn validate_postal_code(value: &str) -> Result<String, ValidationError> {
    if value.chars().any(|c| !c.is_ascii_digit() && c != '-') {
        return Err(ValidationError::new(
            "postal_code",
            format!("contains invalid characters in {value:?}; allowed: digits and '-'"),
        ));
    }
    let digits = digits_of(value);
    if digits.len() != 8 {
        return Err(ValidationError::new(
            "postal_code",
            format!("expected 8 digits, found {}", digits.len()),
        ));
    }
    Ok(digits)
}

/// Validates and normalizes a company tax id (CNPJ).
///
/// Accepts `11222333000181` or `11.222.333/0001-81`; returns the digits-only
/// form. Both check digits are verified.
///
/// # Errors
///
/// Returns [`ValidationError`] if the value does not contain exactly 14
/// digits, is a repeated-digit sequence, or fails the check-digit rules.
pub fn validate_tax_id(value: &str) -> Result<String, ValidationError> {
    if value.chars().any(|c| !c.is_ascii_digit() && !matches!(c, '.' | '/' | '-')) {
        return Err(ValidationError::new(
            "tax_id",
            format!("contains invalid characters in {value:?}; allowed: digits and './-'"),
        ));
    }
    let digits = digits_of(value);
    if digits.len() != 14 {
        return Err(ValidationError::new(
            "tax_id",
            format!("expected 14 digits, found {}", digits.len()),
        ));
    }

    let nums: Vec<u32> = digits.chars().filter_map(|c| c.to_digit(10)).collect();

    // All-equal sequences pass the arithmetic but are not issued ids.
    if nums.iter().all(|&d| d == nums[0]) {
        return Err(ValidationError::new("tax_id", "repeated-digit sequence"));
    }

    let check = |len: usize| -> u32 {
        // Weights cycle 2..=9 from the rightmost digit leftwards.
        let sum: u32 = nums[..len]
            .iter()
            .rev()
            .enumerate()
            .map(|(i, &d)| d * (2 + (i as u32) % 8))
            .sum();
        let rem = sum % 11;
        if rem < 2 { 0 } else { 11 - rem }
    };

    if check(12) != nums[12] || check(13) != nums[13] {
        return Err(ValidationError::new("tax_id", "check digits do not match"));
    }

    Ok(digits)
}

/// Validates a `YYYY-MM` month tag.
///
/// # Errors
///
/// Returns [`ValidationError`] if the value is not four digits, a hyphen,
/// and a month between 01 and 12.
pub fn validate_month_tag(value: &str) -> Result<(), ValidationError> {
    let parts: Vec<&str> = value.split('-').collect();
    let valid = match parts.as_slice() {
        [year, month] => {
            year.len() == 4
                && month.len() == 2
                && year.chars().all(|c| c.is_ascii_digit())
                && month.parse::<u8>().map(|m| (1..=12).contains(&m)).unwrap_or(false)
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("date", format!("expected YYYY-MM, found {value:?}")))
    }
}

/// Validates an entity display name.
///
/// # Errors
///
/// Returns [`ValidationError`] if the name is empty, whitespace-only, or
/// longer than 120 bytes.
pub fn validate_display_name(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("name", "must not be empty"));
    }
    if value.len() > MAX_NAME_BYTES {
        return Err(ValidationError::new(
            "name",
            format!("length {} bytes exceeds maximum {MAX_NAME_BYTES} bytes", value.len()),
        ));
    }
    Ok(())
}
