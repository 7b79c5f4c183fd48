//! Checkout form input and validation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::checkout::{Address, Contact};
use crate::config::CommerceConfig;

const MAX_NAME_LEN: usize = 100;
const MAX_EMAIL_LEN: usize = 254;
const MAX_PHONE_LEN: usize = 20;
const MAX_ADDRESS_LINE_LEN: usize = 255;
const MAX_REGION_LEN: usize = 100;
const MAX_POSTAL_CODE_LEN: usize = 20;

/// Raw customer input from the checkout page.
///
/// Everything is a plain string as submitted; [`CheckoutForm::validate`]
/// trims it and turns it into order details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub state_province: String,
    pub postal_code: String,
    pub country: String,
    pub notes: String,
}

/// Checkout input that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutDetails {
    pub contact: Contact,
    pub shipping_address: Address,
    pub notes: Option<String>,
}

impl CheckoutForm {
    /// Validate every field, collecting all failures.
    pub fn validate(&self, config: &CommerceConfig) -> Result<CheckoutDetails, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let first_name = required(&mut errors, "first_name", &self.first_name, MAX_NAME_LEN);
        let last_name = required(&mut errors, "last_name", &self.last_name, MAX_NAME_LEN);

        let email = required(&mut errors, "email", &self.email, MAX_EMAIL_LEN);
        if !email.is_empty() && !looks_like_email(&email) {
            errors.push("email", "enter a valid email address");
        }

        let phone = required(&mut errors, "phone", &self.phone, MAX_PHONE_LEN);
        if !phone.is_empty() && phone.chars().count() < config.min_phone_length {
            errors.push(
                "phone",
                format!("must be at least {} characters", config.min_phone_length),
            );
        }

        let line1 = required(&mut errors, "address_line1", &self.address_line1, MAX_ADDRESS_LINE_LEN);
        let line2 = optional(&mut errors, "address_line2", &self.address_line2, MAX_ADDRESS_LINE_LEN);
        let city = required(&mut errors, "city", &self.city, MAX_REGION_LEN);
        let state_province = required(&mut errors, "state_province", &self.state_province, MAX_REGION_LEN);
        let postal_code = required(&mut errors, "postal_code", &self.postal_code, MAX_POSTAL_CODE_LEN);
        let country = optional(&mut errors, "country", &self.country, MAX_REGION_LEN)
            .unwrap_or_else(|| config.default_country.clone());

        let notes = Some(self.notes.trim())
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(CheckoutDetails {
            contact: Contact {
                first_name,
                last_name,
                email,
                phone,
            },
            shipping_address: Address {
                line1,
                line2,
                city,
                state_province,
                postal_code,
                country,
            },
            notes,
        })
    }
}

fn required(errors: &mut ValidationErrors, field: &'static str, value: &str, max_len: usize) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.push(field, "this field is required");
    } else if value.chars().count() > max_len {
        errors.push(field, format!("must be at most {} characters", max_len));
    }
    value.to_string()
}

fn optional(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    max_len: usize,
) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if value.chars().count() > max_len {
        errors.push(field, format!("must be at most {} characters", max_len));
    }
    Some(value.to_string())
}

fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|part| !part.is_empty())
}

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every validation failure from one form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Record a failure for `field`.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Check whether `field` has at least one failure.
    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
