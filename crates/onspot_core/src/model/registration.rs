//! Candidate registration form and its validation rules.
//!
//! # Responsibility
//! - Hold raw operator input as optional strings; hint text is a UI concern.
//! - Decide whether a candidate may be persisted.
//!
//! # Invariants
//! - Validation is pure and reports exactly one failure.
//! - Rule precedence is completeness, then email, then phone.
//! - The email rule is the desk's Gmail-only rule, not general address syntax.
//! - Reference-list membership is not checked here.

use crate::model::participant::{ParticipantUid, RegistrationPayload};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const REQUIRED_EMAIL_SUFFIX: &str = "@gmail.com";

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("valid phone regex"));

/// Logical input field of the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Name,
    Email,
    Phone,
    College,
    Dept,
    /// Degree programme.
    Year,
}

impl FormField {
    /// All fields in completeness-check order.
    pub const ALL: [FormField; 6] = [
        FormField::Name,
        FormField::Email,
        FormField::Phone,
        FormField::College,
        FormField::Dept,
        FormField::Year,
    ];

    /// Operator-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::College => "college",
            Self::Dept => "department",
            Self::Year => "degree",
        }
    }
}

/// Validation failure for one candidate registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationValidationError {
    /// A field is absent, empty or whitespace-only.
    MissingField(FormField),
    /// Email is not a single-`@` address ending in `@gmail.com`.
    InvalidEmail,
    /// Phone is not exactly 10 ASCII digits.
    InvalidPhone,
}

impl Display for RegistrationValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing required field: {}", field.label()),
            Self::InvalidEmail => write!(
                f,
                "email must be a valid Gmail address ending with {REQUIRED_EMAIL_SUFFIX}"
            ),
            Self::InvalidPhone => write!(f, "phone number must be exactly 10 digits"),
        }
    }
}

impl Error for RegistrationValidationError {}

/// Raw candidate registration as typed by the operator.
///
/// `None` and blank strings are equivalent for validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub college: Option<String>,
    pub dept: Option<String>,
    pub year: Option<String>,
}

impl RegistrationForm {
    /// Returns the raw value of one field.
    pub fn get(&self, field: FormField) -> Option<&str> {
        let value = match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Phone => &self.phone,
            FormField::College => &self.college,
            FormField::Dept => &self.dept,
            FormField::Year => &self.year,
        };
        value.as_deref()
    }

    /// Sets one field and returns the form, for builder-style construction.
    pub fn with(mut self, field: FormField, value: impl Into<String>) -> Self {
        let slot = match field {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Phone => &mut self.phone,
            FormField::College => &mut self.college,
            FormField::Dept => &mut self.dept,
            FormField::Year => &mut self.year,
        };
        *slot = Some(value.into());
        self
    }

    /// Validates the form without side effects.
    ///
    /// # Errors
    /// - `MissingField` for the first blank field in `FormField::ALL` order.
    /// - `InvalidEmail` when every field is present but the email rule fails.
    /// - `InvalidPhone` when only the phone rule fails.
    pub fn validate(&self) -> Result<(), RegistrationValidationError> {
        for field in FormField::ALL {
            if self.trimmed(field).is_empty() {
                return Err(RegistrationValidationError::MissingField(field));
            }
        }

        if !is_valid_email(self.trimmed(FormField::Email)) {
            return Err(RegistrationValidationError::InvalidEmail);
        }

        if !is_valid_phone(self.trimmed(FormField::Phone)) {
            return Err(RegistrationValidationError::InvalidPhone);
        }

        Ok(())
    }

    /// Validates and converts into a trimmed payload under `uid`.
    pub fn to_payload(
        &self,
        uid: impl Into<ParticipantUid>,
    ) -> Result<RegistrationPayload, RegistrationValidationError> {
        self.validate()?;
        Ok(RegistrationPayload {
            uid: uid.into(),
            name: self.trimmed(FormField::Name).to_string(),
            email: self.trimmed(FormField::Email).to_string(),
            phone: self.trimmed(FormField::Phone).to_string(),
            college: self.trimmed(FormField::College).to_string(),
            dept: self.trimmed(FormField::Dept).to_string(),
            year: self.trimmed(FormField::Year).to_string(),
        })
    }

    fn trimmed(&self, field: FormField) -> &str {
        self.get(field).map_or("", str::trim)
    }
}

/// Desk email rule: exactly one `@` and the `@gmail.com` suffix, after trimming.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    email.matches('@').count() == 1 && email.ends_with(REQUIRED_EMAIL_SUFFIX)
}

/// Desk phone rule: exactly 10 ASCII digits, after trimming.
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone.trim())
}
