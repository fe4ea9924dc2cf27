//! Client-side form validation.
//!
//! These checks run before a request is built. The server re-validates and
//! its 400/409 responses are reported by the error stage.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;

use crate::models::{Project, ProjectInput};
use crate::utils::date::{format_display_date, parse_display_date};

pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 72;
pub const PROJECT_NAME_MIN_LEN: usize = 3;

const EMAIL_MAX_LEN: usize = 254;
const EMAIL_LOCAL_MAX_LEN: usize = 64;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email validation regex must compile")
});

/// Which input a validation error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Email,
    Password,
    ConfirmPassword,
    Name,
    Value,
    StartDate,
    EndDate,
}

/// Password strength rules for registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    MinLength,
    MaxLength,
    NoWhitespace,
    Lowercase,
    Uppercase,
    Digit,
    Special,
}

impl PasswordRule {
    pub const ALL: [PasswordRule; 7] = [
        PasswordRule::MinLength,
        PasswordRule::MaxLength,
        PasswordRule::NoWhitespace,
        PasswordRule::Lowercase,
        PasswordRule::Uppercase,
        PasswordRule::Digit,
        PasswordRule::Special,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            PasswordRule::MinLength => "at least 8 characters",
            PasswordRule::MaxLength => "at most 72 characters",
            PasswordRule::NoWhitespace => "no spaces",
            PasswordRule::Lowercase => "a lowercase letter",
            PasswordRule::Uppercase => "an uppercase letter",
            PasswordRule::Digit => "a number",
            PasswordRule::Special => "a special character",
        }
    }

    pub fn is_satisfied_by(&self, password: &str) -> bool {
        let len = password.chars().count();
        match self {
            PasswordRule::MinLength => len >= PASSWORD_MIN_LEN,
            PasswordRule::MaxLength => len <= PASSWORD_MAX_LEN,
            PasswordRule::NoWhitespace => !password.chars().any(char::is_whitespace),
            PasswordRule::Lowercase => password.chars().any(|c| c.is_ascii_lowercase()),
            PasswordRule::Uppercase => password.chars().any(|c| c.is_ascii_uppercase()),
            PasswordRule::Digit => password.chars().any(|c| c.is_ascii_digit()),
            PasswordRule::Special => password.chars().any(|c| !c.is_ascii_alphanumeric()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Email is required.")]
    EmailRequired,

    #[error("Enter a valid email address.")]
    EmailInvalid,

    #[error("Password is required.")]
    PasswordRequired,

    #[error("Password needs {}.", .0.description())]
    PasswordRule(PasswordRule),

    #[error("Confirm your password.")]
    ConfirmationRequired,

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("Name is required.")]
    NameRequired,

    #[error("Name must have at least 3 characters.")]
    NameTooShort,

    #[error("Value is required.")]
    ValueRequired,

    #[error("Value must be a number.")]
    ValueInvalid,

    #[error("Value cannot be negative.")]
    ValueNegative,

    #[error("Start date is required.")]
    StartDateRequired,

    #[error("Start date must be a valid dd/mm/yyyy date.")]
    StartDateInvalid,

    #[error("End date must be a valid dd/mm/yyyy date.")]
    EndDateInvalid,
}

impl ValidationError {
    pub fn field(&self) -> FormField {
        match self {
            ValidationError::EmailRequired | ValidationError::EmailInvalid => FormField::Email,
            ValidationError::PasswordRequired | ValidationError::PasswordRule(_) => {
                FormField::Password
            }
            ValidationError::ConfirmationRequired | ValidationError::PasswordMismatch => {
                FormField::ConfirmPassword
            }
            ValidationError::NameRequired | ValidationError::NameTooShort => FormField::Name,
            ValidationError::ValueRequired
            | ValidationError::ValueInvalid
            | ValidationError::ValueNegative => FormField::Value,
            ValidationError::StartDateRequired | ValidationError::StartDateInvalid => {
                FormField::StartDate
            }
            ValidationError::EndDateInvalid => FormField::EndDate,
        }
    }
}

/// First error for `field`, for inline display next to the input.
pub fn error_for(errors: &[ValidationError], field: FormField) -> Option<&ValidationError> {
    errors.iter().find(|e| e.field() == field)
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::EmailRequired);
    }
    let local_len = email.split('@').next().map(str::len).unwrap_or(0);
    if email.len() > EMAIL_MAX_LEN || local_len > EMAIL_LOCAL_MAX_LEN || !EMAIL_RE.is_match(email)
    {
        return Err(ValidationError::EmailInvalid);
    }
    Ok(())
}

/// Rules the password currently breaks, in display order.
pub fn password_violations(password: &str) -> Vec<PasswordRule> {
    PasswordRule::ALL
        .iter()
        .copied()
        .filter(|rule| !rule.is_satisfied_by(password))
        .collect()
}

pub fn validate_login(email: &str, password: &str) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    if let Err(e) = validate_email(email) {
        errors.push(e);
    }
    if password.is_empty() {
        errors.push(ValidationError::PasswordRequired);
    }
    into_result(errors)
}

pub fn validate_registration(
    email: &str,
    password: &str,
    confirmation: &str,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    if let Err(e) = validate_email(email) {
        errors.push(e);
    }

    if password.is_empty() {
        errors.push(ValidationError::PasswordRequired);
    } else {
        errors.extend(
            password_violations(password)
                .into_iter()
                .map(ValidationError::PasswordRule),
        );
    }

    if confirmation.is_empty() {
        errors.push(ValidationError::ConfirmationRequired);
    } else if !password.is_empty() && password != confirmation {
        errors.push(ValidationError::PasswordMismatch);
    }

    into_result(errors)
}

/// Editable state of the project create/edit form.
///
/// Dates hold masked `dd/MM/yyyy` text and `value` holds what was typed, so
/// the form can be rendered and edited before it is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectForm {
    pub name: String,
    pub description: String,
    pub value: String,
    pub active: bool,
    pub start_date: String,
    pub end_date: String,
}

impl Default for ProjectForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            value: "0".to_string(),
            active: true,
            start_date: String::new(),
            end_date: String::new(),
        }
    }
}

impl ProjectForm {
    pub fn from_project(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            description: project.description.clone().unwrap_or_default(),
            value: format_decimal(project.value),
            active: project.active,
            start_date: format_display_date(project.start_date),
            end_date: project.end_date.map(format_display_date).unwrap_or_default(),
        }
    }

    /// Check every field and build the request payload.
    pub fn validate(&self) -> Result<ProjectInput, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push(ValidationError::NameRequired);
        } else if name.chars().count() < PROJECT_NAME_MIN_LEN {
            errors.push(ValidationError::NameTooShort);
        }

        let value = match parse_decimal(&self.value) {
            Ok(v) if v < 0.0 => {
                errors.push(ValidationError::ValueNegative);
                None
            }
            Ok(v) => Some(v),
            Err(e) => {
                errors.push(e);
                None
            }
        };

        let start_date = match self.start_date.trim() {
            "" => {
                errors.push(ValidationError::StartDateRequired);
                None
            }
            text => {
                let parsed = parse_display_date(text);
                if parsed.is_none() {
                    errors.push(ValidationError::StartDateInvalid);
                }
                parsed
            }
        };

        let end_date: Option<NaiveDate> = match self.end_date.trim() {
            "" => None,
            text => {
                let parsed = parse_display_date(text);
                if parsed.is_none() {
                    errors.push(ValidationError::EndDateInvalid);
                }
                parsed
            }
        };

        match (value, start_date) {
            (Some(value), Some(start_date)) if errors.is_empty() => Ok(ProjectInput {
                name: name.to_string(),
                description: self.description.trim().to_string(),
                value,
                active: self.active,
                start_date,
                end_date,
            }),
            _ => Err(errors),
        }
    }
}

/// Parse a typed amount. A comma marks the decimal part and dots are then
/// read as thousands separators (`1.500,50`); otherwise a dot is decimal.
pub fn parse_decimal(input: &str) -> Result<f64, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::ValueRequired);
    }

    let normalized = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };

    normalized
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(ValidationError::ValueInvalid)
}

fn format_decimal(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

fn into_result(errors: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
