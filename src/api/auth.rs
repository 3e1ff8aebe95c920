//! Input-shape checks for the login, registration and password reset
//! screens. Nothing here looks credentials up; a passing check only means
//! the app may navigate on.

use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

use crate::error::CredentialErrors;

const PASSWORD_SPECIALS: &str = "@$!%*?&";

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email pattern"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

/// At least eight characters drawn from letters, digits and `@$!%*?&`,
/// with at least one of each group.
pub fn is_strong_password(password: &str) -> bool {
    let allowed = |c: char| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c);
    password.chars().count() >= 8
        && password.chars().all(allowed)
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum UserType {
    Owner,
    Caretaker,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub user_type: Option<UserType>,
    pub first_name: String,
    pub last_name: String,
    pub contact_number: String,
    pub address: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

pub fn validate_login(email: &str, password: &str) -> Result<(), CredentialErrors> {
    let mut errors = CredentialErrors::default();
    if email.is_empty() {
        errors.insert("email", "Please enter both email and password.");
    } else if !is_valid_email(email) {
        errors.insert("email", "Please enter a valid email.");
    }
    if password.is_empty() {
        errors.insert("password", "Please enter both email and password.");
    }
    errors.into_result()
}

pub fn validate_registration(
    form: &RegistrationForm,
    known_emails: &[String],
) -> Result<(), CredentialErrors> {
    let mut errors = CredentialErrors::default();

    if form.user_type.is_none() {
        errors.insert("user_type", "Please select a user type.");
    }
    let required = [
        ("first_name", &form.first_name, "First name is required."),
        ("last_name", &form.last_name, "Last name is required."),
        ("contact_number", &form.contact_number, "Contact number is required."),
        ("address", &form.address, "Address is required."),
    ];
    for (field, value, message) in required {
        if value.trim().is_empty() {
            errors.insert(field, message);
        }
    }

    if form.email.is_empty() {
        errors.insert("email", "Email is required.");
    } else if !is_valid_email(&form.email) {
        errors.insert("email", "Invalid email format");
    } else if known_emails.iter().any(|e| e.eq_ignore_ascii_case(&form.email)) {
        errors.insert("email", "This email is already registered.");
    }

    if form.password.is_empty() {
        errors.insert("password", "Password is required.");
    } else if !is_strong_password(&form.password) {
        errors.insert(
            "password",
            "Password must be 8+ characters with a letter, number, and special character.",
        );
    }

    if form.confirm_password.is_empty() {
        errors.insert("confirm_password", "Please confirm your password.");
    } else if form.password != form.confirm_password {
        errors.insert("confirm_password", "Passwords do not match.");
    }

    errors.into_result()
}

pub fn validate_password_reset(
    email: &str,
    new_password: &str,
    confirm_password: &str,
) -> Result<(), CredentialErrors> {
    let mut errors = CredentialErrors::default();
    if email.is_empty() {
        errors.insert("email", "Email is required.");
    } else if !is_valid_email(email) {
        errors.insert("email", "Invalid email format");
    }
    if new_password.is_empty() {
        errors.insert("new_password", "Password is required.");
    } else if !is_strong_password(new_password) {
        errors.insert(
            "new_password",
            "Password must be 8+ characters with a letter, number, and special character.",
        );
    }
    if confirm_password.is_empty() {
        errors.insert("confirm_password", "Please confirm your password.");
    } else if confirm_password != new_password {
        errors.insert("confirm_password", "Passwords do not match.");
    }
    errors.into_result()
}
