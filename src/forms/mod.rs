//! Client-side form validation
//!
//! Validators never fail; they collect one issue per offending field so the
//! caller can show every message at once.

mod login;
mod password;
mod shipment;
mod volunteer;

pub use login::{email_issue, validate_login, EMAIL_MESSAGE};
pub use password::{password_issue, validate_password_change};
pub use shipment::validate_shipment;
pub use volunteer::validate_volunteer;

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Shared with the volunteer and shipment forms
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    issues: Vec<FieldIssue>,
}

impl Validation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.issues.push(FieldIssue {
            field,
            message: message.into(),
        });
    }

    /// Append every issue of `other`
    pub fn extend(&mut self, other: Validation) {
        self.issues.extend(other.issues);
    }

    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    /// First message reported for `field`
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.issues
            .iter()
            .find(|issue| issue.field == field)
            .map(|issue| issue.message.as_str())
    }

    /// All messages, one per line
    pub fn summary(&self) -> String {
        self.issues
            .iter()
            .map(|issue| issue.message.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub(crate) fn is_valid_email(value: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
        .is_match(value)
}
