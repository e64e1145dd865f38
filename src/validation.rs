use crate::config::LedgerConfig;
use std::fmt;

/// User-entered data that fails an input rule. The message is meant to be shown
/// to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

pub fn validate_student_input(
    name: &str,
    email: &str,
    config: &LedgerConfig,
) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("Student name must not be blank"));
    }
    if email.trim().is_empty() {
        return Err(ValidationError::new("Student email must not be blank"));
    }
    if !email.ends_with(config.email_domain()) {
        return Err(ValidationError::new(format!(
            "Email must end with {}",
            config.email_domain()
        )));
    }
    Ok(())
}

pub fn validate_class_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("Class name must not be blank"));
    }
    Ok(())
}

pub fn validate_credentials(username: &str, password: &str) -> Result<(), ValidationError> {
    if username.trim().is_empty() || password.trim().is_empty() {
        return Err(ValidationError::new("Please fill in all fields"));
    }
    Ok(())
}
