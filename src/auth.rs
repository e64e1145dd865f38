use crate::persistence::{KeyValueStore, PersistenceError, UserManager};
use crate::validation::{self, ValidationError};
use std::fmt;

#[derive(Debug)]
pub enum AuthError {
    Validation(ValidationError),
    Storage(PersistenceError),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Validation(err) => write!(f, "{err}"),
            AuthError::Storage(err) => write!(f, "storage error: {err}"),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::Validation(err) => Some(err),
            AuthError::Storage(err) => Some(err),
        }
    }
}

impl From<ValidationError> for AuthError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<PersistenceError> for AuthError {
    fn from(value: PersistenceError) -> Self {
        Self::Storage(value)
    }
}

pub fn sign_up<S: KeyValueStore>(
    users: &UserManager<S>,
    username: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), AuthError> {
    validation::validate_credentials(username, password)?;
    if password != confirm_password {
        return Err(ValidationError::new("Passwords do not match").into());
    }
    if users.user_exists(username)? {
        return Err(ValidationError::new("Username already exists").into());
    }
    users.save_user(username, password)?;
    Ok(())
}

pub fn log_in<S: KeyValueStore>(
    users: &UserManager<S>,
    username: &str,
    password: &str,
) -> Result<(), AuthError> {
    validation::validate_credentials(username, password)?;
    if !users.validate_user(username, password)? {
        tracing::warn!(username, "rejected login");
        return Err(ValidationError::new("Invalid credentials").into());
    }
    tracing::info!(username, "logged in");
    Ok(())
}
