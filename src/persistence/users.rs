use super::{KeyValueStore, PersistenceResult};
use crate::model::ClassWithStudents;

fn password_key(username: &str) -> String {
    format!("{username}_password")
}

fn classes_key(username: &str) -> String {
    format!("{username}_classes")
}

/// Account credentials and per-user class lists on top of a [`KeyValueStore`].
///
/// Layout:
/// - `{username}_password` holds the password as plain text.
/// - `{username}_classes` holds the JSON array of the user's classes, dates as
///   `YYYY-MM-DD` strings.
///
/// Passwords are compared by exact string equality; nothing is hashed.
pub struct UserManager<S> {
    store: S,
}

impl<S: KeyValueStore> UserManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn user_exists(&self, username: &str) -> PersistenceResult<bool> {
        self.store.contains(&password_key(username))
    }

    pub fn save_user(&self, username: &str, password: &str) -> PersistenceResult<()> {
        self.store.put(&password_key(username), password)?;
        tracing::info!(username, "saved user");
        Ok(())
    }

    pub fn validate_user(&self, username: &str, password: &str) -> PersistenceResult<bool> {
        let stored = self.store.get(&password_key(username))?;
        Ok(stored.as_deref() == Some(password))
    }

    pub fn save_classes_for_user(
        &self,
        username: &str,
        classes: &[ClassWithStudents],
    ) -> PersistenceResult<()> {
        super::validate_classes(classes)?;
        let json = serde_json::to_string(classes)?;
        self.store.put(&classes_key(username), &json)?;
        tracing::info!(username, classes = classes.len(), "saved classes");
        Ok(())
    }

    pub fn get_classes_for_user(
        &self,
        username: &str,
    ) -> PersistenceResult<Vec<ClassWithStudents>> {
        let Some(json) = self.store.get(&classes_key(username))? else {
            return Ok(Vec::new());
        };
        let classes: Vec<ClassWithStudents> = serde_json::from_str(&json).inspect_err(|err| {
            tracing::warn!(username, error = %err, "stored classes could not be parsed");
        })?;
        super::validate_classes(&classes)?;
        Ok(classes)
    }
}
