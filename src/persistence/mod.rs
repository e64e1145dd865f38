use crate::model::ClassWithStudents;
use serde_json::Error as SerdeJsonError;
use std::collections::HashSet;
use std::fmt;
use std::io;

#[derive(Debug)]
pub enum PersistenceError {
    Serialization(SerdeJsonError),
    Io(io::Error),
    #[cfg(feature = "sqlite")]
    Sqlite(rusqlite::Error),
    Csv(csv::Error),
    InvalidData(String),
    LockPoisoned,
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Serialization(err) => write!(f, "serialization error: {err}"),
            PersistenceError::Io(err) => write!(f, "io error: {err}"),
            #[cfg(feature = "sqlite")]
            PersistenceError::Sqlite(err) => write!(f, "sqlite error: {err}"),
            PersistenceError::Csv(err) => write!(f, "csv error: {err}"),
            PersistenceError::InvalidData(msg) => write!(f, "invalid data: {msg}"),
            PersistenceError::LockPoisoned => write!(f, "store lock poisoned"),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistenceError::Serialization(err) => Some(err),
            PersistenceError::Io(err) => Some(err),
            #[cfg(feature = "sqlite")]
            PersistenceError::Sqlite(err) => Some(err),
            PersistenceError::Csv(err) => Some(err),
            PersistenceError::InvalidData(_) | PersistenceError::LockPoisoned => None,
        }
    }
}

impl From<SerdeJsonError> for PersistenceError {
    fn from(value: SerdeJsonError) -> Self {
        Self::Serialization(value)
    }
}

impl From<io::Error> for PersistenceError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<csv::Error> for PersistenceError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl<T> From<std::sync::PoisonError<T>> for PersistenceError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::LockPoisoned
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// String-to-string storage. Every value is replaced whole; there are no
/// partial updates.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> PersistenceResult<Option<String>>;
    fn put(&self, key: &str, value: &str) -> PersistenceResult<()>;
    fn remove(&self, key: &str) -> PersistenceResult<()>;

    fn contains(&self, key: &str) -> PersistenceResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// Structural checks applied before classes are written and after they are read.
/// Attendance keys for unknown students are tolerated.
pub fn validate_classes(classes: &[ClassWithStudents]) -> PersistenceResult<()> {
    let mut class_ids = HashSet::with_capacity(classes.len());
    for class in classes {
        if !class_ids.insert(class.class_id.as_str()) {
            return Err(PersistenceError::InvalidData(format!(
                "duplicate class id {}",
                class.class_id
            )));
        }

        let mut student_ids = HashSet::with_capacity(class.students.len());
        for student in &class.students {
            if !student_ids.insert(student.id.as_str()) {
                return Err(PersistenceError::InvalidData(format!(
                    "class {} has duplicate student id {}",
                    class.class_id, student.id
                )));
            }
        }

        let mut dates = HashSet::with_capacity(class.attendance_records.len());
        for record in &class.attendance_records {
            if !dates.insert(record.date) {
                return Err(PersistenceError::InvalidData(format!(
                    "class {} has more than one attendance record for {}",
                    class.class_id, record.date
                )));
            }
        }
    }
    Ok(())
}

pub mod file;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod users;

pub use file::{JsonFileStore, load_config_from_json, save_config_to_json};
pub use memory::MemoryStore;
pub use users::UserManager;
