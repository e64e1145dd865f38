pub mod auth;
pub mod classes;
pub mod config;
pub mod export;
pub mod ledger;
pub mod model;
pub mod persistence;
pub mod session;
pub mod validation;

pub use auth::{AuthError, log_in, sign_up};
pub use config::LedgerConfig;
pub use export::{export_to_csv, render_attendance_csv, write_attendance_csv};
pub use ledger::AttendanceBand;
pub use model::{AttendanceRecord, AttendanceStatus, ClassWithStudents, Student};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteStore;
pub use persistence::{
    JsonFileStore, KeyValueStore, MemoryStore, PersistenceError, PersistenceResult, UserManager,
    load_config_from_json, save_config_to_json, validate_classes,
};
pub use session::AppState;
pub use validation::ValidationError;
