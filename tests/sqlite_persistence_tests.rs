#![cfg(feature = "sqlite")]

use attendance_ledger::{
    ClassWithStudents, KeyValueStore, SqliteStore, Student, UserManager, ledger,
};
use chrono::NaiveDate;
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn sqlite_store_round_trip_classes() {
    let file = NamedTempFile::new().unwrap();

    let mut class = ClassWithStudents::with_id("c1", "Compilers");
    class.students = vec![
        Student::with_id("s1", "Ken Thompson", "ken@tufts.edu"),
        Student::with_id("s2", "Dennis Ritchie", "dmr@tufts.edu"),
    ];
    let class = ledger::set_attendance(&class, d(2025, 1, 6), "s1", true);
    let class = ledger::set_attendance(&class, d(2025, 1, 6), "s2", false);
    let class = ledger::mark_all_present(&class, d(2025, 1, 7));
    let classes = vec![class];

    {
        let users = UserManager::new(SqliteStore::new(file.path()).unwrap());
        users.save_user("prof", "secret").unwrap();
        users.save_classes_for_user("prof", &classes).unwrap();
    }

    let users = UserManager::new(SqliteStore::new(file.path()).unwrap());
    assert!(users.user_exists("prof").unwrap());
    assert!(users.validate_user("prof", "secret").unwrap());
    assert_eq!(users.get_classes_for_user("prof").unwrap(), classes);
}

#[test]
fn sqlite_put_overwrites_and_remove_deletes() {
    let store = SqliteStore::in_memory().unwrap();
    assert_eq!(store.get("k").unwrap(), None);

    store.put("k", "one").unwrap();
    store.put("k", "two").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
    assert!(store.contains("k").unwrap());

    store.remove("k").unwrap();
    assert!(!store.contains("k").unwrap());
    store.remove("k").unwrap();
}
