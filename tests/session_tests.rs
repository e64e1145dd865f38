use attendance_ledger::{
    AppState, AttendanceStatus, AuthError, ClassWithStudents, MemoryStore, UserManager, classes,
    ledger, log_in, sign_up,
};
use chrono::NaiveDate;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn single_class_state() -> AppState {
    let classes = vec![ClassWithStudents::with_id("c1", "Algorithms")];
    AppState::new("prof", classes, d(2024, 3, 1))
}

fn validation_message(err: AuthError) -> String {
    match err {
        AuthError::Validation(err) => err.message().to_string(),
        other => panic!("expected validation error, got {other}"),
    }
}

#[test]
fn sign_up_validates_and_saves() {
    let users = UserManager::new(MemoryStore::new());

    assert_eq!(
        validation_message(sign_up(&users, "", "pw", "pw").unwrap_err()),
        "Please fill in all fields"
    );
    assert_eq!(
        validation_message(sign_up(&users, "prof", "pw", "other").unwrap_err()),
        "Passwords do not match"
    );

    sign_up(&users, "prof", "pw", "pw").unwrap();
    assert!(users.validate_user("prof", "pw").unwrap());

    assert_eq!(
        validation_message(sign_up(&users, "prof", "new", "new").unwrap_err()),
        "Username already exists"
    );
    assert!(users.validate_user("prof", "pw").unwrap());
}

#[test]
fn log_in_requires_matching_password() {
    let users = UserManager::new(MemoryStore::new());
    sign_up(&users, "prof", "pw", "pw").unwrap();

    assert!(log_in(&users, "prof", "pw").is_ok());
    assert_eq!(
        validation_message(log_in(&users, "prof", "PW").unwrap_err()),
        "Invalid credentials"
    );
    assert_eq!(
        validation_message(log_in(&users, "ghost", "pw").unwrap_err()),
        "Invalid credentials"
    );
    assert_eq!(
        validation_message(log_in(&users, "prof", " ").unwrap_err()),
        "Please fill in all fields"
    );
}

#[test]
fn class_list_operations() {
    let list = classes::add_class(&[], "Algorithms").unwrap();
    let list = classes::add_class(&list, "Seminar").unwrap();
    assert!(classes::add_class(&list, "  ").is_err());
    assert_eq!(list.len(), 2);

    let seminar_id = list[1].class_id.clone();
    let mut renamed = list[1].clone();
    renamed.class_name = "Graduate Seminar".into();
    let list = classes::replace_class(&list, &renamed);
    assert_eq!(
        classes::find_class(&list, &seminar_id).unwrap().class_name,
        "Graduate Seminar"
    );

    let stranger = ClassWithStudents::new("Stranger");
    assert_eq!(classes::replace_class(&list, &stranger), list);

    let list = classes::remove_class(&list, &seminar_id);
    assert_eq!(list.len(), 1);
    assert_eq!(classes::remove_class(&list, "missing"), list);
}

#[test]
fn state_applies_ledger_ops_to_selected_class() {
    let state = AppState::new("prof", Vec::new(), d(2024, 3, 1));
    let state = state.add_class("Algorithms").unwrap();
    let state = state.add_class("Seminar").unwrap();
    let algorithms_id = state.classes()[0].class_id.clone();

    let unchanged = state.apply(|cls| ledger::mark_all_present(cls, d(2024, 3, 1)));
    assert_eq!(unchanged, state);

    let state = state.select_class(&algorithms_id);
    let state = state
        .try_apply(|cls| ledger::add_student(cls, "Ada", "ada@tufts.edu"))
        .unwrap();
    let student_id = state.selected().unwrap().students[0].id.clone();

    let date = state.selected_date();
    let state = state.apply(|cls| ledger::set_attendance(cls, date, &student_id, true));

    let selected = state.selected().unwrap();
    assert_eq!(selected.class_id, algorithms_id);
    assert_eq!(
        selected.record_for(d(2024, 3, 1)).unwrap().status_for(&student_id),
        AttendanceStatus::Present
    );
    assert!(state.classes()[1].students.is_empty());
}

#[test]
fn rejected_student_leaves_state_unchanged() {
    let state = single_class_state().select_class("c1");
    let result = state.try_apply(|cls| ledger::add_student(cls, "Eve", "eve@example.com"));
    assert!(result.is_err());
    assert!(state.selected().unwrap().students.is_empty());
}

#[test]
fn selection_and_date_transitions() {
    let state = single_class_state();
    assert!(state.selected().is_none());

    assert_eq!(state.select_class("missing"), state);

    let state = state.select_class("c1").select_date(d(2024, 3, 8));
    assert_eq!(state.selected().unwrap().class_id, "c1");
    assert_eq!(state.selected_date(), d(2024, 3, 8));

    assert!(state.clear_selection().selected().is_none());

    let removed = state.remove_class("c1");
    assert!(removed.classes().is_empty());
    assert!(removed.selected().is_none());
}

#[test]
fn state_saves_and_loads_through_user_manager() {
    let users = UserManager::new(MemoryStore::new());
    let state = AppState::new("prof", Vec::new(), d(2024, 3, 1))
        .add_class("Algorithms")
        .unwrap();
    let class_id = state.classes()[0].class_id.clone();
    let state = state
        .select_class(&class_id)
        .try_apply(|cls| ledger::add_student(cls, "Ada", "ada@tufts.edu"))
        .unwrap();
    state.save(&users).unwrap();

    let loaded = AppState::load(&users, "prof", d(2024, 4, 1)).unwrap();
    assert_eq!(loaded.username(), "prof");
    assert_eq!(loaded.classes(), state.classes());
    assert!(loaded.selected().is_none());

    let other = AppState::load(&users, "someone-else", d(2024, 4, 1)).unwrap();
    assert!(other.classes().is_empty());
}
