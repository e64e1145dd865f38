//! Attendance ledger: every mutation takes the current class by reference and
//! returns a fully replaced value. Unknown student ids and dates are never errors;
//! they degrade to no-ops or upserts. Attendance is only ever written for enrolled
//! students.

use crate::config::LedgerConfig;
use crate::model::{AttendanceRecord, AttendanceStatus, ClassWithStudents, Student};
use crate::validation::{self, ValidationError};
use chrono::NaiveDate;
use std::fmt;

pub fn add_student(
    cls: &ClassWithStudents,
    name: &str,
    email: &str,
) -> Result<ClassWithStudents, ValidationError> {
    add_student_with_config(cls, name, email, &LedgerConfig::default())
}

pub fn add_student_with_config(
    cls: &ClassWithStudents,
    name: &str,
    email: &str,
    config: &LedgerConfig,
) -> Result<ClassWithStudents, ValidationError> {
    validation::validate_student_input(name, email, config)?;
    let student = Student::new(name, email);
    tracing::debug!(class_id = %cls.class_id, student_id = %student.id, "adding student");
    let mut updated = cls.clone();
    updated.students.push(student);
    Ok(updated)
}

/// Drops the student and cascades the removal through every attendance record.
pub fn remove_student(cls: &ClassWithStudents, student_id: &str) -> ClassWithStudents {
    tracing::debug!(class_id = %cls.class_id, student_id, "removing student");
    ClassWithStudents {
        students: cls
            .students
            .iter()
            .filter(|s| s.id != student_id)
            .cloned()
            .collect(),
        attendance_records: cls
            .attendance_records
            .iter()
            .map(|record| AttendanceRecord {
                date: record.date,
                attendance: record
                    .attendance
                    .iter()
                    .filter(|(id, _)| id.as_str() != student_id)
                    .map(|(id, present)| (id.clone(), *present))
                    .collect(),
            })
            .collect(),
        ..cls.clone()
    }
}

pub fn set_attendance(
    cls: &ClassWithStudents,
    date: NaiveDate,
    student_id: &str,
    present: bool,
) -> ClassWithStudents {
    if cls.student(student_id).is_none() {
        tracing::debug!(
            class_id = %cls.class_id,
            student_id,
            "ignoring attendance for unknown student"
        );
        return cls.clone();
    }
    tracing::debug!(class_id = %cls.class_id, %date, student_id, present, "setting attendance");
    let mut record = record_for_date(cls, date);
    record.attendance.insert(student_id.to_string(), present);
    upsert_record(cls, record)
}

/// Overwrites the whole record for `date` with every enrolled student present.
/// Entries for anything other than the current roster are discarded.
pub fn mark_all_present(cls: &ClassWithStudents, date: NaiveDate) -> ClassWithStudents {
    tracing::debug!(class_id = %cls.class_id, %date, "marking all present");
    let record = AttendanceRecord::with_attendance(
        date,
        cls.students.iter().map(|s| (s.id.clone(), true)),
    );
    upsert_record(cls, record)
}

pub fn remove_attendance_record(cls: &ClassWithStudents, date: NaiveDate) -> ClassWithStudents {
    tracing::debug!(class_id = %cls.class_id, %date, "removing attendance record");
    ClassWithStudents {
        attendance_records: cls
            .attendance_records
            .iter()
            .filter(|r| r.date != date)
            .cloned()
            .collect(),
        ..cls.clone()
    }
}

fn upsert_record(cls: &ClassWithStudents, record: AttendanceRecord) -> ClassWithStudents {
    let mut updated = cls.clone();
    match updated
        .attendance_records
        .iter_mut()
        .find(|r| r.date == record.date)
    {
        Some(existing) => *existing = record,
        None => updated.attendance_records.push(record),
    }
    updated
}

/// The stored record for `date`, or an empty one. The empty record is not
/// inserted into the class.
pub fn record_for_date(cls: &ClassWithStudents, date: NaiveDate) -> AttendanceRecord {
    cls.record_for(date)
        .cloned()
        .unwrap_or_else(|| AttendanceRecord::new(date))
}

/// Share of the roster marked present. Unrecorded students count as not present
/// because the denominator is the roster size. The present count is capped at
/// `total_students`; use [`date_attendance_percentage`] to ignore stale keys.
pub fn attendance_percentage(record: &AttendanceRecord, total_students: usize) -> f64 {
    if total_students == 0 {
        return 0.0;
    }
    let present = record.present_count().min(total_students);
    100.0 * present as f64 / total_students as f64
}

pub fn date_attendance_percentage(cls: &ClassWithStudents, date: NaiveDate) -> f64 {
    let total = cls.students.len();
    match cls.record_for(date) {
        Some(record) if total > 0 => 100.0 * cls.present_on_roster(record) as f64 / total as f64,
        _ => 0.0,
    }
}

pub fn student_attendance_percentage(cls: &ClassWithStudents, student_id: &str) -> f64 {
    let total = cls.attendance_records.len();
    if total == 0 {
        return 0.0;
    }
    let present = cls
        .attendance_records
        .iter()
        .filter(|r| r.attendance.get(student_id) == Some(&true))
        .count();
    100.0 * present as f64 / total as f64
}

pub fn overall_class_attendance(cls: &ClassWithStudents) -> f64 {
    let possible = cls.students.len() * cls.attendance_records.len();
    if possible == 0 {
        return 0.0;
    }
    let present: usize = cls
        .attendance_records
        .iter()
        .map(|record| cls.present_on_roster(record))
        .sum();
    100.0 * present as f64 / possible as f64
}

/// Records most-recent-first.
pub fn attendance_history(cls: &ClassWithStudents) -> Vec<&AttendanceRecord> {
    let mut records: Vec<&AttendanceRecord> = cls.attendance_records.iter().collect();
    records.sort_by(|a, b| b.date.cmp(&a.date));
    records
}

pub fn student_history(
    cls: &ClassWithStudents,
    student_id: &str,
) -> Vec<(NaiveDate, AttendanceStatus)> {
    attendance_history(cls)
        .into_iter()
        .map(|record| (record.date, record.status_for(student_id)))
        .collect()
}

pub fn search_students<'a>(cls: &'a ClassWithStudents, query: &str) -> Vec<&'a Student> {
    let needle = query.to_lowercase();
    cls.students
        .iter()
        .filter(|s| s.name.to_lowercase().contains(&needle))
        .collect()
}

/// Truncates toward zero; only used when a percentage is shown.
pub fn display_percentage(percentage: f64) -> i64 {
    percentage.trunc() as i64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceBand {
    Good,
    Warning,
    Poor,
}

impl AttendanceBand {
    pub fn classify(percentage: f64, config: &LedgerConfig) -> Self {
        if percentage >= config.good_threshold() {
            AttendanceBand::Good
        } else if percentage >= config.warning_threshold() {
            AttendanceBand::Warning
        } else {
            AttendanceBand::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceBand::Good => "good",
            AttendanceBand::Warning => "warning",
            AttendanceBand::Poor => "poor",
        }
    }
}

impl fmt::Display for AttendanceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
