use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    #[serde(default = "new_id")]
    pub id: String,
    pub name: String,
    pub email: String,
}

impl Student {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::with_id(new_id(), name, email)
    }

    pub fn with_id(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Status of one student on one date. `Unrecorded` is the absence of an entry,
/// which is not the same thing as `Absent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Unrecorded,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::Unrecorded => "N/A",
        }
    }
}

impl From<Option<bool>> for AttendanceStatus {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => AttendanceStatus::Present,
            Some(false) => AttendanceStatus::Absent,
            None => AttendanceStatus::Unrecorded,
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub date: NaiveDate,
    /// Student id to present (`true`) or absent (`false`).
    #[serde(default)]
    pub attendance: BTreeMap<String, bool>,
}

impl AttendanceRecord {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            attendance: BTreeMap::new(),
        }
    }

    pub fn with_attendance<I, K>(date: NaiveDate, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, bool)>,
        K: Into<String>,
    {
        Self {
            date,
            attendance: entries
                .into_iter()
                .map(|(id, present)| (id.into(), present))
                .collect(),
        }
    }

    pub fn status_for(&self, student_id: &str) -> AttendanceStatus {
        AttendanceStatus::from(self.attendance.get(student_id).copied())
    }

    pub fn present_count(&self) -> usize {
        self.attendance.values().filter(|present| **present).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassWithStudents {
    #[serde(default = "new_id")]
    pub class_id: String,
    pub class_name: String,
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub attendance_records: Vec<AttendanceRecord>,
}

impl ClassWithStudents {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self::with_id(new_id(), class_name)
    }

    pub fn with_id(class_id: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            class_id: class_id.into(),
            class_name: class_name.into(),
            students: Vec::new(),
            attendance_records: Vec::new(),
        }
    }

    pub fn student(&self, student_id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == student_id)
    }

    /// Enrolled students marked present in `record`. Keys for ids that are not on
    /// the roster are ignored.
    pub fn present_on_roster(&self, record: &AttendanceRecord) -> usize {
        self.students
            .iter()
            .filter(|s| record.attendance.get(&s.id) == Some(&true))
            .count()
    }

    pub fn record_for(&self, date: NaiveDate) -> Option<&AttendanceRecord> {
        self.attendance_records.iter().find(|r| r.date == date)
    }
}
