use crate::ledger::{display_percentage, student_attendance_percentage};
use crate::model::{AttendanceRecord, ClassWithStudents};
use crate::persistence::{PersistenceError, PersistenceResult};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

const DATE_FORMAT: &str = "%Y-%m-%d";

fn csv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer)
}

fn records_by_date(cls: &ClassWithStudents) -> Vec<&AttendanceRecord> {
    let mut records: Vec<&AttendanceRecord> = cls.attendance_records.iter().collect();
    records.sort_by_key(|r| r.date);
    records
}

/// Writes the attendance sheet for `cls`: one header line with every record
/// date in ascending order, then one line per student in roster order.
pub fn write_attendance_csv<W: Write>(
    cls: &ClassWithStudents,
    writer: W,
) -> PersistenceResult<()> {
    let records = records_by_date(cls);
    let mut out = csv_writer(writer);

    let mut header = Vec::with_capacity(records.len() + 3);
    header.push("Student Name".to_string());
    header.push("Email".to_string());
    header.extend(records.iter().map(|r| r.date.format(DATE_FORMAT).to_string()));
    header.push("Overall Attendance".to_string());
    out.write_record(&header)?;

    for student in &cls.students {
        let mut row = Vec::with_capacity(header.len());
        row.push(student.name.clone());
        row.push(student.email.clone());
        row.extend(
            records
                .iter()
                .map(|r| r.status_for(&student.id).as_str().to_string()),
        );
        let overall = student_attendance_percentage(cls, &student.id);
        row.push(format!("{}%", display_percentage(overall)));
        out.write_record(&row)?;
    }

    out.flush()?;
    Ok(())
}

pub fn render_attendance_csv(cls: &ClassWithStudents) -> PersistenceResult<String> {
    let mut buffer = Vec::new();
    write_attendance_csv(cls, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|err| PersistenceError::InvalidData(format!("csv output is not utf-8: {err}")))
}

/// `{className}_attendance.csv`, with path separators in the class name replaced.
pub fn export_file_name(cls: &ClassWithStudents) -> String {
    let safe_name: String = cls
        .class_name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{safe_name}_attendance.csv")
}

/// Writes a new CSV file for `cls` into `dir` and returns its path. A file left
/// behind by a failed write is not removed.
pub fn export_to_csv<P: AsRef<Path>>(
    cls: &ClassWithStudents,
    dir: P,
) -> PersistenceResult<PathBuf> {
    let path = dir.as_ref().join(export_file_name(cls));
    let file = File::create(&path)?;
    write_attendance_csv(cls, file).inspect_err(|err| {
        tracing::warn!(path = %path.display(), error = %err, "attendance export failed");
    })?;
    tracing::info!(
        class_id = %cls.class_id,
        path = %path.display(),
        students = cls.students.len(),
        records = cls.attendance_records.len(),
        "exported attendance"
    );
    Ok(path)
}
