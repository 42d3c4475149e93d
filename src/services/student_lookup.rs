use crate::models::{Row, StudentProfile, Table};

/// One candidate key column for locating a student row
#[derive(Debug, Clone, Copy)]
pub struct KeyColumn {
    pub column: &'static str,
    /// Normalizes a cell before it is compared with the requested id
    pub normalize: fn(&str) -> String,
}

fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

/// Key columns tried in order: university-assigned id first, then internal id
pub const STUDENT_KEYS: [KeyColumn; 2] = [
    KeyColumn {
        column: "university_id",
        normalize: trimmed,
    },
    KeyColumn {
        column: "student_id",
        normalize: trimmed,
    },
];

/// Finds the first row matching `student_id` under the first key that yields one
pub fn find_student<'a>(
    students: &'a Table,
    keys: &[KeyColumn],
    student_id: &str,
) -> Option<(Row<'a>, &'static str)> {
    keys.iter()
        .filter(|key| students.has_column(key.column))
        .find_map(|key| {
            students
                .rows()
                .find(|row| {
                    row.get(key.column)
                        .is_some_and(|cell| (key.normalize)(cell) == student_id)
                })
                .map(|row| (row, key.column))
        })
}

/// Resolves the academic standing of `student_id`
///
/// An unknown student, or an unparseable semester or GPA, falls back to
/// the defaults (semester 1, GPA 0.0) so recommendations still work.
pub fn student_profile(students: &Table, student_id: &str) -> StudentProfile {
    let Some((row, matched_on)) = find_student(students, &STUDENT_KEYS, student_id) else {
        tracing::info!(student_id, "Student not found; using default profile");
        return StudentProfile::default();
    };

    let semester = row
        .get_or("semester", "")
        .trim()
        .parse()
        .unwrap_or(StudentProfile::DEFAULT_SEMESTER);
    let gpa = row
        .get_or("current_gpa", "")
        .trim()
        .parse()
        .unwrap_or(StudentProfile::DEFAULT_GPA);

    tracing::debug!(
        student_id,
        matched_on,
        name = row.get_or("student_name", "Unknown"),
        semester,
        gpa,
        "Resolved student profile"
    );

    StudentProfile { semester, gpa }
}
