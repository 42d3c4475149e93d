use std::collections::HashSet;

use crate::models::{Row, Table};

const FAILING_GRADE: &str = "F";
const COMPLETED_STATUS: &str = "completed";

/// Status column names in order of preference
const STATUS_COLUMNS: [&str; 2] = ["enrollment_status", "status"];

/// Course ids a student has passed, from either source of truth
///
/// The result is the union of passing academic records and completed
/// enrollments. Missing tables or columns contribute nothing.
pub fn completed_course_ids(
    student_id: &str,
    academic_records: &Table,
    enrollments: &Table,
) -> HashSet<String> {
    let mut completed: HashSet<String> = passed_records(student_id, academic_records).collect();
    completed.extend(completed_enrollments(student_id, enrollments));
    completed
}

fn rows_for_student<'a>(
    student_id: &'a str,
    table: &'a Table,
) -> impl Iterator<Item = Row<'a>> + 'a {
    table
        .rows()
        .filter(move |row| row.get("student_id").map(str::trim) == Some(student_id))
}

fn passed_records<'a>(
    student_id: &'a str,
    records: &'a Table,
) -> impl Iterator<Item = String> + 'a {
    let has_grade = records.has_column("grade");

    rows_for_student(student_id, records)
        .filter(move |_| has_grade)
        .filter(|row| !is_failing(row.get_or("grade", "")))
        .filter_map(|row| row.get("course_id").map(str::to_string))
}

fn completed_enrollments<'a>(
    student_id: &'a str,
    enrollments: &'a Table,
) -> impl Iterator<Item = String> + 'a {
    let status_column = STATUS_COLUMNS
        .into_iter()
        .find(|column| enrollments.has_column(column));

    rows_for_student(student_id, enrollments)
        .filter_map(move |row| status_column.map(|column| (row, column)))
        .filter(|(row, column)| row.get_or(column, "").eq_ignore_ascii_case(COMPLETED_STATUS))
        .filter(|(row, _)| !is_failing(row.get_or("final_grade", "")))
        .filter_map(|(row, _)| row.get("course_id").map(str::to_string))
}

fn is_failing(grade: &str) -> bool {
    grade.trim().eq_ignore_ascii_case(FAILING_GRADE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn academic() -> Table {
        Table::from_rows(
            &["student_id", "course_id", "grade"],
            &[
                &["S1", "1", "A"],
                &["S1", "2", "f"],
                &["S2", "3", "B"],
            ],
        )
    }

    fn enrollments() -> Table {
        Table::from_rows(
            &["student_id", "course_id", "enrollment_status", "final_grade"],
            &[
                &["S1", "4", "Completed", "B+"],
                &["S1", "5", "completed", "F"],
                &["S1", "6", "enrolled", ""],
                &["S1", "1", "COMPLETED", ""],
            ],
        )
    }

    #[test]
    fn test_union_of_both_sources() {
        let completed = completed_course_ids("S1", &academic(), &enrollments());
        let expected: HashSet<String> = ["1", "4"].iter().map(|s| s.to_string()).collect();
        assert_eq!(completed, expected);
    }

    #[test]
    fn test_academic_record_only_counts() {
        let completed = completed_course_ids("S2", &academic(), &Table::default());
        assert!(completed.contains("3"));
        assert_eq!(completed.len(), 1);
    }

    #[test]
    fn test_falls_back_to_status_column() {
        let enrollments = Table::from_rows(
            &["student_id", "course_id", "status"],
            &[&["S1", "9", "completed"]],
        );
        let completed = completed_course_ids("S1", &Table::default(), &enrollments);
        assert!(completed.contains("9"));
    }

    #[test]
    fn test_no_status_column_contributes_nothing() {
        let enrollments = Table::from_rows(
            &["student_id", "course_id", "final_grade"],
            &[&["S1", "9", "A"]],
        );
        let completed = completed_course_ids("S1", &Table::default(), &enrollments);
        assert!(completed.is_empty());
    }

    #[test]
    fn test_empty_tables_yield_empty_set() {
        let completed = completed_course_ids("S1", &Table::default(), &Table::default());
        assert!(completed.is_empty());
    }

    #[test]
    fn test_student_id_matches_after_trim() {
        let records = Table::from_rows(
            &["student_id", "course_id", "grade"],
            &[&[" S1 ", "1", "A"]],
        );
        let completed = completed_course_ids("S1", &records, &Table::default());
        assert!(completed.contains("1"));
    }
}
