use std::collections::HashSet;

use crate::models::Course;

use super::index::CodeIndex;

/// Prerequisite cells that mean "no prerequisites" (compared case-insensitively)
const EMPTY_MARKERS: [&str; 3] = ["", "nan", "none"];

/// Outcome of a prerequisite check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eligibility {
    pub eligible: bool,
    pub explanation: String,
}

impl Eligibility {
    fn met(explanation: &str) -> Self {
        Self {
            eligible: true,
            explanation: explanation.to_string(),
        }
    }
}

/// True when the whole prerequisite cell is one of the "no prerequisites" markers
pub fn has_no_prerequisites(raw: &str) -> bool {
    let raw = raw.trim();
    EMPTY_MARKERS
        .iter()
        .any(|marker| raw.eq_ignore_ascii_case(marker))
}

/// Splits a prerequisite cell on `,` and `;` into trimmed, non-empty codes
pub fn parse_prerequisites(raw: &str) -> Vec<&str> {
    raw.split([',', ';'])
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .collect()
}

/// Checks whether every prerequisite of `course` has been completed
///
/// A code that is not in the catalog index cannot be checked and is
/// treated as satisfied. Only known, uncompleted codes are reported missing.
pub fn check_prerequisites(
    course: &Course,
    completed: &HashSet<String>,
    index: &CodeIndex,
) -> Eligibility {
    if has_no_prerequisites(&course.prerequisites) {
        return Eligibility::met("No prerequisites");
    }

    let missing: Vec<&str> = parse_prerequisites(&course.prerequisites)
        .into_iter()
        .filter(|code| {
            index
                .resolve(code)
                .is_some_and(|id| !completed.contains(id))
        })
        .collect();

    if missing.is_empty() {
        Eligibility::met("Prerequisites met")
    } else {
        Eligibility {
            eligible: false,
            explanation: format!("Missing: {}", missing.join(", ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Table;

    fn catalog() -> (Vec<Course>, CodeIndex) {
        let table = Table::from_rows(
            &["course_id", "course_code", "prerequisites"],
            &[
                &["1", "CS101", ""],
                &["2", "CS102", "CS101"],
                &["3", "CS201", "CS101; CS102"],
                &["4", "CS301", "CS201, MATH900"],
            ],
        );
        let courses: Vec<Course> = table.rows().map(|row| Course::from_row(&row)).collect();
        let index = CodeIndex::build(&courses);
        (courses, index)
    }

    fn completed(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_markers_mean_no_prerequisites() {
        let (mut courses, index) = catalog();
        for marker in ["", "NaN", "None", "none", "  nan  "] {
            courses[0].prerequisites = marker.to_string();
            let result = check_prerequisites(&courses[0], &completed(&[]), &index);
            assert!(result.eligible, "marker {marker:?}");
            assert_eq!(result.explanation, "No prerequisites");
        }
    }

    #[test]
    fn test_missing_prerequisites_listed_in_order() {
        let (courses, index) = catalog();
        let result = check_prerequisites(&courses[2], &completed(&[]), &index);
        assert!(!result.eligible);
        assert_eq!(result.explanation, "Missing: CS101, CS102");
    }

    #[test]
    fn test_prerequisites_met() {
        let (courses, index) = catalog();
        let result = check_prerequisites(&courses[2], &completed(&["1", "2"]), &index);
        assert_eq!(result, Eligibility::met("Prerequisites met"));
    }

    #[test]
    fn test_unknown_codes_are_not_missing() {
        let (courses, index) = catalog();
        let result = check_prerequisites(&courses[3], &completed(&["3"]), &index);
        assert!(result.eligible);
        assert_eq!(result.explanation, "Prerequisites met");
    }

    #[test]
    fn test_parse_prerequisites_mixed_separators() {
        assert_eq!(
            parse_prerequisites(" CS101 ;CS102,, ; MATH200 "),
            vec!["CS101", "CS102", "MATH200"]
        );
        assert!(parse_prerequisites(" ; , ").is_empty());
    }

    #[test]
    fn test_separator_only_cell_counts_as_met() {
        let (mut courses, index) = catalog();
        courses[1].prerequisites = " ; ".to_string();
        let result = check_prerequisites(&courses[1], &completed(&[]), &index);
        assert_eq!(result, Eligibility::met("Prerequisites met"));
        assert!(!has_no_prerequisites(" ; "));
    }
}
