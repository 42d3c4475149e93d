use serde::{Deserialize, Serialize};

pub mod table;

pub use table::{Row, Table};

/// Recommendation category reported for every course on the academic path
pub const ACADEMIC_PATH: &str = "academic_path";

/// Placeholder for location/instructor when the catalog has no such column
pub const TO_BE_ANNOUNCED: &str = "TBA";

/// A course row from the repaired catalog
///
/// Numeric fields stay as raw strings; the scorer parses them with
/// fallbacks so a bad cell never rejects the course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub course_id: String,
    pub course_code: String,
    pub course_name: String,
    pub credits: String,
    pub course_type: String,
    pub semester_offered: String,
    pub prerequisites: String,
    pub location: String,
    pub instructor: String,
    pub is_active: String,
}

impl Course {
    /// Builds a course from a catalog row
    ///
    /// Absent columns take the loader defaults: `course_type` is "elective",
    /// `is_active` is "1", and location/instructor are "TBA".
    pub fn from_row(row: &Row<'_>) -> Self {
        Self {
            course_id: row.get_or("course_id", "").to_string(),
            course_code: row.get_or("course_code", "").to_string(),
            course_name: row.get_or("course_name", "").to_string(),
            credits: row.get_or("credits", "").to_string(),
            course_type: row.get_or("course_type", "elective").to_string(),
            semester_offered: row.get_or("semester_offered", "").to_string(),
            prerequisites: row.get_or("prerequisites", "").to_string(),
            location: row.get_or("location", TO_BE_ANNOUNCED).to_string(),
            instructor: row.get_or("instructor", TO_BE_ANNOUNCED).to_string(),
            is_active: row.get_or("is_active", "1").to_string(),
        }
    }

    /// Inactive courses (`is_active == "0"`) are never recommended
    pub fn is_inactive(&self) -> bool {
        self.is_active == "0"
    }
}

/// Academic standing used by the scorer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StudentProfile {
    pub semester: i64,
    pub gpa: f64,
}

impl StudentProfile {
    pub const DEFAULT_SEMESTER: i64 = 1;
    pub const DEFAULT_GPA: f64 = 0.0;
}

impl Default for StudentProfile {
    fn default() -> Self {
        Self {
            semester: Self::DEFAULT_SEMESTER,
            gpa: Self::DEFAULT_GPA,
        }
    }
}

/// Request body for `POST /recommend`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecommendationRequest {
    pub student_id: String,
}

/// One ranked course recommendation returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CourseRecommendation {
    pub course_id: String,
    pub course_code: String,
    pub course_name: String,
    /// Priority score rounded to two decimals
    pub score: f64,
    pub reason: String,
    #[serde(rename = "type")]
    pub recommendation_type: String,
    pub location: String,
    pub instructor: String,
}
