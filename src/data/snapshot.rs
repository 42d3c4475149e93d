use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::models::{Course, StudentProfile, Table};
use crate::services::{completion, index::CodeIndex, repair, student_lookup};

/// Id columns normalized on the student, enrollment and academic tables
const ID_COLUMNS: [&str; 3] = ["student_id", "course_id", "course_code"];

/// The four input tables as handed over by a [`TableSource`](super::TableSource)
#[derive(Debug, Clone, Default)]
pub struct RawTables {
    pub courses: Table,
    pub students: Table,
    pub enrollments: Table,
    /// Empty when the source has no academic records
    pub academic_records: Table,
}

/// Immutable, repaired view of the catalog used to serve requests
#[derive(Debug)]
pub struct CatalogSnapshot {
    courses: Vec<Course>,
    index: CodeIndex,
    students: Table,
    enrollments: Table,
    academic_records: Table,
    loaded_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    /// Repairs the course table, then derives the typed catalog and code index
    pub fn build(raw: RawTables) -> Self {
        let repaired = repair::repair(raw.courses);
        let all_courses: Vec<Course> = repaired.rows().map(|row| Course::from_row(&row)).collect();

        // Every repaired row feeds the index, so a duplicate's code still resolves
        let index = CodeIndex::build(&all_courses);

        let mut seen = HashSet::new();
        let mut courses = Vec::with_capacity(all_courses.len());
        for course in all_courses {
            if seen.insert(course.course_id.clone()) {
                courses.push(course);
            } else {
                tracing::warn!(course_id = %course.course_id, "Dropping duplicate course id");
            }
        }

        let snapshot = Self {
            courses,
            index,
            students: normalize_ids(raw.students),
            enrollments: normalize_ids(raw.enrollments),
            academic_records: normalize_ids(raw.academic_records),
            loaded_at: Utc::now(),
        };

        tracing::info!(
            courses = snapshot.courses.len(),
            codes = snapshot.index.len(),
            students = snapshot.students.len(),
            enrollments = snapshot.enrollments.len(),
            academic_records = snapshot.academic_records.len(),
            "Catalog snapshot built"
        );

        snapshot
    }

    /// Courses in catalog order, unique by id
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn code_index(&self) -> &CodeIndex {
        &self.index
    }

    pub fn student_count(&self) -> usize {
        self.students.len()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn completed_course_ids(&self, student_id: &str) -> HashSet<String> {
        completion::completed_course_ids(student_id, &self.academic_records, &self.enrollments)
    }

    pub fn student_profile(&self, student_id: &str) -> StudentProfile {
        student_lookup::student_profile(&self.students, student_id)
    }
}

fn normalize_ids(table: Table) -> Table {
    ID_COLUMNS
        .iter()
        .fold(table, |table, column| {
            table.map_column(column, |cell| cell.trim().to_string())
        })
}

/// Holder for the live snapshot
///
/// Readers take a cheap `Arc` clone and drop the lock immediately. A reload
/// builds the replacement off to the side and swaps it in with one write.
#[derive(Clone)]
pub struct SnapshotStore {
    current: Arc<RwLock<Arc<CatalogSnapshot>>>,
}

impl SnapshotStore {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(snapshot))),
        }
    }

    /// Returns the snapshot in service at the time of the call
    pub async fn current(&self) -> Arc<CatalogSnapshot> {
        self.current.read().await.clone()
    }

    /// Swaps in a new snapshot, returning the one it replaced
    pub async fn replace(&self, snapshot: CatalogSnapshot) -> Arc<CatalogSnapshot> {
        let mut guard = self.current.write().await;
        std::mem::replace(&mut *guard, Arc::new(snapshot))
    }
}
