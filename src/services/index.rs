use std::collections::HashMap;

use crate::models::Course;

/// Lookup from human-facing course code to internal course id
///
/// Built once from the repaired catalog. Duplicate codes keep the last
/// mapping seen; the duplicate count is logged at build time.
#[derive(Debug, Clone, Default)]
pub struct CodeIndex {
    code_to_id: HashMap<String, String>,
}

impl CodeIndex {
    pub fn build(courses: &[Course]) -> Self {
        let mut code_to_id = HashMap::with_capacity(courses.len());
        let mut duplicates = 0usize;

        for course in courses {
            if code_to_id
                .insert(course.course_code.clone(), course.course_id.clone())
                .is_some()
            {
                duplicates += 1;
            }
        }

        if duplicates > 0 {
            tracing::warn!(duplicates, "Duplicate course codes; last mapping wins");
        }

        Self { code_to_id }
    }

    /// Resolves a code to its course id; empty ids count as unresolved
    pub fn resolve(&self, code: &str) -> Option<&str> {
        self.code_to_id
            .get(code)
            .map(String::as_str)
            .filter(|id| !id.is_empty())
    }

    pub fn len(&self) -> usize {
        self.code_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code_to_id.is_empty()
    }
}
