use std::cmp::Ordering;
use std::sync::Arc;

use crate::{
    data::CatalogSnapshot,
    models::{CourseRecommendation, ACADEMIC_PATH},
};

use super::{
    eligibility::check_prerequisites,
    scoring::{priority_score, round_score, Jitter, UniformJitter},
};

/// Default cap on recommendations per student
pub const TOP_K: usize = 7;

/// Ranks the courses a student can and should take next
///
/// For every active course the student has not completed and whose
/// prerequisites are met, computes a priority score, then returns the
/// highest-scoring `top_k` in descending order.
#[derive(Clone)]
pub struct Recommender {
    jitter: Arc<dyn Jitter>,
    top_k: usize,
}

impl Default for Recommender {
    fn default() -> Self {
        Self::new(Arc::new(UniformJitter), TOP_K)
    }
}

impl Recommender {
    pub fn new(jitter: Arc<dyn Jitter>, top_k: usize) -> Self {
        Self { jitter, top_k }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Never fails: unknown students and malformed cells fall back to defaults
    pub fn recommend(&self, snapshot: &CatalogSnapshot, student_id: &str) -> Vec<CourseRecommendation> {
        let completed = snapshot.completed_course_ids(student_id);
        let student = snapshot.student_profile(student_id);

        let mut recommendations: Vec<CourseRecommendation> = snapshot
            .courses()
            .iter()
            .filter(|course| !completed.contains(&course.course_id))
            .filter(|course| !course.is_inactive())
            .filter_map(|course| {
                let eligibility = check_prerequisites(course, &completed, snapshot.code_index());
                if !eligibility.eligible {
                    return None;
                }

                let priority = priority_score(course, &student, self.jitter.as_ref());
                let mut reason = eligibility.explanation;
                if !priority.reasons.is_empty() {
                    reason.push_str(" | ");
                    reason.push_str(&priority.reasons);
                }

                Some(CourseRecommendation {
                    course_id: course.course_id.clone(),
                    course_code: course.course_code.clone(),
                    course_name: course.course_name.clone(),
                    score: round_score(priority.score),
                    reason,
                    recommendation_type: ACADEMIC_PATH.to_string(),
                    location: course.location.clone(),
                    instructor: course.instructor.clone(),
                })
            })
            .collect();

        let eligible = recommendations.len();

        // Stable: equal scores keep catalog order
        recommendations.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        recommendations.truncate(self.top_k);

        tracing::info!(
            student_id,
            semester = student.semester,
            completed = completed.len(),
            eligible,
            returned = recommendations.len(),
            "Recommendations computed"
        );

        recommendations
    }
}
