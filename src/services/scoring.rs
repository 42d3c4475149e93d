use std::sync::Mutex;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::models::{Course, StudentProfile};

const BASE_SCORE: f64 = 10.0;

/// Semester used when `semester_offered` does not parse; ranks last
pub const SENTINEL_SEMESTER: i64 = 99;
pub const DEFAULT_CREDITS: f64 = 3.0;

/// Upper bound (exclusive) of the tie-breaking jitter
pub const MAX_JITTER: f64 = 0.1;

/// Source of the small random addend that breaks score ties
#[cfg_attr(test, mockall::automock)]
pub trait Jitter: Send + Sync {
    /// Returns a value in `[0, MAX_JITTER)`
    fn sample(&self) -> f64;
}

/// Thread-local RNG jitter, the production default
#[derive(Debug, Default, Clone, Copy)]
pub struct UniformJitter;

impl Jitter for UniformJitter {
    fn sample(&self) -> f64 {
        rand::thread_rng().gen_range(0.0..MAX_JITTER)
    }
}

/// Reproducible jitter from a fixed seed
#[derive(Debug)]
pub struct SeededJitter {
    rng: Mutex<StdRng>,
}

impl SeededJitter {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Jitter for SeededJitter {
    fn sample(&self) -> f64 {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        rng.gen_range(0.0..MAX_JITTER)
    }
}

/// Always zero; scores become fully deterministic
#[derive(Debug, Default, Clone, Copy)]
pub struct NoJitter;

impl Jitter for NoJitter {
    fn sample(&self) -> f64 {
        0.0
    }
}

/// Priority score with the reasons that contributed to it
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityScore {
    pub score: f64,
    /// Reason fragments joined by ", "; empty when nothing beyond the base fired
    pub reasons: String,
}

/// Where a course falls relative to the student's current semester
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timing {
    Backlog,
    Current,
    Next,
    Later,
}

impl Timing {
    fn classify(course_semester: i64, student_semester: i64) -> Self {
        if course_semester < student_semester {
            Timing::Backlog
        } else if course_semester == student_semester {
            Timing::Current
        } else if course_semester == student_semester + 1 {
            Timing::Next
        } else {
            Timing::Later
        }
    }

    fn adjustment(self) -> (f64, Option<&'static str>) {
        match self {
            Timing::Backlog => (20.0, Some("Backlog/Previous Semester")),
            Timing::Current => (10.0, Some("Current Semester Path")),
            Timing::Next => (5.0, Some("Next Semester Headstart")),
            Timing::Later => (-5.0, None),
        }
    }
}

/// Parses `semester_offered`, falling back to the sentinel
pub fn course_semester(course: &Course) -> i64 {
    course
        .semester_offered
        .trim()
        .parse()
        .unwrap_or(SENTINEL_SEMESTER)
}

/// Parses `credits`, falling back to the default load
pub fn course_credits(course: &Course) -> f64 {
    course.credits.trim().parse().unwrap_or(DEFAULT_CREDITS)
}

/// Scores how desirable `course` is for a student right now
///
/// Hand-tuned heuristic: timing relative to the student's semester, a bonus
/// for core courses, and a load adjustment for students under a 2.0 GPA.
/// Jitter is added last and never shows up in the reasons.
pub fn priority_score(course: &Course, student: &StudentProfile, jitter: &dyn Jitter) -> PriorityScore {
    let mut score = BASE_SCORE;
    let mut reasons: Vec<&str> = Vec::new();

    let (delta, reason) = Timing::classify(course_semester(course), student.semester).adjustment();
    score += delta;
    reasons.extend(reason);

    if course.course_type.to_lowercase().contains("core") {
        score += 5.0;
        reasons.push("Core Course");
    }

    if student.gpa > 0.0 && student.gpa < 2.0 {
        if course_credits(course) > 3.0 {
            score -= 3.0;
            reasons.push("High Load (GPA Risk)");
        } else {
            score += 2.0;
            reasons.push("GPA Recovery");
        }
    }

    score += jitter.sample();

    PriorityScore {
        score,
        reasons: reasons.join(", "),
    }
}

/// Rounds a score to two decimals for presentation
pub fn round_score(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}
