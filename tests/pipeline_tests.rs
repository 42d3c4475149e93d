use std::collections::HashSet;
use std::sync::Arc;

use course_recommender::{
    data::{CatalogSnapshot, CsvDirectorySource, TableSource},
    models::CourseRecommendation,
    services::{NoJitter, Recommender, SeededJitter},
};

// Exported with the column-shift corruption: course_id holds the code,
// course_code the name and course_name the credits. CS103 additionally has
// a split quoted location.
const COURSES_CSV: &str = "\
course_id,course_code,course_name,credits,course_type,semester_offered,prerequisites,location,instructor,is_active,course_description
CS101,Intro to Programming,3,,Core,1,,Hall A,Dr. Smith,1,
CS102,Data Structures,3,,Core,2,CS101,Hall B,Dr. Jones,1,
CS103,Discrete Math,3,,Core,Dr. Lee,,N'Main Hall,Room 5',1,2
CS201,Algorithms,4,,Core,3,CS102;CS103,Lab 1,Dr. Kim,1,
CS210,Databases,3,,elective,3,CS102,Lab 2,Dr. Park,0,
MA101,Calculus I,4,,Core,1,none,Hall C,Dr. Noor,1,
MA102,Calculus II,4,,Core,2,MA101,Hall C,Dr. Noor,1,
EN101,Academic English,2,,elective,1,NaN,Hall D,Ms. Rana,1,
CS150,Web Basics,3,,elective,2,,Lab 3,Dr. Ali,1,
PH101,Physics I,3,,elective,2,PHX999,Hall E,Dr. Sami,1,
CS301,Operating Systems,4,,Core,5,CS201,Lab 4,Dr. Kim,1,
";

const STUDENTS_CSV: &str = "\
student_id,university_id,student_name,semester,current_gpa
1,CS2024001,Amal,2,1.5
2,CS2024002,Omar,3,3.0
";

const ENROLLMENTS_CSV: &str = "\
student_id,course_id,enrollment_status,final_grade
CS2024001,3,Completed,B
CS2024002,1,enrolled,
";

const ACADEMIC_CSV: &str = "\
student_id,course_id,grade
CS2024001,1,A
CS2024001,6,F
";

async fn load_snapshot(with_academic: bool) -> CatalogSnapshot {
    let dir = tempfile::tempdir().unwrap();
    let write = |name: &str, content: &str| std::fs::write(dir.path().join(name), content).unwrap();
    write("courses.csv", COURSES_CSV);
    write("students.csv", STUDENTS_CSV);
    write("enrollments.csv", ENROLLMENTS_CSV);
    if with_academic {
        write("academic_records.csv", ACADEMIC_CSV);
    }

    let source = CsvDirectorySource::new(dir.path());
    CatalogSnapshot::build(source.load().await.unwrap())
}

fn ids(recs: &[CourseRecommendation]) -> Vec<&str> {
    recs.iter().map(|r| r.course_id.as_str()).collect()
}

fn assert_well_formed(snapshot: &CatalogSnapshot, student_id: &str, recs: &[CourseRecommendation]) {
    assert!(recs.len() <= 7);

    let unique: HashSet<&str> = ids(recs).into_iter().collect();
    assert_eq!(unique.len(), recs.len(), "duplicate course in {recs:?}");

    let completed = snapshot.completed_course_ids(student_id);
    for rec in recs {
        assert!(!completed.contains(&rec.course_id), "completed course {}", rec.course_id);
    }

    let inactive: HashSet<&str> = snapshot
        .courses()
        .iter()
        .filter(|c| c.is_inactive())
        .map(|c| c.course_id.as_str())
        .collect();
    assert!(recs.iter().all(|r| !inactive.contains(r.course_id.as_str())));

    assert!(recs.windows(2).all(|w| w[0].score >= w[1].score));
}

#[tokio::test]
async fn test_repair_runs_before_indexing() {
    let snapshot = load_snapshot(true).await;
    let courses = snapshot.courses();

    assert_eq!(courses.len(), 11);
    assert_eq!(courses[0].course_id, "1");
    assert_eq!(courses[0].course_code, "CS101");
    assert_eq!(courses[0].course_name, "Intro to Programming");
    assert_eq!(courses[0].credits, "3");

    assert_eq!(courses[2].location, "Main Hall,Room 5");
    assert_eq!(courses[2].instructor, "Dr. Lee");
    assert_eq!(courses[2].semester_offered, "2");

    assert_eq!(snapshot.code_index().resolve("CS201"), Some("4"));
}

#[tokio::test]
async fn test_recommendations_for_struggling_student() {
    let snapshot = load_snapshot(true).await;
    let recommender = Recommender::new(Arc::new(NoJitter), 7);

    let recs = recommender.recommend(&snapshot, "CS2024001");
    assert_well_formed(&snapshot, "CS2024001", &recs);

    // CS101 passed on record, CS103 completed by enrollment, MA101 failed
    assert_eq!(ids(&recs), vec!["6", "8", "2", "9", "10"]);

    assert_eq!(recs[0].course_code, "MA101");
    assert_eq!(recs[0].score, 32.0);
    assert_eq!(
        recs[0].reason,
        "No prerequisites | Backlog/Previous Semester, Core Course, High Load (GPA Risk)"
    );

    assert_eq!(recs[2].course_code, "CS102");
    assert_eq!(recs[2].score, 27.0);
    assert_eq!(
        recs[2].reason,
        "Prerequisites met | Current Semester Path, Core Course, GPA Recovery"
    );

    // PHX999 is not in the catalog and does not block PH101
    assert_eq!(recs[4].course_code, "PH101");
    assert!(recs[4].reason.starts_with("Prerequisites met"));
}

#[tokio::test]
async fn test_academic_record_alone_marks_completion() {
    let with_records = load_snapshot(true).await;
    let without_records = load_snapshot(false).await;
    let recommender = Recommender::new(Arc::new(NoJitter), 7);

    let recs = recommender.recommend(&with_records, "CS2024001");
    assert!(!ids(&recs).contains(&"1"));

    // Without academic_records.csv, CS101 is recommended again
    let recs = recommender.recommend(&without_records, "CS2024001");
    assert!(ids(&recs).contains(&"1"));
}

#[tokio::test]
async fn test_all_students_get_well_formed_results() {
    let snapshot = load_snapshot(true).await;
    let recommender = Recommender::new(Arc::new(SeededJitter::new(7)), 7);

    for student_id in ["CS2024001", "CS2024002", "1", "NO_SUCH_ID", ""] {
        let recs = recommender.recommend(&snapshot, student_id);
        assert_well_formed(&snapshot, student_id, &recs);
        assert!(!ids(&recs).contains(&"5"), "inactive course recommended");
    }
}

#[tokio::test]
async fn test_unknown_student_uses_first_semester_defaults() {
    let snapshot = load_snapshot(true).await;
    let recommender = Recommender::new(Arc::new(NoJitter), 7);

    let recs = recommender.recommend(&snapshot, "NO_SUCH_ID");
    assert_well_formed(&snapshot, "NO_SUCH_ID", &recs);

    // Semester 1, GPA 0: first-semester core courses lead, no GPA adjustments
    assert_eq!(recs[0].course_code, "CS101");
    assert_eq!(recs[0].score, 25.0);
    assert!(recs.iter().all(|r| !r.reason.contains("GPA")));
}

#[tokio::test]
async fn test_loader_requires_course_table() {
    let dir = tempfile::tempdir().unwrap();
    let result = CsvDirectorySource::new(dir.path()).load().await;
    assert!(result.is_err());
}
