//! Course roster uploads.

use std::collections::HashMap;

use crate::models::course::EnrollStudentRequest;

/// What a roster upload does to the student table.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnrollmentPlan {
    /// Students that do not exist yet, with their initial course codes.
    pub create: Vec<NewStudent>,
    /// Existing students and the course codes they gain.
    pub add_codes: Vec<(String, String)>,
    /// Student ids already enrolled in the listed course.
    pub duplicates: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub student_id: String,
    pub name: String,
    pub department: String,
    pub course_codes: Vec<String>,
}

impl EnrollmentPlan {
    /// Number of existing students that gain at least one course code.
    pub fn updated_students(&self) -> usize {
        let mut ids: Vec<&str> = self.add_codes.iter().map(|(id, _)| id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }
}

/// Plans a roster upload against the course codes students already have.
///
/// `existing` maps student id to current course codes. Rows for the same
/// student inside one upload are merged, so a new student listed for two
/// courses is created once with both codes.
pub fn plan_enrollment(
    existing: &HashMap<String, Vec<String>>,
    rows: &[EnrollStudentRequest],
) -> EnrollmentPlan {
    let mut plan = EnrollmentPlan::default();

    for row in rows {
        if let Some(codes) = existing.get(&row.student_id) {
            let already_added = plan
                .add_codes
                .iter()
                .any(|(id, code)| *id == row.student_id && *code == row.course_code);

            if codes.contains(&row.course_code) || already_added {
                plan.duplicates.push(row.student_id.clone());
            } else {
                plan.add_codes
                    .push((row.student_id.clone(), row.course_code.clone()));
            }
            continue;
        }

        match plan
            .create
            .iter_mut()
            .find(|student| student.student_id == row.student_id)
        {
            Some(student) if student.course_codes.contains(&row.course_code) => {
                plan.duplicates.push(row.student_id.clone());
            }
            Some(student) => student.course_codes.push(row.course_code.clone()),
            None => plan.create.push(NewStudent {
                student_id: row.student_id.clone(),
                name: row.name.clone(),
                department: row.department.clone(),
                course_codes: vec![row.course_code.clone()],
            }),
        }
    }

    plan
}
