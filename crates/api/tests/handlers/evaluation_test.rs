use std::collections::BTreeMap;

use axum::Json;
use chrono::Utc;
use fake::{faker::name::en::Name, Fake};
use mockall::predicate::eq;
use nest_api::middleware::error_handling::AppError;
use nest_core::{
    errors::NestError,
    models::{
        evaluation::{
            EvaluationAssignments, EvaluationCriteria, EvaluationSubmission, Team, TeamMember,
            TeamRegistrationRequest,
        },
        MessageResponse,
    },
    teams::{assign_peer_reviews, register_member, validate_scores},
};
use nest_db::models::{DbEvaluationCriteria, DbUser};
use pretty_assertions::assert_eq;
use rand::{rngs::StdRng, SeedableRng};

use crate::test_utils::TestContext;

async fn test_register_wrapper(
    ctx: &mut TestContext,
    request: TeamRegistrationRequest,
) -> Result<Json<MessageResponse>, AppError> {
    let user = ctx
        .user_repo
        .get_user_by_github_id(request.github_id.clone())
        .await?
        .ok_or_else(|| NestError::NotFound("Student not found".to_string()))?;

    let criteria = ctx
        .evaluation_repo
        .get_criteria(request.course_code.clone())
        .await?
        .ok_or_else(|| NestError::NotFound("Evaluation criteria not found".to_string()))?;
    let criteria = EvaluationCriteria::from(criteria);

    let mut teams = ctx.evaluation_repo.get_teams(request.course_code.clone()).await?;
    register_member(
        &mut teams,
        criteria.max_teams,
        TeamMember {
            student_id: user.student_id,
            name: user.name,
        },
        &request.team_name,
    )?;

    ctx.evaluation_repo
        .replace_teams(request.course_code, teams)
        .await?;

    Ok(Json(MessageResponse::new("Student registered successfully")))
}

async fn test_submit_wrapper(
    ctx: &mut TestContext,
    submission: EvaluationSubmission,
) -> Result<Json<MessageResponse>, AppError> {
    let criteria = ctx
        .evaluation_repo
        .get_criteria(submission.course_code.clone())
        .await?
        .ok_or_else(|| NestError::NotFound("Evaluation criteria not found".to_string()))?;
    validate_scores(&criteria.criteria, &submission.scores)?;

    if !ctx.evaluation_repo.insert_evaluation(submission).await? {
        return Err(AppError(NestError::Conflict(
            "You have already submitted an evaluation for this team.".to_string(),
        )));
    }

    Ok(Json(MessageResponse::new("Evaluation submitted successfully")))
}

async fn test_get_assignments_wrapper(
    ctx: &mut TestContext,
    course_code: &str,
    student_id: &str,
) -> Result<Json<EvaluationAssignments>, AppError> {
    let evaluations = ctx
        .evaluation_repo
        .get_assignments(course_code.to_string(), student_id.to_string())
        .await?
        .filter(|evaluations| !evaluations.is_empty())
        .ok_or_else(|| NestError::NotFound("Evaluations not found for the student".to_string()))?;

    Ok(Json(EvaluationAssignments { evaluations }))
}

fn user(github_id: &str, student_id: &str) -> DbUser {
    DbUser {
        github_id: github_id.to_string(),
        github_username: format!("{}-login", github_id),
        github_name: Name().fake(),
        name: Name().fake(),
        school_email: format!("{}@nest.example.edu", student_id),
        student_id: student_id.to_string(),
        age: 21,
        contact: "010-0000-0000".to_string(),
        created_at: Utc::now(),
    }
}

fn criteria(max_teams: i64) -> DbEvaluationCriteria {
    DbEvaluationCriteria {
        course_code: "CS101".to_string(),
        criteria: vec!["design".to_string(), "demo".to_string()],
        max_teams,
        created_at: Utc::now(),
    }
}

fn team(name: &str, student_ids: &[&str]) -> Team {
    Team {
        team_name: name.to_string(),
        students: student_ids
            .iter()
            .map(|id| TeamMember {
                student_id: id.to_string(),
                name: Name().fake(),
            })
            .collect(),
    }
}

fn registration(team_name: &str) -> TeamRegistrationRequest {
    TeamRegistrationRequest {
        course_code: "CS101".to_string(),
        team_name: team_name.to_string(),
        github_id: "gh-7".to_string(),
    }
}

#[tokio::test]
async fn test_register_moves_student_to_new_team() {
    let mut ctx = TestContext::new();
    ctx.user_repo
        .expect_get_user_by_github_id()
        .with(eq("gh-7".to_string()))
        .returning(|_| Ok(Some(user("gh-7", "2024007"))));
    ctx.evaluation_repo
        .expect_get_criteria()
        .returning(|_| Ok(Some(criteria(3))));
    ctx.evaluation_repo
        .expect_get_teams()
        .returning(|_| Ok(vec![team("Alpha", &["2024001", "2024007"])]));
    ctx.evaluation_repo
        .expect_replace_teams()
        .times(1)
        .returning(|course_code, teams| {
            assert_eq!(course_code, "CS101");
            assert_eq!(teams.len(), 2);
            assert_eq!(teams[0].students.len(), 1);
            assert_eq!(teams[1].team_name, "Beta");
            assert_eq!(teams[1].students[0].student_id, "2024007");
            Ok(())
        });

    let response = test_register_wrapper(&mut ctx, registration("Beta"))
        .await
        .unwrap();

    assert_eq!(response.0.message, "Student registered successfully");
}

#[tokio::test]
async fn test_register_rejects_team_over_limit() {
    let mut ctx = TestContext::new();
    ctx.user_repo
        .expect_get_user_by_github_id()
        .returning(|_| Ok(Some(user("gh-7", "2024007"))));
    ctx.evaluation_repo
        .expect_get_criteria()
        .returning(|_| Ok(Some(criteria(2))));
    ctx.evaluation_repo
        .expect_get_teams()
        .returning(|_| Ok(vec![team("Alpha", &["2024001"]), team("Beta", &["2024002"])]));
    ctx.evaluation_repo.expect_replace_teams().never();

    let result = test_register_wrapper(&mut ctx, registration("Gamma")).await;

    match result.unwrap_err().0 {
        NestError::Validation(message) => {
            assert_eq!(message, "Maximum number of teams reached for this course")
        }
        e => panic!("Expected Validation error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_register_unknown_user() {
    let mut ctx = TestContext::new();
    ctx.user_repo
        .expect_get_user_by_github_id()
        .returning(|_| Ok(None));

    let result = test_register_wrapper(&mut ctx, registration("Alpha")).await;

    assert!(matches!(result.unwrap_err().0, NestError::NotFound(_)));
}

fn submission(scores: &[(&str, i64)]) -> EvaluationSubmission {
    EvaluationSubmission {
        course_code: "CS101".to_string(),
        evaluator_id: "2024007".to_string(),
        team_name: "Alpha".to_string(),
        scores: scores
            .iter()
            .map(|(criterion, score)| (criterion.to_string(), *score))
            .collect::<BTreeMap<_, _>>(),
    }
}

#[tokio::test]
async fn test_second_submission_conflicts() {
    let mut ctx = TestContext::new();
    ctx.evaluation_repo
        .expect_get_criteria()
        .returning(|_| Ok(Some(criteria(3))));
    let mut first = true;
    ctx.evaluation_repo
        .expect_insert_evaluation()
        .times(2)
        .returning(move |_| Ok(std::mem::replace(&mut first, false)));

    assert!(test_submit_wrapper(&mut ctx, submission(&[("design", 4)])).await.is_ok());

    let result = test_submit_wrapper(&mut ctx, submission(&[("design", 5)])).await;
    assert!(matches!(result.unwrap_err().0, NestError::Conflict(_)));
}

#[tokio::test]
async fn test_submission_with_unknown_criterion() {
    let mut ctx = TestContext::new();
    ctx.evaluation_repo
        .expect_get_criteria()
        .returning(|_| Ok(Some(criteria(3))));
    ctx.evaluation_repo.expect_insert_evaluation().never();

    let result = test_submit_wrapper(&mut ctx, submission(&[("teamwork", 4)])).await;

    assert!(matches!(result.unwrap_err().0, NestError::Validation(_)));
}

#[tokio::test]
async fn test_start_evaluation_stores_assignments() {
    let mut ctx = TestContext::new();
    let teams = vec![
        team("Alpha", &["2024001", "2024002"]),
        team("Beta", &["2024003"]),
        team("Gamma", &["2024004"]),
    ];
    let assignments = assign_peer_reviews(&teams, &mut StdRng::seed_from_u64(11));

    ctx.evaluation_repo
        .expect_replace_assignments()
        .times(1)
        .returning(|course_code, assignments| {
            assert_eq!(course_code, "CS101");
            assert_eq!(assignments.len(), 4);
            assert!(assignments["2024001"].iter().all(|name| name != "Alpha"));
            assert_eq!(assignments["2024003"].len(), 2);
            Ok(())
        });

    ctx.evaluation_repo
        .replace_assignments("CS101".to_string(), assignments)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_assignments_returned_for_student() {
    let mut ctx = TestContext::new();
    ctx.evaluation_repo
        .expect_get_assignments()
        .with(eq("CS101".to_string()), eq("2024001".to_string()))
        .returning(|_, _| Ok(Some(vec!["Beta".to_string(), "Gamma".to_string()])));

    let response = test_get_assignments_wrapper(&mut ctx, "CS101", "2024001")
        .await
        .unwrap();

    assert_eq!(response.0.evaluations, vec!["Beta", "Gamma"]);
}

#[tokio::test]
async fn test_empty_assignments_are_not_found() {
    let mut ctx = TestContext::new();
    // A course with a single team leaves its students nothing to evaluate.
    ctx.evaluation_repo
        .expect_get_assignments()
        .returning(|_, _| Ok(Some(vec![])));

    let result = test_get_assignments_wrapper(&mut ctx, "CS101", "2024001").await;

    assert!(matches!(result.unwrap_err().0, NestError::NotFound(_)));
}
