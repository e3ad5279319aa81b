use mockall::predicate::eq;
use nest_api::middleware::error_handling::AppError;
use nest_core::scoring::{
    apply_points, display_title, resolution_deltas, title_for, Category, DEFAULT_TITLE,
};
use nest_db::models::DbScore;
use pretty_assertions::assert_eq;

use crate::test_utils::TestContext;

// Score adjustment done when an answer is (un)resolved, with the score table mocked.
async fn test_adjust_score_wrapper(
    ctx: &mut TestContext,
    student_id: &str,
    category: Category,
    delta: f64,
) -> Result<String, AppError> {
    let current = ctx
        .score_repo
        .get_points_for_update(student_id.to_string(), category)
        .await?
        .unwrap_or(0.0);
    let points = apply_points(current, delta);
    let title = title_for(category, points);

    ctx.score_repo
        .upsert_score(student_id.to_string(), category, points, title.clone())
        .await?;

    Ok(title)
}

async fn test_answer_title_wrapper(
    ctx: &mut TestContext,
    student_id: &str,
) -> Result<String, AppError> {
    let scores = ctx.score_repo.get_scores(student_id.to_string()).await?;

    Ok(display_title(scores.iter().map(|score| {
        (
            Category::from_label(&score.category),
            score.points,
            score.title.as_str(),
        )
    })))
}

fn score(category: &str, points: f64) -> DbScore {
    let category = Category::from_label(category);
    DbScore {
        student_id: "2024001".to_string(),
        category: category.to_string(),
        points,
        title: title_for(category, points),
    }
}

#[tokio::test]
async fn test_resolving_awards_both_users() {
    let mut ctx = TestContext::new();
    let (answer_delta, question_delta) = resolution_deltas(true);

    ctx.score_repo
        .expect_get_points_for_update()
        .with(eq("2024001".to_string()), eq(Category::Backend))
        .returning(|_, _| Ok(Some(9.5)));
    ctx.score_repo
        .expect_get_points_for_update()
        .with(eq("2024002".to_string()), eq(Category::Backend))
        .returning(|_, _| Ok(None));
    ctx.score_repo
        .expect_upsert_score()
        .times(2)
        .returning(|student_id, _, points, _| {
            match student_id.as_str() {
                "2024001" => assert_eq!(points, 10.5),
                _ => assert_eq!(points, 0.5),
            }
            Ok(())
        });

    let answer_title = test_adjust_score_wrapper(&mut ctx, "2024001", Category::Backend, answer_delta)
        .await
        .unwrap();
    let question_title =
        test_adjust_score_wrapper(&mut ctx, "2024002", Category::Backend, question_delta)
            .await
            .unwrap();

    assert_eq!(answer_title, "Intermediate Backend Developer");
    assert_eq!(question_title, "Novice Backend Developer");
}

#[tokio::test]
async fn test_unresolving_never_goes_negative() {
    let mut ctx = TestContext::new();
    let (answer_delta, _) = resolution_deltas(false);

    ctx.score_repo
        .expect_get_points_for_update()
        .returning(|_, _| Ok(Some(0.5)));
    ctx.score_repo
        .expect_upsert_score()
        .with(
            eq("2024001".to_string()),
            eq(Category::Cloud),
            eq(0.0),
            eq("Novice Cloud Engineer".to_string()),
        )
        .times(1)
        .returning(|_, _, _, _| Ok(()));

    let title = test_adjust_score_wrapper(&mut ctx, "2024001", Category::Cloud, answer_delta)
        .await
        .unwrap();

    assert_eq!(title, "Novice Cloud Engineer");
}

#[tokio::test]
async fn test_score_failure_is_database_error() {
    let mut ctx = TestContext::new();
    ctx.score_repo
        .expect_get_points_for_update()
        .returning(|_, _| Err(eyre::eyre!("connection reset")));
    ctx.score_repo.expect_upsert_score().never();

    let result = test_adjust_score_wrapper(&mut ctx, "2024001", Category::Others, 1.0).await;

    assert!(matches!(
        result.unwrap_err().0,
        nest_core::errors::NestError::Database(_)
    ));
}

#[tokio::test]
async fn test_new_user_answers_as_beginner() {
    let mut ctx = TestContext::new();
    ctx.score_repo
        .expect_get_scores()
        .returning(|_| Ok(vec![]));

    let title = test_answer_title_wrapper(&mut ctx, "2024001").await.unwrap();

    assert_eq!(title, DEFAULT_TITLE);
}

#[tokio::test]
async fn test_answer_title_uses_strongest_category() {
    let mut ctx = TestContext::new();
    ctx.score_repo.expect_get_scores().returning(|_| {
        Ok(vec![
            score("frontend", 4.0),
            score("security", 21.0),
            score("backend", 12.5),
        ])
    });

    let title = test_answer_title_wrapper(&mut ctx, "2024001").await.unwrap();

    assert_eq!(title, "Advanced Security Specialist");
}
