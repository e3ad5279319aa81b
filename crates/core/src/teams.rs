//! Course teams and peer evaluation.
//!
//! Students form named teams inside a course, then each student evaluates a
//! few teams other than their own against the course's criteria.

use std::collections::{BTreeMap, HashSet};

use rand::Rng;
use rand::seq::SliceRandom;

use crate::errors::{NestError, NestResult};
use crate::models::evaluation::{Team, TeamMember, TeamProgress, TeamResult};

/// Number of other teams each student is asked to evaluate.
pub const PEER_REVIEWS_PER_STUDENT: usize = 3;

/// Highest score a single criterion can receive; the lowest is 0.
pub const MAX_SCORE: i64 = 100;

/// Puts `member` into the team called `team_name`.
///
/// The student leaves any other team of the course first. Joining an existing
/// team always succeeds; creating a new one fails once the course has
/// `max_teams` teams. On error `teams` is left untouched.
pub fn register_member(
    teams: &mut Vec<Team>,
    max_teams: u32,
    member: TeamMember,
    team_name: &str,
) -> NestResult<()> {
    let team_name = team_name.trim();
    if team_name.is_empty() {
        return Err(NestError::Validation("Team name must not be empty".to_string()));
    }

    let team_exists = teams.iter().any(|team| team.team_name == team_name);
    if !team_exists && teams.len() >= max_teams as usize {
        return Err(NestError::Validation(
            "Maximum number of teams reached for this course".to_string(),
        ));
    }

    for team in teams.iter_mut() {
        team.students
            .retain(|student| student.student_id != member.student_id);
    }

    match teams.iter_mut().find(|team| team.team_name == team_name) {
        Some(team) => team.students.push(member),
        None => teams.push(Team {
            team_name: team_name.to_string(),
            students: vec![member],
        }),
    }

    Ok(())
}

/// Assigns every student up to [`PEER_REVIEWS_PER_STUDENT`] distinct teams to
/// evaluate, never their own. Keyed by student id.
pub fn assign_peer_reviews<R: Rng + ?Sized>(
    teams: &[Team],
    rng: &mut R,
) -> BTreeMap<String, Vec<String>> {
    let mut assignments = BTreeMap::new();

    for team in teams {
        let others: Vec<&str> = teams
            .iter()
            .map(|other| other.team_name.as_str())
            .filter(|name| *name != team.team_name)
            .collect();
        let count = others.len().min(PEER_REVIEWS_PER_STUDENT);

        for student in &team.students {
            let picked = others
                .choose_multiple(rng, count)
                .map(|name| name.to_string())
                .collect();
            assignments.insert(student.student_id.clone(), picked);
        }
    }

    assignments
}

/// Rejects scores for criteria the course does not define and scores outside
/// `0..=MAX_SCORE`.
pub fn validate_scores(criteria: &[String], scores: &BTreeMap<String, i64>) -> NestResult<()> {
    if scores.is_empty() {
        return Err(NestError::Validation("At least one score is required".to_string()));
    }

    let known: HashSet<&str> = criteria.iter().map(String::as_str).collect();
    if let Some(unknown) = scores.keys().find(|criterion| !known.contains(criterion.as_str())) {
        return Err(NestError::Validation(format!(
            "Unknown evaluation criterion '{}'",
            unknown
        )));
    }

    match scores
        .iter()
        .find(|(_, score)| !(0..=MAX_SCORE).contains(*score))
    {
        Some((criterion, score)) => Err(NestError::Validation(format!(
            "Score {} for '{}' must be between 0 and {}",
            score, criterion, MAX_SCORE
        ))),
        None => Ok(()),
    }
}

/// Sums each criterion over all submitted evaluations of a team. Sums
/// saturate instead of overflowing.
pub fn criterion_totals<'a, I>(evaluations: I) -> BTreeMap<String, i64>
where
    I: IntoIterator<Item = &'a BTreeMap<String, i64>>,
{
    let mut totals = BTreeMap::new();
    for scores in evaluations {
        for (criterion, score) in scores {
            let total = totals.entry(criterion.clone()).or_insert(0i64);
            *total = total.saturating_add(*score);
        }
    }
    totals
}

/// Per-criterion and grand totals for one team.
pub fn team_progress<'a, I>(team_name: &str, evaluations: I) -> TeamProgress
where
    I: IntoIterator<Item = &'a BTreeMap<String, i64>>,
{
    let total_scores = criterion_totals(evaluations);
    let total_score = total_scores
        .values()
        .fold(0i64, |total, score| total.saturating_add(*score));

    TeamProgress {
        team_name: team_name.to_string(),
        total_scores,
        total_score,
    }
}

/// Progress of every evaluated team, in order of first submission.
///
/// Takes `(team_name, scores)` pairs; teams without submissions do not appear.
pub fn tally_by_team<I>(evaluations: I) -> Vec<TeamProgress>
where
    I: IntoIterator<Item = (String, BTreeMap<String, i64>)>,
{
    let mut grouped: Vec<(String, Vec<BTreeMap<String, i64>>)> = Vec::new();

    for (team_name, scores) in evaluations {
        match grouped.iter_mut().find(|(name, _)| *name == team_name) {
            Some((_, team_scores)) => team_scores.push(scores),
            None => grouped.push((team_name, vec![scores])),
        }
    }

    grouped
        .iter()
        .map(|(team_name, scores)| team_progress(team_name, scores))
        .collect()
}

impl From<TeamProgress> for TeamResult {
    fn from(progress: TeamProgress) -> Self {
        TeamResult {
            team_name: progress.team_name,
            total_score: progress.total_score,
        }
    }
}
