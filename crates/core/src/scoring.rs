//! Q&A reputation: points per category and the titles they unlock.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Title shown next to answers of users that have no score yet.
pub const DEFAULT_TITLE: &str = "Beginner";

/// Points awarded to the author of an answer when it is marked resolved.
pub const ANSWER_POINTS: f64 = 1.0;

/// Points awarded to the author of the question when one of its answers is
/// marked resolved.
pub const QUESTION_POINTS: f64 = 0.5;

/// Question categories that carry a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Backend,
    Frontend,
    Security,
    Network,
    Cloud,
    Others,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Backend,
        Category::Frontend,
        Category::Security,
        Category::Network,
        Category::Cloud,
        Category::Others,
    ];

    /// Maps a free-form category label to a scored category.
    ///
    /// Matching ignores case and surrounding whitespace; unknown labels fall
    /// into `Others`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "backend" => Category::Backend,
            "frontend" => Category::Frontend,
            "security" => Category::Security,
            "network" => Category::Network,
            "cloud" => Category::Cloud,
            _ => Category::Others,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Backend => "backend",
            Category::Frontend => "frontend",
            Category::Security => "security",
            Category::Network => "network",
            Category::Cloud => "cloud",
            Category::Others => "others",
        }
    }

    fn role(&self) -> &'static str {
        match self {
            Category::Backend => "Backend Developer",
            Category::Frontend => "Frontend Developer",
            Category::Security => "Security Specialist",
            Category::Network => "Network Engineer",
            Category::Cloud => "Cloud Engineer",
            Category::Others => "IT Specialist",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rank thresholds, highest first.
const RANKS: [(f64, &str); 4] = [
    (50.0, "Expert"),
    (20.0, "Advanced"),
    (10.0, "Intermediate"),
    (0.0, "Novice"),
];

/// Title earned with `points` in `category`, e.g. "Advanced Cloud Engineer".
pub fn title_for(category: Category, points: f64) -> String {
    let rank = RANKS
        .iter()
        .find(|(threshold, _)| points >= *threshold)
        .map(|(_, rank)| *rank)
        .unwrap_or("Novice");

    format!("{} {}", rank, category.role())
}

/// Applies a point change, never going below zero.
pub fn apply_points(current: f64, delta: f64) -> f64 {
    (current + delta).max(0.0)
}

/// Point changes `(answerer, asker)` for toggling an answer to `resolved`.
pub fn resolution_deltas(resolved: bool) -> (f64, f64) {
    if resolved {
        (ANSWER_POINTS, QUESTION_POINTS)
    } else {
        (-ANSWER_POINTS, -QUESTION_POINTS)
    }
}

/// Picks the title a user displays on new answers: the title of the category
/// with the most points, ties going to the earlier category. Users without any
/// score get [`DEFAULT_TITLE`].
pub fn display_title<'a, I>(scores: I) -> String
where
    I: IntoIterator<Item = (Category, f64, &'a str)>,
{
    let mut best: Option<(Category, f64, &str)> = None;

    for (category, points, title) in scores {
        best = match best {
            Some((best_category, best_points, _))
                if best_points > points || (best_points == points && best_category < category) =>
            {
                best
            }
            _ => Some((category, points, title)),
        };
    }

    best.map(|(_, _, title)| title.to_string())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}
