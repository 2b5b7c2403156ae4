use serde::Serialize;

use crate::scoring::ScoreBreakdown;

/// A document paired with its score breakdown for one profile snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredDocument<T> {
	#[serde(flatten)]
	pub document: T,
	pub scores: ScoreBreakdown,
}

/// Sorts by final score, highest first. The sort is stable: equal scores keep their input order.
pub fn rank<T>(mut scored: Vec<ScoredDocument<T>>) -> Vec<ScoredDocument<T>> {
	scored.sort_by(|a, b| b.scores.final_score.total_cmp(&a.scores.final_score));

	scored
}
