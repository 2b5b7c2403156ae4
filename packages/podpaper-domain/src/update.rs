//! Online adaptation of a preference profile from single feedback events.

use serde::Serialize;

use crate::{
	Result,
	document::DocumentEmbeddedFacets,
	embedding::EmbeddedTerm,
	profile::{Polarity, PreferenceProfile, ProfileBucket, WeightedTerm},
	similarity,
};
use podpaper_config::{Feedback, RelatedMode};

/// How each incoming term of one collection was absorbed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReinforcementReport {
	pub matched: usize,
	pub related: usize,
	pub appended: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeedbackReport {
	pub polarity: Polarity,
	pub tags: ReinforcementReport,
	pub target: ReinforcementReport,
}

enum Hit {
	Match(usize),
	Related(usize),
}

/// Merges `incoming` terms into `existing`, one at a time and in order.
///
/// Each incoming term is compared with the collection as it stands, including terms appended
/// earlier in the same call. The scan stops at the first existing term whose similarity exceeds
/// the related threshold; that term is reinforced by `match_weight` when its similarity also
/// exceeds the match threshold, otherwise it gets the related treatment of `related_mode`. An
/// incoming term that hits nothing is appended.
///
/// Weights are not renormalized here. See [`normalize_weights`].
pub fn reinforce_terms(
	incoming: &[EmbeddedTerm],
	existing: &mut Vec<WeightedTerm>,
	feedback: &Feedback,
) -> Result<ReinforcementReport> {
	let mut report = ReinforcementReport::default();

	for item in incoming {
		let hit = first_hit(item, existing, feedback)?;

		match (hit, feedback.related_mode) {
			(Some(Hit::Match(index)), _) => {
				existing[index].weight *= feedback.match_weight;
				report.matched += 1;
			},
			(Some(Hit::Related(index)), RelatedMode::Reinforce) => {
				existing[index].weight *= feedback.related_weight;
				report.related += 1;
			},
			(Some(Hit::Related(_)), RelatedMode::Legacy) => {
				// A running multiplier seeded at 1.0 stays at 1.0 when squared, so the related
				// term keeps its weight and the incoming term is appended at 1.0.
				report.related += 1;

				existing.push(WeightedTerm::new(item.value.clone(), 1.0, item.embedding.clone()));
				report.appended += 1;
			},
			(None, mode) => {
				let weight = match mode {
					RelatedMode::Reinforce => feedback.append_weight,
					RelatedMode::Legacy => 1.0,
				};

				existing.push(WeightedTerm::new(item.value.clone(), weight, item.embedding.clone()));
				report.appended += 1;
			},
		}
	}

	Ok(report)
}

/// Divides every weight by the largest one so the maximum becomes exactly 1.0.
///
/// Leaves the collection untouched when it is empty or no weight is positive.
pub fn normalize_weights(terms: &mut [WeightedTerm]) {
	let Some(max) = terms.iter().map(|term| term.weight).reduce(f32::max) else {
		return;
	};

	if max.is_nan() || max <= 0.0 {
		return;
	}

	for term in terms {
		term.weight /= max;
	}
}

/// Applies one liked/disliked event to the bucket selected by `polarity`.
///
/// Both collections are updated and renormalized on a copy of the bucket. The copy replaces the
/// live bucket only when every comparison succeeded, so a failed event leaves the profile as it
/// was.
pub fn apply_feedback(
	profile: &mut PreferenceProfile,
	facets: &DocumentEmbeddedFacets,
	polarity: Polarity,
	feedback: &Feedback,
) -> Result<FeedbackReport> {
	let mut staged: ProfileBucket = profile.bucket(polarity).clone();
	let tags = reinforce_terms(&facets.tags, &mut staged.tags, feedback)?;
	let target = reinforce_terms(&facets.target, &mut staged.target, feedback)?;

	normalize_weights(&mut staged.tags);
	normalize_weights(&mut staged.target);

	*profile.bucket_mut(polarity) = staged;

	Ok(FeedbackReport { polarity, tags, target })
}

fn first_hit(
	item: &EmbeddedTerm,
	existing: &[WeightedTerm],
	feedback: &Feedback,
) -> Result<Option<Hit>> {
	for (index, term) in existing.iter().enumerate() {
		let similarity = similarity::cosine_similarity(&item.embedding, &term.embedding)?;

		if similarity > feedback.match_threshold {
			return Ok(Some(Hit::Match(index)));
		}
		if similarity > feedback.related_threshold {
			return Ok(Some(Hit::Related(index)));
		}
	}

	Ok(None)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn term(value: &str, weight: f32, embedding: Vec<f32>) -> WeightedTerm {
		WeightedTerm::new(value, weight, embedding)
	}

	#[test]
	fn normalize_scales_to_unit_maximum() {
		let mut terms = vec![term("a", 2.0, vec![1.0]), term("b", 0.5, vec![1.0])];

		normalize_weights(&mut terms);

		assert_eq!(terms[0].weight, 1.0);
		assert_eq!(terms[1].weight, 0.25);
	}

	#[test]
	fn normalize_ignores_empty_and_non_positive_collections() {
		let mut empty: Vec<WeightedTerm> = Vec::new();
		let mut zeros = vec![term("a", 0.0, vec![1.0]), term("b", 0.0, vec![1.0])];

		normalize_weights(&mut empty);
		normalize_weights(&mut zeros);

		assert!(empty.is_empty());
		assert!(zeros.iter().all(|term| term.weight == 0.0));
	}

	#[test]
	fn earlier_related_term_shadows_later_match() {
		let feedback = Feedback::default();
		// Similarity 0.75 to the first term, 1.0 to the second.
		let mut existing =
			vec![term("first", 1.0, vec![0.75, 0.661_437_8]), term("second", 1.0, vec![1.0, 0.0])];
		let incoming = [EmbeddedTerm::new("new", vec![1.0, 0.0])];
		let report = reinforce_terms(&incoming, &mut existing, &feedback).expect("same dimensions");

		assert_eq!(report, ReinforcementReport { matched: 0, related: 1, appended: 0 });
		assert!((existing[0].weight - feedback.related_weight).abs() < 1e-6);
		assert_eq!(existing[1].weight, 1.0);
	}

	#[test]
	fn appended_terms_take_part_in_later_comparisons() {
		let feedback = Feedback::default();
		let mut existing = Vec::new();
		let incoming =
			[EmbeddedTerm::new("llm", vec![1.0, 0.0]), EmbeddedTerm::new("LLM", vec![1.0, 0.0])];
		let report = reinforce_terms(&incoming, &mut existing, &feedback).expect("same dimensions");

		assert_eq!(report, ReinforcementReport { matched: 1, related: 0, appended: 1 });
		assert_eq!(existing.len(), 1);
		assert!((existing[0].weight - feedback.match_weight).abs() < 1e-6);
	}

	#[test]
	fn custom_append_weight_is_used() {
		let feedback = Feedback { append_weight: 0.4, ..Feedback::default() };
		let mut existing = Vec::new();
		let incoming = [EmbeddedTerm::new("graph theory", vec![0.0, 1.0])];

		reinforce_terms(&incoming, &mut existing, &feedback).expect("same dimensions");

		assert_eq!(existing[0].weight, 0.4);
	}
}
