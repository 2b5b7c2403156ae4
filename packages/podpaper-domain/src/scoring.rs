//! Facet scoring of one embedded document against a preference profile.

use serde::{Deserialize, Serialize};

use crate::{
	Result,
	document::DocumentEmbeddedFacets,
	profile::{PreferenceProfile, WeightedTerm},
	similarity,
};
use podpaper_config::Scoring;

/// Per-facet similarities and the squashed relevance score of one document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
	pub topic: f32,
	pub target: f32,
	pub tag: f32,
	pub not_interest_target: f32,
	pub not_interest_tag: f32,
	#[serde(rename = "final")]
	pub final_score: f32,
}
impl ScoreBreakdown {
	/// The unsquashed weighted sum the final score is derived from.
	pub fn content_score(&self, scoring: &Scoring) -> f32 {
		content_score(
			scoring,
			self.topic,
			self.target,
			self.tag,
			self.not_interest_target,
			self.not_interest_tag,
		)
	}
}

pub fn score_document(
	facets: &DocumentEmbeddedFacets,
	profile: &PreferenceProfile,
	scoring: &Scoring,
) -> Result<ScoreBreakdown> {
	let interest_threshold = scoring.thresholds.interest;
	let not_interest_threshold = scoring.thresholds.not_interest;
	let topic = facets.topic_embeddings();
	let tags = facets.tag_embeddings();
	let target = facets.target_embeddings();
	let topic_sim = against(&topic, &profile.interest.tags, interest_threshold, scoring.alpha)?;
	let target_sim = against(&target, &profile.interest.target, interest_threshold, scoring.alpha)?;
	let tag_sim = against(&tags, &profile.interest.tags, interest_threshold, scoring.alpha)?;
	let not_interest_target_sim =
		against(&target, &profile.not_interest.target, not_interest_threshold, scoring.alpha)?;
	let not_interest_tag_sim =
		against(&tags, &profile.not_interest.tags, not_interest_threshold, scoring.alpha)?;
	let content = content_score(
		scoring,
		topic_sim,
		target_sim,
		tag_sim,
		not_interest_target_sim,
		not_interest_tag_sim,
	);

	Ok(ScoreBreakdown {
		topic: topic_sim,
		target: target_sim,
		tag: tag_sim,
		not_interest_target: not_interest_target_sim,
		not_interest_tag: not_interest_tag_sim,
		final_score: sigmoid(content * scoring.pre_scale, scoring.sigmoid_k),
	})
}

pub fn content_score(
	scoring: &Scoring,
	topic: f32,
	target: f32,
	tag: f32,
	not_interest_target: f32,
	not_interest_tag: f32,
) -> f32 {
	let weights = &scoring.weights;

	weights.topic * topic + weights.target * target + weights.tag * tag
		- weights.not_interest * (not_interest_target + not_interest_tag)
}

/// Logistic squash into (0, 1) with steepness `k`.
pub fn sigmoid(x: f32, k: f32) -> f32 {
	1.0 / (1.0 + (-k * x).exp())
}

// Sources are the document's embeddings; targets are the weighted profile terms.
fn against(sources: &[&[f32]], terms: &[WeightedTerm], threshold: f32, alpha: f32) -> Result<f32> {
	let targets: Vec<&[f32]> = terms.iter().map(|term| term.embedding.as_slice()).collect();
	let weights: Vec<f32> = terms.iter().map(|term| term.weight).collect();

	similarity::combined_similarity(sources, &targets, Some(weights.as_slice()), threshold, alpha)
}
