use podpaper_config::{Feedback, RelatedMode, Scoring};
use podpaper_domain::{
	Error,
	document::DocumentEmbeddedFacets,
	embedding::EmbeddedTerm,
	profile::{Polarity, PreferenceProfile, ProfileBucket, WeightedTerm},
	scoring::{self, ScoreBreakdown},
	similarity,
	update::{self, ReinforcementReport},
};

const E1: [f32; 2] = [1.0, 0.0];

fn unit_at(similarity: f32) -> Vec<f32> {
	vec![similarity, (1.0 - similarity * similarity).sqrt()]
}

fn crypto_profile() -> PreferenceProfile {
	PreferenceProfile {
		interest: ProfileBucket {
			tags: vec![WeightedTerm::new("cryptography", 1.0, E1.to_vec())],
			target: Vec::new(),
		},
		not_interest: ProfileBucket::default(),
	}
}

fn tags_only(tags: Vec<EmbeddedTerm>) -> DocumentEmbeddedFacets {
	DocumentEmbeddedFacets { topic: None, tags, target: Vec::new() }
}

fn feedback(match_threshold: f32, related_threshold: f32) -> Feedback {
	Feedback { match_threshold, related_threshold, ..Feedback::default() }
}

#[test]
fn identical_tag_reinforces_existing_entry() {
	let cfg = feedback(0.8, 0.4);
	let mut profile = crypto_profile();
	let mut reference = profile.clone();
	let facets = tags_only(vec![EmbeddedTerm::new("cryptography", E1.to_vec())]);
	let report = update::apply_feedback(&mut profile, &facets, Polarity::Liked, &cfg)
		.expect("same dimensions");

	assert_eq!(report.tags, ReinforcementReport { matched: 1, related: 0, appended: 0 });
	assert_eq!(profile.interest.tags.len(), 1);

	// Before renormalization the weight is multiplied by the match multiplier.
	let raw = update::reinforce_terms(&facets.tags, &mut reference.interest.tags, &cfg)
		.expect("same dimensions");

	assert_eq!(raw.matched, 1);
	assert!((reference.interest.tags[0].weight - cfg.match_weight).abs() < 1e-6);
	// A single term is rescaled back to 1.0.
	assert_eq!(profile.interest.tags[0].weight, 1.0);
}

#[test]
fn related_tag_reinforces_without_appending() {
	let cfg = feedback(0.8, 0.4);
	let mut existing = crypto_profile().interest.tags;
	let incoming = [EmbeddedTerm::new("number theory", unit_at(0.5))];
	let report = update::reinforce_terms(&incoming, &mut existing, &cfg).expect("same dimensions");

	assert_eq!(report, ReinforcementReport { matched: 0, related: 1, appended: 0 });
	assert_eq!(existing.len(), 1);
	assert!((existing[0].weight - cfg.related_weight).abs() < 1e-6);
}

#[test]
fn unrelated_tag_is_appended() {
	let cfg = feedback(0.8, 0.4);
	let mut profile = crypto_profile();
	let facets = tags_only(vec![EmbeddedTerm::new("marine biology", unit_at(0.1))]);
	let report = update::apply_feedback(&mut profile, &facets, Polarity::Liked, &cfg)
		.expect("same dimensions");

	assert_eq!(report.tags.appended, 1);
	assert_eq!(profile.interest.tags.len(), 2);
	assert_eq!(profile.interest.tags[1].value, "marine biology");
	assert_eq!(profile.interest.tags[1].weight, 1.0);
}

#[test]
fn disliked_feedback_only_touches_not_interest_bucket() {
	let cfg = Feedback::default();
	let mut profile = crypto_profile();
	let facets = DocumentEmbeddedFacets {
		topic: None,
		tags: vec![EmbeddedTerm::new("cryptography", E1.to_vec())],
		target: vec![EmbeddedTerm::new("astronomer", vec![0.0, 1.0])],
	};

	update::apply_feedback(&mut profile, &facets, Polarity::Disliked, &cfg)
		.expect("same dimensions");

	assert_eq!(profile.interest, crypto_profile().interest);
	assert_eq!(profile.not_interest.tags.len(), 1);
	assert_eq!(profile.not_interest.target[0].value, "astronomer");
}

#[test]
fn empty_facets_score_to_zero_components() {
	let facets = DocumentEmbeddedFacets::default();
	let scores = scoring::score_document(&facets, &crypto_profile(), &Scoring::default())
		.expect("nothing to compare");

	assert_eq!(scores.tag, 0.0);
	assert_eq!(scores.target, 0.0);
	assert_eq!(scores.topic, 0.0);
	assert!(scores.final_score.is_finite());
	assert_eq!(scores.final_score, 0.5);
}

#[test]
fn empty_profile_scores_to_neutral() {
	let facets = tags_only(vec![EmbeddedTerm::new("cryptography", E1.to_vec())]);
	let scores = scoring::score_document(&facets, &PreferenceProfile::new(), &Scoring::default())
		.expect("nothing to compare");

	assert_eq!(scores.final_score, 0.5);
}

#[test]
fn combined_similarity_ignores_target_order() {
	let sources = [vec![1.0_f32, 0.2, 0.0], vec![0.1_f32, 1.0, 0.3]];
	let targets = [vec![0.9_f32, 0.1, 0.1], vec![0.2_f32, 0.8, 0.4], vec![0.5_f32, 0.5, 0.5]];
	let weights = [0.3_f32, 1.0, 0.6];
	let forward =
		similarity::combined_similarity(&sources, &targets, Some(&weights[..]), 0.0, 0.6)
			.expect("same dimensions");
	let reversed_targets: Vec<Vec<f32>> = targets.iter().rev().cloned().collect();
	let reversed_weights: Vec<f32> = weights.iter().rev().copied().collect();
	let backward = similarity::combined_similarity(
		&sources,
		&reversed_targets,
		Some(reversed_weights.as_slice()),
		0.0,
		0.6,
	)
	.expect("same dimensions");

	assert!((forward - backward).abs() < 1e-6);
}

#[test]
fn renormalization_is_idempotent() {
	let mut terms = vec![
		WeightedTerm::new("a", 3.0, vec![1.0]),
		WeightedTerm::new("b", 1.5, vec![1.0]),
		WeightedTerm::new("c", 0.3, vec![1.0]),
	];

	update::normalize_weights(&mut terms);

	let once: Vec<f32> = terms.iter().map(|term| term.weight).collect();

	assert_eq!(once[0], 1.0);
	assert!((once[1] - 0.5).abs() < 1e-6);
	assert!((once[2] - 0.1).abs() < 1e-6);

	update::normalize_weights(&mut terms);

	let twice: Vec<f32> = terms.iter().map(|term| term.weight).collect();

	assert_eq!(once, twice);
}

#[test]
fn heavier_disinterest_never_raises_content_score() {
	let breakdown = ScoreBreakdown {
		topic: 0.4,
		target: 0.7,
		tag: 0.55,
		not_interest_target: 0.62,
		not_interest_tag: 0.8,
		final_score: 0.0,
	};
	let mut scoring = Scoring::default();
	let mut previous = f32::INFINITY;

	for step in 0..10 {
		scoring.weights.not_interest = step as f32 * 0.5;

		let content = breakdown.content_score(&scoring);

		assert!(content <= previous);

		previous = content;
	}
}

#[test]
fn legacy_mode_appends_related_terms_at_unit_weight() {
	let cfg = Feedback { related_mode: RelatedMode::Legacy, ..feedback(0.8, 0.4) };
	let mut existing = crypto_profile().interest.tags;
	let incoming = [EmbeddedTerm::new("number theory", unit_at(0.5))];
	let report = update::reinforce_terms(&incoming, &mut existing, &cfg).expect("same dimensions");

	assert_eq!(report, ReinforcementReport { matched: 0, related: 1, appended: 1 });
	assert_eq!(existing.len(), 2);
	assert_eq!(existing[0].weight, 1.0);
	assert_eq!(existing[1].weight, 1.0);
}

#[test]
fn failed_update_leaves_profile_untouched() {
	let cfg = Feedback::default();
	let mut profile = PreferenceProfile {
		interest: ProfileBucket {
			tags: vec![WeightedTerm::new("cryptography", 0.5, E1.to_vec())],
			target: vec![WeightedTerm::new("engineer", 1.0, vec![0.0, 1.0])],
		},
		not_interest: ProfileBucket::default(),
	};
	let before = profile.clone();
	// Tags succeed, the three-dimensional target does not.
	let facets = DocumentEmbeddedFacets {
		topic: None,
		tags: vec![EmbeddedTerm::new("cryptography", E1.to_vec())],
		target: vec![EmbeddedTerm::new("physicist", vec![0.0, 0.0, 1.0])],
	};
	let err = update::apply_feedback(&mut profile, &facets, Polarity::Liked, &cfg)
		.expect_err("Expected a dimension mismatch.");

	assert_eq!(err, Error::DimensionMismatch { left: 3, right: 2 });
	assert_eq!(profile, before);
}
