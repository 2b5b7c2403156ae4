use serde::{Deserialize, Serialize};

use crate::embedding::{EmbeddingTable, Hydrated};

/// Direction of one feedback event.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
	Liked,
	Disliked,
}

/// One vocabulary item of a profile bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedTerm {
	pub value: String,
	pub weight: f32,
	pub embedding: Vec<f32>,
}
impl WeightedTerm {
	pub fn new(value: impl Into<String>, weight: f32, embedding: Vec<f32>) -> Self {
		Self { value: value.into(), weight, embedding }
	}
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileBucket {
	pub tags: Vec<WeightedTerm>,
	pub target: Vec<WeightedTerm>,
}
impl ProfileBucket {
	pub fn is_empty(&self) -> bool {
		self.tags.is_empty() && self.target.is_empty()
	}
}

/// A user's weighted interest and disinterest vocabulary with resolved embeddings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferenceProfile {
	pub interest: ProfileBucket,
	pub not_interest: ProfileBucket,
}
impl PreferenceProfile {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_empty(&self) -> bool {
		self.interest.is_empty() && self.not_interest.is_empty()
	}

	pub fn bucket(&self, polarity: Polarity) -> &ProfileBucket {
		match polarity {
			Polarity::Liked => &self.interest,
			Polarity::Disliked => &self.not_interest,
		}
	}

	pub fn bucket_mut(&mut self, polarity: Polarity) -> &mut ProfileBucket {
		match polarity {
			Polarity::Liked => &mut self.interest,
			Polarity::Disliked => &mut self.not_interest,
		}
	}

	/// Builds a profile from its persisted form, dropping terms whose embedding is unknown.
	pub fn hydrate(snapshot: &ProfileSnapshot, table: &EmbeddingTable) -> Hydrated<Self> {
		let mut missing = Vec::new();
		let mut hydrate_terms = |terms: &[TermSnapshot]| -> Vec<WeightedTerm> {
			terms
				.iter()
				.filter_map(|term| match table.get(&term.value) {
					Some(embedding) =>
						Some(WeightedTerm::new(term.value.clone(), term.weight, embedding.to_vec())),
					None => {
						missing.push(term.value.clone());

						None
					},
				})
				.collect()
		};
		let interest = ProfileBucket {
			tags: hydrate_terms(&snapshot.interest.tags),
			target: hydrate_terms(&snapshot.interest.target),
		};
		let not_interest = ProfileBucket {
			tags: hydrate_terms(&snapshot.not_interest.tags),
			target: hydrate_terms(&snapshot.not_interest.target),
		};

		Hydrated { value: Self { interest, not_interest }, missing }
	}

	/// The persisted form of the profile. Embeddings are not kept.
	pub fn snapshot(&self) -> ProfileSnapshot {
		fn terms(terms: &[WeightedTerm]) -> Vec<TermSnapshot> {
			terms
				.iter()
				.map(|term| TermSnapshot { value: term.value.clone(), weight: term.weight })
				.collect()
		}

		ProfileSnapshot {
			interest: BucketSnapshot {
				tags: terms(&self.interest.tags),
				target: terms(&self.interest.target),
			},
			not_interest: BucketSnapshot {
				tags: terms(&self.not_interest.tags),
				target: terms(&self.not_interest.target),
			},
		}
	}

	/// The persisted form of the profile with every term of `stored` that is absent here carried
	/// over at its stored weight. Terms that failed to hydrate are kept on save this way.
	pub fn merged_snapshot(&self, stored: &ProfileSnapshot) -> ProfileSnapshot {
		let mut snapshot = self.snapshot();

		carry_over(&mut snapshot.interest.tags, &stored.interest.tags);
		carry_over(&mut snapshot.interest.target, &stored.interest.target);
		carry_over(&mut snapshot.not_interest.tags, &stored.not_interest.tags);
		carry_over(&mut snapshot.not_interest.target, &stored.not_interest.target);

		snapshot
	}

	/// The highest-weighted terms of each collection, lower-cased and trimmed, for prompting the
	/// metadata extractor.
	pub fn context_hints(&self, limit: usize) -> ContextHints {
		ContextHints {
			interest_tags: top_terms(&self.interest.tags, limit),
			interest_target: top_terms(&self.interest.target, limit),
			not_interest_tags: top_terms(&self.not_interest.tags, limit),
			not_interest_target: top_terms(&self.not_interest.target, limit),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextHints {
	pub interest_tags: Vec<String>,
	pub interest_target: Vec<String>,
	pub not_interest_tags: Vec<String>,
	pub not_interest_target: Vec<String>,
}
impl ContextHints {
	pub fn is_empty(&self) -> bool {
		self.interest_tags.is_empty()
			&& self.interest_target.is_empty()
			&& self.not_interest_tags.is_empty()
			&& self.not_interest_target.is_empty()
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
	#[serde(default)]
	pub interest: BucketSnapshot,
	#[serde(default, alias = "notInterest")]
	pub not_interest: BucketSnapshot,
}
impl ProfileSnapshot {
	/// Every term value in the snapshot, in collection order, duplicates included.
	pub fn values(&self) -> Vec<String> {
		[
			&self.interest.target,
			&self.not_interest.target,
			&self.interest.tags,
			&self.not_interest.tags,
		]
		.into_iter()
		.flatten()
		.map(|term| term.value.clone())
		.collect()
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketSnapshot {
	#[serde(default)]
	pub tags: Vec<TermSnapshot>,
	#[serde(default)]
	pub target: Vec<TermSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermSnapshot {
	pub value: String,
	#[serde(default = "default_term_weight")]
	pub weight: f32,
}

fn top_terms(terms: &[WeightedTerm], limit: usize) -> Vec<String> {
	let mut ordered: Vec<&WeightedTerm> = terms.iter().collect();

	ordered.sort_by(|a, b| b.weight.total_cmp(&a.weight));

	ordered
		.into_iter()
		.map(|term| term.value.trim().to_lowercase())
		.filter(|value| !value.is_empty())
		.take(limit)
		.collect()
}

fn carry_over(current: &mut Vec<TermSnapshot>, stored: &[TermSnapshot]) {
	let absent: Vec<TermSnapshot> = stored
		.iter()
		.filter(|term| !current.iter().any(|kept| kept.value == term.value))
		.cloned()
		.collect();

	current.extend(absent);
}

fn default_term_weight() -> f32 {
	1.0
}
