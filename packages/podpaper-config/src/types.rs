use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub providers: Providers,
	#[serde(default)]
	pub scoring: Scoring,
	#[serde(default)]
	pub feedback: Feedback,
	#[serde(default)]
	pub extraction: Extraction,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub llm_extractor: LlmProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	/// Number of distinct values sent per embedding request.
	#[serde(default = "default_embedding_batch_size")]
	pub batch_size: u32,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default = "default_extractor_max_attempts")]
	pub max_attempts: u32,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

/// Facet scorer tunables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Scoring {
	/// Share of the strongest single match in the combined similarity; the rest goes to the
	/// weighted average.
	pub alpha: f32,
	/// Sigmoid steepness applied to the scaled content score.
	pub sigmoid_k: f32,
	/// Factor applied to the content score before the sigmoid.
	pub pre_scale: f32,
	pub weights: ScoringWeights,
	pub thresholds: ScoringThresholds,
}
impl Default for Scoring {
	fn default() -> Self {
		Self {
			alpha: 0.6,
			sigmoid_k: 0.5,
			pre_scale: 0.5,
			weights: ScoringWeights::default(),
			thresholds: ScoringThresholds::default(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
	pub topic: f32,
	pub target: f32,
	pub tag: f32,
	pub not_interest: f32,
}
impl Default for ScoringWeights {
	fn default() -> Self {
		Self { topic: 4.0, target: 2.0, tag: 3.0, not_interest: 2.0 }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringThresholds {
	pub interest: f32,
	pub not_interest: f32,
}
impl Default for ScoringThresholds {
	fn default() -> Self {
		Self { interest: 0.35, not_interest: 0.6 }
	}
}

/// Adaptive profile updater tunables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Feedback {
	pub match_threshold: f32,
	pub related_threshold: f32,
	/// Multiplier applied to an existing term that matches an incoming term.
	pub match_weight: f32,
	/// Multiplier applied to an existing term that is related to an incoming term.
	pub related_weight: f32,
	/// Weight given to a newly appended term in `reinforce` mode.
	pub append_weight: f32,
	pub related_mode: RelatedMode,
}
impl Default for Feedback {
	fn default() -> Self {
		Self {
			match_threshold: 0.85,
			related_threshold: 0.7,
			match_weight: 1.2,
			related_weight: 1.1,
			append_weight: 1.0,
			related_mode: RelatedMode::Reinforce,
		}
	}
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelatedMode {
	/// A related hit reinforces the existing term by `related_weight` and suppresses the append.
	#[default]
	Reinforce,
	/// A related hit multiplies the existing term by a running multiplier seeded at 1.0, squares
	/// the multiplier, and still appends the incoming term with the multiplier as its weight.
	Legacy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Extraction {
	/// Profile terms per collection passed to the extractor as context hints.
	pub context_hint_limit: u32,
}
impl Default for Extraction {
	fn default() -> Self {
		Self { context_hint_limit: 10 }
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_embedding_batch_size() -> u32 {
	100
}

fn default_extractor_max_attempts() -> u32 {
	3
}
