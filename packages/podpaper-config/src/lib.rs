mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, EmbeddingProviderConfig, Extraction, Feedback, LlmProviderConfig, Providers,
	RelatedMode, Scoring, ScoringThresholds, ScoringWeights, Service,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	validate_providers(cfg)?;
	validate_scoring(&cfg.scoring)?;
	validate_feedback(&cfg.feedback)?;

	Ok(())
}

pub fn validate_scoring(scoring: &Scoring) -> Result<()> {
	for (label, value) in [
		("scoring.alpha", scoring.alpha),
		("scoring.sigmoid_k", scoring.sigmoid_k),
		("scoring.pre_scale", scoring.pre_scale),
		("scoring.weights.topic", scoring.weights.topic),
		("scoring.weights.target", scoring.weights.target),
		("scoring.weights.tag", scoring.weights.tag),
		("scoring.weights.not_interest", scoring.weights.not_interest),
		("scoring.thresholds.interest", scoring.thresholds.interest),
		("scoring.thresholds.not_interest", scoring.thresholds.not_interest),
	] {
		ensure_finite(label, value)?;
	}

	if !(0.0..=1.0).contains(&scoring.alpha) {
		return Err(Error::Validation {
			message: "scoring.alpha must be in the range 0.0-1.0.".to_string(),
		});
	}
	if scoring.sigmoid_k <= 0.0 {
		return Err(Error::Validation {
			message: "scoring.sigmoid_k must be greater than zero.".to_string(),
		});
	}
	if scoring.pre_scale <= 0.0 {
		return Err(Error::Validation {
			message: "scoring.pre_scale must be greater than zero.".to_string(),
		});
	}

	for (label, value) in [
		("scoring.weights.topic", scoring.weights.topic),
		("scoring.weights.target", scoring.weights.target),
		("scoring.weights.tag", scoring.weights.tag),
		("scoring.weights.not_interest", scoring.weights.not_interest),
	] {
		if value < 0.0 {
			return Err(Error::Validation { message: format!("{label} must be zero or greater.") });
		}
	}

	ensure_threshold("scoring.thresholds.interest", scoring.thresholds.interest)?;
	ensure_threshold("scoring.thresholds.not_interest", scoring.thresholds.not_interest)?;

	// A negative disinterest threshold would let the penalty term turn into a bonus.
	if scoring.thresholds.not_interest < 0.0 {
		return Err(Error::Validation {
			message: "scoring.thresholds.not_interest must be zero or greater.".to_string(),
		});
	}

	Ok(())
}

pub fn validate_feedback(feedback: &Feedback) -> Result<()> {
	for (label, value) in [
		("feedback.match_threshold", feedback.match_threshold),
		("feedback.related_threshold", feedback.related_threshold),
		("feedback.match_weight", feedback.match_weight),
		("feedback.related_weight", feedback.related_weight),
		("feedback.append_weight", feedback.append_weight),
	] {
		ensure_finite(label, value)?;
	}

	ensure_threshold("feedback.match_threshold", feedback.match_threshold)?;
	ensure_threshold("feedback.related_threshold", feedback.related_threshold)?;

	if feedback.match_threshold <= feedback.related_threshold {
		return Err(Error::Validation {
			message: "feedback.match_threshold must be greater than feedback.related_threshold."
				.to_string(),
		});
	}
	if feedback.match_weight <= 1.0 {
		return Err(Error::Validation {
			message: "feedback.match_weight must be greater than 1.0.".to_string(),
		});
	}
	if feedback.related_weight <= 1.0 {
		return Err(Error::Validation {
			message: "feedback.related_weight must be greater than 1.0.".to_string(),
		});
	}
	if feedback.append_weight <= 0.0 {
		return Err(Error::Validation {
			message: "feedback.append_weight must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn validate_providers(cfg: &Config) -> Result<()> {
	let embedding = &cfg.providers.embedding;
	let extractor = &cfg.providers.llm_extractor;

	if embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if embedding.batch_size == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.batch_size must be greater than zero.".to_string(),
		});
	}
	if extractor.max_attempts == 0 {
		return Err(Error::Validation {
			message: "providers.llm_extractor.max_attempts must be greater than zero.".to_string(),
		});
	}
	if !extractor.temperature.is_finite() {
		return Err(Error::Validation {
			message: "providers.llm_extractor.temperature must be a finite number.".to_string(),
		});
	}

	for (label, key) in [("embedding", &embedding.api_key), ("llm_extractor", &extractor.api_key)]
	{
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}

	Ok(())
}

fn ensure_finite(label: &str, value: f32) -> Result<()> {
	if !value.is_finite() {
		return Err(Error::Validation { message: format!("{label} must be a finite number.") });
	}

	Ok(())
}

fn ensure_threshold(label: &str, value: f32) -> Result<()> {
	if !(-1.0..=1.0).contains(&value) {
		return Err(Error::Validation {
			message: format!("{label} must be in the range -1.0-1.0."),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let level = cfg.service.log_level.trim();

	cfg.service.log_level = if level.is_empty() { "info".to_string() } else { level.to_string() };
}
