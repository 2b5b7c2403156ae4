use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use podpaper_config::{Config, Error, RelatedMode};

const SAMPLE_CONFIG_TOML: &str = include_str!("fixtures/sample_config.toml");

fn sample_toml_without(sections: &[&str]) -> String {
	let mut value: Value =
		toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.");
	let root = value.as_table_mut().expect("Sample config must be a table.");

	for section in sections {
		root.remove(*section);
	}

	toml::to_string(&value).expect("Failed to render sample config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("podpaper_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn base_config() -> Config {
	toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse test config.")
}

fn validation_message(cfg: &Config) -> String {
	let err = podpaper_config::validate(cfg).expect_err("Expected a validation error.");

	assert!(matches!(err, Error::Validation { .. }), "Unexpected error kind: {err:?}");

	err.to_string()
}

#[test]
fn sample_config_loads() {
	let path = write_temp_config(SAMPLE_CONFIG_TOML.to_string());
	let result = podpaper_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let cfg = result.expect("Sample config must load.");

	assert_eq!(cfg.providers.embedding.batch_size, 100);
	assert_eq!(cfg.feedback.related_mode, RelatedMode::Reinforce);
	assert_eq!(cfg.scoring.weights.topic, 4.0);
}

#[test]
fn omitted_tuning_sections_fall_back_to_defaults() {
	let payload = sample_toml_without(&["scoring", "feedback", "extraction"]);
	let cfg: Config = toml::from_str(&payload).expect("Failed to parse config.");

	assert_eq!(cfg.scoring.alpha, 0.6);
	assert_eq!(cfg.scoring.sigmoid_k, 0.5);
	assert_eq!(cfg.scoring.thresholds.interest, 0.35);
	assert_eq!(cfg.scoring.thresholds.not_interest, 0.6);
	assert_eq!(cfg.feedback.append_weight, 1.0);
	assert_eq!(cfg.extraction.context_hint_limit, 10);
	assert!(podpaper_config::validate(&cfg).is_ok());
}

#[test]
fn legacy_related_mode_parses() {
	let payload = SAMPLE_CONFIG_TOML.replace("\"reinforce\"", "\"legacy\"");
	let cfg: Config = toml::from_str(&payload).expect("Failed to parse config.");

	assert_eq!(cfg.feedback.related_mode, RelatedMode::Legacy);
}

#[test]
fn blank_log_level_is_normalized() {
	let payload = SAMPLE_CONFIG_TOML.replace("log_level = \"info\"", "log_level = \"  \"");
	let path = write_temp_config(payload);
	let result = podpaper_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	assert_eq!(result.expect("Config must load.").service.log_level, "info");
}

#[test]
fn missing_file_reports_read_error() {
	let mut path = env::temp_dir();

	path.push("podpaper_config_test_does_not_exist.toml");

	let err = podpaper_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }), "Unexpected error: {err:?}");
}

#[test]
fn malformed_toml_reports_parse_error() {
	let path = write_temp_config("[service\nlog_level = 1".to_string());
	let result = podpaper_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let err = result.expect_err("Expected parse error.");

	assert!(matches!(err, Error::ParseConfig { .. }), "Unexpected error: {err:?}");
}

#[test]
fn alpha_must_be_a_fraction() {
	let mut cfg = base_config();

	cfg.scoring.alpha = 1.5;

	assert!(validation_message(&cfg).contains("scoring.alpha must be in the range 0.0-1.0."));
}

#[test]
fn scoring_values_must_be_finite() {
	let mut cfg = base_config();

	cfg.scoring.weights.tag = f32::NAN;

	assert!(validation_message(&cfg).contains("scoring.weights.tag must be a finite number."));
}

#[test]
fn facet_weights_must_not_be_negative() {
	let mut cfg = base_config();

	cfg.scoring.weights.not_interest = -0.5;

	assert!(
		validation_message(&cfg).contains("scoring.weights.not_interest must be zero or greater.")
	);
}

#[test]
fn thresholds_must_be_cosine_values() {
	let mut cfg = base_config();

	cfg.scoring.thresholds.interest = 1.2;

	assert!(
		validation_message(&cfg).contains("scoring.thresholds.interest must be in the range -1.0-1.0.")
	);
}

#[test]
fn not_interest_threshold_must_not_be_negative() {
	let mut cfg = base_config();

	cfg.scoring.thresholds.not_interest = -0.1;

	assert!(
		validation_message(&cfg)
			.contains("scoring.thresholds.not_interest must be zero or greater.")
	);
}

#[test]
fn sigmoid_steepness_must_be_positive() {
	let mut cfg = base_config();

	cfg.scoring.sigmoid_k = 0.0;

	assert!(validation_message(&cfg).contains("scoring.sigmoid_k must be greater than zero."));
}

#[test]
fn match_threshold_must_exceed_related_threshold() {
	let mut cfg = base_config();

	cfg.feedback.match_threshold = 0.5;
	cfg.feedback.related_threshold = 0.5;

	assert!(
		validation_message(&cfg)
			.contains("feedback.match_threshold must be greater than feedback.related_threshold.")
	);
}

#[test]
fn reinforcement_multipliers_must_amplify() {
	let mut cfg = base_config();

	cfg.feedback.match_weight = 1.0;

	assert!(validation_message(&cfg).contains("feedback.match_weight must be greater than 1.0."));

	cfg = base_config();
	cfg.feedback.related_weight = 0.9;

	assert!(validation_message(&cfg).contains("feedback.related_weight must be greater than 1.0."));
}

#[test]
fn append_weight_must_be_positive() {
	let mut cfg = base_config();

	cfg.feedback.append_weight = 0.0;

	assert!(validation_message(&cfg).contains("feedback.append_weight must be greater than zero."));
}

#[test]
fn embedding_batch_size_must_be_positive() {
	let mut cfg = base_config();

	cfg.providers.embedding.batch_size = 0;

	assert!(
		validation_message(&cfg)
			.contains("providers.embedding.batch_size must be greater than zero.")
	);
}

#[test]
fn api_keys_must_be_present() {
	let mut cfg = base_config();

	cfg.providers.llm_extractor.api_key = "  ".to_string();

	assert!(validation_message(&cfg).contains("Provider llm_extractor api_key must be non-empty."));
}
