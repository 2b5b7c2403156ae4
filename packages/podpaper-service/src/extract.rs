use serde::Deserialize;
use serde_json::Value;

use crate::{ExtractorProvider, PodpaperService};
use podpaper_config::LlmProviderConfig;
use podpaper_domain::{
	document::{DocumentFacets, Paper, PaperType},
	profile::ContextHints,
};

const SYSTEM_PROMPT: &str = "You analyze research papers and produce metadata as JSON. \
Output must be valid JSON only and must match the provided schema exactly. \
Tags must be specific words or short phrases that categorize the paper. \
Avoid words that are too common and avoid abbreviations that obscure the context. \
Targets are the professions most affected by the paper, e.g. web engineer, infrastructure engineer. \
The topic is the single most important topic of the paper.";

#[derive(Debug, Deserialize)]
struct ExtractorOutput {
	#[serde(default)]
	topic: Option<String>,
	#[serde(default)]
	tags: Vec<String>,
	#[serde(default)]
	target: Vec<String>,
	#[serde(default, rename = "type")]
	paper_type: Option<String>,
}

impl PodpaperService {
	/// Extracts facets for one paper. `None` means the paper has no usable metadata.
	pub async fn extract_facets(
		&self,
		paper: &Paper,
		hints: Option<&ContextHints>,
	) -> Option<DocumentFacets> {
		run_extraction(
			self.providers.extractor.as_ref(),
			&self.cfg.providers.llm_extractor,
			paper,
			hints,
		)
		.await
	}
}

pub fn build_extractor_messages(paper: &Paper, hints: Option<&ContextHints>) -> Vec<Value> {
	let schema = serde_json::json!({
		"topic": "string",
		"tags": "string[]",
		"target": "string[]",
		"type": "empirical|theoretical|literature|experimental|simulation"
	});
	let mut user_prompt = format!("Return JSON matching this exact schema:\n{schema}\n");

	if let Some(hints) = hints {
		user_prompt.push_str(
			"Relate your output to the following tags of the user where it fits.\n\
## User's tags\n",
		);
		user_prompt.push_str(&format!(
			"- Interested targets: {}\n- Interested tags: {}\n- Not interested targets: {}\n- Not interested tags: {}\n",
			hints.interest_target.join(", "),
			hints.interest_tags.join(", "),
			hints.not_interest_target.join(", "),
			hints.not_interest_tags.join(", "),
		));
	}

	user_prompt.push_str(&format!(
		"## Title\n{}\n## Abstract\n{}",
		paper.title.trim(),
		collapse_newlines(&paper.summary)
	));

	vec![
		serde_json::json!({ "role": "system", "content": SYSTEM_PROMPT }),
		serde_json::json!({ "role": "user", "content": user_prompt }),
	]
}

/// Turns the extractor's JSON answer into facets. A missing or blank topic yields `None`.
pub fn parse_facets(raw: Value) -> Option<DocumentFacets> {
	let output: ExtractorOutput = serde_json::from_value(raw).ok()?;
	let topic = output.topic.map(|topic| topic.trim().to_string()).filter(|topic| !topic.is_empty())?;

	Some(DocumentFacets {
		topic,
		tags: clean_values(output.tags),
		target: clean_values(output.target),
		paper_type: output.paper_type.as_deref().and_then(PaperType::parse),
	})
}

pub(crate) async fn run_extraction(
	extractor: &dyn ExtractorProvider,
	cfg: &LlmProviderConfig,
	paper: &Paper,
	hints: Option<&ContextHints>,
) -> Option<DocumentFacets> {
	let messages = build_extractor_messages(paper, hints);
	let raw = match extractor.extract(cfg, &messages).await {
		Ok(raw) => raw,
		Err(err) => {
			tracing::warn!(paper_id = %paper.id, error = %err, "Metadata extraction failed.");

			return None;
		},
	};
	let facets = parse_facets(raw);

	if facets.is_none() {
		tracing::warn!(paper_id = %paper.id, "Extractor output has no usable metadata.");
	}

	facets
}

fn clean_values(values: Vec<String>) -> Vec<String> {
	let mut out: Vec<String> = Vec::with_capacity(values.len());

	for value in values {
		let value = value.trim();

		if value.is_empty() || out.iter().any(|existing| existing == value) {
			continue;
		}

		out.push(value.to_string());
	}

	out
}

fn collapse_newlines(text: &str) -> String {
	text.lines().map(str::trim).filter(|line| !line.is_empty()).collect::<Vec<_>>().join(" ")
}
