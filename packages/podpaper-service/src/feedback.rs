use tokio::sync::Mutex;

use crate::{EmbeddedPaper, Error, PodpaperService, Result, extract};
use podpaper_config::Feedback;
use podpaper_domain::{
	document::{AnalyzedPaper, DocumentEmbeddedFacets, Paper},
	profile::{Polarity, PreferenceProfile},
	update::{self, FeedbackReport},
};

/// Owns one user's profile and serializes every update to it.
#[derive(Debug, Default)]
pub struct ProfileHandle {
	profile: Mutex<PreferenceProfile>,
}
impl ProfileHandle {
	pub fn new(profile: PreferenceProfile) -> Self {
		Self { profile: Mutex::new(profile) }
	}

	/// A copy of the current profile for scoring.
	pub async fn snapshot(&self) -> PreferenceProfile {
		self.profile.lock().await.clone()
	}

	/// Applies one feedback event while holding the profile lock for the whole
	/// read-modify-write.
	pub async fn apply(
		&self,
		facets: &DocumentEmbeddedFacets,
		polarity: Polarity,
		feedback: &Feedback,
	) -> Result<FeedbackReport> {
		let mut profile = self.profile.lock().await;

		Ok(update::apply_feedback(&mut profile, facets, polarity, feedback)?)
	}

	pub fn into_inner(self) -> PreferenceProfile {
		self.profile.into_inner()
	}
}

impl PodpaperService {
	/// Records feedback on a paper that was already analyzed in a ranking pass.
	pub async fn apply_feedback(
		&self,
		handle: &ProfileHandle,
		paper: &EmbeddedPaper,
		polarity: Polarity,
	) -> Result<FeedbackReport> {
		let report = handle.apply(&paper.facets, polarity, &self.cfg.feedback).await?;

		tracing::info!(
			paper_id = %paper.analyzed.paper.id,
			?polarity,
			tags = ?report.tags,
			target = ?report.target,
			"Feedback applied."
		);

		Ok(report)
	}

	/// Analyzes `paper` and records feedback on it. A paper with no embeddable tag or target is
	/// rejected and the profile stays as it was.
	pub async fn record_feedback(
		&self,
		handle: &ProfileHandle,
		paper: &Paper,
		polarity: Polarity,
	) -> Result<FeedbackReport> {
		if paper.title.trim().is_empty() && paper.summary.trim().is_empty() {
			return Err(Error::InvalidRequest {
				message: format!("Paper {} has neither a title nor a summary.", paper.id),
			});
		}

		let current = handle.snapshot().await;
		let hints = self.context_hints(&current);
		let facets = extract::run_extraction(
			self.providers.extractor.as_ref(),
			&self.cfg.providers.llm_extractor,
			paper,
			hints.as_ref(),
		)
		.await
		.ok_or_else(|| Error::Provider {
			message: format!("No metadata could be extracted for paper {}.", paper.id),
		})?;
		let embedded = self
			.embed_analyzed(vec![AnalyzedPaper { paper: paper.clone(), facets }])
			.await
			.pop()
			.ok_or_else(|| Error::Provider {
				message: format!("Paper {} was lost while embedding its facets.", paper.id),
			})?;

		if embedded.facets.tags.is_empty() && embedded.facets.target.is_empty() {
			return Err(Error::Provider {
				message: format!("No facet of paper {} could be embedded.", paper.id),
			});
		}

		self.apply_feedback(handle, &embedded, polarity).await
	}
}
