use tokio::task::JoinSet;

use crate::{PodpaperService, extract};
use podpaper_domain::{
	document::{AnalyzedPaper, DocumentEmbeddedFacets, Paper},
	profile::{ContextHints, PreferenceProfile, ProfileSnapshot},
	ranking::{self, ScoredDocument},
	scoring,
};

/// An analyzed paper whose facet values have been embedded.
#[derive(Debug, Clone)]
pub struct EmbeddedPaper {
	pub analyzed: AnalyzedPaper,
	pub facets: DocumentEmbeddedFacets,
}

impl PodpaperService {
	/// Extracts metadata for every paper concurrently and embeds the facet values with one
	/// resolver call. Papers without metadata are left out; input order is kept.
	pub async fn analyze_papers(
		&self,
		papers: &[Paper],
		profile: &PreferenceProfile,
	) -> Vec<EmbeddedPaper> {
		let hints = self.context_hints(profile);
		let mut tasks = JoinSet::new();

		for (index, paper) in papers.iter().enumerate() {
			let extractor = self.providers.extractor.clone();
			let cfg = self.cfg.providers.llm_extractor.clone();
			let paper = paper.clone();
			let hints = hints.clone();

			tasks.spawn(async move {
				let facets =
					extract::run_extraction(extractor.as_ref(), &cfg, &paper, hints.as_ref()).await;

				(index, paper, facets)
			});
		}

		let mut analyzed = Vec::with_capacity(papers.len());

		while let Some(joined) = tasks.join_next().await {
			match joined {
				Ok((index, paper, Some(facets))) =>
					analyzed.push((index, AnalyzedPaper { paper, facets })),
				Ok((_, paper, None)) => {
					tracing::warn!(paper_id = %paper.id, "Paper excluded without metadata.");
				},
				Err(err) => tracing::warn!(error = %err, "Extraction task did not complete."),
			}
		}

		analyzed.sort_by_key(|(index, _)| *index);

		self.embed_analyzed(analyzed.into_iter().map(|(_, paper)| paper).collect()).await
	}

	/// Attaches embeddings to already analyzed papers. Unresolved facet values are dropped.
	pub async fn embed_analyzed(&self, analyzed: Vec<AnalyzedPaper>) -> Vec<EmbeddedPaper> {
		let values: Vec<String> =
			analyzed.iter().flat_map(|item| item.facets.values().cloned()).collect();
		let table = self.resolve_embeddings(&values).await;

		analyzed
			.into_iter()
			.map(|item| {
				let embedded = item.facets.embed(&table);

				if !embedded.missing.is_empty() {
					tracing::warn!(
						paper_id = %item.paper.id,
						values = ?embedded.missing,
						"Facet values without embeddings were dropped."
					);
				}

				EmbeddedPaper { analyzed: item, facets: embedded.value }
			})
			.collect()
	}

	/// Scores every paper against `profile` and ranks them. A paper whose scoring fails is left
	/// out.
	pub fn score_papers(
		&self,
		papers: Vec<EmbeddedPaper>,
		profile: &PreferenceProfile,
	) -> Vec<ScoredDocument<AnalyzedPaper>> {
		let mut scored = Vec::with_capacity(papers.len());

		for paper in papers {
			match scoring::score_document(&paper.facets, profile, &self.cfg.scoring) {
				Ok(scores) => scored.push(ScoredDocument { document: paper.analyzed, scores }),
				Err(err) => tracing::warn!(
					paper_id = %paper.analyzed.paper.id,
					error = %err,
					"Paper excluded after scoring failure."
				),
			}
		}

		ranking::rank(scored)
	}

	pub async fn rank_papers(
		&self,
		papers: &[Paper],
		profile: &PreferenceProfile,
	) -> Vec<ScoredDocument<AnalyzedPaper>> {
		let analyzed = self.analyze_papers(papers, profile).await;

		self.score_papers(analyzed, profile)
	}

	/// Rebuilds an embedded profile from its persisted form. Terms without an embedding are
	/// dropped.
	pub async fn hydrate_profile(&self, snapshot: &ProfileSnapshot) -> PreferenceProfile {
		let table = self.resolve_embeddings(&snapshot.values()).await;
		let hydrated = PreferenceProfile::hydrate(snapshot, &table);

		for value in &hydrated.missing {
			tracing::warn!(value = %value, "Profile term dropped without an embedding.");
		}

		hydrated.value
	}

	pub(crate) fn context_hints(&self, profile: &PreferenceProfile) -> Option<ContextHints> {
		let limit = self.cfg.extraction.context_hint_limit as usize;

		if limit == 0 {
			return None;
		}

		let hints = profile.context_hints(limit);

		(!hints.is_empty()).then_some(hints)
	}
}
