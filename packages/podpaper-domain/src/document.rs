use serde::{Deserialize, Serialize};

use crate::embedding::{EmbeddedTerm, EmbeddingTable, Hydrated};

/// A candidate paper as received from a feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
	pub id: String,
	pub title: String,
	pub summary: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub link: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub author: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub published: Option<String>,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaperType {
	Empirical,
	Theoretical,
	Literature,
	Experimental,
	Simulation,
}
impl PaperType {
	pub fn parse(raw: &str) -> Option<Self> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"empirical" => Some(Self::Empirical),
			"theoretical" => Some(Self::Theoretical),
			"literature" => Some(Self::Literature),
			"experimental" => Some(Self::Experimental),
			"simulation" => Some(Self::Simulation),
			_ => None,
		}
	}
}

/// Structured metadata extracted from a paper's text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentFacets {
	pub topic: String,
	#[serde(default)]
	pub tags: Vec<String>,
	#[serde(default)]
	pub target: Vec<String>,
	#[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
	pub paper_type: Option<PaperType>,
}
impl DocumentFacets {
	/// Every text that needs an embedding: topic, then targets, then tags.
	pub fn values(&self) -> impl Iterator<Item = &String> {
		std::iter::once(&self.topic).chain(self.target.iter()).chain(self.tags.iter())
	}

	/// Pairs each facet value with its embedding. Values the table cannot resolve are dropped
	/// and reported.
	pub fn embed(&self, table: &EmbeddingTable) -> Hydrated<DocumentEmbeddedFacets> {
		let mut missing = Vec::new();
		let topic = match table.get(&self.topic) {
			Some(embedding) => Some(EmbeddedTerm::new(self.topic.clone(), embedding.to_vec())),
			None => {
				missing.push(self.topic.clone());

				None
			},
		};
		let tags = table.embed_all(&self.tags, &mut missing);
		let target = table.embed_all(&self.target, &mut missing);

		Hydrated { value: DocumentEmbeddedFacets { topic, tags, target }, missing }
	}
}

/// Facets with embeddings attached. A facet with no resolvable text is empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentEmbeddedFacets {
	pub topic: Option<EmbeddedTerm>,
	pub tags: Vec<EmbeddedTerm>,
	pub target: Vec<EmbeddedTerm>,
}
impl DocumentEmbeddedFacets {
	pub fn topic_embeddings(&self) -> Vec<&[f32]> {
		self.topic.iter().map(|term| term.embedding.as_slice()).collect()
	}

	pub fn tag_embeddings(&self) -> Vec<&[f32]> {
		self.tags.iter().map(|term| term.embedding.as_slice()).collect()
	}

	pub fn target_embeddings(&self) -> Vec<&[f32]> {
		self.target.iter().map(|term| term.embedding.as_slice()).collect()
	}
}

/// A paper together with the facets extracted from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedPaper {
	#[serde(flatten)]
	pub paper: Paper,
	pub facets: DocumentFacets,
}
