use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedTerm {
	pub value: String,
	pub embedding: Vec<f32>,
}
impl EmbeddedTerm {
	pub fn new(value: impl Into<String>, embedding: Vec<f32>) -> Self {
		Self { value: value.into(), embedding }
	}
}

/// Resolved embeddings keyed by their literal (case-sensitive) text.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingTable {
	vectors: HashMap<String, Vec<f32>>,
}
impl EmbeddingTable {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, value: impl Into<String>, embedding: Vec<f32>) {
		self.vectors.insert(value.into(), embedding);
	}

	pub fn get(&self, value: &str) -> Option<&[f32]> {
		self.vectors.get(value).map(Vec::as_slice)
	}

	pub fn contains(&self, value: &str) -> bool {
		self.vectors.contains_key(value)
	}

	pub fn len(&self) -> usize {
		self.vectors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.vectors.is_empty()
	}

	/// Pairs each value with its embedding, skipping values the table cannot resolve.
	pub fn embed_all<'a, I>(&self, values: I, missing: &mut Vec<String>) -> Vec<EmbeddedTerm>
	where
		I: IntoIterator<Item = &'a String>,
	{
		let mut out = Vec::new();

		for value in values {
			match self.get(value) {
				Some(embedding) => out.push(EmbeddedTerm::new(value.clone(), embedding.to_vec())),
				None => missing.push(value.clone()),
			}
		}

		out
	}
}
impl FromIterator<EmbeddedTerm> for EmbeddingTable {
	fn from_iter<I: IntoIterator<Item = EmbeddedTerm>>(iter: I) -> Self {
		let mut table = Self::new();

		for term in iter {
			table.insert(term.value, term.embedding);
		}

		table
	}
}

/// A value built from an [`EmbeddingTable`] together with the texts that had no embedding and
/// were therefore dropped.
#[derive(Debug, Clone)]
pub struct Hydrated<T> {
	pub value: T,
	pub missing: Vec<String>,
}
