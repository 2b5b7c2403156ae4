use std::collections::HashSet;

use tokio::task::JoinSet;

use crate::PodpaperService;
use podpaper_domain::embedding::EmbeddingTable;

impl PodpaperService {
	/// Embeds the distinct `values` in `batch_size` chunks that run concurrently.
	///
	/// The table may be incomplete. Values the provider omitted, returned with the wrong
	/// dimension, or lost to a failed chunk are logged and left out.
	pub async fn resolve_embeddings(&self, values: &[String]) -> EmbeddingTable {
		let unique = dedup(values);
		let mut table = EmbeddingTable::new();

		if unique.is_empty() {
			return table;
		}

		let cfg = &self.cfg.providers.embedding;
		let dimensions = cfg.dimensions as usize;
		let batch_size = (cfg.batch_size as usize).max(1);
		let mut tasks = JoinSet::new();

		for chunk in unique.chunks(batch_size) {
			let provider = self.providers.embedding.clone();
			let cfg = cfg.clone();
			let chunk = chunk.to_vec();

			tasks.spawn(async move {
				let result = provider.embed(&cfg, &chunk).await;

				(chunk, result)
			});
		}

		while let Some(joined) = tasks.join_next().await {
			let (chunk, result) = match joined {
				Ok(done) => done,
				Err(err) => {
					tracing::warn!(error = %err, "Embedding task did not complete.");

					continue;
				},
			};
			let vectors = match result {
				Ok(vectors) => vectors,
				Err(err) => {
					tracing::warn!(
						error = %err,
						count = chunk.len(),
						"Embedding chunk failed. Its values are dropped."
					);

					continue;
				},
			};
			let mut vectors = vectors.into_iter();

			for value in chunk {
				match vectors.next() {
					Some(vec) if vec.len() == dimensions => table.insert(value, vec),
					Some(vec) if !vec.is_empty() => {
						tracing::warn!(
							value = %value,
							expected = dimensions,
							actual = vec.len(),
							"Embedding dimension mismatch. Value dropped."
						);
					},
					_ => tracing::warn!(value = %value, "Embedding missing. Value dropped."),
				}
			}
		}

		table
	}
}

fn dedup(values: &[String]) -> Vec<String> {
	let mut seen = HashSet::new();

	values.iter().filter(|value| seen.insert(value.as_str())).cloned().collect()
}
