//! Cosine similarity and its aggregations over sets of embeddings.

use crate::{Error, Result};

/// Cosine similarity of two vectors of equal length.
///
/// Returns a value in [-1.0, 1.0]. A zero-norm vector has no direction and yields 0.0.
pub fn cosine_similarity(lhs: &[f32], rhs: &[f32]) -> Result<f32> {
	if lhs.len() != rhs.len() {
		return Err(Error::DimensionMismatch { left: lhs.len(), right: rhs.len() });
	}

	let mut dot = 0.0_f64;
	let mut lhs_norm = 0.0_f64;
	let mut rhs_norm = 0.0_f64;

	for (&l, &r) in lhs.iter().zip(rhs.iter()) {
		let l = f64::from(l);
		let r = f64::from(r);

		dot = l.mul_add(r, dot);
		lhs_norm = l.mul_add(l, lhs_norm);
		rhs_norm = r.mul_add(r, rhs_norm);
	}

	let denom = lhs_norm.sqrt() * rhs_norm.sqrt();

	if denom < 1e-12 {
		return Ok(0.0);
	}

	Ok((dot / denom).clamp(-1.0, 1.0) as f32)
}

/// Greatest similarity between `vector` and any candidate that exceeds `threshold`.
///
/// `None` means no candidate qualified (including an empty candidate set), which callers can
/// tell apart from a genuine `Some(0.0)`.
pub fn max_similarity<C>(vector: &[f32], candidates: &[C], threshold: f32) -> Result<Option<f32>>
where
	C: AsRef<[f32]>,
{
	let mut best: Option<f32> = None;

	for candidate in candidates {
		let similarity = cosine_similarity(vector, candidate.as_ref())?;

		if similarity > threshold && best.map(|value| similarity > value).unwrap_or(true) {
			best = Some(similarity);
		}
	}

	Ok(best)
}

/// Alpha-blended max and weighted average similarity of `targets` against `sources`.
///
/// For each target the best similarity over all sources is taken. Targets at or below
/// `threshold`, and targets whose weight is not positive, are ignored. With no surviving target
/// the result is 0.0. Otherwise the result is
/// `alpha * max(sim * weight) + (1 - alpha) * sum(sim * weight) / sum(weight)`.
///
/// Without `weights` every target weighs 1.0.
pub fn combined_similarity<S, T>(
	sources: &[S],
	targets: &[T],
	weights: Option<&[f32]>,
	threshold: f32,
	alpha: f32,
) -> Result<f32>
where
	S: AsRef<[f32]>,
	T: AsRef<[f32]>,
{
	if let Some(weights) = weights
		&& weights.len() != targets.len()
	{
		return Err(Error::WeightCountMismatch { targets: targets.len(), weights: weights.len() });
	}

	let mut sum_weighted = 0.0_f32;
	let mut total_weight = 0.0_f32;
	let mut max_weighted: Option<f32> = None;

	for (index, target) in targets.iter().enumerate() {
		let weight = weights.map(|weights| weights[index]).unwrap_or(1.0);

		if weight.is_nan() || weight <= 0.0 {
			continue;
		}

		let Some(local_max) = best_match(target.as_ref(), sources)? else { continue };

		if local_max <= threshold {
			continue;
		}

		let weighted = local_max * weight;

		sum_weighted += weighted;
		total_weight += weight;

		if max_weighted.map(|value| weighted > value).unwrap_or(true) {
			max_weighted = Some(weighted);
		}
	}

	let Some(max_weighted) = max_weighted else {
		return Ok(0.0);
	};

	if total_weight <= 0.0 {
		return Ok(0.0);
	}

	Ok(alpha * max_weighted + (1.0 - alpha) * (sum_weighted / total_weight))
}

fn best_match<S>(target: &[f32], sources: &[S]) -> Result<Option<f32>>
where
	S: AsRef<[f32]>,
{
	let mut best: Option<f32> = None;

	for source in sources {
		let similarity = cosine_similarity(source.as_ref(), target)?;

		if best.map(|value| similarity > value).unwrap_or(true) {
			best = Some(similarity);
		}
	}

	Ok(best)
}
