pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
	#[error("Embedding dimension mismatch: {left} vs {right}.")]
	DimensionMismatch { left: usize, right: usize },
	#[error("Weight count mismatch: {targets} targets but {weights} weights.")]
	WeightCountMismatch { targets: usize, weights: usize },
}
