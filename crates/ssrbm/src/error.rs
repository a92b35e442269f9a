/// Errors surfaced by spike-and-slab RBM operations.
///
/// Every mean/sample/gradient/energy operation validates its inputs up front
/// and returns one of these instead of aborting, so the trainer driving the
/// model can decide how to react.
#[derive(Debug, thiserror::Error)]
pub enum RbmError {
    /// An input vector or buffer had the wrong number of elements.
    #[error("{what}: expected {expected} elements, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The slab precision hyperparameter was not a pool_size x hidden_size matrix.
    #[error("slab precision must be {expected_rows}x{expected_cols} (pool x hidden), got {rows}x{cols}")]
    SlabPrecisionShape {
        expected_rows: usize,
        expected_cols: usize,
        rows: usize,
        cols: usize,
    },

    /// A slab precision entry was used in a reciprocal or variance role while <= 0.
    #[error("slab precision ({row}, {col}) must be strictly positive, got {value}")]
    NonPositiveSlabPrecision { row: usize, col: usize, value: f64 },

    /// A visible precision entry was used in a reciprocal or variance role while <= 0.
    #[error("visible precision [{index}] must be strictly positive, got {value}")]
    NonPositiveVisiblePrecision { index: usize, value: f64 },

    /// A Bernoulli success probability fell outside [0, 1].
    #[error("spike mean [{index}] must lie in [0, 1], got {value}")]
    InvalidSpikeMean { index: usize, value: f64 },
}
