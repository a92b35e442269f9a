//! Model hyperparameter configuration.

use ndarray::Array2;

use crate::error::RbmError;
use crate::model::SpikeSlabRbm;

/// Spike-and-slab RBM hyperparameters, deserializable from TOML/JSON.
///
/// Dimensions are problem-specific and therefore required; the scalar
/// hyperparameters carry defaults. `slab_precision` here is a single value
/// broadcast to the full `(pool, hidden)` matrix — use
/// [`SpikeSlabRbm::new`] directly when a non-uniform matrix is needed.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct RbmConfig {
    /// Number of visible units (V).
    pub visible_size: usize,

    /// Number of hidden spike gates (H).
    pub hidden_size: usize,

    /// Number of slab units pooled under each spike gate (P).
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,

    /// Uniform slab precision, broadcast to a (P, H) matrix.
    #[serde(default = "default_slab_precision")]
    pub slab_precision: f64,

    /// Euclidean-norm bound for accepted visible samples.
    #[serde(default = "default_radius")]
    pub radius: f64,
}

fn default_pool_size() -> usize {
    1
}
fn default_slab_precision() -> f64 {
    1.0
}
fn default_radius() -> f64 {
    10.0
}

impl RbmConfig {
    /// Log a warning for hyperparameter values that will make the model
    /// unusable or degenerate.
    pub fn validate(&self) {
        if self.visible_size == 0 || self.hidden_size == 0 || self.pool_size == 0 {
            tracing::warn!(
                visible_size = self.visible_size,
                hidden_size = self.hidden_size,
                pool_size = self.pool_size,
                "model dimension is zero; every operation will be a no-op"
            );
        }
        if self.slab_precision <= 0.0 {
            tracing::warn!(
                slab_precision = self.slab_precision,
                "slab precision must be strictly positive; sampling and energy will fail"
            );
        }
        if self.radius <= 0.0 {
            tracing::warn!(
                radius = self.radius,
                "non-positive radius; every visible sample will exhaust its trial budget"
            );
        }
    }

    /// Build a model with the uniform slab-precision matrix.
    pub fn build(&self) -> Result<SpikeSlabRbm, RbmError> {
        let slab_precision =
            Array2::from_elem((self.pool_size, self.hidden_size), self.slab_precision);
        SpikeSlabRbm::new(
            self.visible_size,
            self.hidden_size,
            self.pool_size,
            slab_precision,
            self.radius,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: RbmConfig =
            serde_json::from_str(r#"{"visible_size": 6, "hidden_size": 3}"#).unwrap();
        assert_eq!(config.pool_size, 1);
        assert_eq!(config.slab_precision, 1.0);
        assert_eq!(config.radius, 10.0);
        config.validate();
    }

    #[test]
    fn test_build_broadcasts_slab_precision() {
        let config = RbmConfig {
            visible_size: 4,
            hidden_size: 2,
            pool_size: 3,
            slab_precision: 2.5,
            radius: 5.0,
        };
        let model = config.build().unwrap();
        assert_eq!(model.slab_precision().shape(), &[3, 2]);
        assert!(model.slab_precision().iter().all(|&a| a == 2.5));
        assert_eq!(model.radius(), 5.0);
    }
}
