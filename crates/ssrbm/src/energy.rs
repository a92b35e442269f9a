//! Marginal free energy of a visible configuration.

use std::f64::consts::PI;

use ndarray::{s, ArrayView1};

use crate::error::RbmError;
use crate::math::softplus;
use crate::model::SpikeSlabRbm;

impl SpikeSlabRbm {
    /// Free energy of `visible` with the slab variable analytically
    /// integrated out:
    ///
    /// ```text
    /// F(v) =  0.5 · vᵗ diag(λ) v
    ///       − Σ_i Σ_k 0.5 · ln(2π / α_ki)
    ///       − Σ_i softplus( b_i + Σ_k (vᵗ w_ik)² / (2 α_ki) )
    /// ```
    ///
    /// where `λ` is the visible precision, `α` the slab precision, `b` the
    /// spike bias, and `w_ik` the filter for pool member `k` of hidden unit
    /// `i`. The marginalization is what lets likelihood monitoring evaluate
    /// this without any slab sampling. Pure function, deterministic and
    /// finite for finite inputs.
    pub fn free_energy(&self, visible: ArrayView1<'_, f64>) -> Result<f64, RbmError> {
        Self::check_len("visible input", visible.len(), self.visible_size())?;
        self.check_slab_precision_positive()?;

        let visible_precision = self.visible_precision();
        let mut energy = 0.5
            * visible
                .iter()
                .zip(visible_precision.iter())
                .map(|(x, lambda)| lambda * x * x)
                .sum::<f64>();

        let slab_precision = self.slab_precision();
        for &alpha in slab_precision.iter() {
            energy -= 0.5 * (2.0 * PI / alpha).ln();
        }

        let weight = self.weight();
        let spike_bias = self.spike_bias();
        for i in 0..self.hidden_size() {
            let mut quadratic = 0.0;
            for k in 0..self.pool_size() {
                let projection = weight.slice(s![i, k, ..]).dot(&visible);
                quadratic += projection * projection / (2.0 * slab_precision[[k, i]]);
            }
            energy -= softplus(spike_bias[i] + quadratic);
        }

        Ok(energy)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{arr1, Array1, Array2};
    use rand::{Rng, SeedableRng};

    use super::*;

    #[test]
    fn test_zero_visible_closed_form() {
        // V=3, H=1, P=1, alpha=1, zero parameters: the quadratic and weight
        // terms vanish, leaving -0.5*ln(2*pi) - softplus(0).
        let slab_precision = Array2::from_elem((1, 1), 1.0);
        let model = SpikeSlabRbm::new(3, 1, 1, slab_precision, 10.0).unwrap();
        let visible = arr1(&[0.0, 0.0, 0.0]);
        let energy = model.free_energy(visible.view()).unwrap();
        let expected = -0.5 * (2.0 * PI).ln() - 2.0_f64.ln();
        assert!(
            (energy - expected).abs() < 1e-12,
            "expected {expected}, got {energy}"
        );
    }

    #[test]
    fn test_spike_bias_shifts_closed_form() {
        let slab_precision = Array2::from_elem((1, 1), 1.0);
        let mut model = SpikeSlabRbm::new(3, 1, 1, slab_precision, 10.0).unwrap();
        let bias_offset = model.layout().spike_bias_range().start;
        model.parameters_mut()[bias_offset] = 1.5;
        let visible = arr1(&[0.0, 0.0, 0.0]);
        let energy = model.free_energy(visible.view()).unwrap();
        let expected = -0.5 * (2.0 * PI).ln() - crate::math::softplus(1.5);
        assert!((energy - expected).abs() < 1e-12);
    }

    #[test]
    fn test_deterministic_and_finite() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let slab_precision = Array2::from_elem((2, 4), 1.5);
        let mut model = SpikeSlabRbm::new(5, 4, 2, slab_precision, 10.0).unwrap();
        for x in model.parameters_mut() {
            *x = rng.gen_range(-1.0..1.0);
        }
        // Precisions must be positive to be meaningful; energy is finite
        // regardless of weight values.
        let vp_range = model.layout().visible_precision_range();
        for idx in vp_range {
            model.parameters_mut()[idx] = 2.0;
        }
        let visible = Array1::from_iter((0..5).map(|v| (v as f64) * 0.3 - 0.7));
        let first = model.free_energy(visible.view()).unwrap();
        let second = model.free_energy(visible.view()).unwrap();
        assert!(first.is_finite());
        assert_eq!(first, second);
    }

    #[test]
    fn test_rejects_wrong_input_length() {
        let slab_precision = Array2::from_elem((1, 1), 1.0);
        let model = SpikeSlabRbm::new(3, 1, 1, slab_precision, 10.0).unwrap();
        let err = model.free_energy(arr1(&[0.0, 0.0]).view()).unwrap_err();
        assert!(matches!(err, RbmError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_rejects_non_positive_slab_precision() {
        let slab_precision = Array2::from_elem((1, 1), 0.0);
        let model = SpikeSlabRbm::new(3, 1, 1, slab_precision, 10.0).unwrap();
        let err = model.free_energy(arr1(&[0.0, 0.0, 0.0]).view()).unwrap_err();
        assert!(matches!(err, RbmError::NonPositiveSlabPrecision { .. }));
    }
}
