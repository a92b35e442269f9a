//! Closed-form conditional means of the spike, slab, and visible variables.

use ndarray::{s, Array1, Array2, ArrayView1};
use rand::Rng;

use crate::error::RbmError;
use crate::math::logistic;
use crate::model::SpikeSlabRbm;

impl SpikeSlabRbm {
    /// Probability that each spike gate is active given the visible layer,
    /// with the slab marginalized out:
    ///
    /// `logistic( 0.5 · Σ_k (vᵗ w_ik)² / α_ki + b_i )`
    ///
    /// Strictly inside (0, 1) for finite inputs: where `logistic` would
    /// round to exactly 0 or 1 in f64, the result is clamped to the nearest
    /// interior values so the gate probability never degenerates.
    pub fn spike_mean(&self, visible: ArrayView1<'_, f64>) -> Result<Array1<f64>, RbmError> {
        Self::check_len("visible input", visible.len(), self.visible_size())?;
        self.check_slab_precision_positive()?;

        let weight = self.weight();
        let spike_bias = self.spike_bias();
        let slab_precision = self.slab_precision();
        let mut mean = Array1::zeros(self.hidden_size());
        for i in 0..self.hidden_size() {
            let mut activation = spike_bias[i];
            for k in 0..self.pool_size() {
                let projection = weight.slice(s![i, k, ..]).dot(&visible);
                activation += 0.5 * projection * projection / slab_precision[[k, i]];
            }
            // logistic saturates to exactly 0.0 / 1.0 for |activation| beyond
            // the f64 range; the Bernoulli mean must stay strictly interior.
            mean[i] = logistic(activation).clamp(f64::MIN_POSITIVE, 1.0 - f64::EPSILON / 2.0);
        }
        Ok(mean)
    }

    /// Conditional slab mean given the visible layer and a spike
    /// configuration, as a `(pool, hidden)` matrix:
    ///
    /// `slab_mean[k, i] = spike_i · (vᵗ w_ik) / α_ki`
    ///
    /// Column `i` is exactly zero whenever `spike[i]` is zero — the slab only
    /// contributes when its gate fires.
    pub fn slab_mean(
        &self,
        visible: ArrayView1<'_, f64>,
        spike: ArrayView1<'_, f64>,
    ) -> Result<Array2<f64>, RbmError> {
        Self::check_len("visible input", visible.len(), self.visible_size())?;
        Self::check_len("spike vector", spike.len(), self.hidden_size())?;
        self.check_slab_precision_positive()?;

        let weight = self.weight();
        let slab_precision = self.slab_precision();
        let mut mean = Array2::zeros((self.pool_size(), self.hidden_size()));
        for i in 0..self.hidden_size() {
            if spike[i] == 0.0 {
                continue;
            }
            for k in 0..self.pool_size() {
                let projection = weight.slice(s![i, k, ..]).dot(&visible);
                mean[[k, i]] = spike[i] * projection / slab_precision[[k, i]];
            }
        }
        Ok(mean)
    }

    /// Conditional visible mean given a flattened hidden buffer
    /// (H spike entries followed by P·H slab entries, see
    /// [`pack_hidden`](Self::pack_hidden)):
    ///
    /// `visible_mean[v] = ( Σ_i spike_i · Σ_k w_ikv · slab_ki ) / λ_v`
    pub fn visible_mean(&self, hidden: ArrayView1<'_, f64>) -> Result<Array1<f64>, RbmError> {
        Self::check_len("hidden buffer", hidden.len(), self.hidden_len())?;
        self.check_visible_precision_positive()?;

        let h = self.hidden_size();
        let p = self.pool_size();
        let weight = self.weight();
        let mut out = Array1::zeros(self.visible_size());
        for i in 0..h {
            let spike = hidden[i];
            if spike == 0.0 {
                continue;
            }
            for k in 0..p {
                let coeff = spike * hidden[h + i * p + k];
                out.scaled_add(coeff, &weight.slice(s![i, k, ..]));
            }
        }
        let visible_precision = self.visible_precision();
        for (x, lambda) in out.iter_mut().zip(visible_precision.iter()) {
            *x /= lambda;
        }
        Ok(out)
    }

    /// Hidden mean with the gate handling inherited from the original model:
    /// the spike entries hold the deterministic spike *mean*, but the slab
    /// entries are conditioned on a spike configuration *sampled* from that
    /// mean. The embedded draw is intentional — the contrastive-divergence
    /// trainer relies on the gated sparsity — so this is not a pure
    /// expectation; see [`expected_hidden`](Self::expected_hidden) for the
    /// fully deterministic variant.
    pub fn hidden_mean<R: Rng>(
        &self,
        visible: ArrayView1<'_, f64>,
        rng: &mut R,
    ) -> Result<Array1<f64>, RbmError> {
        let spike_mean = self.spike_mean(visible)?;
        let spike_sample = self.sample_spike(spike_mean.view(), rng)?;
        let slab_mean = self.slab_mean(visible, spike_sample.view())?;
        Ok(self.pack_hidden(spike_mean.view(), slab_mean.view()))
    }

    /// Fully deterministic hidden mean: spike mean, and slab mean conditioned
    /// on the spike mean itself rather than a sampled gate.
    pub fn expected_hidden(&self, visible: ArrayView1<'_, f64>) -> Result<Array1<f64>, RbmError> {
        let spike_mean = self.spike_mean(visible)?;
        let slab_mean = self.slab_mean(visible, spike_mean.view())?;
        Ok(self.pack_hidden(spike_mean.view(), slab_mean.view()))
    }
}
