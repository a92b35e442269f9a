//! Contrastive-divergence gradient accumulation.
//!
//! The positive and negative phases run the identical procedure on different
//! visible vectors (training data vs. a Gibbs-chain sample); the external
//! trainer combines the two outputs — typically positive minus negative —
//! into the final parameter update.

use ndarray::ArrayView1;
use rand::Rng;

use crate::error::RbmError;
use crate::model::SpikeSlabRbm;

impl SpikeSlabRbm {
    /// Data-driven gradient step: `input` is a training example.
    ///
    /// `gradient` must have the parameter buffer's length and is written with
    /// the identical offset layout (weight, spike bias, visible precision).
    pub fn positive_phase<R: Rng>(
        &self,
        input: ArrayView1<'_, f64>,
        gradient: &mut [f64],
        rng: &mut R,
    ) -> Result<(), RbmError> {
        self.phase(input, gradient, rng)
    }

    /// Model-sample-driven gradient step: `input` is a visible vector drawn
    /// from the Gibbs chain.
    pub fn negative_phase<R: Rng>(
        &self,
        input: ArrayView1<'_, f64>,
        gradient: &mut [f64],
        rng: &mut R,
    ) -> Result<(), RbmError> {
        self.phase(input, gradient, rng)
    }

    /// Shared phase procedure:
    /// 1. spike mean from `input`;
    /// 2. spike sample from that mean;
    /// 3. slab mean conditioned on the sampled spike;
    /// 4. weight slice `i` = `input ⊗ slab_mean[:, i]`, scaled by the sampled
    ///    spike — zero for units whose gate did not fire;
    /// 5. spike-bias gradient = spike mean (mean-based, not sample-based);
    /// 6. visible-precision gradient = `-0.5 · input_v²`.
    fn phase<R: Rng>(
        &self,
        input: ArrayView1<'_, f64>,
        gradient: &mut [f64],
        rng: &mut R,
    ) -> Result<(), RbmError> {
        Self::check_len("visible input", input.len(), self.visible_size())?;
        Self::check_len("gradient buffer", gradient.len(), self.layout().len())?;

        let spike_mean = self.spike_mean(input)?;
        let spike_sample = self.sample_spike(spike_mean.view(), rng)?;
        let slab_mean = self.slab_mean(input, spike_sample.view())?;

        let layout = self.layout();
        for i in 0..self.hidden_size() {
            for k in 0..self.pool_size() {
                let coeff = spike_sample[i] * slab_mean[[k, i]];
                let dst = &mut gradient[layout.pool_filter_range(i, k)];
                if coeff == 0.0 {
                    dst.fill(0.0);
                } else {
                    for (g, &x) in dst.iter_mut().zip(input.iter()) {
                        *g = coeff * x;
                    }
                }
            }
        }

        let bias_grad = &mut gradient[layout.spike_bias_range()];
        for (g, &mean) in bias_grad.iter_mut().zip(spike_mean.iter()) {
            *g = mean;
        }

        let precision_grad = &mut gradient[layout.visible_precision_range()];
        for (g, &x) in precision_grad.iter_mut().zip(input.iter()) {
            *g = -0.5 * x * x;
        }

        Ok(())
    }
}
