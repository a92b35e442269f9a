//! Stochastic realizations of the spike, slab, and visible variables.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::Rng;
use rand_distr::StandardNormal;

use crate::error::RbmError;
use crate::model::SpikeSlabRbm;

/// Trial cap for the bounded visible rejection sampler.
const MAX_VISIBLE_TRIALS: usize = 10;

/// One draw from the bounded visible rejection sampler.
///
/// `in_bounds` is false when every trial fell outside the radius and the
/// last (out-of-radius) draw was returned anyway; callers decide how to
/// react instead of the rejection being swallowed.
#[derive(Debug, Clone)]
pub struct VisibleSample {
    pub values: Array1<f64>,
    pub in_bounds: bool,
    /// Number of Gaussian trials actually drawn (1..=10).
    pub trials: usize,
}

fn gaussian<R: Rng>(rng: &mut R, mean: f64, variance: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    mean + variance.sqrt() * z
}

impl SpikeSlabRbm {
    /// Independent Bernoulli draw per hidden unit with success probability
    /// `spike_mean[i]`; outputs are 0.0 / 1.0.
    pub fn sample_spike<R: Rng>(
        &self,
        spike_mean: ArrayView1<'_, f64>,
        rng: &mut R,
    ) -> Result<Array1<f64>, RbmError> {
        Self::check_len("spike mean", spike_mean.len(), self.hidden_size())?;
        let mut spike = Array1::zeros(self.hidden_size());
        for (i, &mean) in spike_mean.iter().enumerate() {
            if !(0.0..=1.0).contains(&mean) {
                return Err(RbmError::InvalidSpikeMean {
                    index: i,
                    value: mean,
                });
            }
            spike[i] = if rng.gen_bool(mean) { 1.0 } else { 0.0 };
        }
        Ok(spike)
    }

    /// Independent Gaussian draw per `(pool, hidden)` cell with mean
    /// `slab_mean[k, i]` and variance `1 / slab_precision[k, i]`.
    pub fn sample_slab<R: Rng>(
        &self,
        slab_mean: ArrayView2<'_, f64>,
        rng: &mut R,
    ) -> Result<Array2<f64>, RbmError> {
        Self::check_len(
            "slab mean",
            slab_mean.len(),
            self.pool_size() * self.hidden_size(),
        )?;
        self.check_slab_precision_positive()?;

        let slab_precision = self.slab_precision();
        let mut slab = Array2::zeros((self.pool_size(), self.hidden_size()));
        for i in 0..self.hidden_size() {
            for k in 0..self.pool_size() {
                slab[[k, i]] = gaussian(rng, slab_mean[[k, i]], 1.0 / slab_precision[[k, i]]);
            }
        }
        Ok(slab)
    }

    /// Bounded-effort rejection sampler for the visible layer.
    ///
    /// Computes the conditional visible mean, then draws each unit from
    /// `Gaussian(mean_v, 1/λ_v)` for up to 10 trials, stopping as soon as the
    /// drawn vector's Euclidean norm falls below the radius. If no trial
    /// lands inside, the last draw is returned with `in_bounds == false`.
    pub fn sample_visible<R: Rng>(
        &self,
        hidden: ArrayView1<'_, f64>,
        rng: &mut R,
    ) -> Result<VisibleSample, RbmError> {
        let mean = self.visible_mean(hidden)?;
        let visible_precision = self.visible_precision();

        let mut values = Array1::zeros(self.visible_size());
        let mut in_bounds = false;
        let mut trials = 0;
        for _ in 0..MAX_VISIBLE_TRIALS {
            trials += 1;
            for (v, x) in values.iter_mut().enumerate() {
                *x = gaussian(rng, mean[v], 1.0 / visible_precision[v]);
            }
            if values.dot(&values).sqrt() < self.radius() {
                in_bounds = true;
                break;
            }
        }
        if !in_bounds {
            tracing::debug!(
                trials,
                radius = self.radius(),
                "visible sample stayed out of radius on every trial; returning last draw"
            );
        }
        Ok(VisibleSample {
            values,
            in_bounds,
            trials,
        })
    }

    /// Full stochastic hidden draw used to advance a Gibbs chain:
    /// spike mean → spike sample → slab mean from the sampled spike →
    /// slab sample. Returns the flattened hidden buffer.
    pub fn sample_hidden<R: Rng>(
        &self,
        visible: ArrayView1<'_, f64>,
        rng: &mut R,
    ) -> Result<Array1<f64>, RbmError> {
        let spike_mean = self.spike_mean(visible)?;
        let spike = self.sample_spike(spike_mean.view(), rng)?;
        let slab_mean = self.slab_mean(visible, spike.view())?;
        let slab = self.sample_slab(slab_mean.view(), rng)?;
        Ok(self.pack_hidden(spike.view(), slab.view()))
    }
}
