//! The spike-and-slab RBM model: dimensions, hyperparameters, and the flat
//! parameter buffer with its derived views.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, ArrayView3};

use crate::error::RbmError;
use crate::layout::ParamLayout;

/// Spike-and-slab RBM policy for a generic contrastive-divergence trainer.
///
/// Owns one contiguous `f64` buffer holding every learnable value (weight
/// tensor, spike bias, visible precision — see [`ParamLayout`]) plus the
/// untrained hyperparameters: the `(pool, hidden)` slab precision matrix and
/// the radius bounding accepted visible samples.
///
/// All intermediates are allocated per call, so every operation takes `&self`
/// and is safe to call reentrantly; the external trainer supplies the RNG for
/// the stochastic operations.
#[derive(Debug)]
pub struct SpikeSlabRbm {
    layout: ParamLayout,
    slab_precision: Array2<f64>,
    radius: f64,
    parameters: Vec<f64>,
}

impl SpikeSlabRbm {
    /// Build a model with a zero-initialized parameter buffer.
    ///
    /// Fails unless `slab_precision` has shape `(pool_size, hidden_size)`.
    /// Entry positivity is checked at each use in a reciprocal or variance
    /// role, mirroring where the constraint actually bites.
    pub fn new(
        visible_size: usize,
        hidden_size: usize,
        pool_size: usize,
        slab_precision: Array2<f64>,
        radius: f64,
    ) -> Result<Self, RbmError> {
        if slab_precision.nrows() != pool_size || slab_precision.ncols() != hidden_size {
            return Err(RbmError::SlabPrecisionShape {
                expected_rows: pool_size,
                expected_cols: hidden_size,
                rows: slab_precision.nrows(),
                cols: slab_precision.ncols(),
            });
        }
        let layout = ParamLayout::new(visible_size, hidden_size, pool_size);
        let parameters = vec![0.0; layout.len()];
        Ok(Self {
            layout,
            slab_precision,
            radius,
            parameters,
        })
    }

    pub fn visible_size(&self) -> usize {
        self.layout.visible_size
    }

    pub fn hidden_size(&self) -> usize {
        self.layout.hidden_size
    }

    pub fn pool_size(&self) -> usize {
        self.layout.pool_size
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn layout(&self) -> ParamLayout {
        self.layout
    }

    pub fn slab_precision(&self) -> ArrayView2<'_, f64> {
        self.slab_precision.view()
    }

    /// The flat parameter buffer the external optimizer reads.
    pub fn parameters(&self) -> &[f64] {
        &self.parameters
    }

    /// Mutable access for in-place parameter updates. The buffer length is
    /// fixed through this view, so no `reset()` is needed afterwards.
    pub fn parameters_mut(&mut self) -> &mut [f64] {
        &mut self.parameters
    }

    /// Replace the parameter buffer wholesale (e.g. after deserialization).
    ///
    /// The incoming buffer is validated against the layout before it is
    /// installed; on a length mismatch the current buffer stays in place and
    /// the model remains usable.
    pub fn set_parameters(&mut self, parameters: Vec<f64>) -> Result<(), RbmError> {
        Self::check_len("parameter buffer", parameters.len(), self.layout.len())?;
        self.parameters = parameters;
        Ok(())
    }

    /// Revalidate the parameter buffer against the layout.
    ///
    /// The original aliased-view scheme required re-deriving raw views here;
    /// with on-demand views the only thing that can go stale is the buffer
    /// length itself. Must be called after any wholesale buffer replacement.
    pub fn reset(&mut self) -> Result<(), RbmError> {
        if self.parameters.len() != self.layout.len() {
            return Err(RbmError::DimensionMismatch {
                what: "parameter buffer",
                expected: self.layout.len(),
                actual: self.parameters.len(),
            });
        }
        Ok(())
    }

    /// Weight tensor view, shape `(hidden, pool, visible)`.
    ///
    /// `weight[(i, k, ..)]` is the length-V filter connecting the visible
    /// layer to pool member `k` of hidden unit `i`.
    pub fn weight(&self) -> ArrayView3<'_, f64> {
        let shape = (
            self.layout.hidden_size,
            self.layout.pool_size,
            self.layout.visible_size,
        );
        ArrayView3::from_shape(shape, &self.parameters[self.layout.weight_range()])
            .expect("weight region length is fixed by the layout")
    }

    /// Per-hidden-unit spike bias view, length H.
    pub fn spike_bias(&self) -> ArrayView1<'_, f64> {
        ArrayView1::from(&self.parameters[self.layout.spike_bias_range()])
    }

    /// Diagonal visible precision view, length V.
    pub fn visible_precision(&self) -> ArrayView1<'_, f64> {
        ArrayView1::from(&self.parameters[self.layout.visible_precision_range()])
    }

    /// Length of the flattened hidden buffer: H spike entries followed by
    /// P·H slab entries grouped per hidden unit (`slab(k, i)` at `H + i·P + k`).
    pub fn hidden_len(&self) -> usize {
        self.layout.hidden_size + self.layout.pool_size * self.layout.hidden_size
    }

    /// Pack a spike vector and a `(pool, hidden)` slab matrix into the
    /// flattened hidden buffer convention above.
    pub fn pack_hidden(&self, spike: ArrayView1<'_, f64>, slab: ArrayView2<'_, f64>) -> Array1<f64> {
        let h = self.layout.hidden_size;
        let p = self.layout.pool_size;
        let mut out = Array1::zeros(self.hidden_len());
        for i in 0..h {
            out[i] = spike[i];
            for k in 0..p {
                out[h + i * p + k] = slab[[k, i]];
            }
        }
        out
    }

    pub(crate) fn check_len(
        what: &'static str,
        actual: usize,
        expected: usize,
    ) -> Result<(), RbmError> {
        if actual != expected {
            return Err(RbmError::DimensionMismatch {
                what,
                expected,
                actual,
            });
        }
        Ok(())
    }

    pub(crate) fn check_slab_precision_positive(&self) -> Result<(), RbmError> {
        for ((k, i), &alpha) in self.slab_precision.indexed_iter() {
            if !(alpha > 0.0) {
                return Err(RbmError::NonPositiveSlabPrecision {
                    row: k,
                    col: i,
                    value: alpha,
                });
            }
        }
        Ok(())
    }

    pub(crate) fn check_visible_precision_positive(&self) -> Result<(), RbmError> {
        for (v, &lambda) in self.visible_precision().iter().enumerate() {
            if !(lambda > 0.0) {
                return Err(RbmError::NonPositiveVisiblePrecision {
                    index: v,
                    value: lambda,
                });
            }
        }
        Ok(())
    }
}
