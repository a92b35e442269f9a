use std::ops::Range;

/// Offset contract for the flat parameter buffer.
///
/// All learnable values live in one contiguous buffer of length
/// `V·P·H + H + V`, in fixed region order: weight tensor first, then spike
/// bias, then visible precision. The layout is pure arithmetic over the model
/// dimensions — views into the buffer are computed on demand from these
/// ranges rather than cached, so replacing the buffer can never leave a view
/// dangling.
///
/// Weight element `(i, k, v)` — hidden unit `i`, pool member `k`, visible
/// unit `v` — sits at linear offset `(i·P + k)·V + v`, i.e. the weight region
/// is an `(H, P, V)` tensor in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamLayout {
    pub visible_size: usize,
    pub hidden_size: usize,
    pub pool_size: usize,
}

impl ParamLayout {
    pub fn new(visible_size: usize, hidden_size: usize, pool_size: usize) -> Self {
        Self {
            visible_size,
            hidden_size,
            pool_size,
        }
    }

    /// Number of elements in the weight region (`V·P·H`).
    pub fn weight_len(&self) -> usize {
        self.visible_size * self.pool_size * self.hidden_size
    }

    /// Total parameter buffer length (`V·P·H + H + V`).
    pub fn len(&self) -> usize {
        self.weight_len() + self.hidden_size + self.visible_size
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Buffer range holding the weight tensor.
    pub fn weight_range(&self) -> Range<usize> {
        0..self.weight_len()
    }

    /// Buffer range holding the per-hidden-unit spike bias.
    pub fn spike_bias_range(&self) -> Range<usize> {
        let start = self.weight_len();
        start..start + self.hidden_size
    }

    /// Buffer range holding the diagonal visible precision.
    pub fn visible_precision_range(&self) -> Range<usize> {
        let start = self.weight_len() + self.hidden_size;
        start..start + self.visible_size
    }

    /// Range of the length-V weight column connecting visible units to pool
    /// member `k` of hidden unit `i`.
    pub fn pool_filter_range(&self, i: usize, k: usize) -> Range<usize> {
        debug_assert!(i < self.hidden_size && k < self.pool_size);
        let start = (i * self.pool_size + k) * self.visible_size;
        start..start + self.visible_size
    }

    /// Linear offset of weight element `(i, k, v)`.
    pub fn weight_offset(&self, i: usize, k: usize, v: usize) -> usize {
        debug_assert!(v < self.visible_size);
        self.pool_filter_range(i, k).start + v
    }
}
