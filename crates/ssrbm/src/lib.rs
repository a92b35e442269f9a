//! Spike-and-slab restricted Boltzmann machine policy.
//!
//! Implements the energy function, conditional-mean inference, stochastic
//! sampling, and contrastive-divergence gradient computation for an RBM whose
//! hidden layer factors into a binary "spike" gate and a continuous "slab"
//! magnitude per pooled unit. The slab variable is analytically integrated
//! out of the energy, so likelihood evaluation needs no slab sampling.
//!
//! A generic RBM trainer drives the model from outside: it owns the Gibbs
//! alternations, the number of contrastive-divergence steps, and the
//! optimizer that applies gradients to the flat parameter buffer. This crate
//! only supplies energy, means, samples, and gradients for a single
//! visible/hidden configuration.

pub mod checkpoint;
pub mod config;
pub mod error;
pub mod layout;
pub mod model;
pub mod sample;

mod energy;
mod gradient;
mod inference;
mod math;

pub use checkpoint::Checkpoint;
pub use config::RbmConfig;
pub use error::RbmError;
pub use layout::ParamLayout;
pub use model::SpikeSlabRbm;
pub use sample::VisibleSample;
