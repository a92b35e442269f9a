//! Model persistence: the parameter buffer plus every hyperparameter needed
//! to rebuild the model, saved together as one JSON document.

use std::path::Path;

use ndarray::Array2;

use crate::error::RbmError;
use crate::model::SpikeSlabRbm;

/// On-disk snapshot of a [`SpikeSlabRbm`].
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct Checkpoint {
    pub visible_size: usize,
    pub hidden_size: usize,
    pub pool_size: usize,
    pub slab_precision: Array2<f64>,
    pub radius: f64,
    pub parameters: Vec<f64>,
}

impl Checkpoint {
    pub fn from_model(model: &SpikeSlabRbm) -> Self {
        Self {
            visible_size: model.visible_size(),
            hidden_size: model.hidden_size(),
            pool_size: model.pool_size(),
            slab_precision: model.slab_precision().to_owned(),
            radius: model.radius(),
            parameters: model.parameters().to_vec(),
        }
    }

    /// Rebuild the model: construct with the saved hyperparameters, install
    /// the saved buffer, and run `reset()` before handing it back.
    pub fn into_model(self) -> Result<SpikeSlabRbm, RbmError> {
        let mut model = SpikeSlabRbm::new(
            self.visible_size,
            self.hidden_size,
            self.pool_size,
            self.slab_precision,
            self.radius,
        )?;
        model.set_parameters(self.parameters)?;
        Ok(model)
    }
}

impl SpikeSlabRbm {
    /// Write a checkpoint of this model as JSON.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let file = std::fs::File::create(path)
            .map_err(|e| anyhow::anyhow!("Failed to create checkpoint {}: {e}", path.display()))?;
        serde_json::to_writer(file, &Checkpoint::from_model(self))
            .map_err(|e| anyhow::anyhow!("Failed to write checkpoint {}: {e}", path.display()))?;
        Ok(())
    }

    /// Load a model from a JSON checkpoint written by [`save`](Self::save).
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = std::fs::File::open(path)
            .map_err(|e| anyhow::anyhow!("Failed to open checkpoint {}: {e}", path.display()))?;
        let checkpoint: Checkpoint = serde_json::from_reader(file)
            .map_err(|e| anyhow::anyhow!("Failed to parse checkpoint {}: {e}", path.display()))?;
        let model = checkpoint
            .into_model()
            .map_err(|e| anyhow::anyhow!("Checkpoint {} is inconsistent: {e}", path.display()))?;
        Ok(model)
    }
}
