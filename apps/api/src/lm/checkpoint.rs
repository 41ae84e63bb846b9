//! Checkpoint I/O for the language model.
//!
//! Layout of a checkpoint directory:
//!   language_model.mpk           weights (MessagePack, full f32 precision)
//!   language_model_config.json   architecture, needed to rebuild the model before loading
//!   training_summary.json        optional, written by the training loop

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::lm::model::{LanguageModel, LanguageModelConfig};

const WEIGHTS_STEM: &str = "language_model";
const CONFIG_FILE: &str = "language_model_config.json";
const SUMMARY_FILE: &str = "training_summary.json";

/// Full f32 precision: a reload reproduces the saved logits bit for bit.
type WeightsRecorder = NamedMpkFileRecorder<FullPrecisionSettings>;

/// What the training loop reports alongside the weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub epochs: usize,
    pub epoch_losses: Vec<f64>,
    pub validation_losses: Vec<f64>,
    /// 1-based epoch whose weights were kept.
    pub best_epoch: usize,
    pub best_validation_loss: f64,
    pub parameters: usize,
}

pub struct CheckpointStore {
    dir: PathBuf,
}

impl CheckpointStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes weights and config, creating the directory if needed.
    pub fn save<B: Backend>(&self, model: &LanguageModel<B>, config: &LanguageModelConfig) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create checkpoint dir '{}'", self.dir.display()))?;

        let weights = self.dir.join(WEIGHTS_STEM);
        WeightsRecorder::new()
            .record(model.clone().into_record(), weights.clone())
            .with_context(|| format!("Failed to save weights to '{}'", weights.display()))?;

        let config_path = self.dir.join(CONFIG_FILE);
        fs::write(&config_path, serde_json::to_string_pretty(config)?)
            .with_context(|| format!("Cannot write '{}'", config_path.display()))?;

        info!("Checkpoint saved to {}", self.dir.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<LanguageModelConfig> {
        let path = self.dir.join(CONFIG_FILE);
        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read '{}'. Has the model been trained?",
                path.display()
            )
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Rebuilds the model from the saved config, then restores its weights.
    pub fn load<B: Backend>(&self, device: &B::Device) -> Result<(LanguageModel<B>, LanguageModelConfig)> {
        let config = self.load_config()?;
        let weights = self.dir.join(WEIGHTS_STEM);

        let record = WeightsRecorder::new()
            .load(weights.clone(), device)
            .with_context(|| format!("Cannot load weights from '{}'", weights.display()))?;
        let model = config.init::<B>(device).load_record(record);

        debug!("Loaded checkpoint from {}", self.dir.display());
        Ok((model, config))
    }

    pub fn save_summary(&self, summary: &TrainingSummary) -> Result<()> {
        let path = self.dir.join(SUMMARY_FILE);
        fs::write(&path, serde_json::to_string_pretty(summary)?)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;
        Ok(())
    }

    pub fn load_summary(&self) -> Result<Option<TrainingSummary>> {
        let path = self.dir.join(SUMMARY_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;
        Ok(Some(serde_json::from_str(&json)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lm::model::ids_tensor;
    use crate::lm::InferenceBackend as B;

    fn tiny_config() -> LanguageModelConfig {
        LanguageModelConfig::new()
            .with_vocab_size(30)
            .with_hidden_dim(8)
            .with_num_heads(2)
            .with_num_layers(1)
            .with_max_seq_len(6)
            .with_dropout(0.0)
    }

    #[test]
    fn test_save_then_load_reproduces_logits() {
        let dir = tempfile::tempdir().unwrap();
        let store = CheckpointStore::new(dir.path().join("ckpt"));
        let device = Default::default();
        let config = tiny_config();
        let model = config.init::<B>(&device);

        store.save(&model, &config).unwrap();
        let (restored, restored_config) = store.load::<B>(&device).unwrap();
        assert_eq!(restored_config.hidden_dim, 8);
        assert_eq!(restored.num_params(), model.num_params());

        let ids = || ids_tensor::<B>(&[vec![2, 5, 6]], &device);
        let before = model.forward(ids(), None).into_data().to_vec::<f32>().unwrap();
        let after = restored.forward(ids(), None).into_data().to_vec::<f32>().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_load_missing_checkpoint_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = CheckpointStore::new(dir.path());
        assert!(store.load::<B>(&Default::default()).is_err());
    }

    #[test]
    fn test_summary_roundtrip_and_absence() {
        let dir = tempfile::tempdir().unwrap();
        let store = CheckpointStore::new(dir.path());
        assert!(store.load_summary().unwrap().is_none());

        let summary = TrainingSummary {
            epochs: 2,
            epoch_losses: vec![3.4, 3.1],
            validation_losses: vec![3.3, 3.2],
            best_epoch: 2,
            best_validation_loss: 3.2,
            parameters: 1234,
        };
        store.save_summary(&summary).unwrap();
        assert_eq!(store.load_summary().unwrap(), Some(summary));
    }
}
