//! Serializable description of the model built at startup.

use burn::module::Module;
use serde::Serialize;

use crate::lm::head::RelevanceHeadConfig;
use crate::lm::model::LanguageModelConfig;
use crate::lm::vocab::Vocabulary;
use crate::lm::InferenceBackend;

#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub backend: &'static str,
    pub vocab_size: usize,
    /// Ids with an assigned word (specials + built-in terms).
    pub vocab_terms: usize,
    pub hidden_dim: usize,
    pub num_heads: usize,
    pub num_layers: usize,
    pub ff_dim: usize,
    pub max_seq_len: usize,
    pub dropout: f64,
    pub language_model_parameters: usize,
    pub relevance_head_parameters: usize,
    /// Always false: scoring uses skill overlap.
    pub used_for_scoring: bool,
}

impl ModelInfo {
    /// Initialises both networks on the CPU backend to count their parameters,
    /// then drops them.
    pub fn build(config: &LanguageModelConfig) -> Self {
        let device = Default::default();
        let language_model = config.init::<InferenceBackend>(&device);
        let head = RelevanceHeadConfig::new().init::<InferenceBackend>(&device);

        Self {
            backend: "ndarray",
            vocab_size: config.vocab_size,
            vocab_terms: Vocabulary::new(config.vocab_size).len(),
            hidden_dim: config.hidden_dim,
            num_heads: config.num_heads,
            num_layers: config.num_layers,
            ff_dim: config.ff_dim(),
            max_seq_len: config.max_seq_len,
            dropout: config.dropout,
            language_model_parameters: language_model.num_params(),
            relevance_head_parameters: head.num_params(),
            used_for_scoring: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_counts_parameters() {
        let config = LanguageModelConfig::new()
            .with_vocab_size(20)
            .with_hidden_dim(8)
            .with_num_heads(2)
            .with_num_layers(1)
            .with_max_seq_len(4);
        let info = ModelInfo::build(&config);

        assert_eq!(info.ff_dim, 32);
        assert_eq!(info.vocab_terms, 20);
        assert_eq!(info.relevance_head_parameters, 46_849);
        // embeddings: 20·8 + 4·8; output: 8·20 + 20
        assert!(info.language_model_parameters > 20 * 8 + 4 * 8 + 8 * 20 + 20);
        assert!(!info.used_for_scoring);
    }
}
