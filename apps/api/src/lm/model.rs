//! Post-norm transformer language model.
//!
//! ids [batch, seq] → token + learned position embeddings → dropout
//!   → N × TransformerBlock → Linear → logits [batch, seq, vocab]

use anyhow::{anyhow, bail, Result};
use burn::{
    module::Param,
    nn::{
        attention::{MhaInput, MultiHeadAttention, MultiHeadAttentionConfig},
        Dropout, DropoutConfig, Embedding, EmbeddingConfig, Initializer, LayerNorm,
        LayerNormConfig, Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::relu,
};
use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::Rng;

use crate::config::ModelSettings;
use crate::lm::vocab::{PAD_ID, START_ID};

const EMBEDDING_STD: f64 = 0.02;

fn xavier() -> Initializer {
    Initializer::XavierUniform { gain: 1.0 }
}

/// Xavier-uniform weights, zero bias.
fn xavier_linear<B: Backend>(d_input: usize, d_output: usize, device: &B::Device) -> Linear<B> {
    let mut linear = LinearConfig::new(d_input, d_output)
        .with_initializer(xavier())
        .init(device);
    linear.bias = Some(Param::from_tensor(Tensor::zeros([d_output], device)));
    linear
}

fn normal_embedding<B: Backend>(count: usize, dim: usize, device: &B::Device) -> Embedding<B> {
    EmbeddingConfig::new(count, dim)
        .with_initializer(Initializer::Normal {
            mean: 0.0,
            std: EMBEDDING_STD,
        })
        .init(device)
}

// ────────────────────────────────────────────────────────────────────────────
// Transformer block
// ────────────────────────────────────────────────────────────────────────────

#[derive(Config, Debug)]
pub struct TransformerBlockConfig {
    pub hidden_dim: usize,
    pub num_heads: usize,
    pub ff_dim: usize,
    #[config(default = 0.1)]
    pub dropout: f64,
}

impl TransformerBlockConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> TransformerBlock<B> {
        TransformerBlock {
            attention: MultiHeadAttentionConfig::new(self.hidden_dim, self.num_heads)
                .with_dropout(self.dropout)
                .with_initializer(xavier())
                .init(device),
            ff_in: xavier_linear(self.hidden_dim, self.ff_dim, device),
            ff_out: xavier_linear(self.ff_dim, self.hidden_dim, device),
            norm1: LayerNormConfig::new(self.hidden_dim).init(device),
            norm2: LayerNormConfig::new(self.hidden_dim).init(device),
            dropout: DropoutConfig::new(self.dropout).init(),
        }
    }
}

#[derive(Module, Debug)]
pub struct TransformerBlock<B: Backend> {
    pub attention: MultiHeadAttention<B>,
    pub ff_in: Linear<B>,
    pub ff_out: Linear<B>,
    pub norm1: LayerNorm<B>,
    pub norm2: LayerNorm<B>,
    pub dropout: Dropout,
}

impl<B: Backend> TransformerBlock<B> {
    /// `pad_mask` is true at padded key positions, which attention ignores.
    pub fn forward(&self, x: Tensor<B, 3>, pad_mask: Option<Tensor<B, 2, Bool>>) -> Tensor<B, 3> {
        let mut input = MhaInput::self_attn(x.clone());
        if let Some(mask) = pad_mask {
            input = input.mask_pad(mask);
        }
        let attn = self.attention.forward(input).context;
        let x = self.norm1.forward(x + self.dropout.forward(attn));

        // Linear → ReLU → Dropout → Linear → Dropout
        let ff = self.ff_in.forward(x.clone());
        let ff = self.dropout.forward(relu(ff));
        let ff = self.dropout.forward(self.ff_out.forward(ff));
        self.norm2.forward(x + ff)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Language model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Config, Debug)]
pub struct LanguageModelConfig {
    #[config(default = 5000)]
    pub vocab_size: usize,
    #[config(default = 256)]
    pub hidden_dim: usize,
    #[config(default = 8)]
    pub num_heads: usize,
    #[config(default = 4)]
    pub num_layers: usize,
    #[config(default = 512)]
    pub max_seq_len: usize,
    #[config(default = 0.1)]
    pub dropout: f64,
}

impl LanguageModelConfig {
    pub fn from_settings(settings: &ModelSettings) -> Self {
        Self::new()
            .with_vocab_size(settings.vocab_size)
            .with_hidden_dim(settings.hidden_dim)
            .with_num_heads(settings.num_heads)
            .with_num_layers(settings.num_layers)
            .with_max_seq_len(settings.max_seq_len)
            .with_dropout(settings.dropout)
    }

    /// Feed-forward width inside every block.
    pub fn ff_dim(&self) -> usize {
        self.hidden_dim * 4
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> LanguageModel<B> {
        let block = TransformerBlockConfig::new(self.hidden_dim, self.num_heads, self.ff_dim())
            .with_dropout(self.dropout);

        LanguageModel {
            token_embedding: normal_embedding(self.vocab_size, self.hidden_dim, device),
            position_embedding: normal_embedding(self.max_seq_len, self.hidden_dim, device),
            layers: (0..self.num_layers).map(|_| block.init(device)).collect(),
            output: xavier_linear(self.hidden_dim, self.vocab_size, device),
            dropout: DropoutConfig::new(self.dropout).init(),
            vocab_size: self.vocab_size,
            max_seq_len: self.max_seq_len,
        }
    }
}

#[derive(Module, Debug)]
pub struct LanguageModel<B: Backend> {
    pub token_embedding: Embedding<B>,
    pub position_embedding: Embedding<B>,
    pub layers: Vec<TransformerBlock<B>>,
    pub output: Linear<B>,
    pub dropout: Dropout,
    pub vocab_size: usize,
    pub max_seq_len: usize,
}

/// Sampling knobs for [`LanguageModel::generate`].
#[derive(Config, Debug)]
pub struct GenerationConfig {
    #[config(default = 50)]
    pub max_new_tokens: usize,
    #[config(default = 1.0)]
    pub temperature: f64,
    /// 0 disables top-k filtering.
    #[config(default = 50)]
    pub top_k: usize,
}

impl<B: Backend> LanguageModel<B> {
    /// ids [batch, seq] → logits [batch, seq, vocab]. `seq` must not exceed `max_seq_len`.
    pub fn forward(&self, input_ids: Tensor<B, 2, Int>, pad_mask: Option<Tensor<B, 2, Bool>>) -> Tensor<B, 3> {
        let x = self.dropout.forward(self.embed(input_ids));
        let x = self.layers.iter().fold(x, |x, layer| layer.forward(x, pad_mask.clone()));
        self.output.forward(x)
    }

    /// Contextual embeddings [batch, seq, hidden]: the block outputs without the
    /// vocabulary projection and without input dropout.
    pub fn embeddings(&self, input_ids: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        let x = self.embed(input_ids);
        self.layers.iter().fold(x, |x, layer| layer.forward(x, None))
    }

    fn embed(&self, input_ids: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        let [batch_size, seq_len] = input_ids.dims();
        let device = input_ids.device();

        let tokens = self.token_embedding.forward(input_ids);
        let positions = Tensor::<B, 1, Int>::arange(0..seq_len as i64, &device)
            .unsqueeze::<2>()
            .expand([batch_size, seq_len]);
        tokens + self.position_embedding.forward(positions)
    }

    /// Appends up to `config.max_new_tokens` sampled ids to `prompt`, stopping once the
    /// sequence reaches `max_seq_len`. An empty prompt starts from `<START>`; ids outside
    /// the vocabulary are rejected.
    pub fn generate<R: Rng>(
        &self,
        prompt: &[usize],
        config: &GenerationConfig,
        rng: &mut R,
        device: &B::Device,
    ) -> Result<Vec<usize>> {
        let mut tokens = if prompt.is_empty() {
            vec![START_ID]
        } else {
            prompt.to_vec()
        };
        if tokens.len() > self.max_seq_len {
            bail!(
                "Prompt has {} tokens but the model accepts at most {}",
                tokens.len(),
                self.max_seq_len
            );
        }
        if let Some(bad) = tokens.iter().find(|id| **id >= self.vocab_size) {
            bail!(
                "Prompt token id {} is outside the vocabulary of {}",
                bad,
                self.vocab_size
            );
        }

        for _ in 0..config.max_new_tokens {
            if tokens.len() >= self.max_seq_len {
                break;
            }
            let len = tokens.len();
            let logits = self.forward(ids_tensor::<B>(&[tokens.clone()], device), None);
            let last: Tensor<B, 1> = logits
                .slice([0..1, len - 1..len, 0..self.vocab_size])
                .reshape([self.vocab_size]);
            let values = last
                .into_data()
                .to_vec::<f32>()
                .map_err(|e| anyhow!("Failed to read logits: {e:?}"))?;

            tokens.push(sample_top_k(&values, config.temperature, config.top_k, rng)?);
        }

        Ok(tokens)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tensor + sampling helpers
// ────────────────────────────────────────────────────────────────────────────

/// Packs equal-length id rows into an Int tensor [rows, len].
pub fn ids_tensor<B: Backend>(rows: &[Vec<usize>], device: &B::Device) -> Tensor<B, 2, Int> {
    let seq_len = rows.first().map(Vec::len).unwrap_or(0);
    let flat: Vec<i64> = rows.iter().flatten().map(|id| *id as i64).collect();
    Tensor::from_data(TensorData::new(flat, [rows.len(), seq_len]), device)
}

/// True wherever the id is `<PAD>`.
pub fn padding_mask<B: Backend>(input_ids: &Tensor<B, 2, Int>) -> Tensor<B, 2, Bool> {
    input_ids.clone().equal_elem(PAD_ID as i64)
}

/// Temperature-scaled, top-k filtered softmax sample. A non-positive temperature is greedy.
pub fn sample_top_k<R: Rng>(logits: &[f32], temperature: f64, top_k: usize, rng: &mut R) -> Result<usize> {
    if logits.is_empty() {
        bail!("Cannot sample from empty logits");
    }

    if temperature <= 0.0 {
        return Ok(argmax(logits));
    }

    let scaled: Vec<f64> = logits.iter().map(|l| *l as f64 / temperature).collect();

    let cutoff = if top_k > 0 && top_k < scaled.len() {
        let mut sorted = scaled.clone();
        sorted.sort_by(|a, b| b.total_cmp(a));
        sorted[top_k - 1]
    } else {
        f64::NEG_INFINITY
    };

    let max = scaled.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let weights: Vec<f64> = scaled
        .iter()
        .map(|v| if *v >= cutoff { (v - max).exp() } else { 0.0 })
        .collect();

    let dist = WeightedIndex::new(&weights).map_err(|e| anyhow!("Invalid sampling weights: {e}"))?;
    Ok(dist.sample(rng))
}

fn argmax(values: &[f32]) -> usize {
    values
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lm::InferenceBackend as B;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn tiny_config() -> LanguageModelConfig {
        LanguageModelConfig::new()
            .with_vocab_size(40)
            .with_hidden_dim(16)
            .with_num_heads(2)
            .with_num_layers(2)
            .with_max_seq_len(12)
            .with_dropout(0.0)
    }

    #[test]
    fn test_forward_shape() {
        let device = Default::default();
        let model = tiny_config().init::<B>(&device);
        let ids = ids_tensor::<B>(&[vec![2, 5, 6, 0], vec![2, 7, 0, 0]], &device);
        let mask = padding_mask(&ids);
        let logits = model.forward(ids, Some(mask));
        assert_eq!(logits.dims(), [2, 4, 40]);
    }

    #[test]
    fn test_embeddings_shape() {
        let device = Default::default();
        let model = tiny_config().init::<B>(&device);
        let ids = ids_tensor::<B>(&[vec![2, 5, 6]], &device);
        assert_eq!(model.embeddings(ids).dims(), [1, 3, 16]);
    }

    #[test]
    fn test_block_preserves_shape() {
        let device = Default::default();
        let block = TransformerBlockConfig::new(16, 4, 64).init::<B>(&device);
        let x = Tensor::<B, 3>::zeros([3, 5, 16], &device);
        assert_eq!(block.forward(x, None).dims(), [3, 5, 16]);
    }

    #[test]
    fn test_padding_mask_marks_pad_ids() {
        let device = Default::default();
        let ids = ids_tensor::<B>(&[vec![2, 0, 9]], &device);
        let mask: Vec<bool> = padding_mask(&ids).into_data().to_vec::<bool>().unwrap();
        assert_eq!(mask, vec![false, true, false]);
    }

    #[test]
    fn test_generate_appends_tokens() {
        let device = Default::default();
        let model = tiny_config().init::<B>(&device);
        let mut rng = StdRng::seed_from_u64(7);
        let config = GenerationConfig::new().with_max_new_tokens(4).with_top_k(5);
        let out = model.generate(&[2, 5], &config, &mut rng, &device).unwrap();
        assert_eq!(out.len(), 6);
        assert_eq!(&out[..2], &[2, 5]);
        assert!(out.iter().all(|id| *id < 40));
    }

    #[test]
    fn test_generate_stops_at_max_seq_len() {
        let device = Default::default();
        let model = tiny_config().init::<B>(&device);
        let mut rng = StdRng::seed_from_u64(1);
        let config = GenerationConfig::new().with_max_new_tokens(100);
        let out = model.generate(&[], &config, &mut rng, &device).unwrap();
        assert_eq!(out.len(), 12);
        assert_eq!(out[0], START_ID);
    }

    #[test]
    fn test_generate_rejects_long_prompt() {
        let device = Default::default();
        let model = tiny_config().init::<B>(&device);
        let mut rng = StdRng::seed_from_u64(1);
        let prompt = vec![5; 13];
        assert!(model
            .generate(&prompt, &GenerationConfig::new(), &mut rng, &device)
            .is_err());
    }

    #[test]
    fn test_generate_rejects_out_of_vocab_prompt() {
        let device = Default::default();
        let model = tiny_config().init::<B>(&device);
        let mut rng = StdRng::seed_from_u64(1);
        let err = model
            .generate(&[2, 40], &GenerationConfig::new(), &mut rng, &device)
            .unwrap_err();
        assert!(err.to_string().contains("outside the vocabulary"));
    }

    #[test]
    fn test_embeddings_use_small_normal_init() {
        let device = Default::default();
        let model = LanguageModelConfig::new()
            .with_vocab_size(400)
            .with_hidden_dim(16)
            .with_num_heads(2)
            .with_num_layers(1)
            .with_max_seq_len(8)
            .init::<B>(&device);
        let weights = model
            .token_embedding
            .weight
            .val()
            .into_data()
            .to_vec::<f32>()
            .unwrap();
        let n = weights.len() as f64;
        let mean = weights.iter().map(|w| *w as f64).sum::<f64>() / n;
        let var = weights.iter().map(|w| (*w as f64 - mean).powi(2)).sum::<f64>() / n;
        assert!(mean.abs() < 0.005, "mean {mean}");
        assert!((var.sqrt() - EMBEDDING_STD).abs() < 0.003, "std {}", var.sqrt());
    }

    #[test]
    fn test_linear_layers_are_xavier_with_zero_bias() {
        let device = Default::default();
        let model = tiny_config().init::<B>(&device);
        let bias = model
            .output
            .bias
            .as_ref()
            .unwrap()
            .val()
            .into_data()
            .to_vec::<f32>()
            .unwrap();
        assert!(bias.iter().all(|b| *b == 0.0));

        // Xavier-uniform bound for 16 → 40.
        let bound = (6.0f32 / (16.0 + 40.0)).sqrt();
        let weights = model.output.weight.val().into_data().to_vec::<f32>().unwrap();
        assert!(weights.iter().all(|w| w.abs() <= bound + 1e-6));
        assert!(weights.iter().any(|w| w.abs() > bound / 2.0));
    }

    #[test]
    fn test_sample_top_one_is_greedy() {
        let mut rng = StdRng::seed_from_u64(3);
        let logits = [0.1, 2.0, 0.5, 1.9];
        for _ in 0..10 {
            assert_eq!(sample_top_k(&logits, 1.0, 1, &mut rng).unwrap(), 1);
        }
    }

    #[test]
    fn test_sample_top_k_stays_in_top_set() {
        let mut rng = StdRng::seed_from_u64(11);
        let logits = [5.0, -3.0, 4.0, -2.0, -4.0];
        for _ in 0..50 {
            let id = sample_top_k(&logits, 1.0, 2, &mut rng).unwrap();
            assert!(id == 0 || id == 2);
        }
    }

    #[test]
    fn test_zero_temperature_is_argmax() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(sample_top_k(&[0.0, 0.3, 0.2], 0.0, 0, &mut rng).unwrap(), 1);
    }

    #[test]
    fn test_config_from_settings() {
        let config = LanguageModelConfig::from_settings(&ModelSettings::default());
        assert_eq!(config.hidden_dim, 256);
        assert_eq!(config.ff_dim(), 1024);
    }
}
