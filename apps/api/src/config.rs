use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; only malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub agent: AgentSettings,
    pub model: ModelSettings,
    pub training: TrainingSettings,
    pub models_dir: PathBuf,
    pub monitor: MonitorSettings,
}

/// Defaults applied to workflow runs when a request leaves them out.
#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub default_num_jobs: usize,
    pub min_relevance: f64,
    pub auto_apply_threshold: f64,
}

/// Language model hyperparameters.
#[derive(Debug, Clone)]
pub struct ModelSettings {
    pub vocab_size: usize,
    pub hidden_dim: usize,
    pub num_heads: usize,
    pub num_layers: usize,
    pub max_seq_len: usize,
    pub dropout: f64,
}

#[derive(Debug, Clone)]
pub struct TrainingSettings {
    pub learning_rate: f64,
    pub batch_size: usize,
    pub epochs: usize,
    pub weight_decay: f32,
    pub gradient_clip: f32,
    pub seq_len: usize,
    pub batches_per_epoch: usize,
    /// Held-out batches scored after every epoch.
    pub validation_batches: usize,
}

#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub url: String,
    pub interval_secs: u64,
    /// 0 means probe until interrupted.
    pub iterations: u64,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            default_num_jobs: 5,
            min_relevance: 0.3,
            auto_apply_threshold: 0.7,
        }
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            vocab_size: 5000,
            hidden_dim: 256,
            num_heads: 8,
            num_layers: 4,
            max_seq_len: 512,
            dropout: 0.1,
        }
    }
}

impl Default for TrainingSettings {
    fn default() -> Self {
        Self {
            learning_rate: 1e-4,
            batch_size: 32,
            epochs: 10,
            weight_decay: 0.01,
            gradient_clip: 1.0,
            seq_len: 64,
            batches_per_epoch: 10,
            validation_batches: 2,
        }
    }
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080".to_string(),
            interval_secs: 60,
            iterations: 0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            agent: AgentSettings::default(),
            model: ModelSettings::default(),
            training: TrainingSettings::default(),
            models_dir: PathBuf::from("models"),
            monitor: MonitorSettings::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let Config {
            agent: agent_defaults,
            model: model_defaults,
            training: training_defaults,
            monitor: monitor_defaults,
            ..
        } = Config::default();

        let config = Config {
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            agent: AgentSettings {
                default_num_jobs: env_or("AGENT_DEFAULT_NUM_JOBS", agent_defaults.default_num_jobs)?,
                min_relevance: env_or("AGENT_MIN_RELEVANCE", agent_defaults.min_relevance)?,
                auto_apply_threshold: env_or(
                    "AGENT_AUTO_APPLY_THRESHOLD",
                    agent_defaults.auto_apply_threshold,
                )?,
            },
            model: ModelSettings {
                vocab_size: env_or("MODEL_VOCAB_SIZE", model_defaults.vocab_size)?,
                hidden_dim: env_or("MODEL_HIDDEN_DIM", model_defaults.hidden_dim)?,
                num_heads: env_or("MODEL_NUM_HEADS", model_defaults.num_heads)?,
                num_layers: env_or("MODEL_NUM_LAYERS", model_defaults.num_layers)?,
                max_seq_len: env_or("MODEL_MAX_SEQ_LEN", model_defaults.max_seq_len)?,
                dropout: env_or("MODEL_DROPOUT", model_defaults.dropout)?,
            },
            training: TrainingSettings {
                learning_rate: env_or("TRAIN_LEARNING_RATE", training_defaults.learning_rate)?,
                batch_size: env_or("TRAIN_BATCH_SIZE", training_defaults.batch_size)?,
                epochs: env_or("TRAIN_EPOCHS", training_defaults.epochs)?,
                weight_decay: env_or("TRAIN_WEIGHT_DECAY", training_defaults.weight_decay)?,
                gradient_clip: env_or("TRAIN_GRADIENT_CLIP", training_defaults.gradient_clip)?,
                seq_len: env_or("TRAIN_SEQ_LEN", training_defaults.seq_len)?,
                batches_per_epoch: env_or(
                    "TRAIN_BATCHES_PER_EPOCH",
                    training_defaults.batches_per_epoch,
                )?,
                validation_batches: env_or(
                    "TRAIN_VALIDATION_BATCHES",
                    training_defaults.validation_batches,
                )?,
            },
            models_dir: PathBuf::from(
                std::env::var("MODELS_DIR").unwrap_or_else(|_| "models".to_string()),
            ),
            monitor: MonitorSettings {
                url: std::env::var("MONITOR_URL").unwrap_or(monitor_defaults.url),
                interval_secs: env_or("MONITOR_INTERVAL_SECS", monitor_defaults.interval_secs)?,
                iterations: env_or("MONITOR_ITERATIONS", monitor_defaults.iterations)?,
            },
        };

        config.model.validate()?;
        Ok(config)
    }
}

impl ModelSettings {
    /// Attention splits the hidden size evenly across heads.
    pub fn validate(&self) -> Result<()> {
        if self.num_heads == 0 || self.hidden_dim % self.num_heads != 0 {
            bail!(
                "MODEL_HIDDEN_DIM ({}) must be divisible by MODEL_NUM_HEADS ({})",
                self.hidden_dim,
                self.num_heads
            );
        }
        if self.max_seq_len == 0 || self.vocab_size == 0 {
            bail!("MODEL_MAX_SEQ_LEN and MODEL_VOCAB_SIZE must be positive");
        }
        Ok(())
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_defaults_are_valid() {
        assert!(ModelSettings::default().validate().is_ok());
    }

    #[test]
    fn test_heads_must_divide_hidden_dim() {
        let settings = ModelSettings {
            hidden_dim: 100,
            num_heads: 8,
            ..ModelSettings::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("divisible"));
    }

    #[test]
    fn test_env_or_falls_back_when_unset() {
        let value: usize = env_or("JOBAGENT_TEST_SURELY_UNSET_VAR", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_env_or_rejects_garbage() {
        std::env::set_var("JOBAGENT_TEST_BAD_PORT", "not-a-port");
        let result: Result<u16> = env_or("JOBAGENT_TEST_BAD_PORT", 8080);
        std::env::remove_var("JOBAGENT_TEST_BAD_PORT");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("JOBAGENT_TEST_BAD_PORT"));
    }

    #[test]
    fn test_agent_defaults() {
        let agent = AgentSettings::default();
        assert_eq!(agent.default_num_jobs, 5);
        assert!((agent.min_relevance - 0.3).abs() < f64::EPSILON);
        assert!((agent.auto_apply_threshold - 0.7).abs() < f64::EPSILON);
    }
}
