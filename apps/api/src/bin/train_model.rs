//! Trains the language model on synthetic batches, checkpointing whenever the
//! validation loss improves, then reloads the best checkpoint and logs a short
//! sampled continuation.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jobagent::config::Config;
use jobagent::lm::checkpoint::CheckpointStore;
use jobagent::lm::model::{GenerationConfig, LanguageModelConfig};
use jobagent::lm::train::train_language_model;
use jobagent::lm::vocab::Vocabulary;
use jobagent::lm::{InferenceBackend, TrainingBackend};

const SEED: u64 = 42;
const SAMPLE_PROMPT: &str = "senior python";

fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "jobagent={level},{}={level}",
                env!("CARGO_CRATE_NAME"),
                level = config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let model_config = LanguageModelConfig::from_settings(&config.model);
    let training = &config.training;
    info!(
        "Training config: lr={} batch={} epochs={} seq_len={} validation_batches={}",
        training.learning_rate,
        training.batch_size,
        training.epochs,
        training.seq_len,
        training.validation_batches
    );

    let mut rng = StdRng::seed_from_u64(SEED);
    let device = Default::default();
    let store = CheckpointStore::new(&config.models_dir);
    let (_, summary) = train_language_model::<TrainingBackend, _, _>(
        &model_config,
        training,
        &mut rng,
        &device,
        |_, model| store.save(model, &model_config),
    )?;
    store.save_summary(&summary)?;

    // Reload from disk to prove the checkpoint is usable on its own.
    let (restored, restored_config) = store.load::<InferenceBackend>(&device)?;

    let vocab = Vocabulary::new(restored_config.vocab_size);
    let prompt: Vec<usize> = vocab
        .encode(SAMPLE_PROMPT, SAMPLE_PROMPT.split_whitespace().count());
    let generation = GenerationConfig::new().with_max_new_tokens(10).with_top_k(20);
    let generated = restored.generate(&prompt, &generation, &mut rng, &device)?;

    info!("Sample: '{}' → '{}'", SAMPLE_PROMPT, vocab.decode(&generated));
    info!(
        "Training complete: best val_loss {:.4} at epoch {}/{}",
        summary.best_validation_loss, summary.best_epoch, summary.epochs
    );
    Ok(())
}
