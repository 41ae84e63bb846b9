//! Next-token training on synthetic batches.
//!
//! Each epoch draws `batches_per_epoch` random batches. Every row is a random
//! id sequence with a padded tail; inputs are ids[..n], targets ids[1..].
//! Loss is cross-entropy averaged over non-`<PAD>` targets only.
//!
//! A fixed set of `validation_batches` is drawn once up front and scored after
//! every epoch. Whenever validation loss improves the caller's `on_improvement`
//! hook runs (the binary writes a checkpoint there), and the best epoch's
//! weights are what training returns.

use anyhow::{anyhow, bail, Result};
use burn::{
    grad_clipping::GradientClippingConfig,
    module::AutodiffModule,
    optim::{decay::WeightDecayConfig, AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::{activation::log_softmax, backend::AutodiffBackend},
};
use rand::Rng;
use tracing::info;

use crate::config::TrainingSettings;
use crate::lm::checkpoint::TrainingSummary;
use crate::lm::model::{ids_tensor, padding_mask, LanguageModel, LanguageModelConfig};
use crate::lm::vocab::{PAD_ID, START_ID};

/// Random id rows of `seq_len + 1`, each with a non-empty padded tail of random length.
pub fn synthetic_batch<R: Rng>(
    rng: &mut R,
    batch_size: usize,
    seq_len: usize,
    vocab_size: usize,
) -> Vec<Vec<usize>> {
    (0..batch_size)
        .map(|_| {
            let filled = rng.gen_range((seq_len / 2).max(1)..=seq_len);
            let mut row = vec![START_ID];
            row.extend((1..filled).map(|_| rng.gen_range(START_ID + 3..vocab_size)));
            row.resize(seq_len + 1, PAD_ID);
            row
        })
        .collect()
}

/// Mean negative log-likelihood over targets that are not `<PAD>`.
///
/// logits [n, vocab], targets [n]. All-pad targets give 0.
pub fn masked_cross_entropy<B: Backend>(logits: Tensor<B, 2>, targets: Tensor<B, 1, Int>) -> Tensor<B, 1> {
    let [n, _] = logits.dims();
    let keep = targets.clone().not_equal_elem(PAD_ID as i64).float();
    let nll = log_softmax(logits, 1)
        .gather(1, targets.reshape([n, 1]))
        .reshape([n])
        .neg();
    let count = keep.clone().sum().clamp_min(1.0);
    (nll * keep).sum() / count
}

/// Cross-entropy of `model` on one batch of `seq_len + 1` rows.
pub fn batch_loss<B: Backend>(
    model: &LanguageModel<B>,
    rows: &[Vec<usize>],
    device: &B::Device,
) -> Tensor<B, 1> {
    let inputs: Vec<Vec<usize>> = rows.iter().map(|r| r[..r.len() - 1].to_vec()).collect();
    let targets: Vec<Vec<usize>> = rows.iter().map(|r| r[1..].to_vec()).collect();

    let input_ids = ids_tensor::<B>(&inputs, device);
    let mask = padding_mask(&input_ids);
    let logits = model.forward(input_ids, Some(mask));
    let [batch, seq, vocab] = logits.dims();

    let targets = ids_tensor::<B>(&targets, device).reshape([batch * seq]);
    masked_cross_entropy(logits.reshape([batch * seq, vocab]), targets)
}

/// Average batch loss over a held-out set.
pub fn validation_loss<B: Backend>(
    model: &LanguageModel<B>,
    batches: &[Vec<Vec<usize>>],
    device: &B::Device,
) -> f64 {
    if batches.is_empty() {
        return 0.0;
    }
    let total: f64 = batches
        .iter()
        .map(|rows| batch_loss(model, rows, device).into_scalar().elem::<f64>())
        .sum();
    total / batches.len() as f64
}

/// Trains a freshly initialised model and returns the best-validation epoch's
/// weights on the inner (non-autodiff) backend.
///
/// `on_improvement(epoch, model)` runs each time validation loss reaches a new
/// minimum; an error from it aborts training.
pub fn train_language_model<B, R, F>(
    model_config: &LanguageModelConfig,
    settings: &TrainingSettings,
    rng: &mut R,
    device: &B::Device,
    mut on_improvement: F,
) -> Result<(LanguageModel<B::InnerBackend>, TrainingSummary)>
where
    B: AutodiffBackend,
    R: Rng,
    F: FnMut(usize, &LanguageModel<B::InnerBackend>) -> Result<()>,
{
    if settings.batch_size == 0 || settings.batches_per_epoch == 0 || settings.validation_batches == 0 {
        bail!("TRAIN_BATCH_SIZE, TRAIN_BATCHES_PER_EPOCH and TRAIN_VALIDATION_BATCHES must be positive");
    }
    if settings.epochs == 0 {
        bail!("TRAIN_EPOCHS must be positive");
    }
    if model_config.vocab_size <= START_ID + 3 {
        bail!("Vocabulary of {} ids leaves no room for content tokens", model_config.vocab_size);
    }
    let seq_len = settings.seq_len.min(model_config.max_seq_len).max(1);

    let mut model: LanguageModel<B> = model_config.init(device);
    let parameters = model.num_params();
    info!(
        "Training {} parameters for {} epochs ({} batches of {} × {}, {} validation batches)",
        parameters,
        settings.epochs,
        settings.batches_per_epoch,
        settings.batch_size,
        seq_len,
        settings.validation_batches
    );

    let validation: Vec<Vec<Vec<usize>>> = (0..settings.validation_batches)
        .map(|_| synthetic_batch(rng, settings.batch_size, seq_len, model_config.vocab_size))
        .collect();

    let mut optim = AdamConfig::new()
        .with_weight_decay(Some(WeightDecayConfig::new(settings.weight_decay)))
        .with_grad_clipping(Some(GradientClippingConfig::Norm(settings.gradient_clip)))
        .init();

    let mut epoch_losses = Vec::with_capacity(settings.epochs);
    let mut validation_losses = Vec::with_capacity(settings.epochs);
    let mut best: Option<(usize, f64, LanguageModel<B::InnerBackend>)> = None;

    for epoch in 1..=settings.epochs {
        let mut loss_sum = 0.0f64;

        for _ in 0..settings.batches_per_epoch {
            let rows = synthetic_batch(rng, settings.batch_size, seq_len, model_config.vocab_size);
            let loss = batch_loss(&model, &rows, device);
            loss_sum += loss.clone().into_scalar().elem::<f64>();

            let grads = GradientsParams::from_grads(loss.backward(), &model);
            model = optim.step(settings.learning_rate, model, grads);
        }

        let train_loss = loss_sum / settings.batches_per_epoch as f64;
        let snapshot = model.valid();
        let val_loss = validation_loss(&snapshot, &validation, device);
        info!(
            "Epoch {}/{} | train_loss={:.4} | val_loss={:.4}",
            epoch, settings.epochs, train_loss, val_loss
        );
        epoch_losses.push(train_loss);
        validation_losses.push(val_loss);

        if best.as_ref().map_or(true, |(_, best_loss, _)| val_loss < *best_loss) {
            on_improvement(epoch, &snapshot)?;
            info!("New best model at epoch {} (val_loss={:.4})", epoch, val_loss);
            best = Some((epoch, val_loss, snapshot));
        }
    }

    let (best_epoch, best_validation_loss, best_model) =
        best.ok_or_else(|| anyhow!("Training finished without a validated epoch"))?;
    info!("Best validation loss {:.4} at epoch {}", best_validation_loss, best_epoch);

    Ok((
        best_model,
        TrainingSummary {
            epochs: settings.epochs,
            epoch_losses,
            validation_losses,
            best_epoch,
            best_validation_loss,
            parameters,
        },
    ))
}
