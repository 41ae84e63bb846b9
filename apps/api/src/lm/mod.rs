// Small transformer language model and relevance head built on burn.
// Built at startup and described by GET /api/v1/model; the workflow never runs it.
// Forward pass, sampling, training and checkpoints are driven by the
// train_model binary and the tests below each module.

pub mod checkpoint;
pub mod handlers;
pub mod head;
pub mod info;
pub mod model;
pub mod train;
pub mod vocab;

/// CPU backend used for inference-only construction.
pub type InferenceBackend = burn::backend::NdArray;
/// Autodiff wrapper used by the training loop.
pub type TrainingBackend = burn::backend::Autodiff<burn::backend::NdArray>;
