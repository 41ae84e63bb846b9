// Application agent: search → score → customize → rank → summarize, plus
// simulated submission, run history and report export.
// The language model is not consulted anywhere in this pipeline.

pub mod handlers;
pub mod report;
pub mod workflow;
