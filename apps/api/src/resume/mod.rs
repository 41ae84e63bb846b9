// Résumé customization: the base résumé, fill-in templates, and per-job tailoring.
// Pure string work; the language model is not consulted here.

pub mod customizer;
pub mod handlers;
pub mod models;
pub mod sample;
pub mod templates;
