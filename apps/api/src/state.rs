use std::sync::Arc;

use tokio::sync::RwLock;

use crate::agent::workflow::ApplicationAgent;
use crate::catalog::search::JobCatalog;
use crate::config::Config;
use crate::lm::info::ModelInfo;
use crate::lm::model::LanguageModelConfig;
use crate::matching::relevance::SkillOverlapScorer;
use crate::resume::customizer::ResumeCustomizer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Catalog, base résumé, scorer and run history. Writers: workflow runs,
    /// job creation, résumé updates, history clears.
    pub agent: Arc<RwLock<ApplicationAgent>>,
    /// Description of the language model built at startup. The model itself is
    /// not kept; nothing in the request path runs it.
    pub model_info: Arc<ModelInfo>,
}

impl AppState {
    /// Seeds the catalog, loads the sample résumé and describes the language model.
    pub fn from_config(config: Config) -> Self {
        let agent = ApplicationAgent::new(
            JobCatalog::with_sample_jobs(),
            ResumeCustomizer::default(),
            Arc::new(SkillOverlapScorer),
        );
        let model_info = ModelInfo::build(&LanguageModelConfig::from_settings(&config.model));

        Self {
            config,
            agent: Arc::new(RwLock::new(agent)),
            model_info: Arc::new(model_info),
        }
    }
}
