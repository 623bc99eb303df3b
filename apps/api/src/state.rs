use std::sync::Arc;

use crate::config::Config;
use crate::storage::history::HistoryLog;
use crate::storage::KeyValueStore;
use crate::tailoring::classifier::TextClassifier;
use crate::tailoring::orchestrator::Tailor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable classifier. Default: PatternClassifier. Swap via CLASSIFIER env.
    pub classifier: Arc<dyn TextClassifier>,
    /// Pipeline driver; shares `classifier`.
    pub tailor: Tailor,
    /// Memory store unless REDIS_URL is set.
    pub store: Arc<dyn KeyValueStore>,
    /// Shared by every request so history writes are serialized.
    pub history: Arc<HistoryLog>,
}

impl AppState {
    pub fn new(
        config: Config,
        classifier: Arc<dyn TextClassifier>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            tailor: Tailor::new(classifier.clone()),
            classifier,
            history: Arc::new(HistoryLog::new(store.clone(), config.history_limit)),
            store,
            config,
        }
    }
}
