use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use tracing::{info, warn};

use crate::config::ScreeningConfig;
use crate::error::AppError;
use crate::workflows::screening::{ClassifierSet, EncodingTable, ScoringEngine};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load the scoring table and the domain models named by the configuration.
///
/// `stub_class` swaps the trained models for fixed-output stubs.
pub(crate) fn build_engine(
    config: &ScreeningConfig,
    stub_class: Option<u8>,
) -> Result<ScoringEngine, AppError> {
    let table = match &config.encoding_table {
        Some(path) => {
            info!(path = %path.display(), "loading scoring table override");
            EncodingTable::from_path(path)?
        }
        None => EncodingTable::standard()?,
    };

    let classifiers = match stub_class {
        Some(class_id) => {
            warn!(class_id, "using fixed-output classifiers");
            ClassifierSet::fixed(class_id)
        }
        None => ClassifierSet::from_model_dir(&config.model_dir)?,
    };

    let engine = ScoringEngine::new(Arc::new(table), classifiers)?;
    info!(rules = engine.table().len(), "scoring engine ready");
    Ok(engine)
}
