use std::sync::Arc;

use tracing::debug;

use super::classifier::{ClassifierError, ClassifierSet};
use super::domain::{Domain, RespondentRecord, RiskAssessment, RiskLabel, SchemaMismatch};
use super::encoding::EncodingTable;
use super::features::{DomainFeatureBuilder, FeatureError};

/// Encodes a record per domain and runs the four classifiers over it.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    features: DomainFeatureBuilder,
    classifiers: ClassifierSet,
}

impl ScoringEngine {
    /// Fails unless every schema lines up with the table and its classifier's input width.
    pub fn new(table: Arc<EncodingTable>, classifiers: ClassifierSet) -> Result<Self, EngineError> {
        let features = DomainFeatureBuilder::new(table)?;

        for domain in Domain::ALL {
            let schema_width = features
                .schema(domain)
                .map(|schema| schema.width())
                .unwrap_or_default();
            let model_width = classifiers.adapter(domain).expected_width();
            if schema_width != model_width {
                return Err(EngineError::ModelWidth {
                    domain,
                    schema: schema_width,
                    model: model_width,
                });
            }
        }

        Ok(Self {
            features,
            classifiers,
        })
    }

    pub fn table(&self) -> &EncodingTable {
        self.features.table()
    }

    pub fn features(&self) -> &DomainFeatureBuilder {
        &self.features
    }

    /// Pure function of the record and the loaded configuration.
    pub fn score(&self, record: &RespondentRecord) -> Result<RiskAssessment, ScoringError> {
        let label = |domain: Domain| -> Result<RiskLabel, ScoringError> {
            let vector = self.features.build(record, domain)?;
            let label = self.classifiers.classify(&vector)?;
            debug!(domain = %domain, label = %label, "domain classified");
            Ok(label)
        };

        Ok(RiskAssessment {
            academic: label(Domain::Academic)?,
            family: label(Domain::Family)?,
            economic: label(Domain::Economic)?,
            psychosocial: label(Domain::Psychosocial)?,
        })
    }
}

/// Misconfiguration detected while assembling the engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Schema(#[from] SchemaMismatch),
    #[error("{domain} feature schema has {schema} slots but its model expects {model}")]
    ModelWidth {
        domain: Domain,
        schema: usize,
        model: usize,
    },
}

/// Failure scoring a single record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error(transparent)]
    Features(#[from] FeatureError),
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}
