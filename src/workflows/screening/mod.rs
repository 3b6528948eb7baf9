//! Early-alert questionnaire screening.
//!
//! Literal answers are scored through a static table, projected onto the feature slots each
//! domain model was trained on, and classified into BAJO, MEDIO or ALTO per domain.

pub mod catalog;
pub mod classifier;
pub mod domain;
pub mod encoding;
pub mod engine;
pub mod features;
pub mod intake;
pub mod router;
pub mod service;
pub mod session;
pub mod store;

#[cfg(test)]
mod tests;

pub use classifier::{
    ArtifactError, ClassifierAdapter, ClassifierError, ClassifierSet, FixedClassifier,
    PredictionError, RiskClassifier, TreeEnsembleModel,
};
pub use domain::{
    Domain, QuestionKey, RespondentRecord, RiskAssessment, RiskLabel, SchemaMismatch, Section,
    SectionAnswers, StoredRow, Submission, RECORD_WIDTH,
};
pub use encoding::{EncodingError, EncodingRule, EncodingTable, TableError};
pub use engine::{EngineError, ScoringEngine, ScoringError};
pub use features::{DomainFeatureBuilder, FeatureError, FeatureSchema, FeatureVector};
pub use intake::{IntakeRejection, IntakeValidator};
pub use router::screening_router;
pub use service::{ScreeningService, ScreeningServiceError, SubmissionReceipt};
pub use session::{SessionError, SessionId, SessionState, SessionView};
pub use store::{CsvResponseStore, InMemoryResponseStore, ResponseStore, StoreError};
