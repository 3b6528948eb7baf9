use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{RespondentRecord, RiskAssessment, SchemaMismatch, Submission};
use super::engine::{ScoringEngine, ScoringError};
use super::intake::{IntakeRejection, IntakeValidator};
use super::session::{SessionAction, SessionError, SessionId, SessionRegistry, SessionView};
use super::store::{ResponseStore, StoreError};

/// Service composing intake validation, the response store, and the scoring engine.
pub struct ScreeningService<S> {
    store: Arc<S>,
    engine: Arc<ScoringEngine>,
    validator: IntakeValidator,
    sessions: SessionRegistry,
}

/// Acknowledgement returned once a submission is persisted.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub session_id: SessionId,
    pub national_id: String,
    pub state: &'static str,
    pub submitted_at: DateTime<Utc>,
}

impl<S> ScreeningService<S>
where
    S: ResponseStore + 'static,
{
    pub fn new(store: Arc<S>, engine: Arc<ScoringEngine>) -> Self {
        Self {
            store,
            engine,
            validator: IntakeValidator,
            sessions: SessionRegistry::new(),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Validate and persist a questionnaire. Nothing is appended when validation fails.
    pub fn submit(
        &self,
        session_id: &SessionId,
        submission: Submission,
    ) -> Result<SubmissionReceipt, ScreeningServiceError> {
        self.sessions.ensure(session_id, SessionAction::Submit)?;

        let record = RespondentRecord::from_submission(submission)?;
        let existing = self.store.read_all()?;
        if let Err(rejection) = self.validator.validate(&record, &existing) {
            warn!(session = %session_id, reason = %rejection, "submission rejected");
            return Err(rejection.into());
        }

        let row = record.to_row()?;
        if row.width() != self.store.width() {
            return Err(SchemaMismatch::RowWidth {
                expected: self.store.width(),
                found: row.width(),
            }
            .into());
        }
        self.store.append(vec![row])?;

        let submitted_at = Utc::now();
        let national_id = record.national_id.trim().to_string();
        let session = self
            .sessions
            .mark_submitted(session_id, national_id.clone(), submitted_at)?;
        info!(session = %session_id, stored_rows = existing.len() + 1, "submission stored");

        Ok(SubmissionReceipt {
            session_id: session.id,
            national_id,
            state: session.state.label(),
            submitted_at,
        })
    }

    /// Score the most recently appended row and close the session.
    ///
    /// The store's tail is read without isolation, so concurrent submitters may observe
    /// each other's rows.
    pub fn score_latest(
        &self,
        session_id: &SessionId,
    ) -> Result<RiskAssessment, ScreeningServiceError> {
        self.sessions.ensure(session_id, SessionAction::Score)?;

        let assessment = self.score_stored()?;
        self.sessions.mark_scored(session_id, assessment)?;
        info!(
            session = %session_id,
            academic = %assessment.academic,
            family = %assessment.family,
            economic = %assessment.economic,
            psychosocial = %assessment.psychosocial,
            "session scored"
        );
        Ok(assessment)
    }

    /// Score the store's last row without touching any session.
    pub fn score_stored(&self) -> Result<RiskAssessment, ScreeningServiceError> {
        let row = self.store.last()?.ok_or(ScreeningServiceError::EmptyStore)?;
        let record = RespondentRecord::from_row(&row)?;
        self.score_record(&record)
    }

    pub fn score_record(
        &self,
        record: &RespondentRecord,
    ) -> Result<RiskAssessment, ScreeningServiceError> {
        Ok(self.engine.score(record)?)
    }

    pub fn session(&self, session_id: &SessionId) -> Result<SessionView, ScreeningServiceError> {
        Ok(self.sessions.get(session_id)?.view())
    }
}

/// Error raised by the screening service.
#[derive(Debug, thiserror::Error)]
pub enum ScreeningServiceError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Rejected(#[from] IntakeRejection),
    #[error(transparent)]
    Schema(#[from] SchemaMismatch),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error("no stored responses to score")]
    EmptyStore,
}
