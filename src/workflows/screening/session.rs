use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::RiskAssessment;

/// Identifier wrapper for questionnaire sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Submit once, then score once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    NotSubmitted,
    Submitted,
    Scored,
}

impl SessionState {
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::NotSubmitted => "not_submitted",
            SessionState::Submitted => "submitted",
            SessionState::Scored => "scored",
        }
    }

    pub fn next(self, action: SessionAction) -> Result<SessionState, SessionError> {
        match (self, action) {
            (SessionState::NotSubmitted, SessionAction::Submit) => Ok(SessionState::Submitted),
            (SessionState::Submitted, SessionAction::Score) => Ok(SessionState::Scored),
            (state, action) => Err(SessionError::InvalidTransition { state, action }),
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    Submit,
    Score,
}

impl fmt::Display for SessionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionAction::Submit => f.write_str("submit"),
            SessionAction::Score => f.write_str("score"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("cannot {action} a session that is {state}")]
    InvalidTransition {
        state: SessionState,
        action: SessionAction,
    },
    #[error("session registry unavailable")]
    Unavailable,
}

/// One respondent's progress through the questionnaire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreeningSession {
    pub id: SessionId,
    pub state: SessionState,
    pub national_id: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub assessment: Option<RiskAssessment>,
}

impl ScreeningSession {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            state: SessionState::NotSubmitted,
            national_id: None,
            submitted_at: None,
            assessment: None,
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            session_id: self.id.clone(),
            state: self.state.label(),
            national_id: self.national_id.clone(),
            submitted_at: self.submitted_at,
            assessment: self.assessment,
        }
    }
}

/// Exposed session status.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<RiskAssessment>,
}

/// Sessions keyed by id. Unknown ids read as fresh, unsubmitted sessions.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<SessionId, ScreeningSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &SessionId) -> Result<ScreeningSession, SessionError> {
        let sessions = self.sessions.lock().map_err(|_| SessionError::Unavailable)?;
        Ok(sessions
            .get(id)
            .cloned()
            .unwrap_or_else(|| ScreeningSession::new(id.clone())))
    }

    /// Check a transition without committing it.
    pub fn ensure(&self, id: &SessionId, action: SessionAction) -> Result<(), SessionError> {
        self.get(id)?.state.next(action).map(|_| ())
    }

    pub fn mark_submitted(
        &self,
        id: &SessionId,
        national_id: String,
        submitted_at: DateTime<Utc>,
    ) -> Result<ScreeningSession, SessionError> {
        self.commit(id, SessionAction::Submit, |session| {
            session.national_id = Some(national_id);
            session.submitted_at = Some(submitted_at);
        })
    }

    pub fn mark_scored(
        &self,
        id: &SessionId,
        assessment: RiskAssessment,
    ) -> Result<ScreeningSession, SessionError> {
        self.commit(id, SessionAction::Score, |session| {
            session.assessment = Some(assessment);
        })
    }

    fn commit<F>(
        &self,
        id: &SessionId,
        action: SessionAction,
        update: F,
    ) -> Result<ScreeningSession, SessionError>
    where
        F: FnOnce(&mut ScreeningSession),
    {
        let mut sessions = self.sessions.lock().map_err(|_| SessionError::Unavailable)?;
        let session = sessions
            .entry(id.clone())
            .or_insert_with(|| ScreeningSession::new(id.clone()));
        session.state = session.state.next(action)?;
        update(session);
        Ok(session.clone())
    }
}
