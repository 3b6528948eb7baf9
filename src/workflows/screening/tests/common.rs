use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::workflows::screening::catalog;
use crate::workflows::screening::classifier::ClassifierSet;
use crate::workflows::screening::domain::{
    QuestionKey, RespondentRecord, Section, SectionAnswers, StoredRow, Submission,
    CRISIS_SITUATIONS,
};
use crate::workflows::screening::encoding::{EncodingTable, NONE_SELECTION};
use crate::workflows::screening::engine::ScoringEngine;
use crate::workflows::screening::session::SessionId;
use crate::workflows::screening::store::{InMemoryResponseStore, ResponseStore, StoreError};
use crate::workflows::screening::{screening_router, ScreeningService};

pub(super) const RESPONDENT_ID: &str = "123456789";

pub(super) fn table() -> Arc<EncodingTable> {
    Arc::new(EncodingTable::standard().expect("standard table loads"))
}

/// Lowest-scoring option for a question; reasoning items get a puzzle answer.
pub(super) fn lowest_risk_answer(table: &EncodingTable, section: Section, item: u8) -> String {
    let question = QuestionKey::new(section, item).expect("catalog item");
    if question == CRISIS_SITUATIONS {
        return NONE_SELECTION.to_string();
    }

    table
        .rules_for(question)
        .into_iter()
        .min_by(|left, right| {
            left.score
                .cmp(&right.score)
                .then_with(|| left.literal_answer.cmp(&right.literal_answer))
        })
        .map(|rule| rule.literal_answer.clone())
        .unwrap_or_else(|| "3".to_string())
}

pub(super) fn lowest_risk_answers() -> SectionAnswers {
    let table = table();
    let mut answers = SectionAnswers::default();
    for section in Section::ALL {
        let values = (1..=section.len() as u8)
            .map(|item| lowest_risk_answer(&table, section, item))
            .collect();
        *answers.section_mut(section) = values;
    }
    answers
}

pub(super) fn submission() -> Submission {
    Submission {
        consent: true,
        full_name: "María Fernanda Ríos".to_string(),
        national_id: RESPONDENT_ID.to_string(),
        answers: lowest_risk_answers(),
    }
}

pub(super) fn submission_with_id(national_id: &str) -> Submission {
    Submission {
        national_id: national_id.to_string(),
        ..submission()
    }
}

pub(super) fn record() -> RespondentRecord {
    RespondentRecord::from_submission(submission()).expect("fixture aligns with the catalog")
}

pub(super) fn stored_row(national_id: &str) -> StoredRow {
    let mut row = record().to_row().expect("complete record");
    row.0[1] = national_id.to_string();
    row
}

pub(super) fn engine(class_id: u8) -> Arc<ScoringEngine> {
    Arc::new(ScoringEngine::new(table(), ClassifierSet::fixed(class_id)).expect("engine builds"))
}

pub(super) fn build_service(
    class_id: u8,
) -> (
    ScreeningService<InMemoryResponseStore>,
    Arc<InMemoryResponseStore>,
) {
    let store = Arc::new(InMemoryResponseStore::new());
    let service = ScreeningService::new(store.clone(), engine(class_id));
    (service, store)
}

pub(super) fn session(name: &str) -> SessionId {
    SessionId(name.to_string())
}

pub(super) fn router_with_service(service: ScreeningService<InMemoryResponseStore>) -> axum::Router {
    screening_router(Arc::new(service))
}

pub(super) struct UnavailableStore;

impl ResponseStore for UnavailableStore {
    fn read_all(&self) -> Result<Vec<StoredRow>, StoreError> {
        Err(StoreError::Unavailable("sheet offline".to_string()))
    }

    fn append(&self, _rows: Vec<StoredRow>) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("sheet offline".to_string()))
    }

    fn width(&self) -> usize {
        catalog::column_headers().len()
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
