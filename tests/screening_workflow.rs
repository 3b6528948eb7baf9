//! End-to-end scenarios for questionnaire intake and risk scoring.
//!
//! Scenarios go through the public service facade and HTTP router, backed by a CSV store and
//! tree-ensemble artifacts written to a scratch directory.

mod common {
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use risk_screening::workflows::screening::domain::CRISIS_SITUATIONS;
    use risk_screening::workflows::screening::encoding::NONE_SELECTION;
    use risk_screening::workflows::screening::{
        ClassifierSet, CsvResponseStore, Domain, EncodingTable, FeatureSchema, QuestionKey,
        ScoringEngine, ScreeningService, Section, SectionAnswers, Submission,
    };

    pub(super) struct Scratch {
        pub(super) root: PathBuf,
    }

    impl Scratch {
        pub(super) fn new(name: &str) -> Self {
            let root = std::env::temp_dir().join(format!(
                "risk-screening-it-{name}-{}",
                std::process::id()
            ));
            let _ = std::fs::remove_dir_all(&root);
            std::fs::create_dir_all(&root).expect("scratch dir");
            Self { root }
        }

        pub(super) fn store_path(&self) -> PathBuf {
            self.root.join("data").join("responses.csv")
        }

        pub(super) fn model_dir(&self) -> PathBuf {
            self.root.join("models")
        }
    }

    impl Drop for Scratch {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.root);
        }
    }

    /// One split per domain; every table score falls on the left leaf.
    fn stump(n_features: usize, left_votes: [f64; 3]) -> String {
        serde_json::json!({
            "n_features": n_features,
            "n_classes": 3,
            "trees": [
                {"nodes": [
                    {"kind": "split", "feature": 0, "threshold": 1000.0, "left": 1, "right": 2},
                    {"kind": "leaf", "votes": left_votes},
                    {"kind": "leaf", "votes": [0.0, 0.0, 1.0]}
                ]}
            ]
        })
        .to_string()
    }

    /// Academic BAJO, family MEDIO, economic ALTO, psychosocial BAJO.
    pub(super) fn write_models(dir: &Path) {
        std::fs::create_dir_all(dir).expect("model dir");
        for domain in Domain::ALL {
            let votes = match domain {
                Domain::Academic | Domain::Psychosocial => [7.0, 2.0, 1.0],
                Domain::Family => [1.0, 5.0, 4.0],
                Domain::Economic => [0.0, 3.0, 9.0],
            };
            let width = FeatureSchema::for_domain(domain).width();
            std::fs::write(
                dir.join(format!("{}.json", domain.artifact_stem())),
                stump(width, votes),
            )
            .expect("write model");
        }
    }

    fn answer_for(table: &EncodingTable, section: Section, item: u8) -> String {
        let question = QuestionKey::new(section, item).expect("catalog item");
        if question == CRISIS_SITUATIONS {
            return NONE_SELECTION.to_string();
        }
        table
            .rules_for(question)
            .into_iter()
            .min_by_key(|rule| (rule.score, rule.literal_answer.clone()))
            .map(|rule| rule.literal_answer.clone())
            .unwrap_or_else(|| "2".to_string())
    }

    pub(super) fn submission(national_id: &str) -> Submission {
        let table = EncodingTable::standard().expect("standard table");
        let mut answers = SectionAnswers::default();
        for section in Section::ALL {
            *answers.section_mut(section) = (1..=section.len() as u8)
                .map(|item| answer_for(&table, section, item))
                .collect();
        }
        Submission {
            consent: true,
            full_name: "Juan Camilo Ortega".to_string(),
            national_id: national_id.to_string(),
            answers,
        }
    }

    pub(super) fn service(scratch: &Scratch) -> Arc<ScreeningService<CsvResponseStore>> {
        write_models(&scratch.model_dir());
        let classifiers = ClassifierSet::from_model_dir(scratch.model_dir()).expect("models load");
        let table = Arc::new(EncodingTable::standard().expect("standard table"));
        let engine = ScoringEngine::new(table, classifiers).expect("engine builds");
        let store = Arc::new(CsvResponseStore::new(scratch.store_path()));
        Arc::new(ScreeningService::new(store, Arc::new(engine)))
    }
}

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use risk_screening::workflows::screening::{
    screening_router, ClassifierSet, CsvResponseStore, IntakeRejection, ResponseStore,
    RiskAssessment, RiskLabel, ScreeningService, ScreeningServiceError, SessionId,
};

use common::*;

fn expected_assessment() -> RiskAssessment {
    RiskAssessment {
        academic: RiskLabel::Low,
        family: RiskLabel::Medium,
        economic: RiskLabel::High,
        psychosocial: RiskLabel::Low,
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json payload")
}

#[test]
fn submission_persists_to_csv_and_scores_with_loaded_models() {
    let scratch = Scratch::new("persist");
    let service = service(&scratch);
    let session = SessionId("kiosk-1".to_string());

    let receipt = service
        .submit(&session, submission("1001"))
        .expect("submission accepted");
    assert_eq!(receipt.state, "submitted");
    assert!(scratch.store_path().exists());

    let assessment = service.score_latest(&session).expect("scores");
    assert_eq!(assessment, expected_assessment());
    assert_eq!(
        service.score_stored().expect("rescore"),
        expected_assessment()
    );
}

#[test]
fn duplicates_are_detected_across_service_restarts() {
    let scratch = Scratch::new("restart");
    let first = service(&scratch);
    first
        .submit(&SessionId("a".to_string()), submission("2002"))
        .expect("first submission");

    let restarted = service(&scratch);
    let error = restarted
        .submit(&SessionId("b".to_string()), submission(" 2002 "))
        .expect_err("duplicate rejected");
    assert!(matches!(
        error,
        ScreeningServiceError::Rejected(IntakeRejection::DuplicateIdentifier)
    ));

    restarted
        .submit(&SessionId("c".to_string()), submission("2003"))
        .expect("new respondent accepted");
    let rows = restarted.store().read_all().expect("read store");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].identifier(), Some("2003"));
}

#[test]
fn missing_model_artifacts_fail_at_startup() {
    let scratch = Scratch::new("missing-model");
    let error = ClassifierSet::from_model_dir(scratch.model_dir()).expect_err("no artifacts");
    assert!(error.to_string().contains("academic"));
}

#[tokio::test]
async fn http_flow_submits_scores_and_reports_status() {
    let scratch = Scratch::new("http");
    let service: Arc<ScreeningService<CsvResponseStore>> = service(&scratch);
    let router = screening_router(service);

    let submit = Request::post("/api/v1/screening/sessions/web-7/submission")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::to_vec(&submission("3003")).expect("serialize"),
        ))
        .expect("request builds");
    let response = router.clone().oneshot(submit).await.expect("submit runs");
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let score = Request::post("/api/v1/screening/sessions/web-7/score")
        .body(Body::empty())
        .expect("request builds");
    let response = router.clone().oneshot(score).await.expect("score runs");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = body_json(response).await;
    assert_eq!(
        payload.get("assessment"),
        Some(&json!({
            "academic": "BAJO",
            "family": "MEDIO",
            "economic": "ALTO",
            "psychosocial": "BAJO"
        }))
    );

    let status = Request::get("/api/v1/screening/sessions/web-7")
        .body(Body::empty())
        .expect("request builds");
    let response = router.clone().oneshot(status).await.expect("status runs");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = body_json(response).await;
    assert_eq!(payload.get("state"), Some(&json!("scored")));

    let rescore = Request::post("/api/v1/screening/sessions/web-7/score")
        .body(Body::empty())
        .expect("request builds");
    let response = router.oneshot(rescore).await.expect("rescore runs");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
