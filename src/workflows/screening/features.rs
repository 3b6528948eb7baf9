//! Per-domain feature vectors aligned to the trained classifiers.
//!
//! A domain's slot layout is the table order of its questions, with the crisis multi-select
//! expanded into nine trailing slots. Each classifier consumes a fixed selection of those
//! slots; the selections below are checked against the layout derived from the loaded table
//! so a reordered questionnaire or table fails at startup instead of scoring garbage.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::domain::{
    Domain, QuestionKey, RespondentRecord, SchemaMismatch, Section, CRISIS_SITUATIONS,
};
use super::encoding::{decompose, EncodingError, EncodingTable, CRISIS_SLOTS};

/// Version of the checked-in slot selections.
pub const SCHEMA_VERSION: &str = "v1";

/// Where a feature slot's score comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureSource {
    Answer(QuestionKey),
    /// 1-based sub-slot of the crisis multi-select.
    CrisisSlot(u8),
}

impl fmt::Display for FeatureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureSource::Answer(question) => write!(f, "question {question}"),
            FeatureSource::CrisisSlot(slot) => write!(f, "crisis slot {slot}"),
        }
    }
}

/// One classifier input column: 1-based layout slot and its expected source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureColumn {
    pub slot: usize,
    pub source: FeatureSource,
}

/// Ordered feature selection one domain classifier was trained on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    pub domain: Domain,
    pub version: &'static str,
    pub columns: Vec<FeatureColumn>,
}

impl FeatureSchema {
    pub fn for_domain(domain: Domain) -> Self {
        let columns = match domain {
            Domain::Academic => vec![
                answer(1, Section::Vocational, 1),
                answer(7, Section::Reading, 1),
                answer(17, Section::Reading, 11),
                answer(9, Section::Reading, 3),
            ],
            Domain::Family => vec![
                crisis(20, 2),
                answer(4, Section::Family, 4),
                answer(3, Section::Family, 3),
                answer(11, Section::Family, 11),
                crisis(19, 1),
                answer(5, Section::Family, 5),
                answer(9, Section::Family, 9),
            ],
            Domain::Economic => vec![
                answer(6, Section::Economic, 6),
                answer(7, Section::Economic, 7),
                answer(5, Section::Economic, 5),
                answer(1, Section::Economic, 1),
            ],
            Domain::Psychosocial => vec![
                answer(38, Section::Coping, 38),
                answer(21, Section::Coping, 21),
                answer(25, Section::Coping, 25),
                answer(15, Section::Coping, 15),
                answer(43, Section::Coping, 43),
                answer(50, Section::Social, 6),
                answer(26, Section::Coping, 26),
                answer(35, Section::Coping, 35),
                answer(6, Section::Coping, 6),
                answer(52, Section::Social, 8),
                answer(7, Section::Coping, 7),
                answer(3, Section::Coping, 3),
                answer(8, Section::Coping, 8),
                answer(4, Section::Coping, 4),
            ],
        };

        Self {
            domain,
            version: SCHEMA_VERSION,
            columns,
        }
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Confirm every column sits where the layout puts its source.
    pub fn check_against(&self, layout: &[FeatureSource]) -> Result<(), SchemaMismatch> {
        for column in &self.columns {
            let found = column
                .slot
                .checked_sub(1)
                .and_then(|index| layout.get(index))
                .ok_or(SchemaMismatch::SlotOutOfRange {
                    domain: self.domain,
                    slot: column.slot,
                    width: layout.len(),
                })?;

            if *found != column.source {
                return Err(SchemaMismatch::SlotDrift {
                    domain: self.domain,
                    slot: column.slot,
                    expected: column.source.to_string(),
                    found: found.to_string(),
                });
            }
        }
        Ok(())
    }
}

fn answer(slot: usize, section: Section, item: u8) -> FeatureColumn {
    FeatureColumn {
        slot,
        source: FeatureSource::Answer(QuestionKey::catalog_item(section, item)),
    }
}

fn crisis(slot: usize, sub_slot: u8) -> FeatureColumn {
    FeatureColumn {
        slot,
        source: FeatureSource::CrisisSlot(sub_slot),
    }
}

/// Slot layout of a domain as derived from the scoring table.
pub fn slot_layout(table: &EncodingTable, domain: Domain) -> Vec<FeatureSource> {
    let questions = table.domain_questions(domain);
    let mut layout: Vec<FeatureSource> = questions
        .iter()
        .filter(|question| **question != CRISIS_SITUATIONS)
        .map(|question| FeatureSource::Answer(*question))
        .collect();

    if questions.contains(&CRISIS_SITUATIONS) {
        layout.extend((1..=CRISIS_SLOTS as u8).map(FeatureSource::CrisisSlot));
    }
    layout
}

/// Classifier-ready scores for one domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    pub domain: Domain,
    pub schema_version: &'static str,
    pub values: Vec<f64>,
}

impl FeatureVector {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Builds the exact feature vectors the domain classifiers expect.
#[derive(Debug, Clone)]
pub struct DomainFeatureBuilder {
    table: Arc<EncodingTable>,
    schemas: BTreeMap<Domain, FeatureSchema>,
    layouts: BTreeMap<Domain, Vec<FeatureSource>>,
}

impl DomainFeatureBuilder {
    pub fn new(table: Arc<EncodingTable>) -> Result<Self, SchemaMismatch> {
        let schemas = Domain::ALL
            .into_iter()
            .map(|domain| (domain, FeatureSchema::for_domain(domain)))
            .collect();
        Self::with_schemas(table, schemas)
    }

    pub fn with_schemas(
        table: Arc<EncodingTable>,
        schemas: BTreeMap<Domain, FeatureSchema>,
    ) -> Result<Self, SchemaMismatch> {
        let mut layouts = BTreeMap::new();
        for (domain, schema) in &schemas {
            let layout = slot_layout(&table, *domain);
            schema.check_against(&layout)?;
            layouts.insert(*domain, layout);
        }

        Ok(Self {
            table,
            schemas,
            layouts,
        })
    }

    pub fn schema(&self, domain: Domain) -> Option<&FeatureSchema> {
        self.schemas.get(&domain)
    }

    pub fn table(&self) -> &EncodingTable {
        &self.table
    }

    /// Encode every question of the domain, then project onto the trained selection.
    pub fn build(
        &self,
        record: &RespondentRecord,
        domain: Domain,
    ) -> Result<FeatureVector, FeatureError> {
        let schema = self
            .schemas
            .get(&domain)
            .ok_or(FeatureError::UnknownDomain(domain))?;
        let width = self.layouts.get(&domain).map(Vec::len).unwrap_or_default();

        let mut slots: Vec<u8> = Vec::with_capacity(width);
        let mut crisis_slots: Option<[u8; CRISIS_SLOTS]> = None;
        for question in self.table.domain_questions(domain) {
            let answer = record
                .answer(*question)
                .ok_or(SchemaMismatch::MissingQuestion(*question))?;

            if *question == CRISIS_SITUATIONS {
                crisis_slots = Some(decompose(answer));
            } else {
                let (score, _) = self.table.lookup(*question, answer)?;
                slots.push(score);
            }
        }
        if let Some(crisis_slots) = crisis_slots {
            slots.extend(crisis_slots);
        }

        let values = schema
            .columns
            .iter()
            .map(|column| {
                column
                    .slot
                    .checked_sub(1)
                    .and_then(|index| slots.get(index))
                    .map(|score| f64::from(*score))
                    .ok_or(SchemaMismatch::SlotOutOfRange {
                        domain,
                        slot: column.slot,
                        width: slots.len(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FeatureVector {
            domain,
            schema_version: schema.version,
            values,
        })
    }
}

/// Failures while turning a record into a feature vector.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeatureError {
    #[error(transparent)]
    Schema(#[from] SchemaMismatch),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error("no feature schema registered for the {0} domain")]
    UnknownDomain(Domain),
}
