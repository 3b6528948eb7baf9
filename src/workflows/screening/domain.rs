use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::catalog;

/// Header of the respondent's full-name column.
pub const NAME_HEADER: &str = "Nombre completo";
/// Header of the national identifier column used for duplicate detection.
pub const IDENTIFIER_HEADER: &str = "Número de documento de identidad.";
/// Identity columns preceding the answers in a stored row.
pub const IDENTITY_COLUMNS: usize = 2;
/// Width of a stored respondent row.
pub const RECORD_WIDTH: usize = 136;

/// Answer sections of the questionnaire, in persistence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Vocational,
    Reasoning,
    Reading,
    Family,
    Social,
    Economic,
    Coping,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::Vocational,
        Section::Reasoning,
        Section::Reading,
        Section::Family,
        Section::Social,
        Section::Economic,
        Section::Coping,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Section::Vocational => "Vocacional",
            Section::Reasoning => "Razonamiento",
            Section::Reading => "Lectora",
            Section::Family => "Diagnóstico",
            Section::Social => "Habilidades Sociales",
            Section::Economic => "Componente Económico",
            Section::Coping => "Estrategias de Afrontamiento",
        }
    }

    /// Number of items collected in this section.
    pub fn len(&self) -> usize {
        catalog::headers(*self).len()
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identifies one questionnaire item by section and 1-based position.
///
/// Keys can only be built for items that exist in the catalog, so every key has a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QuestionKey {
    section: Section,
    item: u8,
}

impl QuestionKey {
    pub fn new(section: Section, item: u8) -> Option<Self> {
        if item == 0 || usize::from(item) > section.len() {
            return None;
        }
        Some(Self { section, item })
    }

    /// Key for an item the catalog is known to contain.
    pub(crate) const fn catalog_item(section: Section, item: u8) -> Self {
        Self { section, item }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn item(&self) -> u8 {
        self.item
    }

    /// Exact column header, shared with the scoring table.
    pub fn header(&self) -> &'static str {
        catalog::headers(self.section)[usize::from(self.item) - 1]
    }
}

impl fmt::Display for QuestionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.section.label(), self.item)
    }
}

/// Multi-select item listing the household crisis situations.
pub const CRISIS_SITUATIONS: QuestionKey = QuestionKey::catalog_item(Section::Family, 18);

/// Independently scored life-risk domains, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Academic,
    Family,
    Economic,
    Psychosocial,
}

impl Domain {
    pub const ALL: [Domain; 4] = [
        Domain::Academic,
        Domain::Family,
        Domain::Economic,
        Domain::Psychosocial,
    ];

    /// Tag used by the scoring table's domain column.
    pub fn tag(&self) -> &'static str {
        match self {
            Domain::Academic => "PROYECTO DE VIDA ACADEMICA-PROFESIONAL",
            Domain::Family => "FAMILIAR",
            Domain::Economic => "ECONOMICA",
            Domain::Psychosocial => "PSICOSOCIAL",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Self::ALL
            .into_iter()
            .find(|domain| domain.tag().eq_ignore_ascii_case(tag))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Domain::Academic => "Riesgo Académico",
            Domain::Family => "Riesgo Familiar",
            Domain::Economic => "Riesgo Económico",
            Domain::Psychosocial => "Riesgo Psicosocial",
        }
    }

    /// File stem of the domain's model artifact.
    pub fn artifact_stem(&self) -> &'static str {
        match self {
            Domain::Academic => "academic",
            Domain::Family => "family",
            Domain::Economic => "economic",
            Domain::Psychosocial => "psychosocial",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.artifact_stem())
    }
}

/// Ordinal risk level produced by a domain classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLabel {
    #[serde(rename = "BAJO")]
    Low,
    #[serde(rename = "MEDIO")]
    Medium,
    #[serde(rename = "ALTO")]
    High,
}

impl RiskLabel {
    pub fn from_class(class_id: u8) -> Option<Self> {
        match class_id {
            0 => Some(RiskLabel::Low),
            1 => Some(RiskLabel::Medium),
            2 => Some(RiskLabel::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::Low => "BAJO",
            RiskLabel::Medium => "MEDIO",
            RiskLabel::High => "ALTO",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four domain labels for one respondent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub academic: RiskLabel,
    pub family: RiskLabel,
    pub economic: RiskLabel,
    pub psychosocial: RiskLabel,
}

impl RiskAssessment {
    pub fn label(&self, domain: Domain) -> RiskLabel {
        match domain {
            Domain::Academic => self.academic,
            Domain::Family => self.family,
            Domain::Economic => self.economic,
            Domain::Psychosocial => self.psychosocial,
        }
    }

    /// Labels in presentation order.
    pub fn entries(&self) -> [(Domain, RiskLabel); 4] {
        Domain::ALL.map(|domain| (domain, self.label(domain)))
    }
}

/// Positional answers per section, as collected by the questionnaire front-end.
///
/// Multi-select items arrive as a single comma-joined string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionAnswers {
    #[serde(default)]
    pub vocational: Vec<String>,
    #[serde(default)]
    pub reasoning: Vec<String>,
    #[serde(default)]
    pub reading: Vec<String>,
    #[serde(default)]
    pub family: Vec<String>,
    #[serde(default)]
    pub social: Vec<String>,
    #[serde(default)]
    pub economic: Vec<String>,
    #[serde(default)]
    pub coping: Vec<String>,
}

impl SectionAnswers {
    pub fn section(&self, section: Section) -> &[String] {
        match section {
            Section::Vocational => &self.vocational,
            Section::Reasoning => &self.reasoning,
            Section::Reading => &self.reading,
            Section::Family => &self.family,
            Section::Social => &self.social,
            Section::Economic => &self.economic,
            Section::Coping => &self.coping,
        }
    }

    pub fn section_mut(&mut self, section: Section) -> &mut Vec<String> {
        match section {
            Section::Vocational => &mut self.vocational,
            Section::Reasoning => &mut self.reasoning,
            Section::Reading => &mut self.reading,
            Section::Family => &mut self.family,
            Section::Social => &mut self.social,
            Section::Economic => &mut self.economic,
            Section::Coping => &mut self.coping,
        }
    }
}

/// Inbound questionnaire payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub consent: bool,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub national_id: String,
    #[serde(default)]
    pub answers: SectionAnswers,
}

/// One persisted row, exactly as the response store holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRow(pub Vec<String>);

impl StoredRow {
    pub fn width(&self) -> usize {
        self.0.len()
    }

    pub fn cells(&self) -> &[String] {
        &self.0
    }

    pub fn identifier(&self) -> Option<&str> {
        self.0.get(1).map(String::as_str)
    }

    pub(crate) fn is_blank(&self) -> bool {
        self.0.iter().all(|cell| cell.trim().is_empty())
    }
}

/// Raw literal answers of one respondent, indexed by question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RespondentRecord {
    pub full_name: String,
    pub national_id: String,
    pub consent: bool,
    answers: BTreeMap<QuestionKey, String>,
}

impl RespondentRecord {
    pub fn new(full_name: impl Into<String>, national_id: impl Into<String>, consent: bool) -> Self {
        Self {
            full_name: full_name.into(),
            national_id: national_id.into(),
            consent,
            answers: BTreeMap::new(),
        }
    }

    /// Index positional answers by question. Sections with fewer answers than the catalog
    /// leave the trailing questions unanswered; longer sections cannot be aligned and fail.
    pub fn from_submission(submission: Submission) -> Result<Self, SchemaMismatch> {
        let Submission {
            consent,
            full_name,
            national_id,
            answers,
        } = submission;
        let mut record = Self::new(full_name, national_id, consent);

        for section in Section::ALL {
            let values = answers.section(section);
            if values.len() > section.len() {
                return Err(SchemaMismatch::SectionWidth {
                    section,
                    expected: section.len(),
                    found: values.len(),
                });
            }

            for (index, value) in values.iter().enumerate() {
                let question = u8::try_from(index + 1)
                    .ok()
                    .and_then(|item| QuestionKey::new(section, item))
                    .ok_or(SchemaMismatch::SectionWidth {
                        section,
                        expected: section.len(),
                        found: values.len(),
                    })?;
                record.answers.insert(question, value.clone());
            }
        }

        Ok(record)
    }

    /// Rebuild a record from a stored row. Stored rows are only written after consent.
    pub fn from_row(row: &StoredRow) -> Result<Self, SchemaMismatch> {
        if row.width() != RECORD_WIDTH {
            return Err(SchemaMismatch::RowWidth {
                expected: RECORD_WIDTH,
                found: row.width(),
            });
        }

        let cells = row.cells();
        let mut record = Self::new(cells[0].clone(), cells[1].clone(), true);
        for (question, value) in catalog::all_questions().zip(&cells[IDENTITY_COLUMNS..]) {
            record.answers.insert(question, value.clone());
        }

        Ok(record)
    }

    /// Flatten into the fixed-width persisted row.
    pub fn to_row(&self) -> Result<StoredRow, SchemaMismatch> {
        let mut cells = Vec::with_capacity(RECORD_WIDTH);
        cells.push(self.full_name.clone());
        cells.push(self.national_id.clone());
        for question in catalog::all_questions() {
            let value = self
                .answers
                .get(&question)
                .ok_or(SchemaMismatch::MissingQuestion(question))?;
            cells.push(value.clone());
        }

        if cells.len() != RECORD_WIDTH {
            return Err(SchemaMismatch::RowWidth {
                expected: RECORD_WIDTH,
                found: cells.len(),
            });
        }

        Ok(StoredRow(cells))
    }

    pub fn answer(&self, question: QuestionKey) -> Option<&str> {
        self.answers.get(&question).map(String::as_str)
    }

    pub fn set_answer(&mut self, question: QuestionKey, value: impl Into<String>) {
        self.answers.insert(question, value.into());
    }

    pub fn remove_answer(&mut self, question: QuestionKey) -> Option<String> {
        self.answers.remove(&question)
    }

    /// Questions with no answer or a blank one, in persistence order.
    pub fn unanswered(&self) -> Vec<QuestionKey> {
        catalog::all_questions()
            .filter(|question| {
                self.answers
                    .get(question)
                    .map(|value| value.trim().is_empty())
                    .unwrap_or(true)
            })
            .collect()
    }
}

/// Disagreement between a record, a stored row, or a feature schema and the expected layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaMismatch {
    #[error("section {section} expects {expected} answers, found {found}")]
    SectionWidth {
        section: Section,
        expected: usize,
        found: usize,
    },
    #[error("row has {found} columns, expected {expected}")]
    RowWidth { expected: usize, found: usize },
    #[error("question {0} is missing from the record")]
    MissingQuestion(QuestionKey),
    #[error("{domain} feature slot {slot} is out of range for a layout of {width} slots")]
    SlotOutOfRange {
        domain: Domain,
        slot: usize,
        width: usize,
    },
    #[error("{domain} feature slot {slot} expects {expected} but the scoring table places {found}")]
    SlotDrift {
        domain: Domain,
        slot: usize,
        expected: String,
        found: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_record() -> RespondentRecord {
        let mut record = RespondentRecord::new("Ana Pérez", "123456789", true);
        for question in catalog::all_questions() {
            record.set_answer(question, format!("answer {question}"));
        }
        record
    }

    #[test]
    fn question_keys_are_bounded_by_the_catalog() {
        assert!(QuestionKey::new(Section::Vocational, 0).is_none());
        assert!(QuestionKey::new(Section::Vocational, 6).is_some());
        assert!(QuestionKey::new(Section::Vocational, 7).is_none());
        assert_eq!(Section::Coping.len(), 44);
        assert_eq!(CRISIS_SITUATIONS.section(), Section::Family);
    }

    #[test]
    fn answer_sections_and_identity_fill_the_record_width() {
        let answers: usize = Section::ALL.iter().map(Section::len).sum();
        assert_eq!(answers + IDENTITY_COLUMNS, RECORD_WIDTH);
    }

    #[test]
    fn rows_rebuild_the_same_answers() {
        let record = complete_record();
        let row = record.to_row().expect("complete record flattens");
        assert_eq!(row.width(), RECORD_WIDTH);
        assert_eq!(row.identifier(), Some("123456789"));

        let rebuilt = RespondentRecord::from_row(&row).expect("row rebuilds");
        assert_eq!(rebuilt, record);
    }

    #[test]
    fn rows_of_another_width_are_rejected() {
        let row = StoredRow(vec!["Ana".to_string(); RECORD_WIDTH - 1]);
        assert_eq!(
            RespondentRecord::from_row(&row),
            Err(SchemaMismatch::RowWidth {
                expected: RECORD_WIDTH,
                found: RECORD_WIDTH - 1,
            })
        );
    }

    #[test]
    fn incomplete_records_cannot_be_flattened() {
        let mut record = complete_record();
        let question = QuestionKey::new(Section::Economic, 3).expect("economic item");
        record.remove_answer(question);

        assert_eq!(
            record.to_row(),
            Err(SchemaMismatch::MissingQuestion(question))
        );
        assert_eq!(record.unanswered(), vec![question]);
    }

    #[test]
    fn oversized_sections_are_schema_mismatches() {
        let mut answers = SectionAnswers::default();
        answers.vocational = vec!["Bueno".to_string(); 7];
        let submission = Submission {
            consent: true,
            full_name: "Ana".to_string(),
            national_id: "1".to_string(),
            answers,
        };

        assert_eq!(
            RespondentRecord::from_submission(submission),
            Err(SchemaMismatch::SectionWidth {
                section: Section::Vocational,
                expected: 6,
                found: 7,
            })
        );
    }

    #[test]
    fn short_sections_leave_questions_unanswered() {
        let mut answers = SectionAnswers::default();
        answers.reasoning = vec!["1".to_string(), "2".to_string()];
        let submission = Submission {
            consent: true,
            full_name: "Ana".to_string(),
            national_id: "1".to_string(),
            answers,
        };

        let record = RespondentRecord::from_submission(submission).expect("aligns");
        let second = QuestionKey::new(Section::Reasoning, 2).expect("item");
        let third = QuestionKey::new(Section::Reasoning, 3).expect("item");
        assert_eq!(record.answer(second), Some("2"));
        assert_eq!(record.answer(third), None);
    }

    #[test]
    fn class_ids_map_to_labels() {
        assert_eq!(RiskLabel::from_class(0), Some(RiskLabel::Low));
        assert_eq!(RiskLabel::from_class(1), Some(RiskLabel::Medium));
        assert_eq!(RiskLabel::from_class(2), Some(RiskLabel::High));
        assert_eq!(RiskLabel::from_class(3), None);
        assert_eq!(
            serde_json::to_value(RiskLabel::Medium).expect("serialize"),
            serde_json::json!("MEDIO")
        );
    }

    #[test]
    fn domain_tags_parse_case_insensitively() {
        assert_eq!(Domain::from_tag(" familiar "), Some(Domain::Family));
        assert_eq!(
            Domain::from_tag("PROYECTO DE VIDA ACADEMICA-PROFESIONAL"),
            Some(Domain::Academic)
        );
        assert_eq!(Domain::from_tag("LABORAL"), None);
    }
}
