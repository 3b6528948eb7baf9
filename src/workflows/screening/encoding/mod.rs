//! Table-driven mapping from literal answers to ordinal scores.
//!
//! Scores run from 1 (lowest risk contribution) to 5 (highest). They are classifier inputs,
//! not a linear scale, so the table is the only authority on what an answer is worth.

mod multiselect;

pub use multiselect::{decompose, CRISIS_SLOTS, NONE_SELECTION};

use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::catalog;
use super::domain::{Domain, QuestionKey, Section};

/// Scoring table shipped with the service.
pub const STANDARD_TABLE: &str = include_str!("weights.csv");

const MIN_SCORE: i64 = 1;
const MAX_SCORE: i64 = 5;

/// One (question, literal answer) pair with its score and domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingRule {
    pub question: QuestionKey,
    pub literal_answer: String,
    pub score: u8,
    pub domain: Domain,
}

/// Immutable lookup table loaded once per process.
#[derive(Debug, Clone)]
pub struct EncodingTable {
    rules: Vec<EncodingRule>,
    index: HashMap<QuestionKey, HashMap<String, usize>>,
    domains: HashMap<QuestionKey, Domain>,
    order: BTreeMap<Domain, Vec<QuestionKey>>,
}

#[derive(Debug, Deserialize)]
struct TableRow {
    #[serde(rename = "PREGUNTA")]
    question: String,
    #[serde(rename = "RESPUESTA")]
    answer: String,
    #[serde(rename = "PUNTUACION")]
    score: i64,
    #[serde(rename = "CARACTERISTICA")]
    domain: String,
}

impl EncodingTable {
    pub fn standard() -> Result<Self, TableError> {
        Self::from_reader(STANDARD_TABLE.as_bytes())
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut table = Self {
            rules: Vec::new(),
            index: HashMap::new(),
            domains: HashMap::new(),
            order: BTreeMap::new(),
        };

        for (position, row) in csv_reader.deserialize::<TableRow>().enumerate() {
            let row = row?;
            // header is line 1
            table.insert(position + 2, row)?;
        }

        table.ensure_complete()?;
        debug!(rules = table.rules.len(), "encoding table loaded");
        Ok(table)
    }

    fn insert(&mut self, line: usize, row: TableRow) -> Result<(), TableError> {
        let question =
            catalog::resolve(&row.question).ok_or_else(|| TableError::UnknownQuestion {
                line,
                header: row.question.clone(),
            })?;
        let domain = Domain::from_tag(&row.domain).ok_or_else(|| TableError::UnknownDomain {
            line,
            tag: row.domain.clone(),
        })?;
        if !(MIN_SCORE..=MAX_SCORE).contains(&row.score) {
            return Err(TableError::ScoreOutOfRange {
                line,
                score: row.score,
            });
        }

        match self.domains.get(&question) {
            Some(existing) if *existing != domain => {
                return Err(TableError::ConflictingDomain { line, question });
            }
            Some(_) => {}
            None => {
                self.domains.insert(question, domain);
                self.order.entry(domain).or_default().push(question);
            }
        }

        let answers = self.index.entry(question).or_default();
        if answers.contains_key(&row.answer) {
            return Err(TableError::DuplicateRule {
                line,
                question,
                answer: row.answer,
            });
        }
        answers.insert(row.answer.clone(), self.rules.len());

        self.rules.push(EncodingRule {
            question,
            literal_answer: row.answer,
            score: row.score as u8,
            domain,
        });
        Ok(())
    }

    /// Every collected question outside the reasoning section must be scorable.
    fn ensure_complete(&self) -> Result<(), TableError> {
        match catalog::all_questions()
            .filter(|question| question.section() != Section::Reasoning)
            .find(|question| !self.index.contains_key(question))
        {
            Some(question) => Err(TableError::MissingQuestion(question)),
            None => Ok(()),
        }
    }

    /// Score and domain of a literal answer.
    pub fn lookup(&self, question: QuestionKey, answer: &str) -> Result<(u8, Domain), EncodingError> {
        self.index
            .get(&question)
            .and_then(|answers| answers.get(answer.trim()))
            .map(|&position| {
                let rule = &self.rules[position];
                (rule.score, rule.domain)
            })
            .ok_or_else(|| EncodingError::UnknownAnswer {
                question,
                answer: answer.to_string(),
            })
    }

    /// Questions tagged with a domain, in table order.
    pub fn domain_questions(&self, domain: Domain) -> &[QuestionKey] {
        self.order.get(&domain).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn domain_of(&self, question: QuestionKey) -> Option<Domain> {
        self.domains.get(&question).copied()
    }

    /// Rules for one question, in table order.
    pub fn rules_for(&self, question: QuestionKey) -> Vec<&EncodingRule> {
        let mut positions: Vec<usize> = self
            .index
            .get(&question)
            .map(|answers| answers.values().copied().collect())
            .unwrap_or_default();
        positions.sort_unstable();
        positions
            .into_iter()
            .map(|position| &self.rules[position])
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Raised when a literal answer has no rule; never defaulted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    #[error("answer '{answer}' to question {question} has no scoring rule")]
    UnknownAnswer {
        question: QuestionKey,
        answer: String,
    },
}

/// Failures while loading the scoring table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("failed to read scoring table: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid scoring table data: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: question '{header}' is not part of the questionnaire")]
    UnknownQuestion { line: usize, header: String },
    #[error("line {line}: unknown domain tag '{tag}'")]
    UnknownDomain { line: usize, tag: String },
    #[error("line {line}: score {score} outside 1..=5")]
    ScoreOutOfRange { line: usize, score: i64 },
    #[error("line {line}: duplicate rule for question {question} and answer '{answer}'")]
    DuplicateRule {
        line: usize,
        question: QuestionKey,
        answer: String,
    },
    #[error("line {line}: question {question} is tagged with more than one domain")]
    ConflictingDomain { line: usize, question: QuestionKey },
    #[error("question {0} has no scoring rules")]
    MissingQuestion(QuestionKey),
}
