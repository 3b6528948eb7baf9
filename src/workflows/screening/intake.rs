use super::domain::{RespondentRecord, StoredRow};

/// Respondent-facing reasons a submission is refused; nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeRejection {
    #[error("No has aceptado el tratamiento de datos personales. Por favor, acepta para continuar.")]
    ConsentMissing,
    #[error("Por favor, ingrese su número de documento de identidad.")]
    IdentifierMissing,
    #[error("Por favor, ingrese solo números para el documento de identidad.")]
    IdentifierNotNumeric,
    #[error("Número de documento de identidad inválido.")]
    IdentifierInvalid,
    #[error("Este número de documento ya está registrado. No se puede volver a cargar.")]
    DuplicateIdentifier,
    #[error("Por favor, ingrese su nombre completo.")]
    NameMissing,
    #[error("Por favor, responda todas las preguntas.")]
    IncompleteAnswers,
}

/// Gate run before a record reaches the response store.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntakeValidator;

impl IntakeValidator {
    /// Checks run in a fixed order and stop at the first failure.
    pub fn validate(
        &self,
        record: &RespondentRecord,
        existing: &[StoredRow],
    ) -> Result<(), IntakeRejection> {
        if !record.consent {
            return Err(IntakeRejection::ConsentMissing);
        }

        let identifier = parse_identifier(&record.national_id)?;
        let duplicate = existing
            .iter()
            .filter_map(StoredRow::identifier)
            .any(|stored| parse_identifier(stored).ok() == Some(identifier));
        if duplicate {
            return Err(IntakeRejection::DuplicateIdentifier);
        }

        if record.full_name.trim().is_empty() {
            return Err(IntakeRejection::NameMissing);
        }

        if !record.unanswered().is_empty() {
            return Err(IntakeRejection::IncompleteAnswers);
        }

        Ok(())
    }
}

/// National identifiers are positive integers; surrounding whitespace and a leading sign are
/// accepted, so signed non-positive values read as invalid rather than non-numeric.
pub fn parse_identifier(raw: &str) -> Result<u64, IntakeRejection> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(IntakeRejection::IdentifierMissing);
    }

    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(IntakeRejection::IdentifierNotNumeric);
    }
    if negative {
        return Err(IntakeRejection::IdentifierInvalid);
    }

    match digits.parse::<u64>() {
        Ok(0) | Err(_) => Err(IntakeRejection::IdentifierInvalid),
        Ok(identifier) => Ok(identifier),
    }
}
