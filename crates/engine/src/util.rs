//! Internal helpers for input validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every write path enforces the same expense invariants.
//! Messages name the wire field they refer to (`descricao`, `valor`, ...).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;

use crate::{Category, EngineError, ExpenseDraft, MoneyCents, ResultEngine};

const DESCRIPTION_MIN_CHARS: usize = 2;
const DESCRIPTION_MAX_CHARS: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DraftMode {
    Create,
    Patch,
}

/// Validated expense fields. In `Create` mode the required ones are present.
#[derive(Clone, Debug, Default)]
pub(crate) struct ValidDraft {
    pub(crate) description: Option<String>,
    pub(crate) amount: Option<MoneyCents>,
    pub(crate) category: Option<Category>,
    pub(crate) date: Option<DateTime<Utc>>,
    pub(crate) participants: Option<Vec<String>>,
}

/// Validate every field of `draft`, collecting one message per violation.
pub(crate) fn validate_draft(draft: ExpenseDraft, mode: DraftMode) -> ResultEngine<ValidDraft> {
    if mode == DraftMode::Patch && draft.is_empty() {
        return Err(EngineError::Validation(
            "at least one field must be provided".to_string(),
        ));
    }

    let required = mode == DraftMode::Create;
    let mut errors: Vec<String> = Vec::new();

    let description = check_field(
        &mut errors,
        "descricao",
        required,
        draft.description.map(|raw| validate_description(&raw)),
    );
    let amount = check_field(
        &mut errors,
        "valor",
        required,
        draft.amount.map(validate_amount),
    );
    let category = check_field(
        &mut errors,
        "categoria",
        required,
        draft.category.map(|raw| validate_category(&raw)),
    );
    let date = check_field(
        &mut errors,
        "data",
        false,
        draft.date.map(|raw| parse_date(&raw)),
    );

    let participants = match draft.participants {
        None => None,
        Some(list) => match validate_participants(list) {
            Ok(list) => Some(list),
            Err(mut messages) => {
                errors.append(&mut messages);
                None
            }
        },
    };

    if !errors.is_empty() {
        return Err(EngineError::Validation(errors.join("; ")));
    }

    Ok(ValidDraft {
        description,
        amount,
        category,
        date,
        participants,
    })
}

fn check_field<T>(
    errors: &mut Vec<String>,
    field: &str,
    required: bool,
    value: Option<Result<T, String>>,
) -> Option<T> {
    match value {
        Some(Ok(value)) => Some(value),
        Some(Err(message)) => {
            errors.push(message);
            None
        }
        None => {
            if required {
                errors.push(format!("\"{field}\" is required"));
            }
            None
        }
    }
}

fn validate_description(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    let len = trimmed.chars().count();
    if len == 0 {
        return Err("\"descricao\" is not allowed to be empty".to_string());
    }
    if len < DESCRIPTION_MIN_CHARS {
        return Err(format!(
            "\"descricao\" length must be at least {DESCRIPTION_MIN_CHARS} characters long"
        ));
    }
    if len > DESCRIPTION_MAX_CHARS {
        return Err(format!(
            "\"descricao\" length must be less than or equal to {DESCRIPTION_MAX_CHARS} characters long"
        ));
    }
    Ok(trimmed.to_string())
}

fn validate_amount(value: f64) -> Result<MoneyCents, String> {
    if !value.is_finite() {
        return Err("\"valor\" must be a number".to_string());
    }
    if value <= 0.0 {
        return Err("\"valor\" must be a positive number".to_string());
    }
    let amount = MoneyCents::from_decimal(value)
        .map_err(|_| "\"valor\" must be a safe number".to_string())?;
    if !amount.is_positive() {
        return Err("\"valor\" must be a positive number".to_string());
    }
    Ok(amount)
}

fn validate_category(raw: &str) -> Result<Category, String> {
    Category::try_from(raw).map_err(|_| {
        let allowed: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
        format!("\"categoria\" must be one of [{}]", allowed.join(", "))
    })
}

/// Parse an expense date. Timestamps without offset are taken as UTC.
pub(crate) fn parse_date(raw: &str) -> Result<DateTime<Utc>, String> {
    let invalid = || "\"data\" must be a valid date".to_string();
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| naive.and_utc())
            .ok_or_else(invalid);
    }
    Err(invalid())
}

fn validate_participants(list: Vec<String>) -> Result<Vec<String>, Vec<String>> {
    let errors: Vec<String> = list
        .iter()
        .enumerate()
        .filter(|(_, email)| !is_valid_email(email))
        .map(|(idx, _)| format!("\"participantes[{idx}]\" must be a valid email"))
        .collect();
    if errors.is_empty() {
        Ok(list)
    } else {
        Err(errors)
    }
}

/// Syntactic email check: `local@domain.tld`, no whitespace, non-empty labels.
pub(crate) fn is_valid_email(value: &str) -> bool {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_alphanumeric() || c == '-')
    })
}

/// Parse an expense id and return a labeled error on failure.
pub(crate) fn parse_expense_id(value: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value.trim()).map_err(|_| EngineError::InvalidId("expense".to_string()))
}
