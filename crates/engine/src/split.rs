//! Monthly split & aggregation.
//!
//! Everything here is pure: the functions only look at the expenses they are
//! given, so callers are responsible for restricting them to a
//! [`MonthPeriod`] first.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Category, EngineError, Expense, MoneyCents, MonthPeriod, ResultEngine};

/// Totals of a set of expenses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: MoneyCents,
    /// Only categories that appear in the expenses are present.
    pub per_category: BTreeMap<Category, MoneyCents>,
    pub expense_count: usize,
}

/// Result of dividing a month's expenses between participants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub period: MonthPeriod,
    pub total: MoneyCents,
    pub participants: Vec<String>,
    pub per_person: MoneyCents,
    pub per_category: BTreeMap<Category, MoneyCents>,
    pub expense_count: usize,
}

/// Totals `expenses` overall and per category.
///
/// Fails when a total no longer fits in [`MoneyCents`].
pub fn summarize(expenses: &[Expense]) -> ResultEngine<Summary> {
    let too_large = || EngineError::Validation("amount too large".to_string());

    let mut total = MoneyCents::ZERO;
    let mut per_category: BTreeMap<Category, MoneyCents> = BTreeMap::new();
    for expense in expenses {
        total = total.checked_add(expense.amount).ok_or_else(too_large)?;
        let subtotal = per_category.entry(expense.category).or_default();
        *subtotal = subtotal.checked_add(expense.amount).ok_or_else(too_large)?;
    }

    Ok(Summary {
        total,
        per_category,
        expense_count: expenses.len(),
    })
}

/// Pick who pays.
///
/// A non-empty explicit list wins and is kept as given, duplicates included.
/// Otherwise the participants of every expense are merged, keeping the first
/// appearance of each email.
pub fn resolve_participants(expenses: &[Expense], explicit: &[String]) -> ResultEngine<Vec<String>> {
    let explicit: Vec<String> = explicit
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(ToString::to_string)
        .collect();

    let participants = if explicit.is_empty() {
        let mut inferred: Vec<String> = Vec::new();
        for participant in expenses.iter().flat_map(|e| e.participants.iter()) {
            if !inferred.contains(participant) {
                inferred.push(participant.clone());
            }
        }
        inferred
    } else {
        explicit
    };

    if participants.is_empty() {
        return Err(EngineError::Validation(
            "no participants to split between".to_string(),
        ));
    }
    Ok(participants)
}

pub fn compute_split(
    period: MonthPeriod,
    expenses: &[Expense],
    explicit: &[String],
) -> ResultEngine<Split> {
    let participants = resolve_participants(expenses, explicit)?;
    let summary = summarize(expenses)?;
    let per_person = summary.total.split_even(participants.len()).ok_or_else(|| {
        EngineError::Validation("no participants to split between".to_string())
    })?;

    Ok(Split {
        period,
        total: summary.total,
        participants,
        per_person,
        per_category: summary.per_category,
        expense_count: summary.expense_count,
    })
}
