use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Expense, ExpenseDraft, MonthPeriod, ResultEngine,
    expenses::{self, encode_participants},
    util::{DraftMode, parse_expense_id, validate_draft},
};

use super::{Engine, with_tx};

fn not_found() -> EngineError {
    EngineError::KeyNotFound("expense".to_string())
}

impl Engine {
    /// Validates `draft` and stores a new expense.
    ///
    /// `date` defaults to now and `participants` to an empty list.
    pub async fn create_expense(&self, draft: ExpenseDraft) -> ResultEngine<Expense> {
        let valid = validate_draft(draft, DraftMode::Create)?;
        let now = Utc::now();

        let (Some(description), Some(amount), Some(category)) =
            (valid.description, valid.amount, valid.category)
        else {
            return Err(EngineError::Validation(
                "\"descricao\", \"valor\" and \"categoria\" are required".to_string(),
            ));
        };

        let expense = Expense {
            id: Uuid::new_v4(),
            description,
            amount,
            category,
            date: valid.date.unwrap_or(now),
            participants: valid.participants.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        expenses::ActiveModel::try_from(&expense)?
            .insert(&self.database)
            .await?;

        Ok(expense)
    }

    /// Lists expenses, newest first, optionally restricted to a month.
    pub async fn list_expenses(&self, period: Option<&MonthPeriod>) -> ResultEngine<Vec<Expense>> {
        let mut query = expenses::Entity::find();
        if let Some(period) = period {
            query = query.filter(expenses::Column::OccurredAt.between(period.start, period.end));
        }

        query
            .order_by_desc(expenses::Column::OccurredAt)
            .order_by_desc(expenses::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Expense::try_from)
            .collect()
    }

    pub async fn expense(&self, id: &str) -> ResultEngine<Expense> {
        let id = parse_expense_id(id)?;
        expenses::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(not_found)
            .and_then(Expense::try_from)
    }

    /// Applies a partial update. Input is validated before the store is touched.
    pub async fn update_expense(&self, id: &str, draft: ExpenseDraft) -> ResultEngine<Expense> {
        let valid = validate_draft(draft, DraftMode::Patch)?;
        let id = parse_expense_id(id)?;

        with_tx!(self, |db_tx| {
            let model = expenses::Entity::find_by_id(id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(not_found)?;

            let mut active: expenses::ActiveModel = model.into();
            if let Some(description) = valid.description {
                active.description = ActiveValue::Set(description);
            }
            if let Some(amount) = valid.amount {
                active.amount_minor = ActiveValue::Set(amount.cents());
            }
            if let Some(category) = valid.category {
                active.category = ActiveValue::Set(category.as_str().to_string());
            }
            if let Some(date) = valid.date {
                active.occurred_at = ActiveValue::Set(date);
            }
            if let Some(participants) = valid.participants {
                active.participants = ActiveValue::Set(encode_participants(&participants)?);
            }
            active.updated_at = ActiveValue::Set(Utc::now());

            let updated = active.update(&db_tx).await?;
            Expense::try_from(updated)
        })
    }

    /// Deletes an expense and returns what was removed.
    pub async fn delete_expense(&self, id: &str) -> ResultEngine<Expense> {
        let id = parse_expense_id(id)?;

        with_tx!(self, |db_tx| {
            let model = expenses::Entity::find_by_id(id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(not_found)?;
            let expense = Expense::try_from(model)?;

            expenses::Entity::delete_by_id(id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(expense)
        })
    }
}
