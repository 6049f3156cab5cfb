//! Expenses API endpoints

use api_types::{
    Amount, Message,
    expense::{Category, ExpenseListQuery, ExpensePayload, ExpenseView},
};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};

fn map_category(category: engine::Category) -> Category {
    match category {
        engine::Category::Basic => Category::Basic,
        engine::Category::Leisure => Category::Leisure,
        engine::Category::Other => Category::Other,
    }
}

pub(crate) fn map_amount(amount: engine::MoneyCents) -> Amount {
    Amount(amount.cents())
}

pub(crate) fn map_categories(
    per_category: std::collections::BTreeMap<engine::Category, engine::MoneyCents>,
) -> std::collections::BTreeMap<Category, Amount> {
    per_category
        .into_iter()
        .map(|(category, amount)| (map_category(category), map_amount(amount)))
        .collect()
}

fn map_expense(expense: engine::Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        descricao: expense.description,
        valor: map_amount(expense.amount),
        categoria: map_category(expense.category),
        data: expense.date,
        participantes: expense.participants,
        created_at: expense.created_at,
        updated_at: expense.updated_at,
    }
}

fn draft(payload: ExpensePayload) -> engine::ExpenseDraft {
    engine::ExpenseDraft {
        description: payload.descricao,
        amount: payload.valor,
        category: payload.categoria,
        date: payload.data,
        participants: payload.participantes,
    }
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ServerError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ServerError::Generic(rejection.body_text()))
}

/// Parses a `mes`/`ano` pair into a month period.
pub(crate) fn parse_period(mes: &str, ano: &str) -> Result<engine::MonthPeriod, ServerError> {
    let month: u32 = mes
        .trim()
        .parse()
        .map_err(|_| ServerError::Generic("\"mes\" must be a number".to_string()))?;
    let year: i32 = ano
        .trim()
        .parse()
        .map_err(|_| ServerError::Generic("\"ano\" must be a number".to_string()))?;
    Ok(engine::MonthPeriod::new(month, year)?)
}

pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<ExpensePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let payload = body(payload)?;
    let expense = state.engine.create_expense(draft(payload)).await?;
    Ok((StatusCode::CREATED, Json(map_expense(expense))))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ExpenseListQuery>,
) -> Result<Json<Vec<ExpenseView>>, ServerError> {
    let period = match (query.mes.as_deref(), query.ano.as_deref()) {
        (Some(mes), Some(ano)) if !mes.is_empty() && !ano.is_empty() => {
            Some(parse_period(mes, ano)?)
        }
        _ => None,
    };

    let expenses = state
        .engine
        .list_expenses(period.as_ref())
        .await?
        .into_iter()
        .map(map_expense)
        .collect();
    Ok(Json(expenses))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state.engine.expense(&id).await?;
    Ok(Json(map_expense(expense)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<ExpensePayload>, JsonRejection>,
) -> Result<Json<ExpenseView>, ServerError> {
    let payload = body(payload)?;
    let expense = state.engine.update_expense(&id, draft(payload)).await?;
    Ok(Json(map_expense(expense)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, ServerError> {
    let expense = state.engine.delete_expense(&id).await?;
    tracing::info!(id = %expense.id, "expense deleted");
    Ok(Json(Message::new("expense deleted")))
}
