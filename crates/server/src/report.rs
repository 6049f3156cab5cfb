//! Report API endpoints: monthly split and summary mail.

use api_types::report::{EmailReport, EmailSent, Period, SplitQuery, SplitResponse};
use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};

use crate::{
    ServerError,
    expenses::{map_amount, map_categories, parse_period},
    server::ServerState,
};

/// Splits `a@x.com, b@y.com` into trimmed, non-empty entries.
fn parse_participants(raw: Option<&str>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(ToString::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn map_split(split: engine::Split) -> SplitResponse {
    SplitResponse {
        periodo: Period {
            mes: split.period.month,
            ano: split.period.year,
        },
        total: map_amount(split.total),
        participantes: split.participants,
        valor_por_pessoa: map_amount(split.per_person),
        por_categoria: map_categories(split.per_category),
        quantidade_despesas: split.expense_count,
    }
}

pub async fn split(
    State(state): State<ServerState>,
    Query(query): Query<SplitQuery>,
) -> Result<Json<SplitResponse>, ServerError> {
    let (Some(mes), Some(ano)) = (
        query.mes.as_deref().filter(|v| !v.is_empty()),
        query.ano.as_deref().filter(|v| !v.is_empty()),
    ) else {
        return Err(ServerError::Generic(
            "provide mes and ano (e.g. ?mes=8&ano=2025)".to_string(),
        ));
    };
    let period = parse_period(mes, ano)?;
    let participants = parse_participants(query.participantes.as_deref());

    let split = state.engine.split_month(period, &participants).await?;
    Ok(Json(map_split(split)))
}

pub async fn email(
    State(state): State<ServerState>,
    payload: Result<Json<EmailReport>, JsonRejection>,
) -> Result<Json<EmailSent>, ServerError> {
    let Json(payload) = payload.map_err(|rejection| ServerError::Generic(rejection.body_text()))?;
    let (Some(mes), Some(ano), Some(recipients)) =
        (payload.mes, payload.ano, payload.destinatarios)
    else {
        return Err(ServerError::Generic(
            "provide mes, ano and destinatarios[]".to_string(),
        ));
    };
    let period = engine::MonthPeriod::new(mes, ano)?;

    let id = state.engine.send_month_summary(period, &recipients).await?;
    tracing::info!(mes, ano, recipients = recipients.len(), "monthly summary sent");
    Ok(Json(EmailSent {
        message: "email sent".to_string(),
        id,
    }))
}
