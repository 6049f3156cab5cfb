use sea_orm::{QueryFilter, QueryOrder, prelude::*};

use crate::{
    EngineError, Expense, MonthPeriod, OutgoingMail, ResultEngine, Split, expenses,
    report::{render_html, render_subject},
    split::{compute_split, summarize},
    util::is_valid_email,
};

use super::Engine;

impl Engine {
    /// Expenses of `period` in the order they were recorded.
    async fn month_expenses(&self, period: &MonthPeriod) -> ResultEngine<Vec<Expense>> {
        expenses::Entity::find()
            .filter(expenses::Column::OccurredAt.between(period.start, period.end))
            .order_by_asc(expenses::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Expense::try_from)
            .collect()
    }

    /// Splits the expenses of `period` between `participants`.
    ///
    /// With no explicit participants, everybody tagged on the month's
    /// expenses shares the cost, in the order they were first recorded.
    pub async fn split_month(
        &self,
        period: MonthPeriod,
        participants: &[String],
    ) -> ResultEngine<Split> {
        let expenses = self.month_expenses(&period).await?;
        compute_split(period, &expenses, participants)
    }

    /// Mails the month's totals to `recipients` and returns the delivery id.
    pub async fn send_month_summary(
        &self,
        period: MonthPeriod,
        recipients: &[String],
    ) -> ResultEngine<String> {
        if recipients.is_empty() {
            return Err(EngineError::Validation(
                "\"destinatarios\" must contain at least one recipient".to_string(),
            ));
        }
        let invalid: Vec<String> = recipients
            .iter()
            .enumerate()
            .filter(|(_, email)| !is_valid_email(email))
            .map(|(idx, _)| format!("\"destinatarios[{idx}]\" must be a valid email"))
            .collect();
        if !invalid.is_empty() {
            return Err(EngineError::Validation(invalid.join("; ")));
        }

        let mailer = self
            .mailer
            .as_ref()
            .ok_or_else(|| EngineError::Mail("mail dispatcher not configured".to_string()))?;

        let expenses = self.month_expenses(&period).await?;
        let summary = summarize(&expenses)?;

        let mail = OutgoingMail {
            from: self.mail_from.clone(),
            to: recipients.to_vec(),
            subject: render_subject(&period),
            html: render_html(&period, &summary),
        };
        mailer.send(mail).await
    }
}
