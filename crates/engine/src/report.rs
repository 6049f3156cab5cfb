//! Mail rendering of a monthly [`Summary`].

use crate::{MoneyCents, MonthPeriod, Summary};

const CURRENCY_SYMBOL: &str = "R$";

pub fn format_currency(amount: MoneyCents) -> String {
    format!("{CURRENCY_SYMBOL} {amount}")
}

pub fn render_subject(period: &MonthPeriod) -> String {
    format!("Resumo de Gastos {}/{}", period.month, period.year)
}

/// HTML body listing the total, one line per category and the expense count.
pub fn render_html(period: &MonthPeriod, summary: &Summary) -> String {
    let mut items = String::new();
    for (category, amount) in &summary.per_category {
        items.push_str(&format!(
            "<li>{}: {}</li>",
            category.as_str(),
            format_currency(*amount)
        ));
    }

    format!(
        "<h2>Resumo de Gastos - {month}/{year}</h2>\n\
         <p><strong>Total:</strong> {total}</p>\n\
         <p><strong>Por categoria:</strong></p>\n\
         <ul>{items}</ul>\n\
         <p>Quantidade de despesas: {count}</p>\n",
        month = period.month,
        year = period.year,
        total = format_currency(summary.total),
        count = summary.expense_count,
    )
}
