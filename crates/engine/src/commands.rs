//! Command structs for engine operations.
//!
//! An [`ExpenseDraft`] carries unvalidated user input for both create and
//! update. Every field is optional here; the engine decides which ones are
//! required depending on the operation.

/// Raw expense fields as received from a client.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpenseDraft {
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    /// RFC 3339 timestamp, `YYYY-MM-DDTHH:MM:SS` or `YYYY-MM-DD`.
    pub date: Option<String>,
    pub participants: Option<Vec<String>>,
}

impl ExpenseDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    #[must_use]
    pub fn participants<I, S>(mut self, participants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.participants = Some(participants.into_iter().map(Into::into).collect());
        self
    }

    /// Returns `true` when no field is set.
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.date.is_none()
            && self.participants.is_none()
    }
}
