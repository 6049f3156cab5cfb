use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{Mailer, ResultEngine, mailer::DEFAULT_MAIL_FROM};

mod expenses;
mod reports;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Facade over the expense store and the mail dispatcher.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    mailer: Option<Arc<dyn Mailer>>,
    mail_from: String,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    mailer: Option<Arc<dyn Mailer>>,
    mail_from: Option<String>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Pass the mail dispatcher used for monthly summaries
    pub fn mailer(mut self, mailer: Arc<dyn Mailer>) -> EngineBuilder {
        self.mailer = Some(mailer);
        self
    }

    /// Override the sender of summary mails
    pub fn mail_from(mut self, from: impl Into<String>) -> EngineBuilder {
        self.mail_from = Some(from.into());
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            mailer: self.mailer,
            mail_from: self
                .mail_from
                .unwrap_or_else(|| DEFAULT_MAIL_FROM.to_string()),
        })
    }
}
