//! Expense tracking engine.
//!
//! Holds the expense model and its validation, the month period helpers, the
//! split & aggregation functions, the report formatter and the mail
//! dispatcher. [`Engine`] ties them to the database.

pub use commands::ExpenseDraft;
pub use error::EngineError;
pub use expenses::{Category, Expense};
pub use mailer::{DEFAULT_MAIL_FROM, DEFAULT_SMTP_PORT, Mailer, OutgoingMail, SmtpConfig, SmtpMailer};
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder};
pub use period::{MonthPeriod, days_in_month};
pub use split::{Split, Summary, compute_split, resolve_participants, summarize};

mod commands;
mod error;
mod expenses;
mod mailer;
mod money;
mod ops;
mod period;
pub mod report;
mod split;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
