use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Monetary amount in cents, exchanged as a plain JSON number.
///
/// Whole amounts are written as integers (`30`), everything else with its
/// cents (`15.5`, `0.05`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(pub i64);

impl Amount {
    pub fn cents(self) -> i64 {
        self.0
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % 100 == 0 {
            serializer.serialize_i64(self.0 / 100)
        } else {
            serializer.serialize_f64(self.0 as f64 / 100.0)
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let cents = (f64::deserialize(deserializer)? * 100.0).round();
        // i64::MAX is not representable; its f64 neighbour is 2^63.
        if !cents.is_finite() || cents >= i64::MAX as f64 || cents < i64::MIN as f64 {
            return Err(serde::de::Error::custom(format!(
                "amount out of range: {}",
                cents / 100.0
            )));
        }
        Ok(Amount(cents as i64))
    }
}

/// Generic `{ "message": ... }` body, used for errors and acknowledgements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub mod expense {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    pub enum Category {
        #[serde(rename = "basico")]
        Basic,
        #[serde(rename = "lazer")]
        Leisure,
        #[serde(rename = "outros")]
        Other,
    }

    /// Body of `POST /api/expenses` and `PUT /api/expenses/{id}`.
    ///
    /// Every field is optional at this level so that the server can report
    /// all missing or invalid fields at once.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct ExpensePayload {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub descricao: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub valor: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub categoria: Option<String>,
        /// RFC3339 timestamp or `YYYY-MM-DD`.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub data: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub participantes: Option<Vec<String>>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseView {
        pub id: Uuid,
        pub descricao: String,
        pub valor: Amount,
        pub categoria: Category,
        pub data: DateTime<Utc>,
        pub participantes: Vec<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    /// Query of `GET /api/expenses`. The filter applies only when both are set.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseListQuery {
        pub mes: Option<String>,
        pub ano: Option<String>,
    }
}

pub mod report {
    use std::collections::BTreeMap;

    use super::*;
    use crate::expense::Category;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Period {
        pub mes: u32,
        pub ano: i32,
    }

    /// Query of `GET /api/report/dividir`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SplitQuery {
        pub mes: Option<String>,
        pub ano: Option<String>,
        /// Comma separated emails.
        pub participantes: Option<String>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SplitResponse {
        pub periodo: Period,
        pub total: Amount,
        pub participantes: Vec<String>,
        pub valor_por_pessoa: Amount,
        pub por_categoria: BTreeMap<Category, Amount>,
        pub quantidade_despesas: usize,
    }

    /// Body of `POST /api/report/email`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct EmailReport {
        pub mes: Option<u32>,
        pub ano: Option<i32>,
        pub destinatarios: Option<Vec<String>>,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct EmailSent {
        pub message: String,
        pub id: String,
    }
}
