//! Expense primitives.
//!
//! An `Expense` is a dated amount with a [`Category`] and the list of people
//! (emails) it is shared with.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Basic,
    Leisure,
    Other,
}

impl Category {
    pub const ALL: [Category; 3] = [Self::Basic, Self::Leisure, Self::Other];

    /// Label used on the wire and in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basico",
            Self::Leisure => "lazer",
            Self::Other => "outros",
        }
    }
}

impl TryFrom<&str> for Category {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "basico" => Ok(Self::Basic),
            "lazer" => Ok(Self::Leisure),
            "outros" => Ok(Self::Other),
            other => Err(EngineError::Validation(format!(
                "invalid category: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub description: String,
    pub amount: MoneyCents,
    pub category: Category,
    pub date: DateTime<Utc>,
    pub participants: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub description: String,
    pub amount_minor: i64,
    pub category: String,
    pub occurred_at: DateTimeUtc,
    /// JSON array of emails.
    pub participants: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub(crate) fn encode_participants(participants: &[String]) -> ResultEngine<String> {
    serde_json::to_string(participants)
        .map_err(|err| EngineError::Database(DbErr::Type(err.to_string())))
}

fn decode_participants(raw: &str) -> ResultEngine<Vec<String>> {
    serde_json::from_str(raw).map_err(|err| EngineError::Database(DbErr::Type(err.to_string())))
}

impl TryFrom<&Expense> for ActiveModel {
    type Error = EngineError;

    fn try_from(expense: &Expense) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ActiveValue::Set(expense.id.to_string()),
            description: ActiveValue::Set(expense.description.clone()),
            amount_minor: ActiveValue::Set(expense.amount.cents()),
            category: ActiveValue::Set(expense.category.as_str().to_string()),
            occurred_at: ActiveValue::Set(expense.date),
            participants: ActiveValue::Set(encode_participants(&expense.participants)?),
            created_at: ActiveValue::Set(expense.created_at),
            updated_at: ActiveValue::Set(expense.updated_at),
        })
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::InvalidId("expense".to_string()))?,
            description: model.description,
            amount: MoneyCents::new(model.amount_minor),
            category: Category::try_from(model.category.as_str())?,
            date: model.occurred_at,
            participants: decode_participants(&model.participants)?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::try_from(category.as_str()).unwrap(), category);
        }
        assert!(Category::try_from("invalid").is_err());
    }

    #[test]
    fn model_conversion_keeps_participant_order() {
        let now = Utc::now();
        let expense = Expense {
            id: Uuid::new_v4(),
            description: "Mercado".to_string(),
            amount: MoneyCents::new(4_590),
            category: Category::Basic,
            date: now,
            participants: vec!["b@x.com".to_string(), "a@x.com".to_string()],
            created_at: now,
            updated_at: now,
        };
        let model = Model {
            id: expense.id.to_string(),
            description: expense.description.clone(),
            amount_minor: 4_590,
            category: "basico".to_string(),
            occurred_at: now,
            participants: encode_participants(&expense.participants).unwrap(),
            created_at: now,
            updated_at: now,
        };
        assert_eq!(Expense::try_from(model).unwrap(), expense);
    }

    #[test]
    fn corrupt_participants_surface_as_database_error() {
        let now = Utc::now();
        let model = Model {
            id: Uuid::new_v4().to_string(),
            description: "Cinema".to_string(),
            amount_minor: 100,
            category: "lazer".to_string(),
            occurred_at: now,
            participants: "not json".to_string(),
            created_at: now,
            updated_at: now,
        };
        assert!(matches!(
            Expense::try_from(model),
            Err(EngineError::Database(_))
        ));
    }
}
