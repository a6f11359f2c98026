//! Transaction models and the form used to record them.

use std::fmt::Display;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{account::AccountId, category::CategoryId};

/// Database identifier for a transaction.
pub type TransactionId = i64;

/// Which way the money moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    /// Money coming into the account.
    #[serde(rename = "cr")]
    Credit,
    /// Money leaving the account.
    #[serde(rename = "db")]
    Debit,
}

impl TransactionType {
    /// The code stored in the database and sent by forms.
    pub fn code(self) -> &'static str {
        match self {
            Self::Credit => "cr",
            Self::Debit => "db",
        }
    }

    /// Parse a stored code, `None` for anything other than "cr" or "db".
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "cr" => Some(Self::Credit),
            "db" => Some(Self::Debit),
            _ => None,
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Credit => write!(f, "Credit"),
            Self::Debit => write!(f, "Debit"),
        }
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let code = value.as_str()?;

        Self::from_code(code).ok_or_else(|| {
            FromSqlError::Other(format!("unknown transaction type \"{code}\"").into())
        })
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

/// A credit or debit recorded against one of the user's accounts.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,
    pub account_id: AccountId,
    pub category_id: CategoryId,
    /// Always greater than zero, the direction is given by `transaction_type`.
    pub amount: f64,
    pub date: Date,
    pub transaction_type: TransactionType,
    pub description: String,
}

/// A transaction with the names needed to display it.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionListItem {
    pub transaction: Transaction,
    pub account_name: String,
    pub category_name: String,
}

/// The fields needed to record a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The account the money moved in or out of.
    pub account_id: AccountId,
    pub category_id: CategoryId,
    /// The amount of money, always greater than zero.
    pub amount: f64,
    /// When the transaction happened, never in the future.
    pub date: Date,
    pub transaction_type: TransactionType,
    pub description: String,
}

/// The form data for adding a transaction to an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionForm {
    pub amount: f64,
    pub date: Date,
    pub transaction_type: TransactionType,
    pub category_id: CategoryId,
    #[serde(default)]
    pub description: String,
}
