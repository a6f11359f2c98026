//! Account domain types and database queries.
//!
//! Every query takes the ID of the logged-in user and only touches that user's
//! accounts. An account that belongs to somebody else looks exactly like one
//! that does not exist.

use std::fmt::Display;

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, auth::UserID};

/// Database identifier for an account.
pub type AccountId = i64;

/// A validated, non-empty account name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct AccountName(String);

impl AccountName {
    /// Create an account name from `name` with surrounding whitespace removed.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyAccountName] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyAccountName)
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create an account name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for AccountName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for AccountName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A place money is kept, e.g. a wallet or a bank account.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// The id for the account.
    pub id: AccountId,
    /// The display name, unique among the user's accounts.
    pub name: AccountName,
    /// Free text notes, may be empty.
    pub description: String,
    /// When the account was created.
    pub created_at: Date,
    /// When the account was moved to the trash, `None` for active accounts.
    pub deleted_at: Option<Date>,
}

/// An active account and its net balance.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountBalance {
    /// The account.
    pub account: Account,
    /// Credits minus debits over all of the account's transactions.
    pub balance: f64,
}

/// Create the account table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS account (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            deleted_at TEXT,
            UNIQUE(user_id, name),
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_account_user_id ON account(user_id);",
    )?;

    Ok(())
}

fn map_duplicate_name(error: rusqlite::Error, name: &AccountName) -> Error {
    match error {
        // Code 2067 occurs when a UNIQUE constraint failed.
        rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
            if sql_error.extended_code == 2067 && desc.contains("account.name") =>
        {
            Error::DuplicateAccountName(name.to_string())
        }
        error => error.into(),
    }
}

/// Create an account for `user_id` and return it with its generated ID.
///
/// # Errors
///
/// Returns [Error::DuplicateAccountName] if the user already has an account
/// called `name`, including accounts in the trash.
pub fn create_account(
    user_id: UserID,
    name: AccountName,
    description: &str,
    created_at: Date,
    connection: &Connection,
) -> Result<Account, Error> {
    connection
        .execute(
            "INSERT INTO account (user_id, name, description, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![user_id.as_i64(), name.as_ref(), description, created_at],
        )
        .map_err(|error| map_duplicate_name(error, &name))?;

    let id = connection.last_insert_rowid();

    Ok(Account {
        id,
        name,
        description: description.to_owned(),
        created_at,
        deleted_at: None,
    })
}

/// Retrieve one of the user's active accounts.
///
/// # Errors
///
/// Returns [Error::NotFound] if `account_id` does not refer to an active account of `user_id`.
pub fn get_active_account(
    user_id: UserID,
    account_id: AccountId,
    connection: &Connection,
) -> Result<Account, Error> {
    connection
        .prepare(
            "SELECT id, name, description, created_at, deleted_at FROM account
            WHERE id = ?1 AND user_id = ?2 AND deleted_at IS NULL",
        )?
        .query_row(params![account_id, user_id.as_i64()], map_row)
        .map_err(Error::from)
}

/// Change the name and description of one of the user's active accounts.
///
/// # Errors
///
/// Returns a:
/// - [Error::UpdateMissingAccount] if there is no such active account,
/// - [Error::DuplicateAccountName] if another account already uses `name`.
pub fn update_account(
    user_id: UserID,
    account_id: AccountId,
    name: &AccountName,
    description: &str,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection
        .execute(
            "UPDATE account SET name = ?1, description = ?2
            WHERE id = ?3 AND user_id = ?4 AND deleted_at IS NULL",
            params![name.as_ref(), description, account_id, user_id.as_i64()],
        )
        .map_err(|error| map_duplicate_name(error, name))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingAccount);
    }

    Ok(())
}

/// Move an active account to the trash by stamping it with `today`.
///
/// # Errors
///
/// Returns [Error::DeleteMissingAccount] if there is no such active account.
pub fn soft_delete_account(
    user_id: UserID,
    account_id: AccountId,
    today: Date,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE account SET deleted_at = ?1
        WHERE id = ?2 AND user_id = ?3 AND deleted_at IS NULL",
        params![today, account_id, user_id.as_i64()],
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingAccount);
    }

    Ok(())
}

/// Take an account out of the trash.
///
/// # Errors
///
/// Returns [Error::NotFound] if the account is not in the user's trash.
pub fn restore_account(
    user_id: UserID,
    account_id: AccountId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE account SET deleted_at = NULL
        WHERE id = ?1 AND user_id = ?2 AND deleted_at IS NOT NULL",
        params![account_id, user_id.as_i64()],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Delete an account, active or trashed, together with its transactions.
///
/// # Errors
///
/// Returns [Error::DeleteMissingAccount] if the user has no such account.
pub fn delete_account_permanently(
    user_id: UserID,
    account_id: AccountId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM account WHERE id = ?1 AND user_id = ?2",
        params![account_id, user_id.as_i64()],
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingAccount);
    }

    Ok(())
}

/// The user's active accounts ordered by name, each with its net balance.
pub fn get_accounts_with_balances(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<AccountBalance>, Error> {
    connection
        .prepare(
            "SELECT a.id, a.name, a.description, a.created_at, a.deleted_at,
                COALESCE(SUM(CASE WHEN t.type = 'cr' THEN t.amount ELSE -t.amount END), 0.0)
            FROM account a
            LEFT JOIN \"transaction\" t ON t.account_id = a.id
            WHERE a.user_id = ?1 AND a.deleted_at IS NULL
            GROUP BY a.id
            ORDER BY a.name ASC",
        )?
        .query_map([user_id.as_i64()], |row| {
            Ok(AccountBalance {
                account: map_row(row)?,
                balance: row.get(5)?,
            })
        })?
        .map(|maybe_account| maybe_account.map_err(Error::from))
        .collect()
}

/// The user's trashed accounts, most recently deleted first.
pub fn get_deleted_accounts(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Account>, Error> {
    connection
        .prepare(
            "SELECT id, name, description, created_at, deleted_at FROM account
            WHERE user_id = ?1 AND deleted_at IS NOT NULL
            ORDER BY deleted_at DESC, name ASC",
        )?
        .query_map([user_id.as_i64()], map_row)?
        .map(|maybe_account| maybe_account.map_err(Error::from))
        .collect()
}

/// Count the user's accounts that are not in the trash.
pub fn count_active_accounts(user_id: UserID, connection: &Connection) -> Result<u64, Error> {
    connection
        .query_row(
            "SELECT COUNT(*) FROM account WHERE user_id = ?1 AND deleted_at IS NULL",
            [user_id.as_i64()],
            |row| {
                let count: i64 = row.get(0)?;
                u64::try_from(count).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(0, count))
            },
        )
        .map_err(Error::from)
}

fn map_row(row: &Row) -> Result<Account, rusqlite::Error> {
    let raw_name: String = row.get(1)?;

    Ok(Account {
        id: row.get(0)?,
        name: AccountName::new_unchecked(&raw_name),
        description: row.get(2)?,
        created_at: row.get(3)?,
        deleted_at: row.get(4)?,
    })
}
