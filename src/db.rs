//! Sets up the application database.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    Error, account::create_account_table, auth::create_user_table,
    category::create_category_table, transaction::create_transaction_table,
};

/// Create the tables for all of the domain models.
///
/// Foreign key enforcement is switched on for the connection so that deleting
/// an account also deletes its transactions.
///
/// # Errors
/// Returns an error if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_account_table(&transaction)?;
    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
