//! Database queries for transactions.
//!
//! Transactions belong to users through their account, so every query joins
//! on `account` and only looks at the user's accounts that are not in the trash.

use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::{
    Error,
    account::AccountId,
    auth::UserID,
    transaction::{NewTransaction, Transaction, TransactionId, TransactionListItem},
};

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            account_id INTEGER NOT NULL,
            category_id INTEGER NOT NULL,
            amount REAL NOT NULL CHECK (amount > 0),
            date TEXT NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('cr', 'db')),
            description TEXT NOT NULL DEFAULT '',
            FOREIGN KEY(account_id) REFERENCES account(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_account_date ON \"transaction\"(account_id, date);
        CREATE INDEX IF NOT EXISTS idx_transaction_category_date ON \"transaction\"(category_id, date);",
    )?;

    Ok(())
}

/// Record a transaction against one of the user's active accounts.
///
/// The date is not checked here, callers compare it against the local date.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the account is not an active account of `user_id`,
/// - [Error::InvalidCategory] if the category does not belong to `user_id`,
/// - [Error::NonPositiveAmount] if the amount is zero, negative or not a number,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    user_id: UserID,
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if !(transaction.amount > 0.0 && transaction.amount.is_finite()) {
        return Err(Error::NonPositiveAmount(transaction.amount));
    }

    let account_is_active = connection
        .query_row(
            "SELECT 1 FROM account WHERE id = ?1 AND user_id = ?2 AND deleted_at IS NULL",
            params![transaction.account_id, user_id.as_i64()],
            |_| Ok(()),
        )
        .optional()?
        .is_some();

    if !account_is_active {
        return Err(Error::NotFound);
    }

    let category_is_owned = connection
        .query_row(
            "SELECT 1 FROM category WHERE id = ?1 AND user_id = ?2",
            params![transaction.category_id, user_id.as_i64()],
            |_| Ok(()),
        )
        .optional()?
        .is_some();

    if !category_is_owned {
        return Err(Error::InvalidCategory(transaction.category_id));
    }

    connection
        .prepare(
            "INSERT INTO \"transaction\" (account_id, category_id, amount, date, type, description)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING id, account_id, category_id, amount, date, type, description",
        )?
        .query_row(
            params![
                transaction.account_id,
                transaction.category_id,
                transaction.amount,
                transaction.date,
                transaction.transaction_type,
                transaction.description,
            ],
            map_transaction_row,
        )
        .map_err(Error::from)
}

const LIST_ITEM_COLUMNS: &str = "t.id, t.account_id, t.category_id, t.amount, t.date, t.type, \
    t.description, a.name, c.name";

/// Retrieve one transaction of the user with its account and category names.
///
/// # Errors
/// Returns [Error::NotFound] if `transaction_id` is not a transaction in one of
/// the user's active accounts.
pub fn get_transaction(
    user_id: UserID,
    transaction_id: TransactionId,
    connection: &Connection,
) -> Result<TransactionListItem, Error> {
    connection
        .prepare(&format!(
            "SELECT {LIST_ITEM_COLUMNS} FROM \"transaction\" t
            INNER JOIN account a ON a.id = t.account_id
            INNER JOIN category c ON c.id = t.category_id
            WHERE t.id = ?1 AND a.user_id = ?2 AND a.deleted_at IS NULL"
        ))?
        .query_row(params![transaction_id, user_id.as_i64()], map_list_item_row)
        .map_err(Error::from)
}

/// All transactions in the user's active accounts, newest first.
pub fn get_transactions(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<TransactionListItem>, Error> {
    connection
        .prepare(&format!(
            "SELECT {LIST_ITEM_COLUMNS} FROM \"transaction\" t
            INNER JOIN account a ON a.id = t.account_id
            INNER JOIN category c ON c.id = t.category_id
            WHERE a.user_id = ?1 AND a.deleted_at IS NULL
            ORDER BY t.date DESC, t.id DESC"
        ))?
        .query_map([user_id.as_i64()], map_list_item_row)?
        .map(|maybe_item| maybe_item.map_err(Error::from))
        .collect()
}

/// The transactions of one of the user's active accounts, newest first.
pub fn get_account_transactions(
    user_id: UserID,
    account_id: AccountId,
    connection: &Connection,
) -> Result<Vec<TransactionListItem>, Error> {
    connection
        .prepare(&format!(
            "SELECT {LIST_ITEM_COLUMNS} FROM \"transaction\" t
            INNER JOIN account a ON a.id = t.account_id
            INNER JOIN category c ON c.id = t.category_id
            WHERE t.account_id = ?1 AND a.user_id = ?2 AND a.deleted_at IS NULL
            ORDER BY t.date DESC, t.id DESC"
        ))?
        .query_map(params![account_id, user_id.as_i64()], map_list_item_row)?
        .map(|maybe_item| maybe_item.map_err(Error::from))
        .collect()
}

fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        account_id: row.get(1)?,
        category_id: row.get(2)?,
        amount: row.get(3)?,
        date: row.get(4)?,
        transaction_type: row.get(5)?,
        description: row.get(6)?,
    })
}

fn map_list_item_row(row: &Row) -> Result<TransactionListItem, rusqlite::Error> {
    Ok(TransactionListItem {
        transaction: map_transaction_row(row)?,
        account_name: row.get(7)?,
        category_name: row.get(8)?,
    })
}

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::{Date, macros::date};

    use crate::{
        Error,
        account::{Account, AccountName, create_account, soft_delete_account},
        auth::UserID,
        category::{Category, CategoryName, NewCategory, create_category},
        test_utils::{get_test_connection, insert_test_user},
        transaction::{NewTransaction, TransactionType, create_transaction},
    };

    use super::{get_account_transactions, get_transaction, get_transactions};

    struct Fixture {
        connection: Connection,
        user_id: UserID,
        account: Account,
        category: Category,
    }

    fn setup() -> Fixture {
        let connection = get_test_connection();
        let user_id = insert_test_user(&connection, "foo@bar.baz", "hunter2");
        let account = create_account(
            user_id,
            AccountName::new_unchecked("Wallet"),
            "",
            date!(2025 - 01 - 01),
            &connection,
        )
        .unwrap();
        let category = create_category(
            user_id,
            NewCategory {
                name: CategoryName::new_unchecked("Food"),
                parent_id: None,
                show_on_stats: true,
            },
            &connection,
        )
        .unwrap();

        Fixture {
            connection,
            user_id,
            account,
            category,
        }
    }

    fn new_transaction(fixture: &Fixture, amount: f64, date: Date) -> NewTransaction {
        NewTransaction {
            account_id: fixture.account.id,
            category_id: fixture.category.id,
            amount,
            date,
            transaction_type: TransactionType::Debit,
            description: "Lunch".to_owned(),
        }
    }

    #[test]
    fn create_succeeds() {
        let fixture = setup();

        let transaction = create_transaction(
            fixture.user_id,
            new_transaction(&fixture, 12.3, date!(2025 - 01 - 05)),
            &fixture.connection,
        )
        .unwrap();

        assert_eq!(transaction.amount, 12.3);
        assert_eq!(transaction.transaction_type, TransactionType::Debit);
        assert_eq!(transaction.description, "Lunch");
    }

    #[test]
    fn create_fails_on_non_positive_amount() {
        let fixture = setup();

        for amount in [0.0, -5.0, f64::NAN] {
            let result = create_transaction(
                fixture.user_id,
                new_transaction(&fixture, amount, date!(2025 - 01 - 05)),
                &fixture.connection,
            );

            assert!(
                matches!(result, Err(Error::NonPositiveAmount(_))),
                "want NonPositiveAmount for {amount}, got {result:?}"
            );
        }
    }

    #[test]
    fn create_fails_on_other_users_category() {
        let fixture = setup();
        let other_user = insert_test_user(&fixture.connection, "other@bar.baz", "hunter2");
        let other_category = create_category(
            other_user,
            NewCategory {
                name: CategoryName::new_unchecked("Theirs"),
                parent_id: None,
                show_on_stats: true,
            },
            &fixture.connection,
        )
        .unwrap();
        let mut transaction = new_transaction(&fixture, 1.0, date!(2025 - 01 - 05));
        transaction.category_id = other_category.id;

        let result = create_transaction(fixture.user_id, transaction, &fixture.connection);

        assert_eq!(result, Err(Error::InvalidCategory(other_category.id)));
    }

    #[test]
    fn create_fails_on_deleted_account() {
        let fixture = setup();
        soft_delete_account(
            fixture.user_id,
            fixture.account.id,
            date!(2025 - 02 - 01),
            &fixture.connection,
        )
        .unwrap();

        let result = create_transaction(
            fixture.user_id,
            new_transaction(&fixture, 1.0, date!(2025 - 01 - 05)),
            &fixture.connection,
        );

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn create_fails_on_other_users_account() {
        let fixture = setup();
        let other_user = insert_test_user(&fixture.connection, "other@bar.baz", "hunter2");

        let result = create_transaction(
            other_user,
            new_transaction(&fixture, 1.0, date!(2025 - 01 - 05)),
            &fixture.connection,
        );

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn transactions_are_listed_newest_first() {
        let fixture = setup();
        let older = create_transaction(
            fixture.user_id,
            new_transaction(&fixture, 1.0, date!(2025 - 01 - 02)),
            &fixture.connection,
        )
        .unwrap();
        let newer = create_transaction(
            fixture.user_id,
            new_transaction(&fixture, 2.0, date!(2025 - 01 - 09)),
            &fixture.connection,
        )
        .unwrap();

        let items = get_transactions(fixture.user_id, &fixture.connection).unwrap();

        let ids: Vec<_> = items.iter().map(|item| item.transaction.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
        assert_eq!(items[0].account_name, "Wallet");
        assert_eq!(items[0].category_name, "Food");
        assert_eq!(
            get_account_transactions(fixture.user_id, fixture.account.id, &fixture.connection)
                .unwrap(),
            items
        );
    }

    #[test]
    fn transactions_of_deleted_accounts_are_hidden() {
        let fixture = setup();
        let transaction = create_transaction(
            fixture.user_id,
            new_transaction(&fixture, 1.0, date!(2025 - 01 - 02)),
            &fixture.connection,
        )
        .unwrap();
        soft_delete_account(
            fixture.user_id,
            fixture.account.id,
            date!(2025 - 02 - 01),
            &fixture.connection,
        )
        .unwrap();

        assert_eq!(
            get_transactions(fixture.user_id, &fixture.connection).unwrap(),
            vec![]
        );
        assert_eq!(
            get_transaction(fixture.user_id, transaction.id, &fixture.connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn get_transaction_of_other_user_is_not_found() {
        let fixture = setup();
        let other_user = insert_test_user(&fixture.connection, "other@bar.baz", "hunter2");
        let transaction = create_transaction(
            fixture.user_id,
            new_transaction(&fixture, 1.0, date!(2025 - 01 - 02)),
            &fixture.connection,
        )
        .unwrap();

        assert_eq!(
            get_transaction(other_user, transaction.id, &fixture.connection),
            Err(Error::NotFound)
        );
        assert_eq!(
            get_transaction(fixture.user_id, transaction.id, &fixture.connection)
                .unwrap()
                .transaction,
            transaction
        );
    }
}
