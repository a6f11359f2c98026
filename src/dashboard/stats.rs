//! Database queries for the dashboard figures.
//!
//! Only transactions of active accounts are counted, and only categories
//! marked `show_on_stats` contribute to the figures.

use rusqlite::{Connection, Row, params};

use crate::{
    Error,
    account::count_active_accounts,
    auth::UserID,
    category::CategoryId,
    dashboard::date_range::DateRange,
};

/// How many accounts and transactions the user has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(super) struct DashboardCounts {
    pub account_count: u64,
    pub transaction_count: u64,
    pub credit_count: u64,
    pub debit_count: u64,
}

/// The summed transaction amounts of a category shown on the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct CategorySum {
    pub id: CategoryId,
    pub name: String,
    pub parent_id: Option<CategoryId>,
    pub total: f64,
}

/// Credit and debit totals within a date range.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(super) struct TypeTotals {
    pub credit: f64,
    pub debit: f64,
}

pub(super) fn get_counts(user_id: UserID, connection: &Connection) -> Result<DashboardCounts, Error> {
    let account_count = count_active_accounts(user_id, connection)?;

    let (transaction_count, credit_count, debit_count) = connection.query_row(
        "SELECT
            COUNT(*),
            COALESCE(SUM(t.type = 'cr'), 0),
            COALESCE(SUM(t.type = 'db'), 0)
        FROM \"transaction\" t
        INNER JOIN account a ON a.id = t.account_id
        INNER JOIN category c ON c.id = t.category_id
        WHERE a.user_id = ?1 AND a.deleted_at IS NULL AND c.show_on_stats = 1",
        [user_id.as_i64()],
        |row| Ok((get_count(row, 0)?, get_count(row, 1)?, get_count(row, 2)?)),
    )?;

    Ok(DashboardCounts {
        account_count,
        transaction_count,
        credit_count,
        debit_count,
    })
}

fn get_count(row: &Row, index: usize) -> Result<u64, rusqlite::Error> {
    let count: i64 = row.get(index)?;

    u64::try_from(count).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(index, count))
}

/// Sum the amounts of each `show_on_stats` category, optionally within `range`.
///
/// Categories without transactions are included with a total of zero.
pub(super) fn get_category_sums(
    user_id: UserID,
    range: Option<DateRange>,
    connection: &Connection,
) -> Result<Vec<CategorySum>, Error> {
    let (start, end) = match range {
        Some(range) => (Some(range.start), Some(range.end)),
        None => (None, None),
    };

    connection
        .prepare(
            "SELECT c.id, c.name, c.parent_id, COALESCE(s.total, 0.0)
            FROM category c
            LEFT JOIN (
                SELECT t.category_id, SUM(t.amount) AS total
                FROM \"transaction\" t
                INNER JOIN account a ON a.id = t.account_id
                WHERE a.user_id = ?1 AND a.deleted_at IS NULL
                    AND (?2 IS NULL OR t.date >= ?2)
                    AND (?3 IS NULL OR t.date <= ?3)
                GROUP BY t.category_id
            ) s ON s.category_id = c.id
            WHERE c.user_id = ?1 AND c.show_on_stats = 1
            ORDER BY c.name ASC",
        )?
        .query_map(params![user_id.as_i64(), start, end], |row| {
            Ok(CategorySum {
                id: row.get(0)?,
                name: row.get(1)?,
                parent_id: row.get(2)?,
                total: row.get(3)?,
            })
        })?
        .map(|maybe_sum| maybe_sum.map_err(Error::from))
        .collect()
}

/// Sum credits and debits dated within `range`, inclusive.
pub(super) fn get_type_totals(
    user_id: UserID,
    range: DateRange,
    connection: &Connection,
) -> Result<TypeTotals, Error> {
    connection
        .query_row(
            "SELECT
                COALESCE(SUM(CASE WHEN t.type = 'cr' THEN t.amount END), 0.0),
                COALESCE(SUM(CASE WHEN t.type = 'db' THEN t.amount END), 0.0)
            FROM \"transaction\" t
            INNER JOIN account a ON a.id = t.account_id
            INNER JOIN category c ON c.id = t.category_id
            WHERE a.user_id = ?1 AND a.deleted_at IS NULL AND c.show_on_stats = 1
                AND t.date BETWEEN ?2 AND ?3",
            params![user_id.as_i64(), range.start, range.end],
            |row| {
                Ok(TypeTotals {
                    credit: row.get(0)?,
                    debit: row.get(1)?,
                })
            },
        )
        .map_err(Error::from)
}
