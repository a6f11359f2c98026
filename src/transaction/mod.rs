//! Credit and debit transactions recorded against accounts.
//!
//! This module contains:
//! - The `Transaction` model and the `TransactionType` stored as "cr" or "db"
//! - Database functions for recording and querying transactions
//! - The pages for adding, listing and viewing transactions

mod create;
mod db;
mod detail;
mod domain;
mod list;
mod table;

pub use create::{create_transaction_endpoint, get_create_transaction_page};
pub use db::{
    create_transaction, create_transaction_table, get_account_transactions, get_transaction,
    get_transactions,
};
pub use detail::get_transaction_detail_page;
pub use domain::{
    NewTransaction, Transaction, TransactionForm, TransactionId, TransactionListItem,
    TransactionType,
};
pub use list::get_transactions_page;
pub(crate) use table::transactions_table;
