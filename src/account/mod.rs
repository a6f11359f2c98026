//! Accounts hold the user's transactions and can be moved to a trash before being deleted.

mod accounts_page;
mod core;
mod create;
mod delete;
mod edit;
mod form;
mod show_page;

pub use accounts_page::get_accounts_page;
pub use core::{
    Account, AccountBalance, AccountId, AccountName, count_active_accounts, create_account,
    create_account_table, get_accounts_with_balances, get_active_account, soft_delete_account,
};
pub use create::{create_account_endpoint, get_new_account_page};
pub use delete::{
    delete_account_endpoint, delete_account_permanently_endpoint, restore_account_endpoint,
};
pub use edit::{get_edit_account_page, update_account_endpoint};
pub use show_page::get_account_page;
