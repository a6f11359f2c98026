//! Categories for grouping transactions, nested at most one level deep.

mod create;
mod db;
mod domain;
mod edit;
mod form;
mod list;

pub use create::{create_category_endpoint, get_new_category_page};
pub use db::{create_category, create_category_table, get_all_categories, get_category};
pub use domain::{Category, CategoryId, CategoryName, NewCategory};
pub use edit::{get_edit_category_page, update_category_endpoint};
pub use list::get_categories_page;
