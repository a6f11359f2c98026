//! Categories listing page.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    category::{Category, CategoryId, db::get_all_categories},
    endpoints,
    html::{
        BADGE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base,
    },
    i18n::{Language, Text},
    navigation::NavBar,
};

/// The state needed for the categories listing page.
#[derive(Debug, Clone)]
pub struct CategoriesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoriesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A category ready for display, either a top-level category or one nested under it.
#[derive(Debug, Clone, PartialEq)]
struct CategoryRow {
    category: Category,
    is_child: bool,
    transaction_count: u32,
    edit_url: String,
}

/// Render the categories page with each child listed under its parent.
pub async fn get_categories_page(
    State(state): State<CategoriesPageState>,
    Extension(user_id): Extension<UserID>,
    language: Language,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_all_categories(user_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    let transactions_per_category = count_transactions_per_category(user_id, &connection)
        .inspect_err(|error| {
            tracing::error!("Could not count transactions per category: {error}")
        })?;

    let rows = group_by_parent(categories, &transactions_per_category);

    Ok(categories_view(&rows, language).into_response())
}

fn count_transactions_per_category(
    user_id: UserID,
    connection: &Connection,
) -> Result<HashMap<CategoryId, u32>, Error> {
    let result: Result<HashMap<CategoryId, u32>, rusqlite::Error> = connection
        .prepare(
            "SELECT t.category_id, COUNT(1) FROM \"transaction\" t
            INNER JOIN account a ON a.id = t.account_id
            WHERE a.user_id = ?1 AND a.deleted_at IS NULL
            GROUP BY t.category_id",
        )?
        .query_map([user_id.as_i64()], |row| {
            let category_id = row.get(0)?;
            let count = row.get(1)?;

            Ok((category_id, count))
        })?
        .collect();

    result.map_err(Error::from)
}

/// Order `categories` so that each top-level category is directly followed by its children.
///
/// Both levels keep the order of `categories`.
fn group_by_parent(
    categories: Vec<Category>,
    transactions_per_category: &HashMap<CategoryId, u32>,
) -> Vec<CategoryRow> {
    let (parents, children): (Vec<_>, Vec<_>) = categories
        .into_iter()
        .partition(|category| category.parent_id.is_none());

    let to_row = |category: Category, is_child: bool| CategoryRow {
        edit_url: endpoints::format_endpoint(endpoints::EDIT_CATEGORY_VIEW, category.id),
        transaction_count: *transactions_per_category.get(&category.id).unwrap_or(&0),
        category,
        is_child,
    };

    let mut rows = Vec::with_capacity(parents.len() + children.len());

    for parent in parents {
        let parent_id = parent.id;
        rows.push(to_row(parent, false));

        for child in children
            .iter()
            .filter(|child| child.parent_id == Some(parent_id))
        {
            rows.push(to_row(child.clone(), true));
        }
    }

    rows
}

fn categories_view(rows: &[CategoryRow], language: Language) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATEGORIES, language).into_html();

    let table_row = |row: &CategoryRow| {
        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    @if row.is_child {
                        span class="ps-6 text-gray-500 dark:text-gray-400" { "↳ " }
                    }

                    (row.category.name)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    @if row.category.show_on_stats {
                        span class=(BADGE_STYLE) data-show-on-stats="true" { "Shown on stats" }
                    } @else {
                        span class="text-xs text-gray-500 dark:text-gray-400" { "Hidden" }
                    }
                }

                td class=(TABLE_CELL_STYLE) { (row.transaction_count) }

                td class=(TABLE_CELL_STYLE)
                {
                    a href=(row.edit_url) class=(LINK_STYLE) { "Edit" }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { (language.translate(Text::Categories)) }

                    a href=(endpoints::NEW_CATEGORY_VIEW) class=(LINK_STYLE)
                    {
                        "Create Category"
                    }
                }

                div class="dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Dashboard" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Transactions" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for row in rows {
                                (table_row(row))
                            }

                            @if rows.is_empty() {
                                tr
                                {
                                    td colspan="4" class="px-6 py-4 text-center"
                                    {
                                        "No categories yet. "
                                        a href=(endpoints::NEW_CATEGORY_VIEW) class=(LINK_STYLE)
                                        {
                                            "Create one"
                                        }
                                        " to start organising your transactions."
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Categories", &[], &content)
}
