//! Dashboard HTTP handler and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::UserID,
    dashboard::{
        aggregation::{LabelledValue, flat_category_totals, roll_up_category_totals},
        cards::{count_cards_view, type_total_cards_view},
        charts::{
            DashboardChart, category_totals_chart, charts_script, charts_view, type_counter_chart,
            type_counter_rows,
        },
        date_range::DateRange,
        stats::{DashboardCounts, TypeTotals, get_category_sums, get_counts, get_type_totals},
        tables::{category_totals_table, date_range_caption, date_range_form},
    },
    endpoints,
    html::{HeadElement, base},
    i18n::{Language, Text},
    navigation::NavBar,
    timezone::local_today,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Jakarta".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query string of the dashboard page.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// A date range like "2024-January-01 - 2024-January-31".
    pub dates: Option<String>,
}

/// Holds all the data needed to render the dashboard.
struct DashboardData {
    counts: DashboardCounts,
    charts: [DashboardChart; 2],
    range: DateRange,
    type_totals: TypeTotals,
    range_category_totals: Vec<LabelledValue>,
}

/// Display a page with an overview of the user's data.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
    language: Language,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;
    let range = DateRange::from_query(query.dates.as_deref(), today)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let data = build_dashboard_data(user_id, range, language, &connection)?;

    Ok(dashboard_view(&data, language).into_response())
}

fn build_dashboard_data(
    user_id: UserID,
    range: DateRange,
    language: Language,
    connection: &Connection,
) -> Result<DashboardData, Error> {
    let counts = get_counts(user_id, connection)
        .inspect_err(|error| tracing::error!("Could not count transactions: {error}"))?;
    let category_sums = get_category_sums(user_id, None, connection)
        .inspect_err(|error| tracing::error!("Could not sum categories: {error}"))?;
    let type_totals = get_type_totals(user_id, range, connection).inspect_err(|error| {
        tracing::error!("Could not sum transactions from {} to {}: {error}", range.start, range.end)
    })?;
    let range_category_sums = get_category_sums(user_id, Some(range), connection)
        .inspect_err(|error| {
            tracing::error!("Could not sum categories from {} to {}: {error}", range.start, range.end)
        })?;

    let charts = [
        DashboardChart {
            id: "type-counter-chart",
            options: type_counter_chart(&type_counter_rows(&counts, language), language)
                .to_string(),
        },
        DashboardChart {
            id: "category-totals-chart",
            options: category_totals_chart(&roll_up_category_totals(&category_sums), language)
                .to_string(),
        },
    ];

    Ok(DashboardData {
        counts,
        charts,
        range,
        type_totals,
        range_category_totals: flat_category_totals(&range_category_sums),
    })
}

fn dashboard_view(data: &DashboardData, language: Language) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW, language).into_html();
    let title = language.translate(Text::Dashboard);

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (count_cards_view(&data.counts, language))

            (charts_view(&data.charts))

            section id="totals-by-date" class="w-full space-y-4 mb-8"
            {
                h3 class="text-xl font-semibold" { (language.translate(Text::TotalsByDate)) }

                (date_range_form(data.range, language))
                (date_range_caption(data.range, language))
                (type_total_cards_view(&data.type_totals, language))
                (category_totals_table(&data.range_category_totals, language))
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(&data.charts),
    ];

    base(title, &scripts, &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Query, State},
        http::StatusCode,
    };
    use scraper::{Html, Selector};
    use time::{Duration, OffsetDateTime, macros::date};

    use crate::{
        Error,
        account::{AccountName, create_account},
        auth::UserID,
        category::{CategoryName, NewCategory, create_category},
        i18n::Language,
        test_utils::{
            assert_valid_html, get_response_text, get_test_connection, insert_test_user,
            parse_html_document,
        },
        transaction::{NewTransaction, TransactionType, create_transaction},
    };

    use super::{DashboardQuery, DashboardState, get_dashboard_page};

    fn get_state() -> (DashboardState, UserID) {
        let connection = get_test_connection();
        let user_id = insert_test_user(&connection, "foo@bar.baz", "hunter2");

        (
            DashboardState {
                db_connection: Arc::new(Mutex::new(connection)),
                local_timezone: "Etc/UTC".to_owned(),
            },
            user_id,
        )
    }

    fn seed_transactions(state: &DashboardState, user_id: UserID) {
        let connection = state.db_connection.lock().unwrap();
        let account = create_account(
            user_id,
            AccountName::new_unchecked("Wallet"),
            "",
            date!(2024 - 01 - 01),
            &connection,
        )
        .unwrap();
        let food = create_category(
            user_id,
            NewCategory {
                name: CategoryName::new_unchecked("Food"),
                parent_id: None,
                show_on_stats: true,
            },
            &connection,
        )
        .unwrap();
        let snacks = create_category(
            user_id,
            NewCategory {
                name: CategoryName::new_unchecked("Snacks"),
                parent_id: Some(food.id),
                show_on_stats: true,
            },
            &connection,
        )
        .unwrap();

        for (category_id, amount, date, transaction_type) in [
            (food.id, 10.0, date!(2024 - 01 - 05), TransactionType::Debit),
            (snacks.id, 2.5, date!(2024 - 01 - 20), TransactionType::Debit),
            (food.id, 40.0, date!(2024 - 02 - 01), TransactionType::Credit),
        ] {
            create_transaction(
                user_id,
                NewTransaction {
                    account_id: account.id,
                    category_id,
                    amount,
                    date,
                    transaction_type,
                    description: String::new(),
                },
                &connection,
            )
            .unwrap();
        }
    }

    #[track_caller]
    fn card_text(html: &Html, id: &str) -> String {
        html.select(&Selector::parse(&format!("[data-card={id}] p:last-child")).unwrap())
            .next()
            .unwrap_or_else(|| panic!("No card {id}"))
            .text()
            .collect()
    }

    #[track_caller]
    fn range_table_rows(html: &Html) -> Vec<String> {
        html.select(&Selector::parse("#range-category-totals tbody tr").unwrap())
            .map(|row| row.text().collect())
            .collect()
    }

    #[tokio::test]
    async fn dashboard_shows_counts_charts_and_range_totals() {
        let (state, user_id) = get_state();
        seed_transactions(&state, user_id);
        let query = DashboardQuery {
            dates: Some("2024-January-01 - 2024-January-31".to_owned()),
        };

        let response = get_dashboard_page(
            State(state),
            Extension(user_id),
            Language::English,
            Query(query),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        assert_eq!(card_text(&html, "account-count"), "1");
        assert_eq!(card_text(&html, "transaction-count"), "3");
        assert_eq!(card_text(&html, "credit-count"), "1");
        assert_eq!(card_text(&html, "debit-count"), "2");

        for chart_id in ["type-counter-chart", "category-totals-chart"] {
            let selector = Selector::parse(&format!("#{chart_id}")).unwrap();
            assert!(
                html.select(&selector).next().is_some(),
                "Chart with id '{chart_id}' not found"
            );
        }

        assert_eq!(card_text(&html, "credit-total"), "$0.00");
        assert_eq!(card_text(&html, "debit-total"), "$12.50");
        assert_eq!(
            range_table_rows(&html),
            vec!["Food$10.00".to_owned(), "Snacks$2.50".to_owned()]
        );
    }

    #[tokio::test]
    async fn default_range_is_month_to_date() {
        let (state, user_id) = get_state();
        let today = OffsetDateTime::now_utc().date();
        {
            let connection = state.db_connection.lock().unwrap();
            let account = create_account(
                user_id,
                AccountName::new_unchecked("Wallet"),
                "",
                today,
                &connection,
            )
            .unwrap();
            let food = create_category(
                user_id,
                NewCategory {
                    name: CategoryName::new_unchecked("Food"),
                    parent_id: None,
                    show_on_stats: true,
                },
                &connection,
            )
            .unwrap();
            for (amount, date) in [(3.0, today), (50.0, today - Duration::days(40))] {
                create_transaction(
                    user_id,
                    NewTransaction {
                        account_id: account.id,
                        category_id: food.id,
                        amount,
                        date,
                        transaction_type: TransactionType::Credit,
                        description: String::new(),
                    },
                    &connection,
                )
                .unwrap();
            }
        }

        let response = get_dashboard_page(
            State(state),
            Extension(user_id),
            Language::English,
            Query(DashboardQuery::default()),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(card_text(&html, "credit-total"), "$3.00");
    }

    #[tokio::test]
    async fn user_without_transactions_gets_empty_tables() {
        let (state, user_id) = get_state();

        let response = get_dashboard_page(
            State(state),
            Extension(user_id),
            Language::Indonesian,
            Query(DashboardQuery::default()),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(card_text(&html, "transaction-count"), "0");
        assert_eq!(
            range_table_rows(&html),
            vec!["Tidak ada data untuk periode ini.".to_owned()]
        );
    }

    #[tokio::test]
    async fn malformed_range_is_ignored_and_bad_dates_are_rejected() {
        let (state, user_id) = get_state();

        let ignored = get_dashboard_page(
            State(state.clone()),
            Extension(user_id),
            Language::English,
            Query(DashboardQuery {
                dates: Some("whenever".to_owned()),
            }),
        )
        .await;
        let rejected = get_dashboard_page(
            State(state),
            Extension(user_id),
            Language::English,
            Query(DashboardQuery {
                dates: Some("yesterday - today".to_owned()),
            }),
        )
        .await;

        assert!(ignored.is_ok());
        assert_eq!(
            rejected.unwrap_err(),
            Error::InvalidDateRange("yesterday - today".to_owned())
        );
    }

    #[tokio::test]
    async fn category_names_cannot_break_out_of_chart_script() {
        let (state, user_id) = get_state();
        let today = OffsetDateTime::now_utc().date();
        {
            let connection = state.db_connection.lock().unwrap();
            let account = create_account(
                user_id,
                AccountName::new_unchecked("Wallet"),
                "",
                today,
                &connection,
            )
            .unwrap();
            let category = create_category(
                user_id,
                NewCategory {
                    name: CategoryName::new_unchecked("</script><script>alert(1)</script>"),
                    parent_id: None,
                    show_on_stats: true,
                },
                &connection,
            )
            .unwrap();
            create_transaction(
                user_id,
                NewTransaction {
                    account_id: account.id,
                    category_id: category.id,
                    amount: 5.0,
                    date: today,
                    transaction_type: TransactionType::Debit,
                    description: String::new(),
                },
                &connection,
            )
            .unwrap();
        }

        let response = get_dashboard_page(
            State(state),
            Extension(user_id),
            Language::English,
            Query(DashboardQuery::default()),
        )
        .await
        .unwrap();

        let body = get_response_text(response).await;
        assert!(!body.contains("<script>alert(1)"), "{body}");
        assert!(body.contains(r"\u003cscript\u003ealert(1)"));
        // The range table is rendered by maud, which escapes the name itself.
        assert!(body.contains("&lt;/script&gt;&lt;script&gt;alert(1)"));
    }

    #[tokio::test]
    async fn hidden_parent_keeps_visible_child_in_range_table() {
        let (state, user_id) = get_state();
        {
            let connection = state.db_connection.lock().unwrap();
            let account = create_account(
                user_id,
                AccountName::new_unchecked("Wallet"),
                "",
                date!(2024 - 01 - 01),
                &connection,
            )
            .unwrap();
            let transfers = create_category(
                user_id,
                NewCategory {
                    name: CategoryName::new_unchecked("Transfers"),
                    parent_id: None,
                    show_on_stats: false,
                },
                &connection,
            )
            .unwrap();
            let savings = create_category(
                user_id,
                NewCategory {
                    name: CategoryName::new_unchecked("Savings"),
                    parent_id: Some(transfers.id),
                    show_on_stats: true,
                },
                &connection,
            )
            .unwrap();
            for (category_id, amount) in [(transfers.id, 99.0), (savings.id, 20.0)] {
                create_transaction(
                    user_id,
                    NewTransaction {
                        account_id: account.id,
                        category_id,
                        amount,
                        date: date!(2024 - 01 - 10),
                        transaction_type: TransactionType::Credit,
                        description: String::new(),
                    },
                    &connection,
                )
                .unwrap();
            }
        }

        let response = get_dashboard_page(
            State(state),
            Extension(user_id),
            Language::English,
            Query(DashboardQuery {
                dates: Some("2024-January-01 - 2024-January-31".to_owned()),
            }),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(range_table_rows(&html), vec!["Savings$20.00".to_owned()]);
        assert_eq!(card_text(&html, "credit-total"), "$20.00");
        assert_eq!(card_text(&html, "transaction-count"), "1");
    }
}
