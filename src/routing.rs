//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    account::{
        create_account_endpoint, delete_account_endpoint, delete_account_permanently_endpoint,
        get_account_page, get_accounts_page, get_edit_account_page, get_new_account_page,
        restore_account_endpoint, update_account_endpoint,
    },
    auth::{
        auth_guard, auth_guard_hx, get_forgot_password_page, get_log_in_page, get_log_out,
        get_register_page, post_log_in, register_user,
    },
    category::{
        create_category_endpoint, get_categories_page, get_edit_category_page,
        get_new_category_page, update_category_endpoint,
    },
    dashboard::get_dashboard_page,
    endpoints,
    i18n::switch_language,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    transaction::{
        create_transaction_endpoint, get_create_transaction_page, get_transaction_detail_page,
        get_transactions_page,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::LOG_IN, get(get_log_in_page).post(post_log_in))
        .route(endpoints::REGISTER, get(get_register_page).post(register_user))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(
            endpoints::FORGOT_PASSWORD_VIEW,
            get(get_forgot_password_page),
        )
        .route(endpoints::SWITCH_LANGUAGE, get(switch_language))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::ACCOUNTS, get(get_accounts_page))
        .route(endpoints::NEW_ACCOUNT_VIEW, get(get_new_account_page))
        .route(endpoints::ACCOUNT, get(get_account_page))
        .route(endpoints::EDIT_ACCOUNT_VIEW, get(get_edit_account_page))
        .route(endpoints::RESTORE_ACCOUNT, get(restore_account_endpoint))
        .route(endpoints::ADD_TRANSACTION, get(get_create_transaction_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(
            endpoints::TRANSACTION_DETAIL_VIEW,
            get(get_transaction_detail_page),
        )
        .route(endpoints::CATEGORIES, get(get_categories_page))
        .route(endpoints::NEW_CATEGORY_VIEW, get(get_new_category_page))
        .route(endpoints::EDIT_CATEGORY_VIEW, get(get_edit_category_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These POST/PUT/DELETE routes need to use the HX-REDIRECT header for auth redirects to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::ACCOUNTS, post(create_account_endpoint))
            .route(
                endpoints::ACCOUNT,
                put(update_account_endpoint).delete(delete_account_endpoint),
            )
            .route(
                endpoints::DELETE_ACCOUNT_PERMANENTLY,
                delete(delete_account_permanently_endpoint),
            )
            .route(
                endpoints::ADD_TRANSACTION,
                post(create_transaction_endpoint),
            )
            .route(endpoints::CATEGORIES, post(create_category_endpoint))
            .route(endpoints::CATEGORY, put(update_category_endpoint))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' sends visitors to the log-in page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::LOG_IN)
}
