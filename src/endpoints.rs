//! The endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/account/{account_id}', use [format_endpoint].

/// The root route which redirects to the log in page.
pub const ROOT: &str = "/";
/// The landing page for logged in users.
pub const DASHBOARD_VIEW: &str = "/home";
/// The route for getting the log in page and logging in.
pub const LOG_IN: &str = "/login";
/// The route for getting the registration page and registering a new user.
pub const REGISTER: &str = "/register";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/logout";
/// The route for instructions for resetting the user's password.
pub const FORGOT_PASSWORD_VIEW: &str = "/password/reset";
/// The route for switching the display language.
pub const SWITCH_LANGUAGE: &str = "/lang/{lang}";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The page listing the user's accounts, and the route for creating an account.
pub const ACCOUNTS: &str = "/account";
/// The page for creating a new account.
pub const NEW_ACCOUNT_VIEW: &str = "/account/create";
/// The page showing a single account, and the route for updating and soft deleting it.
pub const ACCOUNT: &str = "/account/{account_id}";
/// The page for editing an account.
pub const EDIT_ACCOUNT_VIEW: &str = "/account/{account_id}/edit";
/// The route for taking an account out of the trash.
pub const RESTORE_ACCOUNT: &str = "/account/{account_id}/restore";
/// The route for deleting an account and its transactions for good.
pub const DELETE_ACCOUNT_PERMANENTLY: &str = "/account/{account_id}/permanent";
/// The page and route for adding a transaction to an account.
pub const ADD_TRANSACTION: &str = "/account/{account_id}/add";

/// The page listing the user's transactions.
pub const TRANSACTIONS_VIEW: &str = "/transaction";
/// The page showing a single transaction.
pub const TRANSACTION_DETAIL_VIEW: &str = "/transaction/{transaction_id}/detail";

/// The page listing the user's categories, and the route for creating a category.
pub const CATEGORIES: &str = "/category";
/// The page for creating a new category.
pub const NEW_CATEGORY_VIEW: &str = "/category/create";
/// The route for updating a category.
pub const CATEGORY: &str = "/category/{category_id}";
/// The page for editing a category.
pub const EDIT_CATEGORY_VIEW: &str = "/category/{category_id}/edit";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// Assumes that `endpoint_path` contains at most one parameter and that
/// parameters are formatted as `{name}`.
///
/// # Examples
/// ```ignore
/// assert_eq!(format_endpoint("/account/{account_id}", 1), "/account/1");
/// ```
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
