//! Category editing page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    category::{
        CategoryId, get_category,
        db::{get_all_categories, update_category},
        domain::CategoryFormData,
        form::{CategoryFormTarget, CategoryFormValues, category_form, parent_options},
    },
    endpoints,
    html::{FORM_CONTAINER_STYLE, base},
    i18n::Language,
    navigation::NavBar,
};

/// The state needed for the edit category page and the update endpoint.
#[derive(Debug, Clone)]
pub struct EditCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the category editing page.
pub async fn get_edit_category_page(
    Path(category_id): Path<CategoryId>,
    State(state): State<EditCategoryState>,
    Extension(user_id): Extension<UserID>,
    language: Language,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let category = get_category(user_id, category_id, &connection)?;
    let categories = get_all_categories(user_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_CATEGORY_VIEW, category_id);
    let update_endpoint = endpoints::format_endpoint(endpoints::CATEGORY, category_id);
    let values = CategoryFormValues {
        name: category.name.as_ref(),
        parent_id: category.parent_id,
        show_on_stats: category.show_on_stats,
    };
    let form = category_form(
        CategoryFormTarget::Update(&update_endpoint),
        &values,
        &parent_options(&categories, Some(category_id)),
        "",
    );

    Ok(edit_category_view(&edit_endpoint, &form, language).into_response())
}

/// Handle category update form submission.
pub async fn update_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<EditCategoryState>,
    Extension(user_id): Extension<UserID>,
    Form(form_data): Form<CategoryFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let new_category = match form_data.to_new_category() {
        Ok(new_category) => new_category,
        Err(error) => {
            let parents = match get_all_categories(user_id, &connection) {
                Ok(categories) => parent_options(&categories, Some(category_id)),
                Err(error) => return error.into_alert_response(),
            };
            let update_endpoint = endpoints::format_endpoint(endpoints::CATEGORY, category_id);
            let values = CategoryFormValues {
                name: &form_data.name,
                parent_id: form_data.parent_id,
                show_on_stats: form_data.show_on_stats.is_some(),
            };

            return category_form(
                CategoryFormTarget::Update(&update_endpoint),
                &values,
                &parents,
                &format!("Error: {error}"),
            )
            .into_response();
        }
    };

    match update_category(user_id, category_id, new_category, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::CATEGORIES.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not update category {category_id}: {error}");
            error.into_alert_response()
        }
    }
}

fn edit_category_view(edit_endpoint: &str, form: &Markup, language: Language) -> Markup {
    let nav_bar = NavBar::new(edit_endpoint, language).into_html();

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Edit Category", &[], &content)
}
