//! Category creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
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
        Category, create_category,
        db::get_all_categories,
        domain::CategoryFormData,
        form::{CategoryFormTarget, CategoryFormValues, category_form, parent_options},
    },
    endpoints,
    html::{FORM_CONTAINER_STYLE, base},
    i18n::Language,
    navigation::NavBar,
};

/// The state needed for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the category creation page.
pub async fn get_new_category_page(
    State(state): State<CreateCategoryState>,
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

    Ok(new_category_view(&parent_options(&categories, None), language).into_response())
}

/// Handle category creation form submission.
pub async fn create_category_endpoint(
    State(state): State<CreateCategoryState>,
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

    let values = CategoryFormValues {
        name: &form_data.name,
        parent_id: form_data.parent_id,
        show_on_stats: form_data.show_on_stats.is_some(),
    };

    let new_category = match form_data.to_new_category() {
        Ok(new_category) => new_category,
        Err(error) => {
            let parents = match get_all_categories(user_id, &connection) {
                Ok(categories) => parent_options(&categories, None),
                Err(error) => return error.into_alert_response(),
            };

            return category_form(
                CategoryFormTarget::Create(endpoints::CATEGORIES),
                &values,
                &parents,
                &format!("Error: {error}"),
            )
            .into_response();
        }
    };

    match create_category(user_id, new_category, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::CATEGORIES.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not create category: {error}");
            error.into_alert_response()
        }
    }
}

fn new_category_view(parents: &[Category], language: Language) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_CATEGORY_VIEW, language).into_html();
    let form = category_form(
        CategoryFormTarget::Create(endpoints::CATEGORIES),
        &CategoryFormValues::default(),
        parents,
        "",
    );

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Create Category", &[], &content)
}

#[cfg(test)]
mod create_category_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Form,
        extract::State,
        http::{StatusCode, header::CONTENT_TYPE},
    };

    use crate::{
        auth::UserID,
        category::{
            CategoryName, NewCategory, create_category,
            create::{CreateCategoryState, create_category_endpoint, get_new_category_page},
            db::get_all_categories,
            domain::CategoryFormData,
        },
        endpoints,
        i18n::Language,
        test_utils::{
            assert_form_error_message, assert_form_select, assert_hx_endpoint, assert_hx_redirect,
            assert_valid_html, get_header, get_test_connection, insert_test_user, must_get_form,
            parse_html_document, parse_html_fragment,
        },
    };

    fn get_state() -> (CreateCategoryState, UserID) {
        let connection = get_test_connection();
        let user_id = insert_test_user(&connection, "foo@bar.baz", "hunter2");

        (
            CreateCategoryState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            user_id,
        )
    }

    #[tokio::test]
    async fn render_page_lists_top_level_parents() {
        let (state, user_id) = get_state();
        {
            let connection = state.db_connection.lock().unwrap();
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
            create_category(
                user_id,
                NewCategory {
                    name: CategoryName::new_unchecked("Snacks"),
                    parent_id: Some(food.id),
                    show_on_stats: true,
                },
                &connection,
            )
            .unwrap();
        }

        let response = get_new_category_page(State(state), Extension(user_id), Language::English)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::CATEGORIES, "hx-post");
        assert_form_select(&form, "parent_id", &["None", "Food"]);
    }

    #[tokio::test]
    async fn can_create_category() {
        let (state, user_id) = get_state();
        let form = CategoryFormData {
            name: "Food".to_owned(),
            parent_id: None,
            show_on_stats: Some("on".to_owned()),
        };

        let response =
            create_category_endpoint(State(state.clone()), Extension(user_id), Form(form)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::CATEGORIES);
        let categories =
            get_all_categories(user_id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name.as_ref(), "Food");
        assert!(categories[0].show_on_stats);
    }

    #[tokio::test]
    async fn create_category_fails_on_empty_name() {
        let (state, user_id) = get_state();
        let form = CategoryFormData {
            name: " ".to_owned(),
            parent_id: None,
            show_on_stats: None,
        };

        let response = create_category_endpoint(State(state), Extension(user_id), Form(form)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            get_header(&response, CONTENT_TYPE.as_str()),
            "text/html; charset=utf-8"
        );
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Error: Category name cannot be empty");
    }

    #[tokio::test]
    async fn create_category_fails_on_invalid_parent() {
        let (state, user_id) = get_state();
        let form = CategoryFormData {
            name: "Snacks".to_owned(),
            parent_id: Some(99),
            show_on_stats: None,
        };

        let response = create_category_endpoint(State(state), Extension(user_id), Form(form)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
