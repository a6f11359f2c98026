//! The page explaining how to reset a forgotten password.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

use crate::{
    endpoints,
    html::{LINK_STYLE, base, log_in_register},
};

fn forgot_password_content() -> Markup {
    let instructions = html! {
        div class="space-y-4 text-gray-900 dark:text-white"
        {
            p class="text-justify"
            {
                "Passwords are reset by whoever runs this server. From the
                directory the server runs in, they can run:"
            }

            pre class="p-2 rounded bg-gray-100 dark:bg-gray-700 text-sm overflow-x-auto"
            {
                code { "reset_password --db-path <database file> --email <your e-mail>" }
            }

            p class="text-justify"
            {
                "The program asks for the new password and then you can log in with it."
            }

            a href=(endpoints::LOG_IN) class=(LINK_STYLE) { "Back to log in" }
        }
    };

    log_in_register("Forgot your password?", &instructions)
}

/// Renders a page describing how the user's password can be reset.
pub async fn get_forgot_password_page() -> Response {
    base("Forgot Password", &[], &forgot_password_content()).into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use scraper::Selector;

    use crate::{
        endpoints,
        test_utils::{assert_valid_html, parse_html_document},
    };

    use super::get_forgot_password_page;

    #[tokio::test]
    async fn page_explains_reset_and_links_back() {
        let response = get_forgot_password_page().await;

        assert_eq!(response.status(), StatusCode::OK);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let code = document
            .select(&Selector::parse("code").unwrap())
            .next()
            .expect("No code block found")
            .text()
            .collect::<String>();
        assert!(code.starts_with("reset_password"));

        let link = document
            .select(&Selector::parse("a[href]").unwrap())
            .find(|link| link.value().attr("href") == Some(endpoints::LOG_IN));
        assert!(link.is_some(), "want link back to the log-in page");
    }
}
