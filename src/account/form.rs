//! The form shared by the account creation and edit pages.

use maud::{Markup, html};
use serde::Deserialize;

use crate::html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE};

/// The form data for creating or editing an account.
#[derive(Debug, Deserialize)]
pub struct AccountFormData {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Where the account form is sent.
pub enum AccountFormTarget<'a> {
    /// POST to the given endpoint to create an account.
    Create(&'a str),
    /// PUT to the given endpoint to update an existing account.
    Update(&'a str),
}

pub fn account_form(
    target: AccountFormTarget<'_>,
    name: &str,
    description: &str,
    error_message: &str,
) -> Markup {
    let (hx_post, hx_put, submit_label) = match target {
        AccountFormTarget::Create(endpoint) => (Some(endpoint), None, "Create Account"),
        AccountFormTarget::Update(endpoint) => (None, Some(endpoint), "Update Account"),
    };

    html! {
        form
            hx-post=[hx_post]
            hx-put=[hx_put]
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label
                    for="name"
                    class=(FORM_LABEL_STYLE)
                {
                    "Account Name"
                }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="Account Name"
                    value=(name)
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label
                    for="description"
                    class=(FORM_LABEL_STYLE)
                {
                    "Description"
                }

                textarea
                    id="description"
                    name="description"
                    rows="3"
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    (description)
                }
            }

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400"
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_label) }
        }
    }
}
