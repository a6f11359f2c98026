//! The form shared by the category creation and edit pages.

use maud::{Markup, html};

use crate::{
    category::{Category, CategoryId},
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
};

/// Where the category form is sent.
pub enum CategoryFormTarget<'a> {
    /// POST to the given endpoint to create a category.
    Create(&'a str),
    /// PUT to the given endpoint to update an existing category.
    Update(&'a str),
}

/// The values to prefill the category form with.
pub struct CategoryFormValues<'a> {
    pub name: &'a str,
    pub parent_id: Option<CategoryId>,
    pub show_on_stats: bool,
}

impl Default for CategoryFormValues<'_> {
    fn default() -> Self {
        Self {
            name: "",
            parent_id: None,
            show_on_stats: true,
        }
    }
}

/// The top-level categories that `category_id` may be nested under.
pub fn parent_options(categories: &[Category], category_id: Option<CategoryId>) -> Vec<Category> {
    categories
        .iter()
        .filter(|category| category.parent_id.is_none() && Some(category.id) != category_id)
        .cloned()
        .collect()
}

pub fn category_form(
    target: CategoryFormTarget<'_>,
    values: &CategoryFormValues<'_>,
    parents: &[Category],
    error_message: &str,
) -> Markup {
    let (hx_post, hx_put, submit_label) = match target {
        CategoryFormTarget::Create(endpoint) => (Some(endpoint), None, "Create Category"),
        CategoryFormTarget::Update(endpoint) => (None, Some(endpoint), "Update Category"),
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
                    "Category Name"
                }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="Category Name"
                    value=(values.name)
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label
                    for="parent_id"
                    class=(FORM_LABEL_STYLE)
                {
                    "Parent Category"
                }

                select
                    id="parent_id"
                    name="parent_id"
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" selected[values.parent_id.is_none()] { "None" }

                    @for parent in parents {
                        option
                            value=(parent.id)
                            selected[values.parent_id == Some(parent.id)]
                        {
                            (parent.name)
                        }
                    }
                }
            }

            div class="flex items-center gap-2"
            {
                input
                    id="show_on_stats"
                    type="checkbox"
                    name="show_on_stats"
                    checked[values.show_on_stats]
                    class="w-4 h-4 rounded";

                label
                    for="show_on_stats"
                    class="text-sm font-medium text-gray-900 dark:text-white"
                {
                    "Show on dashboard"
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

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::{
        category::{Category, CategoryName},
        test_utils::{
            assert_form_error_message, assert_form_input, assert_form_select,
            assert_form_submit_button, assert_hx_endpoint, assert_valid_html, must_get_form,
        },
    };

    use super::{CategoryFormTarget, CategoryFormValues, category_form, parent_options};

    fn category(id: i64, name: &str, parent_id: Option<i64>) -> Category {
        Category {
            id,
            name: CategoryName::new_unchecked(name),
            parent_id,
            show_on_stats: true,
        }
    }

    #[test]
    fn parent_options_excludes_children_and_self() {
        let categories = vec![
            category(1, "Food", None),
            category(2, "Snacks", Some(1)),
            category(3, "Transport", None),
        ];

        let options = parent_options(&categories, Some(3));

        assert_eq!(options, vec![category(1, "Food", None)]);
    }

    #[test]
    fn create_form_has_fields() {
        let parents = vec![category(1, "Food", None)];

        let html = category_form(
            CategoryFormTarget::Create("/category"),
            &CategoryFormValues::default(),
            &parents,
            "",
        );

        let html = Html::parse_fragment(&html.into_string());
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, "/category", "hx-post");
        assert_form_input(&form, "name", "text");
        assert_form_select(&form, "parent_id", &["None", "Food"]);
        assert_form_submit_button(&form);

        let checkbox = form
            .select(&Selector::parse("input[name='show_on_stats']").unwrap())
            .next()
            .expect("No show_on_stats checkbox");
        assert!(checkbox.value().attr("checked").is_some());
    }

    #[test]
    fn update_form_selects_parent_and_shows_error() {
        let parents = vec![category(1, "Food", None), category(3, "Transport", None)];
        let values = CategoryFormValues {
            name: "Bus",
            parent_id: Some(3),
            show_on_stats: false,
        };

        let html = category_form(
            CategoryFormTarget::Update("/category/4"),
            &values,
            &parents,
            "Error: Category name cannot be empty",
        );

        let html = Html::parse_fragment(&html.into_string());
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, "/category/4", "hx-put");
        assert!(form.value().attr("hx-post").is_none());
        assert_form_error_message(&form, "Error: Category name cannot be empty");

        let selected = form
            .select(&Selector::parse("option[selected]").unwrap())
            .map(|option| option.text().collect::<String>())
            .collect::<Vec<_>>();
        assert_eq!(selected, vec!["Transport"]);

        let checkbox = form
            .select(&Selector::parse("input[name='show_on_stats']").unwrap())
            .next()
            .unwrap();
        assert!(checkbox.value().attr("checked").is_none());
    }
}
