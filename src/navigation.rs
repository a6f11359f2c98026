//! This file defines the templates and a convenience function for creating the navigation bar.

use maud::{Markup, html};

use crate::{
    endpoints,
    i18n::{Language, Text},
};

/// Template for a link in the navigation bar.
///
/// It will change appearance if `is_current` is set to
/// `true`. Only one link should be set as active at any one time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_desktop_html(self) -> Markup {
        let style = if self.is_current {
            "block py-2 px-3 text-white bg-blue-700 rounded-sm lg:bg-transparent
        lg:text-blue-700 lg:p-0 dark:text-white lg:dark:text-blue-500"
        } else {
            "block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100
        lg:hover:bg-transparent lg:border-0 lg:hover:text-blue-700 lg:p-0
        dark:text-white lg:dark:hover:text-blue-500 dark:hover:bg-gray-700
        dark:hover:text-white lg:dark:hover:bg-transparent"
        };

        html!( a href=(self.url) class=(style) { (self.title) } )
    }
}

pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
    language: Language,
}

impl NavBar<'_> {
    /// Get the navigation bar with the link titles in `language`.
    ///
    /// If a link matches `active_endpoint`, then that link will be
    /// marked as active and displayed differently in the HTML.
    pub fn new(active_endpoint: &str, language: Language) -> NavBar<'_> {
        let link = |url: &'static str, text: Text| Link {
            url,
            title: language.translate(text),
            is_current: active_endpoint == url,
        };

        let links = vec![
            link(endpoints::DASHBOARD_VIEW, Text::Dashboard),
            link(endpoints::TRANSACTIONS_VIEW, Text::Transactions),
            link(endpoints::ACCOUNTS, Text::Accounts),
            link(endpoints::CATEGORIES, Text::Categories),
            Link {
                url: endpoints::LOG_OUT,
                title: language.translate(Text::LogOut),
                is_current: false,
            },
        ];

        NavBar { links, language }
    }

    pub fn into_html(self) -> Markup {
        let links = self.links;
        let language = self.language;
        let in_more_menu =
            |url: &str| url == endpoints::CATEGORIES || url == endpoints::LOG_OUT;
        let more_is_active = links
            .iter()
            .any(|link| link.url == endpoints::CATEGORIES && link.is_current);
        let bottom_link_class = |is_current: bool| -> &'static str {
            if is_current {
                "flex w-full min-w-0 items-center justify-center rounded-lg \
                bg-blue-50 px-2.5 py-2 text-xs font-semibold leading-tight \
                text-blue-700 shadow-sm sm:px-4 sm:text-sm \
                dark:bg-blue-900/30 dark:text-blue-200"
            } else {
                "flex w-full min-w-0 items-center justify-center rounded-lg \
                px-2.5 py-2 text-xs font-semibold leading-tight text-gray-600 \
                sm:px-4 sm:text-sm \
                hover:bg-blue-50/70 hover:text-blue-700 dark:text-gray-300 \
                dark:hover:bg-blue-900/20 dark:hover:text-blue-200"
            }
        };
        let more_summary_class = if more_is_active {
            "list-none [&::-webkit-details-marker]:hidden flex w-full min-w-0 \
            items-center justify-center rounded-lg bg-blue-50 px-2.5 py-2 \
            text-xs font-semibold leading-tight sm:px-4 sm:text-sm \
            text-blue-700 shadow-sm cursor-pointer \
            dark:bg-blue-900/30 dark:text-blue-200"
        } else {
            "list-none [&::-webkit-details-marker]:hidden flex w-full min-w-0 \
            items-center justify-center rounded-lg px-2.5 py-2 text-xs \
            font-semibold leading-tight sm:px-4 sm:text-sm \
            text-gray-600 cursor-pointer hover:bg-blue-50/70 hover:text-blue-700 \
            dark:text-gray-300 dark:hover:bg-blue-900/20 \
            dark:hover:text-blue-200"
        };
        let more_item_class = |is_current: bool| -> &'static str {
            if is_current {
                "block rounded-lg bg-blue-50 px-3 py-2 text-blue-700 \
                dark:bg-blue-900/30 dark:text-blue-200"
            } else {
                "block rounded-lg px-3 py-2 text-gray-700 hover:bg-gray-100 \
                hover:text-blue-700 dark:text-gray-200 dark:hover:bg-gray-800/80 \
                dark:hover:text-blue-200"
            }
        };

        // Template adapted from https://flowbite.com/docs/components/navbar/#default-navbar
        html!(
            nav class="bg-white border-gray-200 dark:bg-gray-900"
            {
                div
                    class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a
                        href=(endpoints::DASHBOARD_VIEW)
                        class="flex items-center space-x-3 rtl:space-x-reverse"
                    {
                        span
                            class="self-center text-2xl font-semibold whitespace-nowrap dark:text-white"
                        {
                            "Cashbook"
                        }
                    }

                    div class="hidden w-full lg:flex lg:w-auto lg:items-center lg:gap-8"
                    {
                        ul
                            class="font-medium flex flex-col p-4 lg:p-0 mt-4
                            border border-gray-100 rounded bg-gray-50
                            lg:flex-row lg:space-x-8 rtl:space-x-reverse lg:mt-0
                            lg:border-0 lg:bg-white dark:bg-gray-800
                            lg:dark:bg-gray-900 dark:border-gray-700"
                        {
                            @for link in links.clone().into_iter() {
                                li { (link.into_desktop_html()) }
                            }
                        }

                        (language_switcher(language))
                    }
                }
            }

            nav class="fixed inset-x-0 bottom-0 z-40 lg:hidden"
            {
                div class="mx-auto max-w-screen-xl px-4 pb-4"
                {
                    div
                        class="rounded-xl border border-gray-200 bg-white/95
                        shadow-lg backdrop-blur dark:border-gray-700 dark:bg-gray-900/95"
                    {
                        ul
                            class="grid grid-cols-4 gap-2 px-4 py-3 text-xs font-semibold
                            text-gray-600 dark:text-gray-300"
                            aria-label="Primary"
                        {
                            @for link in links.iter().filter(|link| !in_more_menu(link.url)) {
                                li class="min-w-0" {
                                    a
                                        href=(link.url)
                                        class=(bottom_link_class(link.is_current))
                                        aria-current=[link.is_current.then_some("page")]
                                    {
                                        span class="truncate" { (link.title) }
                                    }
                                }
                            }

                            li class="min-w-0" {
                                details class="group relative"
                                {
                                    summary
                                        class=(more_summary_class)
                                        aria-current=[more_is_active.then_some("page")]
                                    {
                                        span class="truncate" { "..." }
                                    }

                                    div
                                        class="absolute bottom-full right-0 mb-3 w-40 rounded-xl
                                        border border-gray-200 bg-white/95 p-2 shadow-xl
                                        backdrop-blur dark:border-gray-700 dark:bg-gray-900/95"
                                    {
                                        ul class="flex flex-col gap-1 text-sm font-medium"
                                        {
                                            @for link in links.iter().filter(|link| in_more_menu(link.url)) {
                                                li {
                                                    a
                                                        href=(link.url)
                                                        class=(more_item_class(link.is_current))
                                                        aria-current=[link.is_current.then_some("page")]
                                                    {
                                                        (link.title)
                                                    }
                                                }
                                            }

                                            li class="px-3 py-2" { (language_switcher(language)) }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        )
    }
}

/// Links for switching between the supported languages, the current one in bold.
fn language_switcher(current: Language) -> Markup {
    let languages = [
        (Language::English, "EN"),
        (Language::Indonesian, "ID"),
    ];

    html!(
        div
            class="flex items-center gap-2 text-sm text-gray-600 dark:text-gray-300"
            aria-label=(current.translate(Text::Language))
        {
            @for (index, (language, label)) in languages.into_iter().enumerate() {
                @if index > 0 { span { "|" } }

                @if language == current {
                    span class="font-bold text-blue-700 dark:text-blue-400" { (label) }
                } @else {
                    a
                        href=(language_url(language))
                        class="hover:text-blue-700 dark:hover:text-blue-400"
                    {
                        (label)
                    }
                }
            }
        }
    )
}

fn language_url(language: Language) -> String {
    endpoints::SWITCH_LANGUAGE.replace("{lang}", language.code())
}
