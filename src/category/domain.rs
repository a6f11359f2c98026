//! Core category domain types.

use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize};

use crate::Error;

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name from `name` with surrounding whitespace removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a category.
pub type CategoryId = i64;

/// A label for transactions, e.g. "Food", optionally nested under a top-level category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    /// The top-level category this one is nested under.
    pub parent_id: Option<CategoryId>,
    /// Whether the dashboard counts this category and its transactions.
    pub show_on_stats: bool,
}

/// The fields needed to create or update a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: CategoryName,
    /// A top-level category to nest this one under.
    pub parent_id: Option<CategoryId>,
    /// Whether the dashboard counts this category and its transactions.
    pub show_on_stats: bool,
}

/// Form data for category creation and editing.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryFormData {
    pub name: String,
    /// Empty when the category has no parent.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub parent_id: Option<CategoryId>,
    /// Checkbox value, present when checked.
    pub show_on_stats: Option<String>,
}

impl CategoryFormData {
    /// Validate the form into a [NewCategory].
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyCategoryName] if the name is blank.
    pub fn to_new_category(&self) -> Result<NewCategory, Error> {
        Ok(NewCategory {
            name: CategoryName::new(&self.name)?,
            parent_id: self.parent_id,
            show_on_stats: self.show_on_stats.is_some(),
        })
    }
}

/// Treat an empty form value as a missing value.
fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<CategoryId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;

    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw_id) => raw_id.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
