//! Database operations for categories.

use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::{
    Error,
    auth::UserID,
    category::{Category, CategoryId, CategoryName, NewCategory},
};

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            parent_id INTEGER,
            name TEXT NOT NULL,
            show_on_stats INTEGER NOT NULL DEFAULT 1 CHECK (show_on_stats IN (0, 1)),
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(parent_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE SET NULL
        );

        CREATE INDEX IF NOT EXISTS idx_category_user_id ON category(user_id);
        CREATE INDEX IF NOT EXISTS idx_category_parent_id ON category(parent_id);",
    )?;

    Ok(())
}

/// Check that `parent_id` may be the parent of `category_id`.
///
/// The parent must be a top-level category of the same user and must not be
/// the category itself. A category that has children of its own stays top-level.
fn validate_parent(
    user_id: UserID,
    category_id: Option<CategoryId>,
    parent_id: Option<CategoryId>,
    connection: &Connection,
) -> Result<(), Error> {
    let Some(parent_id) = parent_id else {
        return Ok(());
    };

    if category_id == Some(parent_id) {
        return Err(Error::InvalidParentCategory);
    }

    let parent_is_top_level = connection
        .query_row(
            "SELECT parent_id IS NULL FROM category WHERE id = ?1 AND user_id = ?2",
            params![parent_id, user_id.as_i64()],
            |row| row.get::<_, bool>(0),
        )
        .optional()?;

    if parent_is_top_level != Some(true) {
        return Err(Error::InvalidParentCategory);
    }

    if let Some(category_id) = category_id {
        let has_children: bool = connection.query_row(
            "SELECT EXISTS (SELECT 1 FROM category WHERE parent_id = ?1)",
            [category_id],
            |row| row.get(0),
        )?;

        if has_children {
            return Err(Error::InvalidParentCategory);
        }
    }

    Ok(())
}

/// Create a category for `user_id` and return it with its generated ID.
///
/// # Errors
///
/// Returns [Error::InvalidParentCategory] if the parent is not one of the user's top-level categories.
pub fn create_category(
    user_id: UserID,
    category: NewCategory,
    connection: &Connection,
) -> Result<Category, Error> {
    validate_parent(user_id, None, category.parent_id, connection)?;

    connection.execute(
        "INSERT INTO category (user_id, parent_id, name, show_on_stats) VALUES (?1, ?2, ?3, ?4)",
        params![
            user_id.as_i64(),
            category.parent_id,
            category.name.as_ref(),
            category.show_on_stats
        ],
    )?;

    Ok(Category {
        id: connection.last_insert_rowid(),
        name: category.name,
        parent_id: category.parent_id,
        show_on_stats: category.show_on_stats,
    })
}

/// Replace the name, parent and stats flag of one of the user's categories.
///
/// # Errors
///
/// Returns a:
/// - [Error::UpdateMissingCategory] if the user has no such category,
/// - [Error::InvalidParentCategory] if the new parent would nest categories more than one level deep.
pub fn update_category(
    user_id: UserID,
    category_id: CategoryId,
    category: NewCategory,
    connection: &Connection,
) -> Result<(), Error> {
    match get_category(user_id, category_id, connection) {
        Ok(_) => {}
        Err(Error::NotFound) => return Err(Error::UpdateMissingCategory),
        Err(error) => return Err(error),
    }

    validate_parent(user_id, Some(category_id), category.parent_id, connection)?;

    connection.execute(
        "UPDATE category SET name = ?1, parent_id = ?2, show_on_stats = ?3
        WHERE id = ?4 AND user_id = ?5",
        params![
            category.name.as_ref(),
            category.parent_id,
            category.show_on_stats,
            category_id,
            user_id.as_i64()
        ],
    )?;

    Ok(())
}

/// Retrieve one of the user's categories.
///
/// # Errors
///
/// Returns [Error::NotFound] if `category_id` does not refer to a category of `user_id`.
pub fn get_category(
    user_id: UserID,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "SELECT id, name, parent_id, show_on_stats FROM category
            WHERE id = ?1 AND user_id = ?2",
        )?
        .query_row(params![category_id, user_id.as_i64()], map_row)
        .map_err(Error::from)
}

/// Retrieve all of the user's categories ordered alphabetically by name.
pub fn get_all_categories(user_id: UserID, connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, name, parent_id, show_on_stats FROM category
            WHERE user_id = ?1 ORDER BY name ASC",
        )?
        .query_map([user_id.as_i64()], map_row)?
        .map(|maybe_category| maybe_category.map_err(Error::from))
        .collect()
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let raw_name: String = row.get(1)?;

    Ok(Category {
        id: row.get(0)?,
        name: CategoryName::new_unchecked(&raw_name),
        parent_id: row.get(2)?,
        show_on_stats: row.get(3)?,
    })
}
