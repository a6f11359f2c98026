use email_address::EmailAddress;
use rusqlite::Connection;

use crate::{
    auth::{PasswordHash, UserID, ValidatedPassword, create_user},
    db::initialize,
};

/// An in-memory database with every table created.
#[track_caller]
pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize test database");

    connection
}

/// Register a user, hashing `password` with the lowest cost bcrypt allows.
#[track_caller]
pub(crate) fn insert_test_user(connection: &Connection, email: &str, password: &str) -> UserID {
    let email: EmailAddress = email.parse().expect("Invalid test e-mail address");
    let password_hash = PasswordHash::new(ValidatedPassword::new_unchecked(password), 4)
        .expect("Could not hash test password");

    create_user(email, password_hash, connection)
        .expect("Could not create test user")
        .id
}
