use std::{error::Error, io, path::Path, process::exit};

use clap::Parser;
use email_address::EmailAddress;
use rusqlite::Connection;

use cashbook::{
    PasswordHash, User, ValidatedPassword, get_accounts_with_balances, get_user_by_email,
    update_password,
};

/// Set a new password for a cashbook user who can no longer log in.
///
/// The user's active accounts are listed first so the right user can be confirmed.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The e-mail address the user logs in with.
    #[arg(long)]
    email: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let db_path = Path::new(&args.db_path);
    if !db_path.is_file() {
        fail(format!("No database at {db_path:?}."));
    }

    let conn = Connection::open(db_path)?;
    let user = match get_user_by_email(args.email.trim(), &conn) {
        Ok(user) => user,
        Err(error) => fail(format!("No user with the e-mail {}: {error}", args.email)),
    };

    print_accounts(&user, &conn)?;

    let Some(password_hash) = prompt_new_password(&user.email)? else {
        println!("No password entered, {} keeps the old password.", user.email);
        return Ok(());
    };

    update_password(user.id, &password_hash, &conn)?;
    println!("Password for {} updated, old sessions stay valid until they expire.", user.email);

    Ok(())
}

fn print_accounts(user: &User, conn: &Connection) -> Result<(), Box<dyn Error>> {
    let accounts = get_accounts_with_balances(user.id, conn)?;

    println!("{} has {} active account(s).", user.email, accounts.len());
    for entry in &accounts {
        let name: &str = entry.account.name.as_ref();
        println!("  {name:<24} {:>12.2}", entry.balance);
    }
    println!();

    Ok(())
}

/// Ask for a new password until it is strong enough and typed twice the same.
///
/// Returns `None` when stdin is closed, e.g. on Ctrl-D.
fn prompt_new_password(email: &EmailAddress) -> Result<Option<PasswordHash>, Box<dyn Error>> {
    loop {
        let Some(password) = read_password("New password: ")? else {
            return Ok(None);
        };

        let validated = match ValidatedPassword::new(&password, email) {
            Ok(validated) => validated,
            Err(error) => {
                eprintln!("\x1b[31;1m{error}\x1b[0m");
                continue;
            }
        };

        let Some(confirmation) = read_password("Repeat the new password: ")? else {
            return Ok(None);
        };
        if confirmation != password {
            eprintln!("\x1b[31;1mThe passwords do not match.\x1b[0m");
            continue;
        }

        return Ok(Some(PasswordHash::new(validated, PasswordHash::DEFAULT_COST)?));
    }
}

fn read_password(prompt: &str) -> Result<Option<String>, io::Error> {
    match rpassword::prompt_password(prompt) {
        Ok(password) if password.is_empty() => Ok(None),
        Ok(password) => Ok(Some(password)),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(error) => Err(error),
    }
}

fn fail(message: String) -> ! {
    eprintln!("\x1b[31;1m{message}\x1b[0m");
    exit(1);
}
