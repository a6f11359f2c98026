use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use email_address::EmailAddress;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use cashbook::{
    PasswordHash, ValidatedPassword, create_user, initialize_db,
    seed::{
        AccountName, CategoryName, NewCategory, NewTransaction, TransactionType, create_account,
        create_category, create_transaction,
    },
};

/// A utility for creating a test database for the cashbook server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user test@example.com...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user(
        EmailAddress::new_unchecked("test@example.com"),
        password_hash,
        &conn,
    )?;

    println!("Creating accounts, categories and transactions...");

    let today = OffsetDateTime::now_utc().date();
    let wallet = create_account(
        user.id,
        AccountName::new("Wallet")?,
        "Cash on hand",
        today - Duration::days(60),
        &conn,
    )?;
    let bank = create_account(
        user.id,
        AccountName::new("Bank")?,
        "",
        today - Duration::days(60),
        &conn,
    )?;

    let salary = create_category(
        user.id,
        NewCategory {
            name: CategoryName::new("Salary")?,
            parent_id: None,
            show_on_stats: true,
        },
        &conn,
    )?;
    let food = create_category(
        user.id,
        NewCategory {
            name: CategoryName::new("Food")?,
            parent_id: None,
            show_on_stats: true,
        },
        &conn,
    )?;
    let snacks = create_category(
        user.id,
        NewCategory {
            name: CategoryName::new("Snacks")?,
            parent_id: Some(food.id),
            show_on_stats: true,
        },
        &conn,
    )?;
    let transfers = create_category(
        user.id,
        NewCategory {
            name: CategoryName::new("Transfers")?,
            parent_id: None,
            show_on_stats: false,
        },
        &conn,
    )?;

    for days_ago in 0..45 {
        let date = today - Duration::days(days_ago);
        let (account_id, category_id, amount, transaction_type, description) = match days_ago % 5
        {
            0 => (bank.id, salary.id, 250.0, TransactionType::Credit, "Pay"),
            1 => (wallet.id, food.id, 18.5, TransactionType::Debit, "Groceries"),
            2 => (wallet.id, snacks.id, 3.2, TransactionType::Debit, "Coffee"),
            3 => (bank.id, transfers.id, 40.0, TransactionType::Debit, "Top up wallet"),
            _ => (wallet.id, transfers.id, 40.0, TransactionType::Credit, "Top up wallet"),
        };

        create_transaction(
            user.id,
            NewTransaction {
                account_id,
                category_id,
                amount,
                date,
                transaction_type,
                description: description.to_owned(),
            },
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}
