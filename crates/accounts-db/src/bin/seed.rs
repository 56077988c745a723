//! # Seed Data Generator
//!
//! Populates the database with demo customers for development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 customers (default)
//! cargo run -p accounts-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p accounts-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p accounts-db --bin seed -- --db ./data/accounts.db
//! ```
//!
//! ## Generated Data
//! Each customer gets:
//! - A name combined from the first/last name tables below
//! - Document number `10000000 + index`, mobile `3` + 9 digits
//! - Email `<first>.<last><index>@correo.com`
//! - One Active account at one of the demo branches

use accounts_core::{AccountCreateDraft, CustomerDraft};
use accounts_db::{generate_account_number, Database, DbConfig};
use std::env;

const FIRST_NAMES: &[&str] = &[
    "Pepito", "Maria", "Carlos", "Lucia", "Andres", "Valentina", "Jorge", "Camila", "Felipe",
    "Daniela", "Santiago", "Isabela", "Mateo", "Sofia", "Julian",
];

const LAST_NAMES: &[&str] = &[
    "Perez", "Gomez", "Rodriguez", "Martinez", "Lopez", "Garcia", "Ramirez", "Torres", "Castro",
    "Vargas", "Rojas", "Moreno",
];

const BRANCHES: &[&str] = &[
    "Bulevar Niza",
    "Centro Mayor",
    "Unicentro",
    "Andino",
    "Plaza de las Americas",
    "Santafe",
];

const ACCOUNT_TYPES: &[&str] = &["Savings", "Checking"];

const DOCUMENT_TYPES: &[&str] = &["CC", "CE", "PAS"];

/// Attempts per account before giving up on finding a free number.
const ACCOUNT_NUMBER_ATTEMPTS: usize = 5;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./data/accounts_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Accounts Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of customers to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./data/accounts_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Accounts Seed Data Generator");
    println!("===============================");
    println!("Database:  {}", db_path);
    println!("Customers: {}", count);
    println!();

    if let Some(parent) = std::path::Path::new(&db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.customers().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} customers", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating customers...");

    let mut generated = 0;
    let mut accounts = 0;
    let start = std::time::Instant::now();

    for index in 0..count {
        let draft = generate_customer(index);

        let customer = match db.customers().insert(&draft).await {
            Ok(customer) => customer,
            Err(e) => {
                eprintln!("Failed to insert {}: {}", draft.email, e);
                continue;
            }
        };
        generated += 1;

        let account = AccountCreateDraft {
            customer_id: customer.customer_id,
            account_type: ACCOUNT_TYPES[index % ACCOUNT_TYPES.len()].to_string(),
            branch_name: BRANCHES[index % BRANCHES.len()].to_string(),
        };

        for _ in 0..ACCOUNT_NUMBER_ATTEMPTS {
            match db
                .accounts()
                .insert_if_no_active(&account, generate_account_number())
                .await
            {
                Ok(_) => {
                    accounts += 1;
                    break;
                }
                Err(e) if e.is_unique_violation_on("accounts.account_number") => continue,
                Err(e) => {
                    eprintln!("Failed to open account for {}: {}", customer.email, e);
                    break;
                }
            }
        }

        if generated % 50 == 0 {
            println!("  Generated {} customers...", generated);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!(
        "✓ Generated {} customers and {} accounts in {:?}",
        generated, accounts, elapsed
    );

    println!();
    println!("Verifying search...");
    let hits = db.customers().search_by_name("perez").await?;
    println!("  Customers named 'perez': {}", hits.len());

    let hits = db.accounts().search_by_branch_name("niza").await?;
    println!("  Accounts at 'niza': {}", hits.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single customer draft that passes the API's validation rules.
fn generate_customer(index: usize) -> CustomerDraft {
    let first = FIRST_NAMES[index % FIRST_NAMES.len()];
    let last = LAST_NAMES[(index / FIRST_NAMES.len()) % LAST_NAMES.len()];

    CustomerDraft {
        document_type: DOCUMENT_TYPES[index % DOCUMENT_TYPES.len()].to_string(),
        document_number: format!("{}", 10_000_000 + index),
        name: format!("{} {}", first, last),
        email: format!(
            "{}.{}{}@correo.com",
            first.to_lowercase(),
            last.to_lowercase(),
            index
        ),
        mobile_number: format!("3{:09}", index),
    }
}
