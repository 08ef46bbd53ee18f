//! # Seed Data Generator
//!
//! Populates the database with products for local development.
//!
//! ## Usage
//! ```bash
//! # Seed the default catalogue into ./stockroom_dev.db
//! cargo run -p stockroom-db --bin seed
//!
//! # Same catalogue, every product stocked with 50 units
//! cargo run -p stockroom-db --bin seed -- --stock 50
//!
//! # Specify database path
//! cargo run -p stockroom-db --bin seed -- --db ./data/stockroom.db
//! ```

use std::env;
use stockroom_core::NewProduct;
use stockroom_db::{Database, DbConfig};

/// Products seeded into an empty database, with their starting stock.
const CATALOGUE: &[(&str, i64)] = &[
    ("Martelo de Thor", 10),
    ("Traje de encolhimento", 20),
    ("Escudo do Capitão América", 30),
    ("Manopla do Infinito", 5),
    ("Armadura do Homem de Ferro", 15),
    ("Lança de Odin", 8),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./stockroom_dev.db");
    let mut stock_override: Option<i64> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--stock" | "-s" => {
                if i + 1 < args.len() {
                    stock_override = args[i + 1].parse().ok().filter(|n: &i64| *n >= 0);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Stockroom Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./stockroom_dev.db)");
                println!("  -s, --stock <N>    Starting stock for every product");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Stockroom Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().read_all().await?.len();
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut seeded = 0;
    for (name, quantity) in CATALOGUE {
        let product = NewProduct {
            name: name.to_string(),
            quantity: stock_override.unwrap_or(*quantity),
        };

        match db.products().create(&product).await {
            Ok(created) => {
                println!("  #{:<3} {:<30} {:>4} units", created.id, created.name, created.quantity);
                seeded += 1;
            }
            Err(e) => eprintln!("Failed to insert {}: {}", product.name, e),
        }
    }

    println!();
    println!("✓ Seeded {} products", seeded);

    db.close().await;

    Ok(())
}
