//! # Catalog Seeder
//!
//! Fills the catalog with a starter set of optical products.
//!
//! ## Usage
//! ```bash
//! # Seed the database at OPTIC_DATABASE_PATH (default ./data/optic.db)
//! cargo run -p optic-db --bin seed
//!
//! # Specify database path
//! cargo run -p optic-db --bin seed -- --db ./data/optic.db
//! ```
//!
//! Products whose name already exists are skipped, so running it twice is
//! harmless.

use std::env;

use optic_core::validation::validate_product_input;
use optic_core::{Money, ProductInput};
use optic_db::{Database, DbConfig, DbError};

const DEFAULT_DB_PATH: &str = "./data/optic.db";

/// (category, [(name, price in cents)])
const CATALOG: &[(&str, &[(&str, i64)])] = &[
    (
        "Frames",
        &[
            ("Classic Acetate Frame", 6500),
            ("Titanium Rimless Frame", 14900),
            ("Aviator Metal Frame", 8900),
            ("Kids Flexible Frame", 4500),
            ("Sport Wrap Frame", 9900),
        ],
    ),
    (
        "Lenses",
        &[
            ("Single Vision Lens 1.50", 3000),
            ("Single Vision Lens 1.67", 5500),
            ("Bifocal Lens", 7500),
            ("Progressive Lens", 15000),
            ("Photochromic Lens", 9000),
        ],
    ),
    (
        "Coatings",
        &[
            ("Anti-glare Coating", 2500),
            ("Blue Light Filter", 3000),
            ("Scratch Resistant Coating", 1500),
        ],
    ),
    (
        "Accessories",
        &[
            ("Hard Case", 900),
            ("Soft Pouch", 400),
            ("Microfiber Cloth", 300),
            ("Lens Cleaning Kit", 1200),
            ("Neck Cord", 500),
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path =
        env::var("OPTIC_DATABASE_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Lens Optic Catalog Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: $OPTIC_DATABASE_PATH or {DEFAULT_DB_PATH})");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Lens Optic Catalog Seeder");
    println!("=========================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let mut created = 0;
    let mut skipped = 0;

    for (category, products) in CATALOG {
        println!();
        println!("{category}:");

        for (name, cents) in products.iter() {
            let input = validate_product_input(ProductInput {
                name: name.to_string(),
                price: Money::from_cents(*cents),
            })?;

            match db.products().insert(&input).await {
                Ok(product) => {
                    println!("  + {:<28} {}", product.name, product.price);
                    created += 1;
                }
                Err(DbError::UniqueViolation { .. }) => {
                    println!("  = {:<28} already present", name);
                    skipped += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    println!();
    println!("✓ Seed complete: {created} created, {skipped} skipped");
    println!("  Catalog size: {}", db.products().count().await?);

    db.close().await;
    Ok(())
}
