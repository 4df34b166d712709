//! # Seed Data Generator
//!
//! Populates a database with catalog items and demo clients for development.
//!
//! ## Usage
//! ```bash
//! # Default database ./backoffice_dev.db
//! cargo run -p backoffice-db --bin seed
//!
//! # Custom path
//! cargo run -p backoffice-db --bin seed -- --db ./data/backoffice.db
//! ```
//!
//! Catalog items are upserted (re-running refreshes them); clients are only
//! inserted into an empty client table.

use std::env;

use backoffice_core::{CatalogItem, Client, Money, StockLevel};
use backoffice_db::{Database, DbConfig};
use chrono::Utc;
use uuid::Uuid;

/// (sku, description, price cents, cost cents, on hand)
const CATALOG: &[(&str, &str, i64, Option<i64>, i64)] = &[
    ("PAL-BP-VERTEX", "Paleta Vertex 04", 28_990_00, Some(17_400_00), 6),
    ("PAL-BP-HACK", "Paleta Hack 03", 31_500_00, Some(18_900_00), 4),
    ("PAL-NX-ONE", "Paleta Nox One", 19_900_00, Some(11_200_00), 0),
    ("BOL-HEAD-PRO", "Tubo pelotas Head Pro x3", 8_900_00, Some(4_600_00), 48),
    ("BOL-BP-NEXT", "Tubo pelotas Next x3", 7_600_00, None, 30),
    ("GRP-OVR-WHT", "Overgrip blanco x3", 3_200_00, Some(1_100_00), 120),
    ("BAG-BP-TOUR", "Paletero Tour", 45_000_00, Some(27_000_00), 2),
    ("SHO-ASX-GEL", "Zapatilla Gel Padel 42", 89_990_00, Some(52_000_00), 3),
    ("PRT-ANTI", "Protector antigolpes", 2_500_00, None, 60),
    ("MUN-WRIST", "Muñequera x2", 1_800_00, Some(700_00), 85),
];

/// (name, national id, email, city, province)
const CLIENTS: &[(&str, &str, &str, &str, &str)] = &[
    ("Juan Pérez", "20-30111222-3", "juan.perez@example.com", "Córdoba", "Córdoba"),
    ("María García", "27-28999111-4", "maria.garcia@example.com", "Rosario", "Santa Fe"),
    ("Lucía Fernández", "27-35123456-0", "lucia.f@example.com", "Mendoza", "Mendoza"),
    ("Diego Romero", "20-33444555-6", "dromero@example.com", "La Plata", "Buenos Aires"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./backoffice_dev.db");

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
                println!("Back-Office Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./backoffice_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Back-Office Seed Data Generator");
    println!("==================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    for (sku, description, price, cost, on_hand) in CATALOG {
        let item = CatalogItem {
            sku: sku.to_string(),
            description: description.to_string(),
            unit_price: Money::from_cents(*price),
            on_hand: *on_hand,
            stock_level: if *on_hand == 0 {
                StockLevel::Missing
            } else {
                StockLevel::Normal
            },
            unit_cost: cost.map(Money::from_cents),
        };
        db.catalog().upsert(&item).await?;
    }
    println!("✓ Catalog: {} items", db.catalog().count().await?);

    let existing = db.clients().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} clients, skipping clients", existing);
    } else {
        for (name, national_id, email, city, province) in CLIENTS {
            let client = Client {
                id: Uuid::new_v4().to_string(),
                name: name.to_string(),
                national_id: national_id.to_string(),
                email: email.to_string(),
                phone: String::new(),
                province: province.to_string(),
                city: city.to_string(),
                postal_code: String::new(),
                address: String::new(),
                created_at: Utc::now(),
            };
            db.clients().insert(&client).await?;
        }
        println!("✓ Clients: {} inserted", CLIENTS.len());
    }

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
