use anyhow::{Result, anyhow};
use grocery_price_scraper::capture::load_elements;
use grocery_price_scraper::config::ScraperConfig;
use grocery_price_scraper::models::Store;
use grocery_price_scraper::processor::ProductExtractor;
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(path) = args.first().map(Path::new) else {
        return Err(anyhow!("Usage: extract_snapshot <capture.xml|capture.json> [jumbo|lider]"));
    };

    // Captures live under <root>/<store>/, so the directory name is a usable default
    let store = match args.get(1) {
        Some(name) => Store::from_name(name).ok_or_else(|| anyhow!("Unknown store: {}", name))?,
        None => path
            .parent()
            .and_then(|dir| dir.file_name())
            .and_then(|name| name.to_str())
            .and_then(Store::from_name)
            .ok_or_else(|| anyhow!("Cannot infer store from {}, pass it explicitly", path.display()))?,
    };

    let elements = load_elements(path)?;
    println!("Loaded {} screen elements from {}", elements.len(), path.display());

    let extractor = ProductExtractor::new(&ScraperConfig::default());
    let records = extractor.extract_products(&elements, store);

    println!("\n{} products found at {}:\n", records.len(), store.display_name());
    for (i, record) in records.iter().enumerate() {
        println!("{}. {}", i + 1, record.name);
        println!("   size: {}", if record.size.is_empty() { "-" } else { &record.size });
        if record.is_promotion {
            println!(
                "   price: ${} ({} x ${} each)",
                record.price, record.quantity, record.unit_price
            );
        } else {
            println!("   price: ${}", record.price);
        }
        if record.price_per_liter > 0.0 {
            println!("   per liter: ${:.2}", record.price_per_liter);
        }
        if record.price_per_unit > 0.0 {
            println!("   per unit: ${:.2}", record.price_per_unit);
        }
    }

    println!("\n{}", serde_json::to_string_pretty(&records)?);

    Ok(())
}
