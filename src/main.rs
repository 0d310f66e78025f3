use anyhow::{Context, Result, anyhow};
use futures::future::join_all;
use grocery_price_scraper::capture::{DumpDirectorySource, SnapshotSource};
use grocery_price_scraper::comparison::{ComparisonOutcome, ComparisonReport, ProductComparison, compare};
use grocery_price_scraper::config::ScraperConfig;
use grocery_price_scraper::models::{ProductRecord, Store};
use grocery_price_scraper::processor::ProductExtractor;
use grocery_price_scraper::storage::{StorageManager, export_records, load_product_list};
use std::env;
use std::path::Path;
use tracing::{error, info, warn};

const DEFAULT_CONFIG_PATH: &str = "src/configs/scraper.toml";

struct CliArgs {
    config_path: String,
    products_csv: Option<String>,
    queries: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    let args = parse_args(env::args().skip(1).collect())?;

    let config = ScraperConfig::load(&args.config_path)
        .with_context(|| format!("Failed to load configuration from {}", args.config_path))?;

    let mut queries = args.queries;
    if let Some(csv_path) = &args.products_csv {
        let products = load_product_list(Path::new(csv_path))
            .with_context(|| format!("Failed to load product list {}", csv_path))?;
        queries.extend(products);
    }

    if queries.is_empty() {
        warn!("⚠️ No products to compare. Pass product names or --products <csv>");
        return Ok(());
    }

    let extractor = ProductExtractor::new(&config);
    let source = DumpDirectorySource::new(&config.run.snapshot_dir);
    let storage = StorageManager::new(&config.run.output_dir);

    info!(
        "🚀 Starting price comparison (snapshots: {}, output: {}, stores: {:?})",
        source.root().display(),
        storage.root().display(),
        config.run.stores
    );

    let mut comparisons = Vec::with_capacity(queries.len());
    let mut all_records: Vec<ProductRecord> = Vec::new();

    for query in &queries {
        info!("\n=== Comparing: {} ===", query);

        let offers = collect_offers(&source, &extractor, &config.run.stores, query).await;
        for (_, records) in &offers {
            all_records.extend(records.iter().cloned());
        }

        let comparison = compare(query, &offers);
        log_comparison(&comparison);
        comparisons.push(comparison);
    }

    let report = ComparisonReport::new(comparisons);

    info!("\n=== Price Comparison Summary ===");
    info!("📊 Products compared: {}", report.summary.total_products);
    for (store, wins) in &report.summary.wins {
        info!("🏆 {} cheaper for {} products", store, wins);
    }
    info!("🤝 Ties: {}, ❌ not found: {}", report.summary.ties, report.summary.not_found);

    match storage.write_json("comparison", &report) {
        Ok(path) => info!("Stored comparison report at: {}", path.display()),
        Err(e) => error!("❌ Failed to store comparison report: {:#}", e),
    }

    if all_records.is_empty() {
        warn!("⚠️ No products extracted from any capture, skipping export");
    } else {
        let export_path = storage.generate_export_path(&config.run.export_format);
        if let Err(e) = export_records(&all_records, &export_path) {
            error!("❌ Failed to export products: {:#}", e);
        }
    }

    Ok(())
}

/// Captures every store for one query concurrently; a failing store yields no offers
async fn collect_offers(
    source: &DumpDirectorySource,
    extractor: &ProductExtractor,
    stores: &[Store],
    query: &str,
) -> Vec<(Store, Vec<ProductRecord>)> {
    let captures = join_all(stores.iter().map(|store| async move {
        (*store, source.capture(*store, query).await)
    }))
    .await;

    captures
        .into_iter()
        .map(|(store, capture)| match capture {
            Ok(elements) => {
                let records = extractor.extract_products(&elements, store);
                info!("✅ {}: {} products for {:?}", store, records.len(), query);
                (store, records)
            }
            Err(e) => {
                error!("❌ {}: failed to capture {:?}: {:#}", store, query, e);
                (store, Vec::new())
            }
        })
        .collect()
}

fn log_comparison(comparison: &ProductComparison) {
    for offer in &comparison.best_offers {
        info!(
            "   {} best: {} ({}) ${} [{:.2}/unit]",
            offer.store.map(|s| s.display_name()).unwrap_or("?"),
            offer.name,
            if offer.size.is_empty() { "-" } else { offer.size.as_str() },
            offer.price,
            offer.price_per_unit
        );
    }

    match &comparison.outcome {
        ComparisonOutcome::NotFound => warn!("   Not found in any store"),
        ComparisonOutcome::SingleStore { store } => info!("   Only available at {}", store),
        ComparisonOutcome::Compared { recommendation, .. } => info!("   {}", recommendation),
    }
}

fn parse_args(args: Vec<String>) -> Result<CliArgs> {
    let mut parsed = CliArgs {
        config_path: DEFAULT_CONFIG_PATH.to_string(),
        products_csv: None,
        queries: Vec::new(),
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                parsed.config_path = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a path"))?;
            }
            "--products" | "-p" => {
                parsed.products_csv =
                    Some(iter.next().ok_or_else(|| anyhow!("--products requires a path"))?);
            }
            _ => parsed.queries.push(arg),
        }
    }

    Ok(parsed)
}
