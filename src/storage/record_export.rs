use anyhow::{Context, Result, anyhow};
use polars::prelude::*;
use std::path::Path;
use tracing::info;

use crate::models::ProductRecord;
use crate::storage::ensure_parent_dir;

pub fn records_to_dataframe(records: &[ProductRecord]) -> Result<DataFrame> {
    let stores: Vec<String> = records
        .iter()
        .map(|r| r.store.map(|s| s.as_str().to_string()).unwrap_or_default())
        .collect();
    let names: Vec<String> = records.iter().map(|r| r.name.clone()).collect();
    let sizes: Vec<String> = records.iter().map(|r| r.size.clone()).collect();
    let prices: Vec<f64> = records.iter().map(|r| r.price).collect();
    let unit_prices: Vec<f64> = records.iter().map(|r| r.unit_price).collect();
    let quantities: Vec<u32> = records.iter().map(|r| r.quantity).collect();
    let promotions: Vec<bool> = records.iter().map(|r| r.is_promotion).collect();
    let per_liter: Vec<f64> = records.iter().map(|r| r.price_per_liter).collect();
    let per_unit: Vec<f64> = records.iter().map(|r| r.price_per_unit).collect();

    let columns: Vec<Column> = vec![
        Series::new("store".into(), stores).into(),
        Series::new("name".into(), names).into(),
        Series::new("size".into(), sizes).into(),
        Series::new("price".into(), prices).into(),
        Series::new("unit_price".into(), unit_prices).into(),
        Series::new("quantity".into(), quantities).into(),
        Series::new("is_promotion".into(), promotions).into(),
        Series::new("price_per_liter".into(), per_liter).into(),
        Series::new("price_per_unit".into(), per_unit).into(),
    ];

    DataFrame::new(columns).map_err(|e| anyhow!("Failed to create DataFrame: {}", e))
}

/// Write records as CSV or Parquet, chosen by the file extension
pub fn export_records(records: &[ProductRecord], path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    if extension != "csv" && extension != "parquet" {
        return Err(anyhow!("Unsupported export format: {:?}", extension));
    }

    let mut df = records_to_dataframe(records)?;
    ensure_parent_dir(path)?;

    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create export file: {}", path.display()))?;

    if extension == "csv" {
        CsvWriter::new(&mut file).finish(&mut df)?;
    } else {
        ParquetWriter::new(&mut file).finish(&mut df)?;
    }

    info!("Exported {} products to {}", df.height(), path.display());
    Ok(())
}
