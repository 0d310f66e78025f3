use anyhow::{Context, Result, anyhow};
use polars::prelude::*;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

/// Header names accepted for the product column, checked case-insensitively
const PRODUCT_COLUMNS: [&str; 3] = ["product", "producto", "name"];

/// Read the list of products to search from a CSV file.
///
/// Uses the `product`/`producto`/`name` column when present, else the first
/// column. Blank entries are skipped and duplicates keep their first position.
pub fn load_product_list(path: &Path) -> Result<Vec<String>> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("Failed to open product list: {}", path.display()))?
        .finish()
        .with_context(|| format!("Failed to read product list: {}", path.display()))?;

    let column_names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    let column_name = column_names
        .iter()
        .find(|name| PRODUCT_COLUMNS.contains(&name.trim().to_lowercase().as_str()))
        .or_else(|| column_names.first())
        .ok_or_else(|| anyhow!("Product list has no columns: {}", path.display()))?;

    if !PRODUCT_COLUMNS.contains(&column_name.trim().to_lowercase().as_str()) {
        warn!("No product column in {}, using {:?}", path.display(), column_name);
    }

    let values = df.column(column_name)?.cast(&DataType::String)?;

    let mut seen = HashSet::new();
    let products: Vec<String> = values
        .str()?
        .into_iter()
        .flatten()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .filter(|value| seen.insert(value.to_lowercase()))
        .collect();

    info!("Loaded {} products from {}", products.len(), path.display());
    Ok(products)
}
