use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models::Store;

/// Environment prefix for overrides, e.g. `PRICE_SCRAPER__GROUPING__PROXIMITY_THRESHOLD_PX=250`
pub const ENV_PREFIX: &str = "PRICE_SCRAPER";

/// Top-level configuration for capture processing and comparison runs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub run: RunConfig,
    pub grouping: GroupingConfig,
    pub classifier: ClassifierConfig,
    pub names: NameConfig,
}

/// Where captures come from and where results go
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub snapshot_dir: PathBuf,
    pub output_dir: PathBuf,
    pub stores: Vec<Store>,
    /// `csv` or `parquet`
    pub export_format: String,
}

/// Layout tuning for price-anchor grouping
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    /// Max vertical distance between an anchor and a member text
    pub proximity_threshold_px: u32,
    /// Anchors closer than this on both axes are the same price
    pub dedup_tolerance_px: u32,
    /// Drop zero-sized nodes before grouping
    pub skip_invisible: bool,
}

/// Plausible range for bare numbers read as prices, in pesos
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub bare_price_min: u64,
    pub bare_price_max: u64,
}

/// Product name resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NameConfig {
    pub min_name_length: usize,
    pub product_keywords: Vec<String>,
    pub ui_chrome: Vec<String>,
}

impl ScraperConfig {
    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: ScraperConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        Ok(config)
    }

    /// Load the TOML file if present, then apply `PRICE_SCRAPER__*` environment overrides
    pub fn load(path: &str) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name(path).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to load configuration from {}", path))?;

        settings
            .try_deserialize()
            .with_context(|| format!("Invalid configuration in {}", path))
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            snapshot_dir: PathBuf::from("captures"),
            output_dir: PathBuf::from("output"),
            stores: Store::ALL.to_vec(),
            export_format: "csv".to_string(),
        }
    }
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            proximity_threshold_px: 200,
            dedup_tolerance_px: 20,
            skip_invisible: true,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            bare_price_min: 100,
            bare_price_max: 999_999,
        }
    }
}

impl Default for NameConfig {
    fn default() -> Self {
        Self {
            min_name_length: 4,
            product_keywords: [
                "coca", "pepsi", "sprite", "fanta", "bebida", "agua", "jugo", "leche", "yogurt",
                "pan", "arroz", "fideos", "pasta", "aceite", "azúcar", "sal", "detergente",
                "jabón", "shampoo", "crema", "galletas", "chocolate", "cerveza", "vino",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            ui_chrome: [
                "agregar",
                "agregar al carro",
                "combinar",
                "regular",
                "c/u",
                "x",
                "ver más",
                "ver todo",
                "comprar",
                "añadir",
                "disponible",
                "agotado",
                "oferta",
                "precio",
                "despacho",
                "retiro",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let config = ScraperConfig::default();
        assert_eq!(config.grouping.proximity_threshold_px, 200);
        assert_eq!(config.grouping.dedup_tolerance_px, 20);
        assert_eq!(config.classifier.bare_price_min, 100);
        assert_eq!(config.run.stores, vec![Store::Jumbo, Store::Lider]);
        assert!(config.names.product_keywords.iter().any(|k| k == "leche"));
        assert!(config.names.ui_chrome.iter().any(|k| k == "agregar"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ScraperConfig = toml::from_str(
            r#"
            [grouping]
            proximity_threshold_px = 150

            [run]
            stores = ["lider"]
            "#,
        )
        .unwrap();

        assert_eq!(config.grouping.proximity_threshold_px, 150);
        assert_eq!(config.grouping.dedup_tolerance_px, 20);
        assert_eq!(config.run.stores, vec![Store::Lider]);
        assert_eq!(config.names.min_name_length, 4);
    }

    #[test]
    fn test_bundled_config_matches_defaults() {
        let config = ScraperConfig::from_file("src/configs/scraper.toml").unwrap();
        let defaults = ScraperConfig::default();

        assert_eq!(config.run.stores, defaults.run.stores);
        assert_eq!(config.classifier.bare_price_max, defaults.classifier.bare_price_max);
        assert_eq!(config.names.product_keywords, defaults.names.product_keywords);
        assert_eq!(config.names.ui_chrome, defaults.names.ui_chrome);
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = ScraperConfig::load("does/not/exist/scraper").unwrap();
        assert_eq!(config.grouping.proximity_threshold_px, 200);
        assert_eq!(config.run.export_format, "csv");
    }
}
