use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

use crate::capture::slugify;

/// Lays out run outputs under a dated directory tree
pub struct StorageManager {
    root: PathBuf,
}

impl StorageManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/reports/YYYY/MM/DD/<label>_<uuid>.json`
    pub fn generate_report_path(&self, label: &str) -> PathBuf {
        let date = Utc::now().format("%Y/%m/%d").to_string();
        let file_id = Uuid::new_v4();
        self.root
            .join("reports")
            .join(date)
            .join(format!("{}_{}.json", slugify(label), file_id))
    }

    /// `<root>/exports/YYYY/MM/DD/products.<extension>`
    pub fn generate_export_path(&self, extension: &str) -> PathBuf {
        let date = Utc::now().format("%Y/%m/%d").to_string();
        self.root
            .join("exports")
            .join(date)
            .join(format!("products.{}", extension.trim_start_matches('.')))
    }

    pub fn write_json<T: Serialize>(&self, label: &str, value: &T) -> Result<PathBuf> {
        let path = self.generate_report_path(label);
        ensure_parent_dir(&path)?;

        let json = serde_json::to_string_pretty(value)?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;

        info!("Stored report at: {}", path.display());
        Ok(path)
    }
}

pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dated_paths() {
        let storage = StorageManager::new("output");

        let report = storage.generate_report_path("Leche Entera");
        assert!(report.starts_with("output/reports"));
        let file_name = report.file_name().unwrap().to_str().unwrap();
        assert!(file_name.starts_with("leche_entera_"));
        assert!(file_name.ends_with(".json"));

        let export = storage.generate_export_path(".parquet");
        assert!(export.starts_with("output/exports"));
        assert!(export.ends_with("products.parquet"));
    }

    #[test]
    fn test_write_json_creates_directories() {
        let root = std::env::temp_dir().join(format!("storage-test-{}", Uuid::new_v4()));
        let storage = StorageManager::new(&root);
        assert_eq!(storage.root(), root.as_path());

        let path = storage.write_json("run", &serde_json::json!({"ok": true})).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"ok\": true"));

        std::fs::remove_dir_all(&root).unwrap();
    }
}
