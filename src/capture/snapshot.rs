use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::capture::parse_page_source;
use crate::models::{ScreenElement, Store};

/// One screen read, saved as JSON by the capture side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenSnapshot {
    pub store: Store,
    pub query: String,
    #[serde(default = "Utc::now")]
    pub captured_at: DateTime<Utc>,
    pub elements: Vec<ScreenElement>,
}

impl ScreenSnapshot {
    pub fn new(store: Store, query: impl Into<String>, elements: Vec<ScreenElement>) -> Self {
        Self {
            store,
            query: query.into(),
            captured_at: Utc::now(),
            elements,
        }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse screen snapshot JSON")
    }
}

/// Capture file kinds, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureFormat {
    PageSource,
    Snapshot,
}

impl CaptureFormat {
    pub const EXTENSIONS: [(&'static str, CaptureFormat); 2] =
        [("json", CaptureFormat::Snapshot), ("xml", CaptureFormat::PageSource)];

    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        Self::EXTENSIONS
            .iter()
            .find(|(ext, _)| *ext == extension)
            .map(|(_, format)| *format)
            .ok_or_else(|| anyhow!("Unsupported capture file: {}", path.display()))
    }

    pub fn parse(&self, content: &str) -> Result<Vec<ScreenElement>> {
        match self {
            CaptureFormat::PageSource => parse_page_source(content),
            CaptureFormat::Snapshot => Ok(ScreenSnapshot::from_json(content)?.elements),
        }
    }
}

/// Load the elements of an `.xml` dump or `.json` snapshot
pub fn load_elements(path: &Path) -> Result<Vec<ScreenElement>> {
    let format = CaptureFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read capture file: {}", path.display()))?;

    format
        .parse(&content)
        .with_context(|| format!("Failed to parse capture file: {}", path.display()))
}
