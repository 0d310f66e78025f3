use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::capture::CaptureFormat;
use crate::models::{ScreenElement, Store};

/// Supplies one consistent screen read per store and query.
///
/// Implementations must hand over elements captured from a single screen
/// state; grouping cannot detect batches mixed from two screens.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn capture(&self, store: Store, query: &str) -> Result<Vec<ScreenElement>>;
}

/// Reads captures saved as `<root>/<store>/<query-slug>.{json,xml}`
pub struct DumpDirectorySource {
    root: PathBuf,
}

impl DumpDirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn find_capture(&self, store: Store, query: &str) -> Result<(PathBuf, CaptureFormat)> {
        let slug = slugify(query);
        let store_dir = self.root.join(store.as_str());

        for (extension, format) in CaptureFormat::EXTENSIONS {
            let path = store_dir.join(format!("{}.{}", slug, extension));
            if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                return Ok((path, format));
            }
        }

        Err(anyhow!(
            "No capture for {} {:?} in {}",
            store,
            query,
            store_dir.display()
        ))
    }
}

#[async_trait]
impl SnapshotSource for DumpDirectorySource {
    async fn capture(&self, store: Store, query: &str) -> Result<Vec<ScreenElement>> {
        let (path, format) = self.find_capture(store, query).await?;
        debug!("Loading {} capture from {}", store, path.display());

        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read capture file: {}", path.display()))?;

        let elements = format
            .parse(&content)
            .with_context(|| format!("Failed to parse capture file: {}", path.display()))?;

        info!("Loaded {} elements for {} {:?}", elements.len(), store, query);
        Ok(elements)
    }
}

/// `"Coca-Cola 1.5L"` -> `"coca_cola_1_5l"`
pub fn slugify(query: &str) -> String {
    let mut slug = String::with_capacity(query.len());
    let mut pending_separator = false;

    for c in query.trim().chars().flat_map(char::to_lowercase) {
        let c = match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' | 'ü' => 'u',
            'ñ' => 'n',
            other => other,
        };

        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('_');
            }
            pending_separator = false;
            slug.push(c);
        } else {
            pending_separator = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::ScreenSnapshot;
    use uuid::Uuid;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Coca-Cola 1.5L"), "coca_cola_1_5l");
        assert_eq!(slugify("  Leche  Entera "), "leche_entera");
        assert_eq!(slugify("Jabón Líquido"), "jabon_liquido");
        assert_eq!(slugify("¡Oferta!"), "oferta");
    }

    #[tokio::test]
    async fn test_directory_source_reads_snapshot() {
        let root = std::env::temp_dir().join(format!("capture-test-{}", Uuid::new_v4()));
        let store_dir = root.join("jumbo");
        tokio::fs::create_dir_all(&store_dir).await.unwrap();

        let snapshot = ScreenSnapshot::new(
            Store::Jumbo,
            "leche entera",
            vec![
                ScreenElement::new("$1.990", 100, 500),
                ScreenElement::new("Leche Entera 1L", 100, 470),
            ],
        );
        tokio::fs::write(
            store_dir.join("leche_entera.json"),
            serde_json::to_string(&snapshot).unwrap(),
        )
        .await
        .unwrap();

        let source = DumpDirectorySource::new(&root);
        assert_eq!(source.root(), root.as_path());
        let elements = source.capture(Store::Jumbo, "Leche Entera").await.unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].text, "$1.990");

        assert!(source.capture(Store::Lider, "Leche Entera").await.is_err());

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }
}
