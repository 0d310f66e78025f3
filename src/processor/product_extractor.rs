use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::models::{ProductRecord, ScreenElement, Store};
use crate::processor::{FieldExtractor, PriceClassifier, SpatialGrouper};

/// Turns one screen capture into product records for a store
#[derive(Debug, Clone)]
pub struct ProductExtractor {
    grouper: SpatialGrouper,
    fields: FieldExtractor,
    skip_invisible: bool,
}

impl ProductExtractor {
    pub fn new(config: &ScraperConfig) -> Self {
        let classifier = PriceClassifier::from_config(&config.classifier);

        Self {
            grouper: SpatialGrouper::new(classifier.clone(), &config.grouping),
            fields: FieldExtractor::new(classifier, &config.names),
            skip_invisible: config.grouping.skip_invisible,
        }
    }

    /// Records with a zero price are dropped; an empty result means nothing was found
    pub fn extract_products(&self, elements: &[ScreenElement], store: Store) -> Vec<ProductRecord> {
        let visible: Vec<ScreenElement>;
        let elements = if self.skip_invisible {
            visible = elements.iter().filter(|e| e.is_visible()).cloned().collect();
            &visible[..]
        } else {
            elements
        };

        let groups = self.grouper.group(elements);
        if groups.is_empty() {
            warn!("No price anchors found for {} among {} elements", store, elements.len());
            return Vec::new();
        }

        let mut products = Vec::with_capacity(groups.len());
        let mut dropped_count = 0;

        for (index, group) in groups.iter().enumerate() {
            let record = self.fields.extract(group, index + 1);

            if record.price <= 0.0 {
                dropped_count += 1;
                debug!("Dropping group {:?}: no parseable price", group.anchor_price_text);
                continue;
            }

            products.push(record.with_store(store));
        }

        info!(
            "{} extraction completed: {} groups, {} products, {} dropped",
            store,
            groups.len(),
            products.len(),
            dropped_count
        );

        products
    }
}

impl Default for ProductExtractor {
    fn default() -> Self {
        Self::new(&ScraperConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_products_on_one_screen() {
        let extractor = ProductExtractor::default();
        let elements = vec![
            ScreenElement::new("$1.990", 100, 500),
            ScreenElement::new("Leche Soprole 1L", 100, 470),
            ScreenElement::new("$2.500 c/u", 100, 800),
            ScreenElement::new("Aceite Chef 1L", 100, 770),
        ];

        let products = extractor.extract_products(&elements, Store::Jumbo);

        assert_eq!(products.len(), 2);

        assert_eq!(products[0].name, "Leche Soprole 1L");
        assert_eq!(products[0].size, "1L");
        assert_eq!(products[0].price, 1990.0);
        assert_eq!(products[0].price_per_liter, 1990.0);
        assert_eq!(products[0].store, Some(Store::Jumbo));

        assert_eq!(products[1].name, "Aceite Chef 1L");
        assert_eq!(products[1].size, "1L");
        assert_eq!(products[1].price, 2500.0);
        assert_eq!(products[1].price_per_liter, 2500.0);
    }

    #[test]
    fn test_promotion_with_size() {
        let extractor = ProductExtractor::default();
        let elements = vec![
            ScreenElement::new("2 x $4.000", 0, 0),
            ScreenElement::new("Bebida Cola 2.5L", 0, -10),
        ];

        let products = extractor.extract_products(&elements, Store::Lider);

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].price, 4000.0);
        assert_eq!(products[0].quantity, 2);
        assert!(products[0].is_promotion);
        assert_eq!(products[0].price_per_liter, 800.0);
        assert_eq!(products[0].store, Some(Store::Lider));
    }

    #[test]
    fn test_zero_price_groups_are_dropped() {
        let extractor = ProductExtractor::default();
        let elements = vec![
            ScreenElement::new("$0", 0, 0).with_size(40, 20),
            ScreenElement::new("Yogurt Frutilla", 0, 30),
            ScreenElement::new("$1.190", 0, 400),
            ScreenElement::new("Yogurt Batido Vainilla", 0, 420),
        ];

        let products = extractor.extract_products(&elements, Store::Jumbo);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Yogurt Batido Vainilla");
        assert_eq!(products[0].price, 1190.0);
    }

    #[test]
    fn test_invisible_elements_are_skipped() {
        let elements = vec![
            ScreenElement::new("$1.290", 0, 0).with_size(0, 0),
            ScreenElement::new("Pan Hallulla", 0, 20),
        ];

        assert!(ProductExtractor::default().extract_products(&elements, Store::Jumbo).is_empty());

        let mut config = ScraperConfig::default();
        config.grouping.skip_invisible = false;
        let products = ProductExtractor::new(&config).extract_products(&elements, Store::Jumbo);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Pan Hallulla");
    }

    #[test]
    fn test_screen_without_prices() {
        let elements = vec![ScreenElement::new("Sin resultados", 0, 0)];
        assert!(ProductExtractor::default().extract_products(&elements, Store::Lider).is_empty());
    }
}
