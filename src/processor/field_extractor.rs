use tracing::debug;

use crate::config::NameConfig;
use crate::models::{ParsedPrice, ProductGroup, ProductRecord};
use crate::processor::measure::{Measure, price_per_standard_unit};
use crate::processor::{ChileanPriceParser, PriceClassifier};

const SHORT_KEYWORD_CHARS: usize = 4;

/// Resolves name, size, price and derived per-liter/per-unit prices for one group
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    classifier: PriceClassifier,
    parser: ChileanPriceParser,
    min_name_length: usize,
    product_keywords: Vec<String>,
    ui_chrome: Vec<String>,
}

impl FieldExtractor {
    pub fn new(classifier: PriceClassifier, config: &NameConfig) -> Self {
        Self {
            classifier,
            parser: ChileanPriceParser,
            min_name_length: config.min_name_length,
            product_keywords: config.product_keywords.iter().map(|k| k.to_lowercase()).collect(),
            ui_chrome: config.ui_chrome.iter().map(|c| c.trim().to_lowercase()).collect(),
        }
    }

    /// Build a record from `group`; `fallback_index` names products with no usable text
    pub fn extract(&self, group: &ProductGroup, fallback_index: usize) -> ProductRecord {
        let price = self.parser.parse(&group.anchor_price_text);
        let name = self
            .resolve_name(group)
            .unwrap_or_else(|| format!("Product {}", fallback_index));
        let size = self.resolve_size(group);

        debug!(
            "Group {:?} -> name {:?}, size {:?}, price {}",
            group.anchor_price_text,
            name,
            size.as_ref().map(|(token, _)| token.as_str()),
            price.total_price
        );

        build_record(name, size, &price)
    }

    /// First candidate carrying a product keyword, else the longest candidate
    pub fn resolve_name(&self, group: &ProductGroup) -> Option<String> {
        let candidates: Vec<&str> = group
            .neighbor_texts()
            .filter(|text| self.is_name_candidate(text, &group.anchor_price_text))
            .collect();

        if let Some(keyword_match) = candidates.iter().find(|text| self.has_product_keyword(text)) {
            return Some(keyword_match.to_string());
        }

        let mut longest: Option<&str> = None;
        for candidate in candidates {
            if longest.is_none_or(|current| candidate.chars().count() > current.chars().count()) {
                longest = Some(candidate);
            }
        }

        longest.map(str::to_string)
    }

    /// First size token among the group's non-anchor texts
    pub fn resolve_size(&self, group: &ProductGroup) -> Option<(String, Measure)> {
        group.neighbor_texts().find_map(Measure::find)
    }

    fn is_name_candidate(&self, text: &str, anchor_text: &str) -> bool {
        let text = text.trim();

        text != anchor_text
            && text.chars().count() >= self.min_name_length
            && text.chars().any(char::is_alphabetic)
            && !self.is_ui_chrome(text)
            && !self.classifier.looks_like_price(text)
    }

    fn is_ui_chrome(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.ui_chrome.iter().any(|chrome| *chrome == lowered)
    }

    /// Keywords shorter than 4 chars must be a whole word, longer ones may be part of one
    fn has_product_keyword(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .collect();

        self.product_keywords.iter().any(|keyword| {
            if keyword.chars().count() < SHORT_KEYWORD_CHARS {
                words.contains(&keyword.as_str())
            } else {
                lowered.contains(keyword.as_str())
            }
        })
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new(PriceClassifier::default(), &NameConfig::default())
    }
}

fn build_record(name: String, size: Option<(String, Measure)>, price: &ParsedPrice) -> ProductRecord {
    let (size_text, price_per_liter, price_per_unit) = match size {
        Some((token, measure)) => {
            let per_unit = price_per_standard_unit(price.total_price, &measure, price.quantity);
            let per_liter = if measure.liters().is_some() { per_unit } else { 0.0 };
            (token, per_liter, per_unit)
        }
        None => (String::new(), 0.0, 0.0),
    };

    ProductRecord {
        name,
        size: size_text,
        price: price.total_price,
        unit_price: price.unit_price,
        quantity: price.quantity,
        is_promotion: price.is_promotion,
        price_per_liter,
        price_per_unit,
        store: None,
    }
}
