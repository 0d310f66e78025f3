use tracing::debug;

use crate::config::GroupingConfig;
use crate::models::{Location, ProductGroup, ScreenElement};
use crate::processor::PriceClassifier;

/// Clusters on-screen texts around price anchors by vertical proximity.
///
/// Each price-like element seeds one group holding every other non-empty text
/// within `proximity_threshold_px` rows of it. Anchors that sit on top of an
/// earlier anchor (closer than `dedup_tolerance_px` on both axes) are the same
/// price detected twice and are dropped.
#[derive(Debug, Clone)]
pub struct SpatialGrouper {
    classifier: PriceClassifier,
    proximity_threshold_px: u32,
    dedup_tolerance_px: u32,
}

impl SpatialGrouper {
    pub fn new(classifier: PriceClassifier, config: &GroupingConfig) -> Self {
        Self {
            classifier,
            proximity_threshold_px: config.proximity_threshold_px,
            dedup_tolerance_px: config.dedup_tolerance_px,
        }
    }

    pub fn group(&self, elements: &[ScreenElement]) -> Vec<ProductGroup> {
        let anchors: Vec<usize> = elements
            .iter()
            .enumerate()
            .filter(|(_, element)| self.classifier.looks_like_price(&element.text))
            .map(|(index, _)| index)
            .collect();

        debug!(
            "Found {} price anchors among {} elements",
            anchors.len(),
            elements.len()
        );

        let mut groups: Vec<ProductGroup> = Vec::with_capacity(anchors.len());

        for anchor_index in anchors {
            let anchor = &elements[anchor_index];

            if self.is_duplicate_anchor(&groups, &anchor.location) {
                debug!(
                    "Skipping duplicate anchor {:?} at ({}, {})",
                    anchor.text, anchor.location.x, anchor.location.y
                );
                continue;
            }

            groups.push(self.collect_group(elements, anchor_index));
        }

        groups
    }

    fn collect_group(&self, elements: &[ScreenElement], anchor_index: usize) -> ProductGroup {
        let anchor = &elements[anchor_index];
        let anchor_text = anchor.text.trim().to_string();

        let mut member_texts = vec![anchor_text.clone()];
        member_texts.extend(
            elements
                .iter()
                .enumerate()
                .filter(|(index, _)| *index != anchor_index)
                .filter(|(_, element)| {
                    element.location.y.abs_diff(anchor.location.y) <= self.proximity_threshold_px
                })
                .map(|(_, element)| element.text.trim())
                .filter(|text| !text.is_empty())
                .map(str::to_string),
        );

        ProductGroup {
            anchor_price_text: anchor_text,
            anchor_location: anchor.location,
            member_texts,
        }
    }

    fn is_duplicate_anchor(&self, groups: &[ProductGroup], location: &Location) -> bool {
        groups
            .iter()
            .any(|group| group.anchor_location.is_near(location, self.dedup_tolerance_px))
    }
}

impl Default for SpatialGrouper {
    fn default() -> Self {
        Self::new(PriceClassifier::default(), &GroupingConfig::default())
    }
}
