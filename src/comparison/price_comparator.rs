use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{ProductRecord, Store};

/// Result of comparing one searched product across stores
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductComparison {
    pub query: String,
    /// Cheapest offer found at each store
    pub best_offers: Vec<ProductRecord>,
    pub outcome: ComparisonOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ComparisonOutcome {
    NotFound,
    SingleStore {
        store: Store,
    },
    Compared {
        /// `None` when the best offers cost the same
        winner: Option<Store>,
        savings_per_unit: f64,
        savings_percent: f64,
        recommendation: String,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub total_products: usize,
    pub wins: BTreeMap<String, usize>,
    pub ties: usize,
    pub not_found: usize,
}

/// Price used to rank offers: per liter/kg when a size is known, else per item
pub fn comparable_price(record: &ProductRecord) -> f64 {
    if record.price_per_unit > 0.0 {
        record.price_per_unit
    } else {
        record.unit_price
    }
}

/// Cheapest record by comparable price; the first one wins ties
pub fn best_offer(records: &[ProductRecord]) -> Option<&ProductRecord> {
    records
        .iter()
        .filter(|record| comparable_price(record) > 0.0)
        .fold(None, |best: Option<&ProductRecord>, record| match best {
            Some(current) if comparable_price(current) <= comparable_price(record) => Some(current),
            _ => Some(record),
        })
}

pub fn compare(query: &str, offers: &[(Store, Vec<ProductRecord>)]) -> ProductComparison {
    let mut ranked: Vec<(Store, f64, &ProductRecord)> = offers
        .iter()
        .filter_map(|(store, records)| {
            best_offer(records).map(|best| (*store, comparable_price(best), best))
        })
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

    let outcome = match ranked.as_slice() {
        [] => ComparisonOutcome::NotFound,
        [(store, _, _)] => ComparisonOutcome::SingleStore { store: *store },
        [(store, best, _), (_, next, _), ..] => {
            let savings = next - best;

            if savings <= f64::EPSILON * next.max(1.0) {
                ComparisonOutcome::Compared {
                    winner: None,
                    savings_per_unit: 0.0,
                    savings_percent: 0.0,
                    recommendation: recommendation(None, 0.0),
                }
            } else {
                let percent = savings / next * 100.0;
                ComparisonOutcome::Compared {
                    winner: Some(*store),
                    savings_per_unit: round_to(savings, 2),
                    savings_percent: round_to(percent, 1),
                    recommendation: recommendation(Some(*store), percent),
                }
            }
        }
    };

    ProductComparison {
        query: query.to_string(),
        best_offers: ranked
            .into_iter()
            .map(|(store, _, record)| record.clone().with_store(store))
            .collect(),
        outcome,
    }
}

pub fn recommendation(winner: Option<Store>, savings_percent: f64) -> String {
    match winner {
        None => "Both options have the same value. Choose based on convenience.".to_string(),
        Some(store) if savings_percent < 5.0 => format!(
            "{} is slightly cheaper ({:.1}% savings). Minimal difference.",
            store, savings_percent
        ),
        Some(store) if savings_percent < 15.0 => format!(
            "{} is noticeably cheaper ({:.1}% savings). Good deal!",
            store, savings_percent
        ),
        Some(store) => format!(
            "{} is significantly cheaper ({:.1}% savings). Excellent deal!",
            store, savings_percent
        ),
    }
}

pub fn summarize(comparisons: &[ProductComparison]) -> ComparisonSummary {
    let mut summary = ComparisonSummary {
        total_products: comparisons.len(),
        ..ComparisonSummary::default()
    };

    for comparison in comparisons {
        match &comparison.outcome {
            ComparisonOutcome::NotFound => summary.not_found += 1,
            ComparisonOutcome::SingleStore { store }
            | ComparisonOutcome::Compared {
                winner: Some(store), ..
            } => *summary.wins.entry(store.as_str().to_string()).or_default() += 1,
            ComparisonOutcome::Compared { winner: None, .. } => summary.ties += 1,
        }
    }

    summary
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
