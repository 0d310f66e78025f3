use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::comparison::{ComparisonSummary, ProductComparison, summarize};

/// Everything one comparison run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub generated_at: DateTime<Utc>,
    pub results: Vec<ProductComparison>,
    pub summary: ComparisonSummary,
}

impl ComparisonReport {
    pub fn new(results: Vec<ProductComparison>) -> Self {
        let summary = summarize(&results);
        Self {
            generated_at: Utc::now(),
            results,
            summary,
        }
    }
}
