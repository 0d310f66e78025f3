pub mod price_comparator;
pub mod report;

pub use price_comparator::*;
pub use report::*;
