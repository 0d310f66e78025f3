pub mod field_extractor;
pub mod measure;
pub mod price_classifier;
pub mod price_parser;
pub mod product_extractor;
pub mod spatial_grouper;

pub use field_extractor::*;
pub use measure::{Measure, MeasureUnit};
pub use price_classifier::*;
pub use price_parser::*;
pub use product_extractor::*;
pub use spatial_grouper::*;
