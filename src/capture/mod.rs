pub mod page_source;
pub mod snapshot;
pub mod source;

pub use page_source::*;
pub use snapshot::*;
pub use source::*;
