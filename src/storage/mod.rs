pub mod product_list;
pub mod record_export;
pub mod storage_manager;

pub use product_list::*;
pub use record_export::*;
pub use storage_manager::*;
