pub mod scraper_config;

pub use scraper_config::*;
