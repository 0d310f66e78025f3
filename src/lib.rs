pub mod capture;
pub mod comparison;
pub mod config;
pub mod models;
pub mod processor;
pub mod storage;
