pub mod aggregate;
pub mod cache;
pub mod config;
pub mod fetch;
pub mod refresher;
pub mod store;
pub mod viewmodel;
pub mod worker;
