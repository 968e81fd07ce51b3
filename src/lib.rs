pub mod api;
pub mod catalog;
pub mod clients;
pub mod config;
pub mod error;
pub mod matcher;
pub mod models;
pub mod placeholders;
pub mod utils;
