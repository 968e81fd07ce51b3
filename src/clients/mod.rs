pub mod database;
pub mod health;
pub mod memory;
pub mod store;
