pub mod analytics;
pub mod health;
pub mod message;
pub mod response;
pub mod template;
pub mod validation;
