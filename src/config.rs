use anyhow::{Error, Result, anyhow};
use dotenvy::dotenv;
use serde::Deserialize;

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default = "default_max_stored_messages")]
    pub max_stored_messages: usize,

    #[serde(default)]
    pub template_catalog_path: Option<String>,

    #[serde(default = "default_max_prompt_length")]
    pub max_prompt_length: usize,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_max_history_limit")]
    pub max_history_limit: usize,

    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_stored_messages() -> usize {
    100
}

fn default_max_prompt_length() -> usize {
    500
}

fn default_history_limit() -> usize {
    50
}

fn default_max_history_limit() -> usize {
    100
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: None,
            max_stored_messages: default_max_stored_messages(),
            template_catalog_path: None,
            max_prompt_length: default_max_prompt_length(),
            history_limit: default_history_limit(),
            max_history_limit: default_max_history_limit(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        dotenv().ok();

        let config = envy::from_env::<Self>()
            .map_err(|e| anyhow!("Invalid environmental variable: {}", e))?;
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
