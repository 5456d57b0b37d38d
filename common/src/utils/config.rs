use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Clone, Deserialize, Debug)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    #[serde(default = "default_cors_allowed_origin")]
    pub cors_allowed_origin: String,
    #[serde(default = "default_search_result_limit")]
    pub search_result_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            http_port: default_http_port(),
            cors_allowed_origin: default_cors_allowed_origin(),
            search_result_limit: default_search_result_limit(),
        }
    }
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_http_port() -> u16 {
    9000
}

fn default_cors_allowed_origin() -> String {
    "http://localhost:3500".to_string()
}

fn default_search_result_limit() -> usize {
    50
}

pub fn get_config() -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::with_name("config").required(false))
        .add_source(Environment::default())
        .build()?;

    config.try_deserialize()
}
