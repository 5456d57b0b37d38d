use axum::http::HeaderValue;
use common::{
    error::AppError,
    storage::{cache::DocumentCache, catalog::Catalog},
    utils::config::AppConfig,
};

#[derive(Clone)]
pub struct ApiState {
    pub cache: DocumentCache,
    pub config: AppConfig,
    cors_origin: HeaderValue,
}

impl ApiState {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let cors_origin = HeaderValue::from_str(&config.cors_allowed_origin).map_err(|_| {
            AppError::Validation(format!(
                "invalid CORS origin: {}",
                config.cors_allowed_origin
            ))
        })?;

        Ok(Self {
            cache: DocumentCache::new(Catalog::new(&config.data_dir)),
            config: config.clone(),
            cors_origin,
        })
    }

    pub fn cors_origin(&self) -> &HeaderValue {
        &self.cors_origin
    }
}
