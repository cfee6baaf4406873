use crate::types::{EnvironmentForm, EnvironmentItem, EnvironmentRes, ListQuery};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Service unavailable: {message}")]
    ServiceUnavailable { message: String },

    #[error("Authentication failed")]
    Authentication,

    #[error("API error {code}: {message}")]
    Api { code: i32, message: String },

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Response for {operation} carried no data")]
    MissingData { operation: String },
}

impl ServiceError {
    /// Backend status code when the failure came from a decoded envelope.
    pub fn api_code(&self) -> Option<i32> {
        match self {
            ServiceError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Operations the backend exposes for worker environments.
#[async_trait]
pub trait EnvironmentService: Send + Sync {
    async fn query_environment_list_paging(&self, query: ListQuery)
        -> ServiceResult<EnvironmentRes>;

    async fn delete_environment_by_code(&self, code: i64) -> ServiceResult<()>;

    /// Returns the code the backend assigned to the new environment.
    async fn create_environment(&self, form: &EnvironmentForm) -> ServiceResult<i64>;

    async fn update_environment(&self, code: i64, form: &EnvironmentForm) -> ServiceResult<()>;

    async fn query_environment_by_code(&self, code: i64) -> ServiceResult<EnvironmentItem>;

    async fn query_all_environment_list(&self) -> ServiceResult<Vec<EnvironmentItem>>;

    /// Succeeds when `name` is free to use for a new environment.
    async fn verify_environment(&self, name: &str) -> ServiceResult<()>;

    fn service_name(&self) -> &'static str;
}
