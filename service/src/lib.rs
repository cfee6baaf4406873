pub mod client;
pub mod config;
pub mod rest;
pub mod types;

pub use client::{EnvironmentService, ServiceError, ServiceResult};
pub use config::{Language, ServiceConfig};
pub use rest::RestEnvironmentService;
pub use types::{
    ApiEnvelope, EnvironmentForm, EnvironmentItem, EnvironmentRes, FormField, ListQuery,
    SUCCESS_CODE,
};

pub mod prelude {
    pub use crate::client::*;
    pub use crate::config::*;
    pub use crate::rest::*;
    pub use crate::types::*;
}
