use crate::client::{EnvironmentService, ServiceError, ServiceResult};
use crate::config::ServiceConfig;
use crate::types::{ApiEnvelope, EnvironmentForm, EnvironmentItem, EnvironmentRes, ListQuery};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

const LIST_PAGING_PATH: &str = "/environment/list-paging";
const DELETE_PATH: &str = "/environment/delete";
const CREATE_PATH: &str = "/environment/create";
const UPDATE_PATH: &str = "/environment/update";
const QUERY_BY_CODE_PATH: &str = "/environment/query-by-code";
const QUERY_ALL_PATH: &str = "/environment/query-environment-list";
const VERIFY_PATH: &str = "/environment/verify-environment";

/// Environment service backed by the scheduler's REST API.
pub struct RestEnvironmentService {
    client: reqwest::Client,
    config: ServiceConfig,
}

impl RestEnvironmentService {
    pub fn new(config: ServiceConfig) -> ServiceResult<Self> {
        config
            .validate()
            .map_err(|msg| ServiceError::InvalidConfig { message: msg })?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(Self::default_headers(&config)?)
            .build()
            .map_err(|e| ServiceError::InvalidConfig {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client, config })
    }

    pub fn with_default_config() -> ServiceResult<Self> {
        Self::new(ServiceConfig::default())
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn default_headers(config: &ServiceConfig) -> ServiceResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "language",
            HeaderValue::from_static(config.language.as_header()),
        );

        if let Some(token) = &config.token {
            let mut value = Self::header_value(token)?;
            value.set_sensitive(true);
            headers.insert("token", value);
        }

        if let Some(session_id) = &config.session_id {
            let mut value = Self::header_value(&format!("sessionId={}", session_id))?;
            value.set_sensitive(true);
            headers.insert(COOKIE, value);
        }

        Ok(headers)
    }

    fn header_value(raw: &str) -> ServiceResult<HeaderValue> {
        HeaderValue::from_str(raw).map_err(|e| ServiceError::InvalidConfig {
            message: format!("Invalid credential header: {}", e),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn handle_http_error(err: reqwest::Error) -> ServiceError {
        if err.is_timeout() {
            ServiceError::ServiceUnavailable {
                message: "Request timeout".to_string(),
            }
        } else if err.is_connect() {
            ServiceError::ServiceUnavailable {
                message: "Cannot connect to scheduler API".to_string(),
            }
        } else if let Some(status) = err.status() {
            match status.as_u16() {
                401 | 403 => ServiceError::Authentication,
                503 => ServiceError::ServiceUnavailable {
                    message: "Scheduler API unavailable".to_string(),
                },
                _ => ServiceError::Network(err),
            }
        } else {
            ServiceError::Network(err)
        }
    }

    /// Maps the HTTP status, then unwraps the JSON envelope.
    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
        path: &str,
    ) -> ServiceResult<ApiEnvelope<T>> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("{} returned HTTP {}", path, status);
            return Err(match status.as_u16() {
                401 | 403 => ServiceError::Authentication,
                404 => ServiceError::NotFound {
                    resource: path.to_string(),
                },
                503 => ServiceError::ServiceUnavailable {
                    message: format!("Scheduler API unavailable: {}", error_text),
                },
                code => ServiceError::Http {
                    status: code,
                    message: error_text,
                },
            });
        }

        let body = response.text().await.map_err(Self::handle_http_error)?;
        let envelope: ApiEnvelope<T> = serde_json::from_str(&body)?;
        if !envelope.is_success() {
            warn!(
                "{} rejected with code {}: {}",
                path, envelope.code, envelope.msg
            );
        }
        Ok(envelope)
    }

    async fn get<T: DeserializeOwned, Q: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> ServiceResult<ApiEnvelope<T>> {
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(Self::handle_http_error)?;
        Self::decode(response, path).await
    }

    async fn post_form<T: DeserializeOwned, F: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        form: &F,
    ) -> ServiceResult<ApiEnvelope<T>> {
        let response = self
            .client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .map_err(Self::handle_http_error)?;
        Self::decode(response, path).await
    }
}

#[async_trait]
impl EnvironmentService for RestEnvironmentService {
    async fn query_environment_list_paging(
        &self,
        query: ListQuery,
    ) -> ServiceResult<EnvironmentRes> {
        debug!(
            "Querying environments page {} (size {}, search {:?})",
            query.page_no, query.page_size, query.search_val
        );

        let page: EnvironmentRes = self
            .get(LIST_PAGING_PATH, &query)
            .await?
            .into_data("list-paging")?;

        info!(
            "Retrieved {} environments (page {} of {})",
            page.total_list.len(),
            query.page_no,
            page.total_page
        );
        Ok(page)
    }

    async fn delete_environment_by_code(&self, code: i64) -> ServiceResult<()> {
        debug!("Deleting environment {}", code);

        let result = self
            .post_form::<serde_json::Value, _>(DELETE_PATH, &[("environmentCode", code)])
            .await?
            .into_status();

        match &result {
            Ok(()) => info!("Deleted environment {}", code),
            Err(e) => error!("Failed to delete environment {}: {}", code, e),
        }
        result
    }

    async fn create_environment(&self, form: &EnvironmentForm) -> ServiceResult<i64> {
        debug!("Creating environment {}", form.name);

        let code: i64 = self
            .post_form(CREATE_PATH, &form.to_params(None)?)
            .await?
            .into_data("create")?;

        info!("Created environment {} with code {}", form.name, code);
        Ok(code)
    }

    async fn update_environment(&self, code: i64, form: &EnvironmentForm) -> ServiceResult<()> {
        debug!("Updating environment {}", code);

        self.post_form::<serde_json::Value, _>(UPDATE_PATH, &form.to_params(Some(code))?)
            .await?
            .into_status()?;

        info!("Updated environment {}", code);
        Ok(())
    }

    async fn query_environment_by_code(&self, code: i64) -> ServiceResult<EnvironmentItem> {
        debug!("Querying environment {}", code);

        self.get(QUERY_BY_CODE_PATH, &[("environmentCode", code)])
            .await?
            .into_data("query-by-code")
    }

    async fn query_all_environment_list(&self) -> ServiceResult<Vec<EnvironmentItem>> {
        debug!("Querying all environments");

        let items: Vec<EnvironmentItem> = self
            .get(QUERY_ALL_PATH, &[] as &[(&str, &str)])
            .await?
            .into_data("query-environment-list")?;

        info!("Retrieved {} environments", items.len());
        Ok(items)
    }

    async fn verify_environment(&self, name: &str) -> ServiceResult<()> {
        debug!("Verifying environment name {}", name);

        self.post_form::<serde_json::Value, _>(VERIFY_PATH, &[("environmentName", name)])
            .await?
            .into_status()
    }

    fn service_name(&self) -> &'static str {
        "rest"
    }
}
