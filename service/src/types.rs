use crate::client::{ServiceError, ServiceResult};
use serde::{Deserialize, Deserializer, Serialize};

/// Envelope code the backend uses for a successful call.
pub const SUCCESS_CODE: i32 = 0;

/// Treats an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentItem {
    #[serde(default)]
    pub id: i64,
    pub code: i64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub config: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub worker_groups: Vec<String>,
    #[serde(default)]
    pub operator: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub create_time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub update_time: String,
}

impl EnvironmentItem {
    pub fn new(code: i64, name: impl Into<String>, config: impl Into<String>) -> Self {
        Self {
            id: code,
            code,
            name: name.into(),
            config: config.into(),
            description: String::new(),
            worker_groups: Vec::new(),
            operator: None,
            create_time: String::new(),
            update_time: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_worker_groups(mut self, worker_groups: Vec<String>) -> Self {
        self.worker_groups = worker_groups;
        self
    }

    pub fn with_times(
        mut self,
        create_time: impl Into<String>,
        update_time: impl Into<String>,
    ) -> Self {
        self.create_time = create_time.into();
        self.update_time = update_time.into();
        self
    }
}

/// One page of environments as returned by the paging query.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentRes {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_list: Vec<EnvironmentItem>,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub total_page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub current_page: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page_no: u32,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_val: Option<String>,
}

impl ListQuery {
    pub fn new(page_no: u32, page_size: u32) -> Self {
        Self {
            page_no,
            page_size,
            search_val: None,
        }
    }

    pub fn with_search(mut self, search_val: Option<String>) -> Self {
        self.search_val = search_val;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Config,
}

/// Fields submitted when creating or updating an environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentForm {
    pub name: String,
    pub config: String,
    pub description: String,
    pub worker_groups: Vec<String>,
}

impl EnvironmentForm {
    pub fn new(name: impl Into<String>, config: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: config.into(),
            ..Self::default()
        }
    }

    pub fn from_item(item: &EnvironmentItem) -> Self {
        Self {
            name: item.name.clone(),
            config: item.config.clone(),
            description: item.description.clone(),
            worker_groups: item.worker_groups.clone(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_worker_groups(mut self, worker_groups: Vec<String>) -> Self {
        self.worker_groups = worker_groups;
        self
    }

    /// Reports the first required field left blank.
    pub fn validate(&self) -> Result<(), FormField> {
        if self.name.trim().is_empty() {
            return Err(FormField::Name);
        }
        if self.config.trim().is_empty() {
            return Err(FormField::Config);
        }
        Ok(())
    }

    /// Form parameters in the order the backend documents them.
    /// Worker groups travel as a JSON array encoded into a single field.
    pub fn to_params(&self, code: Option<i64>) -> ServiceResult<Vec<(&'static str, String)>> {
        let mut params = Vec::with_capacity(5);
        if let Some(code) = code {
            params.push(("code", code.to_string()));
        }
        params.push(("name", self.name.trim().to_string()));
        params.push(("config", self.config.clone()));
        params.push(("description", self.description.clone()));
        params.push(("workerGroups", serde_json::to_string(&self.worker_groups)?));
        Ok(params)
    }
}

/// `{code, msg, data}` wrapper around every backend response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub code: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub msg: String,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    pub fn into_data(self, operation: &str) -> ServiceResult<T> {
        if !self.is_success() {
            return Err(ServiceError::Api {
                code: self.code,
                message: self.msg,
            });
        }
        self.data.ok_or_else(|| ServiceError::MissingData {
            operation: operation.to_string(),
        })
    }

    pub fn into_status(self) -> ServiceResult<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(ServiceError::Api {
                code: self.code,
                message: self.msg,
            })
        }
    }
}
