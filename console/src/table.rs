//! State and operations behind the environment table.
//!
//! [`TableVariables`] is the plain state the view renders from. All mutation
//! goes through [`EnvironmentTable`], which owns the state together with the
//! service it fetches from.

use crate::columns::{create_columns, ActionControl, ActionKind, Cell, Column};
use crate::config::check_page_size;
use crate::error::{ConsoleError, ConsoleResult};
use crate::i18n::I18n;
use crate::modal::{check_form, ModalStatus};
use crate::time_format::format_timestamp;
use service::{EnvironmentForm, EnvironmentItem, EnvironmentService, ListQuery};
use tracing::{debug, info};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct TableVariables {
    pub columns: Vec<Column>,
    pub table_data: Vec<EnvironmentItem>,
    pub page: u32,
    pub page_size: u32,
    pub search_val: Option<String>,
    pub total_page: u32,
    pub show_modal: bool,
    pub status: ModalStatus,
    pub row: Option<EnvironmentItem>,
}

impl Default for TableVariables {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            table_data: Vec::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search_val: None,
            total_page: 1,
            show_modal: false,
            status: ModalStatus::Create,
            row: None,
        }
    }
}

/// Page to re-request after deleting one row from `page`.
///
/// Removing the only row of a page past the first steps back one page so the
/// view never lands on an empty trailing page.
pub fn page_after_delete(rows_on_page: usize, page: u32) -> u32 {
    if rows_on_page == 1 && page > 1 {
        page - 1
    } else {
        page
    }
}

/// Builds a list query, rejecting page 0 and page sizes outside
/// `1..=MAX_PAGE_SIZE`.
pub fn checked_query(
    page_no: u32,
    page_size: u32,
    search_val: Option<String>,
) -> ConsoleResult<ListQuery> {
    if page_no == 0 {
        return Err(ConsoleError::Config {
            message: "Page number must be at least 1".to_string(),
        });
    }
    check_page_size(page_size).map_err(|message| ConsoleError::Config { message })?;
    Ok(ListQuery::new(page_no, page_size).with_search(search_val))
}

pub struct EnvironmentTable {
    service: Box<dyn EnvironmentService>,
    i18n: I18n,
    variables: TableVariables,
}

impl EnvironmentTable {
    pub fn new(service: Box<dyn EnvironmentService>, i18n: I18n) -> Self {
        Self {
            service,
            i18n,
            variables: TableVariables::default(),
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.variables.page_size = page_size;
        self
    }

    pub fn variables(&self) -> &TableVariables {
        &self.variables
    }

    pub fn i18n(&self) -> &I18n {
        &self.i18n
    }

    pub fn service(&self) -> &dyn EnvironmentService {
        self.service.as_ref()
    }

    pub fn create_columns(&mut self) {
        self.variables.columns = create_columns(&self.i18n);
    }

    /// Opens the modal in edit mode for `row`.
    pub fn handle_edit(&mut self, row: &EnvironmentItem) {
        debug!("Editing environment {}", row.code);
        self.variables.show_modal = true;
        self.variables.status = ModalStatus::Edit;
        self.variables.row = Some(row.clone());
    }

    pub fn handle_create(&mut self) {
        self.variables.show_modal = true;
        self.variables.status = ModalStatus::Create;
        self.variables.row = None;
    }

    pub fn cancel_modal(&mut self) {
        self.variables.show_modal = false;
    }

    /// Deletes `row` and re-fetches, stepping back a page when `row` was the
    /// last one on a page past the first.
    pub async fn handle_delete(&mut self, row: &EnvironmentItem) -> ConsoleResult<()> {
        self.service.delete_environment_by_code(row.code).await?;
        info!("Environment {} ({}) deleted", row.name, row.code);

        let page_no = page_after_delete(self.variables.table_data.len(), self.variables.page);
        let query = ListQuery::new(page_no, self.variables.page_size)
            .with_search(self.variables.search_val.clone());
        self.get_table_data(query).await
    }

    /// Fetches one page and stores it with display-formatted timestamps.
    ///
    /// On error the previously loaded rows stay in place.
    pub async fn get_table_data(&mut self, query: ListQuery) -> ConsoleResult<()> {
        debug!(
            "Loading page {} (size {}) from {}",
            query.page_no,
            query.page_size,
            self.service.service_name()
        );

        let res = self
            .service
            .query_environment_list_paging(query.clone())
            .await?;

        let rows = res
            .total_list
            .into_iter()
            .map(|mut item| {
                item.create_time = format_timestamp(&item.create_time)?;
                item.update_time = format_timestamp(&item.update_time)?;
                Ok(item)
            })
            .collect::<ConsoleResult<Vec<_>>>()?;

        self.variables.table_data = rows;
        self.variables.total_page = res.total_page;
        self.variables.page = query.page_no;
        self.variables.page_size = query.page_size;
        self.variables.search_val = query.search_val;
        Ok(())
    }

    pub fn current_query(&self) -> ListQuery {
        ListQuery::new(self.variables.page, self.variables.page_size)
            .with_search(self.variables.search_val.clone())
    }

    pub async fn refresh(&mut self) -> ConsoleResult<()> {
        self.get_table_data(self.current_query()).await
    }

    /// Filters by `value` starting from the first page. Blank input clears
    /// the filter.
    pub async fn search(&mut self, value: &str) -> ConsoleResult<()> {
        let value = value.trim();
        let search_val = (!value.is_empty()).then(|| value.to_string());
        self.get_table_data(ListQuery::new(1, self.variables.page_size).with_search(search_val))
            .await
    }

    pub async fn go_to_page(&mut self, page: u32) -> ConsoleResult<()> {
        let page = page.clamp(1, self.variables.total_page.max(1));
        self.get_table_data(
            ListQuery::new(page, self.variables.page_size)
                .with_search(self.variables.search_val.clone()),
        )
        .await
    }

    pub async fn next_page(&mut self) -> ConsoleResult<()> {
        self.go_to_page(self.variables.page.saturating_add(1)).await
    }

    pub async fn prev_page(&mut self) -> ConsoleResult<()> {
        self.go_to_page(self.variables.page.saturating_sub(1)).await
    }

    pub async fn change_page_size(&mut self, page_size: u32) -> ConsoleResult<()> {
        let query = checked_query(1, page_size, self.variables.search_val.clone())?;
        self.get_table_data(query).await
    }

    /// Creates or updates from the open modal, then closes it and reloads the
    /// current page.
    pub async fn submit_modal(&mut self, form: EnvironmentForm) -> ConsoleResult<()> {
        if !self.variables.show_modal {
            return Err(ConsoleError::InvalidForm {
                message: "No create or edit in progress".to_string(),
            });
        }
        check_form(&form, &self.i18n)?;

        match self.variables.status {
            ModalStatus::Create => {
                self.service.verify_environment(form.name.trim()).await?;
                let code = self.service.create_environment(&form).await?;
                info!("Environment {} created with code {}", form.name, code);
            }
            ModalStatus::Edit => {
                let code = self
                    .variables
                    .row
                    .as_ref()
                    .map(|row| row.code)
                    .ok_or_else(|| ConsoleError::InvalidForm {
                        message: "No environment selected for edit".to_string(),
                    })?;
                self.service.update_environment(code, &form).await?;
                info!("Environment {} updated", code);
            }
        }

        self.cancel_modal();
        self.refresh().await
    }

    /// Row at zero-based `index` of the current page.
    pub fn row(&self, index: usize) -> ConsoleResult<&EnvironmentItem> {
        self.variables
            .table_data
            .get(index)
            .ok_or(ConsoleError::RowOutOfRange {
                index,
                len: self.variables.table_data.len(),
            })
    }

    pub fn row_by_code(&self, code: i64) -> ConsoleResult<&EnvironmentItem> {
        self.variables
            .table_data
            .iter()
            .find(|row| row.code == code)
            .ok_or(ConsoleError::UnknownCode { code })
    }

    /// Runs a row action. Delete confirmation is the caller's job.
    pub async fn dispatch(&mut self, control: &ActionControl) -> ConsoleResult<()> {
        let row = self.row_by_code(control.code)?.clone();
        match control.kind {
            ActionKind::Edit => {
                self.handle_edit(&row);
                Ok(())
            }
            ActionKind::Delete => self.handle_delete(&row).await,
        }
    }

    /// Every column rendered for every row on the page.
    pub fn rendered_rows(&self) -> Vec<Vec<Cell>> {
        self.variables
            .table_data
            .iter()
            .enumerate()
            .map(|(index, row)| {
                self.variables
                    .columns
                    .iter()
                    .map(|column| column.render(row, index))
                    .collect()
            })
            .collect()
    }
}
