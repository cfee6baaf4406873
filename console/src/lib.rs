//! Worker environment console
//!
//! Table view over the scheduler's environment resource: paginated listing,
//! create/edit modal state, delete with confirmation, plus the text renderer
//! and configuration used by the `env-console` binary.

pub mod columns;
pub mod config;
pub mod error;
pub mod i18n;
pub mod modal;
pub mod render;
pub mod table;
pub mod time_format;

pub use columns::{
    create_columns, ActionControl, ActionKind, Cell, Column, ControlSize, Field, Renderer, Tag,
    TagType,
};
pub use config::ConsoleConfig;
pub use error::{ConsoleError, ConsoleResult};
pub use i18n::I18n;
pub use modal::ModalStatus;
pub use render::render_table;
pub use table::{checked_query, page_after_delete, EnvironmentTable, TableVariables};
pub use time_format::{format_timestamp, DISPLAY_PATTERN};
