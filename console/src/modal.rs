use crate::error::{ConsoleError, ConsoleResult};
use crate::i18n::I18n;
use service::{EnvironmentForm, FormField};

/// Which way the create/edit modal was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalStatus {
    #[default]
    Create,
    Edit,
}

impl ModalStatus {
    pub fn title<'a>(&self, i18n: &'a I18n) -> &'a str {
        match self {
            ModalStatus::Create => i18n.t("security.environment.create_environment"),
            ModalStatus::Edit => i18n.t("security.environment.edit_environment"),
        }
    }
}

/// Validates `form`, reporting the first missing field with its hint text.
pub fn check_form(form: &EnvironmentForm, i18n: &I18n) -> ConsoleResult<()> {
    form.validate().map_err(|field| {
        let key = match field {
            FormField::Name => "security.environment.environment_name_tips",
            FormField::Config => "security.environment.environment_config_tips",
        };
        ConsoleError::InvalidForm {
            message: i18n.t(key).to_string(),
        }
    })
}
