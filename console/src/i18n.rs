//! Message dictionaries for the environment view.

use service::Language;

const EN_US: &[(&str, &str)] = &[
    ("security.environment.environment_name", "Environment Name"),
    ("security.environment.environment_config", "Environment Config"),
    ("security.environment.environment_desc", "Environment Desc"),
    ("security.environment.worker_groups", "Worker Groups"),
    ("security.environment.create_time", "Create Time"),
    ("security.environment.update_time", "Update Time"),
    ("security.environment.operation", "Operation"),
    ("security.environment.edit", "Edit"),
    ("security.environment.delete", "Delete"),
    ("security.environment.delete_confirm", "Delete?"),
    ("security.environment.create_environment", "Create Environment"),
    ("security.environment.edit_environment", "Edit Environment"),
    ("security.environment.search_tips", "Please enter keywords"),
    (
        "security.environment.environment_name_tips",
        "Please enter your environment name",
    ),
    (
        "security.environment.environment_config_tips",
        "Please enter your environment config",
    ),
    (
        "security.environment.environment_description_tips",
        "Please enter your environment description",
    ),
    (
        "security.environment.worker_group_tips",
        "Please select worker group",
    ),
];

const ZH_CN: &[(&str, &str)] = &[
    ("security.environment.environment_name", "环境名称"),
    ("security.environment.environment_config", "环境配置"),
    ("security.environment.environment_desc", "环境描述"),
    ("security.environment.worker_groups", "Worker分组"),
    ("security.environment.create_time", "创建时间"),
    ("security.environment.update_time", "更新时间"),
    ("security.environment.operation", "操作"),
    ("security.environment.edit", "编辑"),
    ("security.environment.delete", "删除"),
    ("security.environment.delete_confirm", "确定删除吗?"),
    ("security.environment.create_environment", "创建环境"),
    ("security.environment.edit_environment", "编辑环境"),
    ("security.environment.search_tips", "请输入关键词"),
    ("security.environment.environment_name_tips", "请输入环境名"),
    ("security.environment.environment_config_tips", "请输入环境配置"),
    (
        "security.environment.environment_description_tips",
        "请输入环境描述",
    ),
    ("security.environment.worker_group_tips", "请选择Worker分组"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct I18n {
    language: Language,
}

impl I18n {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Looks `key` up in the active dictionary; unknown keys come back as-is.
    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        let dictionary = match self.language {
            Language::EnUs => EN_US,
            Language::ZhCn => ZH_CN,
        };
        dictionary
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .unwrap_or(key)
    }
}
