//! Column descriptors for the environment table.
//!
//! Each column knows its translated title, its row key and how to turn a row
//! into a [`Cell`]. The operation column always yields exactly one edit and
//! one delete control per row.

use crate::i18n::I18n;
use service::EnvironmentItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Config,
    Description,
    CreateTime,
    UpdateTime,
}

impl Field {
    fn value<'a>(&self, row: &'a EnvironmentItem) -> &'a str {
        match self {
            Field::Name => &row.name,
            Field::Config => &row.config,
            Field::Description => &row.description,
            Field::CreateTime => &row.create_time,
            Field::UpdateTime => &row.update_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Renderer {
    /// 1-based position on the current page.
    Index,
    Field(Field),
    WorkerGroups,
    Operation {
        edit: String,
        delete: String,
        delete_confirm: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagType {
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSize {
    Small,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub label: String,
    pub tag_type: TagType,
    pub size: ControlSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Edit,
    Delete,
}

/// A row-level button. `confirm` is set when the action needs a yes/no
/// prompt before it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionControl {
    pub kind: ActionKind,
    pub tooltip: String,
    pub confirm: Option<String>,
    pub size: ControlSize,
    pub code: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Tags(Vec<Tag>),
    Actions(Vec<ActionControl>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub title: String,
    pub key: &'static str,
    pub class_name: Option<&'static str>,
    pub renderer: Renderer,
}

impl Column {
    fn new(title: impl Into<String>, key: &'static str, renderer: Renderer) -> Self {
        Self {
            title: title.into(),
            key,
            class_name: None,
            renderer,
        }
    }

    fn with_class_name(mut self, class_name: &'static str) -> Self {
        self.class_name = Some(class_name);
        self
    }

    /// Renders `row`, found at zero-based `index` on the page.
    pub fn render(&self, row: &EnvironmentItem, index: usize) -> Cell {
        match &self.renderer {
            Renderer::Index => Cell::Text((index + 1).to_string()),
            Renderer::Field(field) => Cell::Text(field.value(row).to_string()),
            Renderer::WorkerGroups => Cell::Tags(
                row.worker_groups
                    .iter()
                    .map(|group| Tag {
                        label: group.clone(),
                        tag_type: TagType::Success,
                        size: ControlSize::Small,
                    })
                    .collect(),
            ),
            Renderer::Operation {
                edit,
                delete,
                delete_confirm,
            } => Cell::Actions(vec![
                ActionControl {
                    kind: ActionKind::Edit,
                    tooltip: edit.clone(),
                    confirm: None,
                    size: ControlSize::Small,
                    code: row.code,
                },
                ActionControl {
                    kind: ActionKind::Delete,
                    tooltip: delete.clone(),
                    confirm: Some(delete_confirm.clone()),
                    size: ControlSize::Small,
                    code: row.code,
                },
            ]),
        }
    }
}

pub fn create_columns(i18n: &I18n) -> Vec<Column> {
    vec![
        Column::new("#", "index", Renderer::Index),
        Column::new(
            i18n.t("security.environment.environment_name"),
            "name",
            Renderer::Field(Field::Name),
        )
        .with_class_name("environment-name"),
        Column::new(
            i18n.t("security.environment.environment_config"),
            "config",
            Renderer::Field(Field::Config),
        ),
        Column::new(
            i18n.t("security.environment.environment_desc"),
            "description",
            Renderer::Field(Field::Description),
        ),
        Column::new(
            i18n.t("security.environment.worker_groups"),
            "workerGroups",
            Renderer::WorkerGroups,
        ),
        Column::new(
            i18n.t("security.environment.create_time"),
            "createTime",
            Renderer::Field(Field::CreateTime),
        ),
        Column::new(
            i18n.t("security.environment.update_time"),
            "updateTime",
            Renderer::Field(Field::UpdateTime),
        ),
        Column::new(
            i18n.t("security.environment.operation"),
            "operation",
            Renderer::Operation {
                edit: i18n.t("security.environment.edit").to_string(),
                delete: i18n.t("security.environment.delete").to_string(),
                delete_confirm: i18n.t("security.environment.delete_confirm").to_string(),
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use service::Language;

    fn sample_row() -> EnvironmentItem {
        EnvironmentItem::new(42, "jdk8", "export JAVA_HOME=/opt/jdk8")
            .with_description("java 8")
            .with_worker_groups(vec!["default".to_string(), "gpu".to_string()])
            .with_times("2022-03-08 14:05:33", "2022-03-09 09:00:00")
    }

    #[test]
    fn test_column_order_and_keys() {
        let columns = create_columns(&I18n::default());
        let keys: Vec<&str> = columns.iter().map(|c| c.key).collect();
        assert_eq!(
            keys,
            vec![
                "index",
                "name",
                "config",
                "description",
                "workerGroups",
                "createTime",
                "updateTime",
                "operation"
            ]
        );
        assert_eq!(columns[0].title, "#");
        assert_eq!(columns[1].class_name, Some("environment-name"));
        assert!(columns[2].class_name.is_none());
    }

    #[test]
    fn test_titles_follow_language() {
        let columns = create_columns(&I18n::new(Language::ZhCn));
        assert_eq!(columns[1].title, "环境名称");
        assert_eq!(columns[7].title, "操作");
    }

    #[test]
    fn test_index_is_one_based() {
        let columns = create_columns(&I18n::default());
        assert_eq!(
            columns[0].render(&sample_row(), 0),
            Cell::Text("1".to_string())
        );
        assert_eq!(
            columns[0].render(&sample_row(), 9),
            Cell::Text("10".to_string())
        );
    }

    #[test]
    fn test_worker_group_tags_keep_order() {
        let columns = create_columns(&I18n::default());
        match columns[4].render(&sample_row(), 0) {
            Cell::Tags(tags) => {
                let labels: Vec<&str> = tags.iter().map(|t| t.label.as_str()).collect();
                assert_eq!(labels, vec!["default", "gpu"]);
                assert!(tags
                    .iter()
                    .all(|t| t.tag_type == TagType::Success && t.size == ControlSize::Small));
            }
            other => panic!("expected tags, got {:?}", other),
        }
    }

    #[test]
    fn test_operation_has_one_edit_and_one_delete() {
        let columns = create_columns(&I18n::default());
        let row = sample_row();
        match columns[7].render(&row, 3) {
            Cell::Actions(actions) => {
                assert_eq!(actions.len(), 2);
                let edits = actions.iter().filter(|a| a.kind == ActionKind::Edit).count();
                let deletes = actions
                    .iter()
                    .filter(|a| a.kind == ActionKind::Delete)
                    .count();
                assert_eq!((edits, deletes), (1, 1));
                assert!(actions.iter().all(|a| a.code == 42));
                assert_eq!(actions[0].tooltip, "Edit");
                assert_eq!(actions[0].confirm, None);
                assert_eq!(actions[1].tooltip, "Delete");
                assert_eq!(actions[1].confirm.as_deref(), Some("Delete?"));
            }
            other => panic!("expected actions, got {:?}", other),
        }
    }

    #[test]
    fn test_field_cells() {
        let columns = create_columns(&I18n::default());
        let row = sample_row();
        assert_eq!(columns[1].render(&row, 0), Cell::Text("jdk8".to_string()));
        assert_eq!(columns[3].render(&row, 0), Cell::Text("java 8".to_string()));
        assert_eq!(
            columns[6].render(&row, 0),
            Cell::Text("2022-03-09 09:00:00".to_string())
        );
    }
}
