//! Plain-text layout of the environment table.

use crate::columns::Cell;
use crate::table::TableVariables;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Widest a single cell may grow before it is truncated.
const MAX_CELL_WIDTH: usize = 40;
const COLUMN_GAP: &str = "  ";

fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::Text(text) => {
            let mut lines = text.lines();
            let first = lines.next().unwrap_or_default();
            if lines.next().is_some() {
                format!("{} ↵", first)
            } else {
                first.to_string()
            }
        }
        Cell::Tags(tags) => tags
            .iter()
            .map(|tag| format!("[{}]", tag.label))
            .collect::<Vec<_>>()
            .join(" "),
        Cell::Actions(actions) => actions
            .iter()
            .map(|action| format!("[{}]", action.tooltip))
            .collect::<Vec<_>>()
            .join(" "),
    }
}

fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }

    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w + 1 > max_width {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push('…');
    out
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

/// Lays out the columns and rows in `variables` as an aligned text grid with
/// a page footer.
pub fn render_table(variables: &TableVariables) -> String {
    let titles: Vec<String> = variables
        .columns
        .iter()
        .map(|column| truncate(&column.title, MAX_CELL_WIDTH))
        .collect();

    let rows: Vec<Vec<String>> = variables
        .table_data
        .iter()
        .enumerate()
        .map(|(index, row)| {
            variables
                .columns
                .iter()
                .map(|column| {
                    truncate(&cell_text(&column.render(row, index)), MAX_CELL_WIDTH)
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            rows.iter()
                .map(|row| row[i].width())
                .chain(std::iter::once(title.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| pad(cell, *width))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP)
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 3);
    lines.push(format_line(titles.as_slice()));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP),
    );
    lines.extend(rows.iter().map(|row| format_line(row.as_slice())));
    lines.push(format!("{} / {}", variables.page, variables.total_page.max(1)));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::create_columns;
    use crate::i18n::I18n;
    use service::{EnvironmentItem, Language};

    fn variables_with(rows: Vec<EnvironmentItem>, language: Language) -> TableVariables {
        TableVariables {
            columns: create_columns(&I18n::new(language)),
            table_data: rows,
            total_page: 3,
            page: 2,
            ..TableVariables::default()
        }
    }

    #[test]
    fn test_render_rows_and_footer() {
        let row = EnvironmentItem::new(
            1,
            "jdk8",
            "export JAVA_HOME=/opt/jdk8\nexport PATH=$JAVA_HOME/bin:$PATH",
        )
        .with_worker_groups(vec!["default".to_string(), "gpu".to_string()])
        .with_times("2022-03-08 14:05:33", "2022-03-09 09:00:00");
        let output = render_table(&variables_with(vec![row], Language::EnUs));
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("#  Environment Name"));
        assert!(lines[2].contains("jdk8"));
        assert!(lines[2].contains("export JAVA_HOME=/opt/jdk8 ↵"));
        assert!(lines[2].contains("[default] [gpu]"));
        assert!(lines[2].ends_with("[Edit] [Delete]"));
        assert_eq!(lines[3], "2 / 3");
    }

    #[test]
    fn test_columns_align_with_wide_titles() {
        let row = EnvironmentItem::new(1, "a", "b").with_times("t", "t");
        let output = render_table(&variables_with(vec![row], Language::ZhCn));
        let lines: Vec<&str> = output.lines().collect();

        let header_config = lines[0].find("环境配置").unwrap();
        let row_config = lines[2].find('b').unwrap();
        assert_eq!(
            lines[0][..header_config].width(),
            lines[2][..row_config].width()
        );
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
        assert_eq!(truncate("环境名称环境", 5), "环境…");
    }

    #[test]
    fn test_empty_table() {
        let output = render_table(&variables_with(Vec::new(), Language::EnUs));
        assert_eq!(output.lines().count(), 3);
        assert!(output.ends_with("2 / 3"));
    }
}
