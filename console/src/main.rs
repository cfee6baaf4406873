use clap::{Parser, Subcommand};
use console::columns::{ActionControl, ActionKind, Cell};
use console::{
    checked_query, format_timestamp, render_table, ConsoleConfig, ConsoleError, ConsoleResult,
    EnvironmentTable, I18n,
};
use service::prelude::*;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "env-console")]
#[command(about = "Manage the worker environments of a workflow scheduler")]
struct Cli {
    /// TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Scheduler API base URL, e.g. http://host:12345/dolphinscheduler
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// API token
    #[arg(long, global = true)]
    token: Option<String>,
    /// Display language (en_US or zh_CN)
    #[arg(long, global = true)]
    locale: Option<Language>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one page of environments
    List {
        #[arg(long, default_value = "1")]
        page: u32,
        #[arg(long)]
        page_size: Option<u32>,
        /// Filter by name
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show a single environment
    Show {
        #[arg(long)]
        code: i64,
    },
    /// Create an environment
    Create {
        #[arg(long)]
        name: String,
        /// Environment config (shell exports)
        #[arg(long = "env-config")]
        env_config: String,
        #[arg(long)]
        description: Option<String>,
        /// Worker group; repeat for several
        #[arg(long = "worker-group")]
        worker_groups: Vec<String>,
    },
    /// Update an environment; omitted fields keep their current value
    Update {
        #[arg(long)]
        code: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "env-config")]
        env_config: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long = "worker-group")]
        worker_groups: Vec<String>,
    },
    /// Delete an environment
    Delete {
        #[arg(long)]
        code: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Page through environments interactively
    Browse,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ConsoleConfig::load(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(token) = cli.token {
        config.token = Some(token);
    }
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }
    config
        .validate()
        .map_err(|message| ConsoleError::Config { message })?;

    let service = RestEnvironmentService::new(config.service_config())?;
    let mut table = EnvironmentTable::new(Box::new(service), I18n::new(config.locale))
        .with_page_size(config.page_size);
    table.create_columns();

    match cli.command {
        Commands::List {
            page,
            page_size,
            search,
        } => {
            let query = checked_query(page, page_size.unwrap_or(config.page_size), search)?;
            table.get_table_data(query).await?;
            println!("{}", render_table(table.variables()));
        }
        Commands::Show { code } => {
            show_environment(&table, code).await?;
        }
        Commands::Create {
            name,
            env_config,
            description,
            worker_groups,
        } => {
            let form = EnvironmentForm::new(name, env_config)
                .with_description(description.unwrap_or_default())
                .with_worker_groups(worker_groups);
            table.handle_create();
            table.submit_modal(form).await?;
            println!("{}", render_table(table.variables()));
        }
        Commands::Update {
            code,
            name,
            env_config,
            description,
            worker_groups,
        } => {
            let item = table.service().query_environment_by_code(code).await?;
            let mut form = EnvironmentForm::from_item(&item);
            if let Some(name) = name {
                form.name = name;
            }
            if let Some(env_config) = env_config {
                form.config = env_config;
            }
            if let Some(description) = description {
                form.description = description;
            }
            if !worker_groups.is_empty() {
                form.worker_groups = worker_groups;
            }
            table.handle_edit(&item);
            table.submit_modal(form).await?;
            println!("{}", render_table(table.variables()));
        }
        Commands::Delete { code, yes } => {
            let item = table.service().query_environment_by_code(code).await?;
            let prompt = format!(
                "{} {}",
                item.name,
                table.i18n().t("security.environment.delete_confirm")
            );
            if yes || confirm(&prompt)? {
                table.handle_delete(&item).await?;
                println!("{}", render_table(table.variables()));
            } else {
                info!("Delete of environment {} cancelled", code);
            }
        }
        Commands::Browse => {
            browse(&mut table).await?;
        }
    }

    Ok(())
}

async fn show_environment(
    table: &EnvironmentTable,
    code: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let item = table.service().query_environment_by_code(code).await?;
    let i18n = table.i18n();

    println!("{}: {}", i18n.t("security.environment.environment_name"), item.name);
    println!("{}: {}", i18n.t("security.environment.environment_desc"), item.description);
    println!(
        "{}: {}",
        i18n.t("security.environment.worker_groups"),
        item.worker_groups.join(", ")
    );
    println!(
        "{}: {}",
        i18n.t("security.environment.create_time"),
        format_timestamp(&item.create_time)?
    );
    println!(
        "{}: {}",
        i18n.t("security.environment.update_time"),
        format_timestamp(&item.update_time)?
    );
    println!("{}:", i18n.t("security.environment.environment_config"));
    println!("{}", item.config);

    Ok(())
}

fn read_line(prompt: &str) -> io::Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn confirm(prompt: &str) -> io::Result<bool> {
    let answer = read_line(&format!("{} [y/N] ", prompt))?;
    Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Asks for each form field, keeping the current value on empty input.
fn prompt_form(i18n: &I18n, mut form: EnvironmentForm) -> io::Result<EnvironmentForm> {
    let ask = |key: &str, current: &str| -> io::Result<Option<String>> {
        let answer = read_line(&format!("{} [{}]: ", i18n.t(key), current))?;
        Ok((!answer.is_empty()).then_some(answer))
    };

    if let Some(name) = ask("security.environment.environment_name", &form.name)? {
        form.name = name;
    }
    if let Some(config) = ask("security.environment.environment_config", &form.config)? {
        form.config = config.replace("\\n", "\n");
    }
    if let Some(description) = ask("security.environment.environment_desc", &form.description)? {
        form.description = description;
    }
    if let Some(groups) = ask(
        "security.environment.worker_groups",
        &form.worker_groups.join(","),
    )? {
        form.worker_groups = groups
            .split(',')
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .collect();
    }

    Ok(form)
}

/// Row action from the rendered operation column, by 1-based row number.
fn row_action(table: &EnvironmentTable, row: &str, kind: ActionKind) -> Option<ActionControl> {
    let index = row.trim().parse::<usize>().ok()?.checked_sub(1)?;
    table
        .rendered_rows()
        .into_iter()
        .nth(index)?
        .into_iter()
        .find_map(|cell| match cell {
            Cell::Actions(actions) => actions.into_iter().find(|a| a.kind == kind),
            _ => None,
        })
}

async fn create_row(table: &mut EnvironmentTable) -> ConsoleResult<()> {
    table.handle_create();
    println!("{}", table.variables().status.title(table.i18n()));
    let form = prompt_form(table.i18n(), EnvironmentForm::default())?;
    table.submit_modal(form).await
}

async fn edit_row(table: &mut EnvironmentTable, control: &ActionControl) -> ConsoleResult<()> {
    table.dispatch(control).await?;
    let current = table.row_by_code(control.code)?.clone();
    println!("{}", table.variables().status.title(table.i18n()));
    let form = prompt_form(table.i18n(), EnvironmentForm::from_item(&current))?;
    table.submit_modal(form).await
}

async fn browse(table: &mut EnvironmentTable) -> Result<(), Box<dyn std::error::Error>> {
    table.refresh().await?;
    println!("Commands: n(ext) p(rev) s <text> c(reate) e <row> d <row> r(efresh) q(uit)\n");

    loop {
        println!("{}", render_table(table.variables()));

        let input = read_line("> ")?;
        let (command, arg) = input
            .split_once(' ')
            .map(|(c, a)| (c, a.trim()))
            .unwrap_or((input.as_str(), ""));

        let result = match command {
            "" => continue,
            "q" | "quit" | "exit" => break,
            "n" => table.next_page().await,
            "p" => table.prev_page().await,
            "r" => table.refresh().await,
            "s" => table.search(arg).await,
            "c" => create_row(table).await,
            "e" => match row_action(table, arg, ActionKind::Edit) {
                Some(control) => edit_row(table, &control).await,
                None => {
                    println!("No row {}", arg);
                    continue;
                }
            },
            "d" => match row_action(table, arg, ActionKind::Delete) {
                Some(control) => {
                    let prompt = control.confirm.clone().unwrap_or_default();
                    if confirm(&prompt)? {
                        table.dispatch(&control).await
                    } else {
                        Ok(())
                    }
                }
                None => {
                    println!("No row {}", arg);
                    continue;
                }
            },
            other => {
                println!("Unknown command: {}", other);
                continue;
            }
        };

        if let Err(e) = result {
            table.cancel_modal();
            error!("{}", e);
            println!("✗ {}", e);
        }
    }

    Ok(())
}
