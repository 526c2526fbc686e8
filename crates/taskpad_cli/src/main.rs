use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::collections::HashMap;
use std::io::{self, BufRead};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use taskpad_cli::cli::{Cli, Command, to_index};
use taskpad_core::config::{self, Config, Palette};
use taskpad_core::error::AppError;
use taskpad_core::logging;
use taskpad_core::model::{Suggestion, Task};
use taskpad_core::storage::JsonFileStore;
use taskpad_core::task_api::TaskSession;

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "task")]
    text: String,
    #[tabled(rename = "created")]
    created_at: String,
}

fn status_label(completed: bool) -> &'static str {
    if completed { "done" } else { "open" }
}

fn print_tasks_table(tasks: &[Task], palette: &Palette) {
    if tasks.is_empty() {
        println!("No tasks yet.");
        return;
    }

    let rows: Vec<TaskRow> = tasks
        .iter()
        .enumerate()
        .map(|(index, task)| TaskRow {
            position: index + 1,
            status: if task.completed {
                palette.paint_done(status_label(true))
            } else {
                palette.paint_pending(status_label(false))
            },
            text: task.text.clone(),
            created_at: task.created_at.clone(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{table}");
}

fn print_tasks_json(tasks: &[Task]) {
    let payload: Vec<serde_json::Value> = tasks
        .iter()
        .enumerate()
        .map(|(index, task)| {
            serde_json::json!({
                "position": index + 1,
                "text": task.text,
                "completed": task.completed,
                "createdAt": task.created_at,
            })
        })
        .collect();
    println!("{}", serde_json::Value::Array(payload));
}

fn print_task_json(task: &Task) {
    let json = serde_json::json!({
        "text": task.text,
        "completed": task.completed,
        "createdAt": task.created_at,
    });
    println!("{}", json);
}

fn print_suggestions_plain(suggestions: &[Suggestion]) {
    for suggestion in suggestions {
        println!("{}", suggestion.text);
    }
}

fn print_suggestions_json(suggestions: &[Suggestion]) {
    let payload: Vec<serde_json::Value> = suggestions
        .iter()
        .map(|suggestion| {
            serde_json::json!({
                "text": suggestion.text,
                "completed": suggestion.completed,
            })
        })
        .collect();
    println!("{}", serde_json::Value::Array(payload));
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let summary = rendered.lines().next().unwrap_or("invalid command").trim();
    AppError::invalid_input(summary.strip_prefix("error: ").unwrap_or(summary))
}

/// Splits an interactive line into arguments. Double quotes group words and
/// may produce empty arguments; backslash escapes quotes inside them.
fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();
    let mut quoted = false;
    let mut saw_quotes = false;

    while let Some(ch) = chars.next() {
        match ch {
            '\\' if quoted => match chars.next() {
                Some(escaped @ ('"' | '\\')) => current.push(escaped),
                Some(other) => {
                    current.push('\\');
                    current.push(other);
                }
                None => current.push('\\'),
            },
            '"' => {
                quoted = !quoted;
                saw_quotes = true;
            }
            ch if ch.is_whitespace() && !quoted => {
                if saw_quotes || !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                    saw_quotes = false;
                }
            }
            ch => current.push(ch),
        }
    }

    if quoted {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }
    if saw_quotes || !current.is_empty() {
        tokens.push(current);
    }

    Ok(tokens)
}

/// Replaces the first token with its configured alias expansion, if any.
fn expand_alias(
    args: Vec<String>,
    aliases: &HashMap<String, String>,
) -> Result<Vec<String>, AppError> {
    let Some(first) = args.first() else {
        return Ok(args);
    };
    let Some(replacement) = aliases.get(first) else {
        return Ok(args);
    };

    let mut expanded = split_command_line(replacement)?;
    expanded.extend(args.into_iter().skip(1));
    Ok(expanded)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn open_session() -> Result<TaskSession<JsonFileStore>, AppError> {
    let store = JsonFileStore::open_default()?;
    TaskSession::load(store)
}

fn run_command(
    session: &mut TaskSession<JsonFileStore>,
    config: &Config,
    cli: Cli,
) -> Result<(), AppError> {
    let theme = cli.theme.as_deref().or(config.theme.as_deref());
    let palette = config::palette_for_theme(theme);

    match cli.command {
        Command::Add { text } => {
            let text = text.ok_or_else(|| AppError::invalid_input("task text is required"))?;
            let task = session.add(&text)?;
            if cli.json {
                print_task_json(&task);
            } else {
                println!("Added task: {}", task.text);
            }
        }
        Command::List => {
            if cli.json {
                print_tasks_json(session.tasks());
            } else {
                print_tasks_table(session.tasks(), &palette);
            }
        }
        Command::Toggle { position } => {
            let task = session.toggle(to_index(position)?)?;
            if cli.json {
                print_task_json(&task);
            } else {
                println!("Marked {}: {}", status_label(task.completed), task.text);
            }
        }
        Command::Edit { position, new_text } => {
            let current = session.begin_edit(to_index(position)?)?;
            match new_text {
                Some(text) => {
                    let task = session.save_edit(&text)?;
                    if cli.json {
                        print_task_json(&task);
                    } else {
                        println!("Updated task: {}", task.text);
                    }
                }
                None => {
                    if cli.json {
                        println!(
                            "{}",
                            serde_json::json!({ "editing": position, "text": current })
                        );
                    } else {
                        println!("Editing task {position}: {current}");
                        println!("Finish with save \"new text\" or cancel.");
                    }
                }
            }
        }
        Command::Save { text } => {
            let task = session.save_edit(&text)?;
            if cli.json {
                print_task_json(&task);
            } else {
                println!("Updated task: {}", task.text);
            }
        }
        Command::Cancel => {
            let had_edit = session.editing().is_some();
            session.cancel_edit();
            if cli.json {
                println!("{}", serde_json::json!({ "cancelled": had_edit }));
            } else if had_edit {
                println!("Edit cancelled.");
            } else {
                println!("No edit in progress.");
            }
        }
        Command::Delete { position } => {
            let task = session.delete(to_index(position)?)?;
            if cli.json {
                print_task_json(&task);
            } else {
                println!("Deleted task: {}", task.text);
            }
        }
        Command::Suggest => {
            let suggestions = session.suggestions();
            if cli.json {
                print_suggestions_json(&suggestions);
            } else {
                print_suggestions_plain(&suggestions);
            }
        }
    }

    Ok(())
}

fn run_interactive(config: &Config) -> Result<(), AppError> {
    let mut session = open_session()?;
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line).and_then(|args| expand_alias(args, &config.aliases))
        {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("taskpad".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                println!("{err}");
                continue;
            }
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = run_command(&mut session, config, cli) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn main() {
    let loaded = config::load_config_with_fallback();
    if let Some(err) = &loaded.error {
        eprintln!("WARN: using default config: {err}");
    }
    if let Err(err) = logging::init_from_env() {
        eprintln!("WARN: file logging disabled: {err}");
    }

    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = run_interactive(&loaded.config) {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{err}");
            return;
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    let result = open_session().and_then(|mut session| run_command(&mut session, &loaded.config, cli));
    if let Err(err) = result {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
