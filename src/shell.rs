use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};
use colored::*;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    models::{
        status::Status,
        store::{StoreError, TaskStore},
        task::TaskId,
    },
    services::tasks::{
        CommentTaskError, CreateTaskError, CreateTaskParameters, DetachAttachmentError,
        EditTaskError, EditTaskParameters, MoveDirection, MoveTaskError, MoveTaskResult,
        SelectTaskError, comment_task, create_task, delete_selected_task, detach_attachment,
        edit_task, move_task, select_task,
    },
    ui,
};

const PROMPT: &str = "taskboard> ";

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Unterminated quote in command line")]
    UnterminatedQuote,

    #[error(transparent)]
    Create(#[from] CreateTaskError),

    #[error(transparent)]
    Edit(#[from] EditTaskError),

    #[error(transparent)]
    Select(#[from] SelectTaskError),

    #[error(transparent)]
    Move(#[from] MoveTaskError),

    #[error(transparent)]
    Comment(#[from] CommentTaskError),

    #[error(transparent)]
    Detach(#[from] DetachAttachmentError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to serialize board: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Parser)]
#[command(
    name = "taskboard",
    no_binary_name = true,
    disable_version_flag = true
)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand)]
enum ShellCommand {
    /// Add a new task
    Add {
        /// Task title
        title: String,

        /// Task description
        #[arg(short, long)]
        description: Option<String>,

        /// Initial status (pending, processing, done)
        #[arg(short, long)]
        status: Option<String>,

        /// Add labels (can be used multiple times)
        #[arg(short, long, action = clap::ArgAction::Append)]
        label: Vec<String>,

        /// Add attachments (can be used multiple times)
        #[arg(short, long, action = clap::ArgAction::Append)]
        attach: Vec<String>,
    },

    /// Show the board
    #[command(visible_alias = "ls")]
    List,

    /// Show every detail of a task
    Show { task_id: TaskId },

    /// Select a task
    Select { task_id: TaskId },

    /// Clear the current selection
    Deselect,

    /// Edit a task
    Edit {
        task_id: TaskId,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New status (pending, processing, done)
        #[arg(short, long)]
        status: Option<String>,

        /// Add labels (can be used multiple times)
        #[arg(short, long, action = clap::ArgAction::Append)]
        label: Vec<String>,

        /// Remove labels (can be used multiple times)
        #[arg(long, action = clap::ArgAction::Append)]
        unlabel: Vec<String>,

        /// Add attachments (can be used multiple times)
        #[arg(short, long, action = clap::ArgAction::Append)]
        attach: Vec<String>,

        /// Remove attachments (can be used multiple times)
        #[arg(long, action = clap::ArgAction::Append)]
        detach: Vec<String>,
    },

    /// Delete the selected task
    Delete,

    /// Move a task to the next column
    Forward { task_id: TaskId },

    /// Move a task to the previous column
    Back { task_id: TaskId },

    /// Comment on a task
    Comment {
        task_id: TaskId,

        #[arg(required = true, trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Remove an attachment from a task
    Detach { task_id: TaskId, name: String },

    /// Search titles, descriptions and labels
    Search {
        #[arg(trailing_var_arg = true)]
        term: Vec<String>,
    },

    /// Count tasks per status
    Count { status: Option<String> },

    /// List the available labels
    Labels,

    /// Print the board as JSON
    Export,

    /// Leave the shell
    #[command(visible_alias = "exit")]
    Quit,
}

#[derive(Debug, PartialEq)]
pub enum Outcome {
    Continue,
    Quit,
}

/// Reads commands line by line until input ends or `quit` is entered.
///
/// Command errors are reported and the loop keeps going. Only IO errors on
/// the input or output streams end it early.
pub fn run(store: &mut TaskStore, input: impl BufRead, interactive: bool) -> io::Result<()> {
    let mut lines = input.lines();

    loop {
        if interactive {
            print!("{}", PROMPT.bold());
            io::stdout().flush()?;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        match execute_line(store, &line) {
            Ok(Outcome::Quit) => break,
            Ok(Outcome::Continue) => {}
            Err(e) => eprintln!("{} {}", "Error:".red(), e),
        }
    }

    info!(tasks = store.task_count(), "shell closed");
    Ok(())
}

/// Parses and runs a single command line against the store
pub fn execute_line(store: &mut TaskStore, line: &str) -> Result<Outcome, ShellError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(Outcome::Continue);
    }

    let words = split_command_line(line)?;
    let command = match ShellLine::try_parse_from(words) {
        Ok(parsed) => parsed.command,
        Err(e) => {
            // Covers both usage errors and `help`
            let _ = e.print();
            return Ok(Outcome::Continue);
        }
    };

    execute(store, command)
}

fn execute(store: &mut TaskStore, command: ShellCommand) -> Result<Outcome, ShellError> {
    match command {
        ShellCommand::Add {
            title,
            description,
            status,
            label,
            attach,
        } => {
            let params = CreateTaskParameters {
                title,
                description,
                status,
                labels: label,
                attachments: attach,
            };
            let task = create_task(store, params)?;
            println!("✓ Task {} created: {}", task.id, task.title);
        }
        ShellCommand::List => ui::render_board(store),
        ShellCommand::Show { task_id } => {
            let task = store.task(task_id).ok_or(StoreError::NotFound(task_id))?;
            ui::render_task_detail(task);
        }
        ShellCommand::Select { task_id } => {
            let task = select_task(store, task_id)?;
            println!("✓ Selected task {}: {}", task.id, task.title);
        }
        ShellCommand::Deselect => {
            store.clear_selection();
            println!("✓ Selection cleared");
        }
        ShellCommand::Edit {
            task_id,
            title,
            description,
            status,
            label,
            unlabel,
            attach,
            detach,
        } => {
            let params = EditTaskParameters {
                task_id,
                title,
                description,
                status,
                add_labels: label,
                remove_labels: unlabel,
                attach,
                detach,
            };
            let task = edit_task(store, params)?;
            println!("✓ Task {} updated: {}", task.id, task.title);
        }
        ShellCommand::Delete => {
            let task = delete_selected_task(store)?;
            println!("✓ Task deleted: {}", task.title);
        }
        ShellCommand::Forward { task_id } => {
            report_move(move_task(store, task_id, MoveDirection::Forward)?);
        }
        ShellCommand::Back { task_id } => {
            report_move(move_task(store, task_id, MoveDirection::Backward)?);
        }
        ShellCommand::Comment { task_id, text } => {
            comment_task(store, task_id, text.join(" "))?;
            println!("✓ Comment added to task {}", task_id);
        }
        ShellCommand::Detach { task_id, name } => {
            detach_attachment(store, task_id, &name)?;
            println!("✓ Attachment '{}' removed from task {}", name, task_id);
        }
        ShellCommand::Search { term } => {
            let term = term.join(" ");
            let results = store.search(&term);
            ui::render_search_results(&term, &results);
        }
        ShellCommand::Count { status: None } => ui::render_counts(store),
        ShellCommand::Count {
            status: Some(status),
        } => {
            let status: Status = status.parse()?;
            println!("{}", store.count_by_status(status));
        }
        ShellCommand::Labels => ui::render_labels(store.available_labels()),
        ShellCommand::Export => {
            println!("{}", serde_json::to_string_pretty(store.tasks())?);
        }
        ShellCommand::Quit => return Ok(Outcome::Quit),
    }

    Ok(Outcome::Continue)
}

fn report_move(result: MoveTaskResult) {
    if result.moved() {
        println!(
            "✓ Task {} moved: {} → {}",
            result.task_id, result.from, result.to
        );
    } else {
        debug!(task_id = result.task_id, status = %result.to, "task already at end of chain");
        println!(
            "Task {} is already {}",
            result.task_id,
            result.to.to_string().dimmed()
        );
    }
}

/// Splits a command line on whitespace, keeping single- or double-quoted
/// runs together. A backslash escapes the next character outside single quotes.
fn split_command_line(line: &str) -> Result<Vec<String>, ShellError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('\''), c) => current.push(c),
            (_, '\\') => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                    in_word = true;
                }
            }
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(ShellError::UnterminatedQuote);
    }
    if in_word {
        words.push(current);
    }

    Ok(words)
}
