use clap::{Parser, Subcommand};
use taskpad_core::error::AppError;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override the configured color theme
    #[arg(long, global = true, value_name = "NAME")]
    pub theme: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: taskpad add "Buy milk"
    Add {
        text: Option<String>,
    },
    /// List all tasks with their positions
    ///
    /// Example: taskpad list
    List,
    /// Toggle a task between open and done
    ///
    /// Example: taskpad toggle 2
    Toggle {
        position: usize,
    },
    /// Edit a task's text
    ///
    /// Example: taskpad edit 2 "Buy oat milk"
    /// Example (interactive): edit 2, then finish with save or cancel
    Edit {
        position: usize,
        new_text: Option<String>,
    },
    /// Save the text of the task being edited
    ///
    /// Example (interactive): save "Buy oat milk"
    Save {
        text: String,
    },
    /// Abandon the edit in progress without saving
    ///
    /// Example (interactive): cancel
    Cancel,
    /// Delete a task
    ///
    /// Example: taskpad delete 2
    Delete {
        position: usize,
    },
    /// Show re-entry suggestions: open tasks plus frequent task texts
    ///
    /// Example: taskpad suggest
    Suggest,
}

/// Converts a 1-based CLI position into a 0-based list index.
pub fn to_index(position: usize) -> Result<usize, AppError> {
    position
        .checked_sub(1)
        .ok_or_else(|| AppError::invalid_input("positions start at 1"))
}
