//! CLI-level errors that are not template errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Template \"{template}\" not found.")]
    InvalidArgument {
        template: String,
        available: Vec<String>,
    },

    #[error("Node.js {required} or higher is required (found {found})")]
    RuntimeTooOld { found: String, required: String },

    #[error("Operation cancelled")]
    Cancelled,
}
