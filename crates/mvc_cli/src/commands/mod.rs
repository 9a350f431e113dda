//! CLI argument definitions.

use clap::Parser;

pub mod create;

/// create-mvc - scaffold an Express or Hono MVC server
#[derive(Parser, Debug)]
#[command(name = "create-mvc")]
#[command(version, about = "Create a new project with your chosen configuration.")]
#[command(long_about = r#"
Create a new project with your chosen configuration.
With no arguments, start the CLI in interactive mode.

EXIT CODES:
  0 - Success, help, or cancelled by the user
  1 - General error
  2 - Invalid arguments
  3 - Node.js runtime too old
  4 - Template error
  5 - Filesystem error
"#)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(flatten)]
    pub create: create::CreateArgs,
}
