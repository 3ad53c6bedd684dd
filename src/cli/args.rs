use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "natlang")]
#[command(version)]
#[command(about = "Terminal client for the Natlang utility chat service", long_about = None)]
pub struct Cli {
    /// Base URL of the chat service (e.g., http://127.0.0.1:8000)
    #[arg(long, env = "API_BASE", global = true)]
    pub api_base: Option<String>,

    /// Account number sent with every message
    #[arg(short, long, env = "ACCOUNT_NUMBER", global = true)]
    pub account: Option<String>,

    /// Use this session id instead of the stored one
    #[arg(short, long, global = true)]
    pub session_id: Option<String>,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Keep the session id in memory only
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Send one message, print the reply and exit
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Output format for non-interactive mode
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, requires = "prompt")]
    pub output_format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the full-screen chat (default)
    Chat,
    /// Line-oriented chat on stdin/stdout
    Repl,
    /// Resolve and print the session id
    Session,
    /// Check the chat service health endpoint
    Status,
    /// Initialize configuration
    Init,
    /// Show version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Reply text only
    Text,
    /// Full transcript as JSON
    Json,
    /// Full transcript as an HTML page
    Html,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_interactive() {
        let cli = Cli::try_parse_from(["natlang"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.prompt.is_none());
        assert_eq!(cli.output_format, OutputFormat::Text);
    }

    #[test]
    fn test_prompt_with_format() {
        let cli = Cli::try_parse_from([
            "natlang",
            "-p",
            "I need help",
            "--output-format",
            "json",
            "--session-id",
            "R21",
        ])
        .unwrap();
        assert_eq!(cli.prompt.as_deref(), Some("I need help"));
        assert_eq!(cli.output_format, OutputFormat::Json);
        assert_eq!(cli.session_id.as_deref(), Some("R21"));
    }

    #[test]
    fn test_output_format_requires_prompt() {
        assert!(Cli::try_parse_from(["natlang", "--output-format", "html"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["natlang", "repl", "--account", "ACCT-NICKS"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Repl));
        assert_eq!(cli.account.as_deref(), Some("ACCT-NICKS"));
    }
}
