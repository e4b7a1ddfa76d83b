//! CLI module for tinyagent.

mod history;
mod output;
pub mod preflight;
pub mod repl;

pub use history::History;
pub use output::Output;

use clap::Parser;

/// tinyagent - a small agent that can run shell commands, query postgres and
/// search the web.
///
/// Reads one line at a time from standard input and answers it, calling tools
/// as the model requests.
#[derive(Parser, Debug)]
#[command(name = "tinyagent")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase console verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Model to use instead of the configured one
    #[arg(short, long, env = "TINYAGENT_MODEL")]
    pub model: Option<String>,

    /// Maximum tool-call rounds per turn (0 for no limit)
    #[arg(long)]
    pub max_tool_rounds: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from(["tinyagent", "-vv", "--model", "gpt-4.1", "--max-tool-rounds", "0"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.model.as_deref(), Some("gpt-4.1"));
        assert_eq!(cli.max_tool_rounds, Some(0));
        assert!(cli.config.is_none());
    }
}
