//! Database query tool backed by the `psql` client.

use super::shell::spawn_error;
use crate::error::Result;
use console::style;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{info, instrument};

/// Runs queries through a database client subprocess.
pub struct PostgresTool {
    program: String,
    database: String,
    echo: bool,
}

impl PostgresTool {
    /// Create a tool that runs `<program> <database> -c <query>`.
    pub fn new(program: &str, database: &str, echo: bool) -> Self {
        Self {
            program: program.to_string(),
            database: database.to_string(),
            echo,
        }
    }

    /// Run `query` verbatim and return the client's stdout, whatever its exit
    /// status. Stderr is discarded.
    #[instrument(skip(self), fields(program = %self.program, database = %self.database))]
    pub async fn run(&self, query: &str) -> Result<String> {
        if self.echo {
            println!("{}", style(query).dim());
        }

        let output = Command::new(&self.program)
            .arg(&self.database)
            .arg("-c")
            .arg(query)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|e| spawn_error(&self.program, e))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        info!(exit = ?output.status.code(), bytes = stdout.len(), "query finished");
        Ok(stdout)
    }
}
