//! Shell command tool.
//!
//! Runs the command text with an interpreter (`<program> -c <command>`) and
//! returns stdout and stderr merged in the order they were written. A non-zero
//! exit is reported through the output itself, not as an error.

use crate::error::{AgentError, Result};
use console::style;
use std::io::{Read, Seek, SeekFrom};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{info, instrument};

/// Executes command lines with a shell interpreter.
pub struct ShellTool {
    program: String,
    echo: bool,
}

impl ShellTool {
    /// Create a shell tool using `program` as the interpreter.
    pub fn new(program: &str, echo: bool) -> Self {
        Self {
            program: program.to_string(),
            echo,
        }
    }

    #[instrument(skip(self), fields(program = %self.program))]
    pub async fn run(&self, command: &str) -> Result<String> {
        if self.echo {
            println!("{}", style(command).dim());
        }

        // Both streams share one file so their writes interleave as produced.
        let mut sink = tempfile::tempfile()?;

        let status = Command::new(&self.program)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(sink.try_clone()?)
            .stderr(sink.try_clone()?)
            .status()
            .await
            .map_err(|e| spawn_error(&self.program, e))?;

        sink.seek(SeekFrom::Start(0))?;
        let mut bytes = Vec::new();
        sink.read_to_end(&mut bytes)?;
        let output = String::from_utf8_lossy(&bytes).into_owned();

        info!(exit = ?status.code(), bytes = output.len(), "command finished");
        Ok(output)
    }
}

pub(super) fn spawn_error(program: &str, e: std::io::Error) -> AgentError {
    if e.kind() == std::io::ErrorKind::NotFound {
        AgentError::ToolExecution(format!("{} not found", program))
    } else {
        AgentError::ToolExecution(format!("{} could not be started: {}", program, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh() -> ShellTool {
        ShellTool::new("sh", false)
    }

    #[tokio::test]
    async fn test_echo_hi() {
        assert_eq!(sh().run("echo hi").await.unwrap(), "hi\n");
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_not_an_error() {
        assert_eq!(sh().run("exit 1").await.unwrap(), "");
        assert_eq!(sh().run("echo partial; exit 3").await.unwrap(), "partial\n");
    }

    #[tokio::test]
    async fn test_stderr_is_merged_in_order() {
        let output = sh()
            .run("echo one; echo two 1>&2; echo three")
            .await
            .unwrap();
        assert_eq!(output, "one\ntwo\nthree\n");
    }

    #[tokio::test]
    async fn test_failure_description_is_part_of_output() {
        let output = sh().run("ls /definitely/not/here").await.unwrap();
        assert!(!output.is_empty());
    }

    #[tokio::test]
    async fn test_missing_interpreter_is_an_error() {
        let tool = ShellTool::new("/no/such/interpreter", false);
        assert!(matches!(
            tool.run("echo hi").await,
            Err(AgentError::ToolExecution(_))
        ));
    }
}
