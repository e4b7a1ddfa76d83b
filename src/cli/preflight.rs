//! Pre-flight checks before the interactive loop starts.
//!
//! A missing API key stops the program; missing tool programs only produce
//! warnings, since the model may never ask for them.

use crate::config::Settings;
use crate::error::{AgentError, Result};
use std::process::{Command, Stdio};

/// Check if OpenAI API key is configured.
pub fn check_api_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(AgentError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(AgentError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

/// Tool programs from the configuration that cannot be started.
pub fn missing_programs(settings: &Settings) -> Vec<String> {
    [
        settings.tools.shell.program.as_str(),
        settings.tools.postgres.program.as_str(),
    ]
    .into_iter()
    .filter(|program| !is_available(program))
    .map(str::to_string)
    .collect()
}

/// Check if an external program can be started.
fn is_available(program: &str) -> bool {
    match Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
    {
        Ok(_) => true,
        Err(e) => e.kind() != std::io::ErrorKind::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_programs_reported() {
        let mut settings = Settings::default();
        settings.tools.shell.program = "sh".to_string();
        settings.tools.postgres.program = "definitely-not-a-real-psql-binary".to_string();

        assert_eq!(
            missing_programs(&settings),
            vec!["definitely-not-a-real-psql-binary".to_string()]
        );
    }
}
