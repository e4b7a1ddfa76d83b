//! Approval policies for tools that run arbitrary text on the host.
//!
//! Shell commands and database queries are passed through verbatim. Whether a
//! given call may run is decided here, outside the orchestration loop.

use super::ToolCall;
use crate::error::{AgentError, Result};
use std::collections::HashSet;
use std::path::Path;

/// Decides whether a dangerous tool call may run.
pub trait Approval: Send + Sync {
    /// Return `Err(AgentError::ToolDenied)` to refuse the call.
    fn approve(&self, call: &ToolCall) -> Result<()>;
}

/// Approve every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAll;

impl Approval for AllowAll {
    fn approve(&self, _call: &ToolCall) -> Result<()> {
        Ok(())
    }
}

/// Approve shell commands whose program is listed, and database queries when
/// `postgres` is listed.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    allowed: HashSet<String>,
}

impl AllowList {
    pub fn new(allowed: impl IntoIterator<Item = String>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }

    fn is_allowed(&self, name: &str) -> bool {
        self.allowed.contains(name)
    }
}

impl Approval for AllowList {
    fn approve(&self, call: &ToolCall) -> Result<()> {
        match call {
            ToolCall::Shell { command } => {
                let programs = command_programs(command)?;
                if programs.is_empty() {
                    return Err(AgentError::ToolDenied("empty command".to_string()));
                }
                match programs.iter().find(|program| !self.is_allowed(program.as_str())) {
                    Some(program) => Err(AgentError::ToolDenied(format!(
                        "'{}' is not in the allowed commands",
                        program
                    ))),
                    None => Ok(()),
                }
            }
            ToolCall::Postgres { .. } => {
                if self.is_allowed("postgres") {
                    Ok(())
                } else {
                    Err(AgentError::ToolDenied(
                        "database queries are not allowed".to_string(),
                    ))
                }
            }
            ToolCall::WebSearch { .. } => Ok(()),
        }
    }
}

/// Constructs that run or redirect something the allow list cannot see.
fn forbidden_construct(command: &str) -> Option<&'static str> {
    if command.contains("$(") {
        return Some("command substitution");
    }
    if command.contains('`') {
        return Some("backtick substitution");
    }
    if command.contains('\n') {
        return Some("multiple lines");
    }
    None
}

/// Split a command line on `&&`, `||`, `|`, `;` and `&` outside quotes.
///
/// Unquoted `<` and `>` are refused, which covers redirections and process
/// substitution.
fn split_by_operators(command: &str) -> Result<Vec<String>> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = command.chars().peekable();
    let mut in_single_quote = false;
    let mut in_double_quote = false;
    let mut escape_next = false;

    while let Some(ch) = chars.next() {
        if escape_next {
            current.push(ch);
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if !in_single_quote => {
                escape_next = true;
                current.push(ch);
            }
            '\'' if !in_double_quote => {
                in_single_quote = !in_single_quote;
                current.push(ch);
            }
            '"' if !in_single_quote => {
                in_double_quote = !in_double_quote;
                current.push(ch);
            }
            _ if in_single_quote || in_double_quote => current.push(ch),
            '<' | '>' => {
                return Err(AgentError::ToolDenied("redirection".to_string()));
            }
            '&' | '|' | ';' => {
                if (ch == '&' || ch == '|') && chars.peek() == Some(&ch) {
                    chars.next();
                }
                segments.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    segments.push(current);

    Ok(segments
        .into_iter()
        .map(|segment| segment.trim().to_string())
        .filter(|segment| !segment.is_empty())
        .collect())
}

/// Program name of every simple command in a command line
/// (`/usr/bin/ls -l | wc` -> `["ls", "wc"]`).
fn command_programs(command: &str) -> Result<Vec<String>> {
    if let Some(construct) = forbidden_construct(command) {
        return Err(AgentError::ToolDenied(construct.to_string()));
    }

    let mut programs = Vec::new();
    for segment in split_by_operators(command)? {
        let words = shell_words::split(&segment)
            .map_err(|e| AgentError::ToolDenied(format!("unparseable command: {}", e)))?;
        let Some(first) = words.first() else {
            continue;
        };
        let program = Path::new(first)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(first.as_str());
        programs.push(program.to_string());
    }
    Ok(programs)
}
