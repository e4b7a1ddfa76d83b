//! Tool catalog, argument decoding and dispatch.
//!
//! The model asks for a tool by name with a JSON argument payload. The payload
//! is decoded into a flat string mapping, then into a typed [`ToolCall`], and
//! finally executed by one of the executors in this module.

mod approval;
mod postgres;
mod shell;
mod web_search;

pub use approval::{AllowAll, AllowList, Approval};
pub use postgres::PostgresTool;
pub use shell::ShellTool;
pub use web_search::{parse_results, render_results, ResultExtractor, SearchHit, WebSearchTool};

use crate::config::ToolSettings;
use crate::error::{AgentError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Results returned when `max_results` is absent or unusable.
pub const DEFAULT_SEARCH_RESULTS: usize = 5;

/// Upper bound for `max_results`.
pub const MAX_SEARCH_RESULTS: usize = 10;

/// Declaration of a tool as advertised to the model.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// JSON schema of the argument object.
    pub parameters: Value,
}

/// The static tool catalog.
pub fn tool_catalog() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: "postgres",
            description: "query the postgres db",
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "postgres query to run "
                    }
                },
                "required": ["query"]
            }),
        },
        ToolSpec {
            name: "shell",
            description: "run a shell command",
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "command": {
                        "type": "string",
                        "description": "shell command to run"
                    }
                },
                "required": ["command"]
            }),
        },
        ToolSpec {
            name: "web_search",
            description: "perform a web search and return top result titles and URLs",
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "search query"
                    },
                    "max_results": {
                        "type": "integer",
                        "description": "maximum number of results to return (default 5, max 10)"
                    }
                },
                "required": ["query"]
            }),
        },
    ]
}

/// Flat string-keyed argument mapping decoded from a tool-call payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolArgs(BTreeMap<String, String>);

impl ToolArgs {
    /// Decode a JSON object whose values are all strings.
    ///
    /// Numbers are kept as their literal text since the catalog declares
    /// `max_results` as an integer. Any other value type is rejected.
    pub fn decode(raw: &str) -> Result<Self> {
        let object: serde_json::Map<String, Value> =
            serde_json::from_str(raw).map_err(|e| AgentError::Decode(e.to_string()))?;

        let mut args = BTreeMap::new();
        for (key, value) in object {
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                other => {
                    return Err(AgentError::Decode(format!(
                        "field '{}' must be a string, got {}",
                        key, other
                    )))
                }
            };
            args.insert(key, text);
        }
        Ok(Self(args))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

/// A decoded, validated tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    /// Run a command line with the shell interpreter.
    Shell { command: String },

    /// Run a query with the database client.
    Postgres { query: String },

    /// Search the web.
    WebSearch { query: String, max_results: usize },
}

impl ToolCall {
    /// Decode a tool call from its name and raw JSON arguments.
    pub fn parse(name: &str, arguments: &str) -> Result<Self> {
        if !tool_catalog().iter().any(|spec| spec.name == name) {
            return Err(AgentError::UnknownTool(name.to_string()));
        }
        let args = ToolArgs::decode(arguments)?;
        Self::from_args(name, &args)
    }

    fn from_args(name: &str, args: &ToolArgs) -> Result<Self> {
        match name {
            "shell" => Ok(ToolCall::Shell {
                command: required(args, "shell", "command")?,
            }),
            "postgres" => Ok(ToolCall::Postgres {
                query: required(args, "postgres", "query")?,
            }),
            "web_search" => {
                let query = args
                    .get("query")
                    .filter(|q| !q.is_empty())
                    .ok_or(AgentError::MissingQuery)?
                    .to_string();
                Ok(ToolCall::WebSearch {
                    query,
                    max_results: parse_max_results(args.get("max_results")),
                })
            }
            _ => Err(AgentError::UnknownTool(name.to_string())),
        }
    }

    /// Catalog name of this call.
    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::Shell { .. } => "shell",
            ToolCall::Postgres { .. } => "postgres",
            ToolCall::WebSearch { .. } => "web_search",
        }
    }

    /// Calls that run unsanitized text on the local machine.
    pub fn is_dangerous(&self) -> bool {
        matches!(self, ToolCall::Shell { .. } | ToolCall::Postgres { .. })
    }
}

fn required(args: &ToolArgs, tool: &'static str, field: &'static str) -> Result<String> {
    args.get(field)
        .map(str::to_string)
        .ok_or(AgentError::MissingArgument { tool, field })
}

/// Interpret `max_results` the way a `%d` scan would: an optional sign and
/// leading digits. Anything unusable or non-positive gives the default.
pub fn parse_max_results(raw: Option<&str>) -> usize {
    let Some(raw) = raw else {
        return DEFAULT_SEARCH_RESULTS;
    };
    let trimmed = raw.trim_start();
    let digits_end = trimmed
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());

    match trimmed[..digits_end].parse::<i64>() {
        Ok(n) if n > 0 => (n as u64).min(MAX_SEARCH_RESULTS as u64) as usize,
        _ => DEFAULT_SEARCH_RESULTS,
    }
}

/// Something that can run tool calls requested by the model.
#[async_trait]
pub trait ToolDispatcher: Send + Sync {
    /// Tools advertised to the model.
    fn catalog(&self) -> Vec<ToolSpec>;

    /// Run the named tool with its raw JSON arguments.
    async fn dispatch(&self, name: &str, arguments: &str) -> Result<String>;
}

/// The built-in tool set.
pub struct ToolBox {
    shell: ShellTool,
    postgres: PostgresTool,
    search: WebSearchTool,
    approval: Arc<dyn Approval>,
}

impl ToolBox {
    /// Build the executors from configuration.
    pub fn from_settings(settings: &ToolSettings) -> Result<Self> {
        let approval: Arc<dyn Approval> = if settings.allowed_commands.is_empty() {
            Arc::new(AllowAll)
        } else {
            Arc::new(AllowList::new(settings.allowed_commands.iter().cloned()))
        };

        Ok(Self {
            shell: ShellTool::new(&settings.shell.program, settings.echo_commands),
            postgres: PostgresTool::new(
                &settings.postgres.program,
                &settings.postgres.database,
                settings.echo_commands,
            ),
            search: WebSearchTool::new(&settings.search)?,
            approval,
        })
    }

    /// Execute an already decoded call.
    pub async fn execute(&self, call: &ToolCall) -> Result<String> {
        if call.is_dangerous() {
            self.approval.approve(call)?;
        }
        debug!("Executing {}", call.name());

        match call {
            ToolCall::Shell { command } => self.shell.run(command).await,
            ToolCall::Postgres { query } => self.postgres.run(query).await,
            ToolCall::WebSearch { query, max_results } => {
                self.search.search(query, *max_results).await
            }
        }
    }
}

#[async_trait]
impl ToolDispatcher for ToolBox {
    fn catalog(&self) -> Vec<ToolSpec> {
        tool_catalog()
    }

    async fn dispatch(&self, name: &str, arguments: &str) -> Result<String> {
        let call = ToolCall::parse(name, arguments)?;
        self.execute(&call).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolSettings;

    fn toolbox() -> ToolBox {
        let mut settings = ToolSettings::default();
        settings.echo_commands = false;
        settings.shell.program = "sh".to_string();
        settings.postgres.program = "echo".to_string();
        ToolBox::from_settings(&settings).unwrap()
    }

    #[test]
    fn test_catalog_schema_shape() {
        let catalog = tool_catalog();
        assert_eq!(catalog.len(), 3);
        for spec in &catalog {
            assert_eq!(spec.parameters["type"], "object");
            assert!(spec.parameters["required"].is_array());
        }
        let search = catalog.iter().find(|s| s.name == "web_search").unwrap();
        assert_eq!(search.parameters["properties"]["max_results"]["type"], "integer");
        assert_eq!(search.parameters["required"], serde_json::json!(["query"]));
    }

    #[test]
    fn test_parse_shell_tool() {
        let tool = ToolCall::parse("shell", r#"{"command": "echo hi"}"#).unwrap();
        assert_eq!(
            tool,
            ToolCall::Shell {
                command: "echo hi".to_string()
            }
        );
        assert!(tool.is_dangerous());
    }

    #[test]
    fn test_parse_search_with_numeric_max_results() {
        let tool = ToolCall::parse("web_search", r#"{"query": "rust", "max_results": 3}"#).unwrap();
        assert_eq!(
            tool,
            ToolCall::WebSearch {
                query: "rust".to_string(),
                max_results: 3
            }
        );
        assert!(!tool.is_dangerous());
    }

    #[test]
    fn test_unknown_tool_checked_before_decoding() {
        assert!(matches!(
            ToolCall::parse("nope", r#"{"command": "ls"}"#),
            Err(AgentError::UnknownTool(name)) if name == "nope"
        ));
        assert!(matches!(
            ToolCall::parse("nope", "not json"),
            Err(AgentError::UnknownTool(_))
        ));
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(
            ToolCall::parse("shell", "not json"),
            Err(AgentError::Decode(_))
        ));
        assert!(matches!(
            ToolCall::parse("shell", r#"["ls"]"#),
            Err(AgentError::Decode(_))
        ));
        assert!(matches!(
            ToolCall::parse("shell", r#"{"command": ["ls"]}"#),
            Err(AgentError::Decode(_))
        ));
        assert!(matches!(
            ToolCall::parse("shell", r#"{"command": null}"#),
            Err(AgentError::Decode(_))
        ));
    }

    #[test]
    fn test_missing_fields() {
        assert!(matches!(
            ToolCall::parse("shell", "{}"),
            Err(AgentError::MissingArgument { field: "command", .. })
        ));
        assert!(matches!(
            ToolCall::parse("postgres", r#"{"sql": "select 1"}"#),
            Err(AgentError::MissingArgument { field: "query", .. })
        ));
        assert!(matches!(
            ToolCall::parse("web_search", r#"{"query": ""}"#),
            Err(AgentError::MissingQuery)
        ));
        assert!(matches!(
            ToolCall::parse("web_search", "{}"),
            Err(AgentError::MissingQuery)
        ));
    }

    #[test]
    fn test_max_results_parsing() {
        assert_eq!(parse_max_results(None), 5);
        assert_eq!(parse_max_results(Some("")), 5);
        assert_eq!(parse_max_results(Some("0")), 5);
        assert_eq!(parse_max_results(Some("-3")), 5);
        assert_eq!(parse_max_results(Some("many")), 5);
        assert_eq!(parse_max_results(Some("7")), 7);
        assert_eq!(parse_max_results(Some(" 8 results")), 8);
        assert_eq!(parse_max_results(Some("3.9")), 3);
        assert_eq!(parse_max_results(Some("10")), 10);
        assert_eq!(parse_max_results(Some("25")), 10);
        assert_eq!(parse_max_results(Some("99999999999999999999")), 5);
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool() {
        let result = toolbox().dispatch("rm_everything", "{}").await;
        assert!(matches!(result, Err(AgentError::UnknownTool(_))));
    }

    #[tokio::test]
    async fn test_dispatch_known_tools_never_unknown() {
        let tools = toolbox();
        let shell = tools.dispatch("shell", r#"{"command": "echo hi"}"#).await;
        assert_eq!(shell.unwrap(), "hi\n");

        let query = tools.dispatch("postgres", r#"{"query": "select 1"}"#).await;
        assert_eq!(query.unwrap(), "postgres -c select 1\n");
    }

    #[tokio::test]
    async fn test_empty_search_query_fails_before_network() {
        let mut settings = ToolSettings::default();
        // Unroutable endpoint: any request would fail with a transport error.
        settings.search.endpoint = "http://127.0.0.1:9/html/".to_string();
        let tools = ToolBox::from_settings(&settings).unwrap();

        let result = tools.dispatch("web_search", r#"{"query": ""}"#).await;
        assert!(matches!(result, Err(AgentError::MissingQuery)));
    }

    #[tokio::test]
    async fn test_allow_list_blocks_unlisted_programs() {
        let mut settings = ToolSettings::default();
        settings.echo_commands = false;
        settings.shell.program = "sh".to_string();
        settings.allowed_commands = vec!["echo".to_string()];
        let tools = ToolBox::from_settings(&settings).unwrap();

        let allowed = tools.dispatch("shell", r#"{"command": "echo ok"}"#).await;
        assert_eq!(allowed.unwrap(), "ok\n");

        let denied = tools.dispatch("shell", r#"{"command": "rm -rf /tmp/x"}"#).await;
        assert!(matches!(denied, Err(AgentError::ToolDenied(_))));

        let chained = tools
            .dispatch("shell", r#"{"command": "echo ok && rm -rf /tmp/x"}"#)
            .await;
        assert!(matches!(chained, Err(AgentError::ToolDenied(_))));

        let query = tools.dispatch("postgres", r#"{"query": "select 1"}"#).await;
        assert!(matches!(query, Err(AgentError::ToolDenied(_))));
    }
}
