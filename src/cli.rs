use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

use crate::types::ToolInvocation;

/// Analyze local PDF files with Gemini.
#[derive(Debug, Parser)]
#[command(name = "gemini-pdf-analyzer", version, about)]
pub struct Cli {
    /// Path to a TOML config file (default: ~/.gemini-pdf-analyzer/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze a PDF with a prompt and print the answer
    Analyze {
        /// File URI of the PDF (e.g. file:///path/to/your.pdf)
        #[arg(long)]
        pdf: String,
        /// Instruction to run against the PDF
        #[arg(long)]
        prompt: String,
        /// Override the default model
        #[arg(long)]
        model: Option<String>,
    },
    /// Print the default model and the model catalog as JSON
    Models,
    /// Print the definitions of the available tools as JSON
    Tools,
    /// Invoke a tool by name with JSON arguments and print the result as JSON
    Call {
        /// Tool name (e.g. analyze_pdf)
        tool: String,
        /// JSON object with the tool arguments
        #[arg(default_value = "{}")]
        args: String,
    },
}

impl Command {
    /// The tool invocation this command maps to (`None` for `tools`).
    pub fn to_invocation(&self) -> Result<Option<ToolInvocation>> {
        let invocation = match self {
            Command::Analyze { pdf, prompt, model } => ToolInvocation {
                name: "analyze_pdf".to_string(),
                arguments: json!({ "pdf_uri": pdf, "prompt": prompt, "model": model }),
            },
            Command::Models => ToolInvocation {
                name: "list_models".to_string(),
                arguments: json!({}),
            },
            Command::Call { tool, args } => ToolInvocation {
                name: tool.clone(),
                arguments: serde_json::from_str(args).with_context(|| {
                    format!("Invalid JSON arguments for tool '{}': {}", tool, args)
                })?,
            },
            Command::Tools => return Ok(None),
        };
        Ok(Some(invocation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::parse_from([
            "gemini-pdf-analyzer",
            "analyze",
            "--pdf",
            "file:///tmp/a.pdf",
            "--prompt",
            "Summarize this",
        ]);
        let invocation = cli.command.to_invocation().unwrap().unwrap();
        assert_eq!(invocation.name, "analyze_pdf");
        assert_eq!(invocation.arguments["pdf_uri"], "file:///tmp/a.pdf");
        assert_eq!(invocation.arguments["prompt"], "Summarize this");
        assert!(invocation.arguments["model"].is_null());
    }

    #[test]
    fn test_parse_call_defaults_args() {
        let cli = Cli::parse_from([
            "gemini-pdf-analyzer",
            "--config",
            "c.toml",
            "call",
            "list_models",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
        let invocation = cli.command.to_invocation().unwrap().unwrap();
        assert_eq!(invocation.name, "list_models");
        assert_eq!(invocation.arguments, json!({}));
    }

    #[test]
    fn test_call_with_bad_json() {
        let cli = Cli::parse_from(["gemini-pdf-analyzer", "call", "analyze_pdf", "{not json"]);
        let err = cli.command.to_invocation().unwrap_err();
        assert!(err.to_string().contains("Invalid JSON arguments"));
    }

    #[test]
    fn test_tools_has_no_invocation() {
        let cli = Cli::parse_from(["gemini-pdf-analyzer", "tools"]);
        assert!(cli.command.to_invocation().unwrap().is_none());
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
