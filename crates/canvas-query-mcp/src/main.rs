//! canvas-query MCP server entry point.

use std::sync::Arc;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use canvas_query::{CanvasApi, CanvasClient};
use canvas_query_mcp::config::client_config;
use canvas_query_mcp::protocol::ProtocolHandler;
use canvas_query_mcp::tools::ToolRegistry;
use canvas_query_mcp::transport::StdioTransport;

#[derive(Parser)]
#[command(
    name = "canvas-query-mcp",
    about = "MCP server for canvas-query: read-only Canvas LMS course, assignment, and grade tools",
    version
)]
struct Cli {
    /// Canvas access token. Also reads CANVAS_API_TOKEN.
    #[arg(long, global = true)]
    token: Option<String>,

    /// Canvas base URL. Also reads CANVAS_BASE_URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server over stdio (default).
    Serve,

    /// Call a single tool and print its JSON result.
    Call {
        /// Tool name, e.g. list_courses.
        tool: String,

        /// Tool arguments as a JSON object.
        #[arg(default_value = "{}")]
        args: String,
    },

    /// Print server capabilities as JSON.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   canvas-query-mcp completions bash > ~/.local/share/bash-completion/completions/canvas-query-mcp
    ///   canvas-query-mcp completions zsh > ~/.zfunc/_canvas-query-mcp
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },

    /// Launch interactive REPL mode.
    Repl,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    // stdout carries the protocol; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = client_config(cli.token.as_deref(), cli.base_url.as_deref());

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let client = CanvasClient::new(config).context("Cannot start MCP server")?;
            tracing::info!("canvas-query MCP server");
            tracing::info!("Canvas: {}", client.base_url());

            let handler = ProtocolHandler::new(Arc::new(client));
            let transport = StdioTransport::new(handler);
            transport.run().await?;
        }

        Commands::Call { tool, args } => {
            let client = CanvasClient::new(config)?;
            let arguments: serde_json::Value =
                serde_json::from_str(&args).context("Tool arguments must be valid JSON")?;
            let result = ToolRegistry::call(&tool, Some(arguments), &client).await?;
            println!("{}", result.first_text().unwrap_or_default());
        }

        Commands::Info => {
            let capabilities = canvas_query_mcp::types::InitializeResult::default_result();
            let tools = ToolRegistry::list_tools();
            let info = serde_json::json!({
                "server": capabilities.server_info,
                "protocol_version": capabilities.protocol_version,
                "capabilities": capabilities.capabilities,
                "tools": tools.iter().map(|t| &t.name).collect::<Vec<_>>(),
                "tool_count": tools.len(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "canvas-query-mcp", &mut std::io::stdout());
        }

        Commands::Repl => {
            let api: Option<Arc<dyn CanvasApi>> = match CanvasClient::new(config) {
                Ok(client) => Some(Arc::new(client)),
                Err(e) => {
                    tracing::warn!("{e}");
                    None
                }
            };
            let runtime = tokio::runtime::Handle::current();
            tokio::task::spawn_blocking(move || canvas_query_mcp::repl::run(api, runtime))
                .await??;
        }
    }

    Ok(())
}
