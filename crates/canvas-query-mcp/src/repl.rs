//! Interactive REPL for the canvas-query MCP server.
//!
//! Launch with `canvas-query-mcp repl` to call tools by hand against the live
//! Canvas API. Type `/help` for available commands, Tab for completion.

use std::sync::Arc;

use rustyline::completion::{Completer, Pair};
use rustyline::config::CompletionType;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{
    Cmd, ConditionalEventHandler, Config, Editor, Event, EventContext, EventHandler, Helper,
    KeyEvent, RepeatCount,
};
use serde_json::Value;
use tokio::runtime::Handle;

use canvas_query::CanvasApi;

use crate::tools::ToolRegistry;

/// Available REPL commands.
const COMMANDS: &[(&str, &str)] = &[
    ("/info", "Show server capabilities and tools"),
    ("/tools", "List available MCP tools"),
    ("/call", "Call a tool: /call <tool> [json-arguments]"),
    ("/courses", "Shortcut for /call list_courses"),
    ("/clear", "Clear the screen"),
    ("/help", "Show available commands"),
    ("/exit", "Quit the REPL"),
];

/// Tab completion for commands and, after `/call`, tool names.
struct CanvasHelper {
    tool_names: Vec<String>,
}

impl Completer for CanvasHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let input = &line[..pos];

        if !input.contains(' ') {
            let matches: Vec<Pair> = COMMANDS
                .iter()
                .filter(|(cmd, _)| cmd.starts_with(input))
                .map(|(cmd, desc)| Pair {
                    display: format!("{cmd:<16} {desc}"),
                    replacement: format!("{cmd} "),
                })
                .collect();
            return Ok((0, matches));
        }

        if let Some(rest) = input.strip_prefix("/call ") {
            if !rest.contains(' ') {
                let start = input.len() - rest.len();
                let matches: Vec<Pair> = self
                    .tool_names
                    .iter()
                    .filter(|name| name.starts_with(rest))
                    .map(|name| Pair {
                        display: name.clone(),
                        replacement: format!("{name} "),
                    })
                    .collect();
                return Ok((start, matches));
            }
        }

        Ok((pos, Vec::new()))
    }
}

impl Hinter for CanvasHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        if pos < line.len() || line.is_empty() {
            return None;
        }
        if line.starts_with('/') && !line.contains(' ') {
            for (cmd, _) in COMMANDS {
                if cmd.starts_with(line) && *cmd != line {
                    return Some(cmd[line.len()..].to_string());
                }
            }
        }
        None
    }
}

impl Highlighter for CanvasHelper {}
impl Validator for CanvasHelper {}
impl Helper for CanvasHelper {}

struct TabCompleteOrAcceptHint;

impl ConditionalEventHandler for TabCompleteOrAcceptHint {
    fn handle(
        &self,
        _evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        ctx: &EventContext<'_>,
    ) -> Option<Cmd> {
        if ctx.has_hint() {
            Some(Cmd::CompleteHint)
        } else {
            Some(Cmd::Complete)
        }
    }
}

/// Run the interactive REPL.
///
/// Blocks the calling thread; run it on a blocking thread and pass the
/// runtime handle used to drive tool calls. `api` is `None` when no access
/// token was configured, in which case only offline commands work.
pub fn run(api: Option<Arc<dyn CanvasApi>>, runtime: Handle) -> anyhow::Result<()> {
    eprintln!();
    eprintln!(
        "  \x1b[32m\u{25c9}\x1b[0m \x1b[1mcanvas-query-mcp v{}\x1b[0m \x1b[90m\u{2014} Canvas LMS tools\x1b[0m",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!();
    eprintln!(
        "    Press \x1b[36m/\x1b[0m to browse commands, \x1b[90mTab\x1b[0m to complete, \x1b[90m/exit\x1b[0m to quit."
    );
    if api.is_none() {
        eprintln!(
            "    \x1b[33mNo access token configured\x1b[0m \u{2014} set {} to enable /call.",
            crate::config::TOKEN_ENV
        );
    }
    eprintln!();

    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .completion_type(CompletionType::List)
        .completion_prompt_limit(20)
        .build();

    let mut rl: Editor<CanvasHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(config)?;
    rl.set_helper(Some(CanvasHelper {
        tool_names: ToolRegistry::tool_names(),
    }));
    rl.bind_sequence(
        KeyEvent::from('\t'),
        EventHandler::Conditional(Box::new(TabCompleteOrAcceptHint)),
    );

    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    let hist_path = std::path::PathBuf::from(&home).join(".canvas_query_mcp_history");
    if hist_path.exists() {
        let _ = rl.load_history(&hist_path);
    }

    let prompt = " \x1b[36mcanvas>\x1b[0m ";

    loop {
        match rl.readline(prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let input = line.strip_prefix('/').unwrap_or(line);
                if input.is_empty() {
                    cmd_help();
                    continue;
                }

                let mut parts = input.splitn(2, ' ');
                let cmd = parts.next().unwrap_or("");
                let args = parts.next().unwrap_or("").trim();

                match cmd {
                    "exit" | "quit" => {
                        eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                        break;
                    }
                    "help" | "h" | "?" => cmd_help(),
                    "clear" | "cls" => eprint!("\x1b[2J\x1b[H"),
                    "info" => cmd_info(),
                    "tools" => cmd_tools(),
                    "call" => cmd_call(args, api.as_deref(), &runtime),
                    "courses" => cmd_call("list_courses", api.as_deref(), &runtime),
                    _ => {
                        eprintln!("  Unknown command '/{cmd}'. Type /help for commands.");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                eprintln!("  \x1b[90m(Ctrl+C)\x1b[0m Type \x1b[1m/exit\x1b[0m to quit.");
            }
            Err(ReadlineError::Eof) => {
                eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("  Error: {err}");
                break;
            }
        }
    }

    let _ = rl.save_history(&hist_path);

    Ok(())
}

/// Split `/call` input into a tool name and its JSON arguments.
pub fn parse_call_args(args: &str) -> Result<(String, Option<Value>), String> {
    let mut parts = args.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or("").trim();
    if name.is_empty() {
        return Err("Usage: /call <tool> [json-arguments]".to_string());
    }

    let arguments = match parts.next().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(
            serde_json::from_str::<Value>(raw).map_err(|e| format!("Invalid JSON arguments: {e}"))?,
        ),
        None => None,
    };

    Ok((name.to_string(), arguments))
}

fn cmd_help() {
    eprintln!();
    eprintln!("  Commands:");
    eprintln!();
    for (cmd, desc) in COMMANDS {
        eprintln!("    {cmd:<18} {desc}");
    }
    eprintln!();
    eprintln!("  Example: /call get_upcoming_assignments {{\"days_ahead\": 14}}");
    eprintln!();
}

fn cmd_info() {
    let capabilities = crate::types::InitializeResult::default_result();
    let tools = ToolRegistry::list_tools();
    eprintln!();
    eprintln!(
        "  Server:   {} v{}",
        capabilities.server_info.name, capabilities.server_info.version
    );
    eprintln!("  Protocol: {}", capabilities.protocol_version);
    eprintln!("  Tools:    {}", tools.len());
    eprintln!();
}

fn cmd_tools() {
    let tools = ToolRegistry::list_tools();
    eprintln!();
    eprintln!("  {} MCP tools available:", tools.len());
    eprintln!();
    for tool in &tools {
        eprintln!(
            "    {:<28} {}",
            tool.name,
            tool.description.as_deref().unwrap_or("")
        );
    }
    eprintln!();
}

fn cmd_call(args: &str, api: Option<&dyn CanvasApi>, runtime: &Handle) {
    let Some(api) = api else {
        eprintln!(
            "  No access token configured. Set {} and restart.",
            crate::config::TOKEN_ENV
        );
        return;
    };

    let (name, arguments) = match parse_call_args(args) {
        Ok(parsed) => parsed,
        Err(msg) => {
            eprintln!("  {msg}");
            return;
        }
    };

    match runtime.block_on(ToolRegistry::call(&name, arguments, api)) {
        Ok(result) => {
            println!("{}", result.first_text().unwrap_or_default());
        }
        Err(e) => {
            eprintln!("  \x1b[31mError\x1b[0m ({}): {e}", e.code());
        }
    }
}
