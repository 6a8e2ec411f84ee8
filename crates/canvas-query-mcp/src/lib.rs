//! canvas-query MCP server: read-only Canvas LMS tools for LLM hosts.

pub mod config;
pub mod protocol;
pub mod repl;
pub mod tools;
pub mod transport;
pub mod types;

pub use config::client_config;
pub use protocol::ProtocolHandler;
pub use tools::ToolRegistry;
pub use transport::StdioTransport;
