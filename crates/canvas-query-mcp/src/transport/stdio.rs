//! Stdio transport. Reads JSON-RPC from stdin and writes to stdout.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::protocol::ProtocolHandler;
use crate::types::{McpError, McpResult, RequestId};

use super::framing;

/// Line-delimited transport for desktop MCP hosts.
pub struct StdioTransport {
    handler: ProtocolHandler,
}

impl StdioTransport {
    pub fn new(handler: ProtocolHandler) -> Self {
        Self { handler }
    }

    /// Serve on the process's stdin/stdout until EOF.
    pub async fn run(&self) -> McpResult<()> {
        let reader = BufReader::new(tokio::io::stdin());
        let writer = tokio::io::stdout();
        self.serve(reader, writer).await
    }

    /// Serve on arbitrary streams. Each input line is one message; each
    /// response is written as one line and flushed. A line that is not valid
    /// UTF-8 or JSON gets a parse error reply and the loop keeps going.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> McpResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();

        tracing::info!("Stdio transport started");

        loop {
            buf.clear();
            let bytes_read = reader.read_until(b'\n', &mut buf).await?;

            if bytes_read == 0 {
                tracing::info!("EOF on stdin, shutting down");
                break;
            }

            let parsed = match std::str::from_utf8(&buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => framing::parse_message(line),
                Err(e) => Err(McpError::ParseError(format!("Invalid UTF-8: {e}"))),
            };

            let response = match parsed {
                Ok(msg) => self.handler.handle_message(msg).await,
                Err(e) => {
                    tracing::warn!("Parse error: {e}");
                    Some(serde_json::to_value(e.to_json_rpc_error(RequestId::Null))?)
                }
            };

            if let Some(response) = response {
                let framed = framing::frame_message(&response)?;
                writer.write_all(framed.as_bytes()).await.map_err(McpError::Io)?;
                writer.flush().await.map_err(McpError::Io)?;
            }
        }

        Ok(())
    }
}
