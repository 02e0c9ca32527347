//! TCP tuning server

use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::protocol::{DebugCommand, DebugResponse};

/// Trait that the application implements to answer tuning commands
pub trait DebugHandler: Send + Sync + 'static {
    fn handle_command(&mut self, cmd: DebugCommand) -> DebugResponse;
}

/// Server handle - keep this alive to keep the server running
pub struct DebugServer {
    _handle: tokio::task::JoinHandle<()>,
}

impl DebugServer {
    /// Start the server on the given port.
    /// Must be called from inside a tokio runtime; returns immediately.
    pub fn start(handler: Arc<Mutex<dyn DebugHandler>>, port: u16) -> Self {
        let handle = tokio::spawn(async move {
            let addr = format!("127.0.0.1:{}", port);
            let listener = match TcpListener::bind(&addr).await {
                Ok(l) => {
                    log::info!("Tuning server listening on {}", addr);
                    l
                }
                Err(e) => {
                    log::error!("Failed to bind tuning server on {}: {}", addr, e);
                    return;
                }
            };

            loop {
                match listener.accept().await {
                    Ok((stream, peer)) => {
                        log::info!("Tuning client connected from {}", peer);
                        let handler = handler.clone();
                        tokio::spawn(async move {
                            handle_connection(stream, handler).await;
                            log::info!("Tuning client disconnected: {}", peer);
                        });
                    }
                    Err(e) => {
                        log::error!("Tuning server accept error: {}", e);
                    }
                }
            }
        });

        Self { _handle: handle }
    }
}

/// Parse one request line and produce the JSON response line (without newline).
pub fn respond_to_line(line: &str, handler: &mut dyn DebugHandler) -> String {
    let response = match serde_json::from_str::<DebugCommand>(line) {
        Ok(cmd) => {
            log::debug!("Tuning command: {:?}", cmd);
            handler.handle_command(cmd)
        }
        Err(e) => DebugResponse::error(format!("Invalid command JSON: {}", e)),
    };

    serde_json::to_string(&response).unwrap_or_else(|e| {
        format!(
            "{{\"status\":\"error\",\"message\":\"Serialize error: {}\"}}",
            e
        )
    })
}

async fn handle_connection(
    stream: tokio::net::TcpStream,
    handler: Arc<Mutex<dyn DebugHandler>>,
) {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => break, // Connection closed
            Ok(_) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                let mut resp_json = {
                    let mut h = handler.lock().await;
                    respond_to_line(trimmed, &mut *h)
                };
                resp_json.push('\n');

                if let Err(e) = writer.write_all(resp_json.as_bytes()).await {
                    log::error!("Tuning server write error: {}", e);
                    break;
                }
                if let Err(e) = writer.flush().await {
                    log::error!("Tuning server flush error: {}", e);
                    break;
                }
            }
            Err(e) => {
                log::error!("Tuning server read error: {}", e);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ResponseData;

    struct PingOnly;

    impl DebugHandler for PingOnly {
        fn handle_command(&mut self, cmd: DebugCommand) -> DebugResponse {
            match cmd {
                DebugCommand::Ping => DebugResponse::pong(),
                _ => DebugResponse::error("unsupported"),
            }
        }
    }

    #[test]
    fn test_ping_line() {
        let out = respond_to_line(r#"{"cmd":"Ping"}"#, &mut PingOnly);
        let resp: DebugResponse = serde_json::from_str(&out).unwrap();
        match resp {
            DebugResponse::Ok { data: ResponseData::Pong { message } } => assert_eq!(message, "pong"),
            other => panic!("unexpected response {:?}", other),
        }
    }

    #[test]
    fn test_garbage_line_is_error() {
        let out = respond_to_line("not json", &mut PingOnly);
        assert!(out.contains("\"status\":\"error\""));
        assert!(out.contains("Invalid command JSON"));
    }
}
