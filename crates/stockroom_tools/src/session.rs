//! Line-delimited JSON-RPC 2.0 session for tool invocation.
//!
//! # Responsibility
//! - Parse one request per line and write one response per line.
//! - Map tool failures to `isError` results and protocol failures to
//!   JSON-RPC error objects.
//!
//! # Invariants
//! - Notifications (requests with no `id` member) never produce output. An
//!   explicit `"id": null` is a request and is answered.
//! - The writer is flushed after every response.

use crate::catalog::tool_catalog;
use crate::dispatch::{ToolDispatcher, ToolError};
use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::{json, Value};
use std::io::{BufRead, Write};
use stockroom_core::{core_version, ProductRepository};

/// Server name reported by `initialize`.
pub const SERVER_NAME: &str = "Inventory Manager (Explicit Tools)";
const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

const PARSE_ERROR: i64 = -32700;
const INVALID_REQUEST: i64 = -32600;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;

#[derive(Debug, Deserialize)]
struct RpcRequest {
    #[serde(default)]
    jsonrpc: Option<String>,
    #[serde(default)]
    id: Value,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// One tool-protocol session bound to a dispatcher.
pub struct ToolSession<R: ProductRepository> {
    dispatcher: ToolDispatcher<R>,
}

impl<R: ProductRepository> ToolSession<R> {
    pub fn new(dispatcher: ToolDispatcher<R>) -> Self {
        Self { dispatcher }
    }

    /// Serves requests from `reader` until end of input.
    ///
    /// Blank lines are ignored. I/O errors end the session.
    pub fn run(&self, reader: impl BufRead, mut writer: impl Write) -> std::io::Result<()> {
        info!("event=tool_session module=tools status=start");
        let mut handled = 0_u64;

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            handled += 1;
            if let Some(response) = self.handle_line(&line) {
                serde_json::to_writer(&mut writer, &response)?;
                writer.write_all(b"\n")?;
                writer.flush()?;
            }
        }

        info!(
            "event=tool_session module=tools status=ok messages={}",
            handled
        );
        Ok(())
    }

    /// Handles one raw message; returns the response, if any.
    pub fn handle_line(&self, line: &str) -> Option<Value> {
        let raw: Value = match serde_json::from_str(line) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(
                    "event=rpc_parse module=tools status=error error_code=parse_error line={} column={}",
                    err.line(),
                    err.column()
                );
                return Some(error_response(Value::Null, PARSE_ERROR, "Parse error"));
            }
        };

        let is_notification = raw.get("id").is_none();
        let request: RpcRequest = match serde_json::from_value(raw) {
            Ok(request) => request,
            Err(err) => {
                return Some(error_response(
                    Value::Null,
                    INVALID_REQUEST,
                    &format!("Invalid request: {err}"),
                ))
            }
        };
        if request.jsonrpc.as_deref().is_some_and(|version| version != "2.0") {
            return Some(error_response(
                request.id,
                INVALID_REQUEST,
                "Invalid request: jsonrpc must be \"2.0\"",
            ));
        }

        if is_notification {
            debug!(
                "event=rpc_notification module=tools status=ok method={}",
                request.method
            );
            return None;
        }

        let id = request.id;
        Some(match self.dispatch(&request.method, request.params) {
            Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
            Err((code, message)) => error_response(id, code, &message),
        })
    }

    fn dispatch(&self, method: &str, params: Value) -> Result<Value, (i64, String)> {
        match method {
            "initialize" => Ok(initialize_result(&params)),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": tool_catalog() })),
            "tools/call" => {
                let params: CallParams = serde_json::from_value(params)
                    .map_err(|err| (INVALID_PARAMS, format!("Invalid params: {err}")))?;
                self.call_tool(&params.name, params.arguments)
            }
            other => Err((METHOD_NOT_FOUND, format!("Method not found: {other}"))),
        }
    }

    fn call_tool(&self, name: &str, arguments: Value) -> Result<Value, (i64, String)> {
        match self.dispatcher.call(name, arguments) {
            Ok(value) => Ok(json!({
                "content": [{ "type": "text", "text": value.to_string() }],
                "structuredContent": { "result": value },
                "isError": false,
            })),
            Err(err @ (ToolError::Inventory(_) | ToolError::Encode(_))) => Ok(json!({
                "content": [{ "type": "text", "text": err.to_string() }],
                "isError": true,
            })),
            Err(err @ (ToolError::UnknownTool(_) | ToolError::InvalidArguments { .. })) => {
                Err((INVALID_PARAMS, err.to_string()))
            }
        }
    }
}

fn initialize_result(params: &Value) -> Value {
    let protocol_version = params
        .get("protocolVersion")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_PROTOCOL_VERSION);
    json!({
        "protocolVersion": protocol_version,
        "capabilities": { "tools": { "listChanged": false } },
        "serverInfo": { "name": SERVER_NAME, "version": core_version() },
    })
}

fn error_response(id: Value, code: i64, message: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": code, "message": message },
    })
}
