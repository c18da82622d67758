//! Modulo Server
//!
//! Line-delimited JSON-RPC 2.0 over stdio, one request per line.
//!
//! Methods:
//! - initialize / ping
//! - evaluate: evaluate an expression (`mode`: "live" or "final")
//! - functions/list: registered functions with their insert text
//! - functions/reload: rediscover functions without restarting
//!
//! Environment:
//! - RUST_LOG: log filter (default "info"), logs go to stderr
//! - MODULO_DISABLED_FUNCTIONS: comma separated names left out of discovery

use modulo::{CalcFunction, Calculator, Mode, Readout, RegistryConfig};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

const SERVER_NAME: &str = "modulo";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

const PARSE_ERROR: i32 = -32700;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;
const EVALUATION_ERROR: i32 = -32000;

#[derive(Debug, Deserialize)]
struct RpcRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<JsonValue>,
    method: String,
    #[serde(default)]
    params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
struct RpcResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
}

#[derive(Debug, Serialize)]
struct RpcError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<JsonValue>,
}

impl RpcError {
    fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), data: None }
    }
}

impl RpcResponse {
    fn success(id: Option<JsonValue>, result: JsonValue) -> Self {
        Self { jsonrpc: "2.0".to_string(), id, result: Some(result), error: None }
    }

    fn failure(id: Option<JsonValue>, error: RpcError) -> Self {
        Self { jsonrpc: "2.0".to_string(), id, result: None, error: Some(error) }
    }
}

#[derive(Debug, Deserialize)]
struct EvaluateParams {
    expression: String,
    #[serde(default)]
    mode: Mode,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    init_logging();

    let config = RegistryConfig::from_env();
    if !config.disabled.is_empty() {
        tracing::info!(disabled = ?config.disabled, "functions disabled by configuration");
    }
    let calculator = Calculator::with_config(config);

    tracing::info!(
        version = SERVER_VERSION,
        functions = calculator.functions().len(),
        "Modulo server started, waiting for requests"
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(e) = serve(&calculator, stdin.lock(), stdout.lock()) {
        tracing::error!(error = %e, "I/O failure");
    }

    tracing::info!("Server shutting down");
}

/// Answer requests line by line until EOF
fn serve(calculator: &Calculator, reader: impl BufRead, mut writer: impl Write) -> io::Result<()> {
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        tracing::debug!(bytes = line.len(), "received request");
        if let Some(response) = handle_line(calculator, line) {
            writeln!(writer, "{}", response)?;
            writer.flush()?;
        }
    }
    tracing::info!("client disconnected (EOF)");
    Ok(())
}

/// Returns the serialized response, or `None` for notifications
fn handle_line(calculator: &Calculator, line: &str) -> Option<String> {
    let response = match serde_json::from_str::<RpcRequest>(line) {
        Ok(request) => {
            tracing::debug!(method = %request.method, "processing");
            let response = handle_request(calculator, &request);
            if request.id.is_none() {
                tracing::debug!(method = %request.method, "notification processed (no response)");
                return None;
            }
            response
        }
        Err(e) => {
            tracing::warn!(error = %e, "error parsing request");
            RpcResponse::failure(None, RpcError::new(PARSE_ERROR, format!("Parse error: {}", e)))
        }
    };

    match serde_json::to_string(&response) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize response");
            None
        }
    }
}

fn handle_request(calculator: &Calculator, request: &RpcRequest) -> RpcResponse {
    let result = match request.method.as_str() {
        "initialize" => Ok(handle_initialize()),
        "initialized" | "ping" => Ok(json!({})),
        "evaluate" => handle_evaluate(calculator, &request.params),
        "functions/list" => Ok(handle_functions_list(calculator)),
        "functions/reload" => Ok(handle_functions_reload(calculator)),
        _ => Err(RpcError::new(
            METHOD_NOT_FOUND,
            format!("Method not found: {}", request.method),
        )),
    };

    match result {
        Ok(r) => RpcResponse::success(request.id.clone(), r),
        Err(e) => RpcResponse::failure(request.id.clone(), e),
    }
}

fn handle_initialize() -> JsonValue {
    json!({
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
        },
        "capabilities": {
            "evaluate": { "modes": ["live", "final"] },
            "functions": { "reload": true },
        }
    })
}

fn handle_evaluate(calculator: &Calculator, params: &Option<JsonValue>) -> Result<JsonValue, RpcError> {
    let params: EvaluateParams = params
        .clone()
        .ok_or_else(|| RpcError::new(INVALID_PARAMS, "Missing params"))
        .and_then(|p| {
            serde_json::from_value(p)
                .map_err(|e| RpcError::new(INVALID_PARAMS, format!("Invalid params: {}", e)))
        })?;

    let readout = calculator.readout(&params.expression, params.mode);
    readout_to_result(readout)
}

fn readout_to_result(readout: Readout) -> Result<JsonValue, RpcError> {
    match readout.error {
        None => Ok(json!({
            // non-finite values become null; `text` carries Infinity/NaN
            "value": readout.value,
            "text": readout.text,
        })),
        Some(err) => Err(RpcError {
            code: EVALUATION_ERROR,
            message: err.to_string(),
            data: Some(json!({
                "kind": err.kind(),
                "incomplete": err.is_incomplete(),
                "display": readout.text,
            })),
        }),
    }
}

fn handle_functions_list(calculator: &Calculator) -> JsonValue {
    let functions: Vec<JsonValue> = calculator
        .functions()
        .iter()
        .map(|f| {
            json!({
                "name": f.name(),
                "insertText": f.insert_text(),
                "description": f.description(),
                "arity": f.arity(),
            })
        })
        .collect();

    json!({
        "functions": functions,
        "generation": calculator.registry().generation(),
    })
}

fn handle_functions_reload(calculator: &Calculator) -> JsonValue {
    let report = calculator.reload();
    json!({
        "generation": calculator.registry().generation(),
        "registered": report.registered,
        "duplicates": report.duplicates,
        "disabled": report.disabled,
        "failures": report.failures,
    })
}
