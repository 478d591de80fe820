use crate::config::Config;
use crate::editor::Workspace;
use crate::gather::TagsSource;
use crate::params::ParamsOverride;
use crate::scope;
use crate::search::ProcessRunner;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Deserialize)]
struct RpcRequest {
    #[serde(default)]
    id: Value,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Serialize)]
struct RpcResponse {
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
}

#[derive(Serialize)]
struct RpcError {
    message: String,
}

/// Editor state carried by a request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionParams {
    #[serde(default)]
    complete_str: String,
    buffer_path: PathBuf,
    #[serde(default)]
    cwd: Option<PathBuf>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    tags_option: Option<String>,
}

impl SessionParams {
    fn workspace(self) -> Result<(Workspace, String)> {
        let cwd = match self.cwd {
            Some(cwd) => cwd,
            None => std::env::current_dir().with_context(|| "read current dir")?,
        };
        let workspace = match self.tags {
            Some(tags) => Workspace::with_tag_files(cwd, self.buffer_path, tags),
            None => {
                let option = self
                    .tags_option
                    .unwrap_or_else(|| Config::get().tags_option.clone());
                Workspace::new(cwd, self.buffer_path, &option)
            }
        };
        Ok((workspace, self.complete_str))
    }
}

pub fn serve<R: ProcessRunner>(source: &TagsSource<R>) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(value) => value,
            Err(err) => {
                tracing::error!("stdin error: {err}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = handle_line(source, &line);
        writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
        stdout.flush()?;
    }

    Ok(())
}

pub fn call<R: ProcessRunner>(
    source: &TagsSource<R>,
    method: String,
    params_raw: &str,
    id_raw: &str,
) -> Result<String> {
    let params: Value = serde_json::from_str(params_raw).with_context(|| "parse params JSON")?;
    let id = parse_value(id_raw);
    let request = RpcRequest { id, method, params };
    let response = handle_request(source, request);
    Ok(serde_json::to_string(&response)?)
}

/// Handle one JSONL request line and return the serialized response.
pub fn handle_json<R: ProcessRunner>(source: &TagsSource<R>, line: &str) -> Result<String> {
    Ok(serde_json::to_string(&handle_line(source, line))?)
}

fn handle_line<R: ProcessRunner>(source: &TagsSource<R>, line: &str) -> RpcResponse {
    match serde_json::from_str::<RpcRequest>(line) {
        Ok(request) => handle_request(source, request),
        Err(err) => error_response(Value::Null, &format!("invalid request: {err}")),
    }
}

fn handle_request<R: ProcessRunner>(source: &TagsSource<R>, req: RpcRequest) -> RpcResponse {
    let id = req.id.clone();
    match handle_method(source, &req.method, req.params) {
        Ok(value) => RpcResponse {
            id,
            result: Some(value),
            error: None,
        },
        Err(err) => {
            tracing::warn!("{} failed: {err:#}", req.method);
            error_response(id, &format!("{err:#}"))
        }
    }
}

pub fn handle_method<R: ProcessRunner>(
    source: &TagsSource<R>,
    method: &str,
    params: Value,
) -> Result<Value> {
    match method {
        "gather" => {
            let overrides = params
                .get("sourceParams")
                .map(ParamsOverride::from_value)
                .unwrap_or_default();
            let session: SessionParams =
                serde_json::from_value(params).with_context(|| "parse gather params")?;
            let (workspace, complete_str) = session.workspace()?;
            let candidates = source.gather(&workspace, &complete_str, &overrides)?;
            Ok(serde_json::to_value(candidates)?)
        }
        "scope" => {
            let session: SessionParams =
                serde_json::from_value(params).with_context(|| "parse scope params")?;
            let (workspace, _) = session.workspace()?;
            Ok(serde_json::to_value(scope::select(&workspace)?)?)
        }
        "params" => Ok(serde_json::to_value(source.params())?),
        "help" => Ok(method_help()),
        _ => bail!("unknown method: {method}"),
    }
}

fn method_help() -> Value {
    json!({
        "summary": "tagcomp completes identifiers from tag files via an external search tool, over JSONL on stdin/stdout.",
        "methods": {
            "gather": "{completeStr, bufferPath, cwd?, tags?, tagsOption?, sourceParams?: {cmd?, args?, maxSize?}} -> [{word, kind, menu}]",
            "scope": "{bufferPath, cwd?, tags?, tagsOption?} -> in-scope tag file paths",
            "params": "default source params",
            "help": "this message",
        },
    })
}

fn error_response(id: Value, message: &str) -> RpcResponse {
    RpcResponse {
        id,
        result: None,
        error: Some(RpcError {
            message: message.to_string(),
        }),
    }
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
