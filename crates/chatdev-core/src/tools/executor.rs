//! Tool executor — performs the side effect behind a tool invocation and
//! folds the outcome into a result block.
//!
//! Failures are contained per invocation: whatever goes wrong while
//! running one tool call becomes a `ToolResult { error: true }` fed back
//! to the model as ordinary conversational content. Sibling calls and
//! the surrounding loop are never aborted by a single bad call.
//!
//! All file paths are resolved relative to the thread's workspace and
//! must stay inside it; absolute paths and `..` escapes are rejected.

use std::collections::VecDeque;
use std::path::{Component, Path, PathBuf};

use regex::Regex;
use serde_json::Value;

use crate::models::{ContentBlock, ToolUse};
use crate::tools::{DOCKER, LIST_FILES, READ_FILE, REQUEST, WRITE_FILE};

/// Failure of a single tool invocation. Rendered into the error output of
/// the result block, never propagated out of the executor.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Path '{0}' leaves the workspace")]
    PathEscape(String),

    #[error("Invalid ignore pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Docker command failed: {0}")]
    Docker(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub struct ToolExecutor {
    client: reqwest::Client,
}

impl Default for ToolExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolExecutor {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Runs one tool invocation against the workspace and returns its
    /// result block. Never fails — errors become `error: true` results.
    pub async fn execute(&self, workspace: &Path, call: &ToolUse) -> ContentBlock {
        match self.run(workspace, call).await {
            Ok(output) => ContentBlock::tool_result(call.id.clone(), output),
            Err(e) => {
                tracing::warn!(tool = %call.name, "Tool call failed: {}", e);
                ContentBlock::tool_failure(call.id.clone(), e.to_string())
            }
        }
    }

    async fn run(&self, workspace: &Path, call: &ToolUse) -> Result<String, ToolError> {
        match call.name.as_str() {
            READ_FILE => self.read_file(workspace, &call.input).await,
            WRITE_FILE => self.write_file(workspace, &call.input).await,
            LIST_FILES => self.list_files(workspace, &call.input),
            DOCKER => self.docker(workspace, &call.input).await,
            REQUEST => self.request(&call.input).await,
            other => Err(ToolError::InvalidInput(format!("unknown tool '{other}'"))),
        }
    }

    async fn read_file(&self, workspace: &Path, input: &Value) -> Result<String, ToolError> {
        let path = resolve_workspace_path(workspace, str_arg(input, "file_path")?)?;
        Ok(tokio::fs::read_to_string(path).await?)
    }

    async fn write_file(&self, workspace: &Path, input: &Value) -> Result<String, ToolError> {
        let path = resolve_workspace_path(workspace, str_arg(input, "file_path")?)?;
        let content = str_arg(input, "content")?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, content).await?;
        Ok(String::new())
    }

    fn list_files(&self, workspace: &Path, input: &Value) -> Result<String, ToolError> {
        let patterns = input
            .get("ignore_patterns")
            .and_then(Value::as_array)
            .ok_or_else(|| ToolError::InvalidInput("missing array field 'ignore_patterns'".into()))?
            .iter()
            .map(|p| {
                p.as_str()
                    .ok_or_else(|| ToolError::InvalidInput("ignore pattern must be a string".into()))
                    .and_then(|raw| Ok(Regex::new(raw)?))
            })
            .collect::<Result<Vec<Regex>, ToolError>>()?;

        let files = walk_files(workspace)?
            .into_iter()
            .filter(|path| !patterns.iter().any(|pattern| pattern.is_match(path)))
            .collect::<Vec<String>>();
        Ok(files.join("\n"))
    }

    async fn docker(&self, workspace: &Path, input: &Value) -> Result<String, ToolError> {
        let arguments = input
            .get("arguments")
            .and_then(Value::as_array)
            .ok_or_else(|| ToolError::InvalidInput("missing array field 'arguments'".into()))?
            .iter()
            .map(|arg| {
                arg.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| ToolError::InvalidInput("docker arguments must be strings".into()))
            })
            .collect::<Result<Vec<String>, ToolError>>()?;

        let output = tokio::process::Command::new("docker")
            .args(&arguments)
            .current_dir(workspace)
            .output()
            .await?;

        if !output.status.success() {
            return Err(ToolError::Docker(
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn request(&self, input: &Value) -> Result<String, ToolError> {
        let method = input
            .get("method")
            .and_then(Value::as_str)
            .unwrap_or("GET");
        let method = reqwest::Method::from_bytes(method.as_bytes())
            .map_err(|_| ToolError::InvalidInput(format!("invalid HTTP method '{method}'")))?;
        let url = str_arg(input, "url")?;

        let mut request = self.client.request(method, url);
        if let Some(headers) = input.get("headers").and_then(Value::as_object) {
            for (key, value) in headers {
                if let Some(value) = value.as_str() {
                    request = request.header(key.as_str(), value);
                }
            }
        }
        if let Some(body) = input.get("body").and_then(Value::as_str) {
            request = request.body(body.to_string());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::Request(format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            )));
        }
        Ok(response.text().await?)
    }
}

fn str_arg<'a>(input: &'a Value, key: &str) -> Result<&'a str, ToolError> {
    input
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| ToolError::InvalidInput(format!("missing string field '{key}'")))
}

/// Joins a tool-supplied relative path onto the workspace root, rejecting
/// absolute paths and any traversal that would land outside the root.
fn resolve_workspace_path(workspace: &Path, file_path: &str) -> Result<PathBuf, ToolError> {
    let relative = Path::new(file_path);
    if relative.is_absolute() {
        return Err(ToolError::PathEscape(file_path.to_string()));
    }

    let mut depth: i64 = 0;
    for component in relative.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => {
                depth -= 1;
                if depth < 0 {
                    return Err(ToolError::PathEscape(file_path.to_string()));
                }
            }
            _ => return Err(ToolError::PathEscape(file_path.to_string())),
        }
    }

    Ok(workspace.join(relative))
}

/// Recursively enumerates all files under `base`, workspace-relative with
/// forward slashes, sorted for stable output.
fn walk_files(base: &Path) -> Result<Vec<String>, std::io::Error> {
    let mut files = Vec::new();
    let mut pending = VecDeque::from([base.to_path_buf()]);
    while let Some(dir) = pending.pop_front() {
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_dir() {
                pending.push_back(path);
            } else {
                let relative = path.strip_prefix(base).unwrap_or(&path);
                files.push(relative.to_string_lossy().replace('\\', "/"));
            }
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(name: &str, input: Value) -> ToolUse {
        ToolUse {
            id: "call_1".to_string(),
            name: name.to_string(),
            input,
        }
    }

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let executor = ToolExecutor::new();

        let written = executor
            .execute(
                dir.path(),
                &call(WRITE_FILE, json!({ "file_path": "src/main.rs", "content": "fn main() {}" })),
            )
            .await;
        let written = written.as_tool_result().unwrap();
        assert!(!written.error);
        assert_eq!(written.output, "");

        let read = executor
            .execute(dir.path(), &call(READ_FILE, json!({ "file_path": "src/main.rs" })))
            .await;
        let read = read.as_tool_result().unwrap();
        assert!(!read.error);
        assert_eq!(read.output, "fn main() {}");
    }

    #[tokio::test]
    async fn missing_file_becomes_error_result() {
        let dir = tempfile::tempdir().unwrap();
        let executor = ToolExecutor::new();

        let result = executor
            .execute(dir.path(), &call(READ_FILE, json!({ "file_path": "nope.txt" })))
            .await;
        let result = result.as_tool_result().unwrap();
        assert!(result.error);
        assert_eq!(result.id, "call_1");
        assert!(result.output.contains("IO error"));
    }

    #[tokio::test]
    async fn list_files_applies_ignore_patterns() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("node_modules/pkg")).unwrap();
        std::fs::write(dir.path().join("node_modules/pkg/index.js"), "x").unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/lib.rs"), "x").unwrap();
        std::fs::write(dir.path().join("README.md"), "x").unwrap();

        let executor = ToolExecutor::new();
        let result = executor
            .execute(
                dir.path(),
                &call(LIST_FILES, json!({ "ignore_patterns": ["node_modules"] })),
            )
            .await;
        let result = result.as_tool_result().unwrap();
        assert!(!result.error);
        assert_eq!(result.output, "README.md\nsrc/lib.rs");
    }

    #[tokio::test]
    async fn invalid_ignore_pattern_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let executor = ToolExecutor::new();
        let result = executor
            .execute(
                dir.path(),
                &call(LIST_FILES, json!({ "ignore_patterns": ["[unclosed"] })),
            )
            .await;
        assert!(result.as_tool_result().unwrap().error);
    }

    #[tokio::test]
    async fn path_traversal_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let executor = ToolExecutor::new();

        for path in ["../outside.txt", "/etc/passwd", "a/../../outside.txt"] {
            let result = executor
                .execute(dir.path(), &call(READ_FILE, json!({ "file_path": path })))
                .await;
            let result = result.as_tool_result().unwrap();
            assert!(result.error, "path '{path}' should be rejected");
            assert!(result.output.contains("leaves the workspace"));
        }

        // `..` that stays inside the workspace is fine
        let result = executor
            .execute(
                dir.path(),
                &call(WRITE_FILE, json!({ "file_path": "a/../inside.txt", "content": "ok" })),
            )
            .await;
        assert!(!result.as_tool_result().unwrap().error);
    }

    #[tokio::test]
    async fn missing_argument_is_an_error_result() {
        let dir = tempfile::tempdir().unwrap();
        let executor = ToolExecutor::new();
        let result = executor
            .execute(dir.path(), &call(WRITE_FILE, json!({ "file_path": "a.txt" })))
            .await;
        let result = result.as_tool_result().unwrap();
        assert!(result.error);
        assert!(result.output.contains("content"));
    }
}
