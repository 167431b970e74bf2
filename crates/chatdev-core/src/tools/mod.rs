//! The tool catalogue — the fixed set of capabilities a model may invoke
//! during a turn, each declared with a JSON-Schema input shape.
//!
//! The registry is built once and shared read-only by every adapter;
//! side effects live in [`executor`].

pub mod executor;

pub use executor::{ToolError, ToolExecutor};

use serde_json::json;

use crate::models::Tool;

pub const READ_FILE: &str = "read_file";
pub const WRITE_FILE: &str = "write_file";
pub const LIST_FILES: &str = "list_files";
pub const DOCKER: &str = "docker";
pub const REQUEST: &str = "request";

/// The process-wide tool catalogue.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<Tool>,
}

impl ToolRegistry {
    /// The standard five-tool catalogue: file read/write/list, container
    /// execution and HTTP requests.
    pub fn standard() -> Self {
        Self {
            tools: vec![
                Tool::new(
                    READ_FILE,
                    "Allows you to read files and shall be used anytime something similar to \
                     reading a file should be achieved. It returns the full content of the file.",
                    json!({
                        "type": "object",
                        "properties": {
                            "file_path": {
                                "type": "string",
                                "description": "path to the file that should be read"
                            }
                        },
                        "required": ["file_path"]
                    }),
                ),
                Tool::new(
                    WRITE_FILE,
                    "Allows you to write files and shall be used anytime something similar to \
                     writing a file should be achieved. It returns an empty string.",
                    json!({
                        "type": "object",
                        "properties": {
                            "file_path": {
                                "type": "string",
                                "description": "path to the file that should be written"
                            },
                            "content": {
                                "type": "string",
                                "description": "content to write into the file"
                            }
                        },
                        "required": ["file_path", "content"]
                    }),
                ),
                Tool::new(
                    LIST_FILES,
                    "Allows you to list files and shall be used anytime something similar to \
                     listing files should be achieved. It returns a formatted list of file \
                     paths. Always use the first parameter and ignore files like node_modules, \
                     .git and similar ones you can think of.",
                    json!({
                        "type": "object",
                        "properties": {
                            "ignore_patterns": {
                                "type": "array",
                                "description": "an array of regular expressions that will be \
                                 matched against the full path of every file. Use it to ignore \
                                 files you don't need to look at, e.g. dependency/library and \
                                 output folders of code projects.",
                                "items": { "type": "string" }
                            }
                        },
                        "required": ["ignore_patterns"]
                    }),
                ),
                Tool::new(
                    DOCKER,
                    "Allows you to set up development and execution environments for any kind \
                     of content, e.g. programming languages, latex etc. You can test, execute, \
                     build and deploy with it. Also create compose.yml files that describe your \
                     docker setup and make it reproducible. Always use relative paths for \
                     mounts, don't use shell-specific arguments like $(pwd). Your workspace is \
                     directly in your project folder (./), mount from there, i.e. \"./:/app\"",
                    json!({
                        "type": "object",
                        "properties": {
                            "arguments": {
                                "type": "array",
                                "description": "the arguments of the docker command to run, e.g. \
                                 [\"run\", \"-p\", \"8080:8080\", \"-v\", \".:/app\", \"node\", \
                                 \"index.js\"].",
                                "items": { "type": "string" }
                            }
                        },
                        "required": ["arguments"]
                    }),
                ),
                Tool::new(
                    REQUEST,
                    "Allows you to send HTTP requests to anywhere. You can grab any HTTP \
                     resource and construct dynamic requests to get additional content, test \
                     HTTP endpoints, request APIs, use search engines, fill out forms etc.",
                    json!({
                        "type": "object",
                        "properties": {
                            "method": {
                                "type": "string",
                                "enum": ["GET", "POST", "PATCH", "PUT", "DELETE", "OPTIONS", "HEAD", "TRACE"],
                                "default": "GET"
                            },
                            "url": {
                                "type": "string",
                                "description": "The URL to request."
                            },
                            "headers": {
                                "type": "object",
                                "additionalProperties": { "type": "string" }
                            },
                            "body": { "type": "string" }
                        },
                        "required": ["url"]
                    }),
                ),
            ],
        }
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.iter().any(|tool| tool.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_declares_five_tools() {
        let registry = ToolRegistry::standard();
        let names: Vec<&str> = registry.tools().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec![READ_FILE, WRITE_FILE, LIST_FILES, DOCKER, REQUEST]);
    }

    #[test]
    fn tool_names_are_unique() {
        let registry = ToolRegistry::standard();
        for tool in registry.tools() {
            assert!(registry.contains(&tool.name));
            assert_eq!(
                registry.tools().iter().filter(|t| t.name == tool.name).count(),
                1
            );
        }
        assert!(!registry.contains("delete_everything"));
    }

    #[test]
    fn schemas_declare_required_fields() {
        let registry = ToolRegistry::standard();
        for tool in registry.tools() {
            assert_eq!(tool.input_schema["type"], "object");
            assert!(tool.input_schema["required"].is_array());
        }
    }
}
