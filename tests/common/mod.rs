#![allow(dead_code)]

use std::path::PathBuf;

use serde_json::{json, Value};
use tempfile::TempDir;

/// Configuration matching the shipped `config/config.yaml`
pub const SAMPLE_CONFIG: &str = r#"
llm:
  groq:
    provider: "groq"
    model_name: "deepseek-r1-distill-llama-70b"
  openai:
    provider: "openai"
    model_name: "o4-mini"
"#;

/// Write `yaml` to `config.yaml` inside a fresh temporary directory
///
/// The directory is removed when the returned guard is dropped.
pub fn write_config(yaml: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, yaml).expect("Failed to write config");
    (dir, path)
}

/// A chat-completions body whose single choice is plain text
pub fn text_completion(text: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": text},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 20, "completion_tokens": 8, "total_tokens": 28}
    })
}

/// A chat-completions body requesting one function call
pub fn tool_call_completion(id: &str, name: &str, arguments: Value) -> Value {
    json!({
        "id": "chatcmpl-0",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": id,
                    "type": "function",
                    "function": {"name": name, "arguments": arguments.to_string()}
                }]
            },
            "finish_reason": "tool_calls"
        }],
        "usage": {"prompt_tokens": 15, "completion_tokens": 5, "total_tokens": 20}
    })
}
