//! Mapping between abstraction types and chat-completions types

use crate::llm::core::{
    error::LlmError,
    provider::Provider,
    types::{
        ContentBlock, FinishReason, GenerateRequest, GenerateResponse, Message, MessageRole,
        ToolDeclaration, UsageMetadata,
    },
};

use super::types::{
    ChatFunction, ChatFunctionCall, ChatMessage, ChatRequest, ChatResponse, ChatTool,
    ChatToolCall, ErrorEnvelope,
};

/// Convert our abstraction request to the chat-completions request format
///
/// The token cap goes out under the field name `provider` accepts.
pub fn to_chat_request(provider: Provider, model: &str, request: GenerateRequest) -> ChatRequest {
    let mut messages = Vec::with_capacity(request.messages.len() + 1);
    if let Some(system) = request.system {
        messages.push(ChatMessage::text("system", system));
    }
    for message in request.messages {
        push_chat_messages(&mut messages, message);
    }

    let max_tokens = request.config.max_tokens;
    let (max_tokens, max_completion_tokens) = match provider {
        Provider::Groq => (Some(max_tokens), None),
        Provider::OpenAi => (None, Some(max_tokens)),
    };

    ChatRequest {
        model: model.to_string(),
        messages,
        tools: request
            .tools
            .filter(|tools| !tools.is_empty())
            .map(|tools| tools.into_iter().map(to_chat_tool).collect()),
        max_tokens,
        max_completion_tokens,
        temperature: request.config.temperature,
    }
}

/// Append the chat messages for one abstraction message
///
/// Tool results become one "tool" message each, emitted after any text or
/// tool calls carried by the same message.
fn push_chat_messages(out: &mut Vec<ChatMessage>, message: Message) {
    let mut text = String::new();
    let mut tool_calls = Vec::new();
    let mut tool_results = Vec::new();

    for block in message.content {
        match block {
            ContentBlock::Text { text: part } => text.push_str(&part),
            ContentBlock::ToolUse { id, name, input } => tool_calls.push(ChatToolCall {
                id,
                kind: "function".to_string(),
                function: ChatFunctionCall {
                    name,
                    arguments: input.to_string(),
                },
            }),
            ContentBlock::ToolResult {
                tool_use_id,
                content,
                is_error,
            } => tool_results.push(ChatMessage {
                role: "tool".to_string(),
                content: Some(if is_error {
                    format!("Error: {}", content)
                } else {
                    content
                }),
                tool_calls: None,
                tool_call_id: Some(tool_use_id),
            }),
        }
    }

    if !text.is_empty() || !tool_calls.is_empty() {
        let role = match message.role {
            MessageRole::Assistant => "assistant",
            // Stray text on a tool message is passed along as user input
            MessageRole::User | MessageRole::Tool => "user",
        };
        out.push(ChatMessage {
            role: role.to_string(),
            content: (!text.is_empty()).then_some(text),
            tool_calls: (!tool_calls.is_empty()).then_some(tool_calls),
            tool_call_id: None,
        });
    }

    out.extend(tool_results);
}

/// Convert a tool declaration to a chat-completions function tool
fn to_chat_tool(declaration: ToolDeclaration) -> ChatTool {
    let mut parameters = declaration.input_schema;
    if let Some(object) = parameters.as_object_mut() {
        object.remove("$schema");
    }

    ChatTool {
        kind: "function".to_string(),
        function: ChatFunction {
            name: declaration.name,
            description: declaration.description,
            parameters,
        },
    }
}

/// Convert a chat-completions response into our abstraction response
pub fn from_chat_response(response: ChatResponse) -> Result<GenerateResponse, LlmError> {
    let usage = response
        .usage
        .map(|u| UsageMetadata::new(u.prompt_tokens, u.completion_tokens));

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(LlmError::EmptyResponse)?;

    let mut content = Vec::new();
    if let Some(text) = choice.message.content.filter(|t| !t.is_empty()) {
        content.push(ContentBlock::Text { text });
    }

    let tool_calls = choice.message.tool_calls.unwrap_or_default();
    let has_tool_calls = !tool_calls.is_empty();
    for call in tool_calls {
        let input = tool_arguments(&call)?;
        content.push(ContentBlock::ToolUse {
            id: call.id,
            name: call.function.name,
            input,
        });
    }

    let finish_reason = match choice.finish_reason.as_deref() {
        Some(reason) => FinishReason::from_wire(reason),
        None if has_tool_calls => FinishReason::ToolUse,
        None => FinishReason::Stop,
    };

    Ok(GenerateResponse {
        content,
        finish_reason,
        usage,
    })
}

/// Parse a call's JSON-encoded arguments; an empty string means no arguments
fn tool_arguments(call: &ChatToolCall) -> Result<serde_json::Value, LlmError> {
    let raw = call.function.arguments.trim();
    if raw.is_empty() {
        return Ok(serde_json::json!({}));
    }

    let invalid = |reason: String| LlmError::InvalidToolArguments {
        id: call.id.clone(),
        name: call.function.name.clone(),
        reason,
    };
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) if value.is_object() => Ok(value),
        Ok(value) => Err(invalid(format!("expected a JSON object, got {}", value))),
        Err(e) => Err(invalid(e.to_string())),
    }
}

/// Map a failed HTTP response to the matching error variant
pub fn error_from_status(
    status: u16,
    retry_after: Option<std::time::Duration>,
    body: String,
) -> LlmError {
    if status == 429 {
        return LlmError::RateLimited { retry_after };
    }

    let envelope = serde_json::from_str::<ErrorEnvelope>(&body).ok();
    match (status, envelope) {
        (401, Some(envelope)) => LlmError::Authentication(envelope.error.message),
        (401, None) => LlmError::Authentication(body),
        (_, Some(envelope)) => LlmError::Api {
            code: envelope
                .error
                .code
                .or(envelope.error.kind)
                .unwrap_or_else(|| status.to_string()),
            message: envelope.error.message,
        },
        (_, None) => LlmError::Http { status, body },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::core::config::GenerationConfig;
    use serde_json::json;

    fn request(messages: Vec<Message>) -> GenerateRequest {
        GenerateRequest {
            messages,
            tools: None,
            config: GenerationConfig::new(256).with_temperature(0.2),
            system: Some("You are a travel planner.".to_string()),
        }
    }

    #[test]
    fn test_system_prompt_comes_first() {
        let chat = to_chat_request(
            Provider::OpenAi,
            "gpt-4o-mini",
            request(vec![Message::user("Hi")]),
        );

        assert_eq!(chat.model, "gpt-4o-mini");
        assert_eq!(chat.messages.len(), 2);
        assert_eq!(
            chat.messages[0],
            ChatMessage::text("system", "You are a travel planner.")
        );
        assert_eq!(chat.messages[1], ChatMessage::text("user", "Hi"));
        assert_eq!(chat.temperature, Some(0.2));
        assert!(chat.tools.is_none());
    }

    #[test]
    fn test_tool_round_trip_messages() {
        let assistant = Message {
            role: MessageRole::Assistant,
            content: vec![ContentBlock::ToolUse {
                id: "call_1".to_string(),
                name: "multiply".to_string(),
                input: json!({"a": 3, "b": 4}),
            }],
        };
        let chat = to_chat_request(
            Provider::Groq,
            "llama-3.1-8b-instant",
            request(vec![
                Message::user("3 times 4?"),
                assistant,
                Message::tool_result("call_1", "{\"product\":12}"),
                Message::tool_error("call_2", "boom"),
            ]),
        );

        let call_message = &chat.messages[2];
        assert_eq!(call_message.role, "assistant");
        assert!(call_message.content.is_none());
        let calls = call_message.tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].function.name, "multiply");
        let args: serde_json::Value = serde_json::from_str(&calls[0].function.arguments).unwrap();
        assert_eq!(args, json!({"a": 3, "b": 4}));

        assert_eq!(chat.messages[3].role, "tool");
        assert_eq!(chat.messages[3].tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(chat.messages[4].content.as_deref(), Some("Error: boom"));
    }

    #[test]
    fn test_tools_drop_schema_key() {
        let mut req = request(vec![Message::user("Hi")]);
        req.tools = Some(vec![ToolDeclaration {
            name: "multiply".to_string(),
            description: "Multiply two integers".to_string(),
            input_schema: json!({
                "$schema": "http://json-schema.org/draft-07/schema#",
                "type": "object",
                "properties": {"a": {"type": "integer"}}
            }),
        }]);

        let chat = to_chat_request(Provider::Groq, "m", req);
        let tools = chat.tools.unwrap();
        assert_eq!(tools[0].kind, "function");
        assert!(tools[0].function.parameters.get("$schema").is_none());
        assert_eq!(tools[0].function.parameters["type"], "object");
    }

    #[test]
    fn test_empty_tool_list_is_omitted() {
        let mut req = request(vec![Message::user("Hi")]);
        req.tools = Some(vec![]);
        let json = serde_json::to_value(to_chat_request(Provider::OpenAi, "m", req)).unwrap();
        assert!(json.get("tools").is_none());
    }

    #[test]
    fn test_token_cap_field_per_provider() {
        let openai = to_chat_request(
            Provider::OpenAi,
            "o4-mini",
            GenerateRequest::from_prompt("hi", GenerationConfig::default()),
        );
        let json = serde_json::to_value(openai).unwrap();
        assert_eq!(json["max_completion_tokens"], 1024);
        assert!(json.get("max_tokens").is_none());

        let groq = to_chat_request(
            Provider::Groq,
            "deepseek-r1-distill-llama-70b",
            GenerateRequest::from_prompt("hi", GenerationConfig::new(256)),
        );
        let json = serde_json::to_value(groq).unwrap();
        assert_eq!(json["max_tokens"], 256);
        assert!(json.get("max_completion_tokens").is_none());
    }

    #[test]
    fn test_from_chat_response_with_tool_calls() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {"name": "convert_currency", "arguments": "{\"amount\":10}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 8, "total_tokens": 20}
        }))
        .unwrap();

        let result = from_chat_response(response).unwrap();
        assert_eq!(result.finish_reason, FinishReason::ToolUse);
        assert_eq!(result.usage, Some(UsageMetadata::new(12, 8)));
        assert_eq!(
            result.content,
            vec![ContentBlock::ToolUse {
                id: "call_abc".to_string(),
                name: "convert_currency".to_string(),
                input: json!({"amount": 10}),
            }]
        );
    }

    #[test]
    fn test_from_chat_response_without_choices() {
        let response: ChatResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        let err = from_chat_response(response).unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }

    #[test]
    fn test_from_chat_response_bad_arguments() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {"name": "multiply", "arguments": "{not json"}
                    }]
                }
            }]
        }))
        .unwrap();

        let err = from_chat_response(response).unwrap_err();
        match err {
            LlmError::InvalidToolArguments { id, name, .. } => {
                assert_eq!(id, "call_1");
                assert_eq!(name, "multiply");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_chat_response_non_object_arguments() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "tool_calls": [{
                        "id": "call_2",
                        "type": "function",
                        "function": {"name": "calculate_total", "arguments": "[1, 2]"}
                    }]
                }
            }]
        }))
        .unwrap();

        let err = from_chat_response(response).unwrap_err();
        assert!(matches!(err, LlmError::InvalidToolArguments { .. }));
    }

    #[test]
    fn test_from_chat_response_empty_arguments() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "tool_calls": [{
                        "id": "call_3",
                        "type": "function",
                        "function": {"name": "list_rates", "arguments": ""}
                    }]
                }
            }]
        }))
        .unwrap();

        let result = from_chat_response(response).unwrap();
        assert_eq!(result.finish_reason, FinishReason::ToolUse);
        assert_eq!(
            result.content,
            vec![ContentBlock::ToolUse {
                id: "call_3".to_string(),
                name: "list_rates".to_string(),
                input: json!({}),
            }]
        );
    }

    #[test]
    fn test_error_from_status() {
        assert!(matches!(
            error_from_status(429, None, String::new()),
            LlmError::RateLimited { retry_after: None }
        ));

        let body = json!({"error": {
            "message": "Incorrect API key",
            "type": "invalid_request_error",
            "code": "invalid_api_key"
        }});
        assert!(matches!(
            error_from_status(401, None, body.to_string()),
            LlmError::Authentication(msg) if msg == "Incorrect API key"
        ));

        let body = json!({"error": {
            "message": "model not found",
            "type": "invalid_request_error"
        }});
        match error_from_status(404, None, body.to_string()) {
            LlmError::Api { code, message } => {
                assert_eq!(code, "invalid_request_error");
                assert_eq!(message, "model not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(matches!(
            error_from_status(502, None, "bad gateway".to_string()),
            LlmError::Http { status: 502, .. }
        ));
    }
}
