//! JSON plumbing shared by the chat providers.

use serde_json::{json, Value};
use tracing::debug;

use crate::provider::{LlmError, Message};

/// `{role, content}` objects in the shape every chat API accepts.
pub(crate) fn chat_messages<'m>(messages: impl IntoIterator<Item = &'m Message>) -> Vec<Value> {
    messages
        .into_iter()
        .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
        .collect()
}

/// Send `body` and decode the JSON reply. Non-2xx statuses become
/// `ApiError` carrying the response text.
pub(crate) async fn post_json(
    provider: &str,
    request: reqwest::RequestBuilder,
    body: &Value,
) -> Result<Value, LlmError> {
    let response = request
        .header("Content-Type", "application/json")
        .json(body)
        .send()
        .await?;

    let status = response.status();
    debug!(provider, status = status.as_u16(), "chat response");
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(LlmError::ApiError {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json().await?)
}

/// String at JSON `pointer` in a provider reply.
pub(crate) fn text_at(reply: &Value, pointer: &str) -> Result<String, LlmError> {
    reply
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| LlmError::ParseError(format!("missing {pointer}")))
}
