use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Inbound body of `POST /api/chat`.
///
/// Every field is lenient: a value of the wrong JSON type is treated as absent.
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default, deserialize_with = "string_or_none")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub system: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub context: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub user: Option<String>,
}

impl ChatRequest {
    /// Parses a raw request body. A missing, invalid or non-object body has no fields.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice::<Value>(body)
            .ok()
            .filter(Value::is_object)
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default()
    }

    /// The requested model, or `default` when none was named.
    pub fn model<'a>(&'a self, default: &'a str) -> &'a str {
        self.model
            .as_deref()
            .filter(|model| !model.trim().is_empty())
            .unwrap_or(default)
    }

    /// The user prompt, if it contains anything besides whitespace.
    pub fn prompt(&self) -> Option<&str> {
        self.user.as_deref().filter(|user| !user.trim().is_empty())
    }

    /// Conversation handed to the completion service: `system`, then `context`,
    /// then the user prompt.
    pub fn messages(&self, prompt: &str) -> Vec<Message> {
        let instructions = [&self.system, &self.context]
            .into_iter()
            .flatten()
            .filter(|text| !text.is_empty())
            .map(|text| Message::system(text.as_str()));

        instructions.chain([Message::user(prompt)]).collect()
    }
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Body of every `/api/chat` response, successful or not.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "system")]
    System,
    #[serde(rename = "user")]
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}
