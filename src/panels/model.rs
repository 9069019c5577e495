use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A client organisation listed on the dashboard.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Tenant {
    #[serde(deserialize_with = "id_as_string")]
    pub tenant_id: String,
    pub tenant_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Faq {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub question: String,
    pub answer: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ConversationMessage {
    pub sender: String,
    pub message_text: String,
    /// Unix seconds.
    pub timestamp: f64,
}

impl ConversationMessage {
    pub fn is_from_user(&self) -> bool {
        self.sender == "user"
    }
}

/// `labels[i]` is the month `values[i]` was counted for.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct MonthlyReport {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub values: Vec<f64>,
}

impl MonthlyReport {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.values.is_empty()
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ClientsResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tenants: Vec<Tenant>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct FaqsResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub faqs: Vec<Faq>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ChatHistoryResponse {
    #[serde(default)]
    pub wa_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub conversations: Vec<ConversationMessage>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PingResponse {
    #[serde(default)]
    pub message: Option<String>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Database ids arrive as numbers or strings depending on the backend.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number id, got {other}"
        ))),
    }
}
