use crate::models::validation::RowError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 服务端返回的导入结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportSummary {
    pub total_processed: usize,
    pub success_count: usize,
    pub failed_count: usize,
    pub new_questions: usize,
    pub updated_questions: usize,
    #[serde(deserialize_with = "deserialize_warnings")]
    pub warnings: Vec<String>,
    #[serde(deserialize_with = "deserialize_errors")]
    pub errors: Vec<RowError>,
}

impl ImportSummary {
    /// 解析导入接口的响应，结果可能在顶层，也可能包在 `data` 里
    pub fn from_response(value: Value) -> serde_json::Result<Self> {
        let inner = match value {
            Value::Object(mut map) if is_envelope(&map) => map.remove("data").unwrap_or(Value::Null),
            other => other,
        };
        if inner.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(inner)
    }

    /// 请求失败时合成的结果：只有一条错误
    pub fn from_failure(message: impl Into<String>) -> Self {
        Self {
            errors: vec![RowError {
                row: 0,
                errors: vec![message.into()],
            }],
            ..Default::default()
        }
    }

    pub fn has_errors(&self) -> bool {
        self.failed_count > 0 || !self.errors.is_empty()
    }
}

fn is_envelope(map: &serde_json::Map<String, Value>) -> bool {
    map.get("data").map(Value::is_object).unwrap_or(false)
        && !map.contains_key("totalProcessed")
        && !map.contains_key("successCount")
}

fn deserialize_errors<'de, D>(deserializer: D) -> Result<Vec<RowError>, D::Error>
where
    D: Deserializer<'de>,
{
    let errors: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match errors {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(entries)) => entries
            .into_iter()
            .filter(|entry| !entry.is_null())
            .map(error_entry)
            .collect(),
        Some(single) => vec![error_entry(single)],
    })
}

/// 单条错误：`{row, errors}`、`{row, message}`、`{row, error}` 或一段文字
fn error_entry(entry: Value) -> RowError {
    match entry {
        Value::String(message) => RowError {
            row: 0,
            errors: vec![message],
        },
        Value::Object(map) => {
            let row = map.get("row").and_then(row_number).unwrap_or(0);
            let mut errors: Vec<String> = ["errors", "message", "error"]
                .iter()
                .filter_map(|key| map.get(*key))
                .flat_map(messages)
                .collect();
            if errors.is_empty() {
                errors.push(Value::Object(map).to_string());
            }
            RowError { row, errors }
        }
        other => RowError {
            row: 0,
            errors: vec![other.to_string()],
        },
    }
}

fn row_number(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n.as_u64().map(|n| n as usize),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn messages(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::String(s) if s.trim().is_empty() => Vec::new(),
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items.iter().flat_map(messages).collect(),
        other => vec![other.to_string()],
    }
}

fn deserialize_warnings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let warnings: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(warnings
        .unwrap_or_default()
        .into_iter()
        .map(|w| match w {
            Value::String(s) => s,
            other => other.to_string(),
        })
        .collect())
}
