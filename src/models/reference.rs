//! 科目、章节、难度等参考数据
//!
//! 列表接口的返回格式不统一：可能是数组，也可能是 `{items: []}` 或 `{data: []}`。

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    #[serde(alias = "subjectId", deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(alias = "subjectName", default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    #[serde(alias = "chapterId", deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(alias = "chapterName", default)]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub subject_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    #[serde(alias = "levelId", deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(alias = "levelName", default)]
    pub name: String,
}

macro_rules! impl_display {
    ($($ty:ty),*) => {
        $(impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:>6}  {}", self.id, self.name)
            }
        })*
    };
}

impl_display!(Subject, Chapter, Level);

/// 从任意列表响应中取出元素数组
pub fn extract_items(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            for key in ["items", "data", "$values"] {
                if let Some(inner) = map.remove(key) {
                    let items = extract_items(inner);
                    if !items.is_empty() {
                        return items;
                    }
                }
            }
            Vec::new()
        }
        _ => Vec::new(),
    }
}

/// 解析列表响应，无法识别的元素会被跳过
pub fn parse_list<T: DeserializeOwned>(value: Value) -> Vec<T> {
    extract_items(value)
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<T>(item) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::debug!("跳过无法解析的列表元素: {}", e);
                None
            }
        })
        .collect()
}

// ID 可能是数字也可能是字符串
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer id")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
