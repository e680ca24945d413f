use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// 更新閘道回傳的專案資訊
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectDetails {
    #[serde(default, deserialize_with = "deserialize_truthy")]
    pub is_active: bool,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// 閘道的旗標可能是 bool、數字或字串；null、false、0、"0"、"" 視為未啟用
fn deserialize_truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    })
}

/// 安裝核心套件時的版本限制 (--want)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConstraint(Option<String>);

impl VersionConstraint {
    pub fn new(want: Option<String>) -> Self {
        Self(want.filter(|w| !w.trim().is_empty()))
    }

    pub fn any() -> Self {
        Self(None)
    }

    /// 使用者明確指定的版本
    pub fn requested(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn resolve<'a>(&'a self, default: &'a str) -> &'a str {
        self.0.as_deref().unwrap_or(default)
    }
}

/// 翻譯字串的替換變數
pub type LangVars = HashMap<String, String>;
