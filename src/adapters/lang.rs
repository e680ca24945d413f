use crate::domain::model::LangVars;
use crate::domain::ports::Translator;
use crate::utils::error::{Result, SetupError};
use std::collections::HashMap;

const EN_MESSAGES: &str = include_str!("../lang/en.toml");

/// 以 `installer.xxx` 形式的鍵值查詢訊息
#[derive(Debug, Clone)]
pub struct Lang {
    messages: HashMap<String, String>,
}

impl Lang {
    /// 內建英文訊息
    pub fn english() -> Result<Self> {
        let table: toml::Table = toml::from_str(EN_MESSAGES).map_err(|e| SetupError::ConfigError {
            message: format!("Invalid built-in language file: {}", e),
        })?;

        let mut messages = HashMap::new();
        flatten_into(&mut messages, "", &table);
        Ok(Self { messages })
    }

    pub fn with_overrides(mut self, overrides: &HashMap<String, String>) -> Self {
        for (key, value) in overrides {
            self.messages.insert(key.clone(), value.clone());
        }
        self
    }

    pub fn has(&self, key: &str) -> bool {
        self.messages.contains_key(key)
    }
}

fn flatten_into(out: &mut HashMap<String, String>, prefix: &str, table: &toml::Table) {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            toml::Value::Table(nested) => flatten_into(out, &full_key, nested),
            toml::Value::String(s) => {
                out.insert(full_key, s.clone());
            }
            other => {
                out.insert(full_key, other.to_string());
            }
        }
    }
}

impl Translator for Lang {
    fn get(&self, key: &str, vars: &LangVars) -> String {
        let Some(message) = self.messages.get(key) else {
            tracing::debug!("Missing translation for {}", key);
            return key.to_string();
        };

        // 長的名稱先換，避免 :name 吃掉 :name_full
        let mut names: Vec<&String> = vars.keys().collect();
        names.sort_by_key(|name| std::cmp::Reverse(name.len()));

        let mut result = message.clone();
        for name in names {
            result = result.replace(&format!(":{}", name), &vars[name]);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> LangVars {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn looks_up_nested_keys() {
        let lang = Lang::english().unwrap();
        assert_eq!(
            lang.get("installer.install_failed_label", &LangVars::new()),
            "Installation Failed"
        );
    }

    #[test]
    fn missing_key_returns_key() {
        let lang = Lang::english().unwrap();
        assert_eq!(lang.get("installer.nope", &LangVars::new()), "installer.nope");
    }

    #[test]
    fn replaces_placeholders() {
        let lang = Lang::english()
            .unwrap()
            .with_overrides(&HashMap::from([(
                "installer.greeting".to_string(),
                ":name_full (:name)".to_string(),
            )]));
        assert_eq!(
            lang.get("installer.greeting", &vars(&[("name", "a"), ("name_full", "b")])),
            "b (a)"
        );
    }

    #[test]
    fn overrides_replace_builtin_messages() {
        let lang = Lang::english().unwrap().with_overrides(&HashMap::from([(
            "installer.install_failed_label".to_string(),
            "Installation fehlgeschlagen".to_string(),
        )]));
        assert_eq!(
            lang.get("installer.install_failed_label", &LangVars::new()),
            "Installation fehlgeschlagen"
        );
        assert!(lang.has("installer.migrate_database_comment"));
    }
}
