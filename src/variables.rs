//! Typed Variables - only ever built from a candidate that passed validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::i18n::Locale;
use crate::validation::{ValidationResult, Validator};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variables {
    pub content: String,
    pub date: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<Locale>,
    pub title: String,
    pub views: String,
}

impl Variables {
    /// Validate then extract. Violations come back as the error.
    ///
    /// A locale accepted under the fallback policy but absent from the
    /// dictionary is dropped here, so it resolves to the default.
    pub fn parse(candidate: &Value, validator: &Validator) -> Result<Self, ValidationResult> {
        let result = validator.check(candidate);
        if !result.valid {
            return Err(result);
        }
        Ok(Self::extract(candidate))
    }

    /// Field extraction for a candidate already known to be valid.
    pub(crate) fn extract(candidate: &Value) -> Self {
        let text = |name: &str| candidate[name].as_str().unwrap_or_default().to_string();
        let locale = match candidate.get("locale").and_then(Value::as_str) {
            None | Some("") => None,
            Some(code) => {
                let parsed = Locale::parse(code);
                if parsed.is_none() {
                    tracing::warn!(locale = code, "Unsupported locale, falling back to {}", Locale::default());
                }
                parsed
            }
        };

        Self {
            content: text("content"),
            date: text("date"),
            image: text("image"),
            locale,
            title: text("title"),
            views: text("views"),
        }
    }

    /// Supplied locale, else `en`.
    pub fn resolved_locale(&self) -> Locale {
        self.locale.unwrap_or_default()
    }
}
