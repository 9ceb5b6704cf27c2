//! Saved prompt templates.

use serde::Deserialize;
use serde::Serialize;

/// A reusable prompt snippet the user can insert into the composer, either
/// from the template menu or with a leading-slash shortcut.
///
/// Presentation order is never stored here; pinning and recency live in
/// client-local preferences and are combined with the name at display time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromptTemplate {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub content: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn enabled_defaults_to_true_when_omitted() {
        let template: PromptTemplate = serde_json::from_str(
            r#"{"id":"t1","name":"greet","content":"hello"}"#,
        )
        .unwrap();
        assert!(template.enabled);
        assert_eq!(template.description, None);
    }
}
