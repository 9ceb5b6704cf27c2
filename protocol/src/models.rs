//! Catalog metadata: models, providers, and assistants.

use serde::Deserialize;
use serde::Serialize;
use strum_macros::Display;
use strum_macros::EnumIter;
use strum_macros::EnumString;

/// Canonical user-input modality tags advertised by a model.
#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display, EnumIter, Hash,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InputModality {
    /// Plain text turns.
    Text,
    /// Image attachments included in user turns.
    Image,
}

/// Backward-compatible default when `input_modalities` is omitted on the wire.
///
/// Legacy payloads predate modality metadata, so we conservatively assume text
/// only; image support must be advertised explicitly.
pub fn default_input_modalities() -> Vec<InputModality> {
    vec![InputModality::Text]
}

/// Family of API a provider speaks. Parameter support is keyed on this, not
/// on individual models.
///
/// Unrecognized classes deserialize as [`ProviderClass::Unknown`] so a newer
/// backend cannot break older clients.
#[derive(
    Debug,
    Serialize,
    Deserialize,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase", from = "String")]
#[strum(serialize_all = "lowercase")]
pub enum ProviderClass {
    Openai,
    Anthropic,
    Google,
    /// Self-hosted OpenAI-compatible endpoints (ollama, LM Studio, vLLM...).
    Local,
    #[default]
    Unknown,
}

impl From<String> for ProviderClass {
    fn from(value: String) -> Self {
        value.parse().unwrap_or(ProviderClass::Unknown)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Provider {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub class: ProviderClass,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Model {
    pub id: String,
    pub display_name: String,
    pub provider_id: String,
    #[serde(default = "default_input_modalities")]
    pub input_modalities: Vec<InputModality>,
    #[serde(default)]
    pub enabled: bool,
}

impl Model {
    pub fn supports_vision(&self) -> bool {
        self.input_modalities.contains(&InputModality::Image)
    }
}

/// An assistant is a named configuration bundle; its `model_id` is the
/// default used whenever a session has no model override.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assistant {
    pub id: String,
    pub name: String,
    pub model_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_input_modalities_default_to_text_only() {
        let model: Model = serde_json::from_str(
            r#"{"id":"m1","display_name":"M1","provider_id":"p1"}"#,
        )
        .unwrap();
        assert_eq!(model.input_modalities, vec![InputModality::Text]);
        assert!(!model.supports_vision());
    }

    #[test]
    fn unknown_provider_class_deserializes_as_unknown() {
        let provider: Provider = serde_json::from_str(
            r#"{"id":"p1","name":"P1","class":"frontier-labs-v2"}"#,
        )
        .unwrap();
        assert_eq!(provider.class, ProviderClass::Unknown);
    }

    #[test]
    fn vision_model_advertises_image_modality() {
        let model: Model = serde_json::from_str(
            r#"{"id":"m2","display_name":"M2","provider_id":"p1","input_modalities":["text","image"]}"#,
        )
        .unwrap();
        assert!(model.supports_vision());
    }
}
