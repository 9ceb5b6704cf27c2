//! Per-session parameter overrides.
//!
//! An override supersedes the assistant's configured default for exactly one
//! parameter. The map is sparse on purpose: a field is `Some` only when the
//! user explicitly overrode it, and an absent field always means "inherit the
//! assistant default". Serialization omits absent fields so a round-tripped
//! payload preserves that distinction.

use serde::Deserialize;
use serde::Serialize;
use strum_macros::Display;
use strum_macros::EnumIter;

/// `max_rounds` value meaning "no round limit".
pub const MAX_ROUNDS_UNLIMITED: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum OverrideField {
    Model,
    Temperature,
    MaxTokens,
    TopP,
    TopK,
    FrequencyPenalty,
    PresencePenalty,
    MaxRounds,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ParamOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rounds: Option<i64>,
}

impl ParamOverrides {
    /// True when every parameter inherits the assistant default.
    pub fn is_empty(&self) -> bool {
        *self == ParamOverrides::default()
    }

    /// Reset one field to "inherit".
    pub fn clear_field(&mut self, field: OverrideField) {
        match field {
            OverrideField::Model => self.model_id = None,
            OverrideField::Temperature => self.temperature = None,
            OverrideField::MaxTokens => self.max_tokens = None,
            OverrideField::TopP => self.top_p = None,
            OverrideField::TopK => self.top_k = None,
            OverrideField::FrequencyPenalty => self.frequency_penalty = None,
            OverrideField::PresencePenalty => self.presence_penalty = None,
            OverrideField::MaxRounds => self.max_rounds = None,
        }
    }

    pub fn is_set(&self, field: OverrideField) -> bool {
        match field {
            OverrideField::Model => self.model_id.is_some(),
            OverrideField::Temperature => self.temperature.is_some(),
            OverrideField::MaxTokens => self.max_tokens.is_some(),
            OverrideField::TopP => self.top_p.is_some(),
            OverrideField::TopK => self.top_k.is_some(),
            OverrideField::FrequencyPenalty => self.frequency_penalty.is_some(),
            OverrideField::PresencePenalty => self.presence_penalty.is_some(),
            OverrideField::MaxRounds => self.max_rounds.is_some(),
        }
    }

    pub fn max_rounds_is_unlimited(&self) -> bool {
        self.max_rounds == Some(MAX_ROUNDS_UNLIMITED)
    }
}
