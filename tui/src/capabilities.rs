//! Parameter visibility by provider class.
//!
//! The override panel hides a parameter when the active model's provider
//! family is known not to accept it. Temperature is always shown. Unknown
//! providers get the permissive default so a new backend never blanks the
//! panel.

use strum::IntoEnumIterator;

use palaver_protocol::Assistant;
use palaver_protocol::Model;
use palaver_protocol::OverrideField;
use palaver_protocol::ParamOverrides;
use palaver_protocol::Provider;
use palaver_protocol::ProviderClass;

/// Whether `field` is accepted by providers of `class`.
pub fn field_supported(class: ProviderClass, field: OverrideField) -> bool {
    match field {
        // Always shown; the panel would be useless without it.
        OverrideField::Temperature => true,
        // Session-level knobs, not sampling parameters.
        OverrideField::Model | OverrideField::MaxRounds => true,
        OverrideField::MaxTokens | OverrideField::TopP => true,
        OverrideField::TopK => !matches!(class, ProviderClass::Openai),
        OverrideField::FrequencyPenalty | OverrideField::PresencePenalty => matches!(
            class,
            ProviderClass::Openai | ProviderClass::Local | ProviderClass::Unknown
        ),
    }
}

/// All fields the override panel should render for `class`, in declaration
/// order.
pub fn visible_fields(class: ProviderClass) -> Vec<OverrideField> {
    OverrideField::iter()
        .filter(|field| field_supported(class, *field))
        .collect()
}

/// The model governing capability checks: the override's model when set,
/// otherwise the assistant default.
pub fn active_model<'a>(
    overrides: &ParamOverrides,
    assistant: &Assistant,
    models: &'a [Model],
) -> Option<&'a Model> {
    let model_id = overrides.model_id.as_deref().unwrap_or(&assistant.model_id);
    models.iter().find(|m| m.id == model_id)
}

pub fn active_provider_class(
    overrides: &ParamOverrides,
    assistant: &Assistant,
    models: &[Model],
    providers: &[Provider],
) -> ProviderClass {
    active_model(overrides, assistant, models)
        .and_then(|m| providers.iter().find(|p| p.id == m.provider_id))
        .map(|p| p.class)
        .unwrap_or_default()
}
