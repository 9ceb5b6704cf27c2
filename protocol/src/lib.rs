//! Types shared between the Palaver client surfaces and the backend.
//!
//! These types are serialized across the client/server boundary, so optional
//! fields default rather than erroring when older payloads omit newly
//! introduced attributes.

pub mod files;
pub mod models;
pub mod overrides;
pub mod templates;

pub use files::UploadedFile;
pub use models::Assistant;
pub use models::InputModality;
pub use models::Model;
pub use models::Provider;
pub use models::ProviderClass;
pub use overrides::OverrideField;
pub use overrides::ParamOverrides;
pub use templates::PromptTemplate;
