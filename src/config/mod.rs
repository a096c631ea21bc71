//! Entity descriptors: declaration, validation, and resolution into the runtime model.

pub mod loader;
pub mod resolved;
pub mod types;
pub mod validator;

pub use loader::{resolve, ModelRegistry};
pub use resolved::{ResolvedEntity, ResolvedField, ResolvedModel};
pub use types::{EntityConfig, FieldConfig, FieldType};
pub use validator::{validate, PK_COLUMN};
