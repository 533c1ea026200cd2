//! ForgeCards Core - Post Card Template
//!
//! # The Rules
//! 1. The Schema Is the Contract
//! 2. Invalid Variables Render Nothing
//! 3. Rendering Is Pure
//! 4. Tiers Are Intents, the Host Chooses
//! 5. Collaborators Behind Traits

pub mod assets;
pub mod config;
pub mod format;
pub mod hashing;
pub mod i18n;
pub mod layout;
pub mod proxy;
pub mod render;
pub mod schema;
pub mod validation;
pub mod variables;

pub use config::{ConfigError, LocalePolicy, RenderConfig};
pub use format::{ChronoDateFormatter, DateFormatter};
pub use hashing::{canonical_json, compute_input_hash, layout_fingerprint};
pub use i18n::{labels, Labels, Locale};
pub use layout::{LayoutNode, Style, TextRole, Tier};
pub use proxy::{CdnProxy, ImageProxy, PassthroughProxy};
pub use render::{render, Agent, PostTemplate, RenderError, RenderManifest};
pub use schema::{default_variables, post_schema, schema_document, PostSchema};
pub use validation::{validate, ValidationResult, ValidationViolation, Validator, ViolationSeverity};
pub use variables::Variables;

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
