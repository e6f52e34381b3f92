//! Shared domain types, configuration, and input handling for commentscope.
//!
//! Loads the comment CSV into [`CommentRecord`]s, normalizes comment text, and
//! reads [`AppConfig`] from the environment. Model inference and aggregation
//! live in the `commentscope-inference` and `commentscope-analysis` crates.

pub mod app_config;
pub mod config;
pub mod error;
pub mod load;
pub mod normalize;
pub mod types;

pub use app_config::{AppConfig, BackendKind, InferenceEndpoints};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, LoadError};
pub use load::{load_comments, read_comments, REQUIRED_COLUMNS};
pub use normalize::TextNormalizer;
pub use types::{CommentRecord, CustomerRequest, PricingSignal, ProductMentions, RequestKind};
