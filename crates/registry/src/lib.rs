//! Named, composable base component registries.
//!
//! A site's local registry can inherit from any number of named "base"
//! registries, each populated by declarative configuration. The pieces:
//!
//! - [`registry`] - [`BaseRegistry`] and the process-wide [`Registries`] table
//! - [`components`] - the per-registry utility store
//! - [`token`] - `(parent, name)` lookup tokens, the only persisted form
//! - [`actions`] - pending configuration actions and [`ScopedActions`]
//! - [`config`] - the scheduling context, `register-in` blocks, KDL loading
//! - [`selection`] - choosing and applying a registry's bases list
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use strata_registry::{Registries, load_config_str};
//!
//! let registries = Arc::new(Registries::new());
//! load_config_str(
//!     &registries,
//!     r#"
//! registry "custom"
//! register-in "custom" {
//!     utility "greeting" kind="text" value="hello"
//! }
//! "#,
//! )
//! .unwrap();
//!
//! let custom = registries.resolve_path("custom").unwrap();
//! assert_eq!(custom.utility_of::<String>("text", "greeting").unwrap().as_str(), "hello");
//! ```

pub mod actions;
pub mod components;
pub mod config;
pub mod error;
pub mod registry;
pub mod selection;
pub mod token;

pub use actions::scoped::ScopedActions;
pub use actions::{Action, ActionCallable, ActionList, Discriminator};
pub use components::{Component, Components, UtilityKey};
pub use config::kdl::{load_config_str, parse_config_str};
pub use config::{ConfigContext, DirectiveScope, Executor};
pub use error::{ConfigError, RegistryError, Result};
pub use registry::{BASE_NAME, BaseRegistry, Registries};
pub use selection::{
	BaseCandidate, BaseChoice, GLOBAL_BASE_LABEL, PARENT_LABEL, apply_bases, base_candidates,
};
pub use token::RegistryToken;
