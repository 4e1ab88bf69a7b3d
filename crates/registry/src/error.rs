use thiserror::Error;

use crate::actions::Discriminator;
use crate::token::RegistryToken;

/// Errors raised by the registry table.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
	/// A registry was defined twice under the same path.
	#[error("registry already defined: {0}")]
	AlreadyDefined(String),

	/// A saved token no longer resolves to a live registry.
	#[error("unresolved registry token: {0}")]
	Unresolved(RegistryToken),

	/// A bases list would make a registry reachable from itself.
	#[error("cyclic bases for registry: {0}")]
	CyclicBases(RegistryToken),
}

/// Errors raised while scheduling or executing configuration actions.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// `register-in` blocks cannot nest.
	#[error("nested `register-in` directives are not permitted")]
	NestedRegisterIn,

	/// Two scheduled actions share a discriminator.
	#[error("conflicting configuration actions for discriminator {0:?}")]
	Conflict(Discriminator),

	/// A directive referenced a registry that does not resolve.
	#[error(transparent)]
	Registry(#[from] RegistryError),

	/// The configuration document is not valid KDL.
	#[error("config parse error: {0}")]
	Parse(#[from] kdl::KdlError),

	/// A node name was not recognized as a directive.
	#[error("unknown directive: {0}")]
	UnknownDirective(String),

	/// A required field is missing from a directive.
	#[error("missing required field: {0}")]
	MissingField(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
