//! Stable lookup tokens for named registries.

use serde::{Deserialize, Serialize};

/// Persisted reference to a [`BaseRegistry`](crate::BaseRegistry).
///
/// A token is the `(parent, name)` pair a registry was defined under. Saved
/// configuration stores tokens, never registry contents; loading resolves the
/// token against the live [`Registries`](crate::Registries) table, so a
/// reloaded reference is the same object rather than a reconstructed copy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistryToken {
	/// Dotted path of the owning parent, or `None` for top-level registries.
	pub parent: Option<String>,
	/// Name of the registry within its parent.
	pub name: String,
}

impl RegistryToken {
	/// Creates a token from an optional parent path and a name.
	pub fn new(parent: Option<&str>, name: &str) -> Self {
		Self {
			parent: parent.map(str::to_string),
			name: name.to_string(),
		}
	}

	/// Splits a dotted path back into a token.
	///
	/// The last segment becomes the name; everything before it the parent.
	pub fn from_path(path: &str) -> Self {
		match path.rsplit_once('.') {
			Some((parent, name)) => Self::new(Some(parent), name),
			None => Self::new(None, path),
		}
	}

	/// Returns the full dotted path (`"parent.name"`, or just `"name"`).
	pub fn path(&self) -> String {
		match &self.parent {
			Some(parent) => format!("{parent}.{}", self.name),
			None => self.name.clone(),
		}
	}
}

impl std::fmt::Display for RegistryToken {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.path())
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn path_round_trip() {
		let token = RegistryToken::new(Some("myapp"), "custom");
		assert_eq!(token.path(), "myapp.custom");
		assert_eq!(RegistryToken::from_path("myapp.custom"), token);

		let top = RegistryToken::new(None, "custom");
		assert_eq!(top.path(), "custom");
		assert_eq!(RegistryToken::from_path("custom"), top);
	}

	#[test]
	fn display_is_the_path() {
		let token = RegistryToken::new(Some("a.b"), "c");
		assert_eq!(token.to_string(), "a.b.c");
	}

	#[test]
	fn serde_round_trip() {
		let token = RegistryToken::new(Some("myapp"), "custom");
		let json = serde_json::to_string(&token).expect("token should serialize");
		let back: RegistryToken = serde_json::from_str(&json).expect("token should deserialize");
		assert_eq!(back, token);
	}
}
