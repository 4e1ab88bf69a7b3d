//! Utility storage for a single registry.

use std::any::Any;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Key a utility is registered under: a component kind plus a registration name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UtilityKey {
	/// Component kind (the interface a utility provides).
	pub kind: String,
	/// Registration name; the empty string is the unnamed registration.
	pub name: String,
}

impl UtilityKey {
	/// Creates a key from a kind and a name.
	pub fn new(kind: &str, name: &str) -> Self {
		Self {
			kind: kind.to_string(),
			name: name.to_string(),
		}
	}
}

/// Shared handle to a registered component.
pub type Component = Arc<dyn Any + Send + Sync>;

/// The utility table owned by one registry.
///
/// Holds direct registrations only. Lookup misses fall back to the registry's
/// bases; that chain lives on [`BaseRegistry`](crate::BaseRegistry), not here.
#[derive(Default)]
pub struct Components {
	utilities: RwLock<FxHashMap<UtilityKey, Component>>,
}

impl Components {
	/// Registers `value` under `key`, replacing any previous entry.
	pub fn register(&self, key: UtilityKey, value: Component) {
		self.utilities.write().insert(key, value);
	}

	/// Returns the utility registered directly in this table, if any.
	pub fn get(&self, key: &UtilityKey) -> Option<Component> {
		self.utilities.read().get(key).cloned()
	}

	/// Returns the number of direct registrations.
	pub fn len(&self) -> usize {
		self.utilities.read().len()
	}

	/// Returns true if nothing is registered directly.
	pub fn is_empty(&self) -> bool {
		self.utilities.read().is_empty()
	}
}

impl std::fmt::Debug for Components {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Components").field("len", &self.len()).finish()
	}
}
