//! Named base registries and the process-wide registry table.

use std::any::Any;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::components::{Component, Components, UtilityKey};
use crate::error::RegistryError;
use crate::token::RegistryToken;

/// Well-known name of the global base registry.
pub const BASE_NAME: &str = "base";

/// A named component registry that other registries can chain as a fallback.
///
/// Lookup checks the registry's own utility table first, then each declared
/// base in declaration order; the first match wins. A registry never persists
/// its contents: [`token`](Self::token) is its only serialized form, and
/// [`Registries::resolve`] turns a token back into the live registry.
pub struct BaseRegistry {
	token: RegistryToken,
	components: Components,
	// Always a DAG; `set_bases` rejects anything that would close a cycle.
	bases: RwLock<Vec<Arc<BaseRegistry>>>,
}

impl BaseRegistry {
	fn new(token: RegistryToken) -> Arc<Self> {
		Arc::new(Self {
			token,
			components: Components::default(),
			bases: RwLock::new(Vec::new()),
		})
	}

	/// Name of this registry within its parent.
	pub fn name(&self) -> &str {
		&self.token.name
	}

	/// Dotted path of the owning parent, if any.
	pub fn parent(&self) -> Option<&str> {
		self.token.parent.as_deref()
	}

	/// The `(parent, name)` token this registry serializes as.
	pub fn token(&self) -> &RegistryToken {
		&self.token
	}

	/// The registry's own utility table, without the bases chain.
	pub fn components(&self) -> &Components {
		&self.components
	}

	/// Registers `value` as a utility under `(kind, name)`.
	pub fn register_utility(&self, kind: &str, name: &str, value: Component) {
		tracing::debug!(registry = %self.token, kind, name, "register utility");
		self.components.register(UtilityKey::new(kind, name), value);
	}

	/// Looks up a utility, falling back to bases in declaration order.
	pub fn utility(&self, kind: &str, name: &str) -> Option<Component> {
		self.lookup(&UtilityKey::new(kind, name))
	}

	/// Typed lookup helper; `None` when missing or of another type.
	pub fn utility_of<T: Any + Send + Sync>(&self, kind: &str, name: &str) -> Option<Arc<T>> {
		self.utility(kind, name).and_then(|component| component.downcast::<T>().ok())
	}

	fn lookup(&self, key: &UtilityKey) -> Option<Component> {
		if let Some(found) = self.components.get(key) {
			return Some(found);
		}
		for base in self.bases.read().iter() {
			if let Some(found) = base.lookup(key) {
				return Some(found);
			}
		}
		None
	}

	/// Snapshot of the declared bases, in lookup-priority order.
	pub fn bases(&self) -> Vec<Arc<BaseRegistry>> {
		self.bases.read().clone()
	}

	/// Replaces the bases list, preserving the given order.
	///
	/// Fails with [`RegistryError::CyclicBases`], leaving the current list in
	/// place, if any entry's chain reaches back to this registry.
	pub fn set_bases(&self, bases: Vec<Arc<BaseRegistry>>) -> Result<(), RegistryError> {
		if bases.iter().any(|base| base.reaches(self)) {
			return Err(RegistryError::CyclicBases(self.token.clone()));
		}
		tracing::debug!(registry = %self.token, count = bases.len(), "set bases");
		*self.bases.write() = bases;
		Ok(())
	}

	/// Whether `target` is this registry or reachable through its bases.
	fn reaches(&self, target: &BaseRegistry) -> bool {
		if std::ptr::eq(self, target) {
			return true;
		}
		self.bases.read().iter().any(|base| base.reaches(target))
	}
}

impl std::fmt::Debug for BaseRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BaseRegistry")
			.field("token", &self.token)
			.field("utilities", &self.components.len())
			.field("bases", &self.bases.read().len())
			.finish()
	}
}

/// Process-wide table of named registries.
///
/// Owns the well-known global base registry under [`BASE_NAME`] and every
/// registry declared by configuration. Tokens and `register-in` paths resolve
/// against this table, which is what makes token round-trips return the same
/// object instead of an equal copy.
pub struct Registries {
	by_path: RwLock<IndexMap<String, Arc<BaseRegistry>>>,
	base: Arc<BaseRegistry>,
}

impl Registries {
	/// Creates a table containing only the global base registry.
	pub fn new() -> Self {
		let base = BaseRegistry::new(RegistryToken::new(None, BASE_NAME));
		let mut by_path = IndexMap::new();
		by_path.insert(BASE_NAME.to_string(), base.clone());
		Self {
			by_path: RwLock::new(by_path),
			base,
		}
	}

	/// The well-known global base registry.
	pub fn base(&self) -> &Arc<BaseRegistry> {
		&self.base
	}

	/// Defines a new registry under `(parent, name)`.
	///
	/// The registry lives for the rest of the process. Defining the same path
	/// twice is an error.
	pub fn define(&self, parent: Option<&str>, name: &str) -> Result<Arc<BaseRegistry>, RegistryError> {
		let token = RegistryToken::new(parent, name);
		let path = token.path();
		let mut by_path = self.by_path.write();
		if by_path.contains_key(&path) {
			return Err(RegistryError::AlreadyDefined(path));
		}
		tracing::debug!(%path, "define registry");
		let registry = BaseRegistry::new(token);
		by_path.insert(path, registry.clone());
		Ok(registry)
	}

	/// Resolves a saved token back to the live registry it was taken from.
	pub fn resolve(&self, token: &RegistryToken) -> Result<Arc<BaseRegistry>, RegistryError> {
		self.by_path
			.read()
			.get(&token.path())
			.cloned()
			.ok_or_else(|| RegistryError::Unresolved(token.clone()))
	}

	/// Resolves a dotted path (the `registry` attribute of `register-in`).
	pub fn resolve_path(&self, path: &str) -> Result<Arc<BaseRegistry>, RegistryError> {
		self.by_path
			.read()
			.get(path)
			.cloned()
			.ok_or_else(|| RegistryError::Unresolved(RegistryToken::from_path(path)))
	}

	/// All registries paired with their paths, in definition order.
	pub fn named(&self) -> Vec<(String, Arc<BaseRegistry>)> {
		self.by_path
			.read()
			.iter()
			.map(|(path, registry)| (path.clone(), registry.clone()))
			.collect()
	}
}

impl Default for Registries {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn define_and_resolve_identity() {
		let registries = Registries::new();
		let custom = registries.define(Some("myapp"), "custom").expect("define should succeed");

		let token = custom.token().clone();
		let resolved = registries.resolve(&token).expect("token should resolve");
		assert!(Arc::ptr_eq(&resolved, &custom));

		let by_path = registries.resolve_path("myapp.custom").expect("path should resolve");
		assert!(Arc::ptr_eq(&by_path, &custom));
	}

	#[test]
	fn duplicate_define_fails() {
		let registries = Registries::new();
		registries.define(None, "custom").expect("first define should succeed");
		let err = registries.define(None, "custom").unwrap_err();
		assert!(matches!(err, RegistryError::AlreadyDefined(path) if path == "custom"));
	}

	#[test]
	fn unresolved_token_is_an_error() {
		let registries = Registries::new();
		let token = RegistryToken::new(None, "gone");
		let err = registries.resolve(&token).unwrap_err();
		assert!(matches!(err, RegistryError::Unresolved(t) if t == token));
	}

	#[test]
	fn lookup_falls_back_through_bases_in_order() {
		let registries = Registries::new();
		let first = registries.define(None, "first").expect("define should succeed");
		let second = registries.define(None, "second").expect("define should succeed");
		let local = registries.define(None, "local").expect("define should succeed");

		first.register_utility("text", "greeting", Arc::new("from first".to_string()));
		second.register_utility("text", "greeting", Arc::new("from second".to_string()));
		second.register_utility("text", "farewell", Arc::new("bye".to_string()));
		local.set_bases(vec![first.clone(), second.clone()]).expect("bases are acyclic");

		// Declaration order decides: `first` wins for the shared key.
		let greeting = local.utility_of::<String>("text", "greeting").expect("should fall back");
		assert_eq!(greeting.as_str(), "from first");

		// Only `second` has the other key.
		let farewell = local.utility_of::<String>("text", "farewell").expect("should fall back");
		assert_eq!(farewell.as_str(), "bye");

		// Direct registrations beat every base.
		local.register_utility("text", "greeting", Arc::new("local".to_string()));
		let greeting = local.utility_of::<String>("text", "greeting").expect("direct hit");
		assert_eq!(greeting.as_str(), "local");
	}

	#[test]
	fn set_bases_rejects_cycles() {
		let registries = Registries::new();
		let local = registries.define(None, "local").expect("define should succeed");
		let other = registries.define(None, "other").expect("define should succeed");

		// Direct self-cycle.
		let err = local.set_bases(vec![local.clone()]).unwrap_err();
		assert!(matches!(err, RegistryError::CyclicBases(token) if token == *local.token()));
		assert!(local.bases().is_empty());

		// Indirect cycle through another registry.
		other.set_bases(vec![local.clone()]).expect("acyclic so far");
		let err = local.set_bases(vec![other.clone()]).unwrap_err();
		assert!(matches!(err, RegistryError::CyclicBases(_)));

		// A rejected list leaves lookups terminating.
		assert!(local.utility("text", "missing").is_none());
	}

	#[test]
	fn base_registry_is_predefined() {
		let registries = Registries::new();
		let base = registries.resolve_path(BASE_NAME).expect("base should resolve");
		assert!(Arc::ptr_eq(&base, registries.base()));
	}
}
