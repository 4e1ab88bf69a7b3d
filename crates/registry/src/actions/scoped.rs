//! Write-path decoration of pending actions.

use std::ops::Range;

use super::{Action, ActionList, Discriminator};
use crate::token::RegistryToken;

/// Decorates every action written through it so its discriminator is scoped
/// to one owning registry.
///
/// Reads (`len`, `get`, `position`, iteration) forward to the wrapped list
/// unchanged, so the proxy is behaviorally transparent apart from the
/// write-path rewrite. Actions whose discriminator is the `None` sentinel
/// ("never deduplicate") pass through untouched: scoping them would give two
/// such actions a shared key and make them collide.
///
/// The wrapped list is held by exclusive borrow for the proxy's lifetime; the
/// proxy owns nothing else beyond the registry token it stamps onto keys.
pub struct ScopedActions<'a, L: ActionList> {
	inner: &'a mut L,
	registry: RegistryToken,
}

impl<'a, L: ActionList> ScopedActions<'a, L> {
	/// Wraps `inner`, scoping every future write to `registry`.
	pub fn new(inner: &'a mut L, registry: RegistryToken) -> Self {
		Self { inner, registry }
	}

	fn decorate(&self, mut action: Action) -> Action {
		action.discriminator = action.discriminator.take().map(|d| d.scoped(self.registry.clone()));
		action
	}

	fn decorate_all(&self, actions: Vec<Action>) -> Vec<Action> {
		actions.into_iter().map(|action| self.decorate(action)).collect()
	}
}

impl<L: ActionList> ActionList for ScopedActions<'_, L> {
	fn set(&mut self, index: usize, action: Action) {
		let action = self.decorate(action);
		self.inner.set(index, action);
	}

	fn splice(&mut self, range: Range<usize>, replacement: Vec<Action>) {
		let replacement = self.decorate_all(replacement);
		self.inner.splice(range, replacement);
	}

	fn append(&mut self, action: Action) {
		let action = self.decorate(action);
		self.inner.append(action);
	}

	fn insert(&mut self, index: usize, action: Action) {
		let action = self.decorate(action);
		self.inner.insert(index, action);
	}

	fn extend(&mut self, actions: Vec<Action>) {
		let actions = self.decorate_all(actions);
		self.inner.extend(actions);
	}

	fn concat(&mut self, actions: Vec<Action>) {
		let actions = self.decorate_all(actions);
		self.inner.concat(actions);
	}

	fn len(&self) -> usize {
		self.inner.len()
	}

	fn get(&self, index: usize) -> Option<&Action> {
		self.inner.get(index)
	}

	fn position(&self, discriminator: &Option<Discriminator>) -> Option<usize> {
		self.inner.position(discriminator)
	}

	fn iter(&self) -> Box<dyn Iterator<Item = &Action> + '_> {
		self.inner.iter()
	}
}
