//! Pending configuration actions and their identity keys.

pub mod scoped;

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use crate::config::Executor;
use crate::error::ConfigError;
use crate::token::RegistryToken;

/// Identity key of a pending configuration action.
///
/// Two scheduled actions with equal discriminators conflict. An action whose
/// discriminator is `None` (the sentinel, see [`Action::discriminator`]) never
/// conflicts with anything.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Discriminator {
	/// A utility registration: its `(kind, name)` key.
	Utility {
		/// Component kind.
		kind: String,
		/// Registration name.
		name: String,
	},
	/// An opaque caller-supplied key.
	Raw(String),
	/// A key scoped to the registry it will be registered in.
	///
	/// Produced by [`ScopedActions`](scoped::ScopedActions): the same logical
	/// key registered into two different registries must not be treated as a
	/// duplicate, so the owning registry becomes part of the key.
	Scoped {
		/// Token of the owning registry.
		registry: RegistryToken,
		/// The unscoped key being wrapped.
		inner: Box<Discriminator>,
	},
}

impl Discriminator {
	/// Wraps this key with the registry it belongs to.
	pub fn scoped(self, registry: RegistryToken) -> Self {
		Self::Scoped {
			registry,
			inner: Box::new(self),
		}
	}
}

/// Callback invoked when an action runs.
pub type ActionCallable = Arc<dyn Fn(&mut Executor) -> Result<(), ConfigError> + Send + Sync>;

/// One pending side-effecting registration recorded by a directive.
///
/// Actions are scheduled onto a [`ConfigContext`](crate::ConfigContext) and
/// run later, in scheduling order, against an [`Executor`].
#[derive(Clone)]
pub struct Action {
	/// Identity key for conflict detection; `None` means never deduplicate.
	pub discriminator: Option<Discriminator>,
	/// Callback that performs the registration.
	pub callable: ActionCallable,
}

impl Action {
	/// Creates an action from a discriminator and a callback.
	pub fn new(
		discriminator: Option<Discriminator>,
		callable: impl Fn(&mut Executor) -> Result<(), ConfigError> + Send + Sync + 'static,
	) -> Self {
		Self {
			discriminator,
			callable: Arc::new(callable),
		}
	}
}

impl fmt::Debug for Action {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Action").field("discriminator", &self.discriminator).finish()
	}
}

/// The exact surface the configuration engine needs from its pending-action
/// collection.
///
/// [`ScopedActions`](scoped::ScopedActions) implements the same surface over
/// another implementor, rewriting discriminators on every write path; listing
/// the operations here keeps that decoration bounded instead of forwarding
/// arbitrary calls.
pub trait ActionList {
	/// Replaces the action at `index`.
	///
	/// Panics if `index` is out of bounds, like slice indexing.
	fn set(&mut self, index: usize, action: Action);

	/// Replaces the actions in `range` with `replacement`.
	fn splice(&mut self, range: Range<usize>, replacement: Vec<Action>);

	/// Appends one action.
	fn append(&mut self, action: Action);

	/// Inserts an action at `index`, shifting later actions right.
	fn insert(&mut self, index: usize, action: Action);

	/// Appends every action in `actions`.
	fn extend(&mut self, actions: Vec<Action>);

	/// In-place concatenation; behaves exactly like [`extend`](Self::extend).
	fn concat(&mut self, actions: Vec<Action>);

	/// Number of pending actions.
	fn len(&self) -> usize;

	/// Returns true if no action is pending.
	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// The action at `index`, if any.
	fn get(&self, index: usize) -> Option<&Action>;

	/// Position of the first action with the given discriminator.
	fn position(&self, discriminator: &Option<Discriminator>) -> Option<usize>;

	/// Iterates the pending actions in scheduling order.
	fn iter(&self) -> Box<dyn Iterator<Item = &Action> + '_>;
}

impl ActionList for Vec<Action> {
	fn set(&mut self, index: usize, action: Action) {
		self[index] = action;
	}

	fn splice(&mut self, range: Range<usize>, replacement: Vec<Action>) {
		drop(Vec::splice(self, range, replacement));
	}

	fn append(&mut self, action: Action) {
		self.push(action);
	}

	fn insert(&mut self, index: usize, action: Action) {
		Vec::insert(self, index, action);
	}

	fn extend(&mut self, actions: Vec<Action>) {
		Extend::extend(self, actions);
	}

	fn concat(&mut self, actions: Vec<Action>) {
		Extend::extend(self, actions);
	}

	fn len(&self) -> usize {
		Vec::len(self)
	}

	fn get(&self, index: usize) -> Option<&Action> {
		self.as_slice().get(index)
	}

	fn position(&self, discriminator: &Option<Discriminator>) -> Option<usize> {
		self.as_slice().iter().position(|action| &action.discriminator == discriminator)
	}

	fn iter(&self) -> Box<dyn Iterator<Item = &Action> + '_> {
		Box::new(self.as_slice().iter())
	}
}
