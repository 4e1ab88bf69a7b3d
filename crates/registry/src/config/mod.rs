//! Declarative configuration: directive scheduling and action execution.
//!
//! Directives never mutate registries directly. They schedule [`Action`]s
//! onto a [`ConfigContext`]; [`ConfigContext::execute`] checks discriminator
//! conflicts and then runs every action, in scheduling order, against an
//! [`Executor`] that carries the currently-active registry.

pub mod kdl;

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::actions::scoped::ScopedActions;
use crate::actions::{Action, ActionList, Discriminator};
use crate::components::Component;
use crate::error::{ConfigError, Result};
use crate::registry::{BaseRegistry, Registries};

/// Execution-time state threaded through every action callback.
///
/// The active registry is carried here explicitly instead of through process
/// globals, so one configuration run never observes another's swap.
pub struct Executor {
	registries: Arc<Registries>,
	active: Arc<BaseRegistry>,
	// Swap record for the single open `register-in` block. Blocks cannot
	// nest, so one slot is enough.
	previous: Option<Arc<BaseRegistry>>,
}

impl std::fmt::Debug for Executor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Executor")
			.field("active", self.active.token())
			.field("previous", &self.previous.as_ref().map(|r| r.token()))
			.finish_non_exhaustive()
	}
}

impl Executor {
	/// Starts an executor with the global base registry active.
	pub fn new(registries: Arc<Registries>) -> Self {
		let active = registries.base().clone();
		Self {
			registries,
			active,
			previous: None,
		}
	}

	/// The registry unscoped registrations currently target.
	pub fn active(&self) -> &Arc<BaseRegistry> {
		&self.active
	}

	/// The registry table this run resolves against.
	pub fn registries(&self) -> &Arc<Registries> {
		&self.registries
	}

	fn install(&mut self, registry: Arc<BaseRegistry>) {
		tracing::debug!(registry = %registry.token(), "install active registry");
		self.previous = Some(std::mem::replace(&mut self.active, registry));
	}

	fn restore(&mut self) {
		// Install and restore are always scheduled as a pair; a missing swap
		// record would mean the engine broke that invariant itself.
		if let Some(previous) = self.previous.take() {
			tracing::debug!(registry = %previous.token(), "restore active registry");
			self.active = previous;
		}
	}
}

/// Builder for one configuration run.
///
/// Directives schedule actions here; [`execute`](Self::execute) runs them.
pub struct ConfigContext {
	registries: Arc<Registries>,
	actions: Vec<Action>,
	// True while a `register-in` block is open; used to reject nesting.
	registry_changed: bool,
}

impl ConfigContext {
	/// Creates an empty context over the given registry table.
	pub fn new(registries: Arc<Registries>) -> Self {
		Self {
			registries,
			actions: Vec::new(),
			registry_changed: false,
		}
	}

	/// The registry table this run resolves against.
	pub fn registries(&self) -> &Arc<Registries> {
		&self.registries
	}

	/// Scheduled actions, in execution order.
	pub fn actions(&self) -> &[Action] {
		&self.actions
	}

	/// Schedules a raw action.
	pub fn action(
		&mut self,
		discriminator: Option<Discriminator>,
		callable: impl Fn(&mut Executor) -> Result<()> + Send + Sync + 'static,
	) {
		self.actions.push(Action::new(discriminator, callable));
	}

	/// Schedules registration of `value` as a utility under `(kind, name)`
	/// in whatever registry is active when the action runs.
	pub fn register_utility(&mut self, kind: &str, name: &str, value: Component) {
		schedule_utility(&mut self.actions, kind, name, value);
	}

	/// Runs a `register-in` block.
	///
	/// Every discriminated action `body` schedules is scoped to `registry`
	/// via [`ScopedActions`], and `registry` is the active one while those
	/// actions execute: an install action is scheduled ahead of the block and
	/// a restore action behind it, both carrying the sentinel discriminator.
	///
	/// Fails with [`ConfigError::NestedRegisterIn`], before scheduling
	/// anything, if another block is already open.
	pub fn register_in<F>(&mut self, registry: &Arc<BaseRegistry>, body: F) -> Result<()>
	where
		F: FnOnce(&mut DirectiveScope<'_>) -> Result<()>,
	{
		if self.registry_changed {
			return Err(ConfigError::NestedRegisterIn);
		}
		self.registry_changed = true;

		let target = registry.clone();
		self.action(None, move |exec| {
			exec.install(target.clone());
			Ok(())
		});

		let result = body(&mut DirectiveScope {
			ctx: self,
			registry: registry.clone(),
		});

		self.action(None, |exec| {
			exec.restore();
			Ok(())
		});
		self.registry_changed = false;
		result
	}

	/// Checks discriminator conflicts, then runs every scheduled action in
	/// order, returning the finished executor.
	pub fn execute(self) -> Result<Executor> {
		{
			let mut seen: FxHashSet<&Discriminator> = FxHashSet::default();
			for action in &self.actions {
				if let Some(discriminator) = &action.discriminator {
					if !seen.insert(discriminator) {
						return Err(ConfigError::Conflict(discriminator.clone()));
					}
				}
			}
		}

		let mut executor = Executor::new(self.registries.clone());
		for action in &self.actions {
			(action.callable)(&mut executor)?;
		}
		tracing::debug!(count = self.actions.len(), "executed configuration actions");
		Ok(executor)
	}
}

fn schedule_utility<L: ActionList>(sink: &mut L, kind: &str, name: &str, value: Component) {
	let discriminator = Discriminator::Utility {
		kind: kind.to_string(),
		name: name.to_string(),
	};
	let (kind, name) = (kind.to_string(), name.to_string());
	sink.append(Action::new(Some(discriminator), move |exec| {
		exec.active().register_utility(&kind, &name, value.clone());
		Ok(())
	}));
}

/// Scope handed to the body of a `register-in` block.
///
/// Writes go through [`ScopedActions`], so everything scheduled here carries
/// a discriminator scoped to the block's registry.
pub struct DirectiveScope<'a> {
	ctx: &'a mut ConfigContext,
	registry: Arc<BaseRegistry>,
}

impl DirectiveScope<'_> {
	/// The registry this block registers into.
	pub fn registry(&self) -> &Arc<BaseRegistry> {
		&self.registry
	}

	/// The registry table this run resolves against.
	pub fn registries(&self) -> &Arc<Registries> {
		self.ctx.registries()
	}

	/// Proxy over the run's pending actions, scoped to this block's registry.
	pub fn actions(&mut self) -> ScopedActions<'_, Vec<Action>> {
		ScopedActions::new(&mut self.ctx.actions, self.registry.token().clone())
	}

	/// Schedules an action; a non-sentinel discriminator is scoped on the way in.
	pub fn action(
		&mut self,
		discriminator: Option<Discriminator>,
		callable: impl Fn(&mut Executor) -> Result<()> + Send + Sync + 'static,
	) {
		self.actions().append(Action::new(discriminator, callable));
	}

	/// Same as [`ConfigContext::register_utility`], scoped to this registry.
	pub fn register_utility(&mut self, kind: &str, name: &str, value: Component) {
		let mut actions = self.actions();
		schedule_utility(&mut actions, kind, name, value);
	}

	/// Always fails: `register-in` blocks cannot nest.
	pub fn register_in<F>(&mut self, registry: &Arc<BaseRegistry>, body: F) -> Result<()>
	where
		F: FnOnce(&mut DirectiveScope<'_>) -> Result<()>,
	{
		self.ctx.register_in(registry, body)
	}
}
