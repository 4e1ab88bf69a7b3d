//! Choosing and applying the bases of a local registry.
//!
//! The administrative surface for the bases list: enumerate the candidate
//! base registries an operator may pick from, and replace a registry's bases
//! from a submitted, ordered selection. Rendering the form itself is a host
//! concern; this module only owns option enumeration and list replacement.

use std::sync::Arc;

use crate::error::RegistryError;
use crate::registry::{BASE_NAME, BaseRegistry, Registries};
use crate::token::RegistryToken;

/// Label offered for the well-known global base registry.
pub const GLOBAL_BASE_LABEL: &str = "-- Global Base Registry --";

/// Label offered for the local registry's inherited parent registry.
pub const PARENT_LABEL: &str = "-- Parent Local Registry --";

/// One selectable base registry.
#[derive(Debug, Clone)]
pub struct BaseCandidate {
	/// Display label: the registry's path, or one of the sentinel labels.
	pub label: String,
	/// The live registry this candidate stands for.
	pub registry: Arc<BaseRegistry>,
}

/// A submitted choice for the new bases list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseChoice {
	/// A named registry, by token.
	Registry(RegistryToken),
	/// Keep the registry's current unnamed parent base.
	Parent,
	/// The well-known global base registry.
	GlobalBase,
}

/// Enumerates the bases an operator may select for `local`.
///
/// In order: every other named registry except the global base (definition
/// order), then the first of `local`'s current bases that is not itself a
/// named registry (its inherited parent, if any), then the global base
/// registry under its sentinel label. `local` is never its own candidate.
pub fn base_candidates(registries: &Registries, local: &BaseRegistry) -> Vec<BaseCandidate> {
	let named = registries.named();

	let mut candidates: Vec<BaseCandidate> = named
		.iter()
		.filter(|(path, registry)| path != BASE_NAME && !std::ptr::eq(registry.as_ref(), local))
		.map(|(path, registry)| BaseCandidate {
			label: path.clone(),
			registry: registry.clone(),
		})
		.collect();

	if let Some(parent) = unnamed_parent(&named, local) {
		candidates.push(BaseCandidate {
			label: PARENT_LABEL.to_string(),
			registry: parent,
		});
	}

	candidates.push(BaseCandidate {
		label: GLOBAL_BASE_LABEL.to_string(),
		registry: registries.base().clone(),
	});

	candidates
}

/// Applies a submitted selection as `target`'s new bases, in order.
///
/// Unknown tokens fail with [`RegistryError::Unresolved`] and a selection
/// whose chain reaches back to `target` fails with
/// [`RegistryError::CyclicBases`], in both cases before anything is changed.
/// [`BaseChoice::Parent`] keeps the current unnamed parent and is skipped
/// when there is none.
pub fn apply_bases(
	registries: &Registries,
	target: &Arc<BaseRegistry>,
	choices: &[BaseChoice],
) -> Result<(), RegistryError> {
	let named = registries.named();
	let mut bases = Vec::with_capacity(choices.len());

	for choice in choices {
		match choice {
			BaseChoice::Registry(token) => bases.push(registries.resolve(token)?),
			BaseChoice::Parent => {
				if let Some(parent) = unnamed_parent(&named, target) {
					bases.push(parent);
				}
			}
			BaseChoice::GlobalBase => bases.push(registries.base().clone()),
		}
	}

	target.set_bases(bases)
}

fn unnamed_parent(
	named: &[(String, Arc<BaseRegistry>)],
	local: &BaseRegistry,
) -> Option<Arc<BaseRegistry>> {
	local
		.bases()
		.into_iter()
		.find(|base| !named.iter().any(|(_, registry)| Arc::ptr_eq(registry, base)))
}
