//! KDL front end for the configuration engine.
//!
//! Three directives:
//!
//! ```kdl
//! registry "custom" parent="myapp"
//! utility "greeting" kind="text" value="hello"
//! register-in "myapp.custom" {
//!     utility "greeting" kind="text" value="scoped hello"
//! }
//! ```
//!
//! `registry` defines a named registry (the `parent` property is optional).
//! `utility` schedules a registration into whatever registry is active when
//! the actions run. `register-in` scopes the registrations in its children
//! block to the named registry; such blocks cannot nest.

use std::sync::Arc;

use kdl::{KdlDocument, KdlNode};

use crate::config::{ConfigContext, DirectiveScope, Executor};
use crate::error::{ConfigError, Result};
use crate::registry::Registries;

/// Parses `input` and schedules its directives onto a fresh context.
///
/// Registries named by `registry` nodes are defined immediately (they are
/// configuration-time state); everything else becomes pending actions on the
/// returned context.
pub fn parse_config_str(registries: &Arc<Registries>, input: &str) -> Result<ConfigContext> {
	let doc: KdlDocument = input.parse()?;
	let mut ctx = ConfigContext::new(registries.clone());

	for node in doc.nodes() {
		match node.name().value() {
			"registry" => define_registry(registries, node)?,
			"utility" => {
				let (kind, name, value) = utility_fields(node)?;
				ctx.register_utility(&kind, &name, Arc::new(value));
			}
			"register-in" => register_in_node(&mut ctx, node)?,
			other => return Err(ConfigError::UnknownDirective(other.to_string())),
		}
	}

	Ok(ctx)
}

/// Parses and immediately executes `input`.
pub fn load_config_str(registries: &Arc<Registries>, input: &str) -> Result<Executor> {
	parse_config_str(registries, input)?.execute()
}

fn define_registry(registries: &Registries, node: &KdlNode) -> Result<()> {
	let name = positional_string(node, "registry name")?;
	let parent = node.get("parent").and_then(|v| v.as_string());
	registries.define(parent, name)?;
	Ok(())
}

fn register_in_node(ctx: &mut ConfigContext, node: &KdlNode) -> Result<()> {
	let path = positional_string(node, "register-in registry")?;
	let registry = ctx.registries().resolve_path(path)?;
	let children = node.children();

	ctx.register_in(&registry, |scope| {
		let Some(children) = children else {
			return Ok(());
		};
		for child in children.nodes() {
			scoped_node(scope, child)?;
		}
		Ok(())
	})
}

fn scoped_node(scope: &mut DirectiveScope<'_>, node: &KdlNode) -> Result<()> {
	match node.name().value() {
		"utility" => {
			let (kind, name, value) = utility_fields(node)?;
			scope.register_utility(&kind, &name, Arc::new(value));
			Ok(())
		}
		// Routed through the engine so it reports the nesting error.
		"register-in" => {
			let path = positional_string(node, "register-in registry")?;
			let registry = scope.registries().resolve_path(path)?;
			scope.register_in(&registry, |_| Ok(()))
		}
		other => Err(ConfigError::UnknownDirective(other.to_string())),
	}
}

fn utility_fields(node: &KdlNode) -> Result<(String, String, String)> {
	let name = positional_string(node, "utility name")?;
	let kind = property_string(node, "kind")?;
	let value = property_string(node, "value")?;
	Ok((kind.to_string(), name.to_string(), value.to_string()))
}

fn positional_string<'a>(node: &'a KdlNode, what: &str) -> Result<&'a str> {
	node.get(0)
		.and_then(|v| v.as_string())
		.ok_or_else(|| ConfigError::MissingField(what.to_string()))
}

fn property_string<'a>(node: &'a KdlNode, key: &str) -> Result<&'a str> {
	node.get(key)
		.and_then(|v| v.as_string())
		.ok_or_else(|| ConfigError::MissingField(key.to_string()))
}
